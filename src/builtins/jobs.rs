use crate::{builtin::BuiltinOutput, jobs::JobTable};

/// Lists every job in job number order, then drops the ones shown as Done.
pub fn run(jobs: &mut JobTable) -> BuiltinOutput {
    let mut out = BuiltinOutput::ok();
    for line in jobs.report() {
        out.line(line);
    }
    out
}
