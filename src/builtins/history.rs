use crate::builtin::BuiltinOutput;

/// One `N: line` row per entry, nothing at all for an empty history.
pub fn run(entries: &[(usize, String)]) -> BuiltinOutput {
    let mut out = BuiltinOutput::ok();
    for (index, line) in entries {
        out.line(format!("{}: {}", index, line));
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numbered_listing() {
        let out = run(&[(1, "ls".to_owned()), (2, "cd /tmp".to_owned())]);
        assert!(out.success);
        assert_eq!(String::from_utf8(out.stdout).unwrap(), "1: ls\n2: cd /tmp\n");
    }

    #[test]
    fn empty_history_prints_nothing() {
        let out = run(&[]);
        assert!(out.success);
        assert!(out.stdout.is_empty());
    }
}
