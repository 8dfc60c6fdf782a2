//! Signal dispositions for the shell and for the children it launches.
//!
//! The interactive shell ignores the job control signals so that Ctrl-C,
//! Ctrl-Z and background terminal access never stop or kill it. Ignored
//! dispositions survive `exec`, so every child puts them back to default
//! before running its program.

use nix::sys::signal::{signal, SigHandler, Signal};

/// Signals a shell with job control must not be affected by.
pub const JOB_CONTROL_SIGNALS: [Signal; 5] = [
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTSTP,
    Signal::SIGTTIN,
    Signal::SIGTTOU,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ignore,
    Default,
}

impl Disposition {
    fn handler(self) -> SigHandler {
        match self {
            Disposition::Ignore => SigHandler::SigIgn,
            Disposition::Default => SigHandler::SigDfl,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SignalProfile {
    pub disposition: Disposition,
    pub signals: &'static [Signal],
}

/// Applied once by the interactive shell at startup.
pub const SHELL_PROFILE: SignalProfile = SignalProfile {
    disposition: Disposition::Ignore,
    signals: &JOB_CONTROL_SIGNALS,
};

/// Applied by every child between fork and exec.
pub const CHILD_PROFILE: SignalProfile = SignalProfile {
    disposition: Disposition::Default,
    signals: &JOB_CONTROL_SIGNALS,
};

impl SignalProfile {
    /// Only calls `signal(2)`, so it is safe to use in a forked child.
    pub fn apply(&self) -> nix::Result<()> {
        let handler = self.disposition.handler();
        for sig in self.signals {
            // SAFETY: SigIgn and SigDfl install no user code.
            unsafe { signal(*sig, handler) }?;
        }
        Ok(())
    }
}
