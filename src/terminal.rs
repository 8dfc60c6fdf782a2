//! Ownership of the controlling terminal.
//!
//! The terminal's foreground process group decides who may read from it and
//! who receives Ctrl-C / Ctrl-Z. The shell hands it to a foreground child and
//! takes it back once that child exits or stops. When the shell is not
//! attached to a terminal, none of the ownership calls are made.

use std::{
    io::IsTerminal,
    os::unix::io::{BorrowedFd, RawFd},
};

use nix::{
    errno::Errno,
    sys::{
        signal::{kill, Signal},
        termios::{tcgetattr, tcsetattr, SetArg, Termios},
        wait::{waitpid, WaitPidFlag, WaitStatus},
    },
    unistd::{getpgrp, getpid, setpgid, tcgetpgrp, tcsetpgrp, Pid},
};
use tracing::{debug, info, warn};

use crate::{
    error::{ShellError, WaitError},
    jobs::JobTable,
    signals::SHELL_PROFILE,
};

pub const SHELL_TERMINAL: RawFd = 0;

/// How a foreground child gave control back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForegroundStatus {
    Exited(i32),
    Signaled(Signal),
    Stopped(Signal),
}

#[derive(Debug)]
pub struct Terminal {
    fd: RawFd,
    interactive: bool,
    shell_pgid: Pid,
    modes: Option<Termios>,
}

impl Terminal {
    /// Takes control of stdin's terminal if there is one: waits until the
    /// shell is in the foreground, ignores job control signals, moves the
    /// shell into its own process group and makes that group the foreground.
    pub fn acquire() -> Result<Terminal, ShellError> {
        let fd = SHELL_TERMINAL;
        if !borrow(fd).is_terminal() {
            return Ok(Terminal::detached());
        }

        // Started in the background of another shell: stop until resumed in the foreground.
        loop {
            let pgrp = getpgrp();
            let foreground = tcgetpgrp(borrow(fd)).map_err(ShellError::Terminal)?;
            if foreground == pgrp {
                break;
            }
            kill(Pid::from_raw(-pgrp.as_raw()), Signal::SIGTTIN).map_err(ShellError::Terminal)?;
        }

        SHELL_PROFILE.apply().map_err(ShellError::Terminal)?;

        let shell_pgid = getpid();
        if getpgrp() != shell_pgid {
            setpgid(shell_pgid, shell_pgid).map_err(ShellError::Terminal)?;
        }
        tcsetpgrp(borrow(fd), shell_pgid).map_err(ShellError::Terminal)?;

        let modes = match tcgetattr(borrow(fd)) {
            Ok(modes) => Some(modes),
            Err(e) => {
                warn!("couldn't save terminal modes: {}", e);
                None
            }
        };

        info!(pgid = %shell_pgid, "terminal acquired");
        Ok(Terminal {
            fd,
            interactive: true,
            shell_pgid,
            modes,
        })
    }

    /// A session without a controlling terminal, e.g. reading a script from a pipe.
    pub fn detached() -> Terminal {
        Terminal {
            fd: SHELL_TERMINAL,
            interactive: false,
            shell_pgid: getpgrp(),
            modes: None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn fd(&self) -> RawFd {
        self.fd
    }

    pub fn shell_pgid(&self) -> Pid {
        self.shell_pgid
    }

    /// The terminal's current foreground group, `None` when detached.
    pub fn foreground_group(&self) -> Option<Pid> {
        if !self.interactive {
            return None;
        }
        tcgetpgrp(borrow(self.fd)).ok()
    }

    /// Gives the terminal to `pid`'s group, blocks until the child exits or
    /// stops, then takes the terminal back. The shell owns the terminal again
    /// when this returns, whatever happened to the child.
    pub fn run_foreground(&self, pid: Pid) -> Result<ForegroundStatus, WaitError> {
        if self.interactive {
            if let Err(e) = tcsetpgrp(borrow(self.fd), pid) {
                // The child may already be gone; the wait below still reaps it.
                debug!(%pid, "tcsetpgrp to child failed: {}", e);
            }
        }

        let status = wait_for(pid);

        if self.interactive {
            self.reclaim();
        }

        let status = status?;
        debug!(%pid, ?status, "foreground child returned");
        Ok(status)
    }

    /// Registers an already launched background process. The terminal stays
    /// with the shell and nothing blocks.
    pub fn run_background(&self, jobs: &mut JobTable, pid: Pid, command: &str) -> usize {
        jobs.register(pid, command)
    }

    /// Makes the shell's group the foreground again and reapplies the saved modes.
    pub(crate) fn reclaim(&self) {
        if let Err(e) = tcsetpgrp(borrow(self.fd), self.shell_pgid) {
            warn!("couldn't take the terminal back: {}", e);
        }
        if let Some(modes) = &self.modes {
            if let Err(e) = tcsetattr(borrow(self.fd), SetArg::TCSADRAIN, modes) {
                warn!("couldn't restore terminal modes: {}", e);
            }
        }
    }
}

fn wait_for(pid: Pid) -> Result<ForegroundStatus, WaitError> {
    loop {
        match waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ForegroundStatus::Exited(code)),
            Ok(WaitStatus::Signaled(_, sig, _)) => return Ok(ForegroundStatus::Signaled(sig)),
            Ok(WaitStatus::Stopped(_, sig)) => return Ok(ForegroundStatus::Stopped(sig)),
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(source) => return Err(WaitError { pid, source }),
        }
    }
}

fn borrow(fd: RawFd) -> BorrowedFd<'static> {
    // SAFETY: the shell never closes its standard input.
    unsafe { BorrowedFd::borrow_raw(fd) }
}
