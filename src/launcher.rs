//! Starting external programs.
//!
//! Every child gets its own process group, so job control signals aimed at
//! it never reach the shell. Between fork and exec the child joins that
//! group, takes the terminal when it runs in the foreground, and restores
//! default signal dispositions. If exec fails the child exits on its own
//! and the failure comes back here as a [`LaunchError`].

use std::{
    os::unix::{io::BorrowedFd, process::CommandExt},
    process::{Command, Stdio},
};

use nix::unistd::{getpid, setpgid, tcsetpgrp, Pid};
use tracing::{debug, info};

use crate::{error::LaunchError, signals::CHILD_PROFILE, terminal::Terminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Foreground,
    /// Standard output and error go to the null device.
    Background,
}

/// Forks and execs `argv`, returning the child's pid once the new program
/// image is running.
pub fn launch(argv: &[String], mode: Mode, terminal: &Terminal) -> Result<Pid, LaunchError> {
    let program = argv.first().ok_or(LaunchError::EmptyCommand)?;

    let mut command = Command::new(program);
    command.args(&argv[1..]).process_group(0);

    if mode == Mode::Background {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    }

    let take_terminal = mode == Mode::Foreground && terminal.is_interactive();
    let fd = terminal.fd();
    // SAFETY: the closure runs in the forked child and only makes
    // async-signal-safe system calls.
    unsafe {
        command.pre_exec(move || {
            let pid = getpid();
            setpgid(pid, pid)?;
            if take_terminal {
                // SIGTTOU is still ignored here, so a background group may take the terminal.
                tcsetpgrp(BorrowedFd::borrow_raw(fd), pid)?;
            }
            CHILD_PROFILE.apply()?;
            Ok(())
        });
    }

    let child = match command.spawn() {
        Ok(child) => child,
        Err(source) => {
            // The child may have taken the terminal before its exec failed.
            if take_terminal {
                terminal.reclaim();
            }
            return Err(LaunchError::Spawn {
                program: program.clone(),
                source,
            });
        }
    };
    let pid = Pid::from_raw(child.id() as i32);

    // Mirrors the child's own call; fails harmlessly once it has exec'd.
    if let Err(e) = setpgid(pid, pid) {
        debug!(%pid, "parent setpgid: {}", e);
    }

    info!(%pid, ?mode, program = program.as_str(), "launched");
    Ok(pid)
}
