//! Error types for the shell. Nothing here is fatal to the shell process
//! except a failure to take the terminal at startup.

use std::{io, path::PathBuf};

use nix::unistd::Pid;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellError>;

/// Directory or home lookup failed. Reported, the loop continues.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("cd: could not determine home directory")]
    NoHomeDirectory,

    #[error("cd: {}: {source}", .path.display())]
    ChangeDirectory { path: PathBuf, source: io::Error },
}

/// Starting an external program failed. The child (if any) has already
/// terminated itself; the shell keeps going.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("empty command")]
    EmptyCommand,

    #[error("{program}: {source}")]
    Spawn { program: String, source: io::Error },
}

/// `waitpid` on a tracked child failed, usually because it was already reaped.
#[derive(Debug, Error)]
#[error("wait for {pid}: {source}")]
pub struct WaitError {
    pub pid: Pid,
    pub source: nix::Error,
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("couldn't take control of the terminal: {0}")]
    Terminal(nix::Error),

    #[error("line input: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
