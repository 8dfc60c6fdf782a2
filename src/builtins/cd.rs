use crate::{builtin::BuiltinOutput, error::ResolutionError};
use std::{env, path::PathBuf};

use dirs;

pub fn run(args: &[String]) -> BuiltinOutput {
    match change_dir(args) {
        Ok(()) => BuiltinOutput::ok(),
        Err(e) => BuiltinOutput::error(e),
    }
}

/// Goes to `args[0]`, or home when there is no argument.
pub fn change_dir(args: &[String]) -> Result<(), ResolutionError> {
    let path = target(args)?;
    env::set_current_dir(&path).map_err(|source| ResolutionError::ChangeDirectory { path, source })
}

/// `HOME` first, then the password database entry of the current user.
fn target(args: &[String]) -> Result<PathBuf, ResolutionError> {
    match args.first() {
        Some(path) => Ok(PathBuf::from(path)),
        None => dirs::home_dir().ok_or(ResolutionError::NoHomeDirectory),
    }
}
