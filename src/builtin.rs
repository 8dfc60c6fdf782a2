/*
## Built-in Commands

* `exit` terminates the shell, sending SIGTERM to every job still tracked
* `cd [path]` makes 'path' the current directory, $HOME (or the account's home) when omitted
* `history` lists the commands entered so far, numbered from 1
* `jobs` lists background jobs by job number, then forgets the ones reported as Done
*/
use std::io::{self, Write};

/// Roughly analogous to process::Output. Builtins run inside the shell, so
/// they hand back what they would have printed instead of printing it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuiltinOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl BuiltinOutput {
    pub fn ok() -> BuiltinOutput {
        BuiltinOutput {
            success: true,
            ..Default::default()
        }
    }

    pub fn error(message: impl std::fmt::Display) -> BuiltinOutput {
        BuiltinOutput {
            success: false,
            stdout: vec![],
            stderr: format!("{}\n", message).into_bytes(),
        }
    }

    pub fn line(&mut self, line: impl std::fmt::Display) {
        // Writing into a Vec can't fail.
        let _ = writeln!(self.stdout, "{}", line);
    }

    /// Copies the captured output to the shell's own stdout and stderr.
    pub fn flush(&self) -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(&self.stdout)?;
        out.flush()?;
        io::stderr().write_all(&self.stderr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Cd,
    History,
    Jobs,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "exit" => Some(Builtin::Exit),
            "cd" => Some(Builtin::Cd),
            "history" => Some(Builtin::History),
            "jobs" => Some(Builtin::Jobs),
            _ => None,
        }
    }
}

/// What the session should do after offering a command to the builtins.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a builtin, run it as an external program
    External,
    Handled(BuiltinOutput),
    Exit,
}
