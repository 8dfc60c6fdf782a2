//! The read / dispatch / run loop.

use nix::unistd::Pid;
use tracing::{debug, error, info, warn};

use crate::{
    builtin::{Builtin, BuiltinOutput, Dispatch},
    builtins,
    config::Config,
    error::{LaunchError, Result},
    input_handler::{LineSource, Readline},
    jobs::JobTable,
    launcher::{self, Mode},
    terminal::{ForegroundStatus, Terminal},
    tokenizer::CommandLine,
};

/// Whether the loop keeps reading after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Session<L: LineSource> {
    terminal: Terminal,
    jobs: JobTable,
    input: L,
    prompt: String,
}

impl Session<Readline> {
    /// Takes the terminal (when there is one) and sets up line editing.
    pub fn new(config: &Config) -> Result<Session<Readline>> {
        let terminal = Terminal::acquire()?;
        let input = Readline::new(config, terminal.is_interactive());
        Ok(Session::with_parts(config, terminal, input))
    }
}

impl<L: LineSource> Session<L> {
    pub fn with_parts(config: &Config, terminal: Terminal, input: L) -> Session<L> {
        Session {
            terminal,
            jobs: JobTable::new(),
            input,
            prompt: config.prompt().to_owned(),
        }
    }

    /// Reads and runs lines until `exit` or end of input, then tears down.
    pub fn run(&mut self) -> Result<()> {
        let result = self.read_loop();
        self.shutdown();
        result
    }

    fn read_loop(&mut self) -> Result<()> {
        loop {
            self.jobs.poll();
            let line = match self.input.read_line(&self.prompt)? {
                Some(line) => line,
                None => return Ok(()),
            };
            if self.handle_line(&line) == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Runs one line of input. Errors are reported and never end the loop.
    pub fn handle_line(&mut self, raw: &str) -> Flow {
        let line = raw.trim();
        if line.is_empty() {
            return Flow::Continue;
        }
        self.input.add_history(line);

        let cmd = CommandLine::parse(line);
        match self.try_builtin(&cmd.argv) {
            Dispatch::Exit => return Flow::Exit,
            Dispatch::Handled(output) => {
                if let Err(e) = output.flush() {
                    warn!("couldn't write builtin output: {}", e);
                }
                return Flow::Continue;
            }
            Dispatch::External => {}
        }

        if let Err(e) = self.execute(&cmd) {
            eprintln!("{}", e);
        }
        Flow::Continue
    }

    /// Runs `argv` in the shell if it names a builtin.
    pub fn try_builtin(&mut self, argv: &[String]) -> Dispatch {
        let builtin = match argv.first().and_then(|name| Builtin::from_name(name)) {
            Some(builtin) => builtin,
            None => return Dispatch::External,
        };
        let args = &argv[1..];

        debug!(?builtin, "builtin");
        let output: BuiltinOutput = match builtin {
            Builtin::Exit => return Dispatch::Exit,
            Builtin::Cd => builtins::cd::run(args),
            Builtin::History => builtins::history::run(&self.input.history()),
            Builtin::Jobs => builtins::jobs::run(&mut self.jobs),
        };
        Dispatch::Handled(output)
    }

    /// Launches an external command and either waits for it or tracks it as a job.
    pub fn execute(&mut self, cmd: &CommandLine) -> std::result::Result<(), LaunchError> {
        let mode = if cmd.background {
            Mode::Background
        } else {
            Mode::Foreground
        };
        let pid = launcher::launch(&cmd.argv, mode, &self.terminal)?;

        match mode {
            Mode::Background => {
                self.terminal.run_background(&mut self.jobs, pid, &cmd.display);
            }
            Mode::Foreground => self.wait_foreground(pid, &cmd.display),
        }
        Ok(())
    }

    fn wait_foreground(&mut self, pid: Pid, display: &str) {
        match self.terminal.run_foreground(pid) {
            Ok(ForegroundStatus::Stopped(sig)) => {
                // Keep tracking it so it isn't leaked when the shell exits.
                info!(%pid, ?sig, "foreground child stopped");
                println!();
                self.jobs.register(pid, display);
            }
            Ok(status) => debug!(%pid, ?status, "foreground child finished"),
            Err(e) => error!("{}", e),
        }
    }

    /// Signals the remaining jobs and lets the line source save its state.
    pub fn shutdown(&mut self) {
        self.jobs.terminate_all();
        self.input.close();
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn input(&self) -> &L {
        &self.input
    }
}
