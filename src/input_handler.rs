//! Where input lines come from. The session only needs to read a line, add
//! it to the history and list the history back; rustyline does the editing.

use std::{collections::VecDeque, path::PathBuf};

use rustyline::{error::ReadlineError, Editor};
use tracing::{debug, warn};

use crate::{config::Config, error::Result};

pub trait LineSource {
    /// Returns `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    fn add_history(&mut self, line: &str);

    /// Every retained entry with its number, oldest first.
    fn history(&self) -> Vec<(usize, String)>;

    /// Called once when the session ends.
    fn close(&mut self) {}
}

pub struct Readline {
    editor: Editor<()>,
    /// Entries ever added, including the ones evicted by the size cap
    added: usize,
    history_file: Option<PathBuf>,
}

impl Readline {
    /// Loads the saved history when `persist` is set and the config has a history file.
    pub fn new(config: &Config, persist: bool) -> Readline {
        let mut editor = Editor::<()>::with_config(config.line_editor_config().clone());
        let history_file = if persist {
            config.history_file().cloned()
        } else {
            None
        };

        if let Some(path) = &history_file {
            if path.exists() {
                if let Err(e) = editor.load_history(path) {
                    warn!("couldn't load history from {}: {}", path.display(), e);
                }
            }
        }

        let added = editor.history().len();
        Readline {
            editor,
            added,
            history_file,
        }
    }

    /// Number of the oldest retained entry.
    fn base(&self) -> usize {
        self.added - self.editor.history().len() + 1
    }
}

impl LineSource for Readline {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => return Ok(Some(line)),
                // Ctrl-C at the prompt drops the line
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn add_history(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        if self.editor.add_history_entry(line) {
            self.added += 1;
        }
    }

    fn history(&self) -> Vec<(usize, String)> {
        let base = self.base();
        self.editor
            .history()
            .iter()
            .enumerate()
            .map(|(i, line)| (base + i, line.clone()))
            .collect()
    }

    fn close(&mut self) {
        if let Some(path) = &self.history_file {
            match self.editor.save_history(path) {
                Ok(()) => debug!("history saved to {}", path.display()),
                Err(e) => warn!("couldn't save history to {}: {}", path.display(), e),
            }
        }
    }
}

/// A fixed list of lines, for driving a session without a terminal.
#[derive(Debug, Default)]
pub struct Script {
    lines: VecDeque<String>,
    history: Vec<String>,
}

impl Script {
    pub fn new<I, S>(lines: I) -> Script
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Script {
            lines: lines.into_iter().map(Into::into).collect(),
            history: vec![],
        }
    }
}

impl LineSource for Script {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn add_history(&mut self, line: &str) {
        if !line.is_empty() {
            self.history.push(line.to_owned());
        }
    }

    fn history(&self) -> Vec<(usize, String)> {
        self.history
            .iter()
            .enumerate()
            .map(|(i, line)| (i + 1, line.clone()))
            .collect()
    }
}
