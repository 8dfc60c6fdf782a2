use std::{env, fs, path::PathBuf};

use dirs;
use tracing::warn;

pub const DEFAULT_PROMPT: &str = "shell>";
pub const PROMPT_VAR: &str = "MY_PROMPT";
pub const MAX_HISTORY: usize = 2048;

pub struct Config {
    line_editor_config: rustyline::Config,
    prompt: String,
    history_file: Option<PathBuf>,
}

impl Config {
    /// Reads `MY_PROMPT` and locates the history file.
    pub fn from_env() -> Config {
        let mut config = Config::from_default();
        if let Ok(prompt) = env::var(PROMPT_VAR) {
            config.prompt = prompt;
        }
        config.history_file = history_file();
        config
    }

    /// Default prompt and no history persistence.
    pub fn from_default() -> Config {
        let line_editor_config = rustyline::config::Builder::new()
            .auto_add_history(false)
            .history_ignore_dups(false)
            .completion_type(rustyline::CompletionType::List)
            .max_history_size(MAX_HISTORY)
            .build();

        Config {
            line_editor_config,
            prompt: DEFAULT_PROMPT.to_owned(),
            history_file: None,
        }
    }

    pub fn with_prompt(mut self, prompt: &str) -> Config {
        self.prompt = prompt.to_owned();
        self
    }

    pub fn line_editor_config(&self) -> &rustyline::Config {
        &self.line_editor_config
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn history_file(&self) -> Option<&PathBuf> {
        self.history_file.as_ref()
    }
}

/// `MAJOR.MINOR` of this build.
pub fn version() -> String {
    format!(
        "{}.{}",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR")
    )
}

fn history_file() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("jcsh");

    if let Err(e) = fs::create_dir_all(&path) {
        warn!("history won't be saved, can't create {}: {}", path.display(), e);
        return None;
    }
    path.push("history");
    Some(path)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_prompt() {
        let config = Config::from_default();
        assert_eq!(config.prompt(), "shell>");
        assert!(config.history_file().is_none());
    }

    #[test]
    fn history_is_added_by_the_session() {
        let config = Config::from_default();
        assert!(!config.line_editor_config().auto_add_history());
        assert_eq!(config.line_editor_config().max_history_size(), MAX_HISTORY);
    }

    #[test]
    fn prompt_override() {
        let config = Config::from_default().with_prompt("$ ");
        assert_eq!(config.prompt(), "$ ");
    }

    #[test]
    fn version_has_two_parts() {
        let v = version();
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
    }
}
