//! A small interactive shell with job control.
//!
//! Each line is split on whitespace and either run as a builtin (`exit`,
//! `cd`, `history`, `jobs`) or launched as an external program in its own
//! process group. Foreground programs get the terminal until they exit or
//! stop; programs ending in `&` run in the background and are tracked in a
//! [`JobTable`] that is polled before every prompt.

pub mod builtin;
pub mod builtins;
pub mod config;
pub mod error;
pub mod input_handler;
pub mod jobs;
pub mod launcher;
pub mod session;
pub mod signals;
pub mod terminal;
pub mod tokenizer;

pub use config::Config;
pub use error::{Result, ShellError};
pub use jobs::{Job, JobState, JobTable};
pub use session::{Flow, Session};
pub use terminal::Terminal;
