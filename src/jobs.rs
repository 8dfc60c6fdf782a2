//! Bookkeeping for commands started in the background.
//!
//! A job is `Running` until a non-blocking wait sees its process exit, then
//! `Done` until the `jobs` builtin reports it or the shell exits. Job numbers
//! come from a counter that is never reset, so a number is never handed out
//! twice in a session.

use std::fmt;

use nix::{
    sys::{
        signal::{kill, Signal},
        wait::{waitpid, WaitPidFlag, WaitStatus},
    },
    unistd::Pid,
};
use tracing::{debug, info, warn};

use crate::error::WaitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    number: usize,
    pid: Pid,
    command: String,
    state: JobState,
}

impl Job {
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == JobState::Done
    }

    /// The line printed when the job is started: `[1] 4242 sleep 5 &`
    pub fn acknowledgement(&self) -> String {
        format!("[{}] {} {}", self.number, self.pid, self.command)
    }
}

/// The line shown by `jobs`.
impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            JobState::Running => write!(f, "[{}] {} Running {}", self.number, self.pid, self.command),
            JobState::Done => write!(f, "[{}] Done    {}", self.number, self.command),
        }
    }
}

#[derive(Debug)]
pub struct JobTable {
    next_number: usize,
    jobs: Vec<Job>,
}

impl Default for JobTable {
    fn default() -> Self {
        JobTable::new()
    }
}

impl JobTable {
    pub fn new() -> JobTable {
        JobTable {
            next_number: 1,
            jobs: vec![],
        }
    }

    /// Tracks a new background process, prints its acknowledgement line and
    /// returns its job number.
    pub fn register(&mut self, pid: Pid, command: &str) -> usize {
        let number = self.next_number;
        self.next_number += 1;

        let job = Job {
            number,
            pid,
            command: command.to_owned(),
            state: JobState::Running,
        };
        println!("{}", job.acknowledgement());
        info!(number, %pid, command, "job registered");

        self.jobs.push(job);
        number
    }

    /// Checks every running job without blocking. Exited jobs become `Done`
    /// and stay in the table until reported; jobs whose wait fails are
    /// dropped on the spot.
    pub fn poll(&mut self) {
        let mut gone: Vec<WaitError> = vec![];

        for job in self.jobs.iter_mut().filter(|j| !j.is_done()) {
            match waitpid(job.pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => {
                    debug!(number = job.number, pid = %job.pid, "job done");
                    job.state = JobState::Done;
                }
                Ok(_) => {}
                Err(source) => gone.push(WaitError {
                    pid: job.pid,
                    source,
                }),
            }
        }

        for err in gone {
            warn!("dropping job: {}", err);
            self.jobs.retain(|j| j.pid != err.pid);
        }
    }

    /// Jobs sorted by job number, finished ones included.
    pub fn snapshot(&self) -> Vec<Job> {
        let mut jobs = self.jobs.clone();
        jobs.sort_by_key(|j| j.number);
        jobs
    }

    /// Returns the `jobs` listing and forgets every job it reported as done,
    /// so no job is ever reported as done twice.
    pub fn report(&mut self) -> Vec<String> {
        let lines = self.snapshot().iter().map(|j| j.to_string()).collect();
        self.jobs.retain(|j| !j.is_done());
        lines
    }

    /// Best effort `SIGTERM` to everything still tracked, followed by
    /// `SIGCONT` so stopped processes get to act on it. Does not wait.
    pub fn terminate_all(&mut self) {
        for job in self.jobs.drain(..).filter(|j| !j.is_done()) {
            info!(number = job.number, pid = %job.pid, "terminating job");
            if let Err(e) = kill(job.pid, Signal::SIGTERM) {
                debug!(pid = %job.pid, "SIGTERM failed: {}", e);
                continue;
            }
            if let Err(e) = kill(job.pid, Signal::SIGCONT) {
                debug!(pid = %job.pid, "SIGCONT failed: {}", e);
            }
        }
    }

    pub fn get(&self, number: usize) -> Option<&Job> {
        self.jobs.iter().find(|j| j.number == number)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
