use std::{thread, time::Duration};

use jcsh::{
    builtins,
    input_handler::{LineSource, Script},
    launcher::{launch, Mode},
    terminal::ForegroundStatus,
    Config, JobState, JobTable, Session, Terminal,
};
use nix::{
    sys::{
        signal::Signal,
        wait::{waitpid, WaitStatus},
    },
    unistd::getpgrp,
};

fn argv(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}

fn shell(script: &str) -> Vec<String> {
    vec!["sh".to_owned(), "-c".to_owned(), script.to_owned()]
}

/// Polls until job `number` is done, giving up after about five seconds.
fn poll_until_done(jobs: &mut JobTable, number: usize) -> bool {
    for _ in 0..100 {
        jobs.poll();
        match jobs.get(number) {
            Some(job) if job.state() == JobState::Done => return true,
            Some(_) => thread::sleep(Duration::from_millis(50)),
            None => return false,
        }
    }
    false
}

#[test]
fn background_true_becomes_done() {
    let term = Terminal::detached();
    let mut jobs = JobTable::new();

    let pid = launch(&argv("true"), Mode::Background, &term).unwrap();
    let number = term.run_background(&mut jobs, pid, "true &");
    assert_eq!(number, 1);

    assert!(poll_until_done(&mut jobs, number));
}

#[test]
fn done_job_is_reported_exactly_once() {
    let term = Terminal::detached();
    let mut jobs = JobTable::new();

    let pid = launch(&argv("echo hi"), Mode::Background, &term).unwrap();
    let number = term.run_background(&mut jobs, pid, "echo hi &");
    assert!(poll_until_done(&mut jobs, number));

    let first = String::from_utf8(builtins::jobs::run(&mut jobs).stdout).unwrap();
    assert_eq!(first, "[1] Done    echo hi &\n");

    let second = String::from_utf8(builtins::jobs::run(&mut jobs).stdout).unwrap();
    assert!(!second.contains("[1]"));
    assert!(jobs.is_empty());
}

#[test]
fn listing_follows_job_numbers_not_completion_order() {
    let term = Terminal::detached();
    let mut jobs = JobTable::new();

    let slow = launch(&argv("sleep 1"), Mode::Background, &term).unwrap();
    term.run_background(&mut jobs, slow, "sleep 1 &");
    let fast = launch(&argv("true"), Mode::Background, &term).unwrap();
    term.run_background(&mut jobs, fast, "true &");

    assert!(poll_until_done(&mut jobs, 2));
    let lines = jobs.report();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("[1] {} Running sleep 1 &", slow));
    assert_eq!(lines[1], "[2] Done    true &");

    assert!(poll_until_done(&mut jobs, 1));
    assert_eq!(jobs.report(), vec!["[1] Done    sleep 1 &".to_owned()]);

    let next = launch(&argv("true"), Mode::Background, &term).unwrap();
    assert_eq!(term.run_background(&mut jobs, next, "true &"), 3);
    assert!(poll_until_done(&mut jobs, 3));
}

#[test]
fn foreground_exit_status_is_observed() {
    let term = Terminal::detached();
    let pid = launch(&shell("exit 0"), Mode::Foreground, &term).unwrap();
    assert!(matches!(
        term.run_foreground(pid).unwrap(),
        ForegroundStatus::Exited(_)
    ));
    assert_eq!(getpgrp(), term.shell_pgid());
}

#[test]
fn terminate_all_signals_running_jobs() {
    let term = Terminal::detached();
    let mut jobs = JobTable::new();

    let pid = launch(&argv("sleep 30"), Mode::Background, &term).unwrap();
    term.run_background(&mut jobs, pid, "sleep 30 &");
    jobs.terminate_all();

    assert!(jobs.is_empty());
    assert_eq!(
        waitpid(pid, None).unwrap(),
        WaitStatus::Signaled(pid, Signal::SIGTERM, false)
    );
}

#[test]
fn scripted_session_tracks_background_work() {
    let config = Config::from_default();
    let mut sh = Session::with_parts(
        &config,
        Terminal::detached(),
        Script::new(vec!["", "echo hi &", "cd /nonexistent/jcsh", "history"]),
    );
    sh.run().unwrap();

    let history: Vec<String> = sh.input().history().into_iter().map(|(_, l)| l).collect();
    assert_eq!(history, vec!["echo hi &", "cd /nonexistent/jcsh", "history"]);
    // Teardown forgets every job.
    assert!(sh.jobs().is_empty());
}
