//! Runs the shell side of job control against a pseudo terminal.
//!
//! The checks run in a forked child that starts a new session and makes the
//! pty its controlling terminal, so the test runner's own terminal (if any)
//! is never touched. The child reports the first failed step as its exit
//! status. Keep this file to a single test: forking is only safe while no
//! other test thread may be holding a lock.

use std::{fs, os::unix::io::AsRawFd};

use jcsh::{
    input_handler::Script,
    launcher::{launch, Mode},
    terminal::ForegroundStatus,
    Config, Session, Terminal,
};
use nix::{
    libc,
    pty::openpty,
    sys::{
        signal::{kill, Signal},
        termios::{tcgetattr, LocalFlags},
        wait::{waitpid, WaitStatus},
    },
    unistd::{fork, setsid, ForkResult},
};

fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn owns_terminal(term: &Terminal) -> bool {
    term.foreground_group() == Some(term.shell_pgid())
}

fn echo_is_on() -> bool {
    tcgetattr(std::io::stdin())
        .map(|t| t.local_flags.contains(LocalFlags::ECHO))
        .unwrap_or(false)
}

/// Everything below runs with the pty slave as stdin and controlling terminal.
fn shell_side(stop_script: &str) -> Result<(), i32> {
    let term = Terminal::acquire().map_err(|_| 10)?;
    if !term.is_interactive() || !owns_terminal(&term) {
        return Err(11);
    }

    // Normal exit
    let pid = launch(&argv(&["true"]), Mode::Foreground, &term).map_err(|_| 20)?;
    if !matches!(term.run_foreground(pid), Ok(ForegroundStatus::Exited(0))) || !owns_terminal(&term) {
        return Err(21);
    }

    // Stop
    let pid = launch(&argv(&["sh", stop_script]), Mode::Foreground, &term).map_err(|_| 30)?;
    match term.run_foreground(pid) {
        Ok(ForegroundStatus::Stopped(_)) => {}
        _ => return Err(31),
    }
    if !owns_terminal(&term) {
        return Err(32);
    }
    let _ = kill(pid, Signal::SIGKILL);
    let _ = waitpid(pid, None);

    // Exec failure after the child already took the terminal
    if launch(&argv(&["definitely-not-a-real-program-jcsh"]), Mode::Foreground, &term).is_ok() {
        return Err(40);
    }
    if !owns_terminal(&term) {
        return Err(41);
    }

    // A child that turns echo off doesn't leave it off
    if !echo_is_on() {
        return Err(50);
    }
    let pid = launch(&argv(&["stty", "-echo"]), Mode::Foreground, &term).map_err(|_| 51)?;
    if !matches!(term.run_foreground(pid), Ok(ForegroundStatus::Exited(0))) {
        return Err(52);
    }
    if !echo_is_on() {
        return Err(53);
    }

    // Through the session: a stopped foreground child is adopted as job 1
    let mut sh = Session::with_parts(&Config::from_default(), term, Script::new(Vec::<String>::new()));
    sh.handle_line(&format!("sh {}", stop_script));
    match sh.jobs().get(1) {
        Some(job) if !job.is_done() => {}
        _ => return Err(60),
    }
    if !owns_terminal(sh.terminal()) {
        return Err(61);
    }

    sh.handle_line("definitely-not-a-real-program-jcsh");
    if !owns_terminal(sh.terminal()) {
        return Err(70);
    }

    sh.shutdown();
    if !sh.jobs().is_empty() {
        return Err(80);
    }
    Ok(())
}

#[test]
fn shell_keeps_the_terminal() {
    let stop_script = std::env::temp_dir().join(format!("jcsh-stop-{}.sh", std::process::id()));
    fs::write(&stop_script, "kill -STOP $$\n").unwrap();
    let stop_script_arg = stop_script.to_string_lossy().into_owned();

    let pty = openpty(None, None).unwrap();

    match unsafe { fork() }.unwrap() {
        ForkResult::Child => {
            let code = unsafe {
                if setsid().is_err()
                    || libc::ioctl(pty.slave.as_raw_fd(), libc::TIOCSCTTY, 0) != 0
                    || libc::dup2(pty.slave.as_raw_fd(), libc::STDIN_FILENO) < 0
                {
                    1
                } else {
                    match shell_side(&stop_script_arg) {
                        Ok(()) => 0,
                        Err(step) => step,
                    }
                }
            };
            unsafe { libc::_exit(code) };
        }
        ForkResult::Parent { child } => {
            let status = waitpid(child, None).unwrap();
            fs::remove_file(&stop_script).unwrap();
            // The master stays open until the child is done, or the slave hangs up.
            drop(pty);
            assert_eq!(status, WaitStatus::Exited(child, 0), "failed at step {:?}", status);
        }
    }
}
