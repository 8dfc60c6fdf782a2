use std::{env, process};

use argh::FromArgs;
use tracing::{debug, error};

use jcsh::{config, Config, Session};

#[derive(FromArgs)]
/// A small interactive shell with job control.
struct Args {
    /// print the version and exit
    #[argh(switch, short = 'v')]
    version: bool,
}

/// Like `argh::from_env`, except that anything other than `-v`, `--help`
/// included, is a usage error on stderr with exit status 1.
fn parse_args() -> Args {
    let strings: Vec<String> = env::args().collect();
    let name = strings.first().map(String::as_str).unwrap_or("jcsh");
    let rest: Vec<&str> = strings.iter().skip(1).map(String::as_str).collect();

    match Args::from_args(&[name], &rest) {
        Ok(args) => args,
        Err(early) => {
            eprintln!("{}", early.output.trim_end());
            process::exit(1);
        }
    }
}

fn main() {
    let args = parse_args();
    if args.version {
        println!("Version: {}", config::version());
        return;
    }

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let config = Config::from_env();
    let mut session = match Session::new(&config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    debug!(interactive = session.terminal().is_interactive(), "session started");

    if let Err(e) = session.run() {
        error!("{}", e);
        process::exit(1);
    }
    process::exit(0);
}
