/*****************************************/
/*      REAL-TIME SCHEDULING PROBE       */
/*****************************************/

// Usage:
//   sched_probe --policy fifo --priority 1 --apply
// then, from another shell, check the worker's class with
//   ps -eLo state,uid,pid,lwp,rtprio,time,policy,comm

mod cli;

use clap::Parser;
use sched_probe::{run_probe, Launcher, ProbeConfig, ProbeError};

fn main () -> std::process::ExitCode
{
    let args = cli::Args::parse ();

    #[cfg(feature = "print_log")]
    init_logging ();

    match run (args)
    {
        Ok (()) => std::process::ExitCode::SUCCESS,
        Err (error) =>
            {
                #[cfg(feature = "print_log")]
                tracing::error! (%error, "probe failed");
                #[cfg(not(feature = "print_log"))]
                eprintln! ("sched_probe: {}", error);
                std::process::ExitCode::FAILURE
            }
    }
}

fn run (args: cli::Args) -> Result<(), ProbeError>
{
    let file_config = match &args.config
    {
        Some (path) => ProbeConfig::load (path)?,
        None        => ProbeConfig::default (),
    };
    let config = file_config.merge (args.overrides ());
    tracing::debug! (?config, "configuration");

    let launcher = Launcher::new (config.hold_duration ());
    let schedule = launcher.run (move |stop| run_probe (&config, std::io::stdout (), stop))?;
    tracing::info! (?schedule, "worker finished");

    Ok (())
}

#[cfg(feature = "print_log")]
fn init_logging ()
{
    // stdout carries the report, logs go to stderr.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env ()
        .unwrap_or_else (|_| tracing_subscriber::EnvFilter::new ("info"));
    tracing_subscriber::fmt ()
        .with_env_filter (filter)
        .with_writer (std::io::stderr)
        .with_thread_names (true)
        .init ();
}
