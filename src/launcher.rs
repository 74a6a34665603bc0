/***************************************/
/*             LAUNCHER                */
/***************************************/

// Start the single worker, wait for it. The worker configures
// and reports its scheduling, then holds until the stop token
// fires, which by default never happens.

use crate::config::{self, ProbeConfig};
use crate::error::ProbeError;
use crate::linux_utils;
use crate::publisher::ReportPublisher;
use crate::reporter::{SchedulingReporter, StopToken};
use crate::scheduler::PthreadAttrScheduler;
use crate::attributes::ResolvedSchedule;

pub struct Launcher
{
    /// Name of the worker thread.
    name     : String,

    stop     : StopToken,

    /// Stop the hold after this long, hold forever when None.
    hold_for : Option<std::time::Duration>,
}

impl Launcher
{
    pub fn new (hold_for: Option<std::time::Duration>) -> Self
    {
        Self
        {
            name : config::WORKER_THREAD_NAME.to_string (),
            stop : StopToken::new (),
            hold_for,
        }
    }

    pub fn stop_token (&self) -> StopToken
    {
        self.stop.clone ()
    }

    /// Spawn the worker running `body` and block until it ends.
    pub fn run<T, F> (&self, body: F) -> Result<T, ProbeError>
    where
        T: Send + 'static,
        F: FnOnce (StopToken) -> Result<T, ProbeError> + Send + 'static,
    {
        let stop = self.stop.clone ();
        let worker = std::thread::Builder::new ()
            .name (self.name.clone ())
            .spawn (move || body (stop))
            .map_err (ProbeError::Spawn)?;

        // The timer is detached: if the worker fails first, the
        // process exits without waiting for it.
        if let Some (hold_for) = self.hold_for
        {
            let stop = self.stop.clone ();
            std::thread::Builder::new ()
                .name (format! ("{}-timer", self.name))
                .spawn (move ||
                    {
                        std::thread::sleep (hold_for);
                        tracing::info! (?hold_for, "hold time elapsed");
                        stop.stop ();
                    })
                .map_err (ProbeError::Spawn)?;
        }

        match worker.join ()
        {
            Ok (result) => result,
            Err (_)     => Err (ProbeError::WorkerPanicked),
        }
    }
}

/// The worker procedure: pin, configure, report, publish, hold.
pub fn run_probe<W: std::io::Write> (config: &ProbeConfig,
                                     out   : W,
                                     stop  : StopToken) -> Result<ResolvedSchedule, ProbeError>
{
    let tid = linux_utils::get_platform_tid ();
    tracing::debug! (tid, "worker started");

    if let Some (cpu) = config.affinity
    {
        linux_utils::set_affinity (cpu)
            .map_err (|source| ProbeError::ConfigurationRejected { setting: "cpu affinity", source })?;
        tracing::debug! (cpu, "affinity set");
    }

    let scheduler = PthreadAttrScheduler::new ()
        .map_err (|source| ProbeError::ConfigurationRejected { setting: "attribute descriptor", source })?;
    let request = config.request ();
    let mut reporter = SchedulingReporter::new (scheduler, out);
    let schedule = reporter.configure (&request)?;

    if request.apply
    {
        match linux_utils::current_thread_schedule ()
        {
            Ok ((policy, priority)) => tracing::info! (%policy, priority, "live scheduling"),
            Err (error)             => tracing::warn! (%error, "cannot read live scheduling"),
        }
    }

    if let Some (broker) = &config.broker
    {
        let publisher = ReportPublisher::connect (broker, tid)?;
        publisher.publish (&schedule)?;
        publisher.disconnect ();
    }

    tracing::info! (tid, hint = %linux_utils::inspection_hint (), "holding");
    reporter.hold (&stop);

    Ok (schedule)
}
