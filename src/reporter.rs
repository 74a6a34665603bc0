/***************************************/
/*   S C H E D U L I N G   R E P O R T  */
/***************************************/

// The worker body: fill in a scheduling descriptor one setting at
// a time, read each setting back, print what the platform accepted,
// then spin so the result can be inspected from outside.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::attributes::{InheritMode, ProbeRequest, ReportLine, ResolvedSchedule};
use crate::error::ProbeError;
use crate::scheduler::Scheduler;

/// Progress of the worker. Only moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReporterState
{
    Unconfigured,
    InheritanceSet,
    PolicySet,
    PriorityQueried,
    PrioritySet,
    Applied,
    Holding,
}

/// Ends the hold loop when stopped. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct StopToken
{
    stopped : std::sync::Arc<AtomicBool>,
}

impl StopToken
{
    pub fn new () -> Self
    {
        Self::default ()
    }

    pub fn stop (&self)
    {
        self.stopped.store (true, Ordering::Release);
    }

    pub fn is_stopped (&self) -> bool
    {
        self.stopped.load (Ordering::Acquire)
    }
}

pub struct SchedulingReporter<S, W>
{
    scheduler : S,
    out       : W,
    state     : ReporterState,
}

impl<S: Scheduler, W: Write> SchedulingReporter<S, W>
{
    /// `scheduler` is a descriptor freshly initialized with defaults.
    pub fn new (scheduler: S, out: W) -> Self
    {
        Self { scheduler, out, state: ReporterState::Unconfigured }
    }

    pub fn state (&self) -> ReporterState
    {
        self.state
    }

    pub fn into_parts (self) -> (S, W)
    {
        (self.scheduler, self.out)
    }

    /// Run the configuration sequence. Stops at the first failure,
    /// lines already emitted stay emitted.
    pub fn configure (&mut self, request: &ProbeRequest) -> Result<ResolvedSchedule, ProbeError>
    {
        // Inheritance mode.
        self.scheduler.set_inheritance (request.inherit)
            .map_err (|source| ProbeError::ConfigurationRejected { setting: "inheritance mode", source })?;
        self.advance (ReporterState::InheritanceSet);

        let inherit = self.scheduler.get_inheritance ()
            .map_err (|source| ProbeError::ReadBackFailed { setting: "inheritance mode", source })?;
        self.emit (ReportLine::Inheritance (inherit))?;

        // Policy.
        self.scheduler.set_policy (request.policy)
            .map_err (|source| ProbeError::ConfigurationRejected { setting: "policy", source })?;
        self.advance (ReporterState::PolicySet);

        let policy = self.scheduler.get_policy ()
            .map_err (|source| ProbeError::ReadBackFailed { setting: "policy", source })?;
        self.emit (ReportLine::Policy (policy))?;

        // Range of the policy actually in place.
        let range = self.scheduler.priority_range (policy)
            .map_err (|source| ProbeError::QueryFailed { policy, source })?;
        self.advance (ReporterState::PriorityQueried);
        self.emit (ReportLine::MaxPriority (range.max ()))?;
        self.emit (ReportLine::MinPriority (range.min ()))?;

        // Priority, validated before it reaches the descriptor.
        let requested = request.priority.resolve (&range);
        if !range.contains (requested)
        {
            return Err (ProbeError::OutOfRange
            {
                priority : requested,
                policy,
                min      : range.min (),
                max      : range.max (),
            });
        }
        self.scheduler.set_priority (requested)
            .map_err (|source| ProbeError::ConfigurationRejected { setting: "priority", source })?;
        self.advance (ReporterState::PrioritySet);

        let priority = self.scheduler.get_priority ()
            .map_err (|source| ProbeError::ReadBackFailed { setting: "priority", source })?;
        self.emit (ReportLine::Priority (priority))?;

        // An inheriting descriptor has no scheduling of its own to apply.
        if request.apply && inherit == InheritMode::Inherit
        {
            tracing::warn! ("descriptor inherits its scheduling, not applying it to the thread");
        }
        else if request.apply
        {
            self.scheduler.apply_to_current_thread ()
                .map_err (|source| ProbeError::ConfigurationRejected { setting: "thread scheduling", source })?;
            self.advance (ReporterState::Applied);
        }

        Ok (ResolvedSchedule { inherit, policy, range, priority })
    }

    /// Busy-spin until `stop` fires. With a token nobody stops,
    /// this never returns.
    pub fn hold (&mut self, stop: &StopToken)
    {
        self.advance (ReporterState::Holding);
        while !stop.is_stopped ()
        {
            std::hint::spin_loop ();
        }
        tracing::debug! ("hold released");
    }

    fn advance (&mut self, next: ReporterState)
    {
        tracing::debug! (from = ?self.state, to = ?next, "reporter state");
        self.state = next;
    }

    fn emit (&mut self, line: ReportLine) -> Result<(), ProbeError>
    {
        writeln! (self.out, "{}", line)
            .and_then (|_| self.out.flush ())
            .map_err (ProbeError::Output)
    }
}
