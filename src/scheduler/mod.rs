/***************************************/
/*     S C H E D U L E R   A C C E S S  */
/***************************************/

// The platform scheduling subsystem, seen from the reporter.
// The reporter never calls the platform directly: it goes through
// a Scheduler, so that tests can substitute a fake one.

use crate::attributes::{InheritMode, Policy, PriorityRange};

mod pthread;

#[cfg(test)]
pub(crate) mod fake;

pub use pthread::PthreadAttrScheduler;

/// A scheduling-attribute descriptor plus the platform queries
/// needed to fill it in. Every call may fail.
pub trait Scheduler
{
    fn set_inheritance (&mut self, mode: InheritMode) -> std::io::Result<()>;

    fn get_inheritance (&self) -> std::io::Result<InheritMode>;

    fn set_policy (&mut self, policy: Policy) -> std::io::Result<()>;

    fn get_policy (&self) -> std::io::Result<Policy>;

    /// Bounds of the valid priorities for `policy`, as reported by the platform.
    fn priority_range (&self, policy: Policy) -> std::io::Result<PriorityRange>;

    fn set_priority (&mut self, priority: i32) -> std::io::Result<()>;

    fn get_priority (&self) -> std::io::Result<i32>;

    /// Make the descriptor's policy and priority the live
    /// scheduling of the calling thread.
    fn apply_to_current_thread (&self) -> std::io::Result<()>;
}

/// Turn a pthread-style return code (0 or an errno value) into a Result.
pub(crate) fn check (code: libc::c_int) -> std::io::Result<()>
{
    if code == 0
    {
        Ok (())
    }
    else
    {
        Err (std::io::Error::from_raw_os_error (code))
    }
}

pub(crate) fn unrecognized (what: &str, raw: libc::c_int) -> std::io::Error
{
    std::io::Error::new (std::io::ErrorKind::InvalidData,
                         format! ("unrecognized {} value {}", what, raw))
}
