/***************************************/
/*   P T H R E A D   A T T R I B U T E S */
/***************************************/

use super::{check, unrecognized, Scheduler};
use crate::attributes::{InheritMode, Policy, PriorityRange};
use crate::linux_utils;

/// A `pthread_attr_t` initialized with the implementation defaults.
/// Destroyed on drop.
pub struct PthreadAttrScheduler
{
    attr : libc::pthread_attr_t,
}

// The descriptor is plain data owned by a single thread at a time.
unsafe impl Send for PthreadAttrScheduler {}

impl PthreadAttrScheduler
{
    pub fn new () -> std::io::Result<Self>
    {
        let mut attr : libc::pthread_attr_t = unsafe { std::mem::zeroed () };
        check (unsafe { libc::pthread_attr_init (&mut attr) })?;

        Ok (Self { attr })
    }

    fn sched_param (&self) -> std::io::Result<libc::sched_param>
    {
        let mut param : libc::sched_param = unsafe { std::mem::zeroed () };
        check (unsafe { libc::pthread_attr_getschedparam (&self.attr, &mut param) })?;
        Ok (param)
    }
}

impl Scheduler for PthreadAttrScheduler
{
    fn set_inheritance (&mut self, mode: InheritMode) -> std::io::Result<()>
    {
        check (unsafe { libc::pthread_attr_setinheritsched (&mut self.attr, mode.to_raw ()) })
    }

    fn get_inheritance (&self) -> std::io::Result<InheritMode>
    {
        let mut raw : libc::c_int = 0;
        check (unsafe { libc::pthread_attr_getinheritsched (&self.attr, &mut raw) })?;

        InheritMode::from_raw (raw).ok_or_else (|| unrecognized ("inheritance mode", raw))
    }

    fn set_policy (&mut self, policy: Policy) -> std::io::Result<()>
    {
        check (unsafe { libc::pthread_attr_setschedpolicy (&mut self.attr, policy.to_raw ()) })
    }

    fn get_policy (&self) -> std::io::Result<Policy>
    {
        let mut raw : libc::c_int = 0;
        check (unsafe { libc::pthread_attr_getschedpolicy (&self.attr, &mut raw) })?;

        Policy::from_raw (raw).ok_or_else (|| unrecognized ("policy", raw))
    }

    fn priority_range (&self, policy: Policy) -> std::io::Result<PriorityRange>
    {
        // Both return -1 and set errno on failure.
        let max = unsafe { libc::sched_get_priority_max (policy.to_raw ()) };
        if max == -1
        {
            return Err (std::io::Error::last_os_error ());
        }
        let min = unsafe { libc::sched_get_priority_min (policy.to_raw ()) };
        if min == -1
        {
            return Err (std::io::Error::last_os_error ());
        }

        PriorityRange::new (min, max).ok_or_else (||
            std::io::Error::new (std::io::ErrorKind::InvalidData,
                                 format! ("inverted priority range [{}, {}]", min, max)))
    }

    fn set_priority (&mut self, priority: i32) -> std::io::Result<()>
    {
        let mut param : libc::sched_param = unsafe { std::mem::zeroed () };
        param.sched_priority = priority as libc::c_int;

        check (unsafe { libc::pthread_attr_setschedparam (&mut self.attr, &param) })
    }

    fn get_priority (&self) -> std::io::Result<i32>
    {
        Ok (self.sched_param ()?.sched_priority)
    }

    fn apply_to_current_thread (&self) -> std::io::Result<()>
    {
        let policy   = self.get_policy ()?;
        let priority = self.get_priority ()?;

        linux_utils::set_thread_schedule (policy, priority)
    }
}

impl Drop for PthreadAttrScheduler
{
    fn drop (&mut self)
    {
        unsafe
            {
                libc::pthread_attr_destroy (&mut self.attr);
            }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    // These calls only touch the descriptor or query constants,
    // no privilege is needed.

    #[test]
    fn explicit_inheritance_round_trips ()
    {
        let mut scheduler = PthreadAttrScheduler::new ().unwrap ();
        scheduler.set_inheritance (InheritMode::Explicit).unwrap ();
        assert_eq! (scheduler.get_inheritance ().unwrap (), InheritMode::Explicit);

        scheduler.set_inheritance (InheritMode::Inherit).unwrap ();
        assert_eq! (scheduler.get_inheritance ().unwrap (), InheritMode::Inherit);
    }

    #[test]
    fn every_policy_round_trips ()
    {
        let mut scheduler = PthreadAttrScheduler::new ().unwrap ();
        for policy in Policy::ALL
        {
            scheduler.set_policy (policy).unwrap ();
            assert_eq! (scheduler.get_policy ().unwrap (), policy);
        }
    }

    #[test]
    fn ranges_are_ordered_for_every_policy ()
    {
        let scheduler = PthreadAttrScheduler::new ().unwrap ();
        for policy in Policy::ALL
        {
            let range = scheduler.priority_range (policy).unwrap ();
            assert! (range.min () <= range.max (), "{} range inverted", policy);
        }
    }

    #[test]
    fn fifo_priority_round_trips ()
    {
        let mut scheduler = PthreadAttrScheduler::new ().unwrap ();
        scheduler.set_policy (Policy::Fifo).unwrap ();

        let range = scheduler.priority_range (Policy::Fifo).unwrap ();
        scheduler.set_priority (range.min ()).unwrap ();
        assert_eq! (scheduler.get_priority ().unwrap (), range.min ());
    }
}
