/***************************************/
/*       F A K E   S C H E D U L E R   */
/***************************************/

// In-memory scheduler for tests, with Linux-like defaults and
// knobs to make single operations fail.

use std::cell::RefCell;

use super::Scheduler;
use crate::attributes::{InheritMode, Policy, PriorityRange};

pub struct FakeScheduler
{
    pub inherit        : InheritMode,
    pub policy         : Policy,
    pub priority       : i32,

    /// Range reported for (FIFO, RR, OTHER).
    pub ranges         : [(i32, i32); 3],

    /// Name of the operation that fails with EPERM.
    pub reject         : Option<&'static str>,

    /// Accept set_inheritance but keep the previous value.
    pub sticky_inherit : bool,

    /// Operations in call order.
    pub calls          : RefCell<Vec<&'static str>>,
}

impl FakeScheduler
{
    pub fn new () -> Self
    {
        Self
        {
            inherit        : InheritMode::Inherit,
            policy         : Policy::Other,
            priority       : 0,
            ranges         : [(1, 99), (1, 99), (0, 0)],
            reject         : None,
            sticky_inherit : false,
            calls          : RefCell::new (Vec::new ()),
        }
    }

    pub fn rejecting (operation: &'static str) -> Self
    {
        Self { reject: Some (operation), ..Self::new () }
    }

    pub fn calls (&self) -> Vec<&'static str>
    {
        self.calls.borrow ().clone ()
    }

    fn record (&self, operation: &'static str) -> std::io::Result<()>
    {
        self.calls.borrow_mut ().push (operation);
        if self.reject == Some (operation)
        {
            return Err (std::io::Error::from_raw_os_error (libc::EPERM));
        }
        Ok (())
    }
}

impl Scheduler for FakeScheduler
{
    fn set_inheritance (&mut self, mode: InheritMode) -> std::io::Result<()>
    {
        self.record ("set_inheritance")?;
        if !self.sticky_inherit
        {
            self.inherit = mode;
        }
        Ok (())
    }

    fn get_inheritance (&self) -> std::io::Result<InheritMode>
    {
        self.record ("get_inheritance")?;
        Ok (self.inherit)
    }

    fn set_policy (&mut self, policy: Policy) -> std::io::Result<()>
    {
        self.record ("set_policy")?;
        self.policy = policy;
        Ok (())
    }

    fn get_policy (&self) -> std::io::Result<Policy>
    {
        self.record ("get_policy")?;
        Ok (self.policy)
    }

    fn priority_range (&self, policy: Policy) -> std::io::Result<PriorityRange>
    {
        self.record ("priority_range")?;
        let (min, max) = match policy
        {
            Policy::Fifo       => self.ranges[0],
            Policy::RoundRobin => self.ranges[1],
            Policy::Other      => self.ranges[2],
        };
        PriorityRange::new (min, max).ok_or_else (||
            std::io::Error::from_raw_os_error (libc::EINVAL))
    }

    fn set_priority (&mut self, priority: i32) -> std::io::Result<()>
    {
        self.record ("set_priority")?;
        self.priority = priority;
        Ok (())
    }

    fn get_priority (&self) -> std::io::Result<i32>
    {
        self.record ("get_priority")?;
        Ok (self.priority)
    }

    fn apply_to_current_thread (&self) -> std::io::Result<()>
    {
        self.record ("apply_to_current_thread")
    }
}
