/***************************************/
/*     S C H E D U L I N G   A T T R S  */
/***************************************/
use std::fmt::Display;

use serde::Deserialize;

use crate::config;

/// Whether a new thread copies the scheduling of its creator
/// or uses the attributes set explicitly on the descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritMode
{
    Explicit,
    Inherit,
}

impl InheritMode
{
    pub fn to_raw (self) -> libc::c_int
    {
        match self
        {
            InheritMode::Explicit => libc::PTHREAD_EXPLICIT_SCHED,
            InheritMode::Inherit  => libc::PTHREAD_INHERIT_SCHED,
        }
    }

    pub fn from_raw (raw: libc::c_int) -> Option<Self>
    {
        match raw
        {
            libc::PTHREAD_EXPLICIT_SCHED => Some (InheritMode::Explicit),
            libc::PTHREAD_INHERIT_SCHED  => Some (InheritMode::Inherit),
            _                            => None,
        }
    }

    pub fn name (self) -> &'static str
    {
        match self
        {
            InheritMode::Explicit => "PTHREAD_EXPLICIT_SCHED",
            InheritMode::Inherit  => "PTHREAD_INHERIT_SCHED",
        }
    }
}

impl std::str::FromStr for InheritMode
{
    type Err = ParseSettingError;

    fn from_str (s: &str) -> Result<Self, Self::Err>
    {
        match s.to_ascii_lowercase ().as_str ()
        {
            "explicit" => Ok (InheritMode::Explicit),
            "inherit"  => Ok (InheritMode::Inherit),
            _          => Err (ParseSettingError::new ("inheritance mode", s, "explicit, inherit")),
        }
    }
}

/// Scheduling policy of a thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Policy
{
    /// Real-time, no time slicing among peers of equal priority.
    #[serde(rename = "fifo")]
    Fifo,

    /// Real-time, time sliced among peers of equal priority.
    #[serde(rename = "rr", alias = "round_robin")]
    RoundRobin,

    /// The default best-effort time sharing policy.
    #[serde(rename = "other")]
    Other,
}

impl Policy
{
    pub const ALL : [Policy; 3] = [Policy::Fifo, Policy::RoundRobin, Policy::Other];

    pub fn to_raw (self) -> libc::c_int
    {
        match self
        {
            Policy::Fifo       => libc::SCHED_FIFO,
            Policy::RoundRobin => libc::SCHED_RR,
            Policy::Other      => libc::SCHED_OTHER,
        }
    }

    pub fn from_raw (raw: libc::c_int) -> Option<Self>
    {
        match raw
        {
            libc::SCHED_FIFO  => Some (Policy::Fifo),
            libc::SCHED_RR    => Some (Policy::RoundRobin),
            libc::SCHED_OTHER => Some (Policy::Other),
            _                 => None,
        }
    }

    pub fn name (self) -> &'static str
    {
        match self
        {
            Policy::Fifo       => "SCHED_FIFO",
            Policy::RoundRobin => "SCHED_RR",
            Policy::Other      => "SCHED_OTHER",
        }
    }
}

impl Display for Policy
{
    fn fmt (&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        write! (f, "{}", self.name ())
    }
}

impl std::str::FromStr for Policy
{
    type Err = ParseSettingError;

    fn from_str (s: &str) -> Result<Self, Self::Err>
    {
        match s.to_ascii_lowercase ().as_str ()
        {
            "fifo"                      => Ok (Policy::Fifo),
            "rr" | "round_robin"        => Ok (Policy::RoundRobin),
            "other"                     => Ok (Policy::Other),
            _ => Err (ParseSettingError::new ("policy", s, "fifo, rr, other")),
        }
    }
}

/// Closed interval of valid priorities for a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriorityRange
{
    min : i32,
    max : i32,
}

impl PriorityRange
{
    /// None when the bounds are inverted.
    pub fn new (min: i32, max: i32) -> Option<Self>
    {
        if min <= max { Some (Self { min, max }) } else { None }
    }

    pub fn min (&self) -> i32
    {
        self.min
    }

    pub fn max (&self) -> i32
    {
        self.max
    }

    pub fn contains (&self, priority: i32) -> bool
    {
        self.min <= priority && priority <= self.max
    }
}

/// The priority asked for, before it is checked against the platform range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPriority")]
pub enum PriorityRequest
{
    Value (i32),
    Min,
    Max,
}

impl PriorityRequest
{
    /// The concrete value for `range`. `Value` is returned as is,
    /// validation is up to the caller.
    pub fn resolve (self, range: &PriorityRange) -> i32
    {
        match self
        {
            PriorityRequest::Value (value) => value,
            PriorityRequest::Min           => range.min (),
            PriorityRequest::Max           => range.max (),
        }
    }
}

impl std::str::FromStr for PriorityRequest
{
    type Err = ParseSettingError;

    fn from_str (s: &str) -> Result<Self, Self::Err>
    {
        match s.to_ascii_lowercase ().as_str ()
        {
            "min" => Ok (PriorityRequest::Min),
            "max" => Ok (PriorityRequest::Max),
            other => other.parse::<i32> ()
                .map (PriorityRequest::Value)
                .map_err (|_| ParseSettingError::new ("priority", s, "an integer, min, max")),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPriority
{
    Value (i32),
    Named (String),
}

impl TryFrom<RawPriority> for PriorityRequest
{
    type Error = ParseSettingError;

    fn try_from (raw: RawPriority) -> Result<Self, Self::Error>
    {
        match raw
        {
            RawPriority::Value (value) => Ok (PriorityRequest::Value (value)),
            RawPriority::Named (name)  => name.parse (),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {setting} '{value}', expected one of: {expected}")]
pub struct ParseSettingError
{
    setting  : &'static str,
    value    : String,
    expected : &'static str,
}

impl ParseSettingError
{
    fn new (setting: &'static str, value: &str, expected: &'static str) -> Self
    {
        Self { setting, value: value.to_string (), expected }
    }
}

/// What the worker is asked to configure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeRequest
{
    pub inherit  : InheritMode,
    pub policy   : Policy,
    pub priority : PriorityRequest,

    /// Apply the descriptor to the calling thread before holding.
    pub apply    : bool,
}

impl Default for ProbeRequest
{
    fn default () -> Self
    {
        Self
        {
            inherit  : config::DEFAULT_INHERIT,
            policy   : config::DEFAULT_POLICY,
            priority : PriorityRequest::Value (config::DEFAULT_PRIORITY),
            apply    : false,
        }
    }
}

/// The settings as read back from the descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedSchedule
{
    pub inherit  : InheritMode,
    pub policy   : Policy,
    pub range    : PriorityRange,
    pub priority : i32,
}

impl ResolvedSchedule
{
    /// The report, in output order.
    pub fn lines (&self) -> [ReportLine; 5]
    {
        [
            ReportLine::Inheritance (self.inherit),
            ReportLine::Policy (self.policy),
            ReportLine::MaxPriority (self.range.max ()),
            ReportLine::MinPriority (self.range.min ()),
            ReportLine::Priority (self.priority),
        ]
    }
}

/// One line of the report on standard output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportLine
{
    Inheritance (InheritMode),
    Policy (Policy),
    MaxPriority (i32),
    MinPriority (i32),
    Priority (i32),
}

impl Display for ReportLine
{
    // Numbers are shown the way printf's %u shows an int.
    fn fmt (&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            ReportLine::Inheritance (mode)   => write! (f, "Inheritsched:{}", mode.name ()),
            ReportLine::Policy (policy)      => write! (f, "Schedpolicy:{}", policy.name ()),
            ReportLine::MaxPriority (value)  => write! (f, "Maxpriority:{}", *value as u32),
            ReportLine::MinPriority (value)  => write! (f, "Minpriority:{}", *value as u32),
            ReportLine::Priority (value)     => write! (f, "sched_priority:{}", *value as u32),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn raw_values_map_back ()
    {
        for policy in Policy::ALL
        {
            assert_eq! (Policy::from_raw (policy.to_raw ()), Some (policy));
        }
        assert_eq! (Policy::from_raw (libc::SCHED_BATCH), None);
        assert_eq! (InheritMode::from_raw (InheritMode::Inherit.to_raw ()), Some (InheritMode::Inherit));
        assert_eq! (InheritMode::from_raw (42), None);
    }

    #[test]
    fn report_lines_match_the_probe_format ()
    {
        let schedule = ResolvedSchedule
        {
            inherit  : InheritMode::Explicit,
            policy   : Policy::Fifo,
            range    : PriorityRange::new (1, 99).unwrap (),
            priority : 1,
        };

        let lines : Vec<String> = schedule.lines ().iter ().map (|l| l.to_string ()).collect ();
        assert_eq! (lines, vec![
            "Inheritsched:PTHREAD_EXPLICIT_SCHED",
            "Schedpolicy:SCHED_FIFO",
            "Maxpriority:99",
            "Minpriority:1",
            "sched_priority:1",
        ]);
        assert_eq! (ReportLine::Policy (Policy::RoundRobin).to_string (), "Schedpolicy:SCHED_RR");
        assert_eq! (ReportLine::Inheritance (InheritMode::Inherit).to_string (),
                    "Inheritsched:PTHREAD_INHERIT_SCHED");
    }

    #[test]
    fn negative_numbers_print_unsigned ()
    {
        assert_eq! (ReportLine::Priority (-1).to_string (), "sched_priority:4294967295");
    }

    #[test]
    fn range_bounds ()
    {
        assert! (PriorityRange::new (5, 1).is_none ());

        let range = PriorityRange::new (1, 99).unwrap ();
        assert! (range.contains (1));
        assert! (range.contains (99));
        assert! (!range.contains (0));
        assert! (!range.contains (100));

        let single = PriorityRange::new (0, 0).unwrap ();
        assert! (single.contains (0));
    }

    #[test]
    fn priority_request_parsing ()
    {
        assert_eq! ("1".parse::<PriorityRequest> (), Ok (PriorityRequest::Value (1)));
        assert_eq! ("-3".parse::<PriorityRequest> (), Ok (PriorityRequest::Value (-3)));
        assert_eq! ("MAX".parse::<PriorityRequest> (), Ok (PriorityRequest::Max));
        assert_eq! ("min".parse::<PriorityRequest> (), Ok (PriorityRequest::Min));
        assert! ("high".parse::<PriorityRequest> ().is_err ());

        let range = PriorityRange::new (1, 99).unwrap ();
        assert_eq! (PriorityRequest::Max.resolve (&range), 99);
        assert_eq! (PriorityRequest::Min.resolve (&range), 1);
        assert_eq! (PriorityRequest::Value (200).resolve (&range), 200);
    }

    #[test]
    fn setting_parsing ()
    {
        assert_eq! ("FIFO".parse::<Policy> (), Ok (Policy::Fifo));
        assert_eq! ("round_robin".parse::<Policy> (), Ok (Policy::RoundRobin));
        assert_eq! ("inherit".parse::<InheritMode> (), Ok (InheritMode::Inherit));

        let error = "deadline".parse::<Policy> ().unwrap_err ();
        assert_eq! (error.to_string (), "invalid policy 'deadline', expected one of: fifo, rr, other");
    }
}
