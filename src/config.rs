/***************************************/
/*           CONFIGURATION             */
/***************************************/

// Built-in defaults, an optional TOML file and the merge
// of both with the command line overrides.

use serde::Deserialize;

use crate::attributes::{InheritMode, Policy, PriorityRequest, ProbeRequest};
use crate::error::ProbeError;

///     DEFAULTS
/// Values used when neither the file nor the command line say otherwise.

// Priority requested for the worker.
pub static DEFAULT_PRIORITY : i32 = 1;

// Default inheritance mode and policy.
pub static DEFAULT_INHERIT : InheritMode = InheritMode::Explicit;
pub static DEFAULT_POLICY  : Policy      = Policy::Fifo;

// Name of the worker thread, visible in /proc/<pid>/task/<tid>/comm.
pub static WORKER_THREAD_NAME : &str = "sched-probe";

///     COMMUNICATION
/// MQTT report publication.

// Topic is TOPIC_REPORT_PREFIX/<tid>/report.
pub static TOPIC_REPORT_PREFIX : &str = "sched_probe";

// Send exactly once.
pub static QUALITY_OF_SERVICE : i32 = 1;

// Seconds to wait for the broker before giving up.
pub static BROKER_TIMEOUT_SECS : u64 = 5;

/// The probe configuration, as read from a TOML file.
/// Every field is optional, missing fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig
{
    pub inherit   : Option<InheritMode>,
    pub policy    : Option<Policy>,
    pub priority  : Option<PriorityRequest>,

    /// Apply the resolved attributes to the worker thread.
    pub apply     : Option<bool>,

    /// CPU the worker is pinned to.
    pub affinity  : Option<usize>,

    /// Hold duration in seconds, unbounded when missing.
    pub hold_secs : Option<u64>,

    /// MQTT broker URI for the report, e.g. mqtt://localhost:1883.
    pub broker    : Option<String>,
}

impl ProbeConfig
{
    pub fn load (path: &std::path::Path) -> Result<Self, ProbeError>
    {
        let content = std::fs::read_to_string (path)
            .map_err (|source| ProbeError::ConfigRead { path: path.to_path_buf (), source })?;

        Self::parse (&content)
            .map_err (|source| ProbeError::ConfigParse { path: path.to_path_buf (), source })
    }

    pub fn parse (content: &str) -> Result<Self, toml::de::Error>
    {
        toml::from_str (content)
    }

    /// Layer `other` on top of `self`: fields set in `other` win.
    pub fn merge (self, other: ProbeConfig) -> ProbeConfig
    {
        ProbeConfig
        {
            inherit   : other.inherit.or (self.inherit),
            policy    : other.policy.or (self.policy),
            priority  : other.priority.or (self.priority),
            apply     : other.apply.or (self.apply),
            affinity  : other.affinity.or (self.affinity),
            hold_secs : other.hold_secs.or (self.hold_secs),
            broker    : other.broker.or (self.broker),
        }
    }

    pub fn request (&self) -> ProbeRequest
    {
        let defaults = ProbeRequest::default ();
        ProbeRequest
        {
            inherit  : self.inherit.unwrap_or (defaults.inherit),
            policy   : self.policy.unwrap_or (defaults.policy),
            priority : self.priority.unwrap_or (defaults.priority),
            apply    : self.apply.unwrap_or (defaults.apply),
        }
    }

    pub fn hold_duration (&self) -> Option<std::time::Duration>
    {
        self.hold_secs.map (std::time::Duration::from_secs)
    }
}
