/***************************************/
/*           COMMAND LINE              */
/***************************************/

use sched_probe::{InheritMode, Policy, PriorityRequest, ProbeConfig};

/// Configure a real-time scheduling descriptor on a worker thread,
/// report it, and hold the worker for inspection.
#[derive(clap::Parser, Debug)]
#[command(name = "sched_probe", version)]
pub struct Args
{
    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config    : Option<std::path::PathBuf>,

    /// Inheritance mode: explicit, inherit
    #[arg(long = "inherit", value_name = "MODE")]
    pub inherit   : Option<InheritMode>,

    /// Scheduling policy: fifo, rr, other
    #[arg(long = "policy", value_name = "POLICY")]
    pub policy    : Option<Policy>,

    /// Priority: an integer, min or max
    #[arg(long = "priority", value_name = "N|min|max", allow_hyphen_values = true)]
    pub priority  : Option<PriorityRequest>,

    /// Apply the policy to the worker thread (needs CAP_SYS_NICE for real-time policies)
    #[arg(long = "apply")]
    pub apply     : bool,

    /// Pin the worker to this CPU
    #[arg(long = "affinity", value_name = "CPU")]
    pub affinity  : Option<usize>,

    /// Stop holding after this many seconds
    #[arg(long = "hold-secs", value_name = "SECS")]
    pub hold_secs : Option<u64>,

    /// Publish the report to this MQTT broker
    #[arg(long = "broker", value_name = "URI")]
    pub broker    : Option<String>,
}

impl Args
{
    /// The command line as a config layer.
    pub fn overrides (&self) -> ProbeConfig
    {
        ProbeConfig
        {
            inherit   : self.inherit,
            policy    : self.policy,
            priority  : self.priority,
            apply     : self.apply.then_some (true),
            affinity  : self.affinity,
            hold_secs : self.hold_secs,
            broker    : self.broker.clone (),
        }
    }
}
