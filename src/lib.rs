/***************************************/
/*   R E A L - T I M E   P R O B E     */
/***************************************/

//! Spawn one worker, give it a real-time scheduling descriptor,
//! print what the platform accepted and keep the worker spinning
//! so its scheduling class can be inspected with `ps`.

pub mod attributes;
pub mod config;
pub mod error;
pub mod launcher;
pub mod linux_utils;
pub mod publisher;
pub mod reporter;
pub mod scheduler;

pub use attributes::{InheritMode, Policy, PriorityRange, PriorityRequest, ProbeRequest, ReportLine, ResolvedSchedule};
pub use config::ProbeConfig;
pub use error::ProbeError;
pub use launcher::{run_probe, Launcher};
pub use reporter::{ReporterState, SchedulingReporter, StopToken};
pub use scheduler::{PthreadAttrScheduler, Scheduler};
