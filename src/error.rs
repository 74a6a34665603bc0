/***************************************/
/*              ERRORS                 */
/***************************************/

use crate::attributes::Policy;

/// Every failure that stops the probe. All of them are fatal to
/// the worker and surface to the launcher unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError
{
    /// The platform refused a set operation.
    #[error("setting {setting} was rejected: {source}")]
    ConfigurationRejected
    {
        setting : &'static str,
        source  : std::io::Error,
    },

    /// The platform could not report the priority bounds.
    #[error("querying the priority range of {policy} failed: {source}")]
    QueryFailed
    {
        policy : Policy,
        source : std::io::Error,
    },

    #[error("reading back {setting} failed: {source}")]
    ReadBackFailed
    {
        setting : &'static str,
        source  : std::io::Error,
    },

    #[error("priority {priority} is outside the range [{min}, {max}] of {policy}")]
    OutOfRange
    {
        priority : i32,
        policy   : Policy,
        min      : i32,
        max      : i32,
    },

    #[error("writing the report failed: {0}")]
    Output (#[source] std::io::Error),

    #[error("reading config file {}: {source}", path.display())]
    ConfigRead
    {
        path   : std::path::PathBuf,
        source : std::io::Error,
    },

    #[error("parsing config file {}: {source}", path.display())]
    ConfigParse
    {
        path   : std::path::PathBuf,
        source : toml::de::Error,
    },

    #[error("spawning the worker thread failed: {0}")]
    Spawn (#[source] std::io::Error),

    #[error("the worker thread panicked")]
    WorkerPanicked,

    #[error("publishing the report failed: {0}")]
    Publish (#[from] paho_mqtt::Error),
}
