/***************************************/
/*        REPORT PUBLISHER (MQTT)      */
/***************************************/

// Remote observers read the report from the broker instead of the
// worker's stdout. The message is retained, so an observer that
// subscribes while the worker holds still gets it.

use futures::executor::block_on;
use paho_mqtt::{self as mqtt};

use crate::attributes::ResolvedSchedule;
use crate::config;
use crate::error::ProbeError;

pub struct ReportPublisher
{
    client : mqtt::AsyncClient,

    /// Topic of this worker's report.
    topic  : String,

    /// Kernel thread id of the worker.
    tid    : u32,
}

impl ReportPublisher
{
    pub fn connect (broker: &str, tid: u32) -> Result<Self, ProbeError>
    {
        let create_opts = mqtt::CreateOptionsBuilder::new ()
            .server_uri (broker)
            .client_id (format! ("sched_probe_{}", tid))
            .finalize ();
        let client = mqtt::AsyncClient::new (create_opts)?;

        let conn_opts = mqtt::ConnectOptionsBuilder::new ()
            .connect_timeout (std::time::Duration::from_secs (config::BROKER_TIMEOUT_SECS))
            .clean_session (true)
            .finalize ();

        tracing::debug! (broker, "connecting");
        block_on (client.connect (conn_opts))?;

        Ok (Self { client, topic: report_topic (tid), tid })
    }

    pub fn publish (&self, schedule: &ResolvedSchedule) -> Result<(), ProbeError>
    {
        let message = mqtt::MessageBuilder::new ()
            .topic (self.topic.as_str ())
            .payload (report_payload (schedule, self.tid))
            .qos (config::QUALITY_OF_SERVICE)
            .retained (true)
            .finalize ();

        block_on (self.client.publish (message))?;
        tracing::info! (topic = %self.topic, "report published");
        Ok (())
    }

    pub fn disconnect (self)
    {
        if let Err (error) = block_on (self.client.disconnect (None))
        {
            tracing::warn! (%error, "disconnecting from the broker");
        }
    }
}

pub fn report_topic (tid: u32) -> String
{
    format! ("{}/{}/report", config::TOPIC_REPORT_PREFIX, tid)
}

/// The stdout report lines followed by the worker tid, one per line.
pub fn report_payload (schedule: &ResolvedSchedule, tid: u32) -> String
{
    let mut lines : Vec<String> = schedule.lines ().iter ().map (|line| line.to_string ()).collect ();
    lines.push (format! ("tid:{}", tid));
    lines.join ("\n")
}
