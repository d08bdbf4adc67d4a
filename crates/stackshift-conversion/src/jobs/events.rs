//! Job progress events

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::model::{ConversionJob, JobStage, JobStatus};

/// Channel capacity for job events
const CHANNEL_CAPACITY: usize = 1024;

/// Published whenever a job changes stage or finishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEvent {
    pub job_id: String,
    pub project_id: String,
    pub stage: JobStage,
    pub progress: u8,
    pub status: JobStatus,
}

impl JobEvent {
    pub fn snapshot(job: &ConversionJob) -> Self {
        Self {
            job_id: job.id.clone(),
            project_id: job.project_id.clone(),
            stage: job.stage,
            progress: job.progress,
            status: job.status,
        }
    }
}

/// Broadcast bus for [`JobEvent`]s. Clones share the channel.
#[derive(Clone, Debug)]
pub struct JobEventBus {
    sender: broadcast::Sender<JobEvent>,
}

impl JobEventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish an event; dropped when nobody is listening
    pub fn publish(&self, event: JobEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for JobEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = JobEventBus::new();
        let job = ConversionJob::new("p", "react", "vue");
        bus.publish(JobEvent::snapshot(&job));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = JobEventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.clone().subscribe();

        let mut job = ConversionJob::new("p", "react", "vue");
        job.enter(JobStage::Parsing);
        bus.publish(JobEvent::snapshot(&job));

        let event = first.recv().await.unwrap();
        assert_eq!(event.stage, JobStage::Parsing);
        assert_eq!(event.progress, 20);
        assert_eq!(second.recv().await.unwrap(), event);
    }
}
