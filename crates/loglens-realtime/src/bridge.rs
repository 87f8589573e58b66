//! Translates queue transitions into subscriber-facing events.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use loglens_core::events::{ProcessingEvent, QueueEvent};

use crate::bus::EventBus;

/// Consumes the queue's transition broadcast and publishes a
/// human-readable [`ProcessingEvent`] for each transition.
#[derive(Debug)]
pub struct QueueEventBridge {
    bus: Arc<EventBus>,
}

impl QueueEventBridge {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// Spawn the bridge task. It runs until the queue side of the
    /// broadcast channel is dropped.
    pub fn spawn(self, mut events: broadcast::Receiver<QueueEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => self.bus.publish(&Self::translate(&event)),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "Event bridge lagged behind the queue");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Queue event channel closed, bridge stopping");
                        break;
                    }
                }
            }
        })
    }

    /// Map one queue transition to its subscriber-facing form.
    pub fn translate(event: &QueueEvent) -> ProcessingEvent {
        match event {
            QueueEvent::Waiting { job_id } => {
                ProcessingEvent::info(format!("Job {job_id} is waiting to be processed"))
            }
            QueueEvent::Active { job_id, attempt } => ProcessingEvent::info(format!(
                "Started processing job {job_id} (attempt {attempt})"
            ))
            .with_progress(0),
            QueueEvent::Progress { job_id, progress } => {
                ProcessingEvent::info(format!("Job {job_id} is {progress}% complete"))
                    .with_progress(*progress)
            }
            QueueEvent::Completed { job_id, details } => {
                ProcessingEvent::success(format!("Job {job_id} completed"))
                    .with_progress(100)
                    .with_details(details.clone())
            }
            QueueEvent::Failed {
                job_id,
                error,
                will_retry: true,
            } => ProcessingEvent::warning(format!("Job {job_id} failed, retrying: {error}")),
            QueueEvent::Failed {
                job_id,
                error,
                will_retry: false,
            } => ProcessingEvent::error(format!("Job {job_id} failed: {error}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loglens_core::events::{CompletionDetails, EventKind};
    use uuid::Uuid;

    #[test]
    fn maps_transitions_to_kinds() {
        let job_id = Uuid::new_v4();

        let waiting = QueueEventBridge::translate(&QueueEvent::Waiting { job_id });
        assert_eq!(waiting.kind, EventKind::Info);

        let progress = QueueEventBridge::translate(&QueueEvent::Progress {
            job_id,
            progress: 45,
        });
        assert_eq!(progress.kind, EventKind::Info);
        assert_eq!(progress.progress, Some(45));

        let completed = QueueEventBridge::translate(&QueueEvent::Completed {
            job_id,
            details: CompletionDetails {
                file_id: "f1".into(),
                keywords: Default::default(),
                unique_ips: vec!["10.0.0.1".into()],
            },
        });
        assert_eq!(completed.kind, EventKind::Success);
        assert_eq!(completed.progress, Some(100));
        assert_eq!(completed.details.as_ref().unwrap().file_id, "f1");

        let retrying = QueueEventBridge::translate(&QueueEvent::Failed {
            job_id,
            error: "io".into(),
            will_retry: true,
        });
        assert_eq!(retrying.kind, EventKind::Warning);

        let terminal = QueueEventBridge::translate(&QueueEvent::Failed {
            job_id,
            error: "io".into(),
            will_retry: false,
        });
        assert_eq!(terminal.kind, EventKind::Error);
    }

    #[tokio::test]
    async fn forwards_queue_events_to_subscribers() {
        let bus = Arc::new(EventBus::new(16));
        let (tx, rx) = broadcast::channel(16);
        let handle = QueueEventBridge::new(Arc::clone(&bus)).spawn(rx);

        let mut sub = bus.subscribe();
        let job_id = Uuid::new_v4();
        tx.send(QueueEvent::Waiting { job_id }).unwrap();

        let event = sub.receiver.recv().await.unwrap();
        assert!(event.message.contains(&job_id.to_string()));

        drop(tx);
        handle.await.unwrap();
    }
}
