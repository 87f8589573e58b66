//! Individual subscriber handle.

use tokio::sync::mpsc;
use uuid::Uuid;

use loglens_core::events::ProcessingEvent;

/// Unique subscriber identifier.
pub type SubscriberId = Uuid;

/// Bus-side handle for one subscriber.
///
/// Holds the bounded sender for pushing events. The bus uses
/// `try_send`, so delivery to one subscriber never waits on another.
#[derive(Debug)]
pub struct SubscriberHandle {
    /// Unique subscriber ID.
    pub id: SubscriberId,
    /// Sender for outbound events.
    pub sender: mpsc::Sender<ProcessingEvent>,
}

impl SubscriberHandle {
    pub fn new(sender: mpsc::Sender<ProcessingEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
        }
    }
}
