//! In-memory broker stubs for exercising the vote pipeline

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shared::observability::MetricsCollector;
use shared::{DeliveryReceipt, MessageError, MessageQueue, MessageResult, OutboundRecord};

use crate::identity::IdentityManager;
use crate::pages::PageRenderer;
use crate::publisher::VotePublisher;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct RecordedMessage {
    pub topic: String,
    pub key: Vec<u8>,
    pub payload: Vec<u8>,
}

/// Acknowledges every record immediately and keeps a copy
pub struct RecordingQueue {
    records: Mutex<Vec<RecordedMessage>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<RecordedMessage> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MessageQueue for RecordingQueue {
    async fn publish(
        &self,
        record: OutboundRecord<'_>,
        _timeout: Duration,
    ) -> MessageResult<DeliveryReceipt> {
        let mut records = self.records.lock().unwrap();
        records.push(RecordedMessage {
            topic: record.topic.to_string(),
            key: record.key.to_vec(),
            payload: record.payload.to_vec(),
        });
        Ok(DeliveryReceipt {
            partition: 0,
            offset: records.len() as i64 - 1,
        })
    }

    fn flush(&self, _timeout: Duration) -> MessageResult<()> {
        Ok(())
    }
}

/// Bounded buffer that accepts records but never delivers them
pub struct SaturatedQueue {
    capacity: usize,
    buffered: AtomicUsize,
}

impl SaturatedQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffered: AtomicUsize::new(0),
        }
    }

    pub fn buffered(&self) -> usize {
        self.buffered.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MessageQueue for SaturatedQueue {
    async fn publish(
        &self,
        _record: OutboundRecord<'_>,
        _timeout: Duration,
    ) -> MessageResult<DeliveryReceipt> {
        let reserved = self
            .buffered
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.capacity).then_some(n + 1)
            });
        if reserved.is_err() {
            return Err(MessageError::QueueFull);
        }

        std::future::pending().await
    }

    fn flush(&self, timeout: Duration) -> MessageResult<()> {
        Err(MessageError::Timeout(timeout))
    }
}

/// Rejects every record as if the broker were down
pub struct FailingQueue;

#[async_trait::async_trait]
impl MessageQueue for FailingQueue {
    async fn publish(
        &self,
        _record: OutboundRecord<'_>,
        _timeout: Duration,
    ) -> MessageResult<DeliveryReceipt> {
        Err(MessageError::Delivery("broker unreachable".to_string()))
    }

    fn flush(&self, _timeout: Duration) -> MessageResult<()> {
        Ok(())
    }
}

/// Application state wired to `queue`; `None` simulates a producer that
/// failed to start.
pub fn test_state(queue: Option<Arc<dyn MessageQueue>>, delivery_timeout: Duration) -> AppState {
    let metrics = Arc::new(MetricsCollector::new());
    let publisher = match queue {
        Some(queue) => VotePublisher::new(queue, "votes", delivery_timeout, metrics.clone()),
        None => VotePublisher::unavailable("votes", delivery_timeout, metrics.clone()),
    };

    AppState {
        publisher: Arc::new(publisher),
        identities: Arc::new(IdentityManager::new(false)),
        pages: Arc::new(PageRenderer::new().unwrap()),
        metrics,
    }
}
