/// Messaging and event handling utilities
pub mod event_types;
pub mod kafka_client;

pub use event_types::*;
pub use kafka_client::{KafkaClient, KafkaConfig};

use std::time::Duration;

/// A keyed record bound for a broker topic
#[derive(Debug, Clone, Copy)]
pub struct OutboundRecord<'a> {
    pub topic: &'a str,
    pub key: &'a [u8],
    pub payload: &'a [u8],
}

/// Broker acknowledgement for a delivered record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub partition: i32,
    pub offset: i64,
}

/// Message queue trait for abstracting different messaging backends.
///
/// One instance is shared by every request handler for the life of the
/// process, so implementations must be safe to call concurrently.
#[async_trait::async_trait]
pub trait MessageQueue: Send + Sync {
    /// Enqueue a record and wait up to `timeout` for the broker to confirm it.
    ///
    /// A full producer buffer must return [`MessageError::QueueFull`]
    /// immediately instead of waiting for space.
    async fn publish(
        &self,
        record: OutboundRecord<'_>,
        timeout: Duration,
    ) -> MessageResult<DeliveryReceipt>;

    /// Wait for everything still buffered to be sent
    fn flush(&self, timeout: Duration) -> MessageResult<()>;
}

/// Message queue errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Producer queue is full")]
    QueueFull,

    #[error("Delivery not confirmed within {0:?}")]
    Timeout(Duration),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MessageError {
    /// Local buffer pressure rather than a broker-side failure
    pub fn is_backpressure(&self) -> bool {
        matches!(self, MessageError::QueueFull)
    }
}

pub type MessageResult<T> = Result<T, MessageError>;
