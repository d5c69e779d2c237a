//! Vote submission pipeline.
//!
//! `submit` validates a ballot, publishes it keyed by voter id and waits a
//! bounded time for the broker to confirm delivery, so a success reported to
//! the caller means the vote was actually sent. Nothing is retried here; the
//! error kind tells the caller whether retrying makes sense.

use std::sync::Arc;
use std::time::Duration;

use shared::observability::{metric_names, MetricsCollector};
use shared::{
    ClientIdentity, DeliveryReceipt, MessageError, MessageQueue, MessageResult, OutboundRecord,
    VoteChoice, VoteEvent,
};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// Successful, broker-confirmed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub event: VoteEvent,
    pub receipt: DeliveryReceipt,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The caller must adopt `fresh` before voting again
    #[error("Voter identity missing")]
    MissingIdentity { fresh: ClientIdentity },

    #[error("Invalid vote option: {0:?}")]
    InvalidChoice(String),

    #[error("Producer queue is full")]
    Busy,

    #[error("Broker failure: {0}")]
    BrokerFailure(String),

    #[error("Kafka producer is not available")]
    ProducerUnavailable,
}

impl SubmitError {
    /// Transient failures a caller may retry unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::Busy | SubmitError::BrokerFailure(_))
    }
}

/// Result of a single publish attempt
#[derive(Debug)]
enum DeliveryOutcome {
    Delivered(DeliveryReceipt),
    QueueFull,
    BrokerError(String),
}

impl From<MessageResult<DeliveryReceipt>> for DeliveryOutcome {
    fn from(result: MessageResult<DeliveryReceipt>) -> Self {
        match result {
            Ok(receipt) => DeliveryOutcome::Delivered(receipt),
            Err(err) if err.is_backpressure() => DeliveryOutcome::QueueFull,
            Err(err) => DeliveryOutcome::BrokerError(err.to_string()),
        }
    }
}

pub struct VotePublisher {
    queue: Option<Arc<dyn MessageQueue>>,
    topic: String,
    delivery_timeout: Duration,
    metrics: Arc<MetricsCollector>,
}

impl VotePublisher {
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        topic: impl Into<String>,
        delivery_timeout: Duration,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            queue: Some(queue),
            topic: topic.into(),
            delivery_timeout,
            metrics,
        }
    }

    /// Publisher for a process whose broker client failed to start. Every
    /// submission short-circuits to [`SubmitError::ProducerUnavailable`].
    pub fn unavailable(
        topic: impl Into<String>,
        delivery_timeout: Duration,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            queue: None,
            topic: topic.into(),
            delivery_timeout,
            metrics,
        }
    }

    pub fn is_available(&self) -> bool {
        self.queue.is_some()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[instrument(skip(self, identity), fields(topic = %self.topic))]
    pub async fn submit(
        &self,
        identity: Option<&ClientIdentity>,
        raw_choice: &str,
    ) -> Result<Ack, SubmitError> {
        let Some(queue) = self.queue.as_ref() else {
            error!("Kafka producer is not available");
            self.metrics.increment(metric_names::VOTES_PRODUCER_UNAVAILABLE);
            return Err(SubmitError::ProducerUnavailable);
        };

        let Some(identity) = identity else {
            let fresh = ClientIdentity::mint();
            warn!(fresh_voter_id = %fresh, "Vote attempt without voter_id");
            self.metrics.increment(metric_names::VOTES_MISSING_IDENTITY);
            return Err(SubmitError::MissingIdentity { fresh });
        };

        let vote: VoteChoice = raw_choice.parse().map_err(|_| {
            warn!(voter_id = %identity, "Invalid vote choice received");
            self.metrics.increment(metric_names::VOTES_REJECTED_INVALID);
            SubmitError::InvalidChoice(raw_choice.to_string())
        })?;

        let event = VoteEvent::new(identity.clone(), vote);
        let payload = event.to_payload().map_err(|e| {
            error!(error = %e, "Failed to serialize vote");
            self.metrics.increment(metric_names::VOTES_FAILED);
            SubmitError::BrokerFailure(e.to_string())
        })?;

        self.metrics.increment(metric_names::VOTES_SUBMITTED);
        info!(voter_id = %identity, vote = %vote, "Producing vote");

        let record = OutboundRecord {
            topic: &self.topic,
            key: event.partition_key(),
            payload: &payload,
        };

        // The queue is trusted to honour the timeout, but the wait stays
        // bounded even if it does not.
        let outcome: DeliveryOutcome = tokio::time::timeout(
            self.delivery_timeout,
            queue.publish(record, self.delivery_timeout),
        )
        .await
        .unwrap_or(Err(MessageError::Timeout(self.delivery_timeout)))
        .into();

        match outcome {
            DeliveryOutcome::Delivered(receipt) => {
                self.metrics.increment(metric_names::VOTES_DELIVERED);
                info!(
                    voter_id = %identity,
                    vote = %vote,
                    partition = receipt.partition,
                    offset = receipt.offset,
                    "Vote sent to Kafka"
                );
                Ok(Ack { event, receipt })
            }
            DeliveryOutcome::QueueFull => {
                self.metrics.increment(metric_names::VOTES_BUSY);
                error!("Kafka producer queue is full");
                Err(SubmitError::Busy)
            }
            DeliveryOutcome::BrokerError(cause) => {
                self.metrics.increment(metric_names::VOTES_FAILED);
                error!(error = %cause, "Error sending vote to Kafka");
                Err(SubmitError::BrokerFailure(cause))
            }
        }
    }

    /// Push out anything still buffered; used on shutdown
    pub fn flush(&self) -> MessageResult<()> {
        match self.queue.as_ref() {
            Some(queue) => queue.flush(self.delivery_timeout),
            None => Ok(()),
        }
    }
}
