//! Kafka implementation of [`MessageQueue`] backed by librdkafka.
//!
//! Records go through a single `FutureProducer` whose local buffer is
//! bounded by `queue.buffering.max.messages`. Enqueueing never waits for
//! buffer space: a full buffer surfaces as [`MessageError::QueueFull`].
//! librdkafka's own log lines are forwarded to `tracing` under the
//! `librdkafka` target.

use std::time::Duration;

use rdkafka::client::ClientContext;
use rdkafka::config::{ClientConfig, RDKafkaLogLevel};
use rdkafka::error::KafkaError;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::types::RDKafkaErrorCode;
use tracing::{debug, error, info, warn};

use super::{DeliveryReceipt, MessageError, MessageQueue, MessageResult, OutboundRecord};

/// Kafka producer configuration
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub client_id: String,
    pub queue_max_messages: usize,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: "kafka:9092".to_string(),
            client_id: "voting-app-producer".to_string(),
            queue_max_messages: 100_000,
        }
    }
}

/// Routes librdkafka's internal logging and global errors through `tracing`
pub struct TracingContext;

impl ClientContext for TracingContext {
    fn log(&self, level: RDKafkaLogLevel, fac: &str, log_message: &str) {
        match level {
            RDKafkaLogLevel::Emerg
            | RDKafkaLogLevel::Alert
            | RDKafkaLogLevel::Critical
            | RDKafkaLogLevel::Error => {
                error!(target: "librdkafka", facility = fac, "{}", log_message)
            }
            RDKafkaLogLevel::Warning => warn!(target: "librdkafka", facility = fac, "{}", log_message),
            RDKafkaLogLevel::Notice | RDKafkaLogLevel::Info => {
                info!(target: "librdkafka", facility = fac, "{}", log_message)
            }
            RDKafkaLogLevel::Debug => debug!(target: "librdkafka", facility = fac, "{}", log_message),
        }
    }

    fn error(&self, err: KafkaError, reason: &str) {
        error!(target: "librdkafka", error = %err, "{}", reason);
    }
}

/// Process-wide Kafka producer
pub struct KafkaClient {
    producer: FutureProducer<TracingContext>,
    config: KafkaConfig,
}

impl KafkaClient {
    /// Build the producer. Broker connections are established lazily, so
    /// this only fails on configuration librdkafka rejects.
    pub fn new(config: KafkaConfig) -> MessageResult<Self> {
        let producer: FutureProducer<TracingContext> = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("client.id", &config.client_id)
            .set(
                "queue.buffering.max.messages",
                config.queue_max_messages.to_string(),
            )
            .set("acks", "all")
            .create_with_context(TracingContext)
            .map_err(|e| {
                MessageError::Configuration(format!(
                    "failed to create producer for {}: {}",
                    config.brokers, e
                ))
            })?;

        info!(
            brokers = %config.brokers,
            client_id = %config.client_id,
            "Kafka producer initialized"
        );

        Ok(Self { producer, config })
    }

    pub fn brokers(&self) -> &str {
        &self.config.brokers
    }
}

/// Map an enqueue failure onto the messaging taxonomy
fn classify_send_error(err: &KafkaError) -> MessageError {
    match err {
        KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull) => MessageError::QueueFull,
        other => MessageError::Delivery(other.to_string()),
    }
}

#[async_trait::async_trait]
impl MessageQueue for KafkaClient {
    async fn publish(
        &self,
        record: OutboundRecord<'_>,
        timeout: Duration,
    ) -> MessageResult<DeliveryReceipt> {
        let future_record = FutureRecord::to(record.topic)
            .key(record.key)
            .payload(record.payload);

        let delivery = self
            .producer
            .send_result(future_record)
            .map_err(|(err, _)| classify_send_error(&err))?;

        debug!(
            topic = %record.topic,
            payload_size = record.payload.len(),
            "Record enqueued, awaiting delivery report"
        );

        match tokio::time::timeout(timeout, delivery).await {
            Ok(Ok(Ok((partition, offset)))) => {
                info!(
                    topic = %record.topic,
                    partition,
                    offset,
                    "Message delivered"
                );
                Ok(DeliveryReceipt { partition, offset })
            }
            Ok(Ok(Err((err, _)))) => {
                error!(topic = %record.topic, error = %err, "Message delivery failed");
                Err(MessageError::Delivery(err.to_string()))
            }
            Ok(Err(_canceled)) => Err(MessageError::Connection(
                "producer dropped the delivery report".to_string(),
            )),
            Err(_elapsed) => Err(MessageError::Timeout(timeout)),
        }
    }

    fn flush(&self, timeout: Duration) -> MessageResult<()> {
        self.producer
            .flush(timeout)
            .map_err(|e| MessageError::Delivery(format!("flush failed: {}", e)))
    }
}
