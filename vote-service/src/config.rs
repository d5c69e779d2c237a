use std::time::Duration;

use anyhow::{ensure, Context, Result};
use shared::observability::LogFormat;
use shared::KafkaConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub kafka: KafkaConfig,
    pub voting: VotingConfig,
    pub secure_cookies: bool,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct VotingConfig {
    pub topic: String,
    pub delivery_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset variables take their
    /// defaults; set but unparsable ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let queue_max_messages: usize = var("KAFKA_QUEUE_MAX_MESSAGES", "100000")
            .parse()
            .context("KAFKA_QUEUE_MAX_MESSAGES must be a positive integer")?;
        ensure!(
            queue_max_messages > 0,
            "KAFKA_QUEUE_MAX_MESSAGES must be a positive integer"
        );

        let delivery_timeout_secs: u64 = var("DELIVERY_TIMEOUT_SECS", "5")
            .parse()
            .context("DELIVERY_TIMEOUT_SECS must be a whole number of seconds")?;
        ensure!(
            delivery_timeout_secs > 0,
            "DELIVERY_TIMEOUT_SECS must be at least one second"
        );

        Ok(Self {
            server: ServerConfig {
                host: var("SERVER_HOST", "0.0.0.0"),
                port: var("SERVER_PORT", "80")
                    .parse()
                    .context("SERVER_PORT must be a port number")?,
            },
            kafka: KafkaConfig {
                brokers: var("KAFKA_BROKERS", "kafka:9092"),
                client_id: var("KAFKA_CLIENT_ID", "voting-app-producer"),
                queue_max_messages,
            },
            voting: VotingConfig {
                topic: var("KAFKA_TOPIC", "votes"),
                delivery_timeout: Duration::from_secs(delivery_timeout_secs),
            },
            secure_cookies: var("SECURE_COOKIES", "false")
                .parse()
                .context("SECURE_COOKIES must be true or false")?,
            log_format: var("LOG_FORMAT", "pretty")
                .parse()
                .context("LOG_FORMAT must be pretty, json or compact")?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
