//! Shared vote types, broker messaging and observability for the voting backend

pub mod messaging;
pub mod observability;
pub mod types;

pub use messaging::{
    DeliveryReceipt, KafkaClient, KafkaConfig, MessageError, MessageQueue, MessageResult,
    OutboundRecord, VoteEvent,
};
pub use types::{ClientIdentity, CommonError, VoteChoice};
