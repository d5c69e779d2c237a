use serde::{Deserialize, Serialize};

use super::{MessageError, MessageResult};
use crate::types::{ClientIdentity, VoteChoice};

/// A single ballot as published to the votes topic.
///
/// Field order is part of the wire format: consumers receive
/// `{"voter_id":"...","vote":"Cats"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEvent {
    pub voter_id: ClientIdentity,
    pub vote: VoteChoice,
}

impl VoteEvent {
    pub fn new(voter_id: ClientIdentity, vote: VoteChoice) -> Self {
        Self { voter_id, vote }
    }

    /// Record key; keeps every ballot from one voter on one partition
    pub fn partition_key(&self) -> &[u8] {
        self.voter_id.key_bytes()
    }

    /// Canonical UTF-8 JSON encoding
    pub fn to_payload(&self) -> MessageResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| MessageError::Serialization(e.to_string()))
    }

    pub fn from_payload(payload: &[u8]) -> MessageResult<Self> {
        serde_json::from_slice(payload).map_err(|e| MessageError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn voter(token: &str) -> ClientIdentity {
        ClientIdentity::from_token(token).unwrap()
    }

    #[test]
    fn test_payload_field_order() {
        let event = VoteEvent::new(voter("voter-1"), VoteChoice::Cats);
        let payload = event.to_payload().unwrap();

        assert_eq!(
            String::from_utf8(payload).unwrap(),
            r#"{"voter_id":"voter-1","vote":"Cats"}"#
        );
    }

    #[test]
    fn test_payload_is_deterministic() {
        let first = VoteEvent::new(voter("voter-2"), VoteChoice::Dogs).to_payload().unwrap();
        let second = VoteEvent::new(voter("voter-2"), VoteChoice::Dogs).to_payload().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_partition_key_is_voter_id() {
        let event = VoteEvent::new(voter("voter-3"), VoteChoice::Dogs);
        assert_eq!(event.partition_key(), b"voter-3");
    }

    #[test]
    fn test_consumer_can_decode_payload() {
        let decoded =
            VoteEvent::from_payload(br#"{"voter_id":"voter-4","vote":"Dogs"}"#).unwrap();

        assert_eq!(decoded, VoteEvent::new(voter("voter-4"), VoteChoice::Dogs));
    }

    #[test]
    fn test_unknown_vote_is_rejected_on_decode() {
        let err = VoteEvent::from_payload(br#"{"voter_id":"v","vote":"Elephants"}"#)
            .unwrap_err();

        assert!(matches!(err, MessageError::Serialization(_)));
    }
}
