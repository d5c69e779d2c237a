use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::error::CommonError;

/// Opaque per-client identifier carried in the `voter_id` cookie.
///
/// Freshly minted identities are random UUIDv4 strings. Identities coming
/// back from a client are accepted verbatim as long as they are non-empty;
/// the value is never parsed or interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Mint a new random 128-bit identity
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a client-supplied token. Empty tokens are not identities.
    pub fn from_token(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Partition key bytes for broker records
    pub fn key_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two accepted ballot options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteChoice {
    Cats,
    Dogs,
}

impl VoteChoice {
    pub const ALL: [VoteChoice; 2] = [VoteChoice::Cats, VoteChoice::Dogs];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Cats => "Cats",
            VoteChoice::Dogs => "Dogs",
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteChoice {
    type Err = CommonError;

    /// Exact, case-sensitive match. Surrounding whitespace is not stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cats" => Ok(VoteChoice::Cats),
            "Dogs" => Ok(VoteChoice::Dogs),
            other => Err(CommonError::InvalidInput(format!(
                "unknown vote option '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_identities_are_unique_and_url_safe() {
        let a = ClientIdentity::mint();
        let b = ClientIdentity::mint();

        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
        assert!(a
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '-'));
    }

    #[test]
    fn test_empty_token_is_not_an_identity() {
        assert!(ClientIdentity::from_token("").is_none());
        assert_eq!(
            ClientIdentity::from_token("abc").unwrap().as_str(),
            "abc"
        );
    }

    #[test]
    fn test_choice_parsing_is_exact() {
        assert_eq!("Cats".parse::<VoteChoice>().unwrap(), VoteChoice::Cats);
        assert_eq!("Dogs".parse::<VoteChoice>().unwrap(), VoteChoice::Dogs);

        for raw in ["", "cats", "DOGS", " Cats", "Dogs ", "Elephants", "Cats\n"] {
            assert!(raw.parse::<VoteChoice>().is_err(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn test_choice_round_trips_through_display() {
        for choice in VoteChoice::ALL {
            assert_eq!(choice.to_string().parse::<VoteChoice>().unwrap(), choice);
        }
    }
}
