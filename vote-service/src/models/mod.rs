pub mod error;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    Success,
    Error,
}

/// JSON body returned by `POST /vote`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    pub status: VoteStatus,
    pub message: String,
}

impl VoteResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: VoteStatus::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: VoteStatus::Error,
            message: message.into(),
        }
    }
}

/// Form body of `POST /vote`
#[derive(Debug, Deserialize)]
pub struct VoteForm {
    #[serde(default)]
    pub vote: Option<String>,
}
