//! Shared type definitions for the voting backend
//!
//! - Voter identity and ballot options
//! - Error types and validation utilities

pub mod error;
pub mod vote;

pub use error::CommonError;
pub use vote::{ClientIdentity, VoteChoice};
