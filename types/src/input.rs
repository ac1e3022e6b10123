//! Inputs accepted by the RPC procedures, with the checks each one must pass
//! before the store is touched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("id must be a positive integer")]
    NonPositiveId,
    /// The payload could not be decoded into the expected input shape.
    #[error("malformed input: {0}")]
    Malformed(String),
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmailInput {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl CreateEmailInput {
    /// `body` may be empty; the other fields may not.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Sender", &self.sender)?;
        require("Recipient", &self.recipient)?;
        require("Subject", &self.subject)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetEmailsByRecipientInput {
    pub recipient: String,
}

impl GetEmailsByRecipientInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Recipient", &self.recipient)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetEmailByIdInput {
    pub id: i64,
}

impl GetEmailByIdInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id <= 0 {
            return Err(ValidationError::NonPositiveId);
        }
        Ok(())
    }
}
