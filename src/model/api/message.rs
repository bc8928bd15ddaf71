use rocket::serde::json::Value;
use serde::{Deserialize, Serialize};

/// A plain acknowledgement, e.g. `{"message": "Vote updated"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Acknowledgement of a newly inserted document, carrying its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created {
    pub message: String,
    /// The identifier as rendered JSON; normally an ObjectId hex string.
    pub id: Value,
}

impl Created {
    pub fn new(message: impl Into<String>, id: Value) -> Self {
        Self {
            message: message.into(),
            id,
        }
    }
}
