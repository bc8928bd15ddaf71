use std::ops::Deref;

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, serde_helpers::chrono_datetime_as_bson_datetime, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core vote data, as stored in the database.
///
/// Each field other than `timestamp` is whatever JSON value the client sent;
/// absent fields are stored as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCore {
    #[serde(default)]
    pub property_id: Bson,
    #[serde(default)]
    pub user_id: Bson,
    #[serde(default)]
    pub user_name: Bson,
    /// Conventionally `"pro"` or `"contra"`.
    #[serde(default)]
    pub vote: Bson,
    /// When the vote was cast or last changed.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

impl VoteCore {
    /// Filter matching this user's vote on this property.
    pub fn voter_filter(&self) -> Document {
        voter_filter(&self.property_id, &self.user_id)
    }
}

/// Filter matching the vote a given user cast on a given property.
///
/// Values compare by BSON equality, so `"7"` and `7` are different users.
pub fn voter_filter(property_id: &Bson, user_id: &Bson) -> Document {
    doc! {
        "propertyId": property_id.clone(),
        "userId": user_id.clone(),
    }
}

/// A vote without an ID.
pub type NewVote = VoteCore;

/// A vote from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub vote: VoteCore,
}

impl Deref for Vote {
    type Target = VoteCore;

    fn deref(&self) -> &Self::Target {
        &self.vote
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl VoteCore {
        pub fn example() -> Self {
            Self {
                property_id: "P1".into(),
                user_id: "U1".into(),
                user_name: "Ada".into(),
                vote: "pro".into(),
                timestamp: Utc::now(),
            }
        }
    }
}
