use std::ops::Deref;

use chrono::{DateTime, Utc};
use mongodb::bson::{serde_helpers::chrono_datetime_as_bson_datetime, Bson};
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Core comment data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCore {
    #[serde(default)]
    pub property_id: Bson,
    #[serde(default)]
    pub user_id: Bson,
    #[serde(default)]
    pub user_name: Bson,
    #[serde(default)]
    pub text: Bson,
    /// When the comment was posted.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

/// A comment without an ID.
pub type NewComment = CommentCore;

/// A comment from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub comment: CommentCore,
}

impl Deref for Comment {
    type Target = CommentCore;

    fn deref(&self) -> &Self::Target {
        &self.comment
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl CommentCore {
        pub fn example() -> Self {
            Self {
                property_id: "P1".into(),
                user_id: "U1".into(),
                user_name: "Ada".into(),
                text: "Great view from the terrace".into(),
                timestamp: Utc::now(),
            }
        }
    }
}
