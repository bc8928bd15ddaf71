use chrono::{DateTime, Utc};
use mongodb::bson::Bson;
use rocket::serde::json::Value;
use serde::{Deserialize, Serialize};

use crate::model::{
    db::comment::{Comment, NewComment},
    mongodb::to_json,
};

/// A comment as submitted by a client. Every field may hold any JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentRequest {
    pub property_id: Bson,
    pub user_id: Bson,
    pub user_name: Bson,
    pub text: Bson,
}

impl CommentRequest {
    /// The comment document to insert, stamped with the given time.
    pub fn into_new_comment(self, timestamp: DateTime<Utc>) -> NewComment {
        NewComment {
            property_id: self.property_id,
            user_id: self.user_id,
            user_name: self.user_name,
            text: self.text,
            timestamp,
        }
    }
}

/// A comment as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDescription {
    #[serde(rename = "_id")]
    pub id: String,
    pub property_id: Value,
    pub user_id: Value,
    pub user_name: Value,
    pub text: Value,
    pub timestamp: DateTime<Utc>,
}

impl From<Comment> for CommentDescription {
    fn from(comment: Comment) -> Self {
        let Comment { id, comment } = comment;
        Self {
            id: id.to_string(),
            property_id: to_json(comment.property_id),
            user_id: to_json(comment.user_id),
            user_name: to_json(comment.user_name),
            text: to_json(comment.text),
            timestamp: comment.timestamp,
        }
    }
}
