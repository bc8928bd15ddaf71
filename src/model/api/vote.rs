use chrono::{DateTime, Utc};
use mongodb::bson::Bson;
use rocket::serde::json::Value;
use serde::{Deserialize, Serialize};

use crate::model::{
    db::vote::{NewVote, Vote},
    mongodb::to_json,
};

/// A vote as submitted by a client.
///
/// Nothing is required and any JSON value is accepted for each field; the
/// service stores what it is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoteRequest {
    pub property_id: Bson,
    pub user_id: Bson,
    pub user_name: Bson,
    pub vote: Bson,
}

impl VoteRequest {
    /// The vote document to insert, stamped with the given time.
    pub fn into_new_vote(self, timestamp: DateTime<Utc>) -> NewVote {
        NewVote {
            property_id: self.property_id,
            user_id: self.user_id,
            user_name: self.user_name,
            vote: self.vote,
            timestamp,
        }
    }
}

/// A vote as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDescription {
    #[serde(rename = "_id")]
    pub id: String,
    pub property_id: Value,
    pub user_id: Value,
    pub user_name: Value,
    pub vote: Value,
    pub timestamp: DateTime<Utc>,
}

impl From<Vote> for VoteDescription {
    fn from(vote: Vote) -> Self {
        let Vote { id, vote } = vote;
        Self {
            id: id.to_string(),
            property_id: to_json(vote.property_id),
            user_id: to_json(vote.user_id),
            user_name: to_json(vote.user_name),
            vote: to_json(vote.vote),
            timestamp: vote.timestamp,
        }
    }
}


#[cfg(test)]
mod tests {
    use rocket::serde::json::{
        json,
        serde_json::{from_value, to_value},
    };

    use super::*;
    use crate::model::mongodb::Id;

    #[test]
    fn request_fields_are_all_optional() {
        let request: VoteRequest = from_value(json!({ "userId": "U1" })).unwrap();
        assert_eq!(
            request,
            VoteRequest {
                user_id: "U1".into(),
                ..Default::default()
            }
        );
        assert_eq!(request.vote, Bson::Null);
    }

    #[test]
    fn request_accepts_any_json_values() {
        let request: VoteRequest = from_value(json!({
            "propertyId": 7,
            "userId": { "provider": "github", "login": "ada" },
            "userName": null,
            "vote": ["pro"],
        }))
        .unwrap();
        assert!(matches!(request.property_id, Bson::Int32(7) | Bson::Int64(7)));
        assert!(matches!(request.user_id, Bson::Document(_)));
        assert_eq!(request.user_name, Bson::Null);
        assert!(matches!(request.vote, Bson::Array(_)));
    }

    #[test]
    fn description_uses_client_field_names() {
        let vote = Vote {
            id: Id::new(),
            vote: NewVote::example(),
        };
        let id = vote.id.to_string();
        let rendered = to_value(VoteDescription::from(vote)).unwrap();
        assert_eq!(rendered["_id"], json!(id));
        assert_eq!(rendered["propertyId"], json!("P1"));
        assert_eq!(rendered["userName"], json!("Ada"));
        assert_eq!(rendered["vote"], json!("pro"));
        assert!(rendered["timestamp"].is_string());
    }

    #[test]
    fn description_renders_stored_values_as_plain_json() {
        let vote = Vote {
            id: Id::new(),
            vote: NewVote {
                property_id: Bson::Int64(7),
                user_id: Bson::Null,
                ..NewVote::example()
            },
        };
        let rendered = to_value(VoteDescription::from(vote)).unwrap();
        assert_eq!(rendered["propertyId"], json!(7));
        assert_eq!(rendered["userId"], Value::Null);
    }
}
