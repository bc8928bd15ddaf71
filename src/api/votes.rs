use chrono::Utc;
use mongodb::bson::{doc, DateTime};
use rocket::{futures::TryStreamExt, http::Status, serde::json::Json, Route};

use crate::error::{Result, ResultExt};
use crate::model::{
    api::{
        message::Message,
        vote::{VoteDescription, VoteRequest},
    },
    common::PropertyRef,
    db::vote::{voter_filter, NewVote, Vote},
    mongodb::Coll,
};

pub fn routes() -> Vec<Route> {
    routes![cast_vote, property_votes, all_votes]
}

/// Record a user's vote on a property, or change it if they already voted.
///
/// The existence check and the write are separate operations, so two
/// concurrent votes from the same user on the same property can both miss
/// the existing vote and insert a duplicate, or one change can overwrite the
/// other. Nothing in the `votes` collection enforces uniqueness either.
#[post("/api/vote", data = "<ballot>", format = "json")]
async fn cast_vote(
    ballot: Json<VoteRequest>,
    votes: Coll<NewVote>,
) -> Result<(Status, Json<Message>)> {
    const ACTION: &str = "record vote";
    let ballot = ballot.into_inner();
    let filter = voter_filter(&ballot.property_id, &ballot.user_id);
    let now = Utc::now();

    let existing = votes.find_one(filter.clone(), None).await.or_fail(ACTION)?;
    if existing.is_some() {
        let update = doc! {
            "$set": {
                "vote": ballot.vote,
                "userName": ballot.user_name,
                "timestamp": DateTime::from_chrono(now),
            }
        };
        votes.update_one(filter, update, None).await.or_fail(ACTION)?;
        Ok((Status::Ok, Json(Message::new("Vote updated"))))
    } else {
        votes
            .insert_one(ballot.into_new_vote(now), None)
            .await
            .or_fail(ACTION)?;
        Ok((Status::Created, Json(Message::new("Vote recorded"))))
    }
}

#[get("/api/votes/<property_id>")]
async fn property_votes(
    property_id: PropertyRef,
    votes: Coll<Vote>,
) -> Result<Json<Vec<VoteDescription>>> {
    const ACTION: &str = "fetch votes";
    let filter = doc! {
        "propertyId": property_id,
    };
    let votes = votes
        .find(filter, None)
        .await
        .or_fail(ACTION)?
        .map_ok(VoteDescription::from)
        .try_collect::<Vec<_>>()
        .await
        .or_fail(ACTION)?;
    Ok(Json(votes))
}

#[get("/api/votes")]
async fn all_votes(votes: Coll<Vote>) -> Result<Json<Vec<VoteDescription>>> {
    const ACTION: &str = "fetch votes";
    let votes = votes
        .find(None, None)
        .await
        .or_fail(ACTION)?
        .map_ok(VoteDescription::from)
        .try_collect::<Vec<_>>()
        .await
        .or_fail(ACTION)?;
    Ok(Json(votes))
}

#[cfg(test)]
mod tests {
    use mongodb::{bson::Bson, Database};
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::{Client, LocalRequest},
        serde::json::{json, Value},
    };

    use super::*;
    use crate::model::{db::property::Property, mongodb::Id};

    fn vote_request<'c>(client: &'c Client, ballot: &VoteRequest) -> LocalRequest<'c> {
        client
            .post(uri!(cast_vote))
            .header(ContentType::JSON)
            .body(json!(ballot).to_string())
    }

    async fn cast(client: &Client, ballot: &VoteRequest) -> (Status, Message) {
        let response = vote_request(client, ballot).dispatch().await;
        (response.status(), response.into_json().await.unwrap())
    }

    async fn cast_raw(client: &Client, ballot: &Value) -> Status {
        client
            .post(uri!(cast_vote))
            .header(ContentType::JSON)
            .body(ballot.to_string())
            .dispatch()
            .await
            .status()
    }

    async fn votes_for(client: &Client, property: &str) -> Vec<VoteDescription> {
        let response = client
            .get(format!("/api/votes/{property}"))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        response.into_json().await.unwrap()
    }

    #[backend_test]
    async fn revote_changes_the_existing_vote(client: Client, db: Database, votes: Coll<Vote>) {
        let (status, message) = cast(&client, &VoteRequest::example("P1", "U1", "pro")).await;
        assert_eq!(Status::Created, status);
        assert_eq!(message.message, "Vote recorded");
        let first = votes.find_one(None, None).await.unwrap().unwrap();

        let mut changed = VoteRequest::example("P1", "U1", "contra");
        changed.user_name = "Renamed".into();
        let (status, message) = cast(&client, &changed).await;
        assert_eq!(Status::Ok, status);
        assert_eq!(message.message, "Vote updated");

        let stored = votes
            .find(doc! { "propertyId": "P1", "userId": "U1" }, None)
            .await
            .unwrap()
            .try_collect::<Vec<_>>()
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        let stored = &stored[0];
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.vote.vote, Bson::from("contra"));
        assert_eq!(stored.user_name, Bson::from("Renamed"));
        assert!(stored.timestamp >= first.timestamp);

        assert_eq!(
            Coll::<Vote>::from_db(&db)
                .count_documents(None, None)
                .await
                .unwrap(),
            1
        );
    }

    #[backend_test]
    async fn different_users_get_separate_votes(client: Client, votes: Coll<Vote>) {
        let (status, _) = cast(&client, &VoteRequest::example("P1", "U1", "pro")).await;
        assert_eq!(Status::Created, status);
        let (status, _) = cast(&client, &VoteRequest::example("P1", "U2", "contra")).await;
        assert_eq!(Status::Created, status);

        let count = votes
            .count_documents(doc! { "propertyId": "P1" }, None)
            .await
            .unwrap();
        assert_eq!(count, 2);

        let mut listed = votes_for(&client, "P1").await;
        listed.sort_by(|a, b| a.user_id.as_str().cmp(&b.user_id.as_str()));
        let choices = listed
            .iter()
            .map(|vote| (vote.user_id.as_str(), vote.vote.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(choices, vec![(Some("U1"), Some("pro")), (Some("U2"), Some("contra"))]);
        assert_ne!(listed[0].id, listed[1].id);
    }

    #[backend_test]
    async fn listing_filters_on_exact_property(client: Client) {
        cast(&client, &VoteRequest::example("P1", "U1", "pro")).await;
        cast(&client, &VoteRequest::example("P2", "U1", "pro")).await;
        cast(&client, &VoteRequest::example("p1", "U2", "contra")).await;

        let p1 = votes_for(&client, "P1").await;
        assert_eq!(p1.len(), 1);
        assert_eq!(p1[0].property_id, json!("P1"));

        assert!(votes_for(&client, "P3").await.is_empty());

        let response = client.get(uri!(all_votes)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let all: Vec<VoteDescription> = response.into_json().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[backend_test]
    async fn votes_outlive_their_property(client: Client, properties: Coll<Property>) {
        let property_id: Id = properties
            .insert_one(Property::example(), None)
            .await
            .unwrap()
            .inserted_id
            .as_object_id()
            .unwrap()
            .into();
        let property = property_id.to_string();
        cast(&client, &VoteRequest::example(&property, "U1", "pro")).await;

        let response = client
            .delete(format!("/api/properties/{property}"))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        assert_eq!(votes_for(&client, &property).await.len(), 1);
    }

    #[backend_test]
    async fn empty_ballot_is_accepted(client: Client, votes: Coll<NewVote>) {
        let (status, _) = cast(&client, &VoteRequest::default()).await;
        assert_eq!(Status::Created, status);
        let stored = votes.find_one(None, None).await.unwrap().unwrap();
        assert_eq!(stored.property_id, Bson::Null);
        assert_eq!(stored.vote, Bson::Null);

        // The second empty ballot matches the first one's nulls.
        let (status, _) = cast(&client, &VoteRequest::default()).await;
        assert_eq!(Status::Ok, status);
    }

    #[backend_test]
    async fn ballot_values_need_not_be_strings(client: Client, votes: Coll<Vote>) {
        let ballot = json!({
            "propertyId": "P1",
            "userId": 42,
            "userName": { "first": "Ada" },
            "vote": true,
        });
        assert_eq!(Status::Created, cast_raw(&client, &ballot).await);
        assert_eq!(Status::Ok, cast_raw(&client, &ballot).await);

        let stored = votes.find_one(None, None).await.unwrap().unwrap();
        assert!(matches!(stored.user_id, Bson::Int32(42) | Bson::Int64(42)));
        assert_eq!(votes.count_documents(None, None).await.unwrap(), 1);

        let listed = votes_for(&client, "P1").await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user_id, json!(42));
        assert_eq!(listed[0].user_name, json!({ "first": "Ada" }));
        assert_eq!(listed[0].vote, json!(true));

        let response = client.get(uri!(all_votes)).dispatch().await;
        let all: Value = response.into_json().await.unwrap();
        assert_eq!(all[0]["userId"], json!(42));
    }

    /// Simultaneous votes from the same user race between the lookup and the
    /// write: either one wins cleanly, or both insert.
    #[backend_test]
    async fn concurrent_revotes_race(client: Client, votes: Coll<Vote>) {
        let ballot = VoteRequest::example("P1", "U1", "pro");
        let (first, second) = rocket::tokio::join!(
            vote_request(&client, &ballot).dispatch(),
            vote_request(&client, &ballot).dispatch(),
        );
        for status in [first.status(), second.status()] {
            assert!(status == Status::Ok || status == Status::Created);
        }

        let count = votes
            .count_documents(doc! { "propertyId": "P1", "userId": "U1" }, None)
            .await
            .unwrap();
        assert!((1..=2).contains(&count), "expected one or two votes, got {count}");
    }
}
