use chrono::Utc;
use mongodb::bson::{doc, oid::Error as OidError};
use rocket::{futures::TryStreamExt, http::Status, serde::json::Json, Route};

use crate::error::{Error, Result, ResultExt};
use crate::model::{
    api::{
        comment::{CommentDescription, CommentRequest},
        message::{Created, Message},
    },
    common::PropertyRef,
    db::comment::{Comment, NewComment},
    mongodb::{to_json, Coll, Id},
};

pub fn routes() -> Vec<Route> {
    routes![add_comment, property_comments, all_comments, delete_comment]
}

#[post("/api/comment", data = "<comment>", format = "json")]
async fn add_comment(
    comment: Json<CommentRequest>,
    comments: Coll<NewComment>,
) -> Result<(Status, Json<Created>)> {
    let result = comments
        .insert_one(comment.into_inner().into_new_comment(Utc::now()), None)
        .await
        .or_fail("add comment")?;
    let created = Created::new("Comment added", to_json(result.inserted_id));
    Ok((Status::Created, Json(created)))
}

#[get("/api/comments/<property_id>")]
async fn property_comments(
    property_id: PropertyRef,
    comments: Coll<Comment>,
) -> Result<Json<Vec<CommentDescription>>> {
    const ACTION: &str = "fetch comments";
    let filter = doc! {
        "propertyId": property_id,
    };
    let comments = comments
        .find(filter, None)
        .await
        .or_fail(ACTION)?
        .map_ok(CommentDescription::from)
        .try_collect::<Vec<_>>()
        .await
        .or_fail(ACTION)?;
    Ok(Json(comments))
}

#[get("/api/comments")]
async fn all_comments(comments: Coll<Comment>) -> Result<Json<Vec<CommentDescription>>> {
    const ACTION: &str = "fetch comments";
    let comments = comments
        .find(None, None)
        .await
        .or_fail(ACTION)?
        .map_ok(CommentDescription::from)
        .try_collect::<Vec<_>>()
        .await
        .or_fail(ACTION)?;
    Ok(Json(comments))
}

#[delete("/api/comment/<comment_id>")]
async fn delete_comment(
    comment_id: std::result::Result<Id, OidError>,
    comments: Coll<Comment>,
) -> Result<Json<Message>> {
    const ACTION: &str = "delete comment";
    let comment_id = comment_id.or_fail(ACTION)?;
    let result = comments
        .delete_one(comment_id.as_doc(), None)
        .await
        .or_fail(ACTION)?;
    if result.deleted_count == 0 {
        return Err(Error::NotFound("Comment"));
    }
    Ok(Json(Message::new("Comment deleted successfully")))
}
