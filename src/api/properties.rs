use mongodb::bson::{doc, oid::Error as OidError, Document};
use rocket::{
    futures::TryStreamExt,
    http::Status,
    serde::json::{Json, Value},
    Route,
};

use crate::error::{Error, Result, ResultExt};
use crate::model::{
    api::message::{Created, Message},
    db::property::{update_fields, Property},
    mongodb::{to_json, Coll, Id},
};

pub fn routes() -> Vec<Route> {
    routes![
        properties,
        property,
        create_property,
        update_property,
        delete_property,
    ]
}

#[get("/api/properties")]
async fn properties(properties: Coll<Property>) -> Result<Json<Vec<Value>>> {
    const ACTION: &str = "fetch properties";
    let listing = properties
        .find(None, None)
        .await
        .or_fail(ACTION)?
        .map_ok(Property::into_json)
        .try_collect::<Vec<_>>()
        .await
        .or_fail(ACTION)?;
    Ok(Json(listing))
}

#[get("/api/properties/<property_id>")]
async fn property(
    property_id: std::result::Result<Id, OidError>,
    properties: Coll<Property>,
) -> Result<Json<Value>> {
    const ACTION: &str = "fetch property";
    let property_id = property_id.or_fail(ACTION)?;
    let property = properties
        .find_one(property_id.as_doc(), None)
        .await
        .or_fail(ACTION)?
        .ok_or(Error::NotFound("Property"))?;
    Ok(Json(property.into_json()))
}

/// Insert the body verbatim as a new property.
#[post("/api/properties", data = "<property>", format = "json")]
async fn create_property(
    property: Json<Document>,
    properties: Coll<Property>,
) -> Result<(Status, Json<Created>)> {
    let result = properties
        .insert_one(Property::from(property.into_inner()), None)
        .await
        .or_fail("create property")?;
    let created = Created::new("Property created", to_json(result.inserted_id));
    Ok((Status::Created, Json(created)))
}

/// Merge the body's fields into an existing property. Fields not in the
/// body are left alone.
#[put("/api/properties/<property_id>", data = "<changes>", format = "json")]
async fn update_property(
    property_id: std::result::Result<Id, OidError>,
    changes: Json<Document>,
    properties: Coll<Property>,
) -> Result<Json<Message>> {
    const ACTION: &str = "update property";
    let property_id = property_id.or_fail(ACTION)?;
    let update = doc! {
        "$set": update_fields(changes.into_inner()),
    };
    let result = properties
        .update_one(property_id.as_doc(), update, None)
        .await
        .or_fail(ACTION)?;
    if result.matched_count == 0 {
        return Err(Error::NotFound("Property"));
    }
    Ok(Json(Message::new("Property updated successfully")))
}

/// Remove a property. Votes and comments referring to it are kept.
#[delete("/api/properties/<property_id>")]
async fn delete_property(
    property_id: std::result::Result<Id, OidError>,
    properties: Coll<Property>,
) -> Result<Json<Message>> {
    const ACTION: &str = "delete property";
    let property_id = property_id.or_fail(ACTION)?;
    let result = properties
        .delete_one(property_id.as_doc(), None)
        .await
        .or_fail(ACTION)?;
    if result.deleted_count == 0 {
        return Err(Error::NotFound("Property"));
    }
    Ok(Json(Message::new("Property deleted successfully")))
}
