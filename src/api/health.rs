use rocket::{serde::json::Json, Route};

use crate::model::api::health::Health;

pub fn routes() -> Vec<Route> {
    routes![health]
}

/// Static liveness check. Does not touch the database.
#[get("/health")]
fn health() -> Json<Health> {
    Json(Health::ok())
}
