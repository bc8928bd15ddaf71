#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod cors;
pub mod error;
pub mod logging;
pub mod model;
pub mod seed;

/// Assemble the server: configuration, fairings, and every API route.
///
/// Nothing touches the database until the rocket is ignited, at which point
/// [`config::DatabaseFairing`] connects and fails ignition if it cannot.
pub fn build() -> Rocket<Build> {
    rocket::custom(config::figment())
        .attach(logging::LoggerFairing)
        .attach(cors::CorsFairing)
        .attach(config::DatabaseFairing)
        .mount("/", api::routes())
        .mount("/", cors::routes())
}
