use mongodb::{bson::doc, error::Error as DbError, Client as MongoClient, Database};
use rocket::{
    fairing::{Fairing, Info, Kind},
    figment::{
        providers::{Env, Format, Serialized, Toml},
        Figment, Profile, Provider,
    },
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::mongodb::ensure_indexes_exist;

/// Port to listen on when nothing else says otherwise.
pub const DEFAULT_PORT: u16 = 3000;

/// Database to use when `DATABASE_NAME` is not set.
pub const DEFAULT_DATABASE_NAME: &str = "schwudelrudel";

/// Build the configuration source for the server and the seeding tool.
///
/// Precedence, lowest first: Rocket's defaults, [`DEFAULT_PORT`],
/// `Rocket.toml`, `ROCKET_*` environment variables, and finally the plain
/// `PORT`, `MONGODB_URI` and `DATABASE_NAME` environment variables.
pub fn figment() -> Figment {
    figment_with(
        Env::raw()
            .only(&["port", "mongodb_uri", "database_name"])
            .global(),
    )
}

/// The layered configuration with `overrides` on top of everything else.
fn figment_with(overrides: impl Provider) -> Figment {
    Figment::from(rocket::Config::default())
        .merge(Serialized::default("port", DEFAULT_PORT))
        .merge(Toml::file(Env::var_or("ROCKET_CONFIG", "Rocket.toml")).nested())
        .merge(Env::prefixed("ROCKET_").ignore(&["PROFILE"]).global())
        .merge(overrides)
        .select(Profile::from_env_or(
            "ROCKET_PROFILE",
            rocket::Config::DEFAULT_PROFILE,
        ))
}

/// Configuration for the database.
#[derive(Debug, Deserialize)]
pub struct DbConfig {
    // secrets
    #[cfg_attr(test, serde(default = "local_mongodb_uri"))]
    mongodb_uri: String,
    // non-secrets
    #[serde(default = "default_database_name")]
    database_name: String,
}

impl DbConfig {
    /// Connection string of the MongoDB deployment.
    /// Configured via `MONGODB_URI`.
    pub fn mongodb_uri(&self) -> &str {
        &self.mongodb_uri
    }

    /// Name of the database holding the collections.
    /// Configured via `DATABASE_NAME`.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Open a client and check that the deployment is actually reachable.
    ///
    /// Creating a client is lazy, so without the ping an unreachable server
    /// would only surface on the first request.
    pub async fn connect(&self) -> Result<(MongoClient, Database), DbError> {
        let client = MongoClient::with_uri_str(&self.mongodb_uri).await?;
        let db = client.database(&get_database_name(&self.database_name));
        db.run_command(doc! { "ping": 1 }, None).await?;
        Ok((client, db))
    }
}

fn default_database_name() -> String {
    DEFAULT_DATABASE_NAME.to_string()
}

#[cfg(test)]
fn local_mongodb_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

/// A fairing that loads the MongoDB config, connects to the database,
/// performs any setup necessary, and places both a `Client` and a `Database`
/// into managed state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");
        // Construct the connection.
        let (client, db) = match config.connect().await {
            Ok(connection) => connection,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };

        // Ensure the required indexes exist.
        if let Err(e) = ensure_indexes_exist(&db).await {
            error!("Failed to create database indexes: {e}");
            return Err(rocket);
        }
        info!("...database connection online!");

        // Manage the state.
        rocket = rocket.manage(client).manage(db);
        Ok(rocket)
    }
}

/// Get the name of the database to use (production version).
#[cfg(not(test))]
fn get_database_name(configured: &str) -> String {
    configured.to_string()
}

/// Get the name of the database to use (test version).
/// Use a random name to avoid collisions between tests.
#[cfg(test)]
fn get_database_name(_configured: &str) -> String {
    let random: u32 = rand::random();
    let db = format!("test{random}");
    info!("Using database {db}");
    db
}
