//! Database initialisation: loading the property catalogue and creating indexes.

use mongodb::{bson::Document, error::Error as DbError, Database};

use crate::model::{
    db::property::Property,
    mongodb::{ensure_indexes_exist, Coll},
};

/// What a seeding run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Properties removed before inserting.
    pub cleared: u64,
    /// Properties inserted.
    pub inserted: u64,
}

/// Load `properties` into the database and make sure the indexes exist.
///
/// Unless `keep_existing` is set, every stored property is deleted first.
/// Votes and comments are never touched.
pub async fn seed_properties(
    db: &Database,
    properties: Vec<Document>,
    keep_existing: bool,
) -> Result<SeedReport, DbError> {
    let collection = Coll::<Property>::from_db(db);

    let cleared = if keep_existing {
        0
    } else {
        let cleared = collection.delete_many(Document::new(), None).await?.deleted_count;
        info!("Cleared {cleared} existing properties");
        cleared
    };

    // `insert_many` rejects an empty batch.
    let inserted = if properties.is_empty() {
        0
    } else {
        let result = collection
            .insert_many(properties.into_iter().map(Property::from), None)
            .await?;
        result.inserted_ids.len() as u64
    };
    info!("Inserted {inserted} properties");

    ensure_indexes_exist(db).await?;
    info!("Ensured indexes exist");

    Ok(SeedReport { cleared, inserted })
}
