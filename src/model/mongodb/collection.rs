use std::ops::Deref;

use mongodb::{bson::doc, error::Error as DbError, Collection, Database, IndexModel};
use rocket::{
    request::{self, FromRequest, Request},
    State,
};

use crate::model::db::{
    comment::{Comment, NewComment},
    property::Property,
    vote::{NewVote, Vote},
};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r, T> FromRequest<'r> for Coll<T>
where
    T: MongoCollection,
{
    type Error = ();

    /// Get the database connection from the managed state and wrap it in a collection.
    ///
    /// Panics iff the [`Database`] is not managed by [`rocket::Rocket`].
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = req.guard::<&State<Database>>().await.unwrap();
        request::Outcome::Success(Coll::from_db(db))
    }
}

// Property collection
const PROPERTIES: &str = "properties";
impl MongoCollection for Property {
    const NAME: &'static str = PROPERTIES;
}

// Vote collections
const VOTES: &str = "votes";
impl MongoCollection for Vote {
    const NAME: &'static str = VOTES;
}
impl MongoCollection for NewVote {
    const NAME: &'static str = VOTES;
}

// Comment collections
const COMMENTS: &str = "comments";
impl MongoCollection for Comment {
    const NAME: &'static str = COMMENTS;
}
impl MongoCollection for NewComment {
    const NAME: &'static str = COMMENTS;
}

/// Ensure that all the required indexes exist on the given database.
///
/// None of them are unique: in particular, nothing stops two vote documents
/// for the same `(propertyId, userId)` pair.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    // Property collection.
    let property_indexes = [
        doc! { "name": 1 },
        doc! { "location.country": 1 },
        doc! { "state": 1 },
    ]
    .into_iter()
    .map(|keys| IndexModel::builder().keys(keys).build());
    Coll::<Property>::from_db(db)
        .create_indexes(property_indexes, None)
        .await?;

    // Vote collection.
    let vote_indexes = [
        doc! { "propertyId": 1 },
        doc! { "userId": 1 },
        doc! { "timestamp": -1 },
    ]
    .into_iter()
    .map(|keys| IndexModel::builder().keys(keys).build());
    Coll::<Vote>::from_db(db)
        .create_indexes(vote_indexes, None)
        .await?;

    Ok(())
}
