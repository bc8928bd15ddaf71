mod bson;
mod collection;

pub use bson::{document_to_json, to_json, Id};
pub use collection::{ensure_indexes_exist, Coll, MongoCollection};
