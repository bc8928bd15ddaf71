use mongodb::bson::Document;
use rocket::serde::json::Value;
use serde::{Deserialize, Serialize};

use crate::model::mongodb::document_to_json;

/// The field holding a document's identifier.
const ID_FIELD: &str = "_id";

/// A property listing. There is no fixed schema: a property is whatever
/// document the client created, plus the `_id` the store assigned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Property(Document);

impl Property {
    pub fn document(&self) -> &Document {
        &self.0
    }

    /// Render as plain JSON for API responses.
    pub fn into_json(self) -> Value {
        document_to_json(self.0)
    }
}

impl From<Document> for Property {
    fn from(document: Document) -> Self {
        Self(document)
    }
}

/// Turn a client-supplied update body into the fields to `$set`.
///
/// The identifier is immutable, so any `_id` in the body is dropped; every
/// other field is merged into the stored document as-is.
pub fn update_fields(mut body: Document) -> Document {
    body.remove(ID_FIELD);
    body
}
