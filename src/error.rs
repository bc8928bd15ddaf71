use mongodb::{bson::oid::Error as OidError, error::Error as DbError};
use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::{json, Json},
    Request,
};
use thiserror::Error;

use crate::logging::FailedAction;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No document matched; holds the name of the missing resource.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The store rejected or failed the operation.
    #[error("Failed to {action}: {source}")]
    Db {
        action: &'static str,
        #[source]
        source: DbError,
    },
    /// An identifier in the path was not a valid ObjectId.
    #[error("Failed to {action}: malformed identifier: {source}")]
    OidParse {
        action: &'static str,
        #[source]
        source: OidError,
    },
}

impl Error {
    /// The HTTP status this error maps to.
    ///
    /// Malformed identifiers are deliberately reported like store failures.
    pub fn status(&self) -> Status {
        match self {
            Self::NotFound(_) => Status::NotFound,
            Self::Db { .. } | Self::OidParse { .. } => Status::InternalServerError,
        }
    }

    /// The operation that failed, if the store or an identifier was at fault.
    pub fn action(&self) -> Option<&'static str> {
        match self {
            Self::NotFound(_) => None,
            Self::Db { action, .. } | Self::OidParse { action, .. } => Some(*action),
        }
    }

    /// The message shown to clients. Server-side details are left out.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(resource) => format!("{resource} not found"),
            Self::Db { action, .. } | Self::OidParse { action, .. } => {
                format!("Failed to {action}")
            }
        }
    }
}

/// Attach the attempted action to a low-level error.
pub trait ResultExt<T> {
    fn or_fail(self, action: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, DbError> {
    fn or_fail(self, action: &'static str) -> Result<T> {
        self.map_err(|source| Error::Db { action, source })
    }
}

impl<T> ResultExt<T> for std::result::Result<T, OidError> {
    fn or_fail(self, action: &'static str) -> Result<T> {
        self.map_err(|source| Error::OidParse { action, source })
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        req.local_cache(|| FailedAction(self.action()));
        if status == Status::InternalServerError {
            error!("{self}");
        } else {
            debug!("{self}");
        }
        let body = Json(json!({ "error": self.public_message() }));
        (status, body).respond_to(req)
    }
}
