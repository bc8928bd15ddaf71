use mongodb::bson::Bson;
use rocket::request::FromParam;

/// A property identifier taken from a request path, used to look up the votes
/// and comments that refer to it.
///
/// Stored references are whatever value the client sent, and a path segment
/// only ever matches those stored as exactly this string. References are
/// never checked against the `properties` collection, and deleting a property
/// leaves its votes and comments in place.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct PropertyRef(String);

impl From<&str> for PropertyRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<PropertyRef> for Bson {
    fn from(property: PropertyRef) -> Self {
        Bson::String(property.0)
    }
}

impl<'a> FromParam<'a> for PropertyRef {
    type Error = <&'a str as FromParam<'a>>::Error;

    /// Accept any path segment verbatim, without normalisation.
    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        <&'a str as FromParam<'a>>::from_param(param).map(Self::from)
    }
}
