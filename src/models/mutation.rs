//! Field-level mutations produced by resolving a metadata update request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four scalar attributes that can be patched on an object.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarField {
    ContentType,
    ContentLanguage,
    ContentEncoding,
    CacheControl,
}

impl ScalarField {
    /// Wire name of the attribute, as the store's patch endpoint spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarField::ContentType => "contentType",
            ScalarField::ContentLanguage => "contentLanguage",
            ScalarField::ContentEncoding => "contentEncoding",
            ScalarField::CacheControl => "cacheControl",
        }
    }
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete change to apply to the target object's metadata.
///
/// A resolved update request is a list of these; keys and fields the request
/// never mentioned produce no entry and are therefore never touched.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    SetField { field: ScalarField, value: String },
    ClearField { field: ScalarField },
    SetMetadata { key: String, value: String },
    RemoveMetadata { key: String },
}
