//! Resolves tri-state metadata update requests into concrete mutations.
//!
//! This is a pure transform: an [`UpdateObjectRequest`] goes in, a minimal
//! mutation list comes out. Applying the mutations to the remote object is
//! the bucket facade's job.

use crate::errors::{StoreError, StoreResult};
use crate::models::mutation::{Mutation, ScalarField};
use crate::requests::{FieldUpdate, UpdateObjectRequest};

/// Translate an update request into the field mutations it implies.
///
/// Output order is deterministic: scalar fields in declaration order, then
/// metadata keys in key order. Resolution is idempotent; applying the same
/// request twice leaves the object in the same state as applying it once.
pub fn resolve(req: &UpdateObjectRequest) -> StoreResult<Vec<Mutation>> {
    let mut mutations = Vec::new();

    let fields = [
        (ScalarField::ContentType, &req.content_type),
        (ScalarField::ContentEncoding, &req.content_encoding),
        (ScalarField::ContentLanguage, &req.content_language),
        (ScalarField::CacheControl, &req.cache_control),
    ];

    for (field, update) in fields {
        match update {
            FieldUpdate::Unset => {}
            FieldUpdate::Delete => {
                if field == ScalarField::ContentType {
                    return Err(StoreError::InvalidUpdate(
                        "content type cannot be removed".into(),
                    ));
                }
                mutations.push(Mutation::ClearField { field });
            }
            FieldUpdate::SetTo(value) => {
                if value.is_empty() {
                    return Err(StoreError::InvalidUpdate(format!(
                        "{field} cannot be set to the empty string"
                    )));
                }
                mutations.push(Mutation::SetField {
                    field,
                    value: value.clone(),
                });
            }
        }
    }

    for (key, value) in &req.metadata {
        if key.is_empty() {
            return Err(StoreError::InvalidUpdate("metadata key is empty".into()));
        }
        match value {
            None => mutations.push(Mutation::RemoveMetadata { key: key.clone() }),
            Some(value) => mutations.push(Mutation::SetMetadata {
                key: key.clone(),
                value: value.clone(),
            }),
        }
    }

    Ok(mutations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_resolves_to_no_mutations() {
        let req = UpdateObjectRequest::new("obj");
        assert!(resolve(&req).unwrap().is_empty());
    }

    #[test]
    fn unset_fields_produce_no_mutations() {
        let mut req = UpdateObjectRequest::new("obj");
        req.cache_control = FieldUpdate::SetTo("private".into());
        let mutations = resolve(&req).unwrap();
        assert_eq!(
            mutations,
            vec![Mutation::SetField {
                field: ScalarField::CacheControl,
                value: "private".into(),
            }]
        );
    }

    #[test]
    fn delete_and_set_mix() {
        let mut req = UpdateObjectRequest::new("obj");
        req.content_type = FieldUpdate::SetTo("image/png".into());
        req.content_language = FieldUpdate::Delete;
        req.metadata.insert("owner".into(), Some("ops".into()));
        req.metadata.insert("draft".into(), None);

        let mutations = resolve(&req).unwrap();
        assert_eq!(
            mutations,
            vec![
                Mutation::SetField {
                    field: ScalarField::ContentType,
                    value: "image/png".into(),
                },
                Mutation::ClearField {
                    field: ScalarField::ContentLanguage,
                },
                Mutation::RemoveMetadata { key: "draft".into() },
                Mutation::SetMetadata {
                    key: "owner".into(),
                    value: "ops".into(),
                },
            ]
        );
    }

    #[test]
    fn deleting_content_type_is_an_invalid_update() {
        let mut req = UpdateObjectRequest::new("obj");
        req.content_type = FieldUpdate::Delete;
        // Even alongside otherwise-legal changes, nothing is emitted.
        req.cache_control = FieldUpdate::SetTo("no-store".into());
        assert!(matches!(
            resolve(&req),
            Err(StoreError::InvalidUpdate(_))
        ));
    }

    #[test]
    fn setting_a_field_to_empty_is_an_invalid_update() {
        let mut req = UpdateObjectRequest::new("obj");
        req.content_encoding = FieldUpdate::SetTo(String::new());
        assert!(matches!(resolve(&req), Err(StoreError::InvalidUpdate(_))));
    }

    #[test]
    fn empty_metadata_key_is_an_invalid_update() {
        let mut req = UpdateObjectRequest::new("obj");
        req.metadata.insert(String::new(), Some("v".into()));
        assert!(matches!(resolve(&req), Err(StoreError::InvalidUpdate(_))));
    }

    #[test]
    fn resolution_is_deterministic() {
        let mut req = UpdateObjectRequest::new("obj");
        req.metadata.insert("b".into(), Some("2".into()));
        req.metadata.insert("a".into(), Some("1".into()));
        req.metadata.insert("c".into(), None);
        assert_eq!(resolve(&req).unwrap(), resolve(&req).unwrap());
    }
}
