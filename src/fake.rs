//! In-memory [`RemoteStore`] for tests, local demos, and embedding.
//!
//! Behaves like an honest single-bucket backend: lexicographic paging with
//! opaque continuation tokens, per-page delimiter collapsing, md5 etags,
//! monotonic generation assignment, and generation-precondition enforcement.
//! Only the latest generation of each object is retained.

use crate::errors::{StoreError, StoreResult};
use crate::listing::RawPage;
use crate::models::mutation::{Mutation, ScalarField};
use crate::models::object::Object;
use crate::remote::{ByteStream, RemoteStore};
use crate::requests::{CreateObjectRequest, ListObjectsRequest};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use chrono::Utc;
use futures::{StreamExt, stream};
use md5::Context;
use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;
use tracing::debug;

const DEFAULT_MAX_RESULTS: usize = 1000;
const READ_CHUNK_BYTES: usize = 64 * 1024;

#[derive(Clone)]
struct Stored {
    record: Object,
    data: Bytes,
}

#[derive(Default)]
struct Inner {
    objects: BTreeMap<String, Stored>,
    next_generation: i64,
}

/// An in-memory store standing in for the remote service behind one bucket.
/// The bucket name passed to each call is used only in error reporting.
#[derive(Default)]
pub struct FakeRemoteStore {
    inner: Mutex<Inner>,
}

impl FakeRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently stored.
    pub fn object_count(&self) -> usize {
        self.inner.lock().unwrap().objects.len()
    }
}

/// One entry of a merged listing: either a single object or a collapsed run.
enum Item {
    Object(Object),
    Run(String),
}

impl Item {
    /// The string a page boundary compares against. Objects are unique by
    /// name here, so the name alone identifies an entry.
    fn key(&self) -> &str {
        match self {
            Item::Object(record) => &record.name,
            Item::Run(run) => run,
        }
    }
}

#[async_trait]
impl RemoteStore for FakeRemoteStore {
    async fn list(&self, _bucket: &str, req: &ListObjectsRequest) -> StoreResult<RawPage> {
        let after = match &req.continuation_token {
            Some(token) => Some(decode_token(token)?),
            None => None,
        };
        let max = if req.max_results == 0 {
            DEFAULT_MAX_RESULTS
        } else {
            req.max_results.clamp(1, DEFAULT_MAX_RESULTS)
        };

        let inner = self.inner.lock().unwrap();
        let mut entries = Vec::new();
        let mut collapsed: Vec<String> = Vec::new();
        let mut last_emitted: Option<String> = None;
        let mut next_token = None;

        for (key, stored) in inner.objects.range(req.prefix.clone()..) {
            if !key.starts_with(req.prefix.as_str()) {
                break;
            }

            let item = match &req.delimiter {
                Some(delimiter) => match collapse_run(key, &req.prefix, delimiter) {
                    Some(run) => Item::Run(run),
                    None => Item::Object(stored.record.clone()),
                },
                None => Item::Object(stored.record.clone()),
            };

            // Skip everything at or before the previous page's boundary.
            if let Some(after) = &after {
                if item.key() <= after.as_str() {
                    continue;
                }
            }
            // Later members of an already-emitted run collapse into it.
            if collapsed.last().map(String::as_str) == Some(item.key()) {
                continue;
            }

            if entries.len() + collapsed.len() == max {
                next_token = last_emitted.as_deref().map(encode_token);
                break;
            }

            last_emitted = Some(item.key().to_string());
            match item {
                Item::Object(record) => entries.push(record),
                Item::Run(run) => collapsed.push(run),
            }
        }

        Ok(RawPage {
            entries,
            collapsed,
            next_token,
        })
    }

    async fn open_read(
        &self,
        bucket: &str,
        name: &str,
        generation: i64,
    ) -> StoreResult<ByteStream> {
        let inner = self.inner.lock().unwrap();
        let stored = inner
            .objects
            .get(name)
            .ok_or_else(|| not_found(bucket, name))?;
        if generation != 0 && generation != stored.record.generation {
            return Err(not_found(bucket, name));
        }

        let chunks: Vec<io::Result<Bytes>> = stored
            .data
            .chunks(READ_CHUNK_BYTES)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }

    async fn write(
        &self,
        _bucket: &str,
        attrs: &CreateObjectRequest,
        mut contents: ByteStream,
    ) -> StoreResult<Object> {
        // Drain the stream before taking the lock.
        let mut data = Vec::new();
        let mut digest = Context::new();
        while let Some(chunk) = contents.next().await {
            let chunk = chunk?;
            digest.consume(&chunk);
            data.extend_from_slice(&chunk);
        }

        let mut inner = self.inner.lock().unwrap();
        let current = inner
            .objects
            .get(&attrs.name)
            .map(|stored| stored.record.generation)
            .unwrap_or(0);
        if let Some(precondition) = attrs.generation_precondition {
            if precondition != current {
                return Err(StoreError::PreconditionFailed(format!(
                    "required generation {precondition}, current generation is {current}"
                )));
            }
        }

        inner.next_generation += 1;
        let record = Object {
            name: attrs.name.clone(),
            generation: inner.next_generation,
            content_type: attrs.content_type.clone(),
            content_language: attrs.content_language.clone(),
            content_encoding: attrs.content_encoding.clone(),
            cache_control: attrs.cache_control.clone(),
            metadata: attrs.metadata.clone(),
            size: data.len() as u64,
            etag: Some(format!("{:x}", digest.compute())),
            updated: Utc::now(),
        };
        debug!(
            name = %record.name,
            generation = record.generation,
            size = record.size,
            "stored object"
        );
        inner.objects.insert(
            attrs.name.clone(),
            Stored {
                record: record.clone(),
                data: data.into(),
            },
        );
        Ok(record)
    }

    async fn stat(&self, bucket: &str, name: &str) -> StoreResult<Object> {
        let inner = self.inner.lock().unwrap();
        inner
            .objects
            .get(name)
            .map(|stored| stored.record.clone())
            .ok_or_else(|| not_found(bucket, name))
    }

    async fn patch(
        &self,
        bucket: &str,
        name: &str,
        mutations: &[Mutation],
    ) -> StoreResult<Object> {
        let mut inner = self.inner.lock().unwrap();
        let stored = inner
            .objects
            .get_mut(name)
            .ok_or_else(|| not_found(bucket, name))?;

        for mutation in mutations {
            match mutation {
                Mutation::SetField { field, value } => {
                    *scalar_slot(&mut stored.record, *field) = Some(value.clone());
                }
                Mutation::ClearField { field } => {
                    *scalar_slot(&mut stored.record, *field) = None;
                }
                Mutation::SetMetadata { key, value } => {
                    stored.record.metadata.insert(key.clone(), value.clone());
                }
                Mutation::RemoveMetadata { key } => {
                    stored.record.metadata.remove(key);
                }
            }
        }
        stored.record.updated = Utc::now();
        Ok(stored.record.clone())
    }
}

fn not_found(bucket: &str, name: &str) -> StoreError {
    StoreError::NotFound {
        bucket: bucket.to_string(),
        name: name.to_string(),
    }
}

fn scalar_slot(record: &mut Object, field: ScalarField) -> &mut Option<String> {
    match field {
        ScalarField::ContentType => &mut record.content_type,
        ScalarField::ContentLanguage => &mut record.content_language,
        ScalarField::ContentEncoding => &mut record.content_encoding,
        ScalarField::CacheControl => &mut record.cache_control,
    }
}

fn encode_token(boundary: &str) -> String {
    general_purpose::STANDARD.encode(boundary)
}

fn decode_token(token: &str) -> StoreResult<String> {
    let bytes = general_purpose::STANDARD
        .decode(token)
        .map_err(|_| StoreError::InvalidArgument("malformed continuation token".into()))?;
    String::from_utf8(bytes)
        .map_err(|_| StoreError::InvalidArgument("malformed continuation token".into()))
}

/// Compute the collapsed run a key belongs to under S3-style delimiter
/// grouping.
///
/// Returns `Some(<prefix><S><delimiter>)` if the key, after stripping the
/// requested prefix, still contains the delimiter; otherwise the key stands
/// as an individual object and `None` is returned.
fn collapse_run(key: &str, prefix: &str, delimiter: &str) -> Option<String> {
    let after_prefix = key.strip_prefix(prefix)?;
    let pos = after_prefix.find(delimiter)?;
    let mut run = String::with_capacity(prefix.len() + pos + delimiter.len());
    run.push_str(prefix);
    run.push_str(&after_prefix[..pos + delimiter.len()]);
    Some(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_run_groups_below_the_delimiter() {
        assert_eq!(
            collapse_run("a/y/1", "a/", "/"),
            Some("a/y/".to_string())
        );
        assert_eq!(collapse_run("a/x", "a/", "/"), None);
        assert_eq!(collapse_run("b/x", "a/", "/"), None);
        assert_eq!(collapse_run("photos/2025/img.jpg", "", "/"), Some("photos/".to_string()));
    }

    #[test]
    fn collapse_run_keeps_exact_prefix_objects_individual() {
        // `a/y` has no trailing delimiter past the prefix.
        assert_eq!(collapse_run("a/y", "a/", "/"), None);
    }

    #[test]
    fn tokens_round_trip_and_stay_opaque() {
        let token = encode_token("a/y/");
        assert_ne!(token, "a/y/");
        assert_eq!(decode_token(&token).unwrap(), "a/y/");
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(matches!(
            decode_token("!!not base64!!"),
            Err(StoreError::InvalidArgument(_))
        ));
    }
}
