//! The remote-store collaborator boundary.
//!
//! The core consumes this trait; it never implements the wire protocol,
//! authentication, retry, or pooling behind it. Implementations are injected
//! into [`crate::bucket::Bucket`] explicitly rather than discovered through
//! process-wide state.

use crate::errors::StoreResult;
use crate::listing::RawPage;
use crate::models::mutation::Mutation;
use crate::models::object::Object;
use crate::requests::{CreateObjectRequest, ListObjectsRequest};
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::io;
use std::pin::Pin;

/// Chunked object contents flowing to or from the store.
///
/// Streams returned by [`RemoteStore::open_read`] are single-owner resources:
/// the caller owns the stream and releases the backing sockets and buffers by
/// dropping it, on every exit path.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Operations the remote object-storage service must provide.
///
/// Calls are independent, stateless request/response exchanges; the only
/// cross-call guarantee is the listing continuation contract enforced in
/// [`crate::listing`]. Continuation tokens returned in [`RawPage`] are opaque
/// foreign state and pass through the core unchanged.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch one page of the enumeration described by `req`, honoring its
    /// prefix, delimiter, continuation token, and advisory result cap.
    async fn list(&self, bucket: &str, req: &ListObjectsRequest) -> StoreResult<RawPage>;

    /// Open the contents of an object for reading. A `generation` of zero
    /// means the latest generation.
    async fn open_read(
        &self,
        bucket: &str,
        name: &str,
        generation: i64,
    ) -> StoreResult<ByteStream>;

    /// Create or overwrite an object with the given attributes and contents,
    /// enforcing `attrs.generation_precondition` if set.
    async fn write(
        &self,
        bucket: &str,
        attrs: &CreateObjectRequest,
        contents: ByteStream,
    ) -> StoreResult<Object>;

    /// Fetch the current metadata record for the named object.
    async fn stat(&self, bucket: &str, name: &str) -> StoreResult<Object>;

    /// Apply the given mutations to the named object's metadata and return
    /// the resulting record.
    async fn patch(
        &self,
        bucket: &str,
        name: &str,
        mutations: &[Mutation],
    ) -> StoreResult<Object>;
}
