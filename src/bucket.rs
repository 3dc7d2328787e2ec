//! The bucket facade: validation, cancellation, and delegation to the store.
//!
//! A [`Bucket`] is pre-bound to a bucket name and an injected [`RemoteStore`]
//! implementation. Each operation validates its request first, failing with
//! `InvalidArgument` before any store call, then runs the store call under the
//! caller's cancellation and deadline signals.

use crate::errors::{StoreError, StoreResult};
use crate::listing::{self, Listing};
use crate::models::object::Object;
use crate::patch;
use crate::remote::{ByteStream, RemoteStore};
use crate::requests::{
    self, CreateObjectRequest, ListObjectsRequest, ReadObjectRequest, StatObjectRequest,
    UpdateObjectRequest,
};
use bytes::Bytes;
use futures::Stream;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Per-call cancellation and deadline controls.
///
/// Every facade operation races the in-flight store call against these
/// signals. A fired signal aborts the call with `Cancelled` or
/// `DeadlineExceeded`; no partial data is returned.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    pub cancel: CancellationToken,
    pub deadline: Option<Instant>,
}

impl CallContext {
    /// No cancellation, no deadline.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_cancel(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }
}

/// A bucket in the remote store, pre-bound with its name and collaborator.
///
/// Operations are independent, stateless calls; a `Bucket` holds no mutable
/// state and may be cloned and used from many tasks concurrently.
#[derive(Clone)]
pub struct Bucket {
    name: String,
    store: Arc<dyn RemoteStore>,
}

impl Bucket {
    pub fn new(name: impl Into<String>, store: Arc<dyn RemoteStore>) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// List objects matching the request, one page at a time.
    ///
    /// The returned [`Listing`] carries a continuation token when more
    /// results remain; feed it back via
    /// [`ListObjectsRequest::continued`] to fetch the next page. Page
    /// contents obey the strict-ordering contract documented in
    /// [`crate::listing`].
    pub async fn list_objects(
        &self,
        ctx: &CallContext,
        req: &ListObjectsRequest,
    ) -> StoreResult<Listing> {
        if req.continuation_token.as_deref() == Some("") {
            return Err(StoreError::InvalidArgument(
                "continuation token is empty".into(),
            ));
        }
        if req.delimiter.as_deref() == Some("") {
            return Err(StoreError::InvalidArgument("delimiter is empty".into()));
        }

        let page = self.run(ctx, self.store.list(&self.name, req)).await?;
        let result = listing::build(page)?;
        debug!(
            bucket = %self.name,
            objects = result.objects.len(),
            collapsed_runs = result.collapsed_runs.len(),
            truncated = result.continuation_token.is_some(),
            "listed objects"
        );
        Ok(result)
    }

    /// Open a reader for the contents of an object.
    ///
    /// The caller owns the returned stream and releases its resources by
    /// dropping it when done, including on early termination or error.
    pub async fn new_reader(
        &self,
        ctx: &CallContext,
        req: &ReadObjectRequest,
    ) -> StoreResult<ByteStream> {
        requests::validate_object_name(&req.name)?;
        requests::validate_read_generation(req.generation)?;
        self.run(
            ctx,
            self.store.open_read(&self.name, &req.name, req.generation),
        )
        .await
    }

    /// Create or overwrite an object from a stream of content chunks.
    ///
    /// `generation_precondition` is forwarded to the store as a conditional
    /// write; a mismatch surfaces as `PreconditionFailed`, distinct from
    /// other write failures, so callers can drive optimistic-concurrency
    /// retry loops.
    pub async fn create_object<S>(
        &self,
        ctx: &CallContext,
        req: &CreateObjectRequest,
        contents: S,
    ) -> StoreResult<Object>
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        requests::validate_object_name(&req.name)?;
        if let Some(precondition) = req.generation_precondition {
            if precondition < 0 {
                return Err(StoreError::InvalidArgument(format!(
                    "generation precondition must be non-negative, got {precondition}"
                )));
            }
        }

        let record = self
            .run(ctx, self.store.write(&self.name, req, Box::pin(contents)))
            .await?;
        debug!(
            bucket = %self.name,
            name = %record.name,
            generation = record.generation,
            size = record.size,
            "created object"
        );
        Ok(record)
    }

    /// Fetch the current metadata record for an object.
    pub async fn stat_object(
        &self,
        ctx: &CallContext,
        req: &StatObjectRequest,
    ) -> StoreResult<Object> {
        requests::validate_object_name(&req.name)?;
        self.run(ctx, self.store.stat(&self.name, &req.name)).await
    }

    /// Apply a metadata update to an object and return the new record.
    ///
    /// The request is resolved into concrete mutations first; an illegal
    /// update (such as deleting the content type) fails with `InvalidUpdate`
    /// before any store call.
    pub async fn update_object(
        &self,
        ctx: &CallContext,
        req: &UpdateObjectRequest,
    ) -> StoreResult<Object> {
        requests::validate_object_name(&req.name)?;
        let mutations = patch::resolve(req)?;
        let record = self
            .run(ctx, self.store.patch(&self.name, &req.name, &mutations))
            .await?;
        debug!(
            bucket = %self.name,
            name = %record.name,
            mutations = mutations.len(),
            "updated object metadata"
        );
        Ok(record)
    }

    /// Run a store call under the context's cancellation and deadline
    /// signals. Cancellation wins over deadline, and both win over a result
    /// that becomes ready in the same poll.
    async fn run<T>(
        &self,
        ctx: &CallContext,
        call: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        let deadline = async {
            match ctx.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => Err(StoreError::Cancelled),
            _ = deadline => Err(StoreError::DeadlineExceeded),
            result = call => result,
        }
    }
}
