//! Typed client core for bucket-scoped remote object storage.
//!
//! The interesting parts of talking to a blob store are not the RPCs — they
//! are the listing contract (strictly ordered, token-continued enumeration
//! with delimiter collapsing) and partial metadata updates (tri-state
//! untouched / delete / set fields with no sentinel values). This crate models
//! both, plus the request/response value objects around them, and delegates
//! everything else to an injected [`remote::RemoteStore`] collaborator.
//!
//! Entry point is [`bucket::Bucket`]; [`fake::FakeRemoteStore`] provides an
//! in-memory collaborator for tests and local use.

pub mod bucket;
pub mod errors;
pub mod fake;
pub mod listing;
pub mod models;
pub mod patch;
pub mod remote;
pub mod requests;

pub use bucket::{Bucket, CallContext};
pub use errors::{StoreError, StoreResult};
pub use listing::{Listing, RawPage};
pub use models::mutation::{Mutation, ScalarField};
pub use models::object::Object;
pub use remote::{ByteStream, RemoteStore};
pub use requests::{
    CreateObjectRequest, FieldUpdate, ListObjectsRequest, ReadObjectRequest, StatObjectRequest,
    UpdateObjectRequest,
};
