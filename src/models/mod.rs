//! Core data models for the object-store client.
//!
//! These types describe stored objects and the mutations that can be applied
//! to their metadata. They serialize naturally as JSON via `serde`.

pub mod mutation;
pub mod object;
