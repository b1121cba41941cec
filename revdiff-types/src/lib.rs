//! Core type definitions for revdiff.
//!
//! This crate defines the storage-agnostic types shared by the revision
//! overview and the plugin registry:
//! - Revision, entity and language identifiers
//! - The immutable [`Revision`] record read from external storage
//!
//! Storage, routing and rendering live outside this workspace; these types
//! are the contract between the host and the selection core.

mod ids;
mod revision;

pub use ids::{EntityId, LangCode, RevisionId};
pub use revision::Revision;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid revision id: {0}")]
    InvalidRevisionId(String),

    #[error("invalid language code: {0:?}")]
    InvalidLangCode(String),
}
