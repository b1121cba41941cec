//! Error types for revision storage and the overview page.

use revdiff_types::EntityId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("entity {0} has no revisions")]
    NoRevisions(EntityId),

    #[error("invalid fixture: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum OverviewError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
