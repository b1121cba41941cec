//! Host-side permission checks for the revert and delete row operations.

use crate::overview::EntityContext;
use revdiff_types::RevisionId;

/// Host-side access decisions for revision operations.
pub trait AccessPolicy: Send + Sync {
    fn can_revert(&self, entity: &EntityContext, revision: RevisionId) -> bool;

    fn can_delete(&self, entity: &EntityContext, revision: RevisionId) -> bool;
}

/// Grants every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn can_revert(&self, _entity: &EntityContext, _revision: RevisionId) -> bool {
        true
    }

    fn can_delete(&self, _entity: &EntityContext, _revision: RevisionId) -> bool {
        true
    }
}
