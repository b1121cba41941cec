//! Validation and ordering of a user's two revision picks.

use revdiff_types::{EntityId, RevisionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Validation failures. The messages are user-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Multiple revisions are needed for comparison.")]
    InsufficientRevisions,

    #[error("Select two revisions to compare.")]
    SelectionIncomplete,

    #[error("Select different revisions to compare.")]
    SelectionIdentical,
}

/// Canonical request for the diff view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub entity_id: EntityId,
    pub entity_type: String,
    pub left: RevisionId,
    pub right: RevisionId,
    /// `None` when no layout is enabled; the diff view picks its own.
    pub layout_id: Option<String>,
}

impl ComparisonRequest {
    /// The same comparison read newer → older.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            left: self.right,
            right: self.left,
            ..self.clone()
        }
    }

    /// Navigation target for the diff view.
    pub fn target(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ComparisonRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "compare/{}/{}?left={}&right={}",
            self.entity_type, self.entity_id, self.left, self.right
        )?;
        if let Some(layout) = &self.layout_id {
            write!(f, "&layout={layout}")?;
        }
        Ok(())
    }
}

/// Turns two picks into a [`ComparisonRequest`]. Stateless.
pub struct ComparisonSelector;

impl ComparisonSelector {
    /// Validates the picks and orders them older-first.
    ///
    /// Both picks must be present, then they must differ. The result does not
    /// depend on which side each pick came from.
    pub fn select(
        left: Option<RevisionId>,
        right: Option<RevisionId>,
        entity_id: &EntityId,
        entity_type: &str,
        layout_id: Option<&str>,
    ) -> Result<ComparisonRequest, SelectionError> {
        let (left, right) = Self::ordered(left, right)?;
        Ok(ComparisonRequest {
            entity_id: entity_id.clone(),
            entity_type: entity_type.to_string(),
            left,
            right,
            layout_id: layout_id.map(str::to_string),
        })
    }

    /// Form-level validation: at least two visible revisions first, then the
    /// same rules as [`select`](Self::select). Returns the ordered pair.
    pub fn validate(
        visible_revisions: usize,
        left: Option<RevisionId>,
        right: Option<RevisionId>,
    ) -> Result<(RevisionId, RevisionId), SelectionError> {
        if visible_revisions < 2 {
            return Err(SelectionError::InsufficientRevisions);
        }
        Self::ordered(left, right)
    }

    fn ordered(
        left: Option<RevisionId>,
        right: Option<RevisionId>,
    ) -> Result<(RevisionId, RevisionId), SelectionError> {
        let (Some(left), Some(right)) = (left, right) else {
            return Err(SelectionError::SelectionIncomplete);
        };
        if left == right {
            return Err(SelectionError::SelectionIdentical);
        }
        if left > right {
            debug!(%left, %right, "Swapping picks so the older revision is on the left");
            return Ok((right, left));
        }
        Ok((left, right))
    }
}
