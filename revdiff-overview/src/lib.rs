//! Revision overview and comparison selection for revdiff.
//!
//! - [`RevisionChain`] turns a newest-first page of revision ids into the
//!   rows a user can act on, with default picks for the two comparison sides.
//! - [`ComparisonSelector`] validates a pair of picks and orders them
//!   older-first into a [`ComparisonRequest`].
//! - [`RevisionOverview`] ties both to the stores, the layout registry and
//!   access checks to produce an [`OverviewPage`].
//!
//! Storage is reached only through [`RevisionStore`]; nothing here mutates
//! revisions.

mod access;
mod chain;
mod error;
mod overview;
mod selection;
mod store;

pub use access::{AccessPolicy, AllowAll};
pub use chain::{ChainEntry, ChainIter, ChainWalk, RevisionChain, SkipReason};
pub use error::{OverviewError, StoreError};
pub use overview::{
    EntityContext, OperationKind, OverviewPage, OverviewRow, RevisionOverview, RowOperation,
};
pub use selection::{ComparisonRequest, ComparisonSelector, SelectionError};
pub use store::{FixtureEntity, MemoryRevisionStore, RevisionFixture, RevisionStore};
