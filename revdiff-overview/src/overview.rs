//! Revision overview page: the rows, their default picks and operations,
//! and the submit step that produces a comparison request.

use crate::access::AccessPolicy;
use crate::chain::{ChainEntry, RevisionChain, SkipReason};
use crate::error::OverviewError;
use crate::selection::{ComparisonRequest, ComparisonSelector, SelectionError};
use crate::store::RevisionStore;
use revdiff_plugin::{ConfigStore, DiffLayout, PluginCatalog, PluginRegistry, RadioBehavior};
use revdiff_types::{EntityId, LangCode, RevisionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// What the host knows about the entity whose revisions are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityContext {
    pub id: EntityId,
    pub entity_type: String,
    pub label: String,
    /// Language the overview is shown in; also the translation filter.
    pub language: LangCode,
    pub language_name: String,
    #[serde(default)]
    pub translation_languages: BTreeSet<LangCode>,
}

impl EntityContext {
    pub fn has_translations(&self) -> bool {
        self.translation_languages.len() > 1
    }

    fn revision_path(&self, revision: RevisionId) -> String {
        format!("{}/{}/revisions/{}", self.entity_type, self.id, revision)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Revert,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOperation {
    pub kind: OperationKind,
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewRow {
    pub revision_id: RevisionId,
    pub created_at: i64,
    pub author: String,
    pub description: Option<String>,
    /// Where the revision date links to: the entity itself for the current
    /// revision, the revision view otherwise.
    pub link: String,
    pub previous_id: Option<RevisionId>,
    pub is_current: bool,
    pub left_default: Option<RevisionId>,
    pub right_default: Option<RevisionId>,
    pub operations: Vec<RowOperation>,
}

impl OverviewRow {
    pub fn is_left_checked(&self) -> bool {
        self.left_default == Some(self.revision_id)
    }

    pub fn is_right_checked(&self) -> bool {
        self.right_default == Some(self.revision_id)
    }

    /// Label shown instead of operations.
    pub fn status_label(&self) -> Option<&'static str> {
        self.is_current.then_some("Current revision")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewPage {
    pub title: String,
    pub entity_id: EntityId,
    pub entity_type: String,
    pub language: LangCode,
    pub rows: Vec<OverviewRow>,
    /// Select columns and the compare button are shown.
    pub comparison_enabled: bool,
    pub radio_behavior: RadioBehavior,
    /// `(id, label)` of the enabled layouts, default first.
    pub layout_options: Vec<(String, String)>,
    pub default_layout: Option<String>,
    pub page: usize,
    pub pager_limit: usize,
    /// Ids listed on this page before filtering.
    pub listed_revisions: usize,
}

impl OverviewPage {
    /// Validates the user's picks and builds the comparison request using
    /// the default layout.
    pub fn submit(
        &self,
        left: Option<RevisionId>,
        right: Option<RevisionId>,
    ) -> Result<ComparisonRequest, SelectionError> {
        let (left, right) = ComparisonSelector::validate(self.rows.len(), left, right)?;
        ComparisonSelector::select(
            Some(left),
            Some(right),
            &self.entity_id,
            &self.entity_type,
            self.default_layout.as_deref(),
        )
    }

    /// The picks whose radios start checked.
    pub fn initial_selection(&self) -> (Option<RevisionId>, Option<RevisionId>) {
        let left = self.rows.iter().find(|r| r.is_left_checked()).map(|r| r.revision_id);
        let right = self.rows.iter().find(|r| r.is_right_checked()).map(|r| r.revision_id);
        (left, right)
    }

    pub fn current_row(&self) -> Option<&OverviewRow> {
        self.rows.iter().find(|r| r.is_current)
    }
}

/// Builds overview pages from the injected collaborators.
pub struct RevisionOverview<'a> {
    store: &'a dyn RevisionStore,
    config: &'a dyn ConfigStore,
    layouts: &'a PluginCatalog<dyn DiffLayout>,
    access: &'a dyn AccessPolicy,
}

impl<'a> RevisionOverview<'a> {
    pub fn new(
        store: &'a dyn RevisionStore,
        config: &'a dyn ConfigStore,
        layouts: &'a PluginCatalog<dyn DiffLayout>,
        access: &'a dyn AccessPolicy,
    ) -> Self {
        Self {
            store,
            config,
            layouts,
            access,
        }
    }

    /// Builds page `page` (zero-based) of the overview for `entity`.
    pub fn build(&self, entity: &EntityContext, page: usize) -> Result<OverviewPage, OverviewError> {
        let pager_limit = self.config.revision_pager_limit();
        let ids = self.store.list_revision_ids(&entity.id, pager_limit, page)?;
        let current = self.store.current_revision_id(&entity.id)?;
        let listed_revisions = ids.len();

        let chain = RevisionChain::new(self.store, ids, Some(entity.language.clone()), Some(current));
        let walk = chain.walk();
        for &(id, reason) in &walk.skipped {
            match reason {
                SkipReason::Stale => {
                    debug!(entity_id = %entity.id, revision_id = %id, "Revision no longer exists, skipped");
                }
                SkipReason::MissingTranslation | SkipReason::TranslationUnaffected => {
                    debug!(entity_id = %entity.id, revision_id = %id, ?reason, "Revision not shown for language");
                }
            }
        }

        let rows: Vec<OverviewRow> = walk
            .entries
            .into_iter()
            .map(|entry| self.build_row(entity, current, entry))
            .collect();

        let registry = PluginRegistry::new(self.layouts, self.config.layout_plugin_settings());
        for unknown in registry.unknown_ids() {
            warn!(layout_id = unknown, "Configured layout plugin is not registered");
        }

        info!(
            entity_id = %entity.id,
            page,
            listed = listed_revisions,
            shown = rows.len(),
            "Built revision overview"
        );

        Ok(OverviewPage {
            title: page_title(entity),
            entity_id: entity.id.clone(),
            entity_type: entity.entity_type.clone(),
            language: entity.language.clone(),
            rows,
            comparison_enabled: listed_revisions > 1,
            radio_behavior: self.config.radio_behavior(),
            layout_options: registry.options(),
            default_layout: registry.default_id(),
            page,
            pager_limit,
            listed_revisions,
        })
    }

    fn build_row(&self, entity: &EntityContext, current: RevisionId, entry: ChainEntry) -> OverviewRow {
        let id = entry.id();
        let link = if entry.is_current {
            format!("{}/{}", entity.entity_type, entity.id)
        } else {
            format!("{}/view", entity.revision_path(id))
        };
        let operations = if entry.is_current {
            Vec::new()
        } else {
            self.operations(entity, current, id)
        };

        OverviewRow {
            revision_id: id,
            created_at: entry.revision.created_at,
            author: entry.revision.author.clone(),
            description: entry.revision.log_message().map(str::to_string),
            link,
            previous_id: entry.previous_id,
            is_current: entry.is_current,
            left_default: entry.left_default,
            right_default: entry.right_default,
            operations,
        }
    }

    fn operations(&self, entity: &EntityContext, current: RevisionId, id: RevisionId) -> Vec<RowOperation> {
        let mut operations = Vec::new();
        let base = entity.revision_path(id);

        if self.access.can_revert(entity, id) {
            let title = if id < current {
                "Revert"
            } else {
                "Set as current revision"
            };
            let path = if entity.has_translations() {
                format!("{base}/revert/{}", entity.language)
            } else {
                format!("{base}/revert")
            };
            operations.push(RowOperation {
                kind: OperationKind::Revert,
                title: title.to_string(),
                path,
            });
        }

        if self.access.can_delete(entity, id) {
            operations.push(RowOperation {
                kind: OperationKind::Delete,
                title: "Delete".to_string(),
                path: format!("{base}/delete"),
            });
        }

        operations
    }
}

fn page_title(entity: &EntityContext) -> String {
    if entity.has_translations() {
        format!("{} revisions for {}", entity.language_name, entity.label)
    } else {
        format!("Revisions for {}", entity.label)
    }
}
