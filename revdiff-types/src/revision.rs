use crate::{LangCode, RevisionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One immutable historical version of a content entity.
///
/// Created and destroyed by external storage; the selection core only reads
/// it. `translations` lists every language the revision carries, while
/// `affected_translations` lists only those whose content changed in this
/// revision (the rest are carried forward from the previous one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: RevisionId,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
    pub author: String,
    #[serde(default)]
    pub translations: BTreeSet<LangCode>,
    #[serde(default)]
    pub affected_translations: BTreeSet<LangCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_message: Option<String>,
}

impl Revision {
    /// Creates a revision with no translations and no log message.
    pub fn new(id: u64, created_at: i64, author: impl Into<String>) -> Self {
        Self {
            id: RevisionId::new(id),
            created_at,
            author: author.into(),
            translations: BTreeSet::new(),
            affected_translations: BTreeSet::new(),
            log_message: None,
        }
    }

    /// Adds a translation; `affected` marks it as edited in this revision.
    #[must_use]
    pub fn with_translation(mut self, lang: LangCode, affected: bool) -> Self {
        if affected {
            self.affected_translations.insert(lang.clone());
        }
        self.translations.insert(lang);
        self
    }

    #[must_use]
    pub fn with_log_message(mut self, message: impl Into<String>) -> Self {
        self.log_message = Some(message.into());
        self
    }

    pub fn has_translation(&self, lang: &LangCode) -> bool {
        self.translations.contains(lang)
    }

    /// True when the translation exists and actually changed in this revision.
    pub fn is_translation_affected(&self, lang: &LangCode) -> bool {
        self.has_translation(lang) && self.affected_translations.contains(lang)
    }

    /// The log message, if any non-blank one was recorded.
    pub fn log_message(&self) -> Option<&str> {
        self.log_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}
