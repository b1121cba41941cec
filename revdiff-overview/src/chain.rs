//! Navigable sequence of revisions for the overview table.
//!
//! The chain walks a newest-first id list and resolves each revision lazily.
//! Entries that no longer resolve, or that are not a real edit of the
//! filtered language, are skipped. Skipping never shifts `previous`: it is
//! always the physical neighbour in the unfiltered id list.

use crate::store::RevisionStore;
use revdiff_types::{LangCode, Revision, RevisionId};

/// Why an id did not produce an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The revision was deleted after the id list was fetched.
    Stale,
    /// The revision has no translation in the filtered language.
    MissingTranslation,
    /// The translation exists but was carried over, not edited.
    TranslationUnaffected,
}

/// One row of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry {
    pub revision: Revision,
    /// Id at the next position of the unfiltered list, if any.
    pub previous_id: Option<RevisionId>,
    /// `previous_id` resolved; `None` if it no longer exists.
    pub previous: Option<Revision>,
    pub is_current: bool,
    /// Default value of the left radio column for this row.
    pub left_default: Option<RevisionId>,
    /// Default value of the right radio column for this row.
    pub right_default: Option<RevisionId>,
}

impl ChainEntry {
    pub fn id(&self) -> RevisionId {
        self.revision.id
    }

    /// The left radio of this row starts checked.
    pub fn is_left_checked(&self) -> bool {
        self.left_default == Some(self.id())
    }

    /// The right radio of this row starts checked.
    pub fn is_right_checked(&self) -> bool {
        self.right_default == Some(self.id())
    }
}

pub struct RevisionChain<'a, S: RevisionStore + ?Sized> {
    store: &'a S,
    ids: Vec<RevisionId>,
    language: Option<LangCode>,
    current: Option<RevisionId>,
}

impl<'a, S: RevisionStore + ?Sized> RevisionChain<'a, S> {
    /// Builds a chain over `ids`. The ids are put in newest-first order and
    /// deduplicated, so entries are strictly descending.
    pub fn new(
        store: &'a S,
        ids: impl IntoIterator<Item = RevisionId>,
        language: Option<LangCode>,
        current: Option<RevisionId>,
    ) -> Self {
        let mut ids: Vec<RevisionId> = ids.into_iter().collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids.dedup();
        Self {
            store,
            ids,
            language,
            current,
        }
    }

    /// The unfiltered id list, newest first.
    pub fn ids(&self) -> &[RevisionId] {
        &self.ids
    }

    pub fn language(&self) -> Option<&LangCode> {
        self.language.as_ref()
    }

    pub fn current(&self) -> Option<RevisionId> {
        self.current
    }

    /// Lazily yields the visible entries. Can be called any number of times.
    pub fn iter(&self) -> ChainIter<'_, 'a, S> {
        ChainIter {
            chain: self,
            position: 0,
        }
    }

    pub fn entries(&self) -> Vec<ChainEntry> {
        self.iter().collect()
    }

    /// Ids that produced no entry, with the reason. Lets callers log what
    /// the chain silently dropped.
    pub fn skipped(&self) -> Vec<(RevisionId, SkipReason)> {
        self.ids
            .iter()
            .filter_map(|&id| {
                self.admit(self.store.load_revision(id))
                    .err()
                    .map(|reason| (id, reason))
            })
            .collect()
    }

    /// Entries and skipped ids in one pass, loading every listed id once.
    pub fn walk(&self) -> ChainWalk {
        let loaded: Vec<Option<Revision>> = self
            .ids
            .iter()
            .map(|&id| self.store.load_revision(id))
            .collect();

        let mut walk = ChainWalk::default();
        for (position, revision) in loaded.iter().enumerate() {
            match self.admit(revision.clone()) {
                Ok(revision) => {
                    let entry = self.entry_at(position, revision, |p| loaded[p].clone());
                    walk.entries.push(entry);
                }
                Err(reason) => walk.skipped.push((self.ids[position], reason)),
            }
        }
        walk
    }

    /// Filters a loaded revision: it must still exist and, under a
    /// language filter, carry an edited translation in that language.
    fn admit(&self, revision: Option<Revision>) -> Result<Revision, SkipReason> {
        let revision = revision.ok_or(SkipReason::Stale)?;

        if let Some(language) = &self.language {
            if !revision.has_translation(language) {
                return Err(SkipReason::MissingTranslation);
            }
            if !revision.is_translation_affected(language) {
                return Err(SkipReason::TranslationUnaffected);
            }
        }
        Ok(revision)
    }

    fn entry_at(
        &self,
        position: usize,
        revision: Revision,
        load: impl Fn(usize) -> Option<Revision>,
    ) -> ChainEntry {
        let id = revision.id;
        let previous_id = self.ids.get(position + 1).copied();
        let previous = previous_id.and_then(|_| load(position + 1));
        let is_current = self.current == Some(id);

        let (left_default, right_default) = if is_current {
            // The next older id that still resolves.
            let left = match &previous {
                Some(previous) => Some(previous.id),
                None => (position + 2..self.ids.len())
                    .find(|&p| load(p).is_some())
                    .map(|p| self.ids[p]),
            };
            (left, Some(id))
        } else {
            // Every non-current row shares the same anchor: the second most
            // recent id of the listing.
            (self.ids.get(1).copied(), None)
        };

        ChainEntry {
            revision,
            previous_id,
            previous,
            is_current,
            left_default,
            right_default,
        }
    }
}

/// Result of [`RevisionChain::walk`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainWalk {
    pub entries: Vec<ChainEntry>,
    pub skipped: Vec<(RevisionId, SkipReason)>,
}

/// Iterator over the visible entries of a [`RevisionChain`].
pub struct ChainIter<'c, 'a, S: RevisionStore + ?Sized> {
    chain: &'c RevisionChain<'a, S>,
    position: usize,
}

impl<S: RevisionStore + ?Sized> Iterator for ChainIter<'_, '_, S> {
    type Item = ChainEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.chain.ids.len() {
            let position = self.position;
            self.position += 1;
            let chain = self.chain;
            let loaded = chain.store.load_revision(chain.ids[position]);
            if let Ok(revision) = chain.admit(loaded) {
                return Some(chain.entry_at(position, revision, |p| {
                    chain.store.load_revision(chain.ids[p])
                }));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.chain.ids.len() - self.position))
    }
}

impl<'c, 'a, S: RevisionStore + ?Sized> IntoIterator for &'c RevisionChain<'a, S> {
    type Item = ChainEntry;
    type IntoIter = ChainIter<'c, 'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
