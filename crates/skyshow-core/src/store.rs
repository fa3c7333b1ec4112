//! Centrally owned show state: the saved library, the active selection and
//! the unsaved working copy.
//!
//! Every update returns a new `ShowState`; sequences inside are immutable
//! snapshots. The host decides which state value is current.

use crate::models::Sequence;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowState {
    sequences: Vec<Sequence>,
    active_id: Option<String>,
    /// Unsaved working copy
    draft: Option<Sequence>,
}

impl ShowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a freshly loaded library; the first sequence becomes active.
    pub fn from_library(sequences: Vec<Sequence>) -> Self {
        let active_id = sequences.first().map(|s| s.id.clone());
        Self {
            sequences,
            active_id,
            draft: None,
        }
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn get(&self, id: &str) -> Option<&Sequence> {
        self.sequences.iter().find(|s| s.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&Sequence> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn draft(&self) -> Option<&Sequence> {
        self.draft.as_ref()
    }

    /// True when the working copy differs from its saved snapshot.
    pub fn is_dirty(&self) -> bool {
        match &self.draft {
            Some(draft) => self.get(&draft.id) != Some(draft),
            None => false,
        }
    }

    /// Make `id` active. Unknown ids leave the state unchanged.
    pub fn select(&self, id: &str) -> Self {
        if self.get(id).is_none() {
            return self.clone();
        }
        Self {
            active_id: Some(id.to_string()),
            draft: None,
            ..self.clone()
        }
    }

    /// Replace the working copy.
    pub fn with_draft(&self, draft: Sequence) -> Self {
        Self {
            draft: Some(draft),
            ..self.clone()
        }
    }

    /// Apply an edit to the working copy.
    ///
    /// Without a draft, editing starts from the active sequence, or from a new
    /// empty one.
    pub fn edit_draft<F>(&self, edit: F) -> Self
    where
        F: FnOnce(&Sequence) -> Sequence,
    {
        let base = match (&self.draft, self.active()) {
            (Some(draft), _) => draft.clone(),
            (None, Some(active)) => active.clone(),
            (None, None) => Sequence::empty(""),
        };
        self.with_draft(edit(&base))
    }

    /// Save the working copy as one snapshot and make it active.
    pub fn save_draft(&self, at: DateTime<Utc>) -> Self {
        match &self.draft {
            Some(draft) => {
                let mut next = self.save(draft.clone(), at);
                next.draft = None;
                next
            }
            None => self.clone(),
        }
    }

    /// Insert or replace a snapshot by id and make it active.
    pub fn save(&self, sequence: Sequence, at: DateTime<Utc>) -> Self {
        let snapshot = Sequence {
            saved_at: Some(at),
            ..sequence
        };
        let id = snapshot.id.clone();

        let mut sequences = self.sequences.clone();
        match sequences.iter_mut().find(|s| s.id == id) {
            Some(existing) => *existing = snapshot,
            None => sequences.push(snapshot),
        }
        tracing::debug!("Saved sequence {} ({} in library)", id, sequences.len());

        Self {
            sequences,
            active_id: Some(id),
            draft: self.draft.clone(),
        }
    }

    /// Remove a sequence.
    ///
    /// If it was active, the first remaining sequence becomes active (or none).
    /// A working copy of the removed sequence is discarded.
    pub fn delete(&self, id: &str) -> Self {
        let sequences: Vec<Sequence> = self
            .sequences
            .iter()
            .filter(|s| s.id != id)
            .cloned()
            .collect();

        let active_id = if self.active_id.as_deref() == Some(id) {
            sequences.first().map(|s| s.id.clone())
        } else {
            self.active_id.clone()
        };
        let draft = self.draft.clone().filter(|d| d.id != id);

        Self {
            sequences,
            active_id,
            draft,
        }
    }
}
