//! # History
//!
//! Linear undo/redo over whole-document snapshots. The live [`Document`] content is the present,
//! with full copies of earlier content behind it and undone content ahead of it.
//!
//! Callers [`Document::history_push`] *before* a mutation they want undoable, or wrap a fallible mutation in
//! [`Document::history_tracked`]. Pushing after undoing discards every state that could have been redone - there are
//! no branches.
//!
//! Snapshots keep the IDs of what they copy, so every reference in a snapshot resolves within that same snapshot.
//! Nothing is shared between snapshots or with the present.

use crate::state::{document::Content, Document};

#[derive(Default)]
pub struct History {
    /// Oldest first.
    past: std::collections::VecDeque<Content>,
    /// Nearest last, so it pops first.
    future: Vec<Content>,
}

impl Document {
    /// Record the present content as an undo point, forgetting anything that could be redone.
    pub fn history_push(&mut self) {
        if !self.history.future.is_empty() {
            log::trace!("Discarding {} redo states", self.history.future.len());
            self.history.future.clear();
        }
        self.history.past.push_back(self.content.clone());
    }
    /// Run a mutation as one undoable step. The undo point is only recorded if `mutate` succeeds,
    /// which must leave the document untouched when it fails.
    /// # Errors
    /// Whatever `mutate` returns.
    pub fn history_tracked<T, E>(
        &mut self,
        mutate: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let snapshot = self.content.clone();
        let value = mutate(self)?;
        self.history.future.clear();
        self.history.past.push_back(snapshot);
        Ok(value)
    }
    /// Step back to the most recent undo point. Returns false, changing nothing, if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.past.pop_back() else {
            log::debug!("No more undo");
            return false;
        };
        let present = std::mem::replace(&mut self.content, previous);
        self.history.future.push(present);
        true
    }
    /// Step forward to the most recently undone state. Returns false, changing nothing, if there is none.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.future.pop() else {
            log::debug!("No more redo");
            return false;
        };
        let present = std::mem::replace(&mut self.content, next);
        self.history.past.push_back(present);
        true
    }
    /// Undo up to `num` times, returning how many steps were actually taken.
    pub fn undo_n(&mut self, num: usize) -> usize {
        (0..num).take_while(|_| self.undo()).count()
    }
    /// Redo up to `num` times, returning how many steps were actually taken.
    pub fn redo_n(&mut self, num: usize) -> usize {
        (0..num).take_while(|_| self.redo()).count()
    }
    /// Forget the oldest undo points beyond `max_len`. The present and redo states are untouched.
    /// Returns how many were dropped.
    pub fn history_resize(&mut self, max_len: usize) -> usize {
        let excess = self.history.past.len().saturating_sub(max_len);
        if excess != 0 {
            self.history.past.drain(..excess);
            log::trace!("Trimmed {excess} undo states");
        }
        excess
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.past.is_empty()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.history.future.is_empty()
    }
    /// Number of states [`Self::undo`] can reach.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.history.past.len()
    }
    /// Number of states [`Self::redo`] can reach.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.history.future.len()
    }
}
