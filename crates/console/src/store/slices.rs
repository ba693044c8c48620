//! Per-entity review slices and their reducers.

use eduhub_core::models::UpdateRequest;

/// The three server collections the review screens of one entity kind show.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSlice<T> {
    pub canonical: Vec<T>,
    pub pending_creates: Vec<T>,
    pub pending_updates: Vec<UpdateRequest<T>>,
}

impl<T> Default for ReviewSlice<T> {
    fn default() -> Self {
        Self {
            canonical: Vec::new(),
            pending_creates: Vec::new(),
            pending_updates: Vec::new(),
        }
    }
}

/// Replace-only updates. A slice only ever changes to a full server response.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceAction<T> {
    ReplaceCanonical(Vec<T>),
    ReplacePendingCreates(Vec<T>),
    ReplacePendingUpdates(Vec<UpdateRequest<T>>),
}

impl<T: Clone> ReviewSlice<T> {
    pub fn reduce(&self, action: SliceAction<T>) -> Self {
        match action {
            SliceAction::ReplaceCanonical(canonical) => Self {
                canonical,
                ..self.clone()
            },
            SliceAction::ReplacePendingCreates(pending_creates) => Self {
                pending_creates,
                ..self.clone()
            },
            SliceAction::ReplacePendingUpdates(pending_updates) => Self {
                pending_updates,
                ..self.clone()
            },
        }
    }
}
