//! Orchestration of multi-step admin and self-service actions.
//!
//! Workflows validate locally, call the backend, refetch what changed into
//! the store, and report the outcome as toasts on the bus. The store only
//! ever changes from successful responses.

pub mod approval;
pub mod course_members;
pub mod courses;
pub mod resubmission;

use eduhub_client::Collection;
use eduhub_core::models::PendingLecturer;

use crate::error::ConsoleResult;
use crate::state::AppState;
use crate::store::{Action, SliceAction, StoredReview};

/// Refetch one review collection of `T` and replace it in the store.
pub async fn refetch<T: StoredReview>(
    state: &AppState,
    collection: Collection,
) -> ConsoleResult<()> {
    let action = match collection {
        Collection::Canonical => {
            SliceAction::ReplaceCanonical(state.client.list_canonical::<T>().await?)
        }
        Collection::PendingCreate => {
            SliceAction::ReplacePendingCreates(state.client.list_pending_creates::<T>().await?)
        }
        Collection::PendingUpdate => {
            SliceAction::ReplacePendingUpdates(state.client.list_pending_updates::<T>().await?)
        }
    };
    state.dispatch(T::action(action));
    Ok(())
}

/// Refetch the signed-in lecturer's aggregate.
pub async fn refetch_lecturer_profile(state: &AppState) -> ConsoleResult<PendingLecturer> {
    let profile = state.client.lecturer_profile().await?;
    state.dispatch(Action::SetLecturerProfile(profile.clone()));
    Ok(profile)
}
