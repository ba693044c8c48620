use serde::{Deserialize, Serialize};

use crate::status::ApprovalStatus;
use crate::types::{DbId, Timestamp};

/// A pending edit of an already-approved record.
///
/// `id` identifies the request itself, not the target entity; approve and
/// reject calls for updates use this id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest<T> {
    pub id: DbId,
    pub current: T,
    pub requested: T,
    #[serde(default)]
    pub status: ApprovalStatus,
    #[serde(default)]
    pub admin_note: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}
