//! Admin review endpoints, shared by every reviewable entity kind.
//!
//! Paths are built from [`EntityKind::resource`]:
//!
//! | Operation            | Path                                         |
//! |----------------------|----------------------------------------------|
//! | canonical list       | `GET  /api/v1/admin/{res}`                   |
//! | pending creates      | `GET  /api/v1/admin/{res}/pending-create`    |
//! | pending updates      | `GET  /api/v1/admin/{res}/pending-update`    |
//! | approve create       | `POST /api/v1/admin/{res}/approve`           |
//! | reject create        | `POST /api/v1/admin/{res}/reject`            |
//! | approve update       | `POST /api/v1/admin/{res}/update/approve`    |
//! | reject update        | `POST /api/v1/admin/{res}/update/reject`     |

use eduhub_core::approval::ResolveCommand;
use eduhub_core::models::UpdateRequest;
use eduhub_core::review::Reviewable;
use eduhub_core::status::{EntityKind, RequestKind};
use validator::Validate;

use crate::error::ApiError;
use crate::http::{ApiClient, RequestSpec};

/// Which review collection to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    PendingCreate,
    PendingUpdate,
    Canonical,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingCreate => "pending-create",
            Self::PendingUpdate => "pending-update",
            Self::Canonical => "canonical",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn collection_path(kind: EntityKind, collection: Collection) -> String {
    let base = format!("/api/v1/admin/{}", kind.resource());
    match collection {
        Collection::Canonical => base,
        Collection::PendingCreate => format!("{base}/pending-create"),
        Collection::PendingUpdate => format!("{base}/pending-update"),
    }
}

pub fn resolve_path(kind: EntityKind, request: RequestKind, command: &ResolveCommand) -> String {
    let action = command.action().as_str();
    match request {
        RequestKind::Create => format!("/api/v1/admin/{}/{action}", kind.resource()),
        RequestKind::Update => format!("/api/v1/admin/{}/update/{action}", kind.resource()),
    }
}

impl ApiClient {
    pub async fn list_canonical<T: Reviewable>(&self) -> Result<Vec<T>, ApiError> {
        self.fetch(&RequestSpec::get(collection_path(T::KIND, Collection::Canonical)))
            .await
    }

    pub async fn list_pending_creates<T: Reviewable>(&self) -> Result<Vec<T>, ApiError> {
        self.fetch(&RequestSpec::get(collection_path(T::KIND, Collection::PendingCreate)))
            .await
    }

    pub async fn list_pending_updates<T: Reviewable>(
        &self,
    ) -> Result<Vec<UpdateRequest<T>>, ApiError> {
        self.fetch(&RequestSpec::get(collection_path(T::KIND, Collection::PendingUpdate)))
            .await
    }

    /// Send an approve or reject decision.
    pub async fn resolve(
        &self,
        kind: EntityKind,
        request: RequestKind,
        command: &ResolveCommand,
    ) -> Result<(), ApiError> {
        let path = resolve_path(kind, request, command);
        let spec = match command {
            ResolveCommand::Approve(body) => RequestSpec::post(path).json(body)?,
            ResolveCommand::Reject(body) => {
                body.validate()?;
                RequestSpec::post(path).json(body)?
            }
        };
        self.send(&spec).await?;
        tracing::info!(
            kind = %kind,
            request = request.as_str(),
            action = %command.action(),
            id = command.id(),
            "Pending request resolved",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use eduhub_core::requests::{ApproveRequest, RejectRequest};

    use super::*;

    #[test]
    fn collection_paths() {
        assert_eq!(
            collection_path(EntityKind::Partner, Collection::PendingCreate),
            "/api/v1/admin/partners/pending-create"
        );
        assert_eq!(
            collection_path(EntityKind::Certification, Collection::Canonical),
            "/api/v1/admin/certifications"
        );
    }

    #[test]
    fn resolve_paths_distinguish_create_and_update() {
        let approve = ResolveCommand::Approve(ApproveRequest { id: 1 });
        let reject = ResolveCommand::Reject(RejectRequest {
            id: 1,
            admin_note: "x".into(),
        });
        assert_eq!(
            resolve_path(EntityKind::Lecturer, RequestKind::Create, &approve),
            "/api/v1/admin/lecturers/approve"
        );
        assert_eq!(
            resolve_path(EntityKind::Institution, RequestKind::Update, &reject),
            "/api/v1/admin/institutions/update/reject"
        );
    }
}
