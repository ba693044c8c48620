//! Endpoints a lecturer, partner or institution uses on its own profile.

use eduhub_core::models::{Certification, Degree, Institution, PendingLecturer, Partner};
use eduhub_core::requests::{CreateCertification, CreateDegree, ResubmitLecturer};
use eduhub_core::types::DbId;
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::http::{ApiClient, FilePart, RequestSpec};

/// `POST /api/v1/user/upload` answers either with the URL itself or with an
/// object carrying it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UploadResponse {
    Url(String),
    Object { url: String },
}

impl ApiClient {
    pub async fn lecturer_profile(&self) -> Result<PendingLecturer, ApiError> {
        self.fetch(&RequestSpec::get("/api/v1/lecturer/profile")).await
    }

    /// Replace the lecturer object. Children are not part of the payload.
    pub async fn resubmit_lecturer(&self, payload: &ResubmitLecturer) -> Result<(), ApiError> {
        payload.validate()?;
        self.send(&RequestSpec::put("/api/v1/lecturer/profile").json(payload)?)
            .await
    }

    pub async fn create_degree(&self, payload: &CreateDegree) -> Result<Degree, ApiError> {
        payload.validate()?;
        self.fetch(&RequestSpec::post("/api/v1/lecturer/degrees").json(payload)?)
            .await
    }

    pub async fn delete_degree(&self, id: DbId) -> Result<(), ApiError> {
        self.send(&RequestSpec::delete(format!("/api/v1/lecturer/degrees/{id}")))
            .await
    }

    pub async fn create_certification(
        &self,
        payload: &CreateCertification,
    ) -> Result<Certification, ApiError> {
        payload.validate()?;
        self.fetch(&RequestSpec::post("/api/v1/lecturer/certifications").json(payload)?)
            .await
    }

    pub async fn delete_certification(&self, id: DbId) -> Result<(), ApiError> {
        self.send(&RequestSpec::delete(format!(
            "/api/v1/lecturer/certifications/{id}"
        )))
        .await
    }

    pub async fn partner_profile(&self) -> Result<Partner, ApiError> {
        self.fetch(&RequestSpec::get("/api/v1/partner/profile")).await
    }

    pub async fn institution_profile(&self) -> Result<Institution, ApiError> {
        self.fetch(&RequestSpec::get("/api/v1/institution/profile")).await
    }

    /// Upload a file and return its public URL.
    pub async fn upload(&self, file: FilePart) -> Result<String, ApiError> {
        let response: UploadResponse = self
            .fetch(&RequestSpec::post("/api/v1/user/upload").file(file))
            .await?;
        let url = match response {
            UploadResponse::Url(url) | UploadResponse::Object { url } => url,
        };
        tracing::info!(%url, "File uploaded");
        Ok(url)
    }
}
