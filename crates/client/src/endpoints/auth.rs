use eduhub_core::models::{Account, TokenPair};
use eduhub_core::requests::{LoginRequest, RefreshRequest};
use validator::Validate;

use crate::error::ApiError;
use crate::http::{ApiClient, RequestSpec};

impl ApiClient {
    /// `POST /api/v1/auth/login`. Stores the returned tokens.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenPair, ApiError> {
        credentials.validate()?;
        let spec = RequestSpec::post("/api/v1/auth/login")
            .anonymous()
            .json(credentials)?;
        let tokens: TokenPair = self.fetch(&spec).await?;
        self.tokens().save(&tokens).await?;
        tracing::info!(username = %credentials.username, "Logged in");
        Ok(tokens)
    }

    /// `POST /api/v1/auth/logout`. Local tokens are cleared even when the
    /// server call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let refresh_token = self.tokens().refresh_token().await?;

        let result = match refresh_token {
            Some(refresh_token) => {
                let spec = RequestSpec::post("/api/v1/auth/logout")
                    .anonymous()
                    .json(&RefreshRequest { refresh_token })?;
                self.send(&spec).await
            }
            None => Ok(()),
        };

        self.tokens().clear().await?;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Logout call failed, tokens cleared locally");
        }
        result
    }

    /// `GET /api/v1/user/me`.
    pub async fn me(&self) -> Result<Account, ApiError> {
        self.fetch(&RequestSpec::get("/api/v1/user/me")).await
    }
}
