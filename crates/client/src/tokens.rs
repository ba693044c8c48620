//! Token persistence.
//!
//! The access and refresh tokens are the only state the console keeps
//! between runs. [`SqliteTokenStore`] keeps them in a small key/value table
//! under the keys `accessToken` and `refreshToken`; [`MemoryTokenStore`] is
//! used by tests and one-shot commands.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eduhub_core::models::TokenPair;
use eduhub_events::AccessTokenSource;
use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::sync::RwLock;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token storage error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn access_token(&self) -> Result<Option<String>, TokenStoreError>;
    async fn refresh_token(&self) -> Result<Option<String>, TokenStoreError>;
    async fn save(&self, tokens: &TokenPair) -> Result<(), TokenStoreError>;
    /// Remove both tokens.
    async fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Realtime handshake token, read from the store on every connect.
pub struct StoredAccessToken(pub Arc<dyn TokenStore>);

#[async_trait]
impl AccessTokenSource for StoredAccessToken {
    async fn access_token(&self) -> Option<String> {
        match self.0.access_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read access token for realtime channel");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn access_token(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.tokens.read().await.as_ref().map(|t| t.access_token.clone()))
    }

    async fn refresh_token(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.tokens.read().await.as_ref().map(|t| t.refresh_token.clone()))
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS local_storage (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)";

pub struct SqliteTokenStore {
    pool: SqlitePool,
}

impl SqliteTokenStore {
    /// Open (creating if needed) the token database at `url`, e.g.
    /// `sqlite://eduhub.db` or `sqlite::memory:`.
    pub async fn connect(url: &str) -> Result<Self, TokenStoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        tracing::debug!(url, "Token store ready");
        Ok(Self { pool })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM local_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn access_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.get(ACCESS_TOKEN_KEY).await
    }

    async fn refresh_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.get(REFRESH_TOKEN_KEY).await
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in [
            (ACCESS_TOKEN_KEY, &tokens.access_token),
            (REFRESH_TOKEN_KEY, &tokens.refresh_token),
        ] {
            sqlx::query(
                "INSERT INTO local_storage (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        sqlx::query("DELETE FROM local_storage WHERE key IN (?, ?)")
            .bind(ACCESS_TOKEN_KEY)
            .bind(REFRESH_TOKEN_KEY)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Read the `exp` claim of an access token without verifying it.
///
/// The console cannot verify server signatures; this is for display only and
/// never decides whether a request is sent.
pub fn access_token_expiry(token: &str) -> Option<DateTime<Utc>> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    DateTime::from_timestamp(data.claims.exp?, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(n: u32) -> TokenPair {
        TokenPair {
            access_token: format!("access-{n}"),
            refresh_token: format!("refresh-{n}"),
        }
    }

    #[tokio::test]
    async fn memory_store_round_trip_and_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.access_token().await.unwrap(), None);

        store.save(&pair(1)).await.unwrap();
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().await.unwrap().as_deref(), Some("refresh-1"));

        store.clear().await.unwrap();
        assert_eq!(store.refresh_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn stored_access_token_follows_the_store() {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_tokens(pair(1)));
        let source = StoredAccessToken(store.clone());
        assert_eq!(source.access_token().await.as_deref(), Some("access-1"));

        store.save(&pair(2)).await.unwrap();
        assert_eq!(source.access_token().await.as_deref(), Some("access-2"));

        store.clear().await.unwrap();
        assert_eq!(source.access_token().await, None);
    }

    #[tokio::test]
    async fn sqlite_store_overwrites_and_clears() {
        let store = SqliteTokenStore::connect("sqlite::memory:").await.unwrap();

        store.save(&pair(1)).await.unwrap();
        store.save(&pair(2)).await.unwrap();
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("access-2"));
        assert_eq!(store.refresh_token().await.unwrap().as_deref(), Some("refresh-2"));

        store.clear().await.unwrap();
        assert_eq!(store.access_token().await.unwrap(), None);
        assert_eq!(store.refresh_token().await.unwrap(), None);
    }

    #[test]
    fn expiry_is_read_without_verification() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let token = encode(
            &Header::default(),
            &serde_json::json!({"sub": "admin", "exp": 1_900_000_000}),
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap();

        let expiry = access_token_expiry(&token).unwrap();
        assert_eq!(expiry.timestamp(), 1_900_000_000);
    }

    #[test]
    fn garbage_token_has_no_expiry() {
        assert!(access_token_expiry("not-a-jwt").is_none());
    }
}
