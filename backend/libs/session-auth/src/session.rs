use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// User fields carried by a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// Authenticated session attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

impl Session {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// Looks up the session behind an opaque token.
///
/// Returns `Ok(None)` for unknown or expired tokens.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Option<Session>, SessionError>;
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    expires: DateTime<Utc>,
    user_id: Uuid,
    name: Option<String>,
    email: Option<String>,
    image: Option<String>,
}

/// Session store backed by the `sessions` table
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn resolve(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT s.expires, u.id AS user_id, u.name, u.email, u.image
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.session_token = $1 AND s.expires > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Session {
            user: SessionUser {
                id: row.user_id,
                name: row.name,
                email: row.email,
                image: row.image,
            },
            expires: row.expires,
        }))
    }
}
