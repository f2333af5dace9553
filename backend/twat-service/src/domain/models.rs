use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - profile fields as stored by the sign-in provider plus app fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub banner: Option<String>,
    pub level: i32,
    pub xp: i32,
    pub created_at: DateTime<Utc>,
}

/// Minimal user projection used for authors and follower lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// Twat entity - a short post, or a re-post when `embedded_twat_id` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Twat {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub attachment: Option<String>,
    pub embedded_twat_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Like entity - keyed by (user_id, twat_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub user_id: Uuid,
    pub twat_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The original twat shown inside a re-post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedTwat {
    #[serde(flatten)]
    pub twat: Twat,
    pub author: UserSummary,
}

/// Twat with the relations every read loads: author, likes, re-posts, embedded original
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwatDetails {
    #[serde(flatten)]
    pub twat: Twat,
    pub author: UserSummary,
    pub likes: Vec<Like>,
    pub retwats: Vec<Twat>,
    pub embedded_twat: Option<EmbeddedTwat>,
}

/// Twat as seen by a specific caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwatView {
    #[serde(flatten)]
    pub details: TwatDetails,
    pub self_like: bool,
    pub self_retwat: bool,
}

/// Fields for a new top-level twat
#[derive(Debug, Clone, PartialEq)]
pub struct NewTwat {
    pub author_id: Uuid,
    pub content: String,
    pub attachment: Option<String>,
}

/// Profile page data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    pub followers: Vec<UserSummary>,
    pub following: Vec<UserSummary>,
    pub twat_count: i64,
}

/// Partial profile edit; `None` leaves the column unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub banner: Option<String>,
}

/// Keyset page request over (created_at, id), newest first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedQuery {
    pub author_id: Option<Uuid>,
    pub cursor: Option<Uuid>,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub items: Vec<TwatView>,
    pub next_cursor: Option<Uuid>,
}
