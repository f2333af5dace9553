//! Persistence for twats, likes, follows and profiles.
//!
//! `SocialStore` is the seam procedures depend on; `PgSocialStore` is the PostgreSQL
//! implementation. Uniqueness (one like per pair, one re-post per author/original, one
//! follow edge per pair) is enforced by the schema, and the write primitives here are
//! idempotent against it.

mod follows;
mod likes;
mod twats;
mod users;

use crate::domain::models::{
    FeedQuery, NewTwat, Profile, ProfileUpdate, Twat, TwatDetails, User,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, sqlx::Error>;

#[async_trait]
pub trait SocialStore: Send + Sync {
    /// Twat with author, likes, re-posts and embedded original.
    async fn find_twat(&self, twat_id: Uuid) -> StoreResult<Option<TwatDetails>>;

    async fn create_twat(&self, new_twat: NewTwat) -> StoreResult<TwatDetails>;

    /// Returns `None` when the author already re-posted `target_id`.
    async fn create_retwat(
        &self,
        author_id: Uuid,
        target_id: Uuid,
        content: &str,
    ) -> StoreResult<Option<Twat>>;

    /// Returns true if a like row was removed.
    async fn delete_like(&self, user_id: Uuid, twat_id: Uuid) -> StoreResult<bool>;

    /// Returns true if a like row was inserted (false if it already existed).
    async fn insert_like(&self, user_id: Uuid, twat_id: Uuid) -> StoreResult<bool>;

    async fn insert_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool>;

    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool>;

    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> StoreResult<Option<User>>;

    /// Newest first, starting strictly after `query.cursor`.
    async fn list_twats(&self, query: FeedQuery) -> StoreResult<Vec<TwatDetails>>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgSocialStore {
    pool: PgPool,
}

impl PgSocialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SocialStore for PgSocialStore {
    async fn find_twat(&self, twat_id: Uuid) -> StoreResult<Option<TwatDetails>> {
        twats::find(&self.pool, twat_id).await
    }

    async fn create_twat(&self, new_twat: NewTwat) -> StoreResult<TwatDetails> {
        twats::create(&self.pool, new_twat).await
    }

    async fn create_retwat(
        &self,
        author_id: Uuid,
        target_id: Uuid,
        content: &str,
    ) -> StoreResult<Option<Twat>> {
        twats::create_retwat(&self.pool, author_id, target_id, content).await
    }

    async fn delete_like(&self, user_id: Uuid, twat_id: Uuid) -> StoreResult<bool> {
        likes::delete(&self.pool, user_id, twat_id).await
    }

    async fn insert_like(&self, user_id: Uuid, twat_id: Uuid) -> StoreResult<bool> {
        likes::insert(&self.pool, user_id, twat_id).await
    }

    async fn insert_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        follows::insert(&self.pool, follower_id, following_id).await
    }

    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        follows::delete(&self.pool, follower_id, following_id).await
    }

    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        users::find_profile(&self.pool, user_id).await
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> StoreResult<Option<User>> {
        users::update_profile(&self.pool, user_id, update).await
    }

    async fn list_twats(&self, query: FeedQuery) -> StoreResult<Vec<TwatDetails>> {
        twats::list(&self.pool, query).await
    }
}
