//! In-memory SocialStore for integration tests
//!
//! Mirrors the schema's uniqueness rules (one like per pair, one re-post per
//! author/original, one follow edge per pair) and counts every call so tests can assert
//! that a request never reached persistence.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use twat_service::domain::models::{
    EmbeddedTwat, FeedQuery, Like, NewTwat, Profile, ProfileUpdate, Twat, TwatDetails, User,
    UserSummary,
};
use twat_service::repository::{SocialStore, StoreResult};
use uuid::Uuid;

#[derive(Default)]
struct State {
    users: Vec<User>,
    twats: Vec<Twat>,
    likes: Vec<Like>,
    follows: HashSet<(Uuid, Uuid)>,
    ticks: i64,
}

impl State {
    /// Strictly increasing timestamps keep feed ordering deterministic.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(self.ticks)
    }

    fn summary(&self, user_id: Uuid) -> UserSummary {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| UserSummary {
                id: u.id,
                name: u.name.clone(),
                image: u.image.clone(),
            })
            .unwrap_or(UserSummary {
                id: user_id,
                name: None,
                image: None,
            })
    }

    fn details(&self, twat: &Twat) -> TwatDetails {
        TwatDetails {
            twat: twat.clone(),
            author: self.summary(twat.author_id),
            likes: self
                .likes
                .iter()
                .filter(|l| l.twat_id == twat.id)
                .cloned()
                .collect(),
            retwats: self
                .twats
                .iter()
                .filter(|t| t.embedded_twat_id == Some(twat.id))
                .cloned()
                .collect(),
            embedded_twat: twat.embedded_twat_id.and_then(|embedded_id| {
                self.twats
                    .iter()
                    .find(|t| t.id == embedded_id)
                    .map(|embedded| EmbeddedTwat {
                        twat: embedded.clone(),
                        author: self.summary(embedded.author_id),
                    })
            }),
        }
    }

    fn twat_exists(&self, twat_id: Uuid) -> bool {
        self.twats.iter().any(|t| t.id == twat_id)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    calls: AtomicUsize,
    /// Writes fail as if the database were unreachable
    fail_writes: AtomicBool,
    /// Reads omit re-posts, as a snapshot taken before a concurrent re-post would
    stale_reads: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn serve_stale_reads(&self) {
        self.stale_reads.store(true, Ordering::SeqCst);
    }

    fn check_write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }

    /// Number of `SocialStore` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seed_user(&self, name: &str) -> Uuid {
        let mut state = self.state.lock().unwrap();
        let created_at = state.next_timestamp();
        let user = User {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            image: None,
            bio: None,
            banner: None,
            level: 0,
            xp: 0,
            created_at,
        };
        let id = user.id;
        state.users.push(user);
        id
    }

    pub fn seed_twat(&self, author_id: Uuid, content: &str) -> Twat {
        let mut state = self.state.lock().unwrap();
        let created_at = state.next_timestamp();
        let twat = Twat {
            id: Uuid::new_v4(),
            author_id,
            content: content.to_string(),
            attachment: None,
            embedded_twat_id: None,
            created_at,
        };
        state.twats.push(twat.clone());
        twat
    }

    pub fn seed_retwat(&self, author_id: Uuid, target_id: Uuid) -> Twat {
        let mut state = self.state.lock().unwrap();
        let created_at = state.next_timestamp();
        let twat = Twat {
            id: Uuid::new_v4(),
            author_id,
            content: "already".to_string(),
            attachment: None,
            embedded_twat_id: Some(target_id),
            created_at,
        };
        state.twats.push(twat.clone());
        twat
    }

    pub fn seed_like(&self, user_id: Uuid, twat_id: Uuid) {
        let mut state = self.state.lock().unwrap();
        let created_at = state.next_timestamp();
        state.likes.push(Like {
            user_id,
            twat_id,
            created_at,
        });
    }

    pub fn like_count(&self, twat_id: Uuid) -> usize {
        let state = self.state.lock().unwrap();
        state.likes.iter().filter(|l| l.twat_id == twat_id).count()
    }

    pub fn retwat_count(&self, author_id: Uuid, target_id: Uuid) -> usize {
        let state = self.state.lock().unwrap();
        state
            .twats
            .iter()
            .filter(|t| t.author_id == author_id && t.embedded_twat_id == Some(target_id))
            .count()
    }

    pub fn twat(&self, twat_id: Uuid) -> Option<Twat> {
        let state = self.state.lock().unwrap();
        state.twats.iter().find(|t| t.id == twat_id).cloned()
    }

    pub fn follows(&self, follower_id: Uuid, following_id: Uuid) -> bool {
        let state = self.state.lock().unwrap();
        state.follows.contains(&(follower_id, following_id))
    }
}

#[async_trait]
impl SocialStore for InMemoryStore {
    async fn find_twat(&self, twat_id: Uuid) -> StoreResult<Option<TwatDetails>> {
        self.record_call();
        let state = self.state.lock().unwrap();
        let mut details = state
            .twats
            .iter()
            .find(|t| t.id == twat_id)
            .map(|t| state.details(t));
        if self.stale_reads.load(Ordering::SeqCst) {
            if let Some(details) = details.as_mut() {
                details.retwats.clear();
            }
        }
        Ok(details)
    }

    async fn create_twat(&self, new_twat: NewTwat) -> StoreResult<TwatDetails> {
        self.record_call();
        self.check_write()?;
        let mut state = self.state.lock().unwrap();
        let created_at = state.next_timestamp();
        let twat = Twat {
            id: Uuid::new_v4(),
            author_id: new_twat.author_id,
            content: new_twat.content,
            attachment: new_twat.attachment,
            embedded_twat_id: None,
            created_at,
        };
        state.twats.push(twat.clone());
        Ok(state.details(&twat))
    }

    async fn create_retwat(
        &self,
        author_id: Uuid,
        target_id: Uuid,
        content: &str,
    ) -> StoreResult<Option<Twat>> {
        self.record_call();
        self.check_write()?;
        let mut state = self.state.lock().unwrap();
        if !state.twat_exists(target_id) {
            return Err(sqlx::Error::RowNotFound);
        }
        let duplicate = state
            .twats
            .iter()
            .any(|t| t.author_id == author_id && t.embedded_twat_id == Some(target_id));
        if duplicate {
            return Ok(None);
        }

        let created_at = state.next_timestamp();
        let twat = Twat {
            id: Uuid::new_v4(),
            author_id,
            content: content.to_string(),
            attachment: None,
            embedded_twat_id: Some(target_id),
            created_at,
        };
        state.twats.push(twat.clone());
        Ok(Some(twat))
    }

    async fn delete_like(&self, user_id: Uuid, twat_id: Uuid) -> StoreResult<bool> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        let before = state.likes.len();
        state
            .likes
            .retain(|l| !(l.user_id == user_id && l.twat_id == twat_id));
        Ok(state.likes.len() < before)
    }

    async fn insert_like(&self, user_id: Uuid, twat_id: Uuid) -> StoreResult<bool> {
        self.record_call();
        self.check_write()?;
        let mut state = self.state.lock().unwrap();
        if !state.twat_exists(twat_id) {
            return Err(sqlx::Error::RowNotFound);
        }
        if state
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.twat_id == twat_id)
        {
            return Ok(false);
        }
        let created_at = state.next_timestamp();
        state.likes.push(Like {
            user_id,
            twat_id,
            created_at,
        });
        Ok(true)
    }

    async fn insert_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        if !state.users.iter().any(|u| u.id == following_id) {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(state.follows.insert((follower_id, following_id)))
    }

    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        Ok(state.follows.remove(&(follower_id, following_id)))
    }

    async fn find_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        self.record_call();
        let state = self.state.lock().unwrap();
        let Some(user) = state.users.iter().find(|u| u.id == user_id).cloned() else {
            return Ok(None);
        };

        let followers = state
            .follows
            .iter()
            .filter(|(_, following)| *following == user_id)
            .map(|(follower, _)| state.summary(*follower))
            .collect();
        let following = state
            .follows
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .map(|(_, following)| state.summary(*following))
            .collect();
        let twat_count = state.twats.iter().filter(|t| t.author_id == user_id).count() as i64;

        Ok(Some(Profile {
            user,
            followers,
            following,
            twat_count,
        }))
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> StoreResult<Option<User>> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            user.name = Some(name);
        }
        if let Some(bio) = update.bio {
            user.bio = Some(bio);
        }
        if let Some(image) = update.image {
            user.image = Some(image);
        }
        if let Some(banner) = update.banner {
            user.banner = Some(banner);
        }
        Ok(Some(user.clone()))
    }

    async fn list_twats(&self, query: FeedQuery) -> StoreResult<Vec<TwatDetails>> {
        self.record_call();
        let state = self.state.lock().unwrap();

        let after = match query.cursor {
            Some(cursor) => match state.twats.iter().find(|t| t.id == cursor) {
                Some(t) => Some((t.created_at, t.id)),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let mut rows: Vec<&Twat> = state
            .twats
            .iter()
            .filter(|t| query.author_id.map_or(true, |author| t.author_id == author))
            .filter(|t| after.map_or(true, |key| (t.created_at, t.id) < key))
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(rows
            .into_iter()
            .take(query.limit.max(0) as usize)
            .map(|t| state.details(t))
            .collect())
    }
}
