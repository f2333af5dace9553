//! Shared fixtures for twat-service integration tests
#![allow(dead_code)]

pub mod memory_store;
pub mod mock_uploader;

use chrono::{Duration, Utc};
use memory_store::InMemoryStore;
use mock_uploader::MockUploader;
use session_auth::{Session, SessionUser};
use std::sync::Arc;
use twat_service::rpc::RpcContext;
use uuid::Uuid;

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub uploader: Arc<MockUploader>,
    pub ctx: RpcContext,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_uploader(MockUploader::new())
    }

    pub fn with_uploader(uploader: MockUploader) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let uploader = Arc::new(uploader);
        let ctx = RpcContext::new(store.clone(), uploader.clone());
        Self {
            store,
            uploader,
            ctx,
        }
    }
}

pub fn session_for(user_id: Uuid) -> Session {
    Session {
        user: SessionUser {
            id: user_id,
            name: Some("tester".to_string()),
            email: Some("tester@example.com".to_string()),
            image: None,
        },
        expires: Utc::now() + Duration::days(30),
    }
}
