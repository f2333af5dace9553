/// Twat Service Library
///
/// RPC backend for the twats social app: posts ("twats"), re-posts, likes, follows and
/// profiles, served over a tRPC-compatible HTTP channel.
///
/// # Modules
///
/// - `rpc`: Procedure table, auth guard, envelope and HTTP wiring
/// - `procedures`: Twat and user procedures
/// - `repository`: `SocialStore` seam and its PostgreSQL implementation
/// - `media`: `MediaUploader` seam and the ImageKit client
/// - `domain`: Entities, attachment policy, self-interaction flags
/// - `db`: Connection pool and migrations
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod media;
pub mod metrics;
pub mod procedures;
pub mod repository;
pub mod rpc;

pub use config::Config;
pub use error::{Result, ServiceError};
