//! # Session Auth
//!
//! Resolves the caller's identity for every request from the session store written by the
//! sign-in provider.
//!
//! ## Modules
//! - `session`: `Session` types, the `SessionStore` seam and its PostgreSQL implementation
//! - `token`: session token extraction from cookies / `Authorization` header
//! - `middleware`: Actix middleware attaching the resolved `Session` to the request
//!
//! The middleware never rejects a request; handlers decide whether a missing session is an
//! error by inspecting `MaybeSession`.

pub mod middleware;
pub mod session;
pub mod token;

pub use middleware::{MaybeSession, SessionMiddleware};
pub use session::{PgSessionStore, Session, SessionError, SessionStore, SessionUser};
pub use token::{TokenSource, DEFAULT_SESSION_COOKIES};
