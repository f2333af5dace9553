//! Typed RPC channel over HTTP.
//!
//! Every procedure is addressed by path (`twats.like`, `profile`, ...) under a single
//! endpoint. Queries are served on GET with a URL-encoded `input` parameter, mutations on
//! POST with the input as the JSON body. Responses use the tRPC envelope with plain JSON
//! payloads; no data transformer (`{"json": ...}` wrapping) is applied on either side.

mod envelope;
mod http;
mod router;

pub use envelope::{RpcError, RpcErrorCode, RpcSuccess, GENERIC_FAILURE_MESSAGE};
pub use http::configure;
pub use router::call;

use crate::media::MediaUploader;
use crate::repository::SocialStore;
use std::sync::Arc;

/// Collaborators handed to every procedure
#[derive(Clone)]
pub struct RpcContext {
    pub store: Arc<dyn SocialStore>,
    pub media: Arc<dyn MediaUploader>,
}

impl RpcContext {
    pub fn new(store: Arc<dyn SocialStore>, media: Arc<dyn MediaUploader>) -> Self {
        Self { store, media }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    TwatsGet,
    TwatsCreate,
    TwatsRetwat,
    TwatsLike,
    TwatsFeed,
    UserFollowing,
    UserUpdate,
    Profile,
}

impl Procedure {
    pub const ALL: [Procedure; 8] = [
        Procedure::TwatsGet,
        Procedure::TwatsCreate,
        Procedure::TwatsRetwat,
        Procedure::TwatsLike,
        Procedure::TwatsFeed,
        Procedure::UserFollowing,
        Procedure::UserUpdate,
        Procedure::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Procedure::TwatsGet => "twats.get",
            Procedure::TwatsCreate => "twats.create",
            Procedure::TwatsRetwat => "twats.retwat",
            Procedure::TwatsLike => "twats.like",
            Procedure::TwatsFeed => "twats.feed",
            Procedure::UserFollowing => "user.following",
            Procedure::UserUpdate => "user.update",
            Procedure::Profile => "profile",
        }
    }

    pub fn kind(&self) -> ProcedureKind {
        match self {
            Procedure::TwatsGet | Procedure::TwatsFeed | Procedure::Profile => {
                ProcedureKind::Query
            }
            Procedure::TwatsCreate
            | Procedure::TwatsRetwat
            | Procedure::TwatsLike
            | Procedure::UserFollowing
            | Procedure::UserUpdate => ProcedureKind::Mutation,
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for procedure in Procedure::ALL {
            assert_eq!(Procedure::from_path(procedure.path()), Some(procedure));
        }
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(Procedure::from_path("twats"), None);
        assert_eq!(Procedure::from_path("twats.delete"), None);
        assert_eq!(Procedure::from_path("TWATS.GET"), None);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Procedure::TwatsGet.kind(), ProcedureKind::Query);
        assert_eq!(Procedure::Profile.kind(), ProcedureKind::Query);
        assert_eq!(Procedure::TwatsLike.kind(), ProcedureKind::Mutation);
        assert_eq!(Procedure::UserFollowing.kind(), ProcedureKind::Mutation);
    }
}
