use super::models::{TwatDetails, TwatView};
use uuid::Uuid;

/// Whether the viewer has liked / re-posted a twat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfInteractions {
    pub self_like: bool,
    pub self_retwat: bool,
}

impl SelfInteractions {
    pub fn of(viewer_id: Uuid, details: &TwatDetails) -> Self {
        Self {
            self_like: details.likes.iter().any(|like| like.user_id == viewer_id),
            self_retwat: details
                .retwats
                .iter()
                .any(|retwat| retwat.author_id == viewer_id),
        }
    }
}

impl TwatView {
    pub fn for_viewer(details: TwatDetails, viewer_id: Uuid) -> Self {
        let SelfInteractions {
            self_like,
            self_retwat,
        } = SelfInteractions::of(viewer_id, &details);
        Self {
            details,
            self_like,
            self_retwat,
        }
    }

    /// A just-created twat has no interactions yet.
    pub fn fresh(details: TwatDetails) -> Self {
        Self {
            details,
            self_like: false,
            self_retwat: false,
        }
    }
}
