/// Procedure bodies for the RPC router.
///
/// Each function receives an already-authenticated caller and decoded, validated input.
pub mod twats;
pub mod users;

use uuid::Uuid;

/// Entity ids arrive as plain strings; anything that is not a UUID names no row.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}
