pub mod attachment;
pub mod interactions;
pub mod models;

pub use attachment::{Attachment, AttachmentKind};
pub use interactions::SelfInteractions;
