pub mod base64url;
pub mod mime;
pub mod payload;

pub use mime::MessageBuilder;
pub use payload::{AttachmentInfo, Header, MimePart, PartContent};
