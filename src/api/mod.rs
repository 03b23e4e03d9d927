pub mod attachments;
pub mod client;
pub mod drafts;
pub mod labels;
pub mod messages;
pub mod models;
pub mod redact;
pub mod threads;

pub use client::{ClientConfig, GmailClient};
pub use threads::ThreadFormat;
