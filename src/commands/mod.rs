pub mod auth;
pub mod compose;
pub mod download;
pub mod drafts;
pub mod labels;
pub mod search;
pub mod send;
pub mod thread;
pub mod url;
