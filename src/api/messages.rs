use super::client::GmailClient;
use super::models::{Message, RawMessage, SentMessage};
use crate::error::AppResult;

/// Headers needed to thread a reply under an existing message.
pub const REPLY_HEADERS: [&str; 2] = ["Message-ID", "References"];

pub fn message_endpoint(id: &str) -> String {
    format!("/users/me/messages/{id}")
}

pub fn send_endpoint() -> &'static str {
    "/users/me/messages/send"
}

pub fn metadata_query(headers: &[&str]) -> Vec<(&'static str, String)> {
    std::iter::once(("format", "metadata".to_string()))
        .chain(
            headers
                .iter()
                .map(|header| ("metadataHeaders", header.to_string())),
        )
        .collect()
}

impl GmailClient {
    pub async fn get_message_metadata(&mut self, id: &str, headers: &[&str]) -> AppResult<Message> {
        self.get(&message_endpoint(id), &metadata_query(headers))
            .await
    }

    pub async fn send_message(&mut self, raw: String, thread_id: Option<String>) -> AppResult<SentMessage> {
        self.post(send_endpoint(), &RawMessage { raw, thread_id })
            .await
    }
}
