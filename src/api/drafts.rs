use serde::Serialize;

use super::client::GmailClient;
use super::models::{Draft, DraftList, RawMessage, SentMessage};
use crate::error::AppResult;

#[derive(Debug, Serialize)]
struct DraftRequest<'a> {
    message: &'a RawMessage,
}

#[derive(Debug, Serialize)]
struct SendDraftRequest<'a> {
    id: &'a str,
}

pub fn list_endpoint() -> &'static str {
    "/users/me/drafts"
}

pub fn draft_endpoint(id: &str) -> String {
    format!("/users/me/drafts/{id}")
}

pub fn send_endpoint() -> &'static str {
    "/users/me/drafts/send"
}

impl GmailClient {
    pub async fn list_drafts(&mut self) -> AppResult<DraftList> {
        self.get(list_endpoint(), &[]).await
    }

    pub async fn get_draft(&mut self, id: &str) -> AppResult<Draft> {
        self.get(&draft_endpoint(id), &[("format", "full".to_string())])
            .await
    }

    pub async fn create_draft(&mut self, raw: String, thread_id: Option<String>) -> AppResult<Draft> {
        let message = RawMessage { raw, thread_id };
        self.post(list_endpoint(), &DraftRequest { message: &message })
            .await
    }

    pub async fn send_draft(&mut self, id: &str) -> AppResult<SentMessage> {
        self.post(send_endpoint(), &SendDraftRequest { id }).await
    }

    pub async fn delete_draft(&mut self, id: &str) -> AppResult<()> {
        self.delete(&draft_endpoint(id)).await
    }
}
