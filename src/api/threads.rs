use super::client::GmailClient;
use super::models::{ModifyLabelsRequest, Thread, ThreadList};
use crate::error::AppResult;

/// Upper bound Gmail accepts for `maxResults`.
pub const MAX_SEARCH_RESULTS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadFormat {
    Full,
    Metadata,
}

impl ThreadFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ThreadFormat::Full => "full",
            ThreadFormat::Metadata => "metadata",
        }
    }
}

pub fn list_endpoint() -> &'static str {
    "/users/me/threads"
}

pub fn thread_endpoint(id: &str) -> String {
    format!("/users/me/threads/{id}")
}

pub fn modify_endpoint(id: &str) -> String {
    format!("/users/me/threads/{id}/modify")
}

pub fn search_query(query: &str, max: u32, page_token: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", query.to_string()),
        ("maxResults", max.min(MAX_SEARCH_RESULTS).to_string()),
    ];
    if let Some(token) = page_token {
        params.push(("pageToken", token.to_string()));
    }
    params
}

pub fn get_query(format: ThreadFormat, metadata_headers: &[&str]) -> Vec<(&'static str, String)> {
    let mut params = vec![("format", format.as_str().to_string())];
    if format == ThreadFormat::Metadata {
        params.extend(
            metadata_headers
                .iter()
                .map(|header| ("metadataHeaders", header.to_string())),
        );
    }
    params
}

impl GmailClient {
    pub async fn search_threads(
        &mut self,
        query: &str,
        max: u32,
        page_token: Option<&str>,
    ) -> AppResult<ThreadList> {
        self.get(list_endpoint(), &search_query(query, max, page_token))
            .await
    }

    /// `metadata_headers` only applies to [`ThreadFormat::Metadata`].
    pub async fn get_thread(
        &mut self,
        id: &str,
        format: ThreadFormat,
        metadata_headers: &[&str],
    ) -> AppResult<Thread> {
        self.get(&thread_endpoint(id), &get_query(format, metadata_headers))
            .await
    }

    pub async fn modify_thread_labels(
        &mut self,
        id: &str,
        add: &[String],
        remove: &[String],
    ) -> AppResult<Thread> {
        let body = ModifyLabelsRequest {
            add_label_ids: add.to_vec(),
            remove_label_ids: remove.to_vec(),
        };
        self.post(&modify_endpoint(id), &body).await
    }
}
