use super::client::GmailClient;
use super::models::{Label, LabelList};
use crate::error::AppResult;

pub fn list_labels_endpoint() -> &'static str {
    "/users/me/labels"
}

impl GmailClient {
    pub async fn list_labels(&mut self) -> AppResult<Vec<Label>> {
        let list: LabelList = self.get(list_labels_endpoint(), &[]).await?;
        Ok(list.labels)
    }
}
