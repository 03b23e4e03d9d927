use super::client::GmailClient;
use super::models::AttachmentBody;
use crate::error::AppResult;
use crate::mail::base64url;

pub fn attachment_endpoint(message_id: &str, attachment_id: &str) -> String {
    format!("/users/me/messages/{message_id}/attachments/{attachment_id}")
}

impl GmailClient {
    pub async fn get_attachment(
        &mut self,
        message_id: &str,
        attachment_id: &str,
    ) -> AppResult<AttachmentBody> {
        self.get(&attachment_endpoint(message_id, attachment_id), &[])
            .await
    }

    /// Attachment bytes; empty when Gmail returned no data.
    pub async fn download_attachment(
        &mut self,
        message_id: &str,
        attachment_id: &str,
    ) -> AppResult<Vec<u8>> {
        let body = self.get_attachment(message_id, attachment_id).await?;
        Ok(body
            .data
            .as_deref()
            .map(base64url::decode)
            .unwrap_or_default())
    }
}
