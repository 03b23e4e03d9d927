use std::path::{Path, PathBuf};

use crate::api::GmailClient;
use crate::error::AppResult;
use crate::mail::AttachmentInfo;
use crate::output::Output;

const ATTACHMENT_ID_PREFIX_LEN: usize = 8;
const FALLBACK_FILE_NAME: &str = "attachment";

/// `{messageId}_{first 8 of attachmentId}_{sanitized name}`
pub fn attachment_file_name(message_id: &str, attachment_id: &str, filename: &str) -> String {
    let prefix = attachment_id
        .chars()
        .take(ATTACHMENT_ID_PREFIX_LEN)
        .collect::<String>();
    format!("{message_id}_{prefix}_{}", sanitize_file_name(filename))
}

/// Drops directory components and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let sanitized = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();

    if sanitized.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        sanitized
    }
}

/// Downloads every attachment reachable through the attachments endpoint.
/// Inline parts and empty downloads are skipped with a warning.
pub async fn save_attachments(
    client: &mut GmailClient,
    output: &Output,
    dir: &Path,
    message_id: &str,
    attachments: &[AttachmentInfo],
) -> AppResult<Vec<PathBuf>> {
    let mut saved = Vec::new();

    for attachment in attachments {
        if attachment.attachment_id.is_empty() {
            continue;
        }

        tracing::info!(filename = %attachment.filename, "downloading attachment");
        let data = client
            .download_attachment(message_id, &attachment.attachment_id)
            .await?;
        if data.is_empty() {
            output.warn(&format!(
                "failed to download {}: empty data",
                attachment.filename
            ));
            continue;
        }

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(attachment_file_name(
            message_id,
            &attachment.attachment_id,
            &attachment.filename,
        ));
        tokio::fs::write(&path, data).await?;
        saved.push(path);
    }

    Ok(saved)
}
