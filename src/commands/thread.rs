use std::path::PathBuf;

use serde::Serialize;

use crate::api::ThreadFormat;
use crate::api::models::Message;
use crate::cli::ThreadArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::mail::AttachmentInfo;
use crate::output::text::format_size;
use crate::resolve::{IdSource, thread_id};

use super::download::save_attachments;

const NO_SUBJECT: &str = "(no subject)";
const NO_BODY: &str = "(no text/plain body)";
const MESSAGE_SEPARATOR: &str =
    "\n------------------------------------------------------------\n";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadView {
    pub thread_id: String,
    pub source: IdSource,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: String,
    pub from: String,
    pub to: String,
    pub cc: Option<String>,
    pub date: String,
    pub subject: String,
    pub message_id_header: String,
    pub labels: Vec<String>,
    pub body: String,
    pub attachments: Vec<AttachmentInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub saved: Vec<PathBuf>,
}

impl MessageView {
    pub fn from_message(message: &Message) -> Self {
        let header = |name: &str| message.header(name).unwrap_or_default().to_string();

        Self {
            id: message.id.clone(),
            from: header("From"),
            to: header("To"),
            cc: message.header("Cc").map(ToOwned::to_owned),
            date: header("Date"),
            subject: message.header("Subject").unwrap_or(NO_SUBJECT).to_string(),
            message_id_header: header("Message-ID"),
            labels: message.label_ids.clone(),
            body: message.text_body(),
            attachments: message.attachments(),
            saved: Vec::new(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut lines = vec![format!("Message-ID: {}", self.id)];
        if !self.message_id_header.is_empty() {
            lines.push(format!("Header-ID: {}", self.message_id_header));
        }
        lines.push(format!("Date: {}", self.date));
        lines.push(format!("From: {}", self.from));
        lines.push(format!("To: {}", self.to));
        if let Some(cc) = &self.cc {
            lines.push(format!("Cc: {cc}"));
        }
        lines.push(format!("Subject: {}", self.subject));
        if !self.labels.is_empty() {
            lines.push(format!("Labels: {}", self.labels.join(", ")));
        }

        lines.push(String::new());
        lines.push(if self.body.is_empty() {
            NO_BODY.to_string()
        } else {
            self.body.clone()
        });

        if !self.attachments.is_empty() {
            lines.push(String::new());
            lines.push("Attachments:".to_string());
            lines.extend(self.attachments.iter().map(|attachment| {
                format!(
                    "  - {} ({}, {})",
                    attachment.filename,
                    attachment.mime_type,
                    format_size(attachment.size)
                )
            }));
            lines.extend(
                self.saved
                    .iter()
                    .map(|path| format!("  saved: {}", path.display())),
            );
        }

        lines.join("\n")
    }
}

pub async fn run(ctx: &AppContext, args: ThreadArgs) -> AppResult<()> {
    let parsed = thread_id::parse(&args.id);
    tracing::info!(
        original = %parsed.original,
        thread_id = %parsed.thread_id,
        source = ?parsed.source,
        "resolved thread id"
    );

    let mut client = ctx.gmail_client()?;
    let thread = client
        .get_thread(&parsed.thread_id, ThreadFormat::Full, &[])
        .await?;

    let mut messages = Vec::with_capacity(thread.messages.len());
    for message in &thread.messages {
        let mut view = MessageView::from_message(message);
        if args.download {
            view.saved = save_attachments(
                &mut client,
                &ctx.output,
                &ctx.attachments_dir(),
                &message.id,
                &view.attachments,
            )
            .await?;
        }
        messages.push(view);
    }

    let text = if messages.is_empty() {
        "thread has no messages".to_string()
    } else {
        messages
            .iter()
            .map(MessageView::render_text)
            .collect::<Vec<_>>()
            .join(MESSAGE_SEPARATOR)
    };

    let view = ThreadView {
        thread_id: parsed.thread_id,
        source: parsed.source,
        messages,
    };
    ctx.output.emit(&text, &view)
}
