use std::fs;
use std::io;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;

use crate::error::{AppError, AppResult};

use super::base64url;

const BASE64_LINE_WIDTH: usize = 76;
const QP_LINE_LIMIT: usize = 76;
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

const MIME_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("zip", "application/zip"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("json", "application/json"),
    ("xml", "application/xml"),
];

#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Accumulates an outgoing message and renders it as the base64url `raw`
/// value the Gmail send and draft endpoints expect.
///
/// Setters never validate; [`MessageBuilder::build`] decides the structure.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    from: String,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: String,
    body: String,
    attachments: Vec<Attachment>,
    in_reply_to: Option<String>,
    references: Option<String>,
    thread_id: Option<String>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = address.into();
        self
    }

    pub fn to(mut self, addresses: Vec<String>) -> Self {
        self.to = addresses;
        self
    }

    pub fn cc(mut self, addresses: Vec<String>) -> Self {
        self.cc = addresses;
        self
    }

    pub fn bcc(mut self, addresses: Vec<String>) -> Self {
        self.bcc = addresses;
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Reads the file now so a bad path fails here rather than in `build`.
    pub fn attach(mut self, path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => AppError::FileNotFound(path.to_path_buf()),
            _ => AppError::Io(err),
        })?;

        let filename = path
            .file_name()
            .map(|value| value.to_string_lossy().to_string())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("invalid attachment path: {}", path.display()))
            })?;

        self.attachments.push(Attachment {
            mime_type: mime_type_for(path).to_string(),
            filename,
            data,
        });
        Ok(self)
    }

    /// Threads the message under `message_id`. Without an explicit chain the
    /// `References` header falls back to `message_id` alone.
    pub fn reply_to(
        mut self,
        message_id: impl Into<String>,
        references: Option<String>,
        thread_id: Option<String>,
    ) -> Self {
        let message_id = message_id.into();
        self.references = Some(references.unwrap_or_else(|| message_id.clone()));
        self.in_reply_to = Some(message_id);
        self.thread_id = thread_id;
        self
    }

    /// Thread to pass alongside `raw` in the API payload. Never written into
    /// the message itself.
    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn build(&self) -> String {
        base64url::encode(self.render().as_bytes())
    }

    /// The RFC2822 text before transport encoding.
    pub fn render(&self) -> String {
        if self.attachments.is_empty() {
            let headers = self.headers("text/plain; charset=utf-8");
            return format!("{headers}\r\n{}", self.body);
        }

        let boundary = random_boundary();
        let headers = self.headers(&format!("multipart/mixed; boundary=\"{boundary}\""));
        format!("{headers}\r\n{}", self.multipart_body(&boundary))
    }

    fn headers(&self, content_type: &str) -> String {
        let mut headers = vec![
            "MIME-Version: 1.0".to_string(),
            format!("From: {}", self.from),
            format!("To: {}", self.to.join(", ")),
        ];

        if !self.cc.is_empty() {
            headers.push(format!("Cc: {}", self.cc.join(", ")));
        }

        if !self.bcc.is_empty() {
            headers.push(format!("Bcc: {}", self.bcc.join(", ")));
        }

        headers.push(format!("Subject: {}", encode_subject(&self.subject)));
        headers.push(format!("Content-Type: {content_type}"));

        if let Some(in_reply_to) = &self.in_reply_to {
            headers.push(format!("In-Reply-To: {in_reply_to}"));
        }
        if let Some(references) = &self.references {
            headers.push(format!("References: {references}"));
        }

        let mut out = headers.join("\r\n");
        out.push_str("\r\n");
        out
    }

    fn multipart_body(&self, boundary: &str) -> String {
        let mut parts = vec![format!(
            "Content-Type: text/plain; charset=utf-8\r\nContent-Transfer-Encoding: quoted-printable\r\n\r\n{}",
            quoted_printable(&self.body)
        )];

        for attachment in &self.attachments {
            let filename = escape_header_value(&attachment.filename);
            parts.push(format!(
                "Content-Type: {}; name=\"{filename}\"\r\nContent-Disposition: attachment; filename=\"{filename}\"\r\nContent-Transfer-Encoding: base64\r\n\r\n{}",
                attachment.mime_type,
                fold_base64_lines(&STANDARD.encode(&attachment.data))
            ));
        }

        let separator = format!("\r\n--{boundary}\r\n");
        format!("--{boundary}\r\n{}\r\n--{boundary}--", parts.join(&separator))
    }
}

pub fn mime_type_for(path: &Path) -> &'static str {
    let Some(extension) = path.extension().and_then(|value| value.to_str()) else {
        return DEFAULT_MIME_TYPE;
    };
    let extension = extension.to_ascii_lowercase();

    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == extension)
        .map_or(DEFAULT_MIME_TYPE, |(_, mime_type)| *mime_type)
}

/// Extends a parent's `References` chain with its `Message-ID`.
pub fn reply_references(existing: Option<&str>, message_id: &str) -> String {
    match existing.map(str::trim).filter(|value| !value.is_empty()) {
        Some(existing) => format!("{existing} {message_id}"),
        None => message_id.to_string(),
    }
}

/// RFC2047 `B` encoding, applied only when the subject leaves printable ASCII.
fn encode_subject(subject: &str) -> String {
    if subject.bytes().all(|byte| (0x20..=0x7e).contains(&byte)) {
        return subject.to_string();
    }

    format!("=?UTF-8?B?{}?=", STANDARD.encode(subject.as_bytes()))
}

fn quoted_printable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push_str("\r\n");
        }

        let line = line.strip_suffix('\r').unwrap_or(line);
        let bytes = line.as_bytes();
        let mut width = 0;

        for (position, &byte) in bytes.iter().enumerate() {
            let trailing_whitespace = position + 1 == bytes.len() && matches!(byte, b' ' | b'\t');
            let literal = !trailing_whitespace
                && byte != b'='
                && (matches!(byte, b' ' | b'\t') || (33..=126).contains(&byte));

            let piece = if literal {
                (byte as char).to_string()
            } else {
                format!("={byte:02X}")
            };

            // Leave room for the trailing `=` of a soft break.
            if width + piece.len() > QP_LINE_LIMIT - 1 {
                out.push_str("=\r\n");
                width = 0;
            }

            out.push_str(&piece);
            width += piece.len();
        }
    }

    out
}

fn fold_base64_lines(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / BASE64_LINE_WIDTH * 2 + 2);
    let mut start = 0;
    while start < input.len() {
        let end = (start + BASE64_LINE_WIDTH).min(input.len());
        out.push_str(&input[start..end]);
        out.push_str("\r\n");
        start = end;
    }
    out
}

/// 16 random bytes as 32 hex characters.
fn random_boundary() -> String {
    let mut bytes = [0_u8; 16];
    rand::thread_rng().fill(&mut bytes);
    let token = bytes
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    format!("gmcli_{token}")
}

fn escape_header_value(value: &str) -> String {
    value.replace(['"', '\r', '\n'], "")
}
