//! Traversal of the MIME payload tree Gmail returns for `format=full` messages.
//!
//! The API hands back a loosely shaped JSON tree. It is deserialized once into
//! [`MimePart`], whose [`PartContent`] says up front whether a node carries body
//! data, child parts or an attachment, so the walkers below match on it instead
//! of probing optional fields.

use serde::{Deserialize, Serialize};

use super::base64url;

const DEFAULT_ATTACHMENT_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPart")]
pub struct MimePart {
    pub mime_type: String,
    pub headers: Vec<Header>,
    pub content: PartContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartContent {
    /// Leaf node. `data` is absent for empty bodies or bodies only reachable
    /// through the attachments endpoint.
    Body { data: Option<String>, size: u64 },
    Multipart(Vec<MimePart>),
    /// Any node with a non-empty filename, whatever its MIME type.
    Attachment {
        filename: String,
        size: u64,
        attachment_id: Option<String>,
        data: Option<String>,
        parts: Vec<MimePart>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    pub filename: String,
    pub mime_type: String,
    pub size: u64,
    /// Empty when the part carries its data inline.
    pub attachment_id: String,
}

impl MimePart {
    pub fn leaf(mime_type: &str, data: Option<&str>) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            headers: Vec::new(),
            content: PartContent::Body {
                data: data.map(ToOwned::to_owned),
                size: data.map_or(0, |value| value.len() as u64),
            },
        }
    }

    pub fn multipart(mime_type: &str, parts: Vec<MimePart>) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            headers: Vec::new(),
            content: PartContent::Multipart(parts),
        }
    }

    pub fn with_headers(mut self, headers: Vec<Header>) -> Self {
        self.headers = headers;
        self
    }

    pub fn children(&self) -> &[MimePart] {
        match &self.content {
            PartContent::Body { .. } => &[],
            PartContent::Multipart(parts) => parts,
            PartContent::Attachment { parts, .. } => parts,
        }
    }

    fn inline_data(&self) -> Option<&str> {
        match &self.content {
            PartContent::Body { data, .. } | PartContent::Attachment { data, .. } => {
                data.as_deref()
            }
            PartContent::Multipart(_) => None,
        }
    }

    fn is_plain_text(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case("text/plain")
    }
}

/// Returns the first `text/plain` body found depth-first, or an empty string.
pub fn extract_text_body(part: &MimePart) -> String {
    if part.is_plain_text() {
        if let Some(data) = part.inline_data() {
            return base64url::decode_to_string(data);
        }
    }

    for child in part.children() {
        let text = extract_text_body(child);
        if !text.is_empty() {
            return text;
        }
    }

    String::new()
}

/// Collects attachment metadata in document (pre-order) order.
pub fn attachments(part: &MimePart) -> Vec<AttachmentInfo> {
    let mut out = Vec::new();
    collect_attachments(part, &mut out);
    out
}

fn collect_attachments(part: &MimePart, out: &mut Vec<AttachmentInfo>) {
    if let PartContent::Attachment {
        filename,
        size,
        attachment_id,
        ..
    } = &part.content
    {
        let mime_type = if part.mime_type.is_empty() {
            DEFAULT_ATTACHMENT_MIME_TYPE.to_string()
        } else {
            part.mime_type.clone()
        };

        out.push(AttachmentInfo {
            filename: filename.clone(),
            mime_type,
            size: *size,
            attachment_id: attachment_id.clone().unwrap_or_default(),
        });
    }

    for child in part.children() {
        collect_attachments(child, out);
    }
}

/// Case-insensitive lookup in the node's own headers; first match wins.
pub fn header<'a>(part: &'a MimePart, name: &str) -> Option<&'a str> {
    part.headers
        .iter()
        .find(|header| header.name.eq_ignore_ascii_case(name))
        .map(|header| header.value.as_str())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPart {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default)]
    body: RawBody,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    parts: Vec<RawPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBody {
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    attachment_id: Option<String>,
}

impl From<RawPart> for MimePart {
    fn from(raw: RawPart) -> Self {
        let parts = raw.parts.into_iter().map(MimePart::from).collect::<Vec<_>>();
        let filename = raw.filename.filter(|name| !name.is_empty());

        let content = match filename {
            Some(filename) => PartContent::Attachment {
                filename,
                size: raw.body.size,
                attachment_id: raw.body.attachment_id.filter(|id| !id.is_empty()),
                data: raw.body.data,
                parts,
            },
            None if !parts.is_empty() => PartContent::Multipart(parts),
            None => PartContent::Body {
                data: raw.body.data,
                size: raw.body.size,
            },
        };

        Self {
            mime_type: raw.mime_type,
            headers: raw.headers,
            content,
        }
    }
}
