use serde::Serialize;

use crate::api::ThreadFormat;
use crate::api::models::Thread;
use crate::cli::SearchArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::resolve::LabelResolver;

const SUMMARY_HEADERS: [&str; 3] = ["From", "Subject", "Date"];
const NO_SUBJECT: &str = "(no subject)";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub threads: Vec<ThreadSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub thread_id: String,
    pub date: String,
    pub from: String,
    pub subject: String,
    pub labels: Vec<String>,
}

pub async fn run(ctx: &AppContext, args: SearchArgs) -> AppResult<()> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("missing search query".to_string()));
    }

    let mut client = ctx.gmail_client()?;
    let labels = LabelResolver::new(client.list_labels().await?);

    tracing::info!(query, "searching threads");
    let list = client
        .search_threads(query, args.max, args.page.as_deref())
        .await?;

    let mut threads = Vec::with_capacity(list.threads.len());
    for entry in &list.threads {
        let thread = client
            .get_thread(&entry.id, ThreadFormat::Metadata, &SUMMARY_HEADERS)
            .await?;
        if let Some(summary) = summarize(&thread, &labels) {
            threads.push(summary);
        }
    }

    let result = SearchResult {
        threads,
        next_page_token: list.next_page_token,
    };
    ctx.output.emit(&render_text(&result), &result)
}

/// First-message metadata; `None` for threads without messages.
pub fn summarize(thread: &Thread, labels: &LabelResolver) -> Option<ThreadSummary> {
    let first = thread.messages.first()?;

    Some(ThreadSummary {
        thread_id: thread.id.clone(),
        date: first.header("Date").unwrap_or_default().to_string(),
        from: sender_address(first.header("From").unwrap_or_default()).to_string(),
        subject: first.header("Subject").unwrap_or(NO_SUBJECT).to_string(),
        labels: first
            .label_ids
            .iter()
            .map(|id| labels.display_name(id).to_string())
            .collect(),
    })
}

/// `Jane <jane@example.com>` -> `jane@example.com`; anything else as-is.
pub fn sender_address(from: &str) -> &str {
    from.split_once('<')
        .and_then(|(_, rest)| rest.split_once('>'))
        .map(|(address, _)| address)
        .unwrap_or(from)
}

fn render_text(result: &SearchResult) -> String {
    if result.threads.is_empty() {
        return "no threads found".to_string();
    }

    let mut lines = result
        .threads
        .iter()
        .map(|thread| {
            let labels = if thread.labels.is_empty() {
                String::new()
            } else {
                format!("[{}]", thread.labels.join(", "))
            };
            format!(
                "{}\t{}\t{}\t{}\t{labels}",
                thread.thread_id, thread.date, thread.from, thread.subject
            )
        })
        .collect::<Vec<_>>();

    if let Some(token) = &result.next_page_token {
        lines.push(String::new());
        lines.push(format!("next page: --page {token}"));
    }

    lines.join("\n")
}
