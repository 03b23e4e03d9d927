use crate::api::GmailClient;
use crate::api::messages::REPLY_HEADERS;
use crate::cli::ComposeArgs;
use crate::error::{AppError, AppResult};
use crate::mail::MessageBuilder;
use crate::mail::mime::reply_references;

/// Assembles the message for `send` and `drafts create`, threading it under
/// `--reply-to` when given.
pub async fn build_message(
    client: &mut GmailClient,
    from: String,
    args: ComposeArgs,
) -> AppResult<MessageBuilder> {
    let to = addresses(args.to);
    if to.is_empty() {
        return Err(AppError::InvalidInput("at least one --to address is required".to_string()));
    }

    let mut builder = MessageBuilder::new()
        .from(from)
        .to(to)
        .cc(addresses(args.cc))
        .bcc(addresses(args.bcc))
        .subject(args.subject)
        .body(args.body);

    if let Some(message_id) = args.reply_to.as_deref() {
        builder = thread_under(client, builder, message_id).await?;
    }

    for path in &args.attach {
        builder = builder.attach(path)?;
    }

    Ok(builder)
}

async fn thread_under(
    client: &mut GmailClient,
    builder: MessageBuilder,
    message_id: &str,
) -> AppResult<MessageBuilder> {
    tracing::info!(message_id, "fetching message to reply to");
    let parent = client
        .get_message_metadata(message_id, &REPLY_HEADERS)
        .await?;

    let header_id = parent.header("Message-ID").ok_or_else(|| {
        AppError::InvalidInput(format!("message {message_id} has no Message-ID header"))
    })?;
    let references = reply_references(parent.header("References"), header_id);

    Ok(builder.reply_to(header_id, Some(references), parent.thread_id.clone()))
}

fn addresses(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|address| address.trim().to_string())
        .filter(|address| !address.is_empty())
        .collect()
}
