use crate::cli::ComposeArgs;
use crate::context::AppContext;
use crate::error::AppResult;

use super::compose::build_message;

pub async fn run(ctx: &AppContext, args: ComposeArgs) -> AppResult<()> {
    let from = ctx.account_email()?;
    let mut client = ctx.gmail_client()?;

    let message = build_message(&mut client, from, args).await?;
    tracing::info!(
        attachments = message.attachments().len(),
        reply = message.thread_id().is_some(),
        "sending message"
    );

    let sent = client
        .send_message(message.build(), message.thread_id().map(ToOwned::to_owned))
        .await?;

    let text = format!(
        "sent message {} (thread {})",
        sent.id,
        sent.thread_id.as_deref().unwrap_or("-")
    );
    ctx.output.emit(&text, &sent)
}
