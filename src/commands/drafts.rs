use serde::Serialize;

use crate::cli::{ComposeArgs, DraftGetArgs, DraftsCommand};
use crate::context::AppContext;
use crate::error::AppResult;

use super::compose::build_message;
use super::download::save_attachments;
use super::thread::MessageView;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSummary {
    pub draft_id: String,
    pub message_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub draft_id: String,
    pub message: Option<MessageView>,
}

pub async fn run(ctx: &AppContext, command: DraftsCommand) -> AppResult<()> {
    match command {
        DraftsCommand::Ls => list(ctx).await,
        DraftsCommand::Get(args) => get(ctx, args).await,
        DraftsCommand::Create(args) => create(ctx, args).await,
        DraftsCommand::Send(args) => {
            let mut client = ctx.gmail_client()?;
            let sent = client.send_draft(&args.id).await?;
            let text = format!("draft {} sent as message {}", args.id, sent.id);
            ctx.output.emit(&text, &sent)
        }
        DraftsCommand::Delete(args) => {
            let mut client = ctx.gmail_client()?;
            client.delete_draft(&args.id).await?;
            let summary = DraftSummary {
                draft_id: args.id,
                message_id: String::new(),
            };
            ctx.output
                .emit(&format!("draft deleted: {}", summary.draft_id), &summary)
        }
    }
}

async fn list(ctx: &AppContext) -> AppResult<()> {
    let mut client = ctx.gmail_client()?;
    let drafts = client
        .list_drafts()
        .await?
        .drafts
        .into_iter()
        .map(|draft| DraftSummary {
            message_id: draft.message.map(|message| message.id).unwrap_or_default(),
            draft_id: draft.id,
        })
        .collect::<Vec<_>>();

    let text = if drafts.is_empty() {
        "no drafts found".to_string()
    } else {
        drafts
            .iter()
            .map(|draft| format!("{}\t{}", draft.draft_id, draft.message_id))
            .collect::<Vec<_>>()
            .join("\n")
    };
    ctx.output.emit(&text, &drafts)
}

async fn get(ctx: &AppContext, args: DraftGetArgs) -> AppResult<()> {
    let mut client = ctx.gmail_client()?;
    let draft = client.get_draft(&args.id).await?;

    let mut message = draft.message.as_ref().map(MessageView::from_message);
    if let (true, Some(view)) = (args.download, message.as_mut()) {
        view.saved = save_attachments(
            &mut client,
            &ctx.output,
            &ctx.attachments_dir(),
            &view.id,
            &view.attachments,
        )
        .await?;
    }

    let text = match &message {
        Some(view) => format!("Draft-ID: {}\n{}", draft.id, view.render_text()),
        None => format!("Draft-ID: {}\n(empty draft)", draft.id),
    };
    let view = DraftView {
        draft_id: draft.id,
        message,
    };
    ctx.output.emit(&text, &view)
}

async fn create(ctx: &AppContext, args: ComposeArgs) -> AppResult<()> {
    let from = ctx.account_email()?;
    let mut client = ctx.gmail_client()?;

    let message = build_message(&mut client, from, args).await?;
    let draft = client
        .create_draft(message.build(), message.thread_id().map(ToOwned::to_owned))
        .await?;

    let summary = DraftSummary {
        message_id: draft.message.map(|message| message.id).unwrap_or_default(),
        draft_id: draft.id,
    };
    ctx.output
        .emit(&format!("draft created: {}", summary.draft_id), &summary)
}
