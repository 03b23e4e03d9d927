use serde::Serialize;

use crate::cli::{LabelsCommand, LabelsModifyArgs};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::resolve::{LabelResolver, thread_id};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyResult {
    pub threads: Vec<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub not_found: Vec<String>,
}

pub async fn run(ctx: &AppContext, command: LabelsCommand) -> AppResult<()> {
    match command {
        LabelsCommand::Ls => list(ctx).await,
        LabelsCommand::Modify(args) => modify(ctx, args).await,
    }
}

async fn list(ctx: &AppContext) -> AppResult<()> {
    let mut client = ctx.gmail_client()?;
    let mut labels = client.list_labels().await?;
    labels.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let text = labels
        .iter()
        .map(|label| format!("{}\t{}", label.id, label.name))
        .collect::<Vec<_>>()
        .join("\n");
    ctx.output.emit(&text, &labels)
}

async fn modify(ctx: &AppContext, args: LabelsModifyArgs) -> AppResult<()> {
    if args.add.is_empty() && args.remove.is_empty() {
        return Err(AppError::InvalidInput(
            "nothing to do: pass --add and/or --remove".to_string(),
        ));
    }

    let mut client = ctx.gmail_client()?;
    let resolver = LabelResolver::new(client.list_labels().await?);
    let add = resolver.resolve_many(&args.add);
    let remove = resolver.resolve_many(&args.remove);

    if !add.not_found.is_empty() {
        ctx.output
            .warn(&format!("labels not found (add): {}", add.not_found.join(", ")));
    }
    if !remove.not_found.is_empty() {
        ctx.output.warn(&format!(
            "labels not found (remove): {}",
            remove.not_found.join(", ")
        ));
    }

    if add.resolved.is_empty() && remove.resolved.is_empty() {
        return Err(AppError::InvalidInput("no valid labels to modify".to_string()));
    }

    let mut threads = Vec::with_capacity(args.thread_ids.len());
    for raw in &args.thread_ids {
        let id = thread_id::parse(raw).thread_id;
        tracing::info!(thread_id = %id, "modifying thread labels");
        client
            .modify_thread_labels(&id, &add.resolved, &remove.resolved)
            .await?;
        threads.push(id);
    }

    let result = ModifyResult {
        threads,
        added: add.resolved,
        removed: remove.resolved,
        not_found: [add.not_found, remove.not_found].concat(),
    };
    let text = format!("labels modified on {} thread(s)", result.threads.len());
    ctx.output.emit(&text, &result)
}
