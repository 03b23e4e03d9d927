use serde::Serialize;

use crate::cli::UrlArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::resolve::thread_id::web_url;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadUrl {
    pub thread_id: String,
    pub url: String,
}

pub async fn run(ctx: &AppContext, args: UrlArgs) -> AppResult<()> {
    let email = ctx.account_email()?;

    let urls = args
        .thread_ids
        .into_iter()
        .map(|thread_id| ThreadUrl {
            url: web_url(&thread_id, &email),
            thread_id,
        })
        .collect::<Vec<_>>();

    let text = urls
        .iter()
        .map(|entry| format!("{}\t{}", entry.thread_id, entry.url))
        .collect::<Vec<_>>()
        .join("\n");
    ctx.output.emit(&text, &urls)
}
