use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        json,
        verbose: _,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(profile, json)?;

    match command {
        Command::Auth(args) => commands::auth::run(&ctx, args.command).await,
        Command::Search(args) => commands::search::run(&ctx, args).await,
        Command::Thread(args) => commands::thread::run(&ctx, args).await,
        Command::Labels(args) => commands::labels::run(&ctx, args.command).await,
        Command::Drafts(args) => commands::drafts::run(&ctx, args.command).await,
        Command::Send(args) => commands::send::run(&ctx, args).await,
        Command::Url(args) => commands::url::run(&ctx, args).await,
    }
}
