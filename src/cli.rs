use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gmcli", version, about = "Gmail from the command line")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging (repeat for more)")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Auth(AuthArgs),
    /// Search threads with Gmail query syntax
    Search(SearchArgs),
    /// Show every message of a thread
    Thread(ThreadArgs),
    Labels(LabelsArgs),
    Drafts(DraftsArgs),
    /// Send a message
    Send(ComposeArgs),
    /// Print Gmail web links for threads
    Url(UrlArgs),
}

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Store the OAuth client from a Google Cloud credentials JSON
    Credentials(CredentialsArgs),
    Login,
    Status,
    Logout,
    /// List configured profiles
    List,
}

#[derive(Debug, Args)]
pub struct CredentialsArgs {
    #[arg(help = "OAuth client JSON downloaded from Google Cloud Console")]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(help = "Gmail search query, e.g. `in:inbox is:unread`")]
    pub query: String,
    #[arg(long, default_value_t = 20, help = "Maximum threads to return (at most 500)")]
    pub max: u32,
    #[arg(long, help = "Page token from a previous search")]
    pub page: Option<String>,
}

#[derive(Debug, Args)]
pub struct ThreadArgs {
    #[arg(help = "Thread id, FMfcg token or Gmail web URL")]
    pub id: String,
    #[arg(long, help = "Save attachments to the attachments directory")]
    pub download: bool,
}

#[derive(Debug, Args)]
pub struct LabelsArgs {
    #[command(subcommand)]
    pub command: LabelsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LabelsCommand {
    Ls,
    Modify(LabelsModifyArgs),
}

#[derive(Debug, Args)]
pub struct LabelsModifyArgs {
    #[arg(required = true, num_args = 1.., help = "Thread ids")]
    pub thread_ids: Vec<String>,
    #[arg(long, action = ArgAction::Append, help = "Label name or id to add (repeatable)")]
    pub add: Vec<String>,
    #[arg(long, action = ArgAction::Append, help = "Label name or id to remove (repeatable)")]
    pub remove: Vec<String>,
}

#[derive(Debug, Args)]
pub struct DraftsArgs {
    #[command(subcommand)]
    pub command: DraftsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DraftsCommand {
    Ls,
    Get(DraftGetArgs),
    Create(ComposeArgs),
    Send(DraftIdArgs),
    Delete(DraftIdArgs),
}

#[derive(Debug, Args)]
pub struct DraftIdArgs {
    #[arg(help = "Draft id")]
    pub id: String,
}

#[derive(Debug, Args)]
pub struct DraftGetArgs {
    #[arg(help = "Draft id")]
    pub id: String,
    #[arg(long, help = "Save attachments to the attachments directory")]
    pub download: bool,
}

#[derive(Debug, Args)]
pub struct ComposeArgs {
    #[arg(long, required = true, value_delimiter = ',', num_args = 1.., help = "Recipient addresses")]
    pub to: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "CC addresses")]
    pub cc: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "BCC addresses")]
    pub bcc: Vec<String>,
    #[arg(long, help = "Subject line")]
    pub subject: String,
    #[arg(long, help = "Plain text body")]
    pub body: String,
    #[arg(long, help = "Gmail message id to reply to")]
    pub reply_to: Option<String>,
    #[arg(long, action = ArgAction::Append, help = "Attach file (repeatable)")]
    pub attach: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct UrlArgs {
    #[arg(required = true, num_args = 1.., help = "Thread ids")]
    pub thread_ids: Vec<String>,
}
