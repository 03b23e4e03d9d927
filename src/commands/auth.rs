use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::auth::CredentialStore;
use crate::cli::AuthCommand;
use crate::config::{self, AppPaths};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsSaved {
    pub profile: String,
    pub client_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub profile: String,
    pub active: bool,
    pub has_credentials: bool,
    pub logged_in: bool,
    pub email: Option<String>,
}

pub async fn run(ctx: &AppContext, command: AuthCommand) -> AppResult<()> {
    let service = ctx.auth_service();

    match command {
        AuthCommand::Credentials(args) => import_credentials(ctx, &args.file),
        AuthCommand::Login => {
            let result = service
                .login(&ctx.profile, &ctx.settings, &ctx.credential_store)
                .await?;
            let text = format!(
                "logged in to profile `{}` as {}",
                result.profile,
                result.email.as_deref().unwrap_or("(unknown address)")
            );
            ctx.output.emit(&text, &result)
        }
        AuthCommand::Status => {
            let status = service.status(&ctx.profile, &ctx.credential_store)?;
            let text = match (status.logged_in, &status.email) {
                (true, Some(email)) => format!("profile `{}`: logged in as {email}", status.profile),
                (true, None) => format!("profile `{}`: logged in", status.profile),
                (false, _) => format!("profile `{}`: not logged in", status.profile),
            };
            ctx.output.emit(&text, &status)
        }
        AuthCommand::Logout => {
            let status = service.logout(&ctx.profile, &ctx.credential_store).await?;
            let text = format!(
                "profile `{}`: {}",
                status.profile,
                status.note.as_deref().unwrap_or("logged out")
            );
            ctx.output.emit(&text, &status)
        }
        AuthCommand::List => {
            let profiles = profile_summaries(&ctx.paths, &ctx.credential_store, &ctx.profile)?;
            ctx.output.emit(&render_profiles(&profiles), &profiles)
        }
    }
}

fn import_credentials(ctx: &AppContext, file: &Path) -> AppResult<()> {
    let raw = fs::read_to_string(file).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => {
            AppError::InvalidInput(format!("credentials file not found: {}", file.display()))
        }
        _ => AppError::Io(err),
    })?;

    let mut settings = ctx.settings.clone();
    settings.import_client_secrets(&raw)?;
    config::settings::save(&ctx.paths.settings_file(&ctx.profile), &settings)?;
    tracing::info!(profile = %ctx.profile, "stored oauth client credentials");

    let saved = CredentialsSaved {
        profile: ctx.profile.clone(),
        client_id: settings.client_id()?.to_string(),
    };
    let text = format!(
        "credentials saved for profile `{}`\nclient id: {}",
        saved.profile, saved.client_id
    );
    ctx.output.emit(&text, &saved)
}

/// One entry per profile that has settings or a stored account.
pub fn profile_summaries<S: CredentialStore>(
    paths: &AppPaths,
    store: &S,
    active: &str,
) -> AppResult<Vec<ProfileSummary>> {
    let mut summaries = Vec::new();

    for profile in paths.profile_names()? {
        let settings = config::load_settings(paths, &profile)?;
        let account = store.load(&profile)?;

        summaries.push(ProfileSummary {
            active: profile == active,
            has_credentials: settings.client_id().is_ok() && settings.client_secret().is_ok(),
            logged_in: account.is_some(),
            email: account.and_then(|account| account.email),
            profile,
        });
    }

    Ok(summaries)
}

fn render_profiles(profiles: &[ProfileSummary]) -> String {
    if profiles.is_empty() {
        return "no profiles configured. run `gmcli auth credentials <file.json>`".to_string();
    }

    profiles
        .iter()
        .map(|summary| {
            format!(
                "{} {}\t{}\t{}\t{}",
                if summary.active { "*" } else { " " },
                summary.profile,
                summary.email.as_deref().unwrap_or("-"),
                if summary.has_credentials { "credentials" } else { "no credentials" },
                if summary.logged_in { "logged in" } else { "not logged in" },
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
