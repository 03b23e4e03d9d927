use std::path::PathBuf;

use crate::api::{ClientConfig, GmailClient};
use crate::auth::{AuthService, CredentialStore, Credentials, FileCredentialStore, StoredAccount};
use crate::config::{self, AppPaths, Settings};
use crate::error::{AppError, AppResult};
use crate::output::Output;

/// Everything a command needs, resolved once per invocation.
#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub paths: AppPaths,
    pub settings: Settings,
    pub credential_store: FileCredentialStore,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(profile: String, json: bool) -> AppResult<Self> {
        let profile = config::resolve_profile(&profile);
        let paths = AppPaths::discover()?;
        let settings = config::load_settings(&paths, &profile)?;
        tracing::debug!(profile = %profile, "loaded profile settings");

        Ok(Self {
            profile,
            credential_store: FileCredentialStore::new(paths.clone()),
            paths,
            settings,
            output: Output::new(json),
        })
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(reqwest::Client::new())
    }

    pub fn account(&self) -> AppResult<StoredAccount> {
        self.credential_store.load(&self.profile)?.ok_or_else(|| {
            AppError::Auth(format!(
                "no account stored for profile `{}`. run `gmcli auth login`",
                self.profile
            ))
        })
    }

    /// Address of the logged-in account, used as `From` and `authuser`.
    pub fn account_email(&self) -> AppResult<String> {
        self.account()?.email.ok_or_else(|| {
            AppError::Config(
                "stored account has no email address. run `gmcli auth login` again".to_string(),
            )
        })
    }

    pub fn gmail_client(&self) -> AppResult<GmailClient> {
        let account = self.account()?;
        let credentials = Credentials::new(
            self.settings.client_id()?,
            self.settings.client_secret()?,
            account.refresh_token,
        );
        Ok(GmailClient::with_config(credentials, ClientConfig::default()))
    }

    pub fn attachments_dir(&self) -> PathBuf {
        self.settings
            .attachments_dir_or(self.paths.attachments_dir())
            .to_path_buf()
    }
}
