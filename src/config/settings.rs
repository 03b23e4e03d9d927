use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::write_private;

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8787/callback";

/// Per-profile OAuth client settings. `auth credentials` fills in the client
/// pair; the rest may be edited by hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub attachments_dir: Option<PathBuf>,
}

impl Settings {
    pub fn client_id(&self) -> AppResult<&str> {
        required(self.client_id.as_deref(), "client_id")
    }

    pub fn client_secret(&self) -> AppResult<&str> {
        required(self.client_secret.as_deref(), "client_secret")
    }

    pub fn redirect_uri(&self) -> String {
        self.redirect_uri
            .clone()
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string())
    }

    pub fn attachments_dir_or<'a>(&'a self, fallback: &'a Path) -> &'a Path {
        self.attachments_dir.as_deref().unwrap_or(fallback)
    }

    /// Takes the client pair from a Google Cloud OAuth client download,
    /// preferring the `installed` block over `web`. Other settings are kept.
    pub fn import_client_secrets(&mut self, raw: &str) -> AppResult<()> {
        let file: ClientSecretFile = serde_json::from_str(raw)
            .map_err(|err| AppError::InvalidInput(format!("invalid credentials json: {err}")))?;

        let block = file.installed.or(file.web).ok_or_else(|| {
            AppError::InvalidInput(
                "expected an `installed` or `web` oauth client in the credentials file".to_string(),
            )
        })?;

        let (Some(client_id), Some(client_secret)) = (
            non_blank(block.client_id),
            non_blank(block.client_secret),
        ) else {
            return Err(AppError::InvalidInput(
                "missing client_id or client_secret in credentials file".to_string(),
            ));
        };

        self.client_id = Some(client_id);
        self.client_secret = Some(client_secret);
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    #[serde(default)]
    installed: Option<ClientSecretBlock>,
    #[serde(default)]
    web: Option<ClientSecretBlock>,
}

#[derive(Debug, Deserialize)]
struct ClientSecretBlock {
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn required<'a>(value: Option<&'a str>, field: &str) -> AppResult<&'a str> {
    value.filter(|value| !value.trim().is_empty()).ok_or_else(|| {
        AppError::Config(format!(
            "missing oauth {field} in profile settings. run `gmcli auth credentials <file.json>`"
        ))
    })
}

pub fn load(path: &Path) -> AppResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save(path: &Path, settings: &Settings) -> AppResult<()> {
    write_private(path, &serde_json::to_string_pretty(settings)?)
}
