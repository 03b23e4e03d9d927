use std::fs;
use std::path::PathBuf;

use crate::config::{AppPaths, write_private};
use crate::error::AppResult;

use super::token::StoredAccount;

pub trait CredentialStore {
    fn load(&self, profile: &str) -> AppResult<Option<StoredAccount>>;
    fn save(&self, profile: &str, account: &StoredAccount) -> AppResult<()>;
    fn clear(&self, profile: &str) -> AppResult<()>;
}

/// One JSON file per profile under the data directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    paths: AppPaths,
}

impl FileCredentialStore {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }

    fn path(&self, profile: &str) -> PathBuf {
        self.paths.account_file(profile)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self, profile: &str) -> AppResult<Option<StoredAccount>> {
        let path = self.path(profile);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, profile: &str, account: &StoredAccount) -> AppResult<()> {
        write_private(&self.path(profile), &serde_json::to_string_pretty(account)?)
    }

    fn clear(&self, profile: &str) -> AppResult<()> {
        let path = self.path(profile);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
