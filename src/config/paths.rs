use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "gmcli";

#[derive(Debug, Clone)]
pub struct AppPaths {
    profiles_dir: PathBuf,
    accounts_dir: PathBuf,
    attachments_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;
        let data_root = dirs::data_dir()
            .ok_or_else(|| AppError::Config("unable to resolve data directory".to_string()))?;

        let paths = Self::from_roots(&config_root, &data_root);
        fs::create_dir_all(&paths.profiles_dir)?;
        fs::create_dir_all(&paths.accounts_dir)?;
        Ok(paths)
    }

    /// Lays the tree out under explicit roots without touching the disk.
    pub fn from_roots(config_root: &Path, data_root: &Path) -> Self {
        let config_dir = config_root.join(APP_DIR);
        let data_dir = data_root.join(APP_DIR);

        Self {
            profiles_dir: config_dir.join("profiles"),
            accounts_dir: data_dir.join("accounts"),
            attachments_dir: data_dir.join("attachments"),
        }
    }

    pub fn settings_file(&self, profile: &str) -> PathBuf {
        self.profiles_dir.join(format!("{profile}.json"))
    }

    pub fn account_file(&self, profile: &str) -> PathBuf {
        self.accounts_dir.join(format!("{profile}.json"))
    }

    pub fn attachments_dir(&self) -> &Path {
        &self.attachments_dir
    }

    /// Profiles with either a settings file or a stored account, sorted.
    pub fn profile_names(&self) -> AppResult<Vec<String>> {
        let mut names = json_stems(&self.profiles_dir)?;
        names.extend(json_stems(&self.accounts_dir)?);
        names.sort();
        names.dedup();
        Ok(names)
    }
}

fn json_stems(dir: &Path) -> AppResult<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut stems = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }
    Ok(stems)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_profile_files() {
        let paths = AppPaths::from_roots(Path::new("/cfg"), Path::new("/data"));
        assert_eq!(
            paths.settings_file("work"),
            PathBuf::from("/cfg/gmcli/profiles/work.json")
        );
        assert_eq!(
            paths.account_file("work"),
            PathBuf::from("/data/gmcli/accounts/work.json")
        );
        assert_eq!(paths.attachments_dir(), Path::new("/data/gmcli/attachments"));
    }
}
