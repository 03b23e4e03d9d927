pub mod paths;
pub mod settings;

use std::fs;
use std::path::Path;

pub use paths::AppPaths;
pub use settings::Settings;

use crate::error::AppResult;

pub const DEFAULT_PROFILE: &str = "default";

pub fn resolve_profile(requested: &str) -> String {
    match requested.trim() {
        "" => DEFAULT_PROFILE.to_string(),
        profile => profile.to_string(),
    }
}

pub fn load_settings(paths: &AppPaths, profile: &str) -> AppResult<Settings> {
    settings::load(&paths.settings_file(profile))
}

/// Writes `contents`, creating parent directories, readable only by the
/// owner on unix.
pub fn write_private(path: &Path, contents: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_profile_falls_back_to_default() {
        assert_eq!(resolve_profile("  "), "default");
        assert_eq!(resolve_profile(" work "), "work");
    }
}
