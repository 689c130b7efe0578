//! Settings loading.
//!
//! Settings come from a TOML file, an optional `<stem>.local.toml` overlay next
//! to it, and finally values supplied on the command line.

mod error;
mod repo;
mod settings;

pub use error::ConfigError;
pub use repo::RepoRef;
pub use settings::{CommentSettings, RateLimitSettings, Settings};

use std::path::{Path, PathBuf};
use tracing::info;

/// Loads the settings file at `path`, its local overlay, then `overrides`.
///
/// The layout looks like:
/// ```text
/// issue-migrator.toml        # shared settings
/// issue-migrator.local.toml  # optional, e.g. a token kept out of version control
/// ```
///
/// # Errors
///
/// Returns [`ConfigError`] if the base file is missing or any file fails to parse.
pub fn load_settings(path: &Path, overrides: Settings) -> Result<Settings, ConfigError> {
    let mut settings = Settings::load(path)?;

    let local_path = local_overlay_path(path);
    if local_path.exists() {
        info!(path = %local_path.display(), "Applying local settings overlay");
        settings = settings.overlay(Settings::load(&local_path)?);
    }

    Ok(settings.overlay(overrides))
}

/// Returns the path of the local overlay for a settings file.
///
/// `dir/issue-migrator.toml` becomes `dir/issue-migrator.local.toml`.
#[must_use]
pub fn local_overlay_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}.local.toml"))
}
