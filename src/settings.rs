use crate::hierarchy::CascadePolicy;
use crate::search::SearchOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "code-launcher";
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file that receives a copy of the log output.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Directory holding `hierarchy.json`, `favorites.json` and `recents.json`.
    /// Falls back to the platform config directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Command used to open projects, e.g. `code` or `kiro --new-window`.
    /// Files always go to the platform default handler.
    #[serde(default = "default_editor")]
    pub default_editor: Option<String>,
    /// Include matching categories in search results.
    #[serde(default = "default_search_categories")]
    pub search_categories: bool,
    /// Include every leaf under a matching category in search results.
    #[serde(default)]
    pub expand_category_matches: bool,
    /// What deleting a non-empty category does to its contents.
    #[serde(default)]
    pub delete_policy: CascadePolicy,
}

fn default_editor() -> Option<String> {
    Some("code".into())
}

fn default_search_categories() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            data_dir: None,
            default_editor: default_editor(),
            search_categories: default_search_categories(),
            expand_category_matches: false,
            delete_policy: CascadePolicy::default(),
        }
    }
}

/// Platform config directory for the launcher, or the current directory if
/// none is known.
pub fn config_dir() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_settings_path() -> PathBuf {
    config_dir().join(SETTINGS_FILE)
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Resolved data directory.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
            Some(_) => {
                tracing::warn!("empty data_dir in settings; using the default");
                config_dir()
            }
            None => config_dir(),
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            include_categories: self.search_categories,
            expand_category_matches: self.expand_category_matches,
        }
    }
}
