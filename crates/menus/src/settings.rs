//! Runtime settings: feedback messages, the developer permission, and timing defaults.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;
use tracing::warn;

/// Errors raised by the strict settings loaders.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the settings file failed.
    #[error("failed to access menu settings: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for [`MenuSettings`].
    #[error("failed to parse menu settings: {0}")]
    Parse(#[from] toml::de::Error),
    /// Serializing the settings failed.
    #[error("failed to serialize menu settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Messages sent to holders, in the host's markup language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuMessages {
    /// Sent after a click handler failed and the menu was closed.
    pub click_error: String,
    /// First line of the diagnostic shown to developers.
    pub developer_error_header: String,
    /// Paginated menu is already on its last page.
    pub cannot_go_forward: String,
    /// Paginated menu is already on its first page.
    pub cannot_go_backward: String,
    /// Sent to spectators when the watched holder closes the menu.
    pub viewer_closed: String,
    /// Sent to spectators of a maintained menu when its holder leaves.
    pub viewer_maintained: String,
    /// Sent when a holder in a chat conversation is refused a menu.
    pub exit_conversation: String,
}

impl Default for MenuMessages {
    fn default() -> Self {
        Self {
            click_error: "<red>An error occurred while clicking in your menu! If this happens again, please report this to staff member!".into(),
            developer_error_header: "<red>A menu click failed:".into(),
            cannot_go_forward: "<red>You cannot go forward any further!".into(),
            cannot_go_backward: "<red>You cannot go backwards any further!".into(),
            viewer_closed: "<red>The main viewer of the inventory you were viewing has closed the inventory!".into(),
            viewer_maintained: "<green>The menu holder has closed the menu!".into(),
            exit_conversation: "<red>Please exit your conversation and try opening this menu again!".into(),
        }
    }
}

/// Settings shared by every menu of a [`MenuManager`](crate::MenuManager).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuSettings {
    /// Holders with this permission receive error diagnostics.
    pub developer_permission: String,
    /// Tick interval for animated buttons that leave theirs unset.
    pub default_animation_interval: u64,
    /// Delay before a holder's inventory is resynced after a number-key close.
    pub close_resync_delay: u64,
    /// How many error causes the developer diagnostic lists.
    pub max_error_causes: usize,
    /// Feedback text.
    pub messages: MenuMessages,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            developer_permission: "yggdrasil.developer".into(),
            default_animation_interval: 20,
            close_resync_delay: 15,
            max_error_causes: 5,
            messages: MenuMessages::default(),
        }
    }
}

impl MenuSettings {
    /// Parse settings from TOML, returning errors to the caller.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load settings from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Menu settings not found at {}. Using defaults",
                    path.display()
                );
                Self::default()
            }
            Err(err) => {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to an explicit path, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), SettingsError> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings = MenuSettings::from_toml_str(
            r#"
            developer_permission = "staff.debug"

            [messages]
            cannot_go_forward = "no more"
            "#,
        )
        .expect("valid toml");
        assert_eq!(settings.developer_permission, "staff.debug");
        assert_eq!(settings.messages.cannot_go_forward, "no more");
        assert_eq!(
            settings.messages.cannot_go_backward,
            MenuMessages::default().cannot_go_backward
        );
        assert_eq!(settings.default_animation_interval, 20);
    }

    #[test]
    fn strict_parse_reports_errors() {
        let err = MenuSettings::from_toml_str("max_error_causes = \"five\"").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn lenient_load_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.toml");
        assert_eq!(MenuSettings::load_from_path(&missing), MenuSettings::default());

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "this is = = not toml").expect("write");
        assert_eq!(MenuSettings::load_from_path(&broken), MenuSettings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/menus.toml");
        let mut settings = MenuSettings::default();
        settings.close_resync_delay = 3;
        settings.save_to_path(&path).expect("save");
        assert_eq!(MenuSettings::load_from_path(&path), settings);
    }
}
