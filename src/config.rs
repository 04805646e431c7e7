//! Application configuration.
//!
//! The configuration is an INI file with three sections.  Every section and
//! option is optional and falls back to its compiled-in default on its own:
//! a file that only sets `opacity` keeps the default command list.
//!
//! # Example
//!
//! ```ini
//! [Commands]
//! shutdown = systemctl poweroff
//! suspend = systemctl suspend
//! logout = openbox --exit
//! hibernate = systemctl hibernate
//! reboot = systemctl reboot
//! cancel = None
//!
//! [Shortcuts]
//! shutdown = s
//! suspend = u
//! logout = l
//! hibernate = h
//! reboot = r
//! cancel = c
//!
//! [Options]
//! opacity = 0.7
//! force fake = false
//! ```
//!
//! A section that is present but empty is taken as written: an empty
//! `[Shortcuts]` disables every shortcut instead of restoring the defaults.

use crate::action::{Action, ActionRegistry, Shortcut};
use crate::ini::Document;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// System-wide config file, used when the user has none.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/obquit.conf";

pub const DEFAULT_OPACITY: f64 = 0.7;
pub const DEFAULT_FORCE_FAKE: bool = false;

const DEFAULT_COMMANDS: &[(&str, &str)] = &[
    ("shutdown", "systemctl poweroff"),
    ("suspend", "systemctl suspend"),
    ("logout", "openbox --exit"),
    ("hibernate", "systemctl hibernate"),
    ("reboot", "systemctl reboot"),
    ("cancel", "None"),
];

const DEFAULT_SHORTCUTS: &[(&str, &str)] = &[
    ("shutdown", "s"),
    ("suspend", "u"),
    ("logout", "l"),
    ("hibernate", "h"),
    ("reboot", "r"),
    ("cancel", "c"),
];

/// Resolved settings for one dialog session.  Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Buttons and keyboard shortcuts.
    pub actions: ActionRegistry,
    /// Opacity of the black shade drawn over the desktop, in `[0, 1]`.
    pub opacity: f64,
    /// Always use the screenshot background, even with a compositor.
    pub force_fake: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            actions: ActionRegistry::new(default_commands(), default_shortcuts()),
            opacity: DEFAULT_OPACITY,
            force_fake: DEFAULT_FORCE_FAKE,
        }
    }
}

pub fn default_commands() -> Vec<Action> {
    DEFAULT_COMMANDS
        .iter()
        .map(|(name, cmd)| Action::from_config(name, cmd))
        .collect()
}

pub fn default_shortcuts() -> Vec<Shortcut> {
    DEFAULT_SHORTCUTS
        .iter()
        .map(|(action, key)| Shortcut::new(action, key))
        .collect()
}

impl Settings {
    /// Build settings from a parsed document, section by section.
    pub fn from_document(doc: &Document) -> Self {
        let commands = match doc.section("Commands") {
            Some(section) => section
                .entries()
                .map(|(name, cmd)| Action::from_config(name, cmd))
                .collect(),
            None => {
                debug!("no [Commands] section, using defaults");
                default_commands()
            }
        };

        let shortcuts = match doc.section("Shortcuts") {
            Some(section) => section
                .entries()
                .map(|(action, key)| Shortcut::new(action, key))
                .collect(),
            None => {
                debug!("no [Shortcuts] section, using defaults");
                default_shortcuts()
            }
        };

        let opacity = doc
            .get("Options", "opacity")
            .map(|raw| {
                parse_opacity(raw).unwrap_or_else(|| {
                    warn!("invalid opacity {:?}, using {}", raw, DEFAULT_OPACITY);
                    DEFAULT_OPACITY
                })
            })
            .unwrap_or(DEFAULT_OPACITY);

        let force_fake = doc
            .get("Options", "force fake")
            .map(|raw| {
                parse_bool(raw).unwrap_or_else(|| {
                    warn!("invalid force fake {:?}, using {}", raw, DEFAULT_FORCE_FAKE);
                    DEFAULT_FORCE_FAKE
                })
            })
            .unwrap_or(DEFAULT_FORCE_FAKE);

        Self {
            actions: ActionRegistry::new(commands, shortcuts),
            opacity,
            force_fake,
        }
    }

    /// Parse settings from INI text.
    pub fn parse(text: &str) -> Self {
        Self::from_document(&Document::parse(text))
    }

    /// Load settings from the INI file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }
}

/// Parse an opacity value.  Only finite numbers in `[0, 1]` are accepted.
pub fn parse_opacity(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(value)
}

/// Parse a boolean the way `configparser` does.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Resolve the user config directory (`$XDG_CONFIG_HOME`, else `~/.config`).
pub fn config_dir() -> PathBuf {
    config_dir_from(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

/// [`config_dir`] with the environment passed in.  An empty
/// `XDG_CONFIG_HOME` counts as unset; a missing `HOME` falls back to `/tmp`.
pub fn config_dir_from(xdg_config_home: Option<String>, home: Option<String>) -> PathBuf {
    match xdg_config_home.filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(home.unwrap_or_else(|| "/tmp".into())).join(".config"),
    }
}

/// Per-user config file (`$XDG_CONFIG_HOME/obquit.conf`).
pub fn user_config_path() -> PathBuf {
    config_dir().join("obquit.conf")
}

/// Optional user stylesheet for the dialog.
pub fn stylesheet_path() -> PathBuf {
    config_dir().join("obquit.css")
}

/// Config file candidates, highest priority first.
pub fn config_candidates(explicit: Option<PathBuf>) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(3);
    candidates.extend(explicit);
    candidates.push(user_config_path());
    candidates.push(PathBuf::from(SYSTEM_CONFIG_PATH));
    candidates
}

/// Pick the first candidate that exists.
pub fn resolve_config_path(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|p| p.exists())
}

/// Load settings from the first existing candidate, falling back to
/// defaults.  Never fails: a file that exists but can't be read yields the
/// defaults, the remaining candidates are not consulted.
pub fn load_config_from(candidates: &[PathBuf]) -> Settings {
    let Some(path) = resolve_config_path(candidates) else {
        info!("no config file, using defaults");
        return Settings::default();
    };

    match Settings::load(path) {
        Ok(settings) => {
            info!("loaded config from {}", path.display());
            settings
        }
        Err(e) => {
            warn!("{}, using defaults", e);
            Settings::default()
        }
    }
}

/// Load settings from the user config, then the system config, then the
/// built-in defaults.
pub fn load_config() -> Settings {
    load_config_from(&config_candidates(None))
}

/// Error from loading a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
