//! The action registry.
//!
//! An [`Action`] is a named entry from the `[Commands]` section: a label for
//! the button and, optionally, the command line it launches.  An action
//! without a command (the built-in `cancel`) simply dismisses the dialog.
//!
//! A [`Shortcut`] binds a single key name to an action name.  Shortcuts
//! only take effect when their action exists in the command list.

use serde::Serialize;

/// A named, user-configurable operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub name: String,
    /// Command line to launch; `None` means "close without running anything".
    pub command: Option<String>,
}

impl Action {
    /// Build an action from a raw config value.
    ///
    /// An empty value, or the literal `None` in any case, yields an action
    /// without a command.
    pub fn from_config(name: &str, value: &str) -> Self {
        let value = value.trim();
        let command = if value.is_empty() || value.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(value.to_string())
        };
        Self {
            name: name.to_string(),
            command,
        }
    }

    /// `true` when selecting this action launches nothing.
    pub fn is_cancel(&self) -> bool {
        self.argv().is_none()
    }

    /// The command split on whitespace into an argument vector.
    ///
    /// No shell interpretation happens: quotes, pipes and globs are passed
    /// through verbatim.  Returns `None` for actions without a command.
    pub fn argv(&self) -> Option<Vec<String>> {
        let argv: Vec<String> = self
            .command
            .as_deref()?
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if argv.is_empty() {
            None
        } else {
            Some(argv)
        }
    }

    /// Themed icon shown on the button for the well-known action names.
    pub fn icon_name(&self) -> Option<&'static str> {
        match self.name.to_lowercase().as_str() {
            "shutdown" | "poweroff" => Some("system-shutdown-symbolic"),
            "reboot" | "restart" => Some("system-reboot-symbolic"),
            "suspend" | "sleep" => Some("media-playback-pause-symbolic"),
            "hibernate" => Some("document-save-symbolic"),
            "logout" | "log out" => Some("system-log-out-symbolic"),
            "lock" => Some("system-lock-screen-symbolic"),
            "cancel" => Some("window-close-symbolic"),
            _ => None,
        }
    }
}

/// A keyboard shortcut: pressing `key` selects the action called `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortcut {
    pub action: String,
    pub key: String,
}

impl Shortcut {
    pub fn new(action: &str, key: &str) -> Self {
        Self {
            action: action.to_string(),
            key: key.trim().to_string(),
        }
    }

    /// Key names are compared case-insensitively (`S` matches `s`).
    pub fn matches(&self, key_name: &str) -> bool {
        !self.key.is_empty() && self.key.to_lowercase() == key_name.to_lowercase()
    }
}

/// Ordered commands plus ordered shortcuts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionRegistry {
    commands: Vec<Action>,
    shortcuts: Vec<Shortcut>,
}

impl ActionRegistry {
    pub fn new(commands: Vec<Action>, shortcuts: Vec<Shortcut>) -> Self {
        Self {
            commands,
            shortcuts,
        }
    }

    /// Actions in config order (one button each).
    pub fn commands(&self) -> &[Action] {
        &self.commands
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    /// Find an action by name.
    pub fn action(&self, name: &str) -> Option<&Action> {
        self.commands.iter().find(|a| a.name == name)
    }

    /// Resolve a pressed key to an action.
    ///
    /// Shortcuts are scanned in config order; the first one whose key
    /// matches *and* whose action exists in the command list wins.  A
    /// shortcut pointing at an unknown action is skipped.
    pub fn action_for_key(&self, key_name: &str) -> Option<&Action> {
        self.shortcuts
            .iter()
            .filter(|s| s.matches(key_name))
            .find_map(|s| self.action(&s.action))
    }

    /// Shortcut key bound to `action`, if any.
    pub fn key_for(&self, action: &str) -> Option<&str> {
        self.shortcuts
            .iter()
            .find(|s| s.action == action && self.action(&s.action).is_some())
            .map(|s| s.key.as_str())
    }
}
