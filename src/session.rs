//! Action dispatch for one dialog session.
//!
//! ```text
//! Open ──show──▶ Selecting ──click / shortcut──▶ Closing ──teardown──▶ Terminated
//!                    │                                                    ▲
//!                    └──────── Escape / cancel / close request ──────────┘
//! ```
//!
//! Selecting an action never launches anything.  Its command is *deferred*
//! and handed out by [`Session::take_deferred`] once the session reached
//! [`State::Terminated`], i.e. after the presenter has torn the window down.
//! The deferred command can be taken at most once.

use crate::action::{Action, ActionRegistry};
use log::{debug, info};

/// Key name that cancels the dialog regardless of configured shortcuts.
pub const ESCAPE_KEY: &str = "Escape";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Dialog constructed, not yet shown.
    Open,
    /// Waiting for exactly one click, shortcut or Escape.
    Selecting,
    /// An action with a command was chosen; waiting for the GUI to go away.
    Closing,
    /// GUI gone.  A deferred command, if any, may now run.
    Terminated,
}

#[derive(Debug)]
pub struct Session {
    state: State,
    deferred: Option<Action>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: State::Open,
            deferred: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The dialog is on screen; start accepting input.
    pub fn show(&mut self) {
        if self.state == State::Open {
            self.state = State::Selecting;
        }
    }

    /// `true` once a selection was made and the GUI loop should stop.
    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Closing | State::Terminated)
    }

    /// A button was clicked.
    ///
    /// Returns `true` if this ended the selection.  Input after the first
    /// selection is ignored.
    pub fn select(&mut self, action: &Action) -> bool {
        if self.state != State::Selecting {
            debug!("ignoring selection of {:?} in state {:?}", action.name, self.state);
            return false;
        }

        info!("selected action {:?}", action.name);
        if action.is_cancel() {
            self.state = State::Terminated;
        } else {
            self.deferred = Some(action.clone());
            self.state = State::Closing;
        }
        true
    }

    /// A key was pressed.  `key_name` is the toolkit's key name
    /// (`"s"`, `"S"`, `"Escape"`, `"F1"`, …).
    ///
    /// Escape always cancels.  Any other key selects the first action
    /// whose shortcut matches it, case-insensitively.  Returns `true` if
    /// this ended the selection.
    pub fn key_press(&mut self, key_name: &str, registry: &ActionRegistry) -> bool {
        if key_name.eq_ignore_ascii_case(ESCAPE_KEY) {
            return self.cancel();
        }
        match registry.action_for_key(key_name) {
            Some(action) => self.select(action),
            None => false,
        }
    }

    /// Dismiss without running anything (Escape or window close request).
    pub fn cancel(&mut self) -> bool {
        if self.state != State::Selecting {
            return false;
        }
        info!("dialog cancelled");
        self.state = State::Terminated;
        true
    }

    /// The GUI loop has exited and the window is gone.
    pub fn teardown(&mut self) {
        if self.state == State::Closing {
            self.state = State::Terminated;
        } else if self.state != State::Terminated {
            // The loop ended without any selection (e.g. the display went away).
            debug!("teardown in state {:?}, nothing selected", self.state);
            self.state = State::Terminated;
        }
    }

    /// Hand out the deferred action.  `None` before teardown, after a
    /// cancel, and on every call after the first.
    pub fn take_deferred(&mut self) -> Option<Action> {
        if self.state != State::Terminated {
            return None;
        }
        self.deferred.take()
    }
}
