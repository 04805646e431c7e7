//! Seams between the dialog logic and the outside world.
//!
//! * [`Presenter`]: puts the dialog on screen and feeds user input into a
//!   [`Session`] until a selection is made.
//! * [`Launcher`]: runs the chosen command once the presenter is gone.
//!
//! [`app::run`](crate::app::run) only depends on these abstractions, so the
//! whole select → teardown → launch sequence can be driven by test doubles.

use crate::config::Settings;
use crate::session::Session;
use std::cell::RefCell;
use std::rc::Rc;

/// Starts the selected command.
pub trait Launcher {
    /// The error type produced by this launcher.
    type Error: std::error::Error + Send + 'static;

    /// Start `argv` as a detached process and return immediately.
    ///
    /// Implementations must not wait for the process to exit.
    fn launch(&self, argv: &[String]) -> Result<(), Self::Error>;
}

/// Shows the dialog.
///
/// # Contract
///
/// * [`present`](Presenter::present) calls [`Session::show`] once the
///   dialog is visible, then routes clicks, shortcut keys and Escape into
///   the session.
/// * It **blocks** until the session [`is_done`](Session::is_done) (or the
///   GUI goes away on its own), and it must have destroyed every window
///   before returning.
/// * It must never launch commands itself.
pub trait Presenter {
    /// The error type produced by this presenter.
    type Error: std::error::Error + Send + 'static;

    fn present(&mut self, settings: &Settings, session: Rc<RefCell<Session>>) -> Result<(), Self::Error>;
}


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[test]
    fn mock_launcher_records_argv() {
        let log = EventLog::default();
        let launcher = MockLauncher::new(&log);
        launcher
            .launch(&["systemctl".into(), "poweroff".into()])
            .unwrap();
        assert_eq!(launcher.launches(), vec!["launch systemctl poweroff"]);
    }

    #[test]
    fn mock_presenter_stops_at_first_selection() {
        let log = EventLog::default();
        let mut presenter = MockPresenter::new(&log, vec![Input::Key("l"), Input::Key("s")]);
        let session = Rc::new(RefCell::new(Session::new()));
        presenter
            .present(&Settings::default(), Rc::clone(&session))
            .unwrap();
        let mut s = session.borrow_mut();
        s.teardown();
        assert_eq!(s.take_deferred().unwrap().name, "logout");
        assert_eq!(*log.borrow(), vec!["window shown", "window destroyed"]);
    }
}
