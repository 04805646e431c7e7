//! One complete dialog run: lock, present, tear down, release, launch.

use crate::action::Action;
use crate::config::Settings;
use crate::lock::{InstanceLock, LockError};
use crate::session::Session;
use crate::traits::{Launcher, Presenter};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Another instance holds the lock; nothing was shown.
    AlreadyRunning,
    /// The dialog was shown and closed.  `selected` is the action whose
    /// command was handed to the launcher, if any.
    Finished { selected: Option<Action> },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("cannot show dialog: {0}")]
    Present(String),
}

/// Run the dialog once.
///
/// The lock is released before the selected command is launched, and the
/// command is launched only after the presenter returned, so it never runs
/// while the window is on screen.  Launch failures are logged and
/// otherwise ignored.
pub fn run<P, L>(
    settings: &Settings,
    lock_path: &Path,
    presenter: &mut P,
    launcher: &L,
) -> Result<Outcome, AppError>
where
    P: Presenter,
    L: Launcher,
{
    let Some(lock) = InstanceLock::acquire(lock_path)? else {
        return Ok(Outcome::AlreadyRunning);
    };

    let session = Rc::new(RefCell::new(Session::new()));
    let presented = presenter.present(settings, Rc::clone(&session));

    if let Err(e) = lock.release() {
        warn!("{}", e);
    }
    presented.map_err(|e| AppError::Present(e.to_string()))?;

    let selected = {
        let mut session = session.borrow_mut();
        session.teardown();
        session.take_deferred()
    };

    if let Some(argv) = selected.as_ref().and_then(Action::argv) {
        match launcher.launch(&argv) {
            Ok(()) => info!("command {:?} started", argv),
            Err(e) => debug!("ignoring launch failure: {}", e),
        }
    }

    Ok(Outcome::Finished { selected })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::mock::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        lock: std::path::PathBuf,
        log: EventLog,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let lock = dir.path().join("obquit.lock");
        Fixture {
            _dir: dir,
            lock,
            log: EventLog::default(),
        }
    }

    fn run_with(f: &Fixture, inputs: Vec<Input>) -> (Outcome, MockLauncher) {
        let mut presenter = MockPresenter::new(&f.log, inputs);
        let launcher = MockLauncher::new(&f.log);
        let outcome = run(&Settings::default(), &f.lock, &mut presenter, &launcher).unwrap();
        (outcome, launcher)
    }

    #[test]
    fn poweroff_launches_once_after_window_is_gone() {
        let f = fixture();
        let (outcome, launcher) = run_with(&f, vec![Input::Click("shutdown")]);

        assert_eq!(launcher.launches(), vec!["launch systemctl poweroff"]);
        assert_eq!(
            *f.log.borrow(),
            vec!["window shown", "window destroyed", "launch systemctl poweroff"]
        );
        match outcome {
            Outcome::Finished { selected } => assert_eq!(selected.unwrap().name, "shutdown"),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!f.lock.exists());
    }

    #[test]
    fn cancel_click_launches_nothing() {
        let f = fixture();
        let (outcome, launcher) = run_with(&f, vec![Input::Click("cancel")]);
        assert!(launcher.launches().is_empty());
        assert_eq!(outcome, Outcome::Finished { selected: None });
    }

    #[test]
    fn cancel_shortcut_launches_nothing() {
        let f = fixture();
        let (_, launcher) = run_with(&f, vec![Input::Key("c")]);
        assert!(launcher.launches().is_empty());
    }

    #[test]
    fn escape_launches_nothing_even_after_unbound_keys() {
        let f = fixture();
        let (outcome, launcher) =
            run_with(&f, vec![Input::Key("x"), Input::Key("Escape"), Input::Key("s")]);
        assert!(launcher.launches().is_empty());
        assert_eq!(outcome, Outcome::Finished { selected: None });
    }

    #[test]
    fn shortcut_launches_mapped_command() {
        let f = fixture();
        let (_, launcher) = run_with(&f, vec![Input::Key("U")]);
        assert_eq!(launcher.launches(), vec!["launch systemctl suspend"]);
    }

    #[test]
    fn second_instance_shows_nothing() {
        let f = fixture();
        let held = InstanceLock::acquire(&f.lock).unwrap().unwrap();

        let (outcome, launcher) = run_with(&f, vec![Input::Click("shutdown")]);
        assert_eq!(outcome, Outcome::AlreadyRunning);
        assert!(f.log.borrow().is_empty(), "no window, no launch");
        assert!(launcher.launches().is_empty());
        assert!(f.lock.exists(), "first instance keeps its lock");

        held.release().unwrap();
        assert!(!f.lock.exists());
    }

    #[test]
    fn launch_failure_is_swallowed() {
        let f = fixture();
        let mut presenter = MockPresenter::new(&f.log, vec![Input::Click("reboot")]);
        let mut launcher = MockLauncher::new(&f.log);
        launcher.fail = true;
        let outcome = run(&Settings::default(), &f.lock, &mut presenter, &launcher).unwrap();
        assert!(matches!(outcome, Outcome::Finished { selected: Some(_) }));
    }

    #[test]
    fn presenter_failure_releases_lock() {
        let f = fixture();
        let mut presenter = MockPresenter::new(&f.log, vec![]);
        presenter.fail = true;
        let launcher = MockLauncher::new(&f.log);
        let err = run(&Settings::default(), &f.lock, &mut presenter, &launcher).unwrap_err();
        assert!(matches!(err, AppError::Present(_)));
        assert!(!f.lock.exists());
        assert!(launcher.launches().is_empty());
    }

    #[test]
    fn window_gone_without_selection_launches_nothing() {
        let f = fixture();
        let (outcome, launcher) = run_with(&f, vec![]);
        assert!(launcher.launches().is_empty());
        assert_eq!(outcome, Outcome::Finished { selected: None });
    }
}
