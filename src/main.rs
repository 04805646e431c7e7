//! Entry point for the **obquit** logout dialog.
//!
//! Loads the configuration, takes the single-instance lock and shows the
//! dialog on the main thread.  The selected command is started only after
//! the GLib main loop has exited and the window is gone.
//!
//! ```text
//! obquit [--config <path>] [--dry-run] [--dump-config]
//! ```

use log::error;
use obquit::config::{self, Settings};
use std::path::PathBuf;

/// Command-line flags.
#[derive(Debug, Default, PartialEq)]
struct Args {
    /// Config file tried before the user and system ones.
    config: Option<PathBuf>,
    /// Log the selected command instead of running it.
    dry_run: bool,
    /// Print the resolved settings as JSON and exit.
    dump_config: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => parsed.config = args.next().map(PathBuf::from),
                "--dry-run" => parsed.dry_run = true,
                "--dump-config" => parsed.dump_config = true,
                other => {
                    if let Some(path) = other.strip_prefix("--config=") {
                        parsed.config = Some(PathBuf::from(path));
                    } else {
                        log::warn!("ignoring unknown argument {:?}", other);
                    }
                }
            }
        }
        parsed
    }
}

//  Main

fn main() {
    env_logger::init();

    let args = Args::parse(std::env::args().skip(1));
    let settings = match args.config {
        Some(path) => config::load_config_from(&config::config_candidates(Some(path))),
        None => config::load_config(),
    };

    if args.dump_config {
        match serde_json::to_string_pretty(&settings) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("cannot serialise settings: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    std::process::exit(run_dialog(&settings, args.dry_run));
}

/// Run the GTK dialog and map the result to an exit code.
#[cfg(feature = "dialog-gtk")]
fn run_dialog(settings: &Settings, dry_run: bool) -> i32 {
    use obquit::app::{self, AppError, Outcome};
    use obquit::dialog::gtk::GtkDialog;
    use obquit::launch::{DryRunLauncher, ProcessLauncher};
    use obquit::lock::DEFAULT_LOCK_PATH;
    use std::path::Path;

    let mut dialog = GtkDialog::new(Some(config::stylesheet_path()));
    let lock_path = Path::new(DEFAULT_LOCK_PATH);
    let result = if dry_run {
        app::run(settings, lock_path, &mut dialog, &DryRunLauncher)
    } else {
        app::run(settings, lock_path, &mut dialog, &ProcessLauncher)
    };

    match result {
        Ok(Outcome::AlreadyRunning) => {
            println!("Obquit is already running, exiting");
            0
        }
        Ok(Outcome::Finished { .. }) => 0,
        Err(AppError::Present(e)) => {
            eprintln!("{}", e);
            eprintln!("obquit needs GTK4 and a running display server.");
            1
        }
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}

#[cfg(not(feature = "dialog-gtk"))]
fn run_dialog(_settings: &Settings, _dry_run: bool) -> i32 {
    eprintln!("obquit was built without the `dialog-gtk` feature; no dialog available");
    1
}
