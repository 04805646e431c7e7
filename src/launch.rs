//! [`Launcher`] implementations.

use crate::traits::Launcher;
use log::info;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

/// Errors produced while starting a command.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("empty command")]
    Empty,
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// Spawns the command as a detached child in its own process group.
///
/// The child is neither waited on nor observed: the dialog exits right
/// after launching it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    type Error = LaunchError;

    fn launch(&self, argv: &[String]) -> Result<(), LaunchError> {
        let (program, args) = argv.split_first().ok_or(LaunchError::Empty)?;
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })?;
        info!("launched {:?} (pid {})", argv, child.id());
        Ok(())
    }
}

/// Logs the command instead of running it (`--dry-run`).
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunLauncher;

impl Launcher for DryRunLauncher {
    type Error = LaunchError;

    fn launch(&self, argv: &[String]) -> Result<(), LaunchError> {
        if argv.is_empty() {
            return Err(LaunchError::Empty);
        }
        info!("dry run: would launch {:?}", argv);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argv_is_rejected() {
        assert!(matches!(ProcessLauncher.launch(&[]), Err(LaunchError::Empty)));
        assert!(matches!(DryRunLauncher.launch(&[]), Err(LaunchError::Empty)));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let err = ProcessLauncher
            .launch(&["/nonexistent/obquit-test-binary".into()])
            .unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
    }

    #[test]
    fn spawns_without_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("touched");
        ProcessLauncher
            .launch(&["touch".into(), marker.display().to_string()])
            .unwrap();

        // The launcher returns before the child is done; poll for it.
        for _ in 0..100 {
            if marker.exists() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        panic!("child never ran");
    }

    #[test]
    fn dry_run_spawns_nothing() {
        DryRunLauncher
            .launch(&["/nonexistent/obquit-test-binary".into()])
            .unwrap();
    }
}
