//! **obquit**, a fullscreen logout dialog for lightweight sessions.
//!
//! The dialog shows one button per configured action (shutdown, suspend,
//! logout, …) over a dimmed desktop.  Clicking a button or pressing its
//! shortcut closes the dialog and *then* launches the action's command;
//! Escape closes it without running anything.
//!
//! # Architecture
//!
//! The crate is organised around two seams defined in [`traits`]:
//!
//! * [`traits::Presenter`]: puts the dialog on screen and routes input
//!   into a [`session::Session`].  The GTK4 implementation lives in
//!   [`dialog`].
//! * [`traits::Launcher`]: starts the selected command after the
//!   presenter has torn the window down ([`launch`]).
//!
//! [`app::run`] ties them together with the [`config`] loader and the
//! single-instance [`lock`].

pub mod action;
pub mod app;
pub mod config;
pub mod dialog;
pub mod ini;
pub mod launch;
pub mod lock;
pub mod render;
pub mod session;
pub mod traits;
