//! Dialog presentation.
//!
//! When the `dialog-gtk` feature is enabled, [`gtk::GtkDialog`] takes over
//! the main thread and drives the dialog through the GLib main loop.
//! [`screenshot`] provides the desktop capture used when no compositor is
//! available.

#[cfg(feature = "dialog-gtk")]
pub mod gtk;
pub mod screenshot;
