//! GTK4 dialog that runs on the **main thread**.
//!
//! # Widget tree
//!
//! ```text
//! window.obquit                   (fullscreen, or layer-shell overlay)
//! └ gtk4::Overlay
//!     ├ DrawingArea              (screenshot and/or black shade)
//!     └ .obquit-buttons          (homogeneous row, centred)
//!         └ .obquit-action       (one per command)
//!             ├ .obquit-button
//!             └ .obquit-label
//! ```
//!
//! # CSS selectors
//!
//! | Selector          | Targets                                     |
//! |-------------------|---------------------------------------------|
//! | `window.obquit`   | The dialog window                           |
//! | `.obquit-buttons` | Row holding every action                    |
//! | `.obquit-action`  | Button + label pair                         |
//! | `.obquit-button`  | The clickable button                        |
//! | `.obquit-label`   | The action name under the button            |
//!
//! The dimmed background itself is drawn with cairo and is controlled by
//! the `opacity` option, not by CSS.
//!
//! A user stylesheet is layered on top of the built-in one, so it only
//! needs the rules it changes.
//!
//! In fake-transparency mode the screenshot is in device pixels and is
//! scaled down by the window's scale factor.  It is always painted from the
//! root window's origin, which assumes the window covers the whole root
//! window (single monitor, or a root window spanning all of them).

use crate::action::ActionRegistry;
use crate::config::Settings;
use crate::dialog::screenshot::{self, Screenshot};
use crate::render::RenderMode;
use crate::session::Session;
use crate::traits::Presenter;
use gtk4::prelude::*;
use gtk4::{cairo, gdk, glib};
use gtk4_layer_shell::LayerShell;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

//  Default CSS

const DEFAULT_CSS: &str = r#"
window.obquit,
window.obquit.background {
    background-color: transparent;
    background: none;
}

.obquit-button {
    min-width: 96px;
    min-height: 96px;
    border-radius: 12px;
    background-color: rgba(255, 255, 255, 0.08);
    color: white;
    -gtk-icon-size: 48px;
    transition: background-color 150ms ease-in-out;
}

.obquit-button:hover,
.obquit-button:focus-visible {
    background-color: rgba(255, 255, 255, 0.25);
}

.obquit-label {
    margin-top: 6px;
}
"#;

const BUTTON_SPACING: i32 = 10;

/// Errors from bringing up the GTK dialog.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("failed to initialise GTK4: {0}")]
    Init(String),
    #[error("no display available")]
    NoDisplay,
}

/// What sits under the black shade.
enum Background {
    /// Transparent window; the compositor shows the desktop.
    Transparent,
    /// Desktop screenshot taken before the window mapped.
    Screenshot(cairo::ImageSurface),
    /// No compositor and no screenshot: plain black.
    Black,
}

/// The [`Presenter`] used by the `obquit` binary.
pub struct GtkDialog {
    css_path: Option<PathBuf>,
}

impl GtkDialog {
    /// `css_path` is loaded over the built-in stylesheet if the file exists.
    pub fn new(css_path: Option<PathBuf>) -> Self {
        Self { css_path }
    }
}

impl Presenter for GtkDialog {
    type Error = DialogError;

    fn present(&mut self, settings: &Settings, session: Rc<RefCell<Session>>) -> Result<(), DialogError> {
        gtk4::init().map_err(|e| DialogError::Init(e.to_string()))?;
        info!("GTK4 initialised on main thread");

        let display = gdk::Display::default().ok_or(DialogError::NoDisplay)?;
        let mode = RenderMode::choose(display.is_composited(), settings.force_fake);
        info!("render mode: {} (opacity {})", mode, settings.opacity);

        load_css(&self.css_path, &display);

        // Grab the screen before our own window covers it.
        let background = if mode.needs_screenshot() {
            capture_background()
        } else {
            Background::Transparent
        };

        let main_loop = glib::MainLoop::new(None, false);

        let window = gtk4::Window::new();
        window.set_title(Some("obquit"));
        window.set_decorated(false);
        window.add_css_class("obquit");
        if mode == RenderMode::Composited {
            window.remove_css_class("background");
        }
        make_fullscreen(&window);

        let overlay = gtk4::Overlay::new();
        overlay.set_child(Some(&shade(background, settings.opacity)));
        overlay.add_overlay(&button_row(&settings.actions, &session, &main_loop));
        window.set_child(Some(&overlay));

        //  Keyboard
        let keys = gtk4::EventControllerKey::new();
        keys.set_propagation_phase(gtk4::PropagationPhase::Capture);
        {
            let session = Rc::clone(&session);
            let registry = settings.actions.clone();
            let main_loop = main_loop.clone();
            keys.connect_key_pressed(move |_, keyval, _, _| {
                let Some(name) = keyval.name() else {
                    return glib::Propagation::Proceed;
                };
                debug!("key pressed: {}", name);
                if session.borrow_mut().key_press(name.as_str(), &registry) {
                    main_loop.quit();
                    glib::Propagation::Stop
                } else {
                    glib::Propagation::Proceed
                }
            });
        }
        window.add_controller(keys);

        //  Window manager close
        {
            let session = Rc::clone(&session);
            let main_loop = main_loop.clone();
            window.connect_close_request(move |_| {
                session.borrow_mut().cancel();
                main_loop.quit();
                glib::Propagation::Stop
            });
        }

        window.present();
        session.borrow_mut().show();

        info!("entering GLib main loop");
        main_loop.run();
        info!("GLib main loop exited");

        // Unmap before returning so a launched program never races the dialog.
        window.destroy();
        let context = glib::MainContext::default();
        while context.pending() {
            context.iteration(false);
        }

        Ok(())
    }
}

//  Widgets

fn button_row(
    registry: &ActionRegistry,
    session: &Rc<RefCell<Session>>,
    main_loop: &glib::MainLoop,
) -> gtk4::Box {
    let row = gtk4::Box::new(gtk4::Orientation::Horizontal, BUTTON_SPACING);
    row.add_css_class("obquit-buttons");
    row.set_homogeneous(true);
    row.set_halign(gtk4::Align::Center);
    row.set_valign(gtk4::Align::Center);

    for action in registry.commands() {
        let cell = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
        cell.add_css_class("obquit-action");

        let button = gtk4::Button::new();
        button.add_css_class("obquit-button");
        if let Some(icon) = action.icon_name() {
            button.set_icon_name(icon);
        }
        if let Some(key) = registry.key_for(&action.name) {
            button.set_tooltip_text(Some(format!("{} ({})", action.name, key).as_str()));
        }
        {
            let action = action.clone();
            let session = Rc::clone(session);
            let main_loop = main_loop.clone();
            button.connect_clicked(move |_| {
                if session.borrow_mut().select(&action) {
                    main_loop.quit();
                }
            });
        }

        let label = gtk4::Label::new(None);
        label.add_css_class("obquit-label");
        label.set_markup(&format!(
            "<span fgcolor='white' size='large'>{}</span>",
            glib::markup_escape_text(&action.name)
        ));

        cell.append(&button);
        cell.append(&label);
        row.append(&cell);
    }

    row
}

fn shade(background: Background, opacity: f64) -> gtk4::DrawingArea {
    let area = gtk4::DrawingArea::new();
    area.set_hexpand(true);
    area.set_vexpand(true);
    area.set_can_target(false);
    area.set_draw_func(move |area, cr, _, _| {
        let scale = f64::from(area.scale_factor().max(1));
        if let Err(e) = paint(cr, &background, opacity, scale) {
            warn!("background paint failed: {}", e);
        }
    });
    area
}

/// `scale` is the widget's scale factor; the screenshot is one pixel per
/// device pixel.
fn paint(cr: &cairo::Context, background: &Background, opacity: f64, scale: f64) -> Result<(), cairo::Error> {
    match background {
        Background::Transparent => {}
        Background::Screenshot(surface) => {
            cr.save()?;
            cr.scale(1.0 / scale, 1.0 / scale);
            cr.set_source_surface(surface, 0.0, 0.0)?;
            cr.paint()?;
            cr.restore()?;
        }
        Background::Black => {
            cr.set_source_rgb(0.0, 0.0, 0.0);
            cr.paint()?;
        }
    }
    cr.set_source_rgba(0.0, 0.0, 0.0, opacity);
    cr.paint()
}

fn capture_background() -> Background {
    let surface = screenshot::capture_root()
        .map_err(|e| e.to_string())
        .and_then(|shot| to_surface(shot).map_err(|e| e.to_string()));
    match surface {
        Ok(surface) => {
            info!("captured {}x{} screenshot", surface.width(), surface.height());
            Background::Screenshot(surface)
        }
        Err(e) => {
            warn!("screenshot failed ({}), using a black background", e);
            Background::Black
        }
    }
}

fn to_surface(shot: Screenshot) -> Result<cairo::ImageSurface, cairo::Error> {
    cairo::ImageSurface::create_for_data(
        shot.data,
        cairo::Format::Rgb24,
        shot.width,
        shot.height,
        shot.stride,
    )
}

//  Window placement

fn make_fullscreen(window: &gtk4::Window) {
    if gtk4_layer_shell::is_supported() {
        debug!("using layer-shell overlay");
        window.init_layer_shell();
        window.set_layer(gtk4_layer_shell::Layer::Overlay);
        window.set_namespace("obquit");
        window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::Exclusive);
        for edge in [
            gtk4_layer_shell::Edge::Top,
            gtk4_layer_shell::Edge::Bottom,
            gtk4_layer_shell::Edge::Left,
            gtk4_layer_shell::Edge::Right,
        ] {
            window.set_anchor(edge, true);
        }
        window.set_exclusive_zone(-1);
    } else {
        window.fullscreen();
    }
}

//  CSS loading

fn load_css(css_path: &Option<PathBuf>, display: &gdk::Display) {
    add_css(display, DEFAULT_CSS, gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION);

    let Some(p) = css_path.as_ref().filter(|p| p.exists()) else {
        debug!("no user CSS, using built-in default");
        return;
    };
    match std::fs::read_to_string(p) {
        Ok(content) => {
            info!("user CSS: {} ({} bytes)", p.display(), content.len());
            add_css(display, &content, gtk4::STYLE_PROVIDER_PRIORITY_USER);
        }
        Err(e) => warn!("CSS read failed ({}): {}, using built-in", p.display(), e),
    }
}

fn add_css(display: &gdk::Display, css: &str, priority: u32) {
    let provider = gtk4::CssProvider::new();
    #[allow(deprecated)]
    provider.load_from_data(css);
    gtk4::style_context_add_provider_for_display(display, &provider, priority);
}
