//! Background rendering mode.

use std::fmt;

/// How the dialog makes the desktop appear dimmed behind the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Per-pixel transparent window with a black shade at `opacity`.
    /// Needs a running compositor.
    Composited,
    /// A screenshot of the whole screen is taken once and painted as the
    /// window background, with the shade drawn on top.
    FakeTransparency,
}

impl RenderMode {
    /// Decide once per session.  `force_fake` overrides a compositor.
    pub fn choose(compositing: bool, force_fake: bool) -> Self {
        if compositing && !force_fake {
            RenderMode::Composited
        } else {
            RenderMode::FakeTransparency
        }
    }

    /// Whether the desktop has to be captured before the window is shown.
    pub fn needs_screenshot(self) -> bool {
        self == RenderMode::FakeTransparency
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Composited => write!(f, "composited"),
            RenderMode::FakeTransparency => write!(f, "fake transparency"),
        }
    }
}
