//! Root-window capture for the fake-transparency background.
//!
//! The screen is grabbed once through Xlib and converted into cairo's
//! `RGB24` layout: one native-endian `u32` per pixel holding `0x00RRGGBB`,
//! rows packed with a stride of `width * 4`.

/// A captured screen in cairo `RGB24` layout.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: i32,
    pub height: i32,
    pub stride: i32,
    pub data: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("cannot open X display (DISPLAY={0})")]
    NoDisplay(String),
    #[error("X screen has no area ({0}x{1})")]
    EmptyScreen(i32, i32),
    #[error("XGetImage failed on the root window")]
    GetImage,
}

/// Channel layout of an X visual, used to turn a raw pixel into `RGB24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMasks {
    pub red: u64,
    pub green: u64,
    pub blue: u64,
}

impl ChannelMasks {
    /// The usual 24/32-bit TrueColor layout.
    pub const RGB888: ChannelMasks = ChannelMasks {
        red: 0x00ff_0000,
        green: 0x0000_ff00,
        blue: 0x0000_00ff,
    };

    pub fn to_rgb24(self, pixel: u64) -> u32 {
        let r = scale_channel(pixel, self.red);
        let g = scale_channel(pixel, self.green);
        let b = scale_channel(pixel, self.blue);
        (r << 16) | (g << 8) | b
    }
}

/// Extract the bits selected by `mask` and stretch them to 8 bits.
fn scale_channel(pixel: u64, mask: u64) -> u32 {
    if mask == 0 {
        return 0;
    }
    let shift = mask.trailing_zeros();
    let max = mask >> shift;
    let value = (pixel & mask) >> shift;
    ((value * 255 + max / 2) / max) as u32
}

/// Grab the whole root window of the default X screen.
#[cfg(feature = "dialog-gtk")]
pub fn capture_root() -> Result<Screenshot, ScreenshotError> {
    use x11::xlib;

    // SAFETY: a null display name makes Xlib use $DISPLAY.  The returned
    // pointer must be freed by XCloseDisplay.
    let display = unsafe { xlib::XOpenDisplay(std::ptr::null()) };
    if display.is_null() {
        let display_env = std::env::var("DISPLAY").unwrap_or_else(|_| "<unset>".to_string());
        return Err(ScreenshotError::NoDisplay(display_env));
    }

    // SAFETY: `display` is a valid non-null pointer returned by XOpenDisplay.
    let result = unsafe { capture_display(display) };

    // SAFETY: `display` was opened above and is not used after this.
    unsafe { xlib::XCloseDisplay(display) };

    result
}

/// # Safety
///
/// `display` must be a valid, open Xlib display.
#[cfg(feature = "dialog-gtk")]
unsafe fn capture_display(display: *mut x11::xlib::Display) -> Result<Screenshot, ScreenshotError> {
    use x11::xlib;

    let screen = xlib::XDefaultScreen(display);
    let root = xlib::XRootWindow(display, screen);
    let width = xlib::XDisplayWidth(display, screen);
    let height = xlib::XDisplayHeight(display, screen);
    if width <= 0 || height <= 0 {
        return Err(ScreenshotError::EmptyScreen(width, height));
    }

    let image = xlib::XGetImage(
        display,
        root,
        0,
        0,
        width as u32,
        height as u32,
        xlib::XAllPlanes(),
        xlib::ZPixmap,
    );
    if image.is_null() {
        return Err(ScreenshotError::GetImage);
    }

    let img = &*image;
    let masks = ChannelMasks {
        red: img.red_mask as u64,
        green: img.green_mask as u64,
        blue: img.blue_mask as u64,
    };
    let stride = width * 4;
    let mut data = Vec::with_capacity(stride as usize * height as usize);

    let direct = img.bits_per_pixel == 32
        && img.byte_order == xlib::LSBFirst
        && cfg!(target_endian = "little")
        && masks == ChannelMasks::RGB888
        && !img.data.is_null();

    if direct {
        // Already BGRX in memory, which is what RGB24 is on little-endian.
        let row_len = stride as usize;
        for y in 0..height as usize {
            let row = img.data.add(y * img.bytes_per_line as usize) as *const u8;
            data.extend_from_slice(std::slice::from_raw_parts(row, row_len));
        }
    } else {
        for y in 0..height {
            for x in 0..width {
                let pixel = xlib::XGetPixel(image, x, y) as u64;
                data.extend_from_slice(&masks.to_rgb24(pixel).to_ne_bytes());
            }
        }
    }

    xlib::XDestroyImage(image);

    Ok(Screenshot {
        width,
        height,
        stride,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb888_passes_through() {
        assert_eq!(ChannelMasks::RGB888.to_rgb24(0x0012_3456), 0x0012_3456);
        assert_eq!(ChannelMasks::RGB888.to_rgb24(0xff12_3456), 0x0012_3456);
    }

    #[test]
    fn rgb565_is_stretched_to_full_range() {
        let masks = ChannelMasks {
            red: 0xf800,
            green: 0x07e0,
            blue: 0x001f,
        };
        assert_eq!(masks.to_rgb24(0xffff), 0x00ff_ffff);
        assert_eq!(masks.to_rgb24(0x0000), 0x0000_0000);
        assert_eq!(masks.to_rgb24(0xf800), 0x00ff_0000);
        assert_eq!(masks.to_rgb24(0x001f), 0x0000_00ff);
    }

    #[test]
    fn bgr_layout_is_swapped() {
        let masks = ChannelMasks {
            red: 0x0000_00ff,
            green: 0x0000_ff00,
            blue: 0x00ff_0000,
        };
        assert_eq!(masks.to_rgb24(0x0056_3412), 0x0012_3456);
    }

    #[test]
    fn zero_mask_yields_black_channel() {
        let masks = ChannelMasks {
            red: 0,
            green: 0x0000_ff00,
            blue: 0,
        };
        assert_eq!(masks.to_rgb24(0x00ff_ffff), 0x0000_ff00);
    }
}
