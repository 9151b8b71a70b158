//! The status display: a fixed greeting on top and a line of characters scrolling left below it.
//!
//! [`Renderer`] composes both lines into the display's frame buffer with
//! [`embedded-graphics`](https://docs.rs/embedded-graphics) and flushes it. Each call to
//! [`Renderer::render`] rotates the scrolling text ([`ScrollText`]) one character left.
//!
//! The display itself is anything implementing [`StatusDisplay`]: the SSD1306 OLED on the
//! firmware build, or a [`MonoFrame`] in memory.
//!
//! # Example
//!
//! ```rust
//! use momo_keypad::display::{MonoFrame, Renderer};
//! use momo_keypad::keyboard::KeyboardConfig;
//!
//! let mut renderer = Renderer::from_config(&KeyboardConfig::DEFAULT);
//! let mut frame: MonoFrame<128, 64> = MonoFrame::new();
//!
//! renderer.render(&mut frame);
//! assert_eq!(renderer.scroll_text().as_str(), "BCEFA");
//! assert!(frame.lit_pixel_count() > 0);
//! ```

#[cfg(feature = "pico1")]
mod oled;

use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    text::{Baseline, Text},
    Drawable, Pixel,
};

use crate::Result;
use crate::keyboard::KeyboardConfig;

// ============================================================================
// StatusDisplay
// ============================================================================

/// A monochrome frame-buffered display.
///
/// Drawing (through [`DrawTarget`]) only touches the buffer; [`flush`](Self::flush)
/// sends the whole buffer to the panel.
pub trait StatusDisplay: DrawTarget<Color = BinaryColor> {
    /// Turn every pixel in the buffer off.
    fn clear_buffer(&mut self);

    /// Send the buffer to the panel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Display`](crate::Error::Display) if the bus transfer fails.
    fn flush(&mut self) -> Result<()>;
}

// ============================================================================
// MonoFrame
// ============================================================================

/// An in-memory `W`×`H` one-bit frame buffer.
///
/// Used as the display on the host (previews, tests). Pixels drawn outside the frame
/// are ignored; [`flush`](StatusDisplay::flush) has nothing to send.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MonoFrame<const W: usize, const H: usize>(pub [[bool; W]; H]);

impl<const W: usize, const H: usize> MonoFrame<W, H> {
    /// Frame width in pixels.
    pub const WIDTH: usize = W;
    /// Frame height in pixels.
    pub const HEIGHT: usize = H;

    /// Create a frame with every pixel off.
    #[must_use]
    pub const fn new() -> Self {
        Self([[false; W]; H])
    }

    /// Whether the pixel at `(x, y)` is on. Out-of-frame pixels read as off.
    #[must_use]
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.0
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Number of pixels that are on.
    #[must_use]
    pub fn lit_pixel_count(&self) -> usize {
        self.0.iter().flatten().filter(|&&on| on).count()
    }

    /// Number of pixels that are on in rows `rows` (clamped to the frame).
    #[must_use]
    pub fn lit_pixel_count_in_rows(&self, rows: core::ops::Range<usize>) -> usize {
        self.0
            .iter()
            .skip(rows.start)
            .take(rows.end.saturating_sub(rows.start))
            .flatten()
            .filter(|&&on| on)
            .count()
    }
}

impl<const W: usize, const H: usize> Default for MonoFrame<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> OriginDimensions for MonoFrame<W, H> {
    fn size(&self) -> Size {
        Size::new(
            u32::try_from(W).unwrap_or(u32::MAX),
            u32::try_from(H).unwrap_or(u32::MAX),
        )
    }
}

impl<const W: usize, const H: usize> DrawTarget for MonoFrame<W, H> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let (Ok(x_index), Ok(y_index)) = (usize::try_from(coord.x), usize::try_from(coord.y))
            else {
                continue;
            };
            if let Some(pixel) = self.0.get_mut(y_index).and_then(|row| row.get_mut(x_index)) {
                *pixel = color.is_on();
            }
        }
        Ok(())
    }
}

impl<const W: usize, const H: usize> StatusDisplay for MonoFrame<W, H> {
    fn clear_buffer(&mut self) {
        *self = Self::new();
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// ScrollText
// ============================================================================

/// `N` ASCII characters that scroll left one position per render.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScrollText<const N: usize>([u8; N]);

impl<const N: usize> ScrollText<N> {
    /// Wrap `text`, which must be non-empty ASCII (checked at compile time in const contexts).
    #[must_use]
    pub const fn new(text: [u8; N]) -> Self {
        assert!(N > 0, "scroll text must not be empty");
        let mut index = 0;
        while index < N {
            assert!(text[index].is_ascii(), "scroll text must be ASCII");
            index += 1;
        }
        Self(text)
    }

    /// Cyclic shift left by one: the first character moves to the end.
    ///
    /// Rotating `N` times restores the original order.
    pub fn rotate_left(&mut self) {
        self.0.rotate_left(1);
    }

    /// The characters in their current order.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // ASCII is always valid UTF-8.
        core::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// The raw bytes in their current order.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Draws the status line and the scrolling line; owns the scroll state.
pub struct Renderer<const N: usize> {
    status_text: &'static str,
    status_position: Point,
    status_font: &'static MonoFont<'static>,
    scroll_text: ScrollText<N>,
    scroll_position: Point,
    scroll_font: &'static MonoFont<'static>,
}

impl<const N: usize> Renderer<N> {
    /// A renderer with the text, fonts and positions from `config`.
    #[must_use]
    pub const fn from_config(config: &KeyboardConfig<N>) -> Self {
        Self {
            status_text: config.status_text,
            status_position: config.status_position,
            status_font: config.status_font,
            scroll_text: config.scroll_text,
            scroll_position: config.scroll_position,
            scroll_font: config.scroll_font,
        }
    }

    /// The scroll text as it was last drawn.
    #[must_use]
    pub const fn scroll_text(&self) -> &ScrollText<N> {
        &self.scroll_text
    }

    /// Compose one display frame and flush it.
    ///
    /// Clears the buffer, draws the status line, advances the scroll text by one character,
    /// draws it, then flushes. Failures are logged and dropped: the next render starts over.
    pub fn render<D: StatusDisplay>(&mut self, display: &mut D) {
        display.clear_buffer();

        let status_style = MonoTextStyle::new(self.status_font, BinaryColor::On);
        if Text::with_baseline(
            self.status_text,
            self.status_position,
            status_style,
            Baseline::Alphabetic,
        )
        .draw(display)
        .is_err()
        {
            warn!("status line draw failed");
        }

        self.scroll_text.rotate_left();
        let scroll_style = MonoTextStyle::new(self.scroll_font, BinaryColor::On);
        if Text::with_baseline(
            self.scroll_text.as_str(),
            self.scroll_position,
            scroll_style,
            Baseline::Alphabetic,
        )
        .draw(display)
        .is_err()
        {
            warn!("scroll line draw failed");
        }

        if let Err(err) = display.flush() {
            warn!("display flush failed: {}", err);
        }
    }
}
