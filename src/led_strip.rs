//! The per-key NeoPixel-style (WS2812) LED strip.
//!
//! [`LedStrip`] owns one in-memory [`Frame1d`] (a color for every LED) and pushes the
//! whole frame to the strip with [`LedStrip::update_leds`]. Writes with
//! [`LedStrip::set_led`] are bounds-checked: an index past the end of the strip is
//! discarded, never a panic.
//!
//! The strip hardware is reached through [`LedTransport`]. On the Pico it is
//! implemented for embassy-rp's `PioWs2812`; tests use an in-memory transport.
//!
//! # Example
//!
//! ```rust
//! use momo_keypad::led_strip::{Current, Gamma, LedStrip, LedTransport, Rgb, colors};
//!
//! struct Recorder(Vec<[Rgb; 12]>);
//!
//! impl LedTransport<12> for Recorder {
//!     async fn write(&mut self, colors: &[Rgb; 12]) {
//!         self.0.push(*colors);
//!     }
//! }
//!
//! let mut strip = LedStrip::new(Recorder(Vec::new()), Gamma::Linear, Current::Unlimited);
//! assert!(strip.set_led(7, colors::WHITE));
//! assert!(!strip.set_led(12, colors::WHITE)); // past the end: discarded
//! embassy_futures::block_on(strip.update_leds());
//! assert_eq!(strip.frame()[7], colors::WHITE);
//! ```

/// Predefined RGB color constants from the `smart_leds` crate.
///
/// Common colors include `RED`, `GREEN`, `BLUE`, `YELLOW`, `WHITE`, `BLACK`, `CYAN`, `MAGENTA`, `ORANGE`, `PURPLE`.
#[doc(inline)]
pub use smart_leds::colors;

/// RGB color type used by LED strip frames.
pub use smart_leds::RGB8;

use core::ops::{Deref, DerefMut};

#[cfg(feature = "pico1")]
mod ws2812;

/// RGB color representation re-exported from the `smart_leds` crate.
pub type Rgb = RGB8;

// Each WS2812 pixel draws about 60 mA with all three channels at full brightness.
const MILLIAMPS_PER_LED: u32 = 60;

// ============================================================================
// Gamma Correction
// ============================================================================

/// Gamma correction mode applied when a frame is pushed to the strip.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gamma {
    /// Linear gamma (no correction). Gamma = 1.0
    #[default]
    Linear,
    /// Standard gamma 2.2 correction for perceived brightness.
    Gamma2_2,
}

/// Gamma 2.2 lookup table for 8-bit values.
/// Pre-computed to avoid floating point math: corrected = (value/255)^2.2 * 255
const GAMMA_2_2_TABLE: [u8; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6, 6, 7, 7, 7, 8, 8, 8, 9, 9, 9, 10, 10, 11, 11,
    11, 12, 12, 13, 13, 13, 14, 14, 15, 15, 16, 16, 17, 17, 18, 18, 19, 19, 20, 20, 21, 22, 22, 23,
    23, 24, 25, 25, 26, 26, 27, 28, 28, 29, 30, 30, 31, 32, 33, 33, 34, 35, 35, 36, 37, 38, 39, 39,
    40, 41, 42, 43, 43, 44, 45, 46, 47, 48, 49, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61,
    62, 63, 64, 65, 66, 67, 68, 69, 70, 71, 73, 74, 75, 76, 77, 78, 79, 81, 82, 83, 84, 85, 87, 88,
    89, 90, 91, 93, 94, 95, 97, 98, 99, 100, 102, 103, 105, 106, 107, 109, 110, 111, 113, 114, 116,
    117, 119, 120, 121, 123, 124, 126, 127, 129, 130, 132, 133, 135, 137, 138, 140, 141, 143, 145,
    146, 148, 149, 151, 153, 154, 156, 158, 159, 161, 163, 165, 166, 168, 170, 172, 173, 175, 177,
    179, 181, 182, 184, 186, 188, 190, 192, 194, 196, 197, 199, 201, 203, 205, 207, 209, 211, 213,
    215, 217, 219, 221, 223, 225, 227, 229, 231, 234, 236, 238, 240, 242, 244, 246, 248, 251, 253,
    255,
];

/// Combined gamma correction and brightness scaling lookup table.
///
/// `table[value]` is `value` run through `gamma`, then scaled by `max_brightness / 255`.
/// With [`Gamma::Linear`] and a `max_brightness` of 255 the table is the identity.
#[must_use]
pub const fn generate_combo_table(gamma: Gamma, max_brightness: u8) -> [u8; 256] {
    let mut result = [0u8; 256];
    let mut index = 0;
    while index < 256 {
        let corrected = match gamma {
            Gamma::Linear => index as u8,
            Gamma::Gamma2_2 => GAMMA_2_2_TABLE[index],
        };
        result[index] = ((corrected as u16 * max_brightness as u16) / 255) as u8;
        index += 1;
    }
    result
}

// ============================================================================
// Current budget
// ============================================================================

/// Power budget for the strip, turned into a brightness cap when frames are pushed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Current {
    /// Limit brightness so that every LED at full white stays within this many milliamps.
    Milliamps(u16),
    /// No limit: brightness stays at 100%.
    #[default]
    Unlimited,
}

impl Current {
    /// Maximum brightness (0..=255) that keeps `worst_case_ma` within this budget.
    #[must_use]
    pub const fn max_brightness(self, worst_case_ma: u32) -> u8 {
        assert!(worst_case_ma > 0, "worst_case_ma must be positive");
        match self {
            Self::Milliamps(ma) => {
                let scale = (ma as u32 * 255) / worst_case_ma;
                if scale > 255 { 255 } else { scale as u8 }
            }
            Self::Unlimited => 255,
        }
    }
}

// ============================================================================
// Frame1d
// ============================================================================

/// [`Rgb`] pixel data for an LED strip, one entry per LED in strip order.
///
/// Frames deref to `[Rgb; N]`, so pixels can be read and written directly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Frame1d<const N: usize>(pub [Rgb; N]);

impl<const N: usize> Frame1d<N> {
    /// Number of LEDs in this frame.
    pub const LEN: usize = N;

    /// Create a new blank (all black) frame.
    #[must_use]
    pub const fn new() -> Self {
        Self([Rgb::new(0, 0, 0); N])
    }

    /// Create a frame filled with a single color.
    #[must_use]
    pub const fn filled(color: Rgb) -> Self {
        Self([color; N])
    }
}

impl<const N: usize> Deref for Frame1d<N> {
    type Target = [Rgb; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> DerefMut for Frame1d<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const N: usize> From<[Rgb; N]> for Frame1d<N> {
    fn from(array: [Rgb; N]) -> Self {
        Self(array)
    }
}

impl<const N: usize> From<Frame1d<N>> for [Rgb; N] {
    fn from(frame: Frame1d<N>) -> Self {
        frame.0
    }
}

impl<const N: usize> Default for Frame1d<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Transport and strip
// ============================================================================

/// Sends one complete frame to the physical strip.
///
/// Implementations put every color on the wire in strip order (LED 0 first) and
/// return once the transfer has been handed off.
pub trait LedTransport<const N: usize> {
    /// Send `colors` to the strip, LED 0 first.
    async fn write(&mut self, colors: &[Rgb; N]);
}

/// An `N`-LED strip with its in-memory frame.
///
/// The frame always holds the colors as written. Gamma correction and the current
/// budget are applied to the copy handed to the transport in [`Self::update_leds`].
pub struct LedStrip<T, const N: usize> {
    transport: T,
    frame: Frame1d<N>,
    combo_table: [u8; 256],
}

impl<T, const N: usize> LedStrip<T, N>
where
    T: LedTransport<N>,
{
    /// The number of LEDs in this strip.
    pub const LEN: usize = N;

    /// Create a strip with an all-black frame.
    ///
    /// `max_current` is budgeted assuming 60 mA per LED at full white.
    #[must_use]
    pub fn new(transport: T, gamma: Gamma, max_current: Current) -> Self {
        const { assert!(N > 0, "an LED strip needs at least one LED") };
        let worst_case_ma = u32::try_from(N)
            .unwrap_or(u32::MAX)
            .saturating_mul(MILLIAMPS_PER_LED);
        let max_brightness = max_current.max_brightness(worst_case_ma);
        Self {
            transport,
            frame: Frame1d::new(),
            combo_table: generate_combo_table(gamma, max_brightness),
        }
    }

    /// Set the LED at `index` to `color` in the in-memory frame.
    ///
    /// Returns `false` (and changes nothing) when `index` is not below `N`.
    pub fn set_led(&mut self, index: usize, color: Rgb) -> bool {
        if let Some(slot) = self.frame.get_mut(index) {
            *slot = color;
            true
        } else {
            false
        }
    }

    /// Set every LED in the in-memory frame to `color`.
    pub fn clear(&mut self, color: Rgb) {
        self.frame.fill(color);
    }

    /// The in-memory frame as last written.
    #[must_use]
    pub const fn frame(&self) -> &Frame1d<N> {
        &self.frame
    }

    /// The transport the strip writes to.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Push the whole in-memory frame to the strip.
    pub async fn update_leds(&mut self) {
        let mut corrected = self.frame;
        apply_correction(&mut corrected, &self.combo_table);
        self.transport.write(&corrected).await;
    }
}

fn apply_correction<const N: usize>(frame: &mut Frame1d<N>, combo_table: &[u8; 256]) {
    let lookup = |channel: u8| combo_table.get(usize::from(channel)).copied().unwrap_or(channel);
    for color in frame.iter_mut() {
        *color = Rgb::new(lookup(color.r), lookup(color.g), lookup(color.b));
    }
}
