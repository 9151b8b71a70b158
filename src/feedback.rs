//! Turns a key scan into LED colors: the LED under every key that is down lights up.

use crate::key_matrix::ScanResult;
use crate::led_strip::{LedStrip, LedTransport, Rgb, colors};

/// Default color of the LED under a key that is down (a dim white).
pub const ACTIVE_COLOR_DEFAULT: Rgb = Rgb::new(0x20, 0x20, 0x20);

/// Default color of every other LED.
pub const INACTIVE_COLOR_DEFAULT: Rgb = colors::BLACK;

/// Maps key indices onto LED indices (the identity) and colors them.
///
/// Key matrix and strip share the const `N`, so every scanned key has an LED.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeedbackMapper {
    active: Rgb,
    inactive: Rgb,
}

impl FeedbackMapper {
    /// A mapper that paints down keys `active` and everything else `inactive`.
    #[must_use]
    pub const fn new(active: Rgb, inactive: Rgb) -> Self {
        Self { active, inactive }
    }

    /// Color of the LED under a key that is down.
    #[must_use]
    pub const fn active(&self) -> Rgb {
        self.active
    }

    /// Color of the LED under a key that is up.
    #[must_use]
    pub const fn inactive(&self) -> Rgb {
        self.inactive
    }

    /// Reset the whole frame to the inactive color, then light the LED of every key in `scan`.
    ///
    /// Only the in-memory frame changes; push it with [`LedStrip::update_leds`]. Nothing
    /// latches: a key's LED is lit only for the scans that see the key down.
    pub fn apply<T, const N: usize>(&self, scan: &ScanResult<N>, strip: &mut LedStrip<T, N>)
    where
        T: LedTransport<N>,
    {
        strip.clear(self.inactive);
        for key_index in scan.iter() {
            if strip.set_led(key_index, self.active) {
                info!("Set LED {} to active", key_index);
            } else {
                warn!("key {} has no LED (strip has {}), skipped", key_index, N);
            }
        }
    }
}

impl Default for FeedbackMapper {
    fn default() -> Self {
        Self::new(ACTIVE_COLOR_DEFAULT, INACTIVE_COLOR_DEFAULT)
    }
}
