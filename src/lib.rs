//! Firmware building blocks for the Momo keypad: a 4×3 diode key matrix, one WS2812
//! LED under every key, and a 128×64 SSD1306 status display on a Pico 1.
//!
//! Each cycle of the [`Keyboard`](keyboard::Keyboard) loop
//!
//! 1. renders the status line and the scrolling line ([`display`]),
//! 2. scans the key matrix ([`key_matrix`]),
//! 3. lights the LED under every key that is down ([`feedback`]),
//! 4. pushes the LED frame to the strip ([`led_strip`]),
//! 5. sleeps for the rest of the cycle.
//!
//! # Glossary
//!
//! - **Drive line (column):** output pin raised while its column is scanned.
//! - **Sense line (row):** input pin (pulled down) that reads high when the key at the
//!   raised column and this row is closed.
//! - **Key index:** `column * rows + row`. It addresses both a key and the LED under it.
//! - **PIO ([Programmable I/O](https://medium.com/data-science/nine-pico-pio-wats-with-rust-part-1-9d062067dc25)):**
//!   the Pico block that serializes WS2812 data.
#![cfg_attr(not(feature = "host"), no_std)]
#![allow(async_fn_in_trait, reason = "single-threaded embedded")]

// Compile-time checks: a board must be selected (unless testing with host feature)
#[cfg(all(not(feature = "pico1"), feature = "arm", not(feature = "host")))]
compile_error!("The 'arm' feature needs a board feature: 'pico1'");

#[cfg(all(feature = "pico1", not(feature = "arm")))]
compile_error!("Pico 1 (RP2040) needs the 'arm' architecture feature");

// Must come first so the logging macros are visible in every module below.
mod fmt;

mod error;
pub mod display;
pub mod feedback;
pub mod key_matrix;
pub mod keyboard;
pub mod led_strip;
#[cfg(feature = "host")]
pub mod to_png;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};

/// Whole microseconds in `duration`, saturating at `u32::MAX` (about 71 minutes).
pub(crate) fn duration_to_micros(duration: embassy_time::Duration) -> u32 {
    u32::try_from(duration.as_micros()).unwrap_or(u32::MAX)
}
