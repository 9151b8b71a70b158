//! The firmware main loop and its compile-time configuration.
//!
//! A [`Keyboard`] owns every device it touches (matrix pins, LED strip, display, delay)
//! and repeats one cycle forever:
//!
//! 1. render the display,
//! 2. scan the matrix and rebuild the LED frame from the keys that are down,
//! 3. push the LED frame,
//! 4. sleep for [`KeyboardConfig::cycle_period`].
//!
//! Everything runs in the caller's task: no background tasks, channels or locks.

use core::convert::Infallible;

use embassy_time::Duration;
use embedded_graphics::{
    geometry::Point,
    mono_font::{
        MonoFont,
        ascii::{FONT_9X15_BOLD, FONT_10X20},
    },
};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::display::{Renderer, ScrollText, StatusDisplay};
use crate::duration_to_micros;
use crate::feedback::{ACTIVE_COLOR_DEFAULT, FeedbackMapper, INACTIVE_COLOR_DEFAULT};
use crate::key_matrix::{COLUMN_SETTLE_DEFAULT, KeyMatrix};
use crate::led_strip::{Current, Gamma, LedStrip, LedTransport, Rgb};

/// Default time between the starts of two cycles' sleeps.
pub const CYCLE_PERIOD_DEFAULT: Duration = Duration::from_millis(100);

/// Default wait after clearing the display at power-on.
pub const DISPLAY_POWER_ON_DELAY_DEFAULT: Duration = Duration::from_millis(50);

// ============================================================================
// KeyboardConfig
// ============================================================================

/// Everything the firmware lets you tune, fixed at compile time.
///
/// `S` is the length of the scrolling text.
///
/// # Example
///
/// ```rust
/// use momo_keypad::display::ScrollText;
/// use momo_keypad::keyboard::KeyboardConfig;
/// use momo_keypad::led_strip::colors;
///
/// const CONFIG: KeyboardConfig<3> = KeyboardConfig::DEFAULT
///     .with_active_color(colors::BLUE)
///     .with_scroll_text(ScrollText::new(*b"XYZ"));
///
/// assert_eq!(CONFIG.scroll_text.as_str(), "XYZ");
/// ```
#[derive(Clone, Copy)]
pub struct KeyboardConfig<const S: usize> {
    /// How long a column is held high before its rows are sampled.
    pub column_settle: Duration,
    /// Sleep at the end of every cycle.
    pub cycle_period: Duration,
    /// Wait after clearing the display at power-on.
    pub display_power_on_delay: Duration,
    /// LED color under a key that is down.
    pub active_color: Rgb,
    /// LED color under a key that is up.
    pub inactive_color: Rgb,
    /// Gamma correction applied when the LED frame is pushed.
    pub gamma: Gamma,
    /// Power budget for the LED strip.
    pub max_current: Current,
    /// The fixed top line.
    pub status_text: &'static str,
    /// Left end of the top line's baseline.
    pub status_position: Point,
    /// Font of the top line.
    pub status_font: &'static MonoFont<'static>,
    /// Initial characters of the scrolling line.
    pub scroll_text: ScrollText<S>,
    /// Left end of the scrolling line's baseline.
    pub scroll_position: Point,
    /// Font of the scrolling line.
    pub scroll_font: &'static MonoFont<'static>,
}

impl KeyboardConfig<5> {
    /// The Momo keypad as shipped.
    pub const DEFAULT: Self = Self {
        column_settle: COLUMN_SETTLE_DEFAULT,
        cycle_period: CYCLE_PERIOD_DEFAULT,
        display_power_on_delay: DISPLAY_POWER_ON_DELAY_DEFAULT,
        active_color: ACTIVE_COLOR_DEFAULT,
        inactive_color: INACTIVE_COLOR_DEFAULT,
        gamma: Gamma::Linear,
        max_current: Current::Unlimited,
        status_text: "Hi,I'm Momo",
        status_position: Point::new(5, 12),
        status_font: &FONT_9X15_BOLD,
        scroll_text: ScrollText::new(*b"ABCEF"),
        scroll_position: Point::new(5, 45),
        scroll_font: &FONT_10X20,
    };
}

impl<const S: usize> KeyboardConfig<S> {
    /// Same configuration with a different scrolling text (and length).
    #[must_use]
    pub const fn with_scroll_text<const T: usize>(
        self,
        scroll_text: ScrollText<T>,
    ) -> KeyboardConfig<T> {
        KeyboardConfig {
            column_settle: self.column_settle,
            cycle_period: self.cycle_period,
            display_power_on_delay: self.display_power_on_delay,
            active_color: self.active_color,
            inactive_color: self.inactive_color,
            gamma: self.gamma,
            max_current: self.max_current,
            status_text: self.status_text,
            status_position: self.status_position,
            status_font: self.status_font,
            scroll_text,
            scroll_position: self.scroll_position,
            scroll_font: self.scroll_font,
        }
    }

    /// Same configuration with a different status line.
    #[must_use]
    pub const fn with_status_text(mut self, status_text: &'static str) -> Self {
        self.status_text = status_text;
        self
    }

    /// Same configuration with a different LED color for keys that are down.
    #[must_use]
    pub const fn with_active_color(mut self, active_color: Rgb) -> Self {
        self.active_color = active_color;
        self
    }

    /// Same configuration with a different LED color for keys that are up.
    #[must_use]
    pub const fn with_inactive_color(mut self, inactive_color: Rgb) -> Self {
        self.inactive_color = inactive_color;
        self
    }

    /// Same configuration with different LED color correction.
    #[must_use]
    pub const fn with_led_correction(mut self, gamma: Gamma, max_current: Current) -> Self {
        self.gamma = gamma;
        self.max_current = max_current;
        self
    }

    /// Same configuration with different timing.
    #[must_use]
    pub const fn with_timing(mut self, column_settle: Duration, cycle_period: Duration) -> Self {
        self.column_settle = column_settle;
        self.cycle_period = cycle_period;
        self
    }
}

// ============================================================================
// Keyboard
// ============================================================================

/// The whole device: key matrix, per-key LEDs, status display and the loop tying them together.
///
/// `N` keys (and LEDs) in `COLS` columns by `ROWS` rows; `S` scrolling characters.
pub struct Keyboard<O, I, T, D, W, const N: usize, const COLS: usize, const ROWS: usize, const S: usize>
{
    matrix: KeyMatrix<O, I, N, COLS, ROWS>,
    strip: LedStrip<T, N>,
    mapper: FeedbackMapper,
    display: D,
    renderer: Renderer<S>,
    delay: W,
    cycle_period: Duration,
    display_power_on_delay: Duration,
}

impl<O, I, T, D, W, const N: usize, const COLS: usize, const ROWS: usize, const S: usize>
    Keyboard<O, I, T, D, W, N, COLS, ROWS, S>
where
    O: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
    T: LedTransport<N>,
    D: StatusDisplay,
    W: DelayNs,
{
    /// Assemble the device from owned peripherals.
    ///
    /// The key matrix is built from `columns` and `rows` with `config.column_settle`.
    /// `COLS * ROWS` must equal `N`; this is checked at compile time.
    #[must_use]
    pub fn new(
        columns: [O; COLS],
        rows: [I; ROWS],
        transport: T,
        display: D,
        delay: W,
        config: &KeyboardConfig<S>,
    ) -> Self {
        Self {
            matrix: KeyMatrix::new(columns, rows, config.column_settle),
            strip: LedStrip::new(transport, config.gamma, config.max_current),
            mapper: FeedbackMapper::new(config.active_color, config.inactive_color),
            display,
            renderer: Renderer::from_config(config),
            delay,
            cycle_period: config.cycle_period,
            display_power_on_delay: config.display_power_on_delay,
        }
    }

    /// The LED strip (its in-memory frame is the last one pushed).
    #[must_use]
    pub const fn strip(&self) -> &LedStrip<T, N> {
        &self.strip
    }

    /// The status display.
    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// The display renderer and its scroll state.
    #[must_use]
    pub const fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    /// Blank the display and give the panel time to settle.
    pub async fn power_on(&mut self) {
        self.display.clear_buffer();
        if let Err(err) = self.display.flush() {
            warn!("display clear at power-on failed: {}", err);
        }
        self.delay
            .delay_us(duration_to_micros(self.display_power_on_delay))
            .await;
        info!("keyboard ready: {} keys", N);
    }

    /// Run one cycle: render, scan and map, push, sleep.
    pub async fn run_cycle(&mut self) {
        self.renderer.render(&mut self.display);

        let scan = self.matrix.scan(&mut self.delay).await;
        self.mapper.apply(&scan, &mut self.strip);
        self.strip.update_leds().await;

        self.delay
            .delay_us(duration_to_micros(self.cycle_period))
            .await;
    }

    /// Power on, then run cycles until the device loses power.
    pub async fn run(mut self) -> ! {
        self.power_on().await;
        loop {
            self.run_cycle().await;
        }
    }
}
