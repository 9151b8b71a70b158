#![allow(dead_code, reason = "each test binary uses a different subset of the helpers")]
//! In-memory stand-ins for the keypad's pins, delay, LED strip and display.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_graphics::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::BinaryColor,
};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use momo_keypad::display::{MonoFrame, StatusDisplay};
use momo_keypad::key_matrix::KeyMatrix;
use momo_keypad::led_strip::{LedTransport, Rgb};
use momo_keypad::{Error, Result};

// ============================================================================
// Pins
// ============================================================================

/// A level change on a column line, in the order it happened.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnEvent {
    High(usize),
    Low(usize),
}

/// The physical switches plus whichever column is currently raised.
#[derive(Debug, Default)]
pub struct Switches {
    pressed: Vec<(usize, usize)>,
    raised_column: Option<usize>,
    events: Vec<ColumnEvent>,
}

/// Shared handle to the switch state seen by every mock pin.
#[derive(Clone, Debug, Default)]
pub struct SwitchBoard(Rc<RefCell<Switches>>);

impl SwitchBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, column_index: usize, row_index: usize) {
        self.0.borrow_mut().pressed.push((column_index, row_index));
    }

    pub fn release(&self, column_index: usize, row_index: usize) {
        self.0
            .borrow_mut()
            .pressed
            .retain(|&key| key != (column_index, row_index));
    }

    pub fn release_all(&self) {
        self.0.borrow_mut().pressed.clear();
    }

    pub fn raised_column(&self) -> Option<usize> {
        self.0.borrow().raised_column
    }

    pub fn events(&self) -> Vec<ColumnEvent> {
        self.0.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.0.borrow_mut().events.clear();
    }

    /// Column and row pins wired to this board.
    pub fn pins<const COLS: usize, const ROWS: usize>(
        &self,
    ) -> ([MockColumn; COLS], [MockRow; ROWS]) {
        let columns = core::array::from_fn(|index| MockColumn {
            index,
            board: self.clone(),
        });
        let rows = core::array::from_fn(|index| MockRow {
            index,
            board: self.clone(),
        });
        (columns, rows)
    }

    /// A matrix whose columns and rows are all wired to this board.
    pub fn matrix<const N: usize, const COLS: usize, const ROWS: usize>(
        &self,
    ) -> KeyMatrix<MockColumn, MockRow, N, COLS, ROWS> {
        let (columns, rows) = self.pins();
        KeyMatrix::new(
            columns,
            rows,
            momo_keypad::key_matrix::COLUMN_SETTLE_DEFAULT,
        )
    }
}

/// Drive line: raising it makes its column's closed switches visible on the rows.
pub struct MockColumn {
    index: usize,
    board: SwitchBoard,
}

impl ErrorType for MockColumn {
    type Error = Infallible;
}

impl OutputPin for MockColumn {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        let mut switches = self.board.0.borrow_mut();
        if switches.raised_column == Some(self.index) {
            switches.raised_column = None;
        }
        switches.events.push(ColumnEvent::Low(self.index));
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        let mut switches = self.board.0.borrow_mut();
        switches.raised_column = Some(self.index);
        switches.events.push(ColumnEvent::High(self.index));
        Ok(())
    }
}

/// Sense line: reads high when the switch at the raised column and this row is closed.
pub struct MockRow {
    index: usize,
    board: SwitchBoard,
}

impl ErrorType for MockRow {
    type Error = Infallible;
}

impl InputPin for MockRow {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        let switches = self.board.0.borrow();
        Ok(switches
            .raised_column
            .is_some_and(|column_index| switches.pressed.contains(&(column_index, self.index))))
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        self.is_high().map(|is_high| !is_high)
    }
}

// ============================================================================
// Delay
// ============================================================================

/// Records every requested wait in nanoseconds instead of sleeping.
#[derive(Clone, Debug, Default)]
pub struct MockDelay(Rc<RefCell<Vec<u64>>>);

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits_ns(&self) -> Vec<u64> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().push(u64::from(us) * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(u64::from(ms) * 1_000_000);
    }
}

// ============================================================================
// LED strip
// ============================================================================

/// Keeps every frame written to the strip.
#[derive(Clone, Debug, Default)]
pub struct MockTransport<const N: usize>(Rc<RefCell<Vec<[Rgb; N]>>>);

impl<const N: usize> MockTransport<N> {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn pushes(&self) -> Vec<[Rgb; N]> {
        self.0.borrow().clone()
    }

    pub fn last_push(&self) -> Option<[Rgb; N]> {
        self.0.borrow().last().copied()
    }
}

impl<const N: usize> LedTransport<N> for MockTransport<N> {
    async fn write(&mut self, colors: &[Rgb; N]) {
        self.0.borrow_mut().push(*colors);
    }
}

// ============================================================================
// Display
// ============================================================================

/// A 128×64 in-memory display that counts clears and flushes and can be told to fail flushes.
#[derive(Debug, Default)]
pub struct CountingDisplay {
    pub frame: MonoFrame<128, 64>,
    pub clears: usize,
    pub flushes: usize,
    pub fail_flush: bool,
}

impl CountingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_flush: true,
            ..Self::default()
        }
    }
}

impl OriginDimensions for CountingDisplay {
    fn size(&self) -> Size {
        self.frame.size()
    }
}

impl DrawTarget for CountingDisplay {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame.draw_iter(pixels)
    }
}

impl StatusDisplay for CountingDisplay {
    fn clear_buffer(&mut self) {
        self.clears += 1;
        self.frame.clear_buffer();
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        if self.fail_flush {
            Err(Error::Display)
        } else {
            Ok(())
        }
    }
}
