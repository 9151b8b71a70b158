//! Diode key matrix scanning.
//!
//! See [`KeyMatrix`] for the scan algorithm and an example.

use core::convert::Infallible;

use embassy_time::Duration;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use crate::duration_to_micros;

/// Default time a column is held high before its rows are sampled.
pub const COLUMN_SETTLE_DEFAULT: Duration = Duration::from_millis(1);

// ============================================================================
// ScanResult
// ============================================================================

/// The key indices found closed by one pass over the matrix.
///
/// Indices are kept in ascending order without duplicates. A result is only meaningful
/// for the pass that produced it: nothing is carried over to the next scan.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScanResult<const N: usize> {
    keys: Vec<usize, N>,
}

impl<const N: usize> ScanResult<N> {
    /// An empty result (no key down).
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Add `key_index` to the set.
    ///
    /// Returns `false` if it was already present or the set is full.
    ///
    /// The set holds at most `N` indices of any value. Indices at or above `N` are stored
    /// too and take up capacity, so once `N` indices are present any further index is
    /// rejected (and logged at `debug`), even one below `N`. [`KeyMatrix::scan`] only
    /// produces indices below `N`, so a scan never fills up early.
    pub fn insert(&mut self, key_index: usize) -> bool {
        match self.keys.binary_search(&key_index) {
            Ok(_) => false,
            Err(position) => {
                let inserted = self.keys.insert(position, key_index).is_ok();
                if !inserted {
                    debug!("scan result full ({} keys), key {} dropped", N, key_index);
                }
                inserted
            }
        }
    }

    /// Whether `key_index` is down in this pass.
    #[must_use]
    pub fn contains(&self, key_index: usize) -> bool {
        self.keys.binary_search(&key_index).is_ok()
    }

    /// Number of keys down.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// `true` when no key is down.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The key indices in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.keys
    }

    /// Iterate over the key indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.keys.iter().copied()
    }
}

/// Collects with [`ScanResult::insert`]: duplicates are merged and indices past capacity
/// are dropped.
impl<const N: usize> FromIterator<usize> for ScanResult<N> {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut result = Self::new();
        for key_index in iter {
            result.insert(key_index);
        }
        result
    }
}

// ============================================================================
// KeyMatrix
// ============================================================================

/// A `COLS`×`ROWS` diode key matrix with `N == COLS * ROWS` keys.
///
/// Columns are drive lines (outputs), rows are sense lines (inputs pulled low when idle).
/// The key at `(column, row)` has index `column * ROWS + row`, which is also the index
/// of the LED under it.
///
/// [`scan`](Self::scan) raises each column in turn, waits for the signal to settle
/// through the diodes, samples every row, then lowers the column again. It reports raw
/// levels: no debouncing, no edge detection, and a held key shows up in every pass.
///
/// Pins must be infallible (`Error = Infallible`), as the RP2040 GPIO pins are.
///
/// # Example
///
/// On the Pico (firmware build only):
///
/// ```rust,ignore
/// use embassy_rp::gpio::{Input, Level, Output, Pull};
/// use momo_keypad::key_matrix::{COLUMN_SETTLE_DEFAULT, KeyMatrix};
///
/// async fn example(p: embassy_rp::Peripherals) {
///     let columns = [
///         Output::new(p.PIN_5, Level::Low),
///         Output::new(p.PIN_6, Level::Low),
///     ];
///     let rows = [Input::new(p.PIN_9, Pull::Down), Input::new(p.PIN_10, Pull::Down)];
///     let mut matrix = KeyMatrix::<_, _, 4, 2, 2>::new(columns, rows, COLUMN_SETTLE_DEFAULT);
///
///     let scan = matrix.scan(&mut embassy_time::Delay).await;
///     for key_index in scan.iter() {
///         defmt::info!("key {} is down", key_index);
///     }
/// }
/// ```
pub struct KeyMatrix<O, I, const N: usize, const COLS: usize, const ROWS: usize> {
    columns: [O; COLS],
    rows: [I; ROWS],
    column_settle: Duration,
}

impl<O, I, const N: usize, const COLS: usize, const ROWS: usize> KeyMatrix<O, I, N, COLS, ROWS>
where
    O: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
{
    /// Number of keys (and LEDs) in the matrix.
    pub const LEN: usize = N;

    /// Take ownership of the drive and sense lines and lower every column.
    ///
    /// `COLS * ROWS` must equal `N`; this is checked at compile time.
    #[must_use]
    pub fn new(columns: [O; COLS], rows: [I; ROWS], column_settle: Duration) -> Self {
        const { assert!(COLS * ROWS == N, "COLS * ROWS must equal N") };
        let mut matrix = Self {
            columns,
            rows,
            column_settle,
        };
        for column in &mut matrix.columns {
            let Ok(()) = column.set_low();
        }
        matrix
    }

    /// Key index of the key at `(column_index, row_index)`.
    #[must_use]
    pub const fn key_index(column_index: usize, row_index: usize) -> usize {
        column_index * ROWS + row_index
    }

    /// `(column_index, row_index)` of `key_index`, or `None` past the last key.
    #[must_use]
    pub const fn key_position(key_index: usize) -> Option<(usize, usize)> {
        if key_index < N {
            Some((key_index / ROWS, key_index % ROWS))
        } else {
            None
        }
    }

    /// Scan every column once and return the keys that are down.
    pub async fn scan<D: DelayNs>(&mut self, delay: &mut D) -> ScanResult<N> {
        let settle_us = duration_to_micros(self.column_settle);
        let mut result = ScanResult::new();
        for (column_index, column) in self.columns.iter_mut().enumerate() {
            let Ok(()) = column.set_high();
            delay.delay_us(settle_us).await;
            for (row_index, row) in self.rows.iter_mut().enumerate() {
                let Ok(is_down) = row.is_high();
                if is_down {
                    let key_index = Self::key_index(column_index, row_index);
                    // The PCB labels switches from 1.
                    info!("sw{} pressed, key {}", key_index + 1, key_index);
                    result.insert(key_index);
                }
            }
            let Ok(()) = column.set_low();
        }
        result
    }
}
