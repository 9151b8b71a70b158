use derive_more::{Display, Error};

/// Errors raised at the edges of the firmware (driver setup and display transfers).
///
/// The scan/feedback loop itself never fails: out-of-range LED writes are discarded
/// and pin reads are infallible.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The display driver rejected an initialization or flush over the bus.
    #[display("display bus transfer failed")]
    Display,
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
