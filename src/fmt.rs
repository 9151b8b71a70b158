//! Logging macros that forward to `defmt` on the device and to `log` on the host.
//!
//! With neither feature enabled the arguments are still evaluated (by reference) so
//! call sites compile identically everywhere.
#![macro_use]
#![allow(unused_macros, reason = "not every level is used in every build")]

macro_rules! fmt_dispatch {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(all(feature = "host", not(feature = "defmt")))]
            ::log::$level!($s $(, $x)*);
            #[cfg(not(any(feature = "defmt", feature = "host")))]
            let _ = ($( & $x, )*);
        }
    };
}

macro_rules! trace {
    ($($arg:tt)*) => { fmt_dispatch!(trace, $($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { fmt_dispatch!(debug, $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { fmt_dispatch!(info, $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { fmt_dispatch!(warn, $($arg)*) };
}

macro_rules! error {
    ($($arg:tt)*) => { fmt_dispatch!(error, $($arg)*) };
}
