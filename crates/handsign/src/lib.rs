//! Static hand gesture recognition.
//!
//! `handsign` turns the 21 hand landmarks produced by an external hand landmark detector (for
//! example MediaPipe Hands) into one of a small set of static gestures, and smooths the noisy
//! per-frame landmark stream beforehand.
//!
//! # Coordinates
//!
//! Landmark coordinates are normalized to the input image: X points to the right and Y points
//! *down*, both in range 0.0 to 1.0. Z is a relative depth estimate and is never used for
//! classification.
//!
//! # Environment Variables
//!
//! * `RUST_LOG`: adjusts log filtering on top of the defaults set by [`init_logger!`].
//! * `HANDSIGN_CONFIG`: path to a TOML configuration file used by the `handsign` binary when no
//!   `--config` argument is given. See [`config::Config`].

pub mod config;
pub mod error;
pub mod filter;
pub mod hand;
pub mod num;

pub use error::{Error, Result};

use log::LevelFilter;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and `handsign` will log at *debug* level. `RUST_LOG` is applied on top.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
