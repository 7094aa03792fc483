//! Landmark smoothing.

mod moving;

pub use moving::LandmarkBuffer;

/// Number of poses a [`LandmarkBuffer`] averages over unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 5;
