//! Hand landmarks, gesture classification and per-frame gesture tracking.

pub mod gesture;
pub mod landmark;
pub mod tracking;
