//! Error type shared by the library.

use std::io;

use thiserror::Error;

/// Result alias using [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while validating input or loading configuration.
///
/// "No gesture recognized" and "nothing buffered yet" are not errors; they are reported as
/// `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// A hand pose did not contain the expected number of landmarks.
    #[error("expected {expected} hand landmarks, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    /// A landmark did not consist of exactly 3 coordinates.
    #[error("landmark {index} has {actual} coordinates, expected 3")]
    InvalidCoordinateCount { index: usize, actual: usize },

    /// A landmark coordinate was NaN or infinite.
    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// The detector reported a handedness label other than `Left` or `Right`.
    #[error("unknown handedness label `{0}`")]
    UnknownHandedness(String),

    /// A configuration file or value was rejected.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns whether this error was caused by malformed landmark input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidLandmarkCount { .. }
                | Error::InvalidCoordinateCount { .. }
                | Error::NonFiniteCoordinate { .. }
                | Error::UnknownHandedness(_)
        )
    }
}
