//! Hand landmark layout.
//!
//! Landmarks follow the 21-point layout used by MediaPipe Hands, which most hand landmark
//! detectors share.

use std::{fmt, ops::Index, str::FromStr};

use crate::{num::Position, Error, Result};

/// Number of landmarks making up a [`HandPose`].
pub const NUM_LANDMARKS: usize = 21;

/// A complete set of 21 hand landmarks in normalized image coordinates.
///
/// The landmark count is enforced by the type, and every coordinate is finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    positions: [Position; NUM_LANDMARKS],
}

impl HandPose {
    /// Creates a pose from 21 landmark positions, ordered as in [`LandmarkIdx`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteCoordinate`] if any coordinate is NaN or infinite.
    pub fn new(positions: [Position; NUM_LANDMARKS]) -> Result<Self> {
        if let Some(index) = positions
            .iter()
            .position(|pos| pos.iter().any(|c| !c.is_finite()))
        {
            return Err(Error::NonFiniteCoordinate { index });
        }

        Ok(Self { positions })
    }

    /// Wraps positions that are already known to be finite.
    pub(crate) fn new_unchecked(positions: [Position; NUM_LANDMARKS]) -> Self {
        debug_assert!(positions.iter().flatten().all(|c| c.is_finite()));
        Self { positions }
    }

    /// Creates a pose from a slice of landmark positions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLandmarkCount`] if `points` does not contain exactly 21 entries,
    /// and [`Error::NonFiniteCoordinate`] if any coordinate is NaN or infinite. Input is never
    /// padded or truncated.
    pub fn from_points(points: &[Position]) -> Result<Self> {
        let positions: [Position; NUM_LANDMARKS] =
            points.try_into().map_err(|_| Error::InvalidLandmarkCount {
                expected: NUM_LANDMARKS,
                actual: points.len(),
            })?;

        Self::new(positions)
    }

    pub fn positions(&self) -> &[Position; NUM_LANDMARKS] {
        &self.positions
    }

    /// Returns the position of the wrist, which is used to anchor annotations.
    pub fn wrist(&self) -> Position {
        self[LandmarkIdx::Wrist]
    }
}

impl Index<LandmarkIdx> for HandPose {
    type Output = Position;

    fn index(&self, index: LandmarkIdx) -> &Self::Output {
        &self.positions[index as usize]
    }
}

impl Index<usize> for HandPose {
    type Output = Position;

    fn index(&self, index: usize) -> &Self::Output {
        &self.positions[index]
    }
}

/// Which hand a pose belongs to, as reported by the landmark detector.
///
/// This is assumed to describe the hand as seen in the unmirrored camera image. See
/// [`ThumbPolarity`](super::gesture::ThumbPolarity) for how mirrored input is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the labels used by MediaPipe, `"Left"` and `"Right"`.
impl FromStr for Handedness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Left" => Ok(Handedness::Left),
            "Right" => Ok(Handedness::Right),
            _ => Err(Error::UnknownHandedness(s.to_string())),
        }
    }
}

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **IP**: Interphalangeal joint of the thumb.
/// - **PIP**: Proximal Interphalangeal joint, the middle joint of a finger.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: Placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}
