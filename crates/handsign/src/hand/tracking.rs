//! Per-frame gesture recognition for multiple hands.
//!
//! Landmark detectors generally don't assign a persistent identity to the hands they find. The
//! [`GestureTracker`] therefore assigns hands to smoothing slots purely by detection order: the
//! first hand reported in a frame is smoothed with the first slot, and so on. If the detector
//! reports hands in a different order from one frame to the next, their landmarks get mixed until
//! the stale poses are evicted from the slot.

use serde::{Deserialize, Serialize};

use crate::{
    filter::LandmarkBuffer,
    num::{normalized_to_pixel, Position},
    Error, Result,
};

use super::{
    gesture::{Gesture, GestureClassifier},
    landmark::{HandPose, Handedness},
};

/// Vertical distance in pixels between the wrist and the gesture label drawn for a hand.
const LABEL_OFFSET_PX: u32 = 20;

/// A hand as reported by the external landmark detector for one frame.
///
/// The fields are kept in the detector's raw form and are only validated when the hand is
/// processed, so that one malformed hand is reported on its own instead of rejecting the whole
/// frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedHand {
    /// Handedness label, `Left` or `Right`.
    #[serde(default)]
    pub handedness: String,
    /// Normalized landmark positions. Expected to contain exactly 21 entries of 3 coordinates.
    #[serde(default)]
    pub landmarks: Vec<Vec<f32>>,
}

/// The result of processing one [`DetectedHand`].
#[derive(Debug)]
pub struct HandReport {
    slot: usize,
    handedness: Option<Handedness>,
    wrist: Option<Position>,
    outcome: Result<Option<Gesture>>,
}

impl HandReport {
    /// Returns the index of the smoothing slot the hand was assigned to.
    ///
    /// This is the hand's position in the detector output, not a persistent identity.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Returns the hand's handedness, or [`None`] if the detector's label was not recognized.
    pub fn handedness(&self) -> Option<Handedness> {
        self.handedness
    }

    /// Returns the unsmoothed wrist position, or [`None`] if the hand could not be processed.
    pub fn wrist(&self) -> Option<Position> {
        self.wrist
    }

    /// Returns the recognized gesture, [`None`] if no gesture matched, or the error that
    /// prevented processing this hand.
    pub fn outcome(&self) -> &Result<Option<Gesture>> {
        &self.outcome
    }

    /// Returns the recognized gesture, if processing succeeded and a gesture matched.
    pub fn gesture(&self) -> Option<Gesture> {
        self.outcome.as_ref().ok().copied().flatten()
    }

    /// Computes the pixel position at which to draw this hand's label in an image of the given
    /// size.
    ///
    /// The label is placed slightly above the wrist. Returns [`None`] if the wrist is outside of
    /// the image.
    pub fn label_position(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let [x, y, _] = self.wrist?;
        let (px, py) = normalized_to_pixel(x, y, width, height)?;
        Some((px, py.saturating_sub(LABEL_OFFSET_PX)))
    }
}

/// Smooths and classifies the hands detected in a stream of frames.
pub struct GestureTracker {
    classifier: GestureClassifier,
    slots: Vec<LandmarkBuffer>,
}

impl GestureTracker {
    /// Default number of hand slots.
    pub const DEFAULT_SLOTS: usize = 2;

    /// Creates a tracker with `slots` smoothing slots, each averaging over the last `capacity`
    /// poses.
    ///
    /// Hands beyond the first `slots` in a frame are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(classifier: GestureClassifier, slots: usize, capacity: usize) -> Self {
        Self {
            classifier,
            slots: (0..slots).map(|_| LandmarkBuffer::new(capacity)).collect(),
        }
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Returns the smoothing buffers, indexed by slot.
    pub fn slots(&self) -> &[LandmarkBuffer] {
        &self.slots
    }

    /// Processes all hands detected in a frame, returning one report per processed hand.
    ///
    /// The `i`-th hand is smoothed using slot `i`. A hand with an unknown handedness label or
    /// invalid landmarks produces an error report and leaves its slot untouched; the remaining
    /// hands are processed normally.
    pub fn process(&mut self, hands: &[DetectedHand]) -> Vec<HandReport> {
        if hands.len() > self.slots.len() {
            log::warn!(
                "{} hands detected, but only {} slots available; ignoring the rest",
                hands.len(),
                self.slots.len()
            );
        }

        hands
            .iter()
            .zip(&mut self.slots)
            .enumerate()
            .map(|(slot, (hand, buffer))| {
                match Self::process_hand(&self.classifier, buffer, hand) {
                    Ok((handedness, wrist, gesture)) => HandReport {
                        slot,
                        handedness: Some(handedness),
                        wrist: Some(wrist),
                        outcome: Ok(gesture),
                    },
                    Err(e) => {
                        log::warn!("skipping hand in slot {slot}: {e}");
                        HandReport {
                            slot,
                            handedness: hand.handedness.parse().ok(),
                            wrist: None,
                            outcome: Err(e),
                        }
                    }
                }
            })
            .collect()
    }

    fn process_hand(
        classifier: &GestureClassifier,
        buffer: &mut LandmarkBuffer,
        hand: &DetectedHand,
    ) -> Result<(Handedness, Position, Option<Gesture>)> {
        let handedness: Handedness = hand.handedness.parse()?;
        let points = hand
            .landmarks
            .iter()
            .enumerate()
            .map(|(index, coords)| {
                Position::try_from(coords.as_slice()).map_err(|_| Error::InvalidCoordinateCount {
                    index,
                    actual: coords.len(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let raw = HandPose::from_points(&points)?;

        buffer.push(raw);
        log::trace!("pushed pose, {} buffered", buffer.len());

        let pose = buffer.average().unwrap_or(raw);
        Ok((handedness, raw.wrist(), classifier.recognize(&pose, handedness)))
    }
}
