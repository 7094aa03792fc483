//! Rule-based static gesture classification.
//!
//! Each finger is first classified as extended or not using simple coordinate comparisons between
//! its tip and one of its joints. The resulting [`FingerExtension`] is then matched against an
//! ordered list of rules, and the first matching rule determines the [`Gesture`].
//!
//! The finger heuristics assume an upright hand: fingers count as extended when their tip is
//! above their PIP joint in the image. Fingers pointing sideways or downwards will not be
//! classified correctly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    num::{planar_distance, Position},
    Result,
};

use super::landmark::{HandPose, Handedness, LandmarkIdx};

/// The static gestures that can be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gesture {
    /// No finger extended.
    Fist,
    /// All fingers extended.
    Open,
    /// Index and middle finger extended ("V sign").
    Peace,
    /// Only the thumb extended.
    ThumbsUp,
    /// Thumb and index tips touching, other fingers extended.
    Ok,
}

impl Gesture {
    /// Returns the human-readable label to display for this gesture.
    pub fn label(self) -> &'static str {
        match self {
            Gesture::Fist => "Fist",
            Gesture::Open => "Open",
            Gesture::Peace => "Peace",
            Gesture::ThumbsUp => "Thumbs Up",
            Gesture::Ok => "OK",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];
}

/// Per-finger extension flags, in [`Finger`] order (thumb to pinky).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerExtension([bool; 5]);

impl FingerExtension {
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    pub fn flags(&self) -> [bool; 5] {
        self.0
    }

    pub fn none(&self) -> bool {
        !self.0.iter().any(|&f| f)
    }

    pub fn all(&self) -> bool {
        self.0.iter().all(|&f| f)
    }

    /// Returns whether exactly the fingers in `fingers` are extended, and no others.
    pub fn exactly(&self, fingers: &[Finger]) -> bool {
        Finger::ALL
            .iter()
            .all(|&f| self.is_extended(f) == fingers.contains(&f))
    }
}

/// Relation between the detector's handedness label and the direction the thumb points when
/// extended.
///
/// Whether the handedness label matches the image orientation depends on the detector and on
/// whether the camera image is mirrored before detection. This is left as a configuration point
/// so that it can be calibrated against a real detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbPolarity {
    /// The extended thumb of a right hand points towards +X (right); a left one towards -X.
    #[default]
    Unmirrored,
    /// The reverse of [`ThumbPolarity::Unmirrored`].
    Mirrored,
}

/// Classifies [`HandPose`]s as one of the known [`Gesture`]s.
///
/// Classification is a pure function of the pose, the handedness, and the classifier's
/// parameters; no state is kept between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureClassifier {
    ok_distance_threshold: f32,
    thumb_polarity: ThumbPolarity,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OK_DISTANCE_THRESHOLD)
    }
}

impl GestureClassifier {
    /// Default maximum distance between thumb and index finger tips for [`Gesture::Ok`].
    pub const DEFAULT_OK_DISTANCE_THRESHOLD: f32 = 0.05;

    /// Creates a classifier.
    ///
    /// `ok_distance_threshold` is the distance (in normalized image coordinates, X/Y plane only)
    /// below which thumb and index tips are considered touching.
    ///
    /// # Panics
    ///
    /// Panics if `ok_distance_threshold` is negative, NaN or infinite.
    pub fn new(ok_distance_threshold: f32) -> Self {
        assert!(
            ok_distance_threshold.is_finite() && ok_distance_threshold >= 0.0,
            "invalid OK distance threshold {ok_distance_threshold}"
        );
        Self {
            ok_distance_threshold,
            thumb_polarity: ThumbPolarity::default(),
        }
    }

    /// Returns a copy of `self` with a different [`ThumbPolarity`].
    pub fn with_thumb_polarity(self, thumb_polarity: ThumbPolarity) -> Self {
        Self {
            thumb_polarity,
            ..self
        }
    }

    pub fn ok_distance_threshold(&self) -> f32 {
        self.ok_distance_threshold
    }

    pub fn thumb_polarity(&self) -> ThumbPolarity {
        self.thumb_polarity
    }

    /// Determines which fingers of `pose` are extended.
    pub fn compute_extension(&self, pose: &HandPose, handedness: Handedness) -> FingerExtension {
        use LandmarkIdx::*;

        let above = |tip: LandmarkIdx, pip: LandmarkIdx| pose[tip][1] < pose[pip][1];

        let thumb_tip = pose[ThumbTip][0];
        let thumb_ip = pose[ThumbIp][0];
        let points_right = match self.thumb_polarity {
            ThumbPolarity::Unmirrored => handedness == Handedness::Right,
            ThumbPolarity::Mirrored => handedness == Handedness::Left,
        };
        let thumb = if points_right {
            thumb_tip > thumb_ip
        } else {
            thumb_tip < thumb_ip
        };

        FingerExtension([
            thumb,
            above(IndexFingerTip, IndexFingerPip),
            above(MiddleFingerTip, MiddleFingerPip),
            above(RingFingerTip, RingFingerPip),
            above(PinkyTip, PinkyPip),
        ])
    }

    /// Classifies `pose`, returning [`None`] if it does not match any known gesture.
    pub fn recognize(&self, pose: &HandPose, handedness: Handedness) -> Option<Gesture> {
        use Finger::*;

        let ext = self.compute_extension(pose, handedness);
        log::trace!("{handedness} hand extension: {:?}", ext.flags());

        if ext.none() {
            return Some(Gesture::Fist);
        }
        if ext.all() {
            return Some(Gesture::Open);
        }
        if ext.exactly(&[Index, Middle]) {
            return Some(Gesture::Peace);
        }
        if ext.exactly(&[Thumb]) {
            return Some(Gesture::ThumbsUp);
        }
        // The thumb and index flags are irrelevant here, since the tips touch.
        if ext.is_extended(Middle) && ext.is_extended(Ring) && ext.is_extended(Pinky) {
            let dist = planar_distance(
                pose[LandmarkIdx::ThumbTip],
                pose[LandmarkIdx::IndexFingerTip],
            );
            if dist < self.ok_distance_threshold {
                return Some(Gesture::Ok);
            }
        }

        None
    }

    /// Validates raw landmark positions and classifies them.
    ///
    /// # Errors
    ///
    /// Returns an error if `points` is not a valid [`HandPose`].
    pub fn recognize_points(
        &self,
        points: &[Position],
        handedness: Handedness,
    ) -> Result<Option<Gesture>> {
        let pose = HandPose::from_points(points)?;
        Ok(self.recognize(&pose, handedness))
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::*;

    /// Builds an upright pose where each finger in `fingers` is extended.
    ///
    /// An extended thumb points towards -X, so it only counts as extended for a left hand.
    fn pose(fingers: [bool; 5]) -> HandPose {
        use LandmarkIdx::*;

        let mut positions = [[0.5, 0.8, 0.0]; 21];
        let (ip, tip) = if fingers[0] { (0.40, 0.30) } else { (0.40, 0.50) };
        positions[ThumbIp as usize] = [ip, 0.6, 0.0];
        positions[ThumbTip as usize] = [tip, 0.6, 0.0];

        let pairs = [
            (IndexFingerPip, IndexFingerTip, 0.35),
            (MiddleFingerPip, MiddleFingerTip, 0.45),
            (RingFingerPip, RingFingerTip, 0.55),
            (PinkyPip, PinkyTip, 0.65),
        ];
        for ((pip, tip, x), &ext) in pairs.into_iter().zip(&fingers[1..]) {
            positions[pip as usize] = [x, 0.5, 0.0];
            positions[tip as usize] = [x, if ext { 0.3 } else { 0.6 }, 0.0];
        }
        HandPose::new(positions).unwrap()
    }

    #[test]
    fn basic_gestures() {
        let c = GestureClassifier::default();
        let left = Handedness::Left;
        assert_eq!(
            c.recognize(&pose([false; 5]), left),
            Some(Gesture::Fist)
        );
        assert_eq!(c.recognize(&pose([true; 5]), left), Some(Gesture::Open));
        assert_eq!(
            c.recognize(&pose([false, true, true, false, false]), left),
            Some(Gesture::Peace)
        );
        assert_eq!(
            c.recognize(&pose([true, false, false, false, false]), left),
            Some(Gesture::ThumbsUp)
        );
        assert_eq!(
            c.recognize(&pose([false, true, false, false, false]), left),
            None
        );
    }

    #[test]
    fn thumb_polarity() {
        // Thumb tip is left of the IP joint.
        let p = pose([true, false, false, false, false]);
        let c = GestureClassifier::default();
        assert!(c
            .compute_extension(&p, Handedness::Left)
            .is_extended(Finger::Thumb));
        assert!(!c
            .compute_extension(&p, Handedness::Right)
            .is_extended(Finger::Thumb));

        let c = c.with_thumb_polarity(ThumbPolarity::Mirrored);
        assert!(!c
            .compute_extension(&p, Handedness::Left)
            .is_extended(Finger::Thumb));
        assert!(c
            .compute_extension(&p, Handedness::Right)
            .is_extended(Finger::Thumb));
    }

    #[test]
    fn thumb_equal_x_is_not_extended() {
        let mut positions = *pose([false; 5]).positions();
        positions[LandmarkIdx::ThumbTip as usize][0] = positions[LandmarkIdx::ThumbIp as usize][0];
        let p = HandPose::new(positions).unwrap();
        let c = GestureClassifier::default();
        for hand in [Handedness::Left, Handedness::Right] {
            assert!(!c.compute_extension(&p, hand).is_extended(Finger::Thumb));
        }
    }

    #[test]
    fn finger_tip_level_with_pip_is_not_extended() {
        let mut positions = *pose([false; 5]).positions();
        positions[LandmarkIdx::IndexFingerTip as usize][1] =
            positions[LandmarkIdx::IndexFingerPip as usize][1];
        let p = HandPose::new(positions).unwrap();
        assert!(!GestureClassifier::default()
            .compute_extension(&p, Handedness::Right)
            .is_extended(Finger::Index));
    }

    #[test]
    fn ok_requires_close_tips() {
        use LandmarkIdx::*;

        let c = GestureClassifier::new(0.05);
        let mut positions = *pose([false, false, true, true, true]).positions();
        positions[ThumbTip as usize] = [0.50, 0.40, 0.0];
        positions[IndexFingerTip as usize] = [0.52, 0.41, 0.0];
        assert_eq!(
            c.recognize(&HandPose::new(positions).unwrap(), Handedness::Left),
            Some(Gesture::Ok)
        );

        positions[IndexFingerTip as usize] = [0.60, 0.41, 0.0];
        assert_eq!(
            c.recognize(&HandPose::new(positions).unwrap(), Handedness::Left),
            None
        );
    }

    #[test]
    fn ok_threshold_is_strict() {
        use LandmarkIdx::*;

        let mut positions = *pose([false, false, true, true, true]).positions();
        positions[ThumbTip as usize] = [0.25, 0.5, 0.0];
        positions[IndexFingerTip as usize] = [0.25, 0.75, 0.0];
        let p = HandPose::new(positions).unwrap();
        assert_eq!(
            GestureClassifier::new(0.25).recognize(&p, Handedness::Right),
            None
        );
        assert_eq!(
            GestureClassifier::new(0.2501).recognize(&p, Handedness::Right),
            Some(Gesture::Ok)
        );
    }

    #[test]
    fn recognize_points_validates() {
        let c = GestureClassifier::default();
        let p = pose([false; 5]);
        assert_eq!(
            c.recognize_points(p.positions(), Handedness::Left).unwrap(),
            Some(Gesture::Fist)
        );
        assert!(c
            .recognize_points(&p.positions()[..3], Handedness::Left)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn non_finite_points_are_not_classified() {
        let c = GestureClassifier::default();
        assert!(matches!(
            c.recognize_points(&[[f32::NAN; 3]; 21], Handedness::Left),
            Err(Error::NonFiniteCoordinate { index: 0 })
        ));

        let mut positions = *pose([false; 5]).positions();
        positions[LandmarkIdx::PinkyTip as usize][0] = f32::INFINITY;
        assert!(matches!(
            c.recognize_points(&positions, Handedness::Right),
            Err(Error::NonFiniteCoordinate { index: 20 })
        ));
    }

    #[test]
    fn labels() {
        let labels = [
            Gesture::Fist,
            Gesture::Open,
            Gesture::Peace,
            Gesture::ThumbsUp,
            Gesture::Ok,
        ]
        .map(Gesture::label);
        assert_eq!(labels, ["Fist", "Open", "Peace", "Thumbs Up", "OK"]);
        assert_eq!(Gesture::ThumbsUp.to_string(), "Thumbs Up");
    }

    #[test]
    #[should_panic]
    fn negative_threshold() {
        GestureClassifier::new(-0.1);
    }
}
