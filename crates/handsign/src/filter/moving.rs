//! Moving average over a fixed history of hand poses.

use std::collections::VecDeque;

use itertools::Itertools;

use crate::hand::landmark::{HandPose, NUM_LANDMARKS};

/// Moving Average over the most recent hand poses of one hand slot (FIR filter).
///
/// All buffered poses are weighted equally. Once more than `capacity` poses have been pushed, the
/// oldest one is evicted.
///
/// The buffer does not know which physical hand it belongs to. If a different hand starts being
/// fed into the same buffer, its average will mix both hands until the old poses are evicted.
#[derive(Debug, Clone)]
pub struct LandmarkBuffer {
    history: VecDeque<HandPose>,
    /// Max. number of poses to keep in the history.
    capacity: usize,
}

impl LandmarkBuffer {
    /// Creates a new buffer that averages the last `capacity` poses.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "landmark buffer capacity must be at least 1");
        Self {
            history: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of poses currently buffered.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Adds a pose to the history, evicting the oldest one if the buffer is full.
    pub fn push(&mut self, pose: HandPose) {
        self.history.push_back(pose);

        if self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    /// Computes the element-wise mean of all buffered poses.
    ///
    /// Returns [`None`] if nothing has been pushed yet.
    pub fn average(&self) -> Option<HandPose> {
        if self.history.is_empty() {
            return None;
        }

        // Accumulate in f64 so that averaging identical poses reproduces them exactly.
        let mut sums = [[0.0f64; 3]; NUM_LANDMARKS];
        for pose in &self.history {
            for (sum, pos) in sums.iter_mut().zip_eq(pose.positions()) {
                for (s, c) in sum.iter_mut().zip_eq(pos) {
                    *s += f64::from(*c);
                }
            }
        }

        // The mean of finite values is finite.
        let count = self.history.len() as f64;
        Some(HandPose::new_unchecked(
            sums.map(|sum| sum.map(|s| (s / count) as f32)),
        ))
    }
}

impl Default for LandmarkBuffer {
    fn default() -> Self {
        Self::new(super::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn pose_with(offset: f32) -> HandPose {
        let mut positions = [[0.0; 3]; NUM_LANDMARKS];
        for (i, pos) in positions.iter_mut().enumerate() {
            *pos = [
                0.1 + offset + i as f32 * 0.01,
                0.7 - offset - i as f32 * 0.02,
                -0.05 * offset,
            ];
        }
        HandPose::new(positions).unwrap()
    }

    #[test]
    fn empty_has_no_average() {
        let buf = LandmarkBuffer::new(5);
        assert!(buf.is_empty());
        assert_eq!(buf.average(), None);
        assert_eq!(LandmarkBuffer::default().capacity(), 5);
    }

    #[test]
    fn single_pose_is_identity() {
        let mut buf = LandmarkBuffer::new(5);
        let pose = pose_with(0.123);
        buf.push(pose);
        assert_eq!(buf.average(), Some(pose));
    }

    #[test]
    fn identical_poses_are_identity() {
        let mut buf = LandmarkBuffer::new(5);
        let pose = pose_with(0.1);
        for _ in 0..5 {
            buf.push(pose);
        }
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.average(), Some(pose));
    }

    #[test]
    fn averages_elementwise() {
        let mut buf = LandmarkBuffer::new(3);
        buf.push(pose_with(0.0));
        buf.push(pose_with(0.2));

        let avg = buf.average().unwrap();
        let expected = pose_with(0.1);
        for (a, b) in avg.positions().iter().zip(expected.positions()) {
            for (a, b) in a.iter().zip(b) {
                assert_relative_eq!(a, b, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn evicts_oldest() {
        let mut buf = LandmarkBuffer::new(5);
        // 0.0 is pushed first and must not contribute once 6 poses went in.
        for i in 0..6 {
            buf.push(pose_with(i as f32 * 0.1));
        }
        assert_eq!(buf.len(), 5);

        let avg = buf.average().unwrap();
        let expected = pose_with(0.3);
        for (a, b) in avg.positions().iter().zip(expected.positions()) {
            for (a, b) in a.iter().zip(b) {
                assert_relative_eq!(a, b, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn only_finite_poses_reach_the_buffer() {
        let mut buf = LandmarkBuffer::new(2);
        let pose = pose_with(0.0);
        buf.push(pose);

        let mut positions = *pose.positions();
        positions[5][1] = f32::NAN;
        let err = HandPose::new(positions).unwrap_err();
        assert!(err.is_invalid_input());
        let err = HandPose::from_points(&pose.positions()[..20]).unwrap_err();
        assert!(err.is_invalid_input());

        assert_eq!(buf.len(), 1);
        assert_eq!(buf.average(), Some(pose));
    }

    #[test]
    #[should_panic]
    fn zero_capacity() {
        LandmarkBuffer::new(0);
    }
}
