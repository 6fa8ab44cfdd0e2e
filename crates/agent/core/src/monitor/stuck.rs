//! Stuck detection over a window of sampled positions.

use super::window::BoundedWindow;
use crate::geometry::{Vec2, max_pairwise_distance};

/// Outcome of one position sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StuckSample {
    /// The window is not full yet.
    Filling,
    /// All samples lie within the threshold; `consecutive` checks so far.
    Stationary { consecutive: usize },
    /// The counter just reached the required count.
    Detected { spread: f32 },
    /// The samples spread beyond the threshold; counter and flag reset.
    Moving { spread: f32 },
}

/// Counts consecutive checks whose whole window stayed inside a small radius.
///
/// The spread is the maximum pairwise distance, not first-versus-last, so an
/// agent oscillating in place is not mistaken for a moving one.
#[derive(Clone, Debug)]
pub struct StuckDetector {
    window: BoundedWindow<Vec2>,
    threshold: f32,
    required: usize,
    consecutive: usize,
    stuck: bool,
    anchor: Option<Vec2>,
}

impl StuckDetector {
    /// `check_count` is both the window size and the number of consecutive
    /// stationary checks required.
    pub fn new(threshold: f32, check_count: usize) -> Self {
        Self {
            window: BoundedWindow::new(check_count),
            threshold,
            required: check_count.max(1),
            consecutive: 0,
            stuck: false,
            anchor: None,
        }
    }

    pub fn sample(&mut self, position: Vec2) -> StuckSample {
        self.window.push(position);

        let left_anchor = self
            .anchor
            .is_some_and(|anchor| position.distance(anchor) >= self.threshold);
        if self.stuck && left_anchor {
            self.release();
        }

        if !self.window.is_full() {
            return StuckSample::Filling;
        }

        let points: Vec<Vec2> = self.window.to_vec();
        let spread = max_pairwise_distance(&points);

        if spread < self.threshold {
            self.consecutive += 1;
            if self.consecutive >= self.required {
                self.stuck = true;
                self.anchor = Some(position);
                return StuckSample::Detected { spread };
            }
            StuckSample::Stationary {
                consecutive: self.consecutive,
            }
        } else {
            self.consecutive = 0;
            self.release();
            StuckSample::Moving { spread }
        }
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    pub fn consecutive(&self) -> usize {
        self.consecutive
    }

    /// Position where the current stuck episode was detected.
    pub fn anchor(&self) -> Option<Vec2> {
        self.anchor
    }

    /// Oldest to newest sampled positions.
    pub fn positions(&self) -> Vec<Vec2> {
        self.window.to_vec()
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Forgets the sampled positions and the consecutive count.
    ///
    /// The stuck flag stays latched until the agent is seen moving again.
    pub fn clear_window(&mut self) {
        self.window.clear();
        self.consecutive = 0;
    }

    fn release(&mut self) {
        self.stuck = false;
        self.anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jitter(i: usize) -> Vec2 {
        // Stays inside a 0.1 radius.
        Vec2::new(0.1 * (i % 2) as f32, 0.0)
    }

    #[test]
    fn detects_after_full_window_and_required_checks() {
        let mut detector = StuckDetector::new(0.5, 3);
        assert_eq!(detector.sample(jitter(0)), StuckSample::Filling);
        assert_eq!(detector.sample(jitter(1)), StuckSample::Filling);
        assert_eq!(
            detector.sample(jitter(2)),
            StuckSample::Stationary { consecutive: 1 }
        );
        assert_eq!(
            detector.sample(jitter(3)),
            StuckSample::Stationary { consecutive: 2 }
        );
        assert!(matches!(
            detector.sample(jitter(4)),
            StuckSample::Detected { .. }
        ));
        assert!(detector.is_stuck());
    }

    #[test]
    fn a_single_wide_check_resets_the_counter() {
        let mut detector = StuckDetector::new(0.5, 3);
        for i in 0..4 {
            detector.sample(jitter(i));
        }
        assert_eq!(detector.consecutive(), 2);

        assert!(matches!(
            detector.sample(Vec2::new(5.0, 0.0)),
            StuckSample::Moving { .. }
        ));
        assert_eq!(detector.consecutive(), 0);
        assert!(!detector.is_stuck());
    }

    #[test]
    fn oscillation_counts_as_moving() {
        let mut detector = StuckDetector::new(0.5, 3);
        detector.sample(Vec2::new(0.0, 0.0));
        detector.sample(Vec2::new(1.0, 0.0));
        let sample = detector.sample(Vec2::new(0.0, 0.0));
        assert!(matches!(sample, StuckSample::Moving { .. }));
    }

    #[test]
    fn latched_flag_releases_when_agent_leaves_anchor() {
        let mut detector = StuckDetector::new(0.5, 2);
        detector.sample(Vec2::ZERO);
        detector.sample(Vec2::ZERO);
        detector.sample(Vec2::ZERO);
        assert!(detector.is_stuck());

        detector.clear_window();
        assert!(detector.is_stuck());
        assert_eq!(detector.window_len(), 0);

        detector.sample(Vec2::new(0.2, 0.0));
        assert!(detector.is_stuck());
        detector.sample(Vec2::new(1.0, 0.0));
        assert!(!detector.is_stuck());
    }
}
