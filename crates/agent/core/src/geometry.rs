//! Planar geometry shared by the detectors and the goal context.

use std::ops::{Add, Mul, Sub};

use rand::Rng;

/// A point or direction on the ground plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    /// Returns the unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / len, self.y / len)
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// The eight compass directions used for forced movement.
///
/// Axis-aligned entries come first, diagonals are pre-normalized.
pub const COMPASS_DIRECTIONS: [Vec2; 8] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(core::f32::consts::FRAC_1_SQRT_2, core::f32::consts::FRAC_1_SQRT_2),
    Vec2::new(core::f32::consts::FRAC_1_SQRT_2, -core::f32::consts::FRAC_1_SQRT_2),
    Vec2::new(-core::f32::consts::FRAC_1_SQRT_2, core::f32::consts::FRAC_1_SQRT_2),
    Vec2::new(-core::f32::consts::FRAC_1_SQRT_2, -core::f32::consts::FRAC_1_SQRT_2),
];

/// Picks one of the eight compass directions uniformly at random.
pub fn random_compass_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    COMPASS_DIRECTIONS[rng.gen_range(0..COMPASS_DIRECTIONS.len())]
}

/// Largest distance between any two points in the slice.
pub fn max_pairwise_distance(points: &[Vec2]) -> f32 {
    let mut max = 0.0f32;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            max = max.max(a.distance(*b));
        }
    }
    max
}

/// Sum of distances between consecutive points.
pub fn path_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Largest distance of any point from the first one.
pub fn max_displacement(points: &[Vec2]) -> f32 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    points
        .iter()
        .map(|p| p.distance(*first))
        .fold(0.0f32, f32::max)
}

/// Mean squared distance from the centroid.
pub fn positional_variance(points: &[Vec2]) -> f32 {
    if points.is_empty() {
        return 0.0;
    }
    let n = points.len() as f32;
    let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + *p);
    let centroid = sum * (1.0 / n);
    points
        .iter()
        .map(|p| {
            let d = *p - centroid;
            d.x * d.x + d.y * d.y
        })
        .sum::<f32>()
        / n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_directions_are_unit_length() {
        for dir in COMPASS_DIRECTIONS {
            assert!((dir.length() - 1.0).abs() < 1e-5, "{dir:?}");
        }
    }

    #[test]
    fn pairwise_distance_sees_oscillation() {
        // First and last coincide but the agent swung out in between.
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(0.0, 0.0),
        ];
        assert_eq!(points[0].distance(points[2]), 0.0);
        assert!((max_pairwise_distance(&points) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn path_and_displacement() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
        ];
        assert!((path_length(&points) - 3.0).abs() < 1e-6);
        assert!((max_displacement(&points) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn variance_of_identical_points_is_zero() {
        let points = [Vec2::new(3.0, 4.0); 4];
        assert_eq!(positional_variance(&points), 0.0);
        assert_eq!(positional_variance(&[]), 0.0);
    }

    #[test]
    fn normalizing_zero_stays_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        assert!((Vec2::new(3.0, 4.0).normalized().length() - 1.0).abs() < 1e-6);
    }
}
