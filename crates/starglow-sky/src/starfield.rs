//! Starfield generation and rotation.
//!
//! A large static point cloud partitioned into two color classes: ~10%
//! warm accent stars, the rest cool ambient stars with per-point randomized
//! brightness. Point positions are immutable after construction; only the
//! aggregate rotation angle changes over time.

use glam::Vec3;
use rand::Rng;

use crate::rng::SkyRng;

/// Half-extent of the star cloud in x and y.
const SPREAD_XY: f32 = 15.0;
/// Depth range: stars sit in `[-SPREAD_Z, 0]`, behind the camera target.
const SPREAD_Z: f32 = 15.0;
/// Fraction of stars drawn from the warm accent palette.
const ACCENT_RATIO: f64 = 0.1;
/// Warm accent color (amber).
const ACCENT_COLOR: [f32; 3] = [1.0, 0.6, 0.2];

/// A single star in the field.
#[derive(Clone, Debug)]
pub struct StarPoint {
    /// World position. Fixed for the life of the field.
    pub position: Vec3,
    /// Linear RGB color.
    pub color: [f32; 3],
}

/// Generates a star catalog of a given size.
pub struct StarfieldGenerator {
    count: u32,
}

impl StarfieldGenerator {
    /// Create a generator for `count` stars.
    pub fn new(count: u32) -> Self {
        Self { count }
    }

    /// Generate the catalog. Deterministic for a given RNG state.
    pub fn generate(&self, rng: &mut SkyRng) -> Vec<StarPoint> {
        let mut stars = Vec::with_capacity(self.count as usize);

        for _ in 0..self.count {
            let position = Vec3::new(
                (rng.random::<f32>() - 0.5) * 2.0 * SPREAD_XY,
                (rng.random::<f32>() - 0.5) * 2.0 * SPREAD_XY,
                (rng.random::<f32>() - 1.0) * SPREAD_Z,
            );

            let color = if rng.random_bool(ACCENT_RATIO) {
                ACCENT_COLOR
            } else {
                // Cool ambient star: randomized brightness, blue leading.
                let brightness = 0.7 + rng.random::<f32>() * 0.3;
                [brightness * 0.8, brightness * 0.9, brightness]
            };

            stars.push(StarPoint { position, color });
        }

        stars
    }
}

/// The starfield: an immutable point catalog plus one rotation angle.
pub struct Starfield {
    points: Vec<StarPoint>,
    rotation_angle: f32,
    rotation_speed: f32,
}

impl Starfield {
    /// Build a starfield from a catalog and an effective rotation speed in
    /// radians per second (already reduced-motion-adjusted by the caller).
    pub fn new(points: Vec<StarPoint>, rotation_speed: f32) -> Self {
        Self {
            points,
            rotation_angle: 0.0,
            rotation_speed,
        }
    }

    /// Advance the rotation by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.rotation_angle += dt * self.rotation_speed;
    }

    /// The star catalog.
    pub fn points(&self) -> &[StarPoint] {
        &self.points
    }

    /// Number of stars.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Current aggregate rotation in radians.
    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    /// Effective rotation speed in radians per second.
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::rng_from_seed;

    fn generate(seed: u64, count: u32) -> Vec<StarPoint> {
        let (mut rng, _) = rng_from_seed(Some(seed));
        StarfieldGenerator::new(count).generate(&mut rng)
    }

    #[test]
    fn test_star_count_matches_request() {
        assert_eq!(generate(42, 800).len(), 800);
        assert_eq!(generate(42, 1600).len(), 1600);
    }

    #[test]
    fn test_positions_within_spread() {
        for (i, star) in generate(42, 5000).iter().enumerate() {
            let p = star.position;
            assert!(p.x.abs() <= SPREAD_XY, "star {i} x out of bounds: {}", p.x);
            assert!(p.y.abs() <= SPREAD_XY, "star {i} y out of bounds: {}", p.y);
            assert!(
                (-SPREAD_Z..=0.0).contains(&p.z),
                "star {i} z out of bounds: {}",
                p.z
            );
        }
    }

    #[test]
    fn test_accent_fraction_near_ten_percent() {
        let stars = generate(42, 10_000);
        let accent = stars.iter().filter(|s| s.color == ACCENT_COLOR).count();
        assert!(
            (800..=1200).contains(&accent),
            "expected ~10% accent stars, got {accent}/10000"
        );
    }

    #[test]
    fn test_ambient_stars_are_cool_toned() {
        for star in generate(7, 2000) {
            if star.color == ACCENT_COLOR {
                continue;
            }
            let [r, g, b] = star.color;
            assert!(b >= g && g >= r, "ambient star not cool-toned: {:?}", star.color);
            assert!((0.0..=1.0).contains(&b));
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = generate(123, 1000);
        let b = generate(123, 1000);
        for (i, (sa, sb)) in a.iter().zip(b.iter()).enumerate() {
            assert!(
                (sa.position - sb.position).length() < 1e-6,
                "star {i} position differs between identical seeds"
            );
            assert_eq!(sa.color, sb.color, "star {i} color differs");
        }
    }

    #[test]
    fn test_different_seed_different_field() {
        let a = generate(1, 1000);
        let b = generate(9999, 1000);
        let differing = a
            .iter()
            .zip(b.iter())
            .filter(|(sa, sb)| (sa.position - sb.position).length() > 0.01)
            .count();
        assert!(differing > 900, "only {differing}/1000 stars differ between seeds");
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut field = Starfield::new(generate(42, 10), 0.01);
        for _ in 0..100 {
            field.advance(1.0 / 60.0);
        }
        let expected = 0.01 * 100.0 / 60.0;
        assert!((field.rotation_angle() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_positions_immutable_under_advance() {
        let points = generate(42, 10);
        let snapshot: Vec<Vec3> = points.iter().map(|p| p.position).collect();
        let mut field = Starfield::new(points, 0.01);
        for _ in 0..100 {
            field.advance(0.016);
        }
        for (i, star) in field.points().iter().enumerate() {
            assert_eq!(star.position, snapshot[i], "star {i} moved");
        }
    }
}
