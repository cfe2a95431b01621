//! The 2D particle-field backdrop: drifting, twinkling points with pointer
//! repulsion and connective lines.
//!
//! Particles live in viewport pixel space, wrap toroidally at the bounds,
//! and are allocated once as a fixed pool; individual particles are never
//! destroyed. Each updates independently; the only pairwise work is the
//! connective-line pass, which visits every unordered pair exactly once.

use glam::Vec2;
use rand::Rng;

use starglow_config::ParticleTuning;

use crate::rng::SkyRng;

/// Fraction of particles drawn from the warm accent palette.
const ACCENT_RATIO: f64 = 0.1;
/// Warm accent color (amber).
const ACCENT_COLOR: [f32; 3] = [0.961, 0.620, 0.043];
/// Ambient color (pale indigo).
const AMBIENT_COLOR: [f32; 3] = [0.706, 0.745, 1.0];
/// Drift speed half-range in pixels per second.
const DRIFT_SPEED: f32 = 7.5;
/// Minimum particle radius in pixels.
const RADIUS_MIN: f32 = 0.5;
/// Random extra radius.
const RADIUS_EXTRA: f32 = 1.5;

/// One drifting particle.
#[derive(Clone, Debug)]
pub struct Particle {
    /// Position in viewport pixels, always within `[0, w) × [0, h)`.
    pub position: Vec2,
    /// Velocity in pixels per second.
    pub velocity: Vec2,
    /// Radius in pixels.
    pub radius: f32,
    /// Current opacity, held within the twinkle band.
    pub opacity: f32,
    /// Twinkle direction: +1.0 brightening, -1.0 dimming.
    pub twinkle_dir: f32,
    /// Whether this particle uses the warm accent palette.
    pub accent: bool,
}

impl Particle {
    /// The particle's linear RGB color.
    pub fn color(&self) -> [f32; 3] {
        if self.accent { ACCENT_COLOR } else { AMBIENT_COLOR }
    }
}

/// A connective line between two close particles.
#[derive(Clone, Copy, Debug)]
pub struct LinkLine {
    /// First endpoint in viewport pixels.
    pub a: Vec2,
    /// Second endpoint in viewport pixels.
    pub b: Vec2,
    /// Line opacity.
    pub opacity: f32,
}

/// The particle pool plus its viewport bounds and tuning.
pub struct ParticleField {
    /// The fixed pool. Never grows or shrinks after construction.
    pub particles: Vec<Particle>,
    width: f32,
    height: f32,
    tuning: ParticleTuning,
}

/// Pool size for a viewport: one particle per 10 px of width, capped by the
/// device-class ceiling (or the reduced-motion ceiling).
pub fn pool_size(width: f32, class_cap: u32, reduced: bool, reduced_cap: u32) -> usize {
    let cap = if reduced { reduced_cap } else { class_cap };
    ((width / 10.0) as usize).min(cap as usize)
}

impl ParticleField {
    /// Allocate and scatter a pool of `count` particles.
    pub fn new(
        width: f32,
        height: f32,
        count: usize,
        tuning: ParticleTuning,
        rng: &mut SkyRng,
    ) -> Self {
        let particles = (0..count)
            .map(|_| {
                let opacity_span = tuning.twinkle_max - tuning.twinkle_min;
                Particle {
                    position: Vec2::new(
                        rng.random::<f32>() * width,
                        rng.random::<f32>() * height,
                    ),
                    velocity: Vec2::new(
                        (rng.random::<f32>() - 0.5) * 2.0 * DRIFT_SPEED,
                        (rng.random::<f32>() - 0.5) * 2.0 * DRIFT_SPEED,
                    ),
                    radius: RADIUS_MIN + rng.random::<f32>() * RADIUS_EXTRA,
                    opacity: tuning.twinkle_min + rng.random::<f32>() * opacity_span,
                    twinkle_dir: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
                    accent: rng.random_bool(ACCENT_RATIO),
                }
            })
            .collect();

        Self {
            particles,
            width,
            height,
            tuning,
        }
    }

    /// Viewport width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Viewport height in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Adopt a new viewport size. Particles outside the new bounds wrap on
    /// their next update.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    /// Advance every particle by `dt` seconds. `pointer` is the cursor in
    /// viewport pixels, if known; nearby particles are pushed away with a
    /// force that grows as the cursor gets closer.
    pub fn update(&mut self, dt: f32, pointer: Option<Vec2>) {
        let t = &self.tuning;
        for p in &mut self.particles {
            p.position += p.velocity * dt;

            // Twinkle within the band; flip direction at the edges and clamp
            // so the invariant holds exactly.
            p.opacity += p.twinkle_dir * t.twinkle_rate * dt;
            if p.opacity >= t.twinkle_max {
                p.opacity = t.twinkle_max;
                p.twinkle_dir = -1.0;
            } else if p.opacity <= t.twinkle_min {
                p.opacity = t.twinkle_min;
                p.twinkle_dir = 1.0;
            }

            if let Some(cursor) = pointer {
                let offset = p.position - cursor;
                let dist = offset.length();
                if dist > f32::EPSILON && dist < t.repulsion_radius {
                    let falloff = 1.0 - dist / t.repulsion_radius;
                    p.position += offset / dist * t.repulsion_strength * falloff * dt;
                }
            }

            // Toroidal wrap keeps positions in [0, w) × [0, h).
            // rem_euclid of a tiny negative can round up to the modulus.
            p.position.x = p.position.x.rem_euclid(self.width);
            p.position.y = p.position.y.rem_euclid(self.height);
            if p.position.x >= self.width {
                p.position.x = 0.0;
            }
            if p.position.y >= self.height {
                p.position.y = 0.0;
            }
        }
    }

    /// Compute connective lines for every unordered pair within the distance
    /// threshold, visiting each pair exactly once. Callers skip this pass
    /// entirely under reduced motion.
    pub fn link_lines(&self) -> Vec<LinkLine> {
        let t = &self.tuning;
        let mut lines = Vec::new();
        for i in 0..self.particles.len() {
            for j in (i + 1)..self.particles.len() {
                let a = self.particles[i].position;
                let b = self.particles[j].position;
                let d2 = a.distance_squared(b);
                if d2 < t.link_distance_sq {
                    lines.push(LinkLine {
                        a,
                        b,
                        opacity: (1.0 - d2 / t.link_distance_sq) * t.link_opacity,
                    });
                }
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::rng_from_seed;

    const DT: f32 = 1.0 / 60.0;

    fn field(seed: u64, count: usize) -> ParticleField {
        let (mut rng, _) = rng_from_seed(Some(seed));
        ParticleField::new(800.0, 600.0, count, ParticleTuning::default(), &mut rng)
    }

    #[test]
    fn test_pool_size_scales_with_width_and_caps() {
        assert_eq!(pool_size(400.0, 120, false, 40), 40);
        assert_eq!(pool_size(4000.0, 120, false, 40), 120);
        assert_eq!(pool_size(4000.0, 120, true, 40), 40);
        assert_eq!(pool_size(100.0, 120, false, 40), 10);
    }

    #[test]
    fn test_pool_is_fixed_size() {
        let mut f = field(42, 50);
        assert_eq!(f.particles.len(), 50);
        for _ in 0..500 {
            f.update(DT, None);
        }
        assert_eq!(f.particles.len(), 50);
    }

    #[test]
    fn test_opacity_and_position_invariants_hold() {
        let mut f = field(42, 64);
        for step in 0..10_000 {
            f.update(DT, Some(Vec2::new(400.0, 300.0)));
            for (i, p) in f.particles.iter().enumerate() {
                assert!(
                    (0.2..=0.7).contains(&p.opacity),
                    "step {step}: particle {i} opacity {} out of band",
                    p.opacity
                );
                assert!(
                    (0.0..800.0).contains(&p.position.x),
                    "step {step}: particle {i} x {} out of bounds",
                    p.position.x
                );
                assert!(
                    (0.0..600.0).contains(&p.position.y),
                    "step {step}: particle {i} y {} out of bounds",
                    p.position.y
                );
            }
        }
    }

    #[test]
    fn test_wrap_is_toroidal_not_bounce() {
        let mut f = field(1, 1);
        f.particles[0].position = Vec2::new(799.9, 300.0);
        f.particles[0].velocity = Vec2::new(60.0, 0.0);
        f.update(1.0, None);
        let p = &f.particles[0];
        // Crossed the right edge and reappeared near the left, still moving right.
        assert!(p.position.x < 100.0, "did not wrap: x = {}", p.position.x);
        assert!(p.velocity.x > 0.0, "velocity flipped, which means a bounce");
    }

    #[test]
    fn test_colocated_opposite_twinkle_particles_independent() {
        let mut f = field(2, 2);
        let start = Vec2::new(100.0, 100.0);
        for p in &mut f.particles {
            p.position = start;
            p.velocity = Vec2::ZERO;
            p.opacity = 0.45;
        }
        f.particles[0].twinkle_dir = 1.0;
        f.particles[1].twinkle_dir = -1.0;

        f.update(DT, None);

        let a = f.particles[0].opacity;
        let b = f.particles[1].opacity;
        assert!(a > 0.45, "brightening particle dimmed");
        assert!(b < 0.45, "dimming particle brightened");
        assert!((a - 0.45) + (b - 0.45) < 1e-6, "no shared twinkle state");
    }

    #[test]
    fn test_repulsion_pushes_away_and_closer_is_stronger() {
        let mut f = field(3, 2);
        let cursor = Vec2::new(400.0, 300.0);
        for p in &mut f.particles {
            p.velocity = Vec2::ZERO;
        }
        f.particles[0].position = cursor + Vec2::new(10.0, 0.0);
        f.particles[1].position = cursor + Vec2::new(80.0, 0.0);

        f.update(DT, Some(cursor));

        let near_push = f.particles[0].position.x - (cursor.x + 10.0);
        let far_push = f.particles[1].position.x - (cursor.x + 80.0);
        assert!(near_push > 0.0, "near particle not pushed away");
        assert!(far_push > 0.0, "far particle not pushed away");
        assert!(
            near_push > far_push,
            "closer particle should move more: {near_push} vs {far_push}"
        );
    }

    #[test]
    fn test_particle_outside_repulsion_radius_unaffected() {
        let mut f = field(4, 1);
        let cursor = Vec2::new(400.0, 300.0);
        f.particles[0].position = cursor + Vec2::new(150.0, 0.0);
        f.particles[0].velocity = Vec2::ZERO;
        f.update(DT, Some(cursor));
        assert_eq!(f.particles[0].position, cursor + Vec2::new(150.0, 0.0));
    }

    #[test]
    fn test_link_lines_visit_each_pair_once() {
        let mut f = field(5, 3);
        // Cluster all three within the threshold.
        f.particles[0].position = Vec2::new(100.0, 100.0);
        f.particles[1].position = Vec2::new(110.0, 100.0);
        f.particles[2].position = Vec2::new(100.0, 110.0);
        let lines = f.link_lines();
        assert_eq!(lines.len(), 3, "3 particles form exactly 3 unordered pairs");
    }

    #[test]
    fn test_link_opacity_falls_with_distance() {
        let mut f = field(6, 3);
        f.particles[0].position = Vec2::new(100.0, 100.0);
        f.particles[1].position = Vec2::new(105.0, 100.0);
        f.particles[2].position = Vec2::new(185.0, 100.0); // ~85 px from first
        let lines = f.link_lines();
        let close = lines
            .iter()
            .find(|l| (l.a.x - 100.0).abs() < 1.0 && (l.b.x - 105.0).abs() < 1.0)
            .unwrap();
        for line in &lines {
            assert!(line.opacity <= close.opacity + 1e-6);
            assert!(line.opacity > 0.0);
        }
    }

    #[test]
    fn test_distant_particles_produce_no_lines() {
        let mut f = field(7, 2);
        f.particles[0].position = Vec2::new(0.0, 0.0);
        f.particles[1].position = Vec2::new(500.0, 500.0);
        assert!(f.link_lines().is_empty());
    }

    #[test]
    fn test_resize_rewraps_on_next_update() {
        let mut f = field(8, 1);
        f.particles[0].position = Vec2::new(700.0, 500.0);
        f.particles[0].velocity = Vec2::ZERO;
        f.resize(400.0, 300.0);
        f.update(DT, None);
        let p = &f.particles[0];
        assert!(p.position.x < 400.0);
        assert!(p.position.y < 300.0);
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = field(9, 32);
        let b = field(9, 32);
        for (pa, pb) in a.particles.iter().zip(b.particles.iter()) {
            assert_eq!(pa.position, pb.position);
            assert_eq!(pa.velocity, pb.velocity);
            assert_eq!(pa.accent, pb.accent);
        }
    }
}
