//! Nebula fog: a baked soft-gradient texture shared by a small set of
//! slowly rotating billboard planes.
//!
//! The texture is generated once on the CPU, a violet radial gradient with
//! low-amplitude Simplex mottling so the fog reads as cloud rather than a
//! perfect disc, then uploaded and reused by every plane. Per-plane opacity
//! is constant; only rotation animates.

use glam::Vec3;
use noise::{NoiseFn, Simplex};
use rand::Rng;

use crate::rng::SkyRng;

/// Gradient color at the core (linear-ish RGB, alpha).
const CORE_RGBA: [f32; 4] = [0.235, 0.157, 0.47, 0.2];
/// Gradient color at the midpoint.
const MID_RGBA: [f32; 4] = [0.157, 0.078, 0.314, 0.05];
/// Noise frequency across the texture.
const WISP_FREQUENCY: f64 = 3.0;
/// Mottling strength: alpha varies by ±this fraction.
const WISP_AMPLITUDE: f32 = 0.2;
/// Plane edge length in world units.
const PLANE_SCALE: f32 = 12.0;
/// Horizontal/vertical placement spread.
const PLACEMENT_SPREAD: f32 = 15.0;
/// Nearest plane depth.
const BASE_DEPTH: f32 = -8.0;
/// Random extra plane depth.
const EXTRA_DEPTH: f32 = 5.0;

/// A CPU-baked RGBA8 gradient texture.
pub struct NebulaTexture {
    /// Edge length in pixels (square).
    pub size: u32,
    /// RGBA8 pixel data, `size * size * 4` bytes.
    pub pixels: Vec<u8>,
}

impl NebulaTexture {
    /// Bake the shared nebula gradient. Deterministic for a given seed.
    pub fn bake(size: u32, seed: u64) -> Self {
        let noise = Simplex::new(seed as u32);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let u = (x as f32 + 0.5) / size as f32;
                let v = (y as f32 + 0.5) / size as f32;
                // Distance from center, 1.0 at the inscribed-circle edge.
                let d = ((u - 0.5).powi(2) + (v - 0.5).powi(2)).sqrt() * 2.0;

                let [r, g, b, mut a] = sample_gradient(d);

                // Wisp mottling: break up the perfect radial falloff.
                let n = noise.get([f64::from(u) * WISP_FREQUENCY, f64::from(v) * WISP_FREQUENCY])
                    as f32;
                a *= 1.0 - WISP_AMPLITUDE + WISP_AMPLITUDE * (n * 0.5 + 0.5) * 2.0;

                pixels.push((r.clamp(0.0, 1.0) * 255.0) as u8);
                pixels.push((g.clamp(0.0, 1.0) * 255.0) as u8);
                pixels.push((b.clamp(0.0, 1.0) * 255.0) as u8);
                pixels.push((a.clamp(0.0, 1.0) * 255.0) as u8);
            }
        }

        Self { size, pixels }
    }

    /// Alpha of the pixel nearest the given UV, in [0, 1].
    pub fn alpha_at(&self, u: f32, v: f32) -> f32 {
        let x = ((u * self.size as f32) as u32).min(self.size - 1);
        let y = ((v * self.size as f32) as u32).min(self.size - 1);
        let idx = ((y * self.size + x) * 4 + 3) as usize;
        f32::from(self.pixels[idx]) / 255.0
    }
}

/// Piecewise-linear radial gradient: core → mid → transparent edge.
fn sample_gradient(d: f32) -> [f32; 4] {
    if d >= 1.0 {
        return [0.0, 0.0, 0.0, 0.0];
    }
    let (from, to, t) = if d < 0.5 {
        (CORE_RGBA, MID_RGBA, d / 0.5)
    } else {
        (MID_RGBA, [0.0, 0.0, 0.0, 0.0], (d - 0.5) / 0.5)
    };
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
        from[3] + (to[3] - from[3]) * t,
    ]
}

/// One nebula billboard plane.
#[derive(Clone, Debug)]
pub struct NebulaPlane {
    /// World-space center.
    pub position: Vec3,
    /// In-plane rotation in radians.
    pub rotation: f32,
    /// Rotation speed in radians per second.
    pub spin: f32,
    /// Plane edge length in world units.
    pub scale: f32,
    /// Constant opacity.
    pub opacity: f32,
}

/// The full set of nebula planes.
pub struct NebulaBank {
    planes: Vec<NebulaPlane>,
}

impl NebulaBank {
    /// Generate `count` planes. Plane `i` spins at `base_spin × (i + 1)` so
    /// the layers drift apart instead of rotating in lockstep.
    pub fn generate(count: u32, base_spin: f32, opacity: f32, rng: &mut SkyRng) -> Self {
        let planes = (0..count)
            .map(|i| NebulaPlane {
                position: Vec3::new(
                    (rng.random::<f32>() - 0.5) * PLACEMENT_SPREAD,
                    (rng.random::<f32>() - 0.5) * PLACEMENT_SPREAD,
                    BASE_DEPTH - rng.random::<f32>() * EXTRA_DEPTH,
                ),
                rotation: rng.random::<f32>() * std::f32::consts::PI,
                spin: base_spin * (i + 1) as f32,
                scale: PLANE_SCALE,
                opacity,
            })
            .collect();
        Self { planes }
    }

    /// Advance plane rotations by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        for plane in &mut self.planes {
            plane.rotation += plane.spin * dt;
        }
    }

    /// The planes.
    pub fn planes(&self) -> &[NebulaPlane] {
        &self.planes
    }

    /// Number of planes.
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    /// Whether the bank is empty.
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::rng_from_seed;

    #[test]
    fn test_texture_dimensions() {
        let tex = NebulaTexture::bake(64, 42);
        assert_eq!(tex.size, 64);
        assert_eq!(tex.pixels.len(), 64 * 64 * 4);
    }

    #[test]
    fn test_gradient_fades_outward() {
        let tex = NebulaTexture::bake(128, 42);
        let center = tex.alpha_at(0.5, 0.5);
        let mid = tex.alpha_at(0.75, 0.5);
        let edge = tex.alpha_at(0.999, 0.5);
        assert!(center > mid, "center {center} not brighter than mid {mid}");
        assert!(mid > edge, "mid {mid} not brighter than edge {edge}");
        assert!(edge < 0.02, "edge should be transparent, got {edge}");
    }

    #[test]
    fn test_texture_is_soft() {
        // Peak alpha stays low so the fog never occludes the stars.
        let tex = NebulaTexture::bake(128, 42);
        let mut max_a = 0u8;
        for px in tex.pixels.chunks(4) {
            max_a = max_a.max(px[3]);
        }
        assert!(max_a <= 80, "nebula too opaque: max alpha {max_a}/255");
    }

    #[test]
    fn test_bake_deterministic() {
        let a = NebulaTexture::bake(64, 7);
        let b = NebulaTexture::bake(64, 7);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_bake_varies_by_seed() {
        let a = NebulaTexture::bake(64, 1);
        let b = NebulaTexture::bake(64, 2);
        assert_ne!(a.pixels, b.pixels);
    }

    #[test]
    fn test_bank_generation() {
        let (mut rng, _) = rng_from_seed(Some(42));
        let bank = NebulaBank::generate(4, 0.018, 0.05, &mut rng);
        assert_eq!(bank.len(), 4);
        for (i, plane) in bank.planes().iter().enumerate() {
            assert!(plane.position.z <= BASE_DEPTH);
            assert!((plane.spin - 0.018 * (i + 1) as f32).abs() < 1e-6);
            assert_eq!(plane.opacity, 0.05);
        }
    }

    #[test]
    fn test_advance_rotates_only() {
        let (mut rng, _) = rng_from_seed(Some(42));
        let mut bank = NebulaBank::generate(4, 0.018, 0.05, &mut rng);
        let positions: Vec<Vec3> = bank.planes().iter().map(|p| p.position).collect();
        let rotations: Vec<f32> = bank.planes().iter().map(|p| p.rotation).collect();

        bank.advance(2.0);

        for (i, plane) in bank.planes().iter().enumerate() {
            assert_eq!(plane.position, positions[i], "plane {i} moved");
            assert_eq!(plane.opacity, 0.05, "plane {i} opacity changed");
            let expected = rotations[i] + plane.spin * 2.0;
            assert!((plane.rotation - expected).abs() < 1e-5);
        }
    }
}
