//! Pointer/tilt-driven parallax camera rig.
//!
//! The camera position is always *eased* toward `target × scale` by a fixed
//! per-step factor (exponential smoothing, not a spring) so it follows
//! input asymptotically with no overshoot or oscillation, and looks at a
//! fixed point behind the scene.

use glam::{Vec2, Vec3};

/// Camera rest distance in front of the scene.
const CAMERA_DISTANCE: f32 = 5.0;
/// Depth of the fixed look-at target behind the scene.
const LOOK_DEPTH: f32 = -5.0;

/// Eased parallax state.
pub struct ParallaxRig {
    current: Vec2,
    target: Vec2,
    scale: f32,
    easing: f32,
}

impl ParallaxRig {
    /// Create a rig with the configured deflection scale and easing factor.
    pub fn new(scale: f32, easing: f32) -> Self {
        Self {
            current: Vec2::ZERO,
            target: Vec2::ZERO,
            scale,
            easing,
        }
    }

    /// Set the normalized input vector. Components are clamped to [-1, 1].
    pub fn set_target(&mut self, input: Vec2) {
        self.target = input.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    /// Blend one step toward `target × scale`.
    pub fn advance(&mut self) {
        self.current += (self.target * self.scale - self.current) * self.easing;
    }

    /// Current eased deflection.
    pub fn deflection(&self) -> Vec2 {
        self.current
    }

    /// Camera position for this deflection.
    pub fn camera_position(&self) -> Vec3 {
        Vec3::new(self.current.x, self.current.y, CAMERA_DISTANCE)
    }

    /// The fixed look-at target behind the scene.
    pub fn look_target(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, LOOK_DEPTH)
    }
}
