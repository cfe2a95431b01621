//! Device-tilt parallax source.
//!
//! Compact devices drive parallax from orientation (beta/gamma) rather than
//! the pointer. The capability is probed once at startup; platforms without a
//! permission-free orientation API simply report no source and the pointer
//! path is used instead.

use glam::Vec2;

/// Tilt angle in degrees at which the parallax vector saturates.
const FULL_DEFLECTION_DEG: f32 = 30.0;

/// A single orientation reading in degrees.
///
/// `beta` is front-to-back tilt, `gamma` left-to-right, matching the common
/// device-orientation convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltReading {
    /// Front-to-back tilt in degrees.
    pub beta: f32,
    /// Left-to-right tilt in degrees.
    pub gamma: f32,
}

impl TiltReading {
    /// Map the reading into the normalized parallax square `[-1, 1]²`.
    ///
    /// Saturates at ±[`FULL_DEFLECTION_DEG`] so a device held at a steep
    /// angle does not push the camera past its pointer-driven range.
    #[must_use]
    pub fn to_parallax_vector(self) -> Vec2 {
        Vec2::new(
            (self.gamma / FULL_DEFLECTION_DEG).clamp(-1.0, 1.0),
            (self.beta / FULL_DEFLECTION_DEG).clamp(-1.0, 1.0),
        )
    }
}

/// A source of orientation readings.
///
/// Implementations poll whatever platform sensor is available. `None` from
/// [`poll`](Self::poll) means no fresh reading this frame; the scene keeps
/// easing toward the previous target.
pub trait TiltSource {
    /// Poll the latest orientation reading, if one is available.
    fn poll(&mut self) -> Option<TiltReading>;
}

/// Probe for a tilt source on this platform.
///
/// No current desktop target exposes a permission-free orientation API, so
/// this returns `None` everywhere today; the trait marks the seam for a
/// future compact-device target. Absence is absorbed silently; the pointer
/// parallax path is unaffected.
#[must_use]
pub fn detect() -> Option<Box<dyn TiltSource>> {
    tracing::debug!("no tilt source on this platform; using pointer parallax");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_device_maps_to_origin() {
        let reading = TiltReading {
            beta: 0.0,
            gamma: 0.0,
        };
        assert_eq!(reading.to_parallax_vector(), Vec2::ZERO);
    }

    #[test]
    fn test_partial_tilt_maps_proportionally() {
        let reading = TiltReading {
            beta: 15.0,
            gamma: -15.0,
        };
        let v = reading.to_parallax_vector();
        assert!((v.x - -0.5).abs() < 1e-6);
        assert!((v.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_steep_tilt_saturates() {
        let reading = TiltReading {
            beta: 90.0,
            gamma: -170.0,
        };
        let v = reading.to_parallax_vector();
        assert_eq!(v.x, -1.0);
        assert_eq!(v.y, 1.0);
    }

    #[test]
    fn test_detect_absent_on_desktop() {
        assert!(detect().is_none());
    }
}
