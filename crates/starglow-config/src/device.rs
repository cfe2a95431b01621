//! Device-class adaptation: viewport width selects a density/pacing tier.

use crate::config::{ClassTuning, SkyConfig};

/// Device class resolved from the viewport logical width at scene
/// construction. Not re-evaluated on resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Narrow viewport (phones, split panes): lower density, wider gaps.
    Compact,
    /// Everything else.
    Wide,
}

impl DeviceClass {
    /// Classify a viewport by its logical width against the breakpoint.
    pub fn classify(logical_width: f32, breakpoint: f32) -> Self {
        if logical_width < breakpoint {
            DeviceClass::Compact
        } else {
            DeviceClass::Wide
        }
    }
}

impl SkyConfig {
    /// The tuning set for the given device class.
    pub fn tuning(&self, class: DeviceClass) -> &ClassTuning {
        match class {
            DeviceClass::Compact => &self.compact,
            DeviceClass::Wide => &self.wide,
        }
    }

    /// Classify a viewport width using this config's breakpoint.
    pub fn classify(&self, logical_width: f32) -> DeviceClass {
        DeviceClass::classify(logical_width, self.breakpoint_width)
    }

    /// Clamp a device pixel ratio to the configured ceiling. Bounds fill-rate
    /// cost on high-DPI displays.
    pub fn clamp_pixel_ratio(&self, pixel_ratio: f64) -> f64 {
        pixel_ratio.min(self.max_pixel_ratio)
    }

    /// Star point size for a class, scaled by the clamped pixel ratio.
    pub fn scaled_star_size(&self, class: DeviceClass, pixel_ratio: f64) -> f32 {
        self.tuning(class).star_size * self.clamp_pixel_ratio(pixel_ratio) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_against_breakpoint() {
        assert_eq!(
            DeviceClass::classify(400.0, 768.0),
            DeviceClass::Compact
        );
        assert_eq!(DeviceClass::classify(767.9, 768.0), DeviceClass::Compact);
        assert_eq!(DeviceClass::classify(768.0, 768.0), DeviceClass::Wide);
        assert_eq!(DeviceClass::classify(1920.0, 768.0), DeviceClass::Wide);
    }

    #[test]
    fn test_compact_viewport_selects_compact_constants() {
        let sky = SkyConfig::default();
        let class = sky.classify(400.0);
        assert_eq!(class, DeviceClass::Compact);
        assert_eq!(sky.tuning(class).star_count, 800);
        assert_eq!(sky.tuning(class).meteor_cap, 1);
    }

    #[test]
    fn test_wide_viewport_selects_wide_constants() {
        let sky = SkyConfig::default();
        let class = sky.classify(1280.0);
        assert_eq!(class, DeviceClass::Wide);
        assert_eq!(sky.tuning(class).star_count, 1600);
        assert_eq!(sky.tuning(class).meteor_cap, 2);
    }

    #[test]
    fn test_pixel_ratio_clamped_to_ceiling() {
        let sky = SkyConfig::default();
        assert_eq!(sky.clamp_pixel_ratio(1.0), 1.0);
        assert_eq!(sky.clamp_pixel_ratio(2.0), 2.0);
        assert_eq!(sky.clamp_pixel_ratio(3.0), 2.0);
    }

    #[test]
    fn test_scaled_star_size_uses_clamped_ratio() {
        let sky = SkyConfig::default();
        let size = sky.scaled_star_size(DeviceClass::Compact, 3.0);
        // Compact base 0.020, DPR 3.0 clamped to 2.0.
        assert!((size - 0.040).abs() < 1e-6);
    }
}
