//! Surface dimension tracking that normalizes platform resize behavior.
//!
//! Transient zero-size resizes (common during layout passes and on Wayland)
//! are skipped entirely: the prior valid size is retained until a nonzero
//! resize arrives.

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

/// Event produced when the surface dimensions or scale factor change.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceResizeEvent {
    /// New physical pixel dimensions.
    pub physical: PhysicalSize,
    /// New logical width (physical / scale_factor).
    pub logical_width: f64,
    /// New logical height (physical / scale_factor).
    pub logical_height: f64,
    /// Current scale factor.
    pub scale_factor: f64,
}

/// Tracks surface dimensions in physical and logical pixels.
///
/// Zero-size resize reports are dropped: the backdrop keeps its prior valid
/// size until the host reports a real one.
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    logical_width: f64,
    logical_height: f64,
    scale_factor: f64,
}

impl SurfaceWrapper {
    /// Creates a new `SurfaceWrapper` from initial physical dimensions and
    /// scale factor. Initial zero dimensions are clamped to 1 so the surface
    /// can always be configured.
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        let width = physical_width.max(1);
        let height = physical_height.max(1);

        Self {
            physical_width: width,
            physical_height: height,
            logical_width: width as f64 / scale_factor,
            logical_height: height as f64 / scale_factor,
            scale_factor,
        }
    }

    /// Handle a window resize event. Returns a resize event if the surface
    /// dimensions actually changed.
    ///
    /// A zero width or height is a transient layout artifact: the resize is
    /// skipped and the prior valid size kept.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        if physical_width == 0 || physical_height == 0 {
            log::debug!("Skipping zero-size resize ({physical_width}x{physical_height})");
            return None;
        }

        if physical_width == self.physical_width && physical_height == self.physical_height {
            return None;
        }

        self.physical_width = physical_width;
        self.physical_height = physical_height;
        self.logical_width = physical_width as f64 / self.scale_factor;
        self.logical_height = physical_height as f64 / self.scale_factor;

        Some(SurfaceResizeEvent {
            physical: PhysicalSize {
                width: physical_width,
                height: physical_height,
            },
            logical_width: self.logical_width,
            logical_height: self.logical_height,
            scale_factor: self.scale_factor,
        })
    }

    /// Handle a scale factor change. Returns a resize event because the
    /// physical dimensions change even if the logical size stays the same.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = new_scale_factor;
        self.handle_resize(new_physical_width, new_physical_height)
    }

    /// Get the current physical pixel dimensions for surface configuration.
    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: self.physical_width,
            height: self.physical_height,
        }
    }

    /// Get the current physical width in pixels.
    pub fn physical_width(&self) -> u32 {
        self.physical_width
    }

    /// Get the current physical height in pixels.
    pub fn physical_height(&self) -> u32 {
        self.physical_height
    }

    /// Get the current logical width (physical / scale_factor).
    pub fn logical_width(&self) -> f64 {
        self.logical_width
    }

    /// Get the current logical height (physical / scale_factor).
    pub fn logical_height(&self) -> f64 {
        self.logical_height
    }

    /// Get the current scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_physical_pixels() {
        let wrapper = SurfaceWrapper::new(2880, 1800, 2.0);
        let size = wrapper.physical_size();
        assert_eq!(size.width, 2880);
        assert_eq!(size.height, 1800);
        assert!((wrapper.logical_width() - 1440.0).abs() < 0.1);
        assert!((wrapper.logical_height() - 900.0).abs() < 0.1);
    }

    #[test]
    fn test_zero_size_resize_is_skipped() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);

        let event = wrapper.handle_resize(0, 0);
        assert!(event.is_none());
        // Prior valid size retained.
        assert_eq!(
            wrapper.physical_size(),
            PhysicalSize {
                width: 800,
                height: 600
            }
        );

        let event = wrapper.handle_resize(0, 600);
        assert!(event.is_none());
        assert_eq!(wrapper.physical_width(), 800);
    }

    #[test]
    fn test_subsequent_nonzero_resize_applies() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        assert!(wrapper.handle_resize(0, 0).is_none());

        let event = wrapper.handle_resize(1920, 1080);
        assert!(event.is_some());
        let event = event.unwrap();
        assert_eq!(event.physical.width, 1920);
        assert_eq!(event.physical.height, 1080);
    }

    #[test]
    fn test_no_event_on_same_dimensions() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0);
        let event = wrapper.handle_resize(1920, 1080);
        assert!(event.is_none());
    }

    #[test]
    fn test_resize_event_carries_logical_size() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 2.0);
        let event = wrapper.handle_resize(3840, 2160);
        assert!(event.is_some());
        let event = event.unwrap();
        assert!((event.logical_width - 1920.0).abs() < 0.1);
        assert!((event.logical_height - 1080.0).abs() < 0.1);
        assert_eq!(event.scale_factor, 2.0);
    }

    #[test]
    fn test_scale_factor_change_updates_physical_size() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0);
        let event = wrapper.handle_scale_factor_changed(2.0, 3840, 2160);
        assert!(event.is_some());
        assert_eq!(wrapper.scale_factor(), 2.0);
        assert_eq!(wrapper.physical_width(), 3840);
    }

    #[test]
    fn test_initial_zero_size_clamped_for_configuration() {
        let wrapper = SurfaceWrapper::new(0, 0, 1.0);
        let size = wrapper.physical_size();
        assert!(size.width >= 1);
        assert!(size.height >= 1);
    }
}
