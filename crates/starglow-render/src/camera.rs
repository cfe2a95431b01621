//! Look-at camera for view and projection matrix generation.
//!
//! The backdrop camera only ever eases its position and looks at a fixed
//! point behind the scene, so this is a position + target camera rather than
//! a free-flight one. No depth buffer is used; layers render back-to-front.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Uniform buffer layout for the camera view-projection matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// Combined view-projection matrix, column-major.
    pub view_proj: [[f32; 4]; 4],
}

/// A perspective camera defined by position and look-at target.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

impl Camera {
    /// Compute the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Compute the perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio from surface dimensions.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height.max(1.0);
    }

    /// Convert the camera to a uniform suitable for GPU upload.
    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::new(0.0, 0.0, -5.0),
            fov_y: 75_f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = Camera::default();
        let vp = camera.view_projection_matrix();
        let clip = vp * Vec4::new(camera.target.x, camera.target.y, camera.target.z, 1.0);
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        assert!(ndc_x.abs() < 1e-5, "target off-center in x: {ndc_x}");
        assert!(ndc_y.abs() < 1e-5, "target off-center in y: {ndc_y}");
    }

    #[test]
    fn test_set_aspect_ratio() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_aspect_ratio_guards_zero_height() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 0.0);
        assert!(camera.aspect_ratio.is_finite());
    }

    #[test]
    fn test_offset_camera_shifts_scene() {
        // Moving the camera right should push a centered world point left in NDC.
        let mut camera = Camera::default();
        let probe = Vec4::new(0.0, 0.0, -5.0, 1.0);

        camera.position = Vec3::new(0.3, 0.0, 5.0);
        camera.target = Vec3::new(0.0, 0.0, -5.0);
        let clip = camera.view_projection_matrix() * probe;
        let ndc_x = clip.x / clip.w;
        // The camera looks at the probe, so it stays centered...
        assert!(ndc_x.abs() < 1e-4);

        // ...but a point beside the target shifts with parallax.
        let side = Vec4::new(1.0, 0.0, -5.0, 1.0);
        let centered_cam = Camera::default();
        let ndc_center = {
            let c = centered_cam.view_projection_matrix() * side;
            c.x / c.w
        };
        let ndc_offset = {
            let c = camera.view_projection_matrix() * side;
            c.x / c.w
        };
        assert!(
            (ndc_offset - ndc_center).abs() > 1e-4,
            "camera offset produced no parallax shift"
        );
    }

    #[test]
    fn test_view_projection_combines_correctly() {
        let camera = Camera::default();
        let vp = camera.view_projection_matrix();
        let expected = camera.projection_matrix() * camera.view_matrix();
        for col in 0..4 {
            for row in 0..4 {
                assert!(
                    (vp.col(col)[row] - expected.col(col)[row]).abs() < 1e-6,
                    "mismatch at col={col}, row={row}"
                );
            }
        }
    }

    #[test]
    fn test_default_fov_is_75_degrees() {
        let camera = Camera::default();
        assert!((camera.fov_y - 75_f32.to_radians()).abs() < 1e-6);
    }
}
