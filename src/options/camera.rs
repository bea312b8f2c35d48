use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and initial placement.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Initial eye position.
    #[schemars(skip)]
    pub position: [f32; 3],
    /// Initial orbit target.
    #[schemars(skip)]
    pub target: [f32; 3],
    /// World up direction; also the orbit axis.
    #[schemars(skip)]
    pub up: [f32; 3],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 50.0,
            znear: 0.1,
            zfar: 2000.0,
            position: [0.0, 0.0, 1.0],
            target: [0.0; 3],
            up: [0.0, 1.0, 0.0],
        }
    }
}

impl CameraOptions {
    /// Perspective camera placed and oriented as configured.
    #[must_use]
    pub fn build_camera(&self, aspect: f32) -> Camera {
        let mut camera = Camera::perspective(self.fovy, aspect, self.znear, self.zfar);
        camera.up = Vec3::from(self.up).normalize_or(Vec3::Y);
        camera.position = Vec3::from(self.position);
        camera.look_at(self.target());
        camera
    }

    /// Initial orbit target.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        Vec3::from(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_camera_looks_at_target() {
        let opts = CameraOptions {
            position: [0.0, -50.0, 0.0],
            up: [0.0, 0.0, 1.0],
            ..Default::default()
        };
        let camera = opts.build_camera(1.5);
        assert!((camera.forward() - Vec3::Y).length() < 1e-5);
        assert_eq!(camera.up, Vec3::Z);
    }

    #[test]
    fn zero_up_falls_back_to_y() {
        let opts = CameraOptions {
            up: [0.0; 3],
            ..Default::default()
        };
        assert_eq!(opts.build_camera(1.0).up, Vec3::Y);
    }
}
