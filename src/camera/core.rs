use std::fmt;

use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

use crate::picking::Ray;

/// How the camera maps view space to clip space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Pinhole perspective projection.
    Perspective {
        /// Vertical field of view in degrees.
        fovy: f32,
        /// Viewport aspect ratio (width / height).
        aspect: f32,
        /// Near clipping plane distance.
        znear: f32,
        /// Far clipping plane distance.
        zfar: f32,
    },
    /// Parallel projection over a fixed view volume.
    Orthographic {
        /// Left edge of the view volume.
        left: f32,
        /// Right edge of the view volume.
        right: f32,
        /// Top edge of the view volume.
        top: f32,
        /// Bottom edge of the view volume.
        bottom: f32,
        /// Near clipping plane distance.
        znear: f32,
        /// Far clipping plane distance.
        zfar: f32,
    },
    /// Caller-supplied projection matrix. Orbit controls cannot derive pan or
    /// dolly distances for it.
    Custom(Mat4),
}

/// Pan or dolly was requested on a camera whose projection is neither
/// perspective nor orthographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedCamera;

impl fmt::Display for UnsupportedCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported camera projection")
    }
}

impl std::error::Error for UnsupportedCamera {}

/// A camera placed in world space.
///
/// The camera looks down its local -Z axis; `rotation` maps local axes to
/// world axes. `up` is the world-space up hint used by [`Camera::look_at`]
/// and as the orbit axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Local-to-world rotation.
    pub rotation: Quat,
    /// World-space up hint.
    pub up: Vec3,
    /// Zoom factor. Narrows the field of view for perspective cameras and
    /// shrinks the view volume for orthographic ones.
    pub zoom: f32,
    /// Projection model.
    pub projection: Projection,
}

impl Camera {
    /// Perspective camera at the origin looking down -Z.
    #[must_use]
    pub fn perspective(fovy: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self::with_projection(Projection::Perspective {
            fovy,
            aspect,
            znear,
            zfar,
        })
    }

    /// Orthographic camera at the origin looking down -Z.
    #[must_use]
    pub fn orthographic(
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        znear: f32,
        zfar: f32,
    ) -> Self {
        Self::with_projection(Projection::Orthographic {
            left,
            right,
            top,
            bottom,
            znear,
            zfar,
        })
    }

    /// Camera at the origin with an arbitrary projection.
    #[must_use]
    pub fn with_projection(projection: Projection) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            up: Vec3::Y,
            zoom: 1.0,
            projection,
        }
    }

    /// Rotate the camera so its -Z axis points at `target`, keeping `up`
    /// as close to vertical as possible.
    pub fn look_at(&mut self, target: Vec3) {
        let mut z = self.position - target;
        if z.length_squared() == 0.0 {
            z.z = 1.0;
        }
        z = z.normalize();

        let mut x = self.up.cross(z);
        if x.length_squared() == 0.0 {
            // up and view direction are parallel
            if self.up.z.abs() == 1.0 {
                z.x += 0.0001;
            } else {
                z.z += 0.0001;
            }
            z = z.normalize();
            x = self.up.cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);

        self.rotation = Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize();
    }

    /// Camera-space +X in world space.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Camera-space +Y in world space.
    #[must_use]
    pub fn local_up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Viewing direction in world space.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Update the aspect ratio of a perspective camera. Other projections are
    /// left untouched.
    pub fn set_aspect(&mut self, new_aspect: f32) {
        if let Projection::Perspective { aspect, .. } = &mut self.projection {
            *aspect = new_aspect;
        }
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// View-to-clip matrix with `[0, 1]` depth (wgpu convention).
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective {
                fovy,
                aspect,
                znear,
                zfar,
            } => {
                let half = (fovy.to_radians() * 0.5).tan() / self.zoom;
                Mat4::perspective_rh(2.0 * half.atan(), aspect, znear, zfar)
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                znear,
                zfar,
            } => {
                let dx = (right - left) / (2.0 * self.zoom);
                let dy = (top - bottom) / (2.0 * self.zoom);
                let cx = (right + left) * 0.5;
                let cy = (top + bottom) * 0.5;
                Mat4::orthographic_rh(
                    cx - dx,
                    cx + dx,
                    cy - dy,
                    cy + dy,
                    znear,
                    zfar,
                )
            }
            Projection::Custom(matrix) => matrix,
        }
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point on the viewport, given in pixels from
    /// the top-left corner.
    #[must_use]
    pub fn screen_to_ray(&self, x: f32, y: f32, width: f32, height: f32) -> Ray {
        let ndc_x = (x / width.max(1.0)) * 2.0 - 1.0;
        let ndc_y = 1.0 - (y / height.max(1.0)) * 2.0;

        let inv_view_proj = self.build_matrix().inverse();
        let near = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let origin = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Ray::new(origin, far - origin)
    }
}

/// GPU uniform holding the view-projection matrix and eye data.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad0: f32,
    /// Camera forward direction for headlight shading.
    pub forward: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad1: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Identity view-projection looking down -Z.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            _pad0: 0.0,
            forward: [0.0, 0.0, -1.0],
            _pad1: 0.0,
        }
    }

    /// Refresh from the camera's current pose and projection.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.position.to_array();
        self.forward = camera.forward().to_array();
    }
}
