//! Spherical orbit state: accumulates rotation, pan and dolly input and
//! integrates it into a camera pose once per frame.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec2, Vec3};

use super::core::{Camera, Projection, UnsupportedCamera};
use super::spherical::Spherical;
use crate::options::{ControlOptions, OrbitLimits};

/// Squared displacement / rotation threshold for reporting a change.
const CHANGE_EPSILON: f32 = 0.000_001;

/// Client area of the element receiving input, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Viewport of the given size. Dimensions below one pixel are raised to
    /// one so pan and rotate scaling never divide by zero.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Width over height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Dolly direction. `In` moves towards the target (or zooms in).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DollyDirection {
    /// Towards the target.
    In,
    /// Away from the target.
    Out,
}

/// Snapshot restored by [`OrbitState::restore_state`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedState {
    /// Orbit target.
    pub target: Vec3,
    /// Camera position.
    pub position: Vec3,
    /// Camera zoom.
    pub zoom: f32,
}

/// Orbit of a camera around a target point.
///
/// Input handlers only record deltas; the camera is written exclusively by
/// [`OrbitState::apply_frame`].
#[derive(Debug, Clone)]
pub struct OrbitState {
    target: Vec3,
    spherical: Spherical,
    spherical_delta: Spherical,
    pan_offset: Vec3,
    scale: f32,
    zoom_changed: bool,
    last_position: Vec3,
    last_rotation: Quat,
    /// Rotates the camera's up vector onto +Y.
    up_space: Quat,
    up_space_inverse: Quat,
    saved: SavedState,
}

impl OrbitState {
    /// Orbit `camera` around `target`, using the camera's current `up` as the
    /// orbit axis. The current pose is saved as the reset state.
    #[must_use]
    pub fn new(camera: &Camera, target: Vec3) -> Self {
        let up_space = Quat::from_rotation_arc(camera.up.normalize(), Vec3::Y);
        Self {
            target,
            spherical: Spherical::default(),
            spherical_delta: Spherical::default(),
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            zoom_changed: false,
            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            up_space,
            up_space_inverse: up_space.inverse(),
            saved: SavedState {
                target,
                position: camera.position,
                zoom: camera.zoom,
            },
        }
    }

    /// Current orbit target.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Move the orbit target. Takes effect on the next frame.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Spherical coordinates computed by the last frame.
    #[must_use]
    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    /// Rotation not yet applied to the camera.
    #[must_use]
    pub fn spherical_delta(&self) -> Spherical {
        self.spherical_delta
    }

    /// Target translation not yet applied.
    #[must_use]
    pub fn pan_offset(&self) -> Vec3 {
        self.pan_offset
    }

    /// Pending radius multiplier.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The saved reset state.
    #[must_use]
    pub fn saved(&self) -> SavedState {
        self.saved
    }

    /// Queue an azimuth change. Positive angles orbit the camera to the
    /// left around the target.
    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    /// Queue a polar change. Positive angles raise the camera.
    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Convert a pixel drag into an angular delta. Both axes are scaled by
    /// the client height so a full-height drag is one revolution.
    pub fn record_rotation(
        &mut self,
        delta: Vec2,
        client_height: f32,
        rotate_speed: f32,
    ) {
        let delta = delta * rotate_speed;
        let height = client_height.max(1.0);
        self.rotate_left(TAU * delta.x / height);
        self.rotate_up(TAU * delta.y / height);
    }

    /// Convert a pixel drag (already scaled by pan speed) into a world-space
    /// target translation.
    pub fn record_pan(
        &mut self,
        delta: Vec2,
        camera: &Camera,
        viewport: Viewport,
        screen_space: bool,
    ) -> Result<(), UnsupportedCamera> {
        let (left, up) = match camera.projection {
            Projection::Perspective { fovy, .. } => {
                let distance = (camera.position - self.target).length()
                    * (fovy.to_radians() * 0.5).tan();
                (
                    2.0 * delta.x * distance / viewport.height,
                    2.0 * delta.y * distance / viewport.height,
                )
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                ..
            } => (
                delta.x * (right - left) / camera.zoom / viewport.width,
                delta.y * (top - bottom) / camera.zoom / viewport.height,
            ),
            Projection::Custom(_) => return Err(UnsupportedCamera),
        };

        let x_axis = camera.right();
        self.pan_offset += x_axis * -left;

        let up_axis = if screen_space {
            camera.local_up()
        } else {
            camera.up.cross(x_axis)
        };
        self.pan_offset += up_axis * up;
        Ok(())
    }

    /// Queue a dolly step of factor `dolly_scale` (`0.95^zoom_speed` for one
    /// wheel notch). Orthographic cameras zoom immediately.
    pub fn record_dolly(
        &mut self,
        direction: DollyDirection,
        dolly_scale: f32,
        camera: &mut Camera,
        limits: &OrbitLimits,
    ) -> Result<(), UnsupportedCamera> {
        match camera.projection {
            Projection::Perspective { .. } => match direction {
                DollyDirection::In => self.scale *= dolly_scale,
                DollyDirection::Out => self.scale /= dolly_scale,
            },
            Projection::Orthographic { .. } => {
                let zoom = match direction {
                    DollyDirection::In => camera.zoom / dolly_scale,
                    DollyDirection::Out => camera.zoom * dolly_scale,
                };
                camera.zoom = zoom.min(limits.max_zoom).max(limits.min_zoom);
                self.zoom_changed = true;
            }
            Projection::Custom(_) => return Err(UnsupportedCamera),
        }
        Ok(())
    }

    /// Integrate pending input into the camera pose.
    ///
    /// `idle` gates auto-rotation. `explicit` replaces the current
    /// `(theta, phi)` and discards pending rotation. Returns true when the
    /// camera moved, rotated or zoomed enough to be worth redrawing.
    pub fn apply_frame(
        &mut self,
        camera: &mut Camera,
        options: &ControlOptions,
        idle: bool,
        explicit: Option<(f32, f32)>,
    ) -> bool {
        let limits = &options.limits;

        let offset = self.up_space * (camera.position - self.target);
        self.spherical = Spherical::from_vec3(offset);

        if let Some((theta, phi)) = explicit {
            self.spherical.theta = theta;
            self.spherical.phi = phi;
            self.spherical_delta = Spherical::default();
        }

        if options.auto_rotate && idle {
            self.rotate_left(options.auto_rotation_angle());
        }

        if options.enable_damping {
            self.spherical.theta +=
                self.spherical_delta.theta * options.damping_factor;
            self.spherical.phi +=
                self.spherical_delta.phi * options.damping_factor;
        } else {
            self.spherical.theta += self.spherical_delta.theta;
            self.spherical.phi += self.spherical_delta.phi;
        }

        self.spherical.theta = clamp_azimuth(
            self.spherical.theta,
            limits.min_azimuth_angle,
            limits.max_azimuth_angle,
        );
        self.spherical.phi = self
            .spherical
            .phi
            .min(limits.max_polar_angle)
            .max(limits.min_polar_angle);
        self.spherical.make_safe();

        self.spherical.radius = (self.spherical.radius * self.scale)
            .min(limits.max_distance)
            .max(limits.min_distance);

        if options.enable_damping {
            self.target += self.pan_offset * options.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.position =
            self.target + self.up_space_inverse * self.spherical.to_vec3();
        camera.look_at(self.target);

        if options.enable_damping {
            let decay = 1.0 - options.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        let changed = self.zoom_changed
            || self.last_position.distance_squared(camera.position)
                > CHANGE_EPSILON
            || 8.0 * (1.0 - self.last_rotation.dot(camera.rotation))
                > CHANGE_EPSILON;
        if changed {
            self.last_position = camera.position;
            self.last_rotation = camera.rotation;
            self.zoom_changed = false;
        }
        changed
    }

    /// Remember the current target, position and zoom for
    /// [`OrbitState::restore_state`].
    pub fn save_state(&mut self, camera: &Camera) {
        self.saved = SavedState {
            target: self.target,
            position: camera.position,
            zoom: camera.zoom,
        };
    }

    /// Put target, position and zoom back to the saved values.
    pub fn restore_state(&mut self, camera: &mut Camera) {
        self.target = self.saved.target;
        camera.position = self.saved.position;
        camera.zoom = self.saved.zoom;
    }
}

/// Wrap any angle into (-π, π].
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}

/// Clamp `theta` into `[min, max]`. All three are wrapped into [-π, π]
/// first; when the range wraps through ±π the nearer bound wins.
fn clamp_azimuth(theta: f32, min: f32, max: f32) -> f32 {
    if !(min.is_finite() && max.is_finite()) {
        return theta;
    }
    let theta = wrap_angle(theta);
    // ±π themselves stay put so a full-circle range keeps both ends
    let bound = |a: f32| if a.abs() <= PI { a } else { wrap_angle(a) };
    let min = bound(min);
    let max = bound(max);
    if min <= max {
        theta.min(max).max(min)
    } else if theta > (min + max) / 2.0 {
        theta.max(min)
    } else {
        theta.min(max)
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;

    fn perspective_setup() -> (Camera, OrbitState) {
        let mut camera = Camera::perspective(50.0, 1.0, 0.1, 2000.0);
        camera.position = Vec3::new(0.0, 0.0, 100.0);
        camera.look_at(Vec3::ZERO);
        let state = OrbitState::new(&camera, Vec3::ZERO);
        (camera, state)
    }

    fn distance(camera: &Camera, state: &OrbitState) -> f32 {
        (camera.position - state.target()).length()
    }

    #[test]
    fn wheel_step_dollies_in_by_five_percent() {
        let (mut camera, mut state) = perspective_setup();
        let options = ControlOptions::default();
        state
            .record_dolly(
                DollyDirection::In,
                options.zoom_scale(),
                &mut camera,
                &options.limits,
            )
            .unwrap();
        assert!((state.scale() - 0.95).abs() < 1e-6);

        assert!(state.apply_frame(&mut camera, &options, true, None));
        assert!((distance(&camera, &state) - 95.0).abs() < 1e-3);
        assert_eq!(state.scale(), 1.0);
    }

    #[test]
    fn limits_hold_after_arbitrary_input() {
        let (mut camera, mut state) = perspective_setup();
        let mut options = ControlOptions::default();
        options.limits.min_distance = 20.0;
        options.limits.max_distance = 150.0;
        options.limits.min_polar_angle = 0.3;
        options.limits.max_polar_angle = 2.0;
        options.limits.min_azimuth_angle = -1.0;
        options.limits.max_azimuth_angle = 1.2;
        let viewport = Viewport::new(800.0, 600.0);

        for i in 0..200 {
            let f = i as f32;
            let drag = Vec2::new((f * 0.7).sin() * 90.0, (f * 1.3).cos() * 70.0);
            state.record_rotation(drag, viewport.height, 1.0);
            state
                .record_pan(drag * 0.5, &camera, viewport, i % 2 == 0)
                .unwrap();
            let direction = if i % 3 == 0 {
                DollyDirection::Out
            } else {
                DollyDirection::In
            };
            state
                .record_dolly(direction, 0.8, &mut camera, &options.limits)
                .unwrap();
            let _ = state.apply_frame(&mut camera, &options, false, None);

            let s = state.spherical();
            assert!(s.radius >= 20.0 - 1e-3 && s.radius <= 150.0 + 1e-3);
            assert!(s.phi >= 0.3 && s.phi <= 2.0);
            assert!(s.theta >= -1.0 && s.theta <= 1.2);
            let d = distance(&camera, &state);
            assert!(d >= 20.0 - 1e-2 && d <= 150.0 + 1e-2, "distance {d}");
        }
    }

    #[test]
    fn damping_decays_geometrically() {
        let (mut camera, mut state) = perspective_setup();
        let mut options = ControlOptions::default();
        options.enable_damping = true;
        options.damping_factor = 0.1;
        let viewport = Viewport::new(800.0, 600.0);

        state.record_rotation(Vec2::new(120.0, 40.0), viewport.height, 1.0);
        state
            .record_pan(Vec2::new(30.0, -10.0), &camera, viewport, true)
            .unwrap();

        let mut last_theta = state.spherical_delta().theta.abs();
        let mut last_pan = state.pan_offset().length();
        for _ in 0..50 {
            let _ = state.apply_frame(&mut camera, &options, false, None);
            let theta = state.spherical_delta().theta.abs();
            let pan = state.pan_offset().length();
            assert!(theta < last_theta);
            assert!(pan < last_pan);
            assert!((theta / last_theta - 0.9).abs() < 1e-4);
            assert!((pan / last_pan - 0.9).abs() < 1e-4);
            last_theta = theta;
            last_pan = pan;
        }
        assert!(last_theta < 0.01 && last_pan < 0.1);
    }

    #[test]
    fn without_damping_deltas_are_consumed_in_one_frame() {
        let (mut camera, mut state) = perspective_setup();
        let options = ControlOptions::default();
        let viewport = Viewport::new(800.0, 600.0);

        state.record_rotation(Vec2::new(50.0, 20.0), viewport.height, 1.0);
        state
            .record_pan(Vec2::new(10.0, 10.0), &camera, viewport, true)
            .unwrap();
        let _ = state.apply_frame(&mut camera, &options, false, None);

        assert_eq!(state.spherical_delta().theta, 0.0);
        assert_eq!(state.spherical_delta().phi, 0.0);
        assert_eq!(state.pan_offset(), Vec3::ZERO);
    }

    #[test]
    fn rotation_scale_uses_client_height() {
        let (mut camera, mut state) = perspective_setup();
        let options = ControlOptions::default();
        // a quarter of the height horizontally is a quarter turn
        state.record_rotation(Vec2::new(150.0, 0.0), 600.0, 1.0);
        assert!((state.spherical_delta().theta + PI / 2.0).abs() < 1e-5);

        let _ = state.apply_frame(&mut camera, &options, false, None);
        assert!((camera.position - Vec3::new(-100.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn save_and_restore_round_trip() {
        let (mut camera, mut state) = perspective_setup();
        let options = ControlOptions::default();
        state.save_state(&camera);
        let saved = state.saved();

        state.record_rotation(Vec2::new(300.0, -80.0), 600.0, 1.0);
        state
            .record_pan(Vec2::new(40.0, 40.0), &camera, Viewport::new(800.0, 600.0), false)
            .unwrap();
        let _ = state.apply_frame(&mut camera, &options, false, None);
        camera.zoom = 3.0;

        state.restore_state(&mut camera);
        assert_eq!(state.target(), saved.target);
        assert_eq!(camera.position, saved.position);
        assert_eq!(camera.zoom, saved.zoom);
    }

    #[test]
    fn azimuth_clamp_wrapping_through_pi_picks_a_bound() {
        let min = 170.0_f32.to_radians();
        let max = (-170.0_f32).to_radians();
        let clamped = clamp_azimuth(0.0, min, max);
        assert!(
            (clamped - min).abs() < 1e-6 || (clamped - max).abs() < 1e-6,
            "got {clamped}"
        );

        // values inside the arc are untouched
        assert_eq!(clamp_azimuth(3.1, min, max), 3.1);
        assert_eq!(clamp_azimuth(-3.1, min, max), -3.1);
        // nearer bound wins
        assert_eq!(clamp_azimuth(0.5, min, max), min);
        assert_eq!(clamp_azimuth(-0.5, min, max), max);
    }

    #[test]
    fn azimuth_bounds_are_normalized() {
        // 3π/2 wraps to -π/2
        let clamped = clamp_azimuth(-2.0, 1.5 * PI, 0.0);
        assert!((clamped + PI / 2.0).abs() < 1e-5);
        assert_eq!(clamp_azimuth(5.0, f32::NEG_INFINITY, 1.0), 5.0);
        // a full circle clamps nothing
        assert_eq!(clamp_azimuth(-3.0, -PI, PI), -3.0);
        assert_eq!(clamp_azimuth(3.0, -PI, PI), 3.0);
    }

    #[test]
    fn wrapped_azimuth_limits_hold_in_frames() {
        let (mut camera, mut state) = perspective_setup();
        let mut options = ControlOptions::default();
        options.limits.min_azimuth_angle = 170.0_f32.to_radians();
        options.limits.max_azimuth_angle = (-170.0_f32).to_radians();

        let _ = state.apply_frame(&mut camera, &options, false, None);
        let theta = state.spherical().theta;
        assert!(theta.abs() >= 170.0_f32.to_radians() - 1e-5, "theta {theta}");
    }

    #[test]
    fn wrapped_azimuth_limits_hold_across_pi() {
        let mut camera = Camera::perspective(50.0, 1.0, 0.1, 2000.0);
        let start = 175.0_f32.to_radians();
        camera.position = Vec3::new(start.sin(), 0.0, start.cos()) * 100.0;
        camera.look_at(Vec3::ZERO);
        let mut state = OrbitState::new(&camera, Vec3::ZERO);
        let mut options = ControlOptions::default();
        options.limits.min_azimuth_angle = 170.0_f32.to_radians();
        options.limits.max_azimuth_angle = (-170.0_f32).to_radians();
        let bound = 170.0_f32.to_radians() - 1e-4;

        // a 20 degree step crosses +π and lands past the far bound
        state.rotate_left((-20.0_f32).to_radians());
        let _ = state.apply_frame(&mut camera, &options, false, None);
        let theta = state.spherical().theta;
        let azimuth = camera.position.x.atan2(camera.position.z);
        assert!(theta.abs() <= PI && theta.abs() >= bound, "theta {theta}");
        assert!(azimuth.abs() >= bound, "azimuth {azimuth}");
        assert!((azimuth + 170.0_f32.to_radians()).abs() < 1e-3);

        // several turns in one step still end up inside the arc
        state.rotate_left(-5.0 * TAU - 0.3);
        let _ = state.apply_frame(&mut camera, &options, false, None);
        let azimuth = camera.position.x.atan2(camera.position.z);
        assert!(azimuth.abs() >= bound, "azimuth {azimuth}");
    }

    #[test]
    fn wrap_angle_handles_many_turns() {
        assert!((wrap_angle(7.0 * PI + 0.25) - (-PI + 0.25)).abs() < 1e-4);
        assert!((wrap_angle(-4.0 * TAU - 0.5) + 0.5).abs() < 1e-4);
        assert_eq!(wrap_angle(-PI), PI);
    }

    #[test]
    fn polar_angle_never_reaches_the_poles() {
        let (mut camera, mut state) = perspective_setup();
        let options = ControlOptions::default();
        state.rotate_up(10.0);
        let _ = state.apply_frame(&mut camera, &options, false, None);
        assert!(state.spherical().phi > 0.0);
        assert!(camera.rotation.is_finite());

        state.rotate_up(-20.0);
        let _ = state.apply_frame(&mut camera, &options, false, None);
        assert!(state.spherical().phi < PI);
    }

    #[test]
    fn orthographic_dolly_clamps_zoom_and_reports_change() {
        let mut camera = Camera::orthographic(-10.0, 10.0, 10.0, -10.0, 0.1, 100.0);
        camera.position = Vec3::new(0.0, 0.0, 50.0);
        camera.look_at(Vec3::ZERO);
        let mut state = OrbitState::new(&camera, Vec3::ZERO);
        let mut options = ControlOptions::default();
        options.limits.max_zoom = 1.5;
        let _ = state.apply_frame(&mut camera, &options, false, None);

        for _ in 0..20 {
            state
                .record_dolly(DollyDirection::In, 0.5, &mut camera, &options.limits)
                .unwrap();
        }
        assert_eq!(camera.zoom, 1.5);
        assert!(state.apply_frame(&mut camera, &options, false, None));
        assert!(!state.apply_frame(&mut camera, &options, false, None));
    }

    #[test]
    fn orthographic_pan_scales_with_frustum_and_zoom() {
        // 20 x 20 world units on an 800 x 600 viewport, zoomed 2x
        let mut camera = Camera::orthographic(-10.0, 10.0, 10.0, -10.0, 0.1, 100.0);
        camera.position = Vec3::new(0.0, 0.0, 50.0);
        camera.look_at(Vec3::ZERO);
        camera.zoom = 2.0;
        let mut state = OrbitState::new(&camera, Vec3::ZERO);
        let options = ControlOptions::default();

        state
            .record_pan(Vec2::new(80.0, 60.0), &camera, Viewport::new(800.0, 600.0), true)
            .unwrap();
        // x: 80 * 20 / 2 / 800, y: 60 * 20 / 2 / 600
        assert!((state.pan_offset() - Vec3::new(-1.0, 1.0, 0.0)).length() < 1e-5);

        let _ = state.apply_frame(&mut camera, &options, false, None);
        assert!((state.target() - Vec3::new(-1.0, 1.0, 0.0)).length() < 1e-5);
        assert!((camera.position - Vec3::new(-1.0, 1.0, 50.0)).length() < 1e-4);
        assert_eq!(camera.zoom, 2.0);
    }

    #[test]
    fn custom_projection_is_unsupported() {
        let mut camera = Camera::with_projection(Projection::Custom(Mat4::IDENTITY));
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        let mut state = OrbitState::new(&camera, Vec3::ZERO);
        let limits = OrbitLimits::default();
        assert_eq!(
            state.record_pan(Vec2::ONE, &camera, Viewport::default(), true),
            Err(UnsupportedCamera)
        );
        assert_eq!(
            state.record_dolly(DollyDirection::In, 0.95, &mut camera, &limits),
            Err(UnsupportedCamera)
        );
    }

    #[test]
    fn pan_moves_target_in_view_plane() {
        let (mut camera, mut state) = perspective_setup();
        let options = ControlOptions::default();
        // drag right: scene follows the cursor, target moves left
        state
            .record_pan(Vec2::new(100.0, 0.0), &camera, Viewport::new(800.0, 600.0), true)
            .unwrap();
        let _ = state.apply_frame(&mut camera, &options, false, None);
        assert!(state.target().x < 0.0);
        assert!(state.target().y.abs() < 1e-4);
        assert!(state.target().z.abs() < 1e-4);
        // camera keeps its offset from the target
        assert!((distance(&camera, &state) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn ground_plane_pan_keeps_height() {
        let mut camera = Camera::perspective(50.0, 1.0, 0.1, 2000.0);
        camera.position = Vec3::new(0.0, 50.0, 50.0);
        camera.look_at(Vec3::ZERO);
        let mut state = OrbitState::new(&camera, Vec3::ZERO);
        let options = ControlOptions::default();
        state
            .record_pan(Vec2::new(0.0, 80.0), &camera, Viewport::new(800.0, 600.0), false)
            .unwrap();
        let _ = state.apply_frame(&mut camera, &options, false, None);
        assert!(state.target().y.abs() < 1e-4);
        assert!(state.target().z.abs() > 1.0);
    }

    #[test]
    fn auto_rotate_only_while_idle() {
        let (mut camera, mut state) = perspective_setup();
        let mut options = ControlOptions::default();
        options.auto_rotate = true;
        let _ = state.apply_frame(&mut camera, &options, false, None);
        let before = state.spherical().theta;
        let _ = state.apply_frame(&mut camera, &options, false, None);
        assert!((state.spherical().theta - before).abs() < 1e-6);

        assert!(state.apply_frame(&mut camera, &options, true, None));
        let step = before - state.spherical().theta;
        assert!((step - options.auto_rotation_angle()).abs() < 1e-5);
    }

    #[test]
    fn explicit_angles_override_pending_rotation() {
        let (mut camera, mut state) = perspective_setup();
        let options = ControlOptions::default();
        state.rotate_left(1.0);
        let _ = state.apply_frame(&mut camera, &options, false, Some((0.4, 1.1)));
        assert!((state.spherical().theta - 0.4).abs() < 1e-6);
        assert!((state.spherical().phi - 1.1).abs() < 1e-6);
        assert_eq!(state.spherical_delta().theta, 0.0);
    }

    #[test]
    fn unchanged_frame_reports_no_change() {
        let (mut camera, mut state) = perspective_setup();
        let options = ControlOptions::default();
        assert!(state.apply_frame(&mut camera, &options, false, None));
        assert!(!state.apply_frame(&mut camera, &options, false, None));
    }

    #[test]
    fn z_up_orbit_rotates_around_z() {
        let mut camera = Camera::perspective(60.0, 1.0, 1.0, 2000.0);
        camera.up = Vec3::Z;
        camera.position = Vec3::new(0.0, -100.0, 0.0);
        camera.look_at(Vec3::ZERO);
        let mut state = OrbitState::new(&camera, Vec3::ZERO);
        let options = ControlOptions::default();
        state.rotate_left(PI / 2.0);
        let _ = state.apply_frame(&mut camera, &options, false, None);
        assert!(camera.position.z.abs() < 1e-3);
        assert!((camera.position.length() - 100.0).abs() < 1e-3);
    }
}
