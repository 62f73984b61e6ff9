//! First-person camera with an explicit orthonormal orientation basis.
//!
//! Orientation is stored as three axes rather than Euler angles or a
//! cumulative rotation matrix. Every rotation re-orthogonalizes the basis
//! from cross products, so rounding error cannot accumulate across frames
//! no matter how many rotations are applied.
//!
//! # Invariants
//! - `right`, `up`, `back` are mutually orthogonal unit vectors after every
//!   `rotate_around_axis` call.
//! - `back` points from the look target toward the eye; the camera looks
//!   along `-back`.
//! - `right` is never rotated directly; it is always derived from the other
//!   two axes.

use glam::{Mat4, Quat, Vec3};

/// Default vertical field of view: 60 degrees.
pub const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_3;

/// Distance from the eye to the near clipping plane.
pub const NEAR_PLANE: f32 = 1.0;

/// Distance from the eye to the far clipping plane.
pub const FAR_PLANE: f32 = 1000.0;

/// A first-person camera: world position plus an orthonormal basis.
///
/// `position` and `fov_y` are free to mutate; the basis axes are only
/// reachable through [`Camera::rotate_around_axis`] so the orthonormal
/// invariant survives arbitrary call sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World-space eye position. Movement logic accumulates deltas into
    /// this field directly (`camera.position += delta`).
    pub position: Vec3,
    right: Vec3,
    up: Vec3,
    back: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Identity-oriented camera at the origin: right = +X, up = +Y,
    /// back = +Z (looking down −Z), 60° vertical field of view.
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            right: Vec3::X,
            up: Vec3::Y,
            back: Vec3::Z,
            fov_y: DEFAULT_FOV_Y,
        }
    }

    /// Direction to the right of the view.
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Up direction of the view.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Direction from the look target toward the eye.
    pub fn back(&self) -> Vec3 {
        self.back
    }

    /// Direction the camera is looking: `-back`.
    pub fn forward(&self) -> Vec3 {
        -self.back
    }

    /// Rotate the orientation basis around `axis` by `radians`.
    ///
    /// `axis` must be unit length. Only `up` and `back` receive the
    /// rotation; afterwards the basis is rebuilt so the axes stay exactly
    /// orthonormal: `back` is re-normalized, `right` is derived as
    /// `normalize(up × back)`, and `up` is derived as `back × right`
    /// (already unit length, both operands being unit and orthogonal).
    /// Rotating all three axes and skipping this step lets floating-point
    /// drift accumulate until the basis is no longer orthogonal.
    pub fn rotate_around_axis(&mut self, axis: Vec3, radians: f32) {
        let rotation = Quat::from_axis_angle(axis, radians);
        self.up = rotation * self.up;
        self.back = rotation * self.back;

        self.back = self.back.normalize_or_zero();
        self.right = self.up.cross(self.back).normalize_or_zero();
        self.up = self.back.cross(self.right);
    }

    /// View transform mapping world space into camera space.
    ///
    /// Equivalent to a look-at with the eye at `position`, the target one
    /// unit along the look direction, and `up` as the up reference.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position - self.back, self.up)
    }

    /// Perspective projection for the given viewport size in pixels.
    ///
    /// The field of view is interpreted vertically; the horizontal extent
    /// is scaled by the viewport aspect ratio. Near and far planes are
    /// fixed at [`NEAR_PLANE`] and [`FAR_PLANE`].
    pub fn projection_matrix(&self, viewport_width: f32, viewport_height: f32) -> Mat4 {
        let aspect = viewport_width / viewport_height;
        Mat4::perspective_rh(self.fov_y, aspect, NEAR_PLANE, FAR_PLANE)
    }

    /// Combined `projection * view` transform for the given viewport.
    pub fn view_projection(&self, viewport_width: f32, viewport_height: f32) -> Mat4 {
        self.projection_matrix(viewport_width, viewport_height) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn vec_close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    fn mat_close(a: Mat4, b: Mat4) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() < EPS)
    }

    #[test]
    fn default_camera_is_identity_basis() {
        let cam = Camera::new();
        assert_eq!(cam.position, Vec3::ZERO);
        assert_eq!(cam.right(), Vec3::X);
        assert_eq!(cam.up(), Vec3::Y);
        assert_eq!(cam.back(), Vec3::Z);
        assert_eq!(cam.fov_y, DEFAULT_FOV_Y);
    }

    #[test]
    fn forward_is_negative_back() {
        let cam = Camera::new();
        assert_eq!(cam.forward(), -Vec3::Z);
    }

    // rotate_around_axis relies on these glam semantics when a basis vector
    // degenerates: non-zero input normalizes to unit length, zero passes
    // through unchanged.
    #[test]
    fn normalize_or_zero_produces_unit_length() {
        for v in [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-0.001, 0.002, 0.5),
            Vec3::new(100.0, -250.0, 75.0),
        ] {
            assert!((v.normalize_or_zero().length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn normalize_or_zero_keeps_zero_vector() {
        assert_eq!(Vec3::ZERO.normalize_or_zero(), Vec3::ZERO);
    }

    #[test]
    fn quarter_turn_about_up_swings_back_to_x() {
        let mut cam = Camera::new();
        cam.rotate_around_axis(cam.up(), std::f32::consts::FRAC_PI_2);
        assert!(vec_close(cam.back(), Vec3::X));
        assert!(vec_close(cam.right(), -Vec3::Z));
        assert!(vec_close(cam.up(), Vec3::Y));
    }

    #[test]
    fn rotation_about_own_up_keeps_up_fixed() {
        let mut cam = Camera::new();
        cam.rotate_around_axis(cam.up(), 1.234);
        assert!(vec_close(cam.up(), Vec3::Y));
    }

    #[test]
    fn full_turn_restores_basis() {
        let mut cam = Camera::new();
        cam.rotate_around_axis(cam.up(), std::f32::consts::TAU);
        assert!(vec_close(cam.right(), Vec3::X));
        assert!(vec_close(cam.up(), Vec3::Y));
        assert!(vec_close(cam.back(), Vec3::Z));
    }

    /// Drift regression: the basis must stay orthonormal and right-handed
    /// through ten thousand consecutive rotations about varying axes.
    #[test]
    fn basis_survives_ten_thousand_rotations() {
        let mut cam = Camera::new();
        let diagonal = Vec3::new(1.0, 1.0, 1.0).normalize();

        for i in 0..10_000u32 {
            let axis = match i % 4 {
                0 => cam.up(),
                1 => cam.right(),
                2 => cam.back(),
                _ => diagonal,
            };
            let angle = 0.01 * ((i % 13) as f32 + 1.0);
            cam.rotate_around_axis(axis, angle);

            assert!(cam.right().dot(cam.up()).abs() < EPS, "iteration {i}");
            assert!(cam.up().dot(cam.back()).abs() < EPS, "iteration {i}");
            assert!(cam.back().dot(cam.right()).abs() < EPS, "iteration {i}");
            assert!((cam.right().length() - 1.0).abs() < EPS, "iteration {i}");
            assert!((cam.up().length() - 1.0).abs() < EPS, "iteration {i}");
            assert!((cam.back().length() - 1.0).abs() < EPS, "iteration {i}");
            // Right-handedness: up × back must still equal right.
            assert!(
                (cam.up().cross(cam.back()).dot(cam.right()) - 1.0).abs() < EPS,
                "iteration {i}"
            );
        }
    }

    #[test]
    fn view_matrix_is_identity_for_default_camera() {
        let cam = Camera::new();
        assert!(mat_close(cam.view_matrix(), Mat4::IDENTITY));
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let mut cam = Camera::new();
        cam.position = Vec3::new(3.0, -4.0, 5.0);
        cam.rotate_around_axis(cam.up(), 0.8);
        let view = cam.view_matrix();
        assert!(vec_close(view.transform_point3(cam.position), Vec3::ZERO));
        // The look target sits one unit down the camera-space −Z axis.
        let target = cam.position - cam.back();
        assert!(vec_close(
            view.transform_point3(target),
            Vec3::new(0.0, 0.0, -1.0)
        ));
    }

    #[test]
    fn projection_vertical_half_extent_matches_fov() {
        let cam = Camera::new();
        let proj = cam.projection_matrix(640.0, 480.0);
        // 60° vertical FOV: the half-extent factor is tan(30°).
        let half_extent = 1.0 / proj.col(1).y;
        assert!((half_extent - 0.577_350_3).abs() < EPS);
        // Horizontal factor scaled by the 4:3 aspect ratio.
        assert!((proj.col(0).x - proj.col(1).y * 480.0 / 640.0).abs() < EPS);
        // Perspective divide: w receives −z.
        assert!((proj.col(2).w + 1.0).abs() < EPS);
    }

    #[test]
    fn view_projection_multiplies_projection_first() {
        let mut cam = Camera::new();
        cam.position = Vec3::new(1.0, 2.0, 3.0);
        let expected = cam.projection_matrix(640.0, 480.0) * cam.view_matrix();
        assert!(mat_close(cam.view_projection(640.0, 480.0), expected));
    }

    #[test]
    fn position_accumulates_movement_deltas() {
        let mut cam = Camera::new();
        cam.position += Vec3::new(0.05, 0.0, 0.0);
        cam.position += Vec3::new(0.05, 0.0, -0.05);
        assert!(vec_close(cam.position, Vec3::new(0.1, 0.0, -0.05)));
    }
}
