//! Stereo view and projection math.
//!
//! All matrices are double-precision, column-vector convention: a matrix is
//! applied as `m * v`, translation lives in column 3, and the projective row
//! is row 3. View/projection products compose right-to-left.

pub use nalgebra;

/// 4x4 matrix (f64).
pub type Mat4 = nalgebra::Matrix4<f64>;

/// 3D vector (f64).
pub type Vec3 = nalgebra::Vector3<f64>;

/// Raw per-eye projection extents as tangent half-angles.
///
/// These are the frustum extents the VR runtime reports for one eye: the
/// tangents of the angles from the optical axis to the left/right/top/bottom
/// clipping planes. Callers guarantee `right > left` and `bottom > top`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawProjection {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl RawProjection {
    /// Symmetric extents covering `tan` in every direction.
    pub fn symmetric(tan: f64) -> Self {
        Self {
            left: -tan,
            right: tan,
            top: -tan,
            bottom: tan,
        }
    }
}

/// Per-eye view matrix set produced by [`compose_eye_view`].
#[derive(Debug, Clone, PartialEq)]
pub struct EyeView {
    /// World-to-eye view matrix.
    pub view: Mat4,
    /// Eye-to-world transform (inverse view).
    pub inv_view: Mat4,
    /// View with translation stripped, for skybox/infinite-distance draws.
    pub view_at_origin: Mat4,
    /// Inverse of the translation-stripped view.
    pub inv_view_at_origin: Mat4,
    /// Eye position in world space.
    pub camera_position: Vec3,
}

/// Build an asymmetric off-axis projection from raw tangent extents.
///
/// The result is right-handed with an infinite far plane and reversed depth:
/// geometry on the near plane maps to depth 1 and depth falls toward 0 with
/// distance. Downstream depth-buffer and culling logic relies on exactly this
/// construction, so the zero z-scale entry and the near-clip entry in the
/// last column are load-bearing.
pub fn asymmetric_projection(raw: RawProjection, near_clip: f64) -> Mat4 {
    let idx = 1.0 / (raw.right - raw.left);
    let idy = 1.0 / (raw.bottom - raw.top);
    let sx = raw.right + raw.left;
    let sy = raw.bottom + raw.top;

    #[rustfmt::skip]
    let result = Mat4::new(
        2.0 * idx, 0.0,       sx * idx,  0.0,
        0.0,       2.0 * idy, sy * idy,  0.0,
        0.0,       0.0,       0.0,       near_clip,
        0.0,       0.0,       -1.0,      0.0,
    );
    result
}

/// Horizontal and vertical field of view, in radians, from raw tangents.
pub fn fov_from_tangents(raw: RawProjection) -> (f64, f64) {
    let fov_h = ((raw.right - raw.left) / 2.0).atan() * 2.0;
    let fov_v = ((raw.bottom - raw.top) / 2.0).atan() * 2.0;
    (fov_h, fov_v)
}

/// Compose the per-eye view set from a head-space view and an eye offset.
///
/// `head_view` maps world space to head space; `eye_to_head` is the runtime's
/// rigid eye offset. The translation-stripped variant is derived from the
/// full view matrix, never recomputed independently, so the two cannot drift.
pub fn compose_eye_view(head_view: &Mat4, eye_to_head: &Mat4) -> EyeView {
    let view = inverse_or_identity(eye_to_head) * head_view;
    let inv_view = inverse_or_identity(&view);
    let camera_position = Vec3::new(inv_view[(0, 3)], inv_view[(1, 3)], inv_view[(2, 3)]);

    let view_at_origin = strip_translation(&view);
    let inv_view_at_origin = inverse_or_identity(&view_at_origin);

    EyeView {
        view,
        inv_view,
        view_at_origin,
        inv_view_at_origin,
        camera_position,
    }
}

/// Zero the translation-carrying entries of a view matrix.
///
/// Clears column 3 and the projective row, keeping rotation intact and the
/// homogeneous entry at 1.
pub fn strip_translation(m: &Mat4) -> Mat4 {
    let mut at_origin = *m;
    at_origin[(0, 3)] = 0.0;
    at_origin[(1, 3)] = 0.0;
    at_origin[(2, 3)] = 0.0;
    at_origin[(3, 0)] = 0.0;
    at_origin[(3, 1)] = 0.0;
    at_origin[(3, 2)] = 0.0;
    at_origin[(3, 3)] = 1.0;
    at_origin
}

/// Invert a matrix, falling back to identity.
///
/// View and eye-offset matrices are rigid transforms and always invertible;
/// the fallback only exists so callers stay total.
pub fn inverse_or_identity(m: &Mat4) -> Mat4 {
    m.try_inverse().unwrap_or_else(Mat4::identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn head_view_sample() -> Mat4 {
        let rotation = nalgebra::Rotation3::from_euler_angles(0.1, 0.7, -0.2);
        let mut m = rotation.to_homogeneous();
        m[(0, 3)] = 1.5;
        m[(1, 3)] = -2.0;
        m[(2, 3)] = 4.25;
        m
    }

    #[test]
    fn unit_tangents_projection_matches_reference() {
        let raw = RawProjection {
            left: -1.0,
            right: 1.0,
            top: -1.0,
            bottom: 1.0,
        };
        let m = asymmetric_projection(raw, 0.1);

        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(1, 1)], 1.0);
        assert_eq!(m[(0, 2)], 0.0);
        assert_eq!(m[(1, 2)], 0.0);
        assert_eq!(m[(2, 2)], 0.0);
        assert_eq!(m[(3, 2)], -1.0);
        assert_eq!(m[(2, 3)], 0.1);
        assert_eq!(m[(3, 3)], 0.0);
    }

    #[rstest]
    #[case(-1.0, 1.0, -1.0, 1.0, 0.1)]
    #[case(-1.39, 1.24, -1.47, 1.46, 0.05)]
    #[case(-0.8, 1.1, -0.9, 1.3, 0.5)]
    #[case(-2.5, 0.5, -1.0, 2.0, 0.01)]
    #[case(0.1, 0.9, 0.2, 1.8, 1.0)]
    fn reversed_infinite_far_invariants(
        #[case] left: f64,
        #[case] right: f64,
        #[case] top: f64,
        #[case] bottom: f64,
        #[case] near: f64,
    ) {
        let raw = RawProjection {
            left,
            right,
            top,
            bottom,
        };
        let m = asymmetric_projection(raw, near);

        // Zero z-scale and the near plane in the last column are what make
        // depth reverse toward zero at infinity.
        assert_eq!(m[(2, 2)], 0.0);
        assert_eq!(m[(2, 3)], near);
        assert_eq!(m[(3, 2)], -1.0);
    }

    #[test]
    fn depth_is_one_at_near_and_falls_with_distance() {
        let m = asymmetric_projection(RawProjection::symmetric(1.0), 0.1);

        let near_point = nalgebra::Vector4::new(0.0, 0.0, -0.1, 1.0);
        let clip = m * near_point;
        assert!((clip.z / clip.w - 1.0).abs() < 1e-12);

        let far_point = nalgebra::Vector4::new(0.0, 0.0, -1000.0, 1.0);
        let clip = m * far_point;
        assert!(clip.z / clip.w < 1e-3);
        assert!(clip.z / clip.w > 0.0);
    }

    #[test]
    fn fov_of_unit_tangents_is_ninety_degrees() {
        let (fov_h, fov_v) = fov_from_tangents(RawProjection::symmetric(1.0));
        assert!((fov_h - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((fov_v - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn identity_eye_offset_yields_head_view() {
        let head_view = head_view_sample();
        let eye = compose_eye_view(&head_view, &Mat4::identity());

        assert!((eye.view - head_view).norm() < 1e-12);
        assert!((eye.inv_view - inverse_or_identity(&head_view)).norm() < 1e-9);
    }

    #[test]
    fn camera_position_is_inverse_view_translation() {
        let head_view = head_view_sample();
        let eye = compose_eye_view(&head_view, &Mat4::identity());
        let world = inverse_or_identity(&head_view);

        assert!((eye.camera_position.x - world[(0, 3)]).abs() < 1e-9);
        assert!((eye.camera_position.y - world[(1, 3)]).abs() < 1e-9);
        assert!((eye.camera_position.z - world[(2, 3)]).abs() < 1e-9);
    }

    #[test]
    fn eye_offset_shifts_camera_position() {
        let mut eye_to_head = Mat4::identity();
        eye_to_head[(0, 3)] = 0.035;

        let eye = compose_eye_view(&Mat4::identity(), &eye_to_head);
        // With an identity head view the eye sits at +x in world space.
        assert!((eye.camera_position.x - 0.035).abs() < 1e-12);
        assert!(eye.camera_position.y.abs() < 1e-12);
    }

    #[test]
    fn stripped_view_reconstructs_with_translation_reinserted() {
        let head_view = head_view_sample();
        let eye = compose_eye_view(&head_view, &Mat4::identity());

        let mut reconstructed = eye.view_at_origin;
        reconstructed[(0, 3)] = eye.view[(0, 3)];
        reconstructed[(1, 3)] = eye.view[(1, 3)];
        reconstructed[(2, 3)] = eye.view[(2, 3)];

        assert!((reconstructed - eye.view).norm() < 1e-12);
    }

    #[test]
    fn stripped_view_preserves_rotation() {
        let head_view = head_view_sample();
        let at_origin = strip_translation(&head_view);

        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(at_origin[(row, col)], head_view[(row, col)]);
            }
        }
        assert_eq!(at_origin[(0, 3)], 0.0);
        assert_eq!(at_origin[(3, 3)], 1.0);
    }
}
