//! The host renderer's shared per-frame matrix record.
//!
//! The host allocates one [`EnvironmentMatrices`] at startup and its scene
//! draw reads it. During the stereo pass the record is rewritten once per
//! eye; it must be fully repopulated before each eye's draw, and the eyes
//! never share a mutated instance concurrently because the eye passes are
//! strictly serial.

use stereolink_core::math::{EyeView, Mat4, Vec3, inverse_or_identity};

/// A culling frustum defined by a combined view-projection matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingFrustum {
    pub matrix: Mat4,
}

impl Default for BoundingFrustum {
    fn default() -> Self {
        Self {
            matrix: Mat4::identity(),
        }
    }
}

impl BoundingFrustum {
    /// Reinitialize before assigning a fresh matrix.
    pub fn reset(&mut self) {
        self.matrix = Mat4::identity();
    }
}

/// Per-frame render state shared with the host's scene draw.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMatrices {
    /// World-to-eye view matrix.
    pub view: Mat4,
    /// Eye-to-world transform.
    pub inv_view: Mat4,
    /// View with translation stripped, for skybox-distance geometry.
    pub view_at_origin: Mat4,
    pub inv_view_at_origin: Mat4,
    /// Active projection.
    pub projection: Mat4,
    /// Projection used for the skybox pass. Kept equal to `projection`.
    pub projection_for_skybox: Mat4,
    pub inv_projection: Mat4,
    pub view_projection: Mat4,
    pub inv_view_projection: Mat4,
    pub view_projection_at_origin: Mat4,
    pub inv_view_projection_at_origin: Mat4,
    /// Camera position in world space.
    pub camera_position: Vec3,
    /// Horizontal field of view in radians.
    pub fov_h: f32,
    /// Vertical field of view in radians.
    pub fov_v: f32,
    /// Near clipping distance the projection is built from.
    pub near_clipping: f64,
    /// The host's own desktop projection, used for the shared culling
    /// frusta.
    pub original_projection: Mat4,
    /// Far-clip variant of the host's desktop projection.
    pub original_projection_far: Mat4,
    pub view_frustum_clipped: BoundingFrustum,
    pub view_frustum_clipped_far: BoundingFrustum,
}

impl Default for EnvironmentMatrices {
    fn default() -> Self {
        Self {
            view: Mat4::identity(),
            inv_view: Mat4::identity(),
            view_at_origin: Mat4::identity(),
            inv_view_at_origin: Mat4::identity(),
            projection: Mat4::identity(),
            projection_for_skybox: Mat4::identity(),
            inv_projection: Mat4::identity(),
            view_projection: Mat4::identity(),
            inv_view_projection: Mat4::identity(),
            view_projection_at_origin: Mat4::identity(),
            inv_view_projection_at_origin: Mat4::identity(),
            camera_position: Vec3::zeros(),
            fov_h: 0.0,
            fov_v: 0.0,
            near_clipping: 0.05,
            original_projection: Mat4::identity(),
            original_projection_far: Mat4::identity(),
            view_frustum_clipped: BoundingFrustum::default(),
            view_frustum_clipped_far: BoundingFrustum::default(),
        }
    }
}

impl EnvironmentMatrices {
    /// Repopulate the record for one eye.
    ///
    /// Every view/projection product the host's draw may read is rederived
    /// here, so the record is never observed half-written.
    pub fn load_eye(&mut self, eye: &EyeView, projection: Mat4) {
        self.camera_position = eye.camera_position;
        self.view = eye.view;
        self.inv_view = eye.inv_view;
        self.view_at_origin = eye.view_at_origin;
        self.inv_view_at_origin = eye.inv_view_at_origin;

        self.projection = projection;
        self.projection_for_skybox = projection;
        self.inv_projection = inverse_or_identity(&projection);

        self.view_projection = projection * eye.view;
        self.inv_view_projection = inverse_or_identity(&self.view_projection);

        self.view_projection_at_origin = projection * eye.view_at_origin;
        self.inv_view_projection_at_origin =
            inverse_or_identity(&self.view_projection_at_origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stereolink_core::math::{RawProjection, asymmetric_projection, compose_eye_view};

    fn sample_eye_view() -> EyeView {
        let rotation = nalgebra_rotation();
        let mut head_view = rotation;
        head_view[(0, 3)] = 2.0;
        head_view[(1, 3)] = -1.5;
        head_view[(2, 3)] = 0.75;

        let mut eye_to_head = Mat4::identity();
        eye_to_head[(0, 3)] = 0.035;

        compose_eye_view(&head_view, &eye_to_head)
    }

    fn nalgebra_rotation() -> Mat4 {
        stereolink_core::math::nalgebra::Rotation3::from_euler_angles(0.3, -0.4, 0.1)
            .to_homogeneous()
    }

    #[test]
    fn load_eye_keeps_inverses_consistent() {
        let mut env = EnvironmentMatrices::default();
        let eye = sample_eye_view();
        let projection = asymmetric_projection(RawProjection::symmetric(1.1), env.near_clipping);

        env.load_eye(&eye, projection);

        assert!((env.view * env.inv_view - Mat4::identity()).norm() < 1e-9);
        assert!((env.projection * env.inv_projection - Mat4::identity()).norm() < 1e-9);
        assert!((env.view_projection * env.inv_view_projection - Mat4::identity()).norm() < 1e-9);
    }

    #[test]
    fn view_projection_is_projection_times_view() {
        let mut env = EnvironmentMatrices::default();
        let eye = sample_eye_view();
        let projection = asymmetric_projection(RawProjection::symmetric(1.0), env.near_clipping);

        env.load_eye(&eye, projection);

        assert!((env.view_projection - projection * env.view).norm() < 1e-12);
        assert!(
            (env.view_projection_at_origin - projection * env.view_at_origin).norm() < 1e-12
        );
    }

    #[test]
    fn skybox_projection_tracks_active_projection() {
        let mut env = EnvironmentMatrices::default();
        let eye = sample_eye_view();
        let projection = asymmetric_projection(RawProjection::symmetric(0.9), env.near_clipping);

        env.load_eye(&eye, projection);
        assert_eq!(env.projection_for_skybox, env.projection);
    }

    #[test]
    fn frustum_reset_restores_identity() {
        let mut frustum = BoundingFrustum {
            matrix: Mat4::identity() * 3.0,
        };
        frustum.reset();
        assert_eq!(frustum.matrix, Mat4::identity());
    }
}
