//! The two-eye scene pass.
//!
//! Runs once per frame from the DrawScene prefix hook: computes the
//! head-space view from the tracked pose, updates the shared culling
//! frusta, then draws and submits the Left eye followed by the Right eye.
//! Both eyes render into one borrowed color target that stays alive until
//! the start of the next frame, when it is released back to the host pool
//! before the next borrow.

use crate::env::EnvironmentMatrices;
use crate::host::HostRenderer;
use stereolink_core::math::{Mat4, asymmetric_projection, compose_eye_view, inverse_or_identity};
use stereolink_core::pool::{BorrowedTarget, PixelFormat};
use stereolink_vr::{
    Compositor, DisplayGeometry, Eye, SubmitFlags, TextureBounds, TrackedDevice, VrRuntime,
};

/// Tag the per-eye color target is borrowed under.
pub const EYE_TARGET_TAG: &str = "stereolink-eye";

/// The player entity's placement in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPlacement {
    /// Player-local space to world space.
    pub to_absolute: Mat4,
}

impl Default for PlayerPlacement {
    fn default() -> Self {
        Self {
            to_absolute: Mat4::identity(),
        }
    }
}

/// Standing-height calibration for the local player.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyCalibration {
    /// Calibrated floor-to-eye height in meters.
    pub height: f64,
}

/// What [`StereoSceneRenderer::render_frame`] did with the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// First invocation before tracking: screen resources were recreated
    /// and the frame's scene was skipped.
    SkippedBootstrap,
    /// The headset pose is not tracked; no scene was drawn.
    SkippedUntracked,
    /// Both eyes were drawn and submitted.
    Rendered,
}

/// Orchestrates per-eye matrix computation, scene draws, and submission.
#[derive(Debug)]
pub struct StereoSceneRenderer {
    geometry: DisplayGeometry,
    resolution_scale: f32,
    first_update: bool,
    target: Option<BorrowedTarget>,
    frames_rendered: u64,
}

impl StereoSceneRenderer {
    pub fn new(geometry: DisplayGeometry) -> Self {
        Self {
            geometry,
            resolution_scale: 1.0,
            first_update: true,
            target: None,
            frames_rendered: 0,
        }
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    /// Scale factor applied to the native per-eye resolution.
    pub fn set_resolution_scale(&mut self, scale: f32) {
        self.resolution_scale = scale;
    }

    /// Frames that completed both eye passes.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Render and submit both eyes for this frame.
    ///
    /// Submission order is always Left before Right, and once scene drawing
    /// has begun neither eye is skipped. A compositor rejection is logged
    /// and the frame still counts as rendered.
    pub fn render_frame<V>(
        &mut self,
        host: &mut dyn HostRenderer,
        vr: &mut V,
        device: &TrackedDevice,
        placement: &PlayerPlacement,
        calibration: &BodyCalibration,
    ) -> FrameOutcome
    where
        V: VrRuntime + Compositor + ?Sized,
    {
        if std::mem::take(&mut self.first_update) && !device.is_tracking() {
            host.create_screen_resources();
            return FrameOutcome::SkippedBootstrap;
        }
        if !device.is_tracking() {
            log::debug!("skipping stereo frame: headset pose not tracked");
            return FrameOutcome::SkippedUntracked;
        }

        // Release-before-reacquire: last frame's target goes back to the
        // pool only now, after the compositor is done with it.
        if let Some(previous) = self.target.take() {
            host.release_color_target(previous);
        }
        let (width, height) = self.geometry.scaled_resolution(self.resolution_scale);
        let target =
            host.borrow_color_target(EYE_TARGET_TAG, width, height, PixelFormat::Rgba8UnormSrgb);

        let head_view = self.head_space_view(host.environment(), device, placement, calibration);

        {
            let env = host.environment_mut();
            // The culling frusta use the head-space view for both eyes.
            // TODO: widen the frusta to enclose both eyes' projections.
            env.view_frustum_clipped.reset();
            env.view_frustum_clipped.matrix = env.original_projection * head_view;
            env.view_frustum_clipped_far.reset();
            env.view_frustum_clipped_far.matrix = env.original_projection_far * head_view;

            env.fov_h = self.geometry.fov_h;
            env.fov_v = self.geometry.fov_v;
        }

        for eye in Eye::BOTH {
            self.draw_eye(host, vr, eye, &head_view, &target);
        }

        self.target = Some(target);
        self.frames_rendered += 1;
        FrameOutcome::Rendered
    }

    /// Head pose in the player's local frame, applied to the host's view.
    ///
    /// The calibrated standing height is removed from the vertical
    /// translation so the head tracks relative to the calibrated floor.
    fn head_space_view(
        &self,
        env: &EnvironmentMatrices,
        device: &TrackedDevice,
        placement: &PlayerPlacement,
        calibration: &BodyCalibration,
    ) -> Mat4 {
        let mut device_to_absolute = device.pose().device_to_absolute;
        device_to_absolute[(1, 3)] -= calibration.height;

        let device_to_player = inverse_or_identity(&placement.to_absolute) * device_to_absolute;
        inverse_or_identity(&device_to_player) * env.view
    }

    fn draw_eye<V>(
        &self,
        host: &mut dyn HostRenderer,
        vr: &mut V,
        eye: Eye,
        head_view: &Mat4,
        target: &BorrowedTarget,
    ) where
        V: VrRuntime + Compositor + ?Sized,
    {
        let eye_view = compose_eye_view(head_view, &vr.eye_to_head(eye));
        {
            let env = host.environment_mut();
            let projection = asymmetric_projection(vr.projection_raw(eye), env.near_clipping);
            env.load_eye(&eye_view, projection);
        }

        let overlay = host.draw_game_scene(target);
        host.draw_debug_scene(overlay);

        if let Err(error) = vr.submit(
            eye,
            target.native(),
            TextureBounds::FULL,
            SubmitFlags::DEFAULT,
        ) {
            log::debug!("compositor submission failed for {eye:?}: {error}");
        }
    }

    /// Release the held target at teardown.
    pub fn shutdown(&mut self, host: &mut dyn HostRenderer) {
        if let Some(target) = self.target.take() {
            host.release_color_target(target);
        }
    }
}
