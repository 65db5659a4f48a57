//! Scriptable runtime double for tests.
//!
//! Simulates a virtual headset with plausible panel geometry and lets tests
//! script device presence, pose validity, property failures, and compositor
//! rejections. Every compositor submission is recorded for assertions.

use crate::compositor::{Compositor, SubmitError, SubmitFlags, TextureBounds};
use crate::eye::Eye;
use crate::pose::Pose;
use crate::runtime::{DeviceIndex, PropertyUnavailable, VrError, VrRuntime};
use stereolink_core::math::{Mat4, RawProjection};
use stereolink_core::pool::NativeTextureHandle;

/// One recorded compositor submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub eye: Eye,
    pub texture: NativeTextureHandle,
    pub bounds: TextureBounds,
    pub flags: SubmitFlags,
}

/// Scriptable [`VrRuntime`] + [`Compositor`] implementation.
#[derive(Debug)]
pub struct MockRuntime {
    runtime_installed: bool,
    hmd_present: bool,
    init_error: Option<String>,
    initialized: bool,
    shutdown_acknowledged: bool,
    device_connected: bool,
    pose: Pose,
    eye_viewport: (u32, u32),
    projections: [RawProjection; 2],
    eye_offsets: [Mat4; 2],
    display_frequency: Result<f32, PropertyUnavailable>,
    submit_error: Option<SubmitError>,
    /// Notifications shown, in order.
    pub notifications: Vec<String>,
    /// Compositor submissions, in order.
    pub submissions: Vec<Submission>,
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRuntime {
    /// A connected, tracking virtual headset.
    pub fn new() -> Self {
        let mut left_offset = Mat4::identity();
        left_offset[(0, 3)] = -0.035949998;
        let mut right_offset = Mat4::identity();
        right_offset[(0, 3)] = 0.035949998;

        Self {
            runtime_installed: true,
            hmd_present: true,
            init_error: None,
            initialized: false,
            shutdown_acknowledged: false,
            device_connected: true,
            pose: Pose::tracked(Mat4::identity()),
            eye_viewport: (1512, 1680),
            projections: [
                RawProjection {
                    left: -1.39,
                    right: 1.24,
                    top: -1.47,
                    bottom: 1.46,
                },
                RawProjection {
                    left: -1.24,
                    right: 1.39,
                    top: -1.47,
                    bottom: 1.46,
                },
            ],
            eye_offsets: [left_offset, right_offset],
            display_frequency: Ok(90.0),
            submit_error: None,
            notifications: Vec::new(),
            submissions: Vec::new(),
        }
    }

    pub fn set_runtime_installed(&mut self, installed: bool) {
        self.runtime_installed = installed;
    }

    pub fn set_hmd_present(&mut self, present: bool) {
        self.hmd_present = present;
    }

    pub fn fail_init(&mut self, reason: &str) {
        self.init_error = Some(reason.to_string());
    }

    pub fn set_device_connected(&mut self, connected: bool) {
        self.device_connected = connected;
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub fn set_pose_tracked(&mut self, tracked: bool) {
        self.pose.is_tracked = tracked;
    }

    pub fn set_display_frequency(&mut self, frequency: Result<f32, PropertyUnavailable>) {
        self.display_frequency = frequency;
    }

    /// Make every subsequent submission fail with the given error.
    pub fn fail_submits(&mut self, error: SubmitError) {
        self.submit_error = Some(error);
    }

    pub fn was_initialized(&self) -> bool {
        self.initialized
    }

    pub fn was_shutdown_acknowledged(&self) -> bool {
        self.shutdown_acknowledged
    }

    /// Submissions recorded for one eye, in order.
    pub fn submissions_for(&self, eye: Eye) -> Vec<&Submission> {
        self.submissions.iter().filter(|s| s.eye == eye).collect()
    }
}

impl VrRuntime for MockRuntime {
    fn is_runtime_installed(&self) -> bool {
        self.runtime_installed
    }

    fn is_hmd_present(&self) -> bool {
        self.hmd_present
    }

    fn init(&mut self) -> Result<(), VrError> {
        if let Some(reason) = &self.init_error {
            return Err(VrError::InitFailed(reason.clone()));
        }
        self.initialized = true;
        Ok(())
    }

    fn shutdown_acknowledge(&mut self) {
        self.shutdown_acknowledged = true;
    }

    fn is_device_connected(&self, device: DeviceIndex) -> bool {
        device == DeviceIndex::HMD && self.device_connected
    }

    fn device_pose(&self, _device: DeviceIndex) -> Pose {
        self.pose
    }

    fn projection_raw(&self, eye: Eye) -> RawProjection {
        self.projections[eye.index()]
    }

    fn eye_to_head(&self, eye: Eye) -> Mat4 {
        self.eye_offsets[eye.index()]
    }

    fn eye_output_viewport(&self, _eye: Eye) -> (u32, u32) {
        self.eye_viewport
    }

    fn display_frequency(&self) -> Result<f32, PropertyUnavailable> {
        self.display_frequency
    }

    fn show_notification(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}

impl Compositor for MockRuntime {
    fn submit(
        &mut self,
        eye: Eye,
        texture: NativeTextureHandle,
        bounds: TextureBounds,
        flags: SubmitFlags,
    ) -> Result<(), SubmitError> {
        if let Some(error) = &self.submit_error {
            return Err(error.clone());
        }
        self.submissions.push(Submission {
            eye,
            texture,
            bounds,
            flags,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_headset_is_connected_and_tracking() {
        let runtime = MockRuntime::new();
        assert!(runtime.is_runtime_installed());
        assert!(runtime.is_hmd_present());
        assert!(runtime.is_device_connected(DeviceIndex::HMD));
        assert!(runtime.device_pose(DeviceIndex::HMD).is_tracked);
    }

    #[test]
    fn submissions_are_recorded_in_order() {
        let mut runtime = MockRuntime::new();
        runtime
            .submit(
                Eye::Left,
                NativeTextureHandle(1),
                TextureBounds::FULL,
                SubmitFlags::DEFAULT,
            )
            .unwrap();
        runtime
            .submit(
                Eye::Right,
                NativeTextureHandle(1),
                TextureBounds::FULL,
                SubmitFlags::DEFAULT,
            )
            .unwrap();

        assert_eq!(runtime.submissions.len(), 2);
        assert_eq!(runtime.submissions[0].eye, Eye::Left);
        assert_eq!(runtime.submissions[1].eye, Eye::Right);
    }

    #[test]
    fn scripted_submit_failure() {
        let mut runtime = MockRuntime::new();
        runtime.fail_submits(SubmitError::Unavailable);
        let result = runtime.submit(
            Eye::Left,
            NativeTextureHandle(1),
            TextureBounds::FULL,
            SubmitFlags::DEFAULT,
        );
        assert_eq!(result, Err(SubmitError::Unavailable));
        assert!(runtime.submissions.is_empty());
    }

    #[test]
    fn scripted_init_failure() {
        let mut runtime = MockRuntime::new();
        runtime.fail_init("no connection to runtime process");
        assert!(runtime.init().is_err());
        assert!(!runtime.was_initialized());
    }
}
