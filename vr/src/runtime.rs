//! The headset runtime interface.
//!
//! [`VrRuntime`] is the seam between this layer and whatever VR runtime is
//! installed on the machine: presence and boot queries, per-eye display
//! geometry, per-device pose polling, and transient notification overlays.
//! Keeping it a trait means the whole render path runs against
//! [`MockRuntime`](crate::mock::MockRuntime) in tests.

use crate::compositor::Compositor;
use crate::eye::Eye;
use crate::pose::Pose;
use stereolink_core::math::{Mat4, RawProjection};
use thiserror::Error;

/// Stable runtime-assigned identifier of a tracked device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceIndex(pub u32);

impl DeviceIndex {
    /// The head-mounted display always occupies index 0.
    pub const HMD: DeviceIndex = DeviceIndex(0);
}

/// Errors reported by runtime boot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VrError {
    #[error("VR runtime initialization failed: {0}")]
    InitFailed(String),
}

/// A tracked device property the runtime could not supply.
///
/// Callers are expected to fall back to a documented default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tracked device property unavailable")]
pub struct PropertyUnavailable;

/// Interface to the installed VR runtime.
pub trait VrRuntime {
    /// Whether a VR runtime is installed on this machine at all.
    fn is_runtime_installed(&self) -> bool;

    /// Whether a head-mounted display is currently attached.
    fn is_hmd_present(&self) -> bool;

    /// Boot the runtime session.
    fn init(&mut self) -> Result<(), VrError>;

    /// Tell the runtime this application is exiting.
    fn shutdown_acknowledge(&mut self);

    /// Whether the given device is attached.
    fn is_device_connected(&self, device: DeviceIndex) -> bool;

    /// Current pose of the given device, with its validity bit.
    fn device_pose(&self, device: DeviceIndex) -> Pose;

    /// Raw tangent half-angle frustum extents for one eye.
    fn projection_raw(&self, eye: Eye) -> RawProjection;

    /// Rigid eye-to-head offset transform for one eye.
    fn eye_to_head(&self, eye: Eye) -> Mat4;

    /// Recommended per-eye render resolution in pixels.
    fn eye_output_viewport(&self, eye: Eye) -> (u32, u32);

    /// Panel refresh rate in Hz. May be unavailable on some runtimes.
    fn display_frequency(&self) -> Result<f32, PropertyUnavailable>;

    /// Show a transient notification overlay on the headset.
    fn show_notification(&mut self, message: &str);
}

/// Full runtime surface: device/system queries plus compositor submission.
///
/// Blanket-implemented for anything that provides both halves, so a single
/// runtime object can be stored behind one trait object.
pub trait VrSystem: VrRuntime + Compositor {}

impl<T: VrRuntime + Compositor> VrSystem for T {}
