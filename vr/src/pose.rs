//! Tracked poses.

use stereolink_core::math::Mat4;

/// A tracked device's transform at a point in time.
///
/// The transform maps device space to the runtime's absolute tracking space.
/// It is only meaningful while `is_tracked` is set; an untracked pose keeps
/// its last transform but must not drive rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub device_to_absolute: Mat4,
    pub is_tracked: bool,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            device_to_absolute: Mat4::identity(),
            is_tracked: false,
        }
    }
}

impl Pose {
    /// A valid pose at the given transform.
    pub fn tracked(device_to_absolute: Mat4) -> Self {
        Self {
            device_to_absolute,
            is_tracked: true,
        }
    }
}
