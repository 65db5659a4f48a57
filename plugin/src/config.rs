//! User configuration surface.
//!
//! The values this layer reads each frame. Loading and saving them is the
//! host integration's concern; from here the record is read-only data that
//! the owner swaps wholesale when the user changes a setting.

/// User-facing settings consumed by the VR layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Multiplier on the native per-eye render resolution.
    pub resolution_scale: f32,
    /// Whether the local player's body mesh is rendered.
    pub enable_character_rendering: bool,
    /// Whether transient headset notifications are shown.
    pub enable_notifications: bool,
    /// Whether the host still draws its single-eye desktop mirror after the
    /// stereo pass.
    pub desktop_mirror: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolution_scale: 1.0,
            enable_character_rendering: true,
            enable_notifications: true,
            desktop_mirror: true,
        }
    }
}
