//! Headset display geometry negotiation.
//!
//! Queried once at boot: per-eye panel resolution, field of view derived
//! from the raw projection tangents, and the panel refresh rate the host's
//! render settings should be switched to.

use crate::eye::Eye;
use crate::runtime::{PropertyUnavailable, VrRuntime};
use stereolink_core::math::fov_from_tangents;

/// Per-eye display properties resolved from the runtime at boot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    raw_width: u32,
    raw_height: u32,
    /// Horizontal field of view in radians.
    pub fov_h: f32,
    /// Vertical field of view in radians.
    pub fov_v: f32,
    /// Negotiated panel refresh rate in Hz.
    pub refresh_rate: u32,
}

impl DisplayGeometry {
    /// Query the runtime for the headset's display geometry.
    pub fn query<R: VrRuntime + ?Sized>(runtime: &R) -> Self {
        let (raw_width, raw_height) = runtime.eye_output_viewport(Eye::Left);
        let (fov_h, fov_v) = fov_from_tangents(runtime.projection_raw(Eye::Left));
        let refresh_rate = effective_refresh_rate(runtime.display_frequency());

        log::info!(
            "Found headset with eye resolution of '{raw_width}x{raw_height}' and refresh rate of {refresh_rate}"
        );

        Self {
            raw_width,
            raw_height,
            fov_h: fov_h as f32,
            fov_v: fov_v as f32,
            refresh_rate,
        }
    }

    /// Native per-eye resolution as reported by the runtime.
    pub fn raw_resolution(&self) -> (u32, u32) {
        (self.raw_width, self.raw_height)
    }

    /// Per-eye output resolution after the user's scale factor.
    pub fn scaled_resolution(&self, scale: f32) -> (u32, u32) {
        (
            (self.raw_width as f32 * scale) as u32,
            (self.raw_height as f32 * scale) as u32,
        )
    }
}

/// Resolve the refresh rate to configure the host with.
///
/// Runtimes report jittered values near round rates, so 119 and 121 are
/// treated as 120. An unavailable property falls back to 80 Hz.
pub fn effective_refresh_rate(queried: Result<f32, PropertyUnavailable>) -> u32 {
    match queried {
        Ok(hz) => {
            let mut rate = hz.ceil() as u32;
            if rate == 119 || rate == 121 {
                rate = 120;
            }
            rate
        }
        Err(PropertyUnavailable) => {
            log::error!("Failed to get HMD refresh rate! defaulting to 80");
            80
        }
    }
}
