//! Compositor frame submission.

use crate::eye::Eye;
use stereolink_core::pool::NativeTextureHandle;
use thiserror::Error;

/// Normalized texture region submitted for one eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBounds {
    pub u_min: f32,
    pub v_min: f32,
    pub u_max: f32,
    pub v_max: f32,
}

impl TextureBounds {
    /// Full texture coverage.
    pub const FULL: TextureBounds = TextureBounds {
        u_min: 0.0,
        v_min: 0.0,
        u_max: 1.0,
        v_max: 1.0,
    };
}

/// Submission flag bits, mirroring the runtime's wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SubmitFlags(pub u32);

impl SubmitFlags {
    pub const DEFAULT: SubmitFlags = SubmitFlags(0);
}

/// Errors reported by frame submission.
///
/// Submission failures are per-frame recoverable: the caller logs them and
/// moves on to the next frame, it never retries within the frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("compositor is not available")]
    Unavailable,
    #[error("compositor rejected {eye:?} frame: {reason}")]
    Rejected { eye: Eye, reason: String },
}

/// The runtime subsystem that accepts per-eye rendered textures.
pub trait Compositor {
    /// Submit one eye's rendered texture for display on the headset.
    fn submit(
        &mut self,
        eye: Eye,
        texture: NativeTextureHandle,
        bounds: TextureBounds,
        flags: SubmitFlags,
    ) -> Result<(), SubmitError>;
}
