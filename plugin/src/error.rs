//! Plugin error types.

use stereolink_vr::VrError;
use thiserror::Error;

/// Errors that keep the VR layer from activating.
///
/// All of these are fatal-at-boot: the plugin reports them once and the
/// host keeps running desktop-only. There is no retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    #[error("no VR runtime is installed")]
    RuntimeNotInstalled,
    #[error("no VR headset detected")]
    NoHeadsetDetected,
    #[error(transparent)]
    Runtime(#[from] VrError),
    #[error("startup initializers were run twice")]
    StartupAlreadyRan,
    #[error("startup step '{step}' failed: {reason}")]
    StartupStepFailed {
        step: &'static str,
        reason: String,
    },
}
