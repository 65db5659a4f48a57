//! # Stereolink Render
//!
//! The render-thread half of the Stereolink VR layer:
//!
//! - [`HostRenderer`] — interface to the host engine's render pipeline
//! - [`EnvironmentMatrices`] — the host's shared per-frame matrix record
//! - [`hooks`] — prefix/postfix interception contracts for the four hooked
//!   pipeline entry points, independent of any native hooking mechanism
//! - [`StereoSceneRenderer`] — the two-eye scene pass and compositor handoff
//! - [`SpritePass`] — replacement for the host's 2D/UI composite step
//! - [`DummyHost`] — an instrumented host implementation for tests

pub mod dummy;
pub mod env;
pub mod hooks;
pub mod host;
pub mod sprites;
pub mod stereo;

pub use dummy::{DummyHost, DummySpriteWorker};
pub use env::{BoundingFrustum, EnvironmentMatrices};
pub use hooks::{FrameHooks, HookFlow, log_render_state, run_host_frame};
pub use host::{HostRenderer, RenderSettings, SpriteBatch, SpriteWorker, Viewport};
pub use sprites::{GuiPass, NullGui, SpritePass};
pub use stereo::{BodyCalibration, FrameOutcome, PlayerPlacement, StereoSceneRenderer};
