//! Interface to the host engine's render pipeline.
//!
//! [`HostRenderer`] names every host facility this layer touches: the scene
//! and debug draw primitives, the pooled render-target borrow/release pair,
//! screen-resource reinitialization, sprite queue draining, and the host's
//! own pipeline stages (desktop scene draw, sprite composite, present) that
//! the hook layer may suppress. Keeping it a trait keeps the whole layer
//! runnable against [`DummyHost`](crate::dummy::DummyHost).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::env::EnvironmentMatrices;
use stereolink_core::pool::{BorrowedTarget, NativeTextureHandle, PixelFormat};

/// A 2D viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn of_resolution(resolution: (u32, u32)) -> Self {
        Self {
            width: resolution.0 as f32,
            height: resolution.1 as f32,
        }
    }
}

/// Host render device settings this layer negotiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Display refresh rate in Hz.
    pub refresh_rate: u32,
    /// Force the host to accept these settings as-is.
    pub settings_mandatory: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            refresh_rate: 60,
            settings_mandatory: false,
        }
    }
}

/// An opaque batch of queued 2D draw commands drained from the host.
///
/// The payload is host-defined; this layer only ferries it from the drain
/// point to the sprite worker. Once drained, the underlying queue must not
/// be touched again this frame by other producers.
pub struct SpriteBatch(pub Box<dyn Any + Send>);

impl fmt::Debug for SpriteBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SpriteBatch(..)")
    }
}

/// The host's thread-safe sprite compositing routine.
///
/// Runs on a worker thread concurrently with the render thread, between the
/// sprite prefix and postfix hooks.
pub trait SpriteWorker: Send + Sync {
    fn render(
        &self,
        backbuffer: NativeTextureHandle,
        scaled_viewport: Viewport,
        viewport: Viewport,
        default_batch: SpriteBatch,
        debug_batch: SpriteBatch,
    );
}

/// Everything this layer consumes from the host render engine.
///
/// All methods execute on the host's render thread unless noted.
pub trait HostRenderer {
    /// Current viewport resolution in pixels.
    fn resolution(&self) -> (u32, u32);

    /// The desktop swap-chain backbuffer.
    fn backbuffer(&self) -> NativeTextureHandle;

    /// Clear the backbuffer to transparent black.
    fn clear_backbuffer(&mut self);

    /// Whether the host composites sprites into an offscreen target.
    fn offscreen_sprites_enabled(&self) -> bool;

    /// Whether a 3D scene draw is scheduled for this frame.
    fn scene_drawn(&self) -> bool;

    fn settings(&self) -> RenderSettings;

    /// Switch the host's render device settings.
    fn switch_settings(&mut self, settings: RenderSettings);

    /// Recreate resolution-dependent screen resources.
    fn create_screen_resources(&mut self);

    /// The shared per-frame matrix record.
    fn environment(&self) -> &EnvironmentMatrices;

    /// Exclusive access to the shared per-frame matrix record.
    fn environment_mut(&mut self) -> &mut EnvironmentMatrices;

    /// Borrow a pooled color target.
    fn borrow_color_target(
        &mut self,
        tag: &str,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> BorrowedTarget;

    /// Return a borrowed color target to the host pool.
    fn release_color_target(&mut self, target: BorrowedTarget);

    /// Draw the 3D scene into `target` using the current environment
    /// matrices. Returns the debug-overlay target produced by the pass.
    fn draw_game_scene(&mut self, target: &BorrowedTarget) -> BorrowedTarget;

    /// Draw and consume the debug overlay produced by the scene pass.
    fn draw_debug_scene(&mut self, overlay: BorrowedTarget);

    /// Drain the default sprite draw-message queue for this frame.
    fn acquire_sprite_messages(&mut self, tag: &str) -> SpriteBatch;

    /// Close and drain the debug draw-message queue for this frame.
    fn close_debug_draw_messages(&mut self) -> SpriteBatch;

    /// Handle to the host's thread-safe sprite compositing routine.
    fn sprite_worker(&self) -> Arc<dyn SpriteWorker>;

    /// Apply the host's UI scaling to a viewport.
    fn scale_main_viewport(&self, viewport: Viewport) -> Viewport;

    /// Final consumption/compositing of the sprite pass output.
    fn consume_main_sprites(&mut self);

    /// The host's own single-eye scene draw (desktop path).
    fn draw_desktop_scene(&mut self);

    /// The host's own sprite composite step.
    fn render_sprites_original(&mut self);

    /// Present the finished frame to the desktop swap chain.
    fn present(&mut self);
}
