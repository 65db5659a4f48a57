//! Frame-hook contracts for the host pipeline.
//!
//! The host's render loop exposes four interception points, each wrapped by
//! a prefix (may skip the original) and, for the sprite step, a postfix
//! (always runs after). The contracts here are plain trait methods so they
//! stay independent of whatever native hooking facility binds them to the
//! host binary, and so they can be driven in-process by
//! [`run_host_frame`].
//!
//! Call order within a frame is fixed:
//! Draw → DrawScene → RenderSprites(prefix) → [sprite task] →
//! RenderSprites(postfix) → Present.

use crate::host::HostRenderer;

/// Whether the host's original logic runs after a prefix hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookFlow {
    /// Run the host's original logic.
    Continue,
    /// Suppress the host's original logic for this call.
    Skip,
}

impl HookFlow {
    pub fn should_run_original(self) -> bool {
        matches!(self, HookFlow::Continue)
    }
}

/// The four interception contracts around the host's frame pipeline.
pub trait FrameHooks {
    /// Before the host presents to the desktop swap chain. `Skip`
    /// suppresses the presentation entirely.
    fn before_present(&mut self, host: &mut dyn HostRenderer) -> HookFlow;

    /// Before the host's top-level per-frame draw. Observable only —
    /// implementations must return [`HookFlow::Continue`].
    fn before_draw(&mut self, host: &mut dyn HostRenderer) -> HookFlow;

    /// Before the host draws the 3D scene once for the desktop. The stereo
    /// pass runs here; the host's own draw may still run afterwards as a
    /// desktop mirror.
    fn before_draw_scene(&mut self, host: &mut dyn HostRenderer) -> HookFlow;

    /// Before the host's sprite composite step. Implementations replace it
    /// entirely and return [`HookFlow::Skip`].
    fn before_render_sprites(&mut self, host: &mut dyn HostRenderer) -> HookFlow;

    /// After the sprite step, whether or not the original ran. Joins the
    /// sprite task and performs final compositing.
    fn after_render_sprites(&mut self, host: &mut dyn HostRenderer);
}

/// Drive one frame of the host pipeline against a hook implementation.
///
/// Mirrors the host's fixed call order, running each original host stage
/// only when its prefix hook allows it.
pub fn run_host_frame(host: &mut dyn HostRenderer, hooks: &mut dyn FrameHooks) {
    // Draw is observable, never suppressible.
    let _ = hooks.before_draw(host);

    if hooks.before_draw_scene(host).should_run_original() {
        host.draw_desktop_scene();
    }

    if hooks.before_render_sprites(host).should_run_original() {
        host.render_sprites_original();
    }
    hooks.after_render_sprites(host);

    if hooks.before_present(host).should_run_original() {
        host.present();
    }
}

/// Log a one-shot diagnostic dump of the host render state.
pub fn log_render_state(host: &dyn HostRenderer) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let (width, height) = host.resolution();
    log::debug!(
        "host renderer state:\n\
         \t backbuffer: {:?}\n\
         \t resolution: {width}x{height}\n\
         \t scene_drawn: {}\n\
         \t offscreen_sprites: {}\n\
         \t settings: {:?}",
        host.backbuffer(),
        host.scene_drawn(),
        host.offscreen_sprites_enabled(),
        host.settings(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continue_runs_original() {
        assert!(HookFlow::Continue.should_run_original());
        assert!(!HookFlow::Skip.should_run_original());
    }
}
