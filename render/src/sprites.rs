//! Replacement sprite composite step.
//!
//! The host's single-pass 2D/UI composite is replaced with a pair of hooks:
//! the prefix clears the backbuffer and, when offscreen compositing is off
//! or no 3D scene was drawn this frame, drains the sprite queues and kicks
//! the host's compositing routine on a worker task; the postfix joins that
//! task, consumes its output, and then runs this layer's own GUI pass.
//!
//! The queues are drained at prefix time and must not be touched again this
//! frame by other producers.

use crate::hooks::HookFlow;
use crate::host::{HostRenderer, Viewport};
use stereolink_core::compute::{self, Priority, TaskHandle};

/// Queue tag the default sprite messages are drained under.
pub const DEFAULT_SPRITE_TARGET: &str = "DefaultOffscreenTarget";

/// This layer's own GUI draw pass, run at the end of the sprite postfix.
pub trait GuiPass {
    fn draw(&mut self, host: &mut dyn HostRenderer);
}

/// GUI pass that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGui;

impl GuiPass for NullGui {
    fn draw(&mut self, _host: &mut dyn HostRenderer) {}
}

/// State of the replacement sprite step across its prefix/postfix pair.
#[derive(Debug, Default)]
pub struct SpritePass {
    task: Option<TaskHandle<()>>,
}

impl SpritePass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a sprite task spawned by the prefix has not been joined yet.
    pub fn task_in_flight(&self) -> bool {
        self.task.is_some()
    }

    /// Prefix half: always suppresses the host's own sprite path.
    pub fn before(&mut self, host: &mut dyn HostRenderer) -> HookFlow {
        host.clear_backbuffer();

        if !host.offscreen_sprites_enabled() || !host.scene_drawn() {
            let viewport = Viewport::of_resolution(host.resolution());
            let scaled_viewport = host.scale_main_viewport(viewport);
            let default_batch = host.acquire_sprite_messages(DEFAULT_SPRITE_TARGET);
            let debug_batch = host.close_debug_draw_messages();
            let worker = host.sprite_worker();
            let backbuffer = host.backbuffer();

            match compute::spawn(Priority::Critical, "render_main_sprites", move || {
                worker.render(backbuffer, scaled_viewport, viewport, default_batch, debug_batch);
            }) {
                Ok(task) => self.task = Some(task),
                // The drained batches are lost with the closure; sprites
                // resume next frame.
                Err(error) => log::error!("failed to spawn sprite task: {error}"),
            }
        }

        HookFlow::Skip
    }

    /// Postfix half: join point for the sprite task, then final compositing
    /// and this layer's GUI pass.
    pub fn after(&mut self, host: &mut dyn HostRenderer, gui: &mut dyn GuiPass) {
        if let Some(task) = self.task.take() {
            task.join();
        }
        host.consume_main_sprites();
        gui.draw(host);
    }
}
