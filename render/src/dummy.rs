//! Instrumented host implementation for tests.
//!
//! [`DummyHost`] counts every pipeline call and snapshots the environment
//! record at each scene draw, so tests can assert what the host would have
//! observed. Sprite batches carry `Vec<String>` payloads that
//! [`DummySpriteWorker`] counts on the worker thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::env::EnvironmentMatrices;
use crate::host::{HostRenderer, RenderSettings, SpriteBatch, SpriteWorker, Viewport};
use stereolink_core::math::{Mat4, RawProjection, Vec3, asymmetric_projection};
use stereolink_core::pool::{BorrowedTarget, NativeTextureHandle, PixelFormat, TargetPool};

/// Sprite worker that counts invocations and rendered messages.
#[derive(Debug, Default)]
pub struct DummySpriteWorker {
    renders: AtomicUsize,
    messages: AtomicUsize,
    batch_sizes: Mutex<Vec<(usize, usize)>>,
}

impl DummySpriteWorker {
    /// Number of worker invocations so far.
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    /// Total sprite messages rendered across all invocations.
    pub fn messages_rendered(&self) -> usize {
        self.messages.load(Ordering::SeqCst)
    }

    /// (default, debug) batch sizes per invocation.
    pub fn batch_sizes(&self) -> Vec<(usize, usize)> {
        self.batch_sizes.lock().clone()
    }

    fn batch_len(batch: SpriteBatch) -> usize {
        match batch.0.downcast::<Vec<String>>() {
            Ok(messages) => messages.len(),
            Err(_) => 0,
        }
    }
}

impl SpriteWorker for DummySpriteWorker {
    fn render(
        &self,
        _backbuffer: NativeTextureHandle,
        _scaled_viewport: Viewport,
        _viewport: Viewport,
        default_batch: SpriteBatch,
        debug_batch: SpriteBatch,
    ) {
        let default_len = Self::batch_len(default_batch);
        let debug_len = Self::batch_len(debug_batch);

        self.renders.fetch_add(1, Ordering::SeqCst);
        self.messages.fetch_add(default_len + debug_len, Ordering::SeqCst);
        self.batch_sizes.lock().push((default_len, debug_len));
    }
}

/// Snapshot of the environment record at one scene draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDrawRecord {
    pub target: NativeTextureHandle,
    pub camera_position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

/// Host renderer double with observable counters.
#[derive(Debug)]
pub struct DummyHost {
    env: EnvironmentMatrices,
    scene_pool: TargetPool,
    overlay_pool: TargetPool,
    resolution: (u32, u32),
    backbuffer: NativeTextureHandle,
    offscreen_sprites: bool,
    scene_drawn: bool,
    settings: RenderSettings,
    worker: Arc<DummySpriteWorker>,
    sprite_queue: Vec<String>,
    debug_queue: Vec<String>,
    ui_scale: f32,

    /// Desktop swap-chain presentations performed.
    pub presents: u32,
    /// Host's own single-eye scene draws that ran.
    pub desktop_scene_draws: u32,
    /// Host's own sprite composite passes that ran.
    pub original_sprite_passes: u32,
    pub backbuffer_clears: u32,
    pub screen_resource_inits: u32,
    pub sprite_consumes: u32,
    pub debug_scene_draws: u32,
    /// Environment snapshots, one per `draw_game_scene` call.
    pub game_scene_draws: Vec<SceneDrawRecord>,
    pub settings_history: Vec<RenderSettings>,
}

impl Default for DummyHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyHost {
    pub fn new() -> Self {
        let mut env = EnvironmentMatrices::default();
        // Plausible desktop projections so the frustum update has real
        // matrices to combine.
        env.original_projection =
            asymmetric_projection(RawProjection::symmetric(1.0), env.near_clipping);
        env.original_projection_far =
            asymmetric_projection(RawProjection::symmetric(1.2), env.near_clipping);

        Self {
            env,
            scene_pool: TargetPool::new(),
            overlay_pool: TargetPool::new(),
            resolution: (1920, 1080),
            backbuffer: NativeTextureHandle(u64::MAX),
            offscreen_sprites: false,
            scene_drawn: true,
            settings: RenderSettings::default(),
            worker: Arc::new(DummySpriteWorker::default()),
            sprite_queue: Vec::new(),
            debug_queue: Vec::new(),
            ui_scale: 1.0,
            presents: 0,
            desktop_scene_draws: 0,
            original_sprite_passes: 0,
            backbuffer_clears: 0,
            screen_resource_inits: 0,
            sprite_consumes: 0,
            debug_scene_draws: 0,
            game_scene_draws: Vec::new(),
            settings_history: Vec::new(),
        }
    }

    pub fn set_offscreen_sprites(&mut self, enabled: bool) {
        self.offscreen_sprites = enabled;
    }

    pub fn set_scene_drawn(&mut self, drawn: bool) {
        self.scene_drawn = drawn;
    }

    /// Queue a sprite message for the next drain.
    pub fn queue_sprite_message(&mut self, message: &str) {
        self.sprite_queue.push(message.to_string());
    }

    /// Queue a debug draw message for the next drain.
    pub fn queue_debug_message(&mut self, message: &str) {
        self.debug_queue.push(message.to_string());
    }

    pub fn dummy_worker(&self) -> &Arc<DummySpriteWorker> {
        &self.worker
    }

    /// Currently borrowed scene targets.
    pub fn scene_targets_outstanding(&self) -> usize {
        self.scene_pool.outstanding()
    }

    /// Peak simultaneous scene-target borrows.
    pub fn scene_targets_peak(&self) -> usize {
        self.scene_pool.peak_outstanding()
    }

    /// Fresh scene-target allocations (reuse does not count).
    pub fn scene_target_allocations(&self) -> usize {
        self.scene_pool.allocations()
    }
}

impl HostRenderer for DummyHost {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn backbuffer(&self) -> NativeTextureHandle {
        self.backbuffer
    }

    fn clear_backbuffer(&mut self) {
        self.backbuffer_clears += 1;
    }

    fn offscreen_sprites_enabled(&self) -> bool {
        self.offscreen_sprites
    }

    fn scene_drawn(&self) -> bool {
        self.scene_drawn
    }

    fn settings(&self) -> RenderSettings {
        self.settings
    }

    fn switch_settings(&mut self, settings: RenderSettings) {
        self.settings = settings;
        self.settings_history.push(settings);
    }

    fn create_screen_resources(&mut self) {
        self.screen_resource_inits += 1;
    }

    fn environment(&self) -> &EnvironmentMatrices {
        &self.env
    }

    fn environment_mut(&mut self) -> &mut EnvironmentMatrices {
        &mut self.env
    }

    fn borrow_color_target(
        &mut self,
        tag: &str,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> BorrowedTarget {
        self.scene_pool.borrow(tag, width, height, format)
    }

    fn release_color_target(&mut self, target: BorrowedTarget) {
        self.scene_pool.release(target);
    }

    fn draw_game_scene(&mut self, target: &BorrowedTarget) -> BorrowedTarget {
        self.game_scene_draws.push(SceneDrawRecord {
            target: target.native(),
            camera_position: self.env.camera_position,
            view: self.env.view,
            projection: self.env.projection,
        });
        self.overlay_pool.borrow(
            "debug-overlay",
            target.width(),
            target.height(),
            PixelFormat::Rgba8Unorm,
        )
    }

    fn draw_debug_scene(&mut self, overlay: BorrowedTarget) {
        self.debug_scene_draws += 1;
        self.overlay_pool.release(overlay);
    }

    fn acquire_sprite_messages(&mut self, _tag: &str) -> SpriteBatch {
        SpriteBatch(Box::new(std::mem::take(&mut self.sprite_queue)))
    }

    fn close_debug_draw_messages(&mut self) -> SpriteBatch {
        SpriteBatch(Box::new(std::mem::take(&mut self.debug_queue)))
    }

    fn sprite_worker(&self) -> Arc<dyn SpriteWorker> {
        Arc::clone(&self.worker) as Arc<dyn SpriteWorker>
    }

    fn scale_main_viewport(&self, viewport: Viewport) -> Viewport {
        Viewport {
            width: viewport.width * self.ui_scale,
            height: viewport.height * self.ui_scale,
        }
    }

    fn consume_main_sprites(&mut self) {
        self.sprite_consumes += 1;
    }

    fn draw_desktop_scene(&mut self) {
        self.desktop_scene_draws += 1;
    }

    fn render_sprites_original(&mut self) {
        self.original_sprite_passes += 1;
    }

    fn present(&mut self) {
        self.presents += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let host = DummyHost::new();
        assert_eq!(host.presents, 0);
        assert_eq!(host.scene_targets_outstanding(), 0);
        assert!(host.game_scene_draws.is_empty());
    }

    #[test]
    fn scene_draw_snapshots_environment() {
        let mut host = DummyHost::new();
        host.environment_mut().camera_position = Vec3::new(1.0, 2.0, 3.0);

        let target = host.borrow_color_target("scene", 64, 64, PixelFormat::Rgba8Unorm);
        let overlay = host.draw_game_scene(&target);
        host.draw_debug_scene(overlay);
        host.release_color_target(target);

        assert_eq!(host.game_scene_draws.len(), 1);
        assert_eq!(
            host.game_scene_draws[0].camera_position,
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(host.debug_scene_draws, 1);
        assert_eq!(host.scene_targets_outstanding(), 0);
    }

    #[test]
    fn sprite_queues_drain_once() {
        let mut host = DummyHost::new();
        host.queue_sprite_message("hud");
        host.queue_sprite_message("crosshair");

        let first = host.acquire_sprite_messages("DefaultOffscreenTarget");
        let second = host.acquire_sprite_messages("DefaultOffscreenTarget");

        assert_eq!(DummySpriteWorker::batch_len(first), 2);
        assert_eq!(DummySpriteWorker::batch_len(second), 0);
    }
}
