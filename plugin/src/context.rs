//! The plugin context.
//!
//! Exactly one [`VrPlugin`] exists per process lifetime. It is created by
//! the host loader glue at init, handed by reference to every hook call
//! site, and torn down at dispose — no ambient globals. Boot failures leave
//! the layer inactive and the host running desktop-only; a panic anywhere
//! in the per-frame path latches the failed state and disables all further
//! hook dispatch for the session.

use std::any::Any;

use crate::config::Config;
use crate::error::PluginError;
use crate::headset::Headset;
use crate::lifecycle::{LifecycleCoordinator, SessionBinding};
use crate::session::{EntityId, HostSession};
use crate::startup::StartupRegistry;
use stereolink_render::{
    FrameHooks, GuiPass, HookFlow, HostRenderer, NullGui, SpritePass, StereoSceneRenderer,
    log_render_state,
};
use stereolink_vr::{DisplayGeometry, VrRuntime, VrSystem};

/// Boot-time context handed to startup initializers.
struct BootContext<'a> {
    vr: &'a mut dyn VrRuntime,
    host: &'a mut dyn HostRenderer,
    geometry: DisplayGeometry,
    notify: bool,
}

/// The VR layer's explicit-lifecycle singleton.
pub struct VrPlugin<V: VrSystem, S: HostSession> {
    vr: V,
    session: S,
    config: Config,
    headset: Headset,
    stereo: StereoSceneRenderer,
    sprites: SpritePass,
    gui: Box<dyn GuiPass>,
    lifecycle: LifecycleCoordinator,
    disable_present: bool,
    failed: bool,
    disposed: bool,
}

impl<V: VrSystem, S: HostSession> VrPlugin<V, S> {
    /// Boot the VR layer.
    ///
    /// Checks runtime and headset presence, initializes the runtime, reads
    /// the display geometry, and runs the startup initializers (host render
    /// settings, boot notification). On error the layer stays inactive and
    /// the host keeps running on the desktop.
    pub fn init(
        mut vr: V,
        session: S,
        host: &mut dyn HostRenderer,
        config: Config,
    ) -> Result<Self, PluginError> {
        log::info!("Starting VR layer");

        if !vr.is_runtime_installed() {
            log::error!("VR runtime not found!");
            return Err(PluginError::RuntimeNotInstalled);
        }
        if !vr.is_hmd_present() {
            log::error!("No VR headset found, please plug one in and restart the game to play");
            return Err(PluginError::NoHeadsetDetected);
        }
        vr.init()?;

        let headset = Headset::new(&vr);
        let geometry = *headset.geometry();

        {
            let mut registry: StartupRegistry<BootContext<'_>> = StartupRegistry::new();
            registry.register("render-settings", |boot| {
                let mut settings = boot.host.settings();
                settings.refresh_rate = boot.geometry.refresh_rate;
                settings.settings_mandatory = true;
                boot.host.switch_settings(settings);
                Ok(())
            });
            registry.register("boot-notification", |boot| {
                if boot.notify {
                    boot.vr.show_notification("Booted successfully");
                }
                Ok(())
            });

            let mut boot = BootContext {
                vr: &mut vr,
                host,
                geometry,
                notify: config.enable_notifications,
            };
            registry.run_all(&mut boot)?;
        }

        let mut stereo = StereoSceneRenderer::new(geometry);
        stereo.set_resolution_scale(config.resolution_scale);

        log::info!("Finished VR layer initialization");
        Ok(Self {
            vr,
            session,
            config,
            headset,
            stereo,
            sprites: SpritePass::new(),
            gui: Box::new(NullGui),
            lifecycle: LifecycleCoordinator::new(),
            disable_present: false,
            failed: false,
            disposed: false,
        })
    }

    pub fn vr(&self) -> &V {
        &self.vr
    }

    pub fn vr_mut(&mut self) -> &mut V {
        &mut self.vr
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn headset(&self) -> &Headset {
        &self.headset
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Swap in new configuration; takes effect next frame.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Suppress desktop swap-chain presentation.
    pub fn set_disable_present(&mut self, disable: bool) {
        self.disable_present = disable;
    }

    pub fn present_disabled(&self) -> bool {
        self.disable_present
    }

    /// Install this layer's GUI draw pass.
    pub fn set_gui_pass(&mut self, gui: Box<dyn GuiPass>) {
        self.gui = gui;
    }

    /// Whether a per-frame fault has permanently disabled the layer.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Main-thread per-frame update: character visibility sync.
    pub fn update(&mut self) {
        self.guarded("Update", (), |this| {
            this.lifecycle
                .sync_character_visibility(&mut this.session, &this.config);
        });
    }

    /// A world finished loading.
    pub fn world_loaded(&mut self) {
        log::info!("World loaded");
        if let Some(camera) = self.session.current_camera_entity() {
            let body = self.session.body_component(camera);
            self.headset.set_body_component(body);
        }
        self.notify("Loaded Game");
    }

    /// A world is about to unload.
    pub fn world_unloading(&mut self) {
        log::info!("World unloading");
        self.notify("Unloaded Game");
    }

    /// A world finished unloading.
    pub fn world_unloaded(&mut self) {
        log::debug!("World unloaded");
        self.headset.set_body_component(None);
    }

    /// The camera attached itself to a different entity.
    pub fn camera_attached_changed(&mut self, camera_entity: EntityId) {
        let body = self.session.body_component(camera_entity);
        self.headset.set_body_component(body);
    }

    /// Release render-side resources held across frames.
    pub fn release_render_resources(&mut self, host: &mut dyn HostRenderer) {
        self.stereo.shutdown(host);
    }

    /// Tear the layer down. Safe to call more than once.
    pub fn dispose(&mut self) {
        log::debug!("Dispose called, failed: {}", self.failed);
        if self.disposed {
            return;
        }
        self.disposed = true;
        if !self.failed {
            self.vr.shutdown_acknowledge();
            log::info!("Exiting VR runtime");
        }
    }

    fn notify(&mut self, message: &str) {
        log::debug!(
            "notification '{message}', enabled: {}",
            self.config.enable_notifications
        );
        if self.config.enable_notifications {
            self.vr.show_notification(message);
        }
    }

    /// Run a hook body under the failure latch.
    ///
    /// Once any hook panics, every later call short-circuits to its
    /// fallback, which hands control back to the host's original path.
    fn guarded<R>(&mut self, hook: &'static str, fallback: R, f: impl FnOnce(&mut Self) -> R) -> R {
        if self.failed {
            return fallback;
        }
        let result = {
            let this = &mut *self;
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || f(this)))
        };
        match result {
            Ok(value) => value,
            Err(payload) => {
                self.failed = true;
                log::error!(
                    "VR layer hook '{hook}' failed: {}; VR disabled for the rest of the session",
                    panic_message(payload.as_ref())
                );
                fallback
            }
        }
    }
}

impl<V: VrSystem, S: HostSession> FrameHooks for VrPlugin<V, S> {
    fn before_present(&mut self, _host: &mut dyn HostRenderer) -> HookFlow {
        self.guarded("Present", HookFlow::Continue, |this| {
            if this.disable_present {
                HookFlow::Skip
            } else {
                HookFlow::Continue
            }
        })
    }

    fn before_draw(&mut self, host: &mut dyn HostRenderer) -> HookFlow {
        self.guarded("Draw", HookFlow::Continue, |this| {
            // Head/body sync happens before the host draws anything.
            let mut binding = SessionBinding {
                lifecycle: &mut this.lifecycle,
                session: &mut this.session,
            };
            this.headset.device_mut().refresh_pose(&this.vr, &mut binding);
            log_render_state(host);
            HookFlow::Continue
        })
    }

    fn before_draw_scene(&mut self, host: &mut dyn HostRenderer) -> HookFlow {
        self.guarded("DrawScene", HookFlow::Continue, |this| {
            this.stereo
                .set_resolution_scale(this.config.resolution_scale);
            let placement = this.session.player_placement();
            let calibration = this.session.body_calibration();
            this.stereo.render_frame(
                host,
                &mut this.vr,
                this.headset.device(),
                &placement,
                &calibration,
            );
            if this.config.desktop_mirror {
                HookFlow::Continue
            } else {
                HookFlow::Skip
            }
        })
    }

    fn before_render_sprites(&mut self, host: &mut dyn HostRenderer) -> HookFlow {
        self.guarded("RenderSprites", HookFlow::Continue, |this| {
            this.sprites.before(host)
        })
    }

    fn after_render_sprites(&mut self, host: &mut dyn HostRenderer) {
        self.guarded("RenderSprites(post)", (), |this| {
            this.sprites.after(host, this.gui.as_mut());
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
