//! Session lifecycle coordination.
//!
//! Binds headset connect/disconnect to the session's pause stack and keeps
//! the local character's visibility in sync with configuration. Pausing is
//! push/pop counted and the coordinator only pops what it pushed, so a
//! session the user paused themselves stays paused after a reconnect.

use crate::config::Config;
use crate::session::HostSession;
use stereolink_vr::TrackedDeviceListener;

/// Tracks what this layer did to the session so it can undo it.
#[derive(Debug, Default)]
pub struct LifecycleCoordinator {
    paused_by_layer: bool,
}

impl LifecycleCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this layer currently holds a pause on the session.
    pub fn paused_by_layer(&self) -> bool {
        self.paused_by_layer
    }

    /// Headset reconnected: release our pause if we hold one.
    pub fn device_connected(&mut self, session: &mut dyn HostSession) {
        if !session.in_session() {
            return;
        }
        if session.is_pausable() && self.paused_by_layer {
            session.pause_pop();
            self.paused_by_layer = false;
            log::info!("Headset reconnected, unpausing game.");
        } else {
            log::info!("Headset reconnected, unable to unpause game as game is already unpaused.");
        }
    }

    /// Headset disconnected: pause if the session allows it.
    pub fn device_disconnected(&mut self, session: &mut dyn HostSession) {
        if !session.in_session() {
            return;
        }
        if session.is_pausable() {
            session.pause_push();
            self.paused_by_layer = true;
            log::info!("Headset disconnected, pausing game.");
        } else {
            log::info!(
                "Headset disconnected, unable to pause game since it is a multiplayer session."
            );
        }
    }

    /// First valid pose of an attach: recenter the standing calibration.
    pub fn tracking_started(&mut self, session: &mut dyn HostSession) {
        session.reset_player_floor();
    }

    /// Force the character's visibility to match configuration.
    ///
    /// Idempotent set, run every frame.
    pub fn sync_character_visibility(&self, session: &mut dyn HostSession, config: &Config) {
        let Some(visible) = session.character_visible() else {
            return;
        };
        if visible && !config.enable_character_rendering {
            session.set_character_visible(false);
        } else if !visible && config.enable_character_rendering {
            session.set_character_visible(true);
        }
    }
}

/// Adapter routing tracked-device transitions into session side effects.
pub struct SessionBinding<'a> {
    pub lifecycle: &'a mut LifecycleCoordinator,
    pub session: &'a mut dyn HostSession,
}

impl TrackedDeviceListener for SessionBinding<'_> {
    fn on_connected(&mut self) {
        self.lifecycle.device_connected(self.session);
    }

    fn on_disconnected(&mut self) {
        self.lifecycle.device_disconnected(self.session);
    }

    fn on_start_tracking(&mut self) {
        self.lifecycle.tracking_started(self.session);
    }
}
