//! Interface to the host game session.
//!
//! [`HostSession`] names the session and player-character facilities this
//! layer touches: push/pop pausing, local character visibility, standing
//! floor recalibration, and resolution of the body-tracking component from
//! whatever entity the camera is attached to.

use stereolink_render::{BodyCalibration, PlayerPlacement};

/// Host entity identifier.
pub type EntityId = u64;

/// The body-tracking component attached to a player character entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyComponent {
    pub entity: EntityId,
}

/// Everything this layer consumes from the host session.
pub trait HostSession {
    /// Whether a world is currently loaded.
    fn in_session(&self) -> bool;

    /// Whether the session can be paused (false in multiplayer).
    fn is_pausable(&self) -> bool;

    /// Push one pause onto the host's pause stack.
    fn pause_push(&mut self);

    /// Pop one pause off the host's pause stack.
    fn pause_pop(&mut self);

    /// Visibility of the local player character, if one exists.
    fn character_visible(&self) -> Option<bool>;

    fn set_character_visible(&mut self, visible: bool);

    /// Recenter the player's standing-height calibration.
    fn reset_player_floor(&mut self);

    /// The player's current placement in the world.
    fn player_placement(&self) -> PlayerPlacement;

    /// The player's standing-height calibration.
    fn body_calibration(&self) -> BodyCalibration;

    /// The entity the camera is currently attached to, if any.
    fn current_camera_entity(&self) -> Option<EntityId>;

    /// The body component on the given entity, if it has one.
    fn body_component(&self, camera_entity: EntityId) -> Option<BodyComponent>;
}

/// Scriptable session double for tests.
#[derive(Debug)]
pub struct DummySession {
    pub in_session: bool,
    pub pausable: bool,
    /// Current pause stack depth.
    pub pause_depth: u32,
    /// Visibility of the local character; `None` means no character.
    pub character_visible: Option<bool>,
    pub floor_resets: u32,
    pub placement: PlayerPlacement,
    pub calibration: BodyCalibration,
    pub camera_entity: Option<EntityId>,
    /// Entities that carry a body component.
    pub body_entities: Vec<EntityId>,
}

impl Default for DummySession {
    fn default() -> Self {
        Self {
            in_session: true,
            pausable: true,
            pause_depth: 0,
            character_visible: Some(true),
            floor_resets: 0,
            placement: PlayerPlacement::default(),
            calibration: BodyCalibration::default(),
            camera_entity: None,
            body_entities: Vec::new(),
        }
    }
}

impl HostSession for DummySession {
    fn in_session(&self) -> bool {
        self.in_session
    }

    fn is_pausable(&self) -> bool {
        self.pausable
    }

    fn pause_push(&mut self) {
        self.pause_depth += 1;
    }

    fn pause_pop(&mut self) {
        self.pause_depth = self.pause_depth.saturating_sub(1);
    }

    fn character_visible(&self) -> Option<bool> {
        self.character_visible
    }

    fn set_character_visible(&mut self, visible: bool) {
        if self.character_visible.is_some() {
            self.character_visible = Some(visible);
        }
    }

    fn reset_player_floor(&mut self) {
        self.floor_resets += 1;
    }

    fn player_placement(&self) -> PlayerPlacement {
        self.placement
    }

    fn body_calibration(&self) -> BodyCalibration {
        self.calibration
    }

    fn current_camera_entity(&self) -> Option<EntityId> {
        self.camera_entity
    }

    fn body_component(&self, camera_entity: EntityId) -> Option<BodyComponent> {
        self.body_entities
            .contains(&camera_entity)
            .then_some(BodyComponent {
                entity: camera_entity,
            })
    }
}
