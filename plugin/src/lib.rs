//! # Stereolink Plugin
//!
//! The explicit-lifecycle plugin context that ties the VR layer together:
//! boot checks against the runtime, the startup initializer registry, the
//! configuration surface, headset state, and the session lifecycle
//! coordinator (pause/unpause, notifications, character visibility).
//!
//! [`VrPlugin`] implements the frame-hook contracts from
//! `stereolink-render`, wrapping every hook in a top-level guard: a panic
//! anywhere in the per-frame path marks the layer failed and disables all
//! further hook dispatch for the rest of the session, leaving the host
//! running desktop-only.

pub mod config;
pub mod context;
pub mod error;
pub mod headset;
pub mod lifecycle;
pub mod session;
pub mod startup;

pub use config::Config;
pub use context::VrPlugin;
pub use error::PluginError;
pub use headset::Headset;
pub use lifecycle::{LifecycleCoordinator, SessionBinding};
pub use session::{BodyComponent, DummySession, EntityId, HostSession};
pub use startup::StartupRegistry;
