//! Headset state.
//!
//! Owns the head-mounted display's tracked-device state machine and display
//! geometry, plus the body-component reference shared with the render
//! thread. The render thread reads a locked snapshot of the body component
//! so it never observes a half-swapped reference while the main thread
//! reassigns it.

use parking_lot::Mutex;

use crate::session::BodyComponent;
use stereolink_vr::{DeviceIndex, DisplayGeometry, TrackedDevice, VrRuntime};

/// The head-mounted display and its per-session state.
#[derive(Debug)]
pub struct Headset {
    device: TrackedDevice,
    geometry: DisplayGeometry,
    body: Option<BodyComponent>,
    render_body: Mutex<Option<BodyComponent>>,
}

impl Headset {
    /// Create the headset device and query its display geometry.
    pub fn new<R: VrRuntime + ?Sized>(runtime: &R) -> Self {
        log::debug!("creating headset");
        Self {
            device: TrackedDevice::new(DeviceIndex::HMD),
            geometry: DisplayGeometry::query(runtime),
            body: None,
            render_body: Mutex::new(None),
        }
    }

    pub fn device(&self) -> &TrackedDevice {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut TrackedDevice {
        &mut self.device
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    /// Body component as seen by the main thread.
    pub fn body_component(&self) -> Option<BodyComponent> {
        self.body
    }

    /// Reassign the body component, updating the render-thread snapshot.
    pub fn set_body_component(&mut self, body: Option<BodyComponent>) {
        self.body = body;
        *self.render_body.lock() = body;
    }

    /// Consistent body-component snapshot for the render thread.
    pub fn render_body_snapshot(&self) -> Option<BodyComponent> {
        *self.render_body.lock()
    }
}
