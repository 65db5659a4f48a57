//! Tracked-device connection state machine.
//!
//! A [`TrackedDevice`] mirrors one physical tracked object. Its state walks
//! `Disconnected → Connected → Tracking` as the runtime reports presence and
//! the first valid pose; any dropout forces it back to `Disconnected`.
//! Transitions fire [`TrackedDeviceListener`] callbacks so the session layer
//! can pause, unpause, and recalibrate without this module knowing about it.

use crate::pose::Pose;
use crate::runtime::{DeviceIndex, VrRuntime};

/// Connection state of a tracked device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Runtime does not report the device, or its pose dropped out.
    Disconnected,
    /// Runtime reports the device attached, no valid pose seen yet.
    Connected,
    /// Device is attached and delivering valid poses.
    Tracking,
}

/// Callbacks fired by [`TrackedDevice::refresh_pose`] on state transitions.
pub trait TrackedDeviceListener {
    /// The device (re)appeared.
    fn on_connected(&mut self) {}

    /// The device disappeared or its pose dropped out.
    fn on_disconnected(&mut self) {}

    /// The first valid pose of this attach arrived.
    fn on_start_tracking(&mut self) {}
}

/// Listener that ignores all transitions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullListener;

impl TrackedDeviceListener for NullListener {}

/// One poseable VR-tracked object.
#[derive(Debug)]
pub struct TrackedDevice {
    index: DeviceIndex,
    state: ConnectionState,
    pose: Pose,
}

impl TrackedDevice {
    pub fn new(index: DeviceIndex) -> Self {
        log::debug!("creating tracked device {index:?}");
        Self {
            index,
            state: ConnectionState::Disconnected,
            pose: Pose::default(),
        }
    }

    pub fn index(&self) -> DeviceIndex {
        self.index
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Last polled pose. Only meaningful while at least `Connected`.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn is_tracking(&self) -> bool {
        self.state == ConnectionState::Tracking
    }

    /// Poll the runtime once and advance the state machine.
    ///
    /// Called exactly once per frame by the orchestrator; calling it again
    /// in the same frame is harmless (last write wins) and fires no
    /// duplicate transitions while the runtime's answers are unchanged.
    pub fn refresh_pose<R: VrRuntime + ?Sized>(
        &mut self,
        runtime: &R,
        listener: &mut dyn TrackedDeviceListener,
    ) {
        if !runtime.is_device_connected(self.index) {
            if self.state != ConnectionState::Disconnected {
                log::debug!("device {:?} reported absent", self.index);
                self.state = ConnectionState::Disconnected;
                self.pose.is_tracked = false;
                listener.on_disconnected();
            }
            return;
        }

        if self.state == ConnectionState::Disconnected {
            log::debug!("device {:?} connected", self.index);
            self.state = ConnectionState::Connected;
            listener.on_connected();
        }

        self.pose = runtime.device_pose(self.index);

        match (self.state, self.pose.is_tracked) {
            (ConnectionState::Connected, true) => {
                log::debug!("device {:?} started tracking", self.index);
                self.state = ConnectionState::Tracking;
                listener.on_start_tracking();
            }
            (ConnectionState::Tracking, false) => {
                log::debug!("device {:?} lost its pose", self.index);
                self.state = ConnectionState::Disconnected;
                listener.on_disconnected();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRuntime;

    #[derive(Debug, Default)]
    struct RecordingListener {
        events: Vec<&'static str>,
    }

    impl TrackedDeviceListener for RecordingListener {
        fn on_connected(&mut self) {
            self.events.push("connected");
        }
        fn on_disconnected(&mut self) {
            self.events.push("disconnected");
        }
        fn on_start_tracking(&mut self) {
            self.events.push("start_tracking");
        }
    }

    #[test]
    fn attach_track_detach_fires_each_event_once() {
        let mut runtime = MockRuntime::new();
        let mut device = TrackedDevice::new(DeviceIndex::HMD);
        let mut listener = RecordingListener::default();

        // Absent: nothing happens.
        runtime.set_device_connected(false);
        device.refresh_pose(&runtime, &mut listener);
        assert_eq!(device.state(), ConnectionState::Disconnected);
        assert!(listener.events.is_empty());

        // Attached with an invalid pose: connected only.
        runtime.set_device_connected(true);
        runtime.set_pose_tracked(false);
        device.refresh_pose(&runtime, &mut listener);
        assert_eq!(device.state(), ConnectionState::Connected);

        // First valid pose: tracking.
        runtime.set_pose_tracked(true);
        device.refresh_pose(&runtime, &mut listener);
        assert_eq!(device.state(), ConnectionState::Tracking);

        // Detached: disconnected.
        runtime.set_device_connected(false);
        device.refresh_pose(&runtime, &mut listener);
        assert_eq!(device.state(), ConnectionState::Disconnected);

        assert_eq!(
            listener.events,
            vec!["connected", "start_tracking", "disconnected"]
        );
    }

    #[test]
    fn repeated_refresh_fires_no_duplicate_events() {
        let mut runtime = MockRuntime::new();
        runtime.set_device_connected(true);
        runtime.set_pose_tracked(true);

        let mut device = TrackedDevice::new(DeviceIndex::HMD);
        let mut listener = RecordingListener::default();

        for _ in 0..100 {
            device.refresh_pose(&runtime, &mut listener);
        }

        assert_eq!(device.state(), ConnectionState::Tracking);
        assert_eq!(listener.events, vec!["connected", "start_tracking"]);
    }

    #[test]
    fn pose_dropout_forces_disconnected() {
        let mut runtime = MockRuntime::new();
        runtime.set_device_connected(true);
        runtime.set_pose_tracked(true);

        let mut device = TrackedDevice::new(DeviceIndex::HMD);
        let mut listener = RecordingListener::default();

        device.refresh_pose(&runtime, &mut listener);
        assert!(device.is_tracking());

        runtime.set_pose_tracked(false);
        device.refresh_pose(&runtime, &mut listener);
        assert_eq!(device.state(), ConnectionState::Disconnected);
        assert_eq!(
            listener.events,
            vec!["connected", "start_tracking", "disconnected"]
        );
    }

    #[test]
    fn reconnect_fires_connected_and_tracking_again() {
        let mut runtime = MockRuntime::new();
        runtime.set_device_connected(true);
        runtime.set_pose_tracked(true);

        let mut device = TrackedDevice::new(DeviceIndex::HMD);
        let mut listener = RecordingListener::default();

        device.refresh_pose(&runtime, &mut listener);
        runtime.set_device_connected(false);
        device.refresh_pose(&runtime, &mut listener);
        runtime.set_device_connected(true);
        device.refresh_pose(&runtime, &mut listener);

        assert_eq!(
            listener.events,
            vec![
                "connected",
                "start_tracking",
                "disconnected",
                "connected",
                "start_tracking"
            ]
        );
    }

    #[test]
    fn pose_updates_while_tracking() {
        let mut runtime = MockRuntime::new();
        runtime.set_device_connected(true);
        runtime.set_pose_tracked(true);

        let mut device = TrackedDevice::new(DeviceIndex::HMD);
        device.refresh_pose(&runtime, &mut NullListener);

        let mut transform = stereolink_core::math::Mat4::identity();
        transform[(1, 3)] = 1.7;
        runtime.set_pose(Pose::tracked(transform));

        device.refresh_pose(&runtime, &mut NullListener);
        assert_eq!(device.pose().device_to_absolute[(1, 3)], 1.7);
    }
}
