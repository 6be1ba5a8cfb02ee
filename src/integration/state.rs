//! State published to the presentation layer.

use std::sync::Arc;

use tokio::sync::watch;

use crate::detection::Rect;
use crate::pose::JointSample;
use crate::tracker::BallTrack;

/// Everything one completed inference pass produced.
///
/// Joints and balls always come from the same frame.
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    pub frame_id: u64,
    pub timestamp: f64,
    pub joints: JointSample,
    pub balls: Vec<Rect>,
    pub tracks: Vec<BallTrack>,
}

struct Inner {
    frame: watch::Sender<FrameSnapshot>,
    permission: watch::Sender<Option<bool>>,
}

/// Shared, observable state slots.
///
/// Every update replaces a whole [`FrameSnapshot`] through a single watch
/// channel, so readers never observe a mix of two frames. Cloning is cheap
/// and all clones share the same slots.
#[derive(Clone)]
pub struct PublishedState {
    inner: Arc<Inner>,
}

impl Default for PublishedState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PublishedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishedState")
            .field("frame_id", &self.inner.frame.borrow().frame_id)
            .field("permission", &*self.inner.permission.borrow())
            .finish()
    }
}

impl PublishedState {
    pub fn new() -> Self {
        let (frame, _) = watch::channel(FrameSnapshot::default());
        let (permission, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner { frame, permission }),
        }
    }

    /// Replace the current snapshot. Succeeds even with no subscribers.
    pub fn publish(&self, snapshot: FrameSnapshot) {
        self.inner.frame.send_replace(snapshot);
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.inner.frame.borrow().clone()
    }

    pub fn latest_joints(&self) -> JointSample {
        self.inner.frame.borrow().joints.clone()
    }

    pub fn latest_balls(&self) -> Vec<Rect> {
        self.inner.frame.borrow().balls.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FrameSnapshot> {
        self.inner.frame.subscribe()
    }

    /// `None` until the permission request has been answered.
    pub fn camera_permission(&self) -> Option<bool> {
        *self.inner.permission.borrow()
    }

    /// Store the permission decision. Only the first call has an effect;
    /// returns whether this call stored it.
    pub fn set_camera_permission(&self, granted: bool) -> bool {
        self.inner.permission.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(granted);
            true
        })
    }

    pub fn subscribe_permission(&self) -> watch::Receiver<Option<bool>> {
        self.inner.permission.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::JointName;
    use nalgebra::Point3;

    #[test]
    fn test_publish_without_subscribers() {
        let state = PublishedState::new();
        state.publish(FrameSnapshot {
            frame_id: 4,
            balls: vec![Rect::new(0.1, 0.1, 0.2, 0.2)],
            ..Default::default()
        });
        assert_eq!(state.snapshot().frame_id, 4);
        assert_eq!(state.latest_balls(), vec![Rect::new(0.1, 0.1, 0.2, 0.2)]);
    }

    #[test]
    fn test_snapshot_replaced_not_merged() {
        let state = PublishedState::new();
        let mut joints = JointSample::new();
        joints.insert(JointName::Root, Point3::new(0.0, 1.0, 0.0));
        state.publish(FrameSnapshot {
            frame_id: 1,
            joints,
            balls: vec![Rect::new(0.1, 0.1, 0.2, 0.2)],
            ..Default::default()
        });
        state.publish(FrameSnapshot {
            frame_id: 2,
            ..Default::default()
        });
        assert!(state.latest_joints().is_empty());
        assert!(state.latest_balls().is_empty());
    }

    #[test]
    fn test_subscriber_sees_change() {
        let state = PublishedState::new();
        let mut rx = state.subscribe();
        assert!(!rx.has_changed().unwrap());
        state.clone().publish(FrameSnapshot {
            frame_id: 9,
            ..Default::default()
        });
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().frame_id, 9);
    }

    #[test]
    fn test_permission_set_once() {
        let state = PublishedState::new();
        assert_eq!(state.camera_permission(), None);
        assert!(state.set_camera_permission(false));
        assert!(!state.set_camera_permission(true));
        assert_eq!(state.camera_permission(), Some(false));
    }
}
