//! Traits for the external camera, inference and permission backends.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::detection::RecognizedObject;
use crate::pose::PoseObservation;

/// One captured video frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: u64,
    /// Capture timestamp in seconds.
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
    /// Raw pixel data; the layout is up to the source and its consumers.
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(id: u64, timestamp: f64, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            id,
            timestamp,
            width,
            height,
            data,
        }
    }
}

/// A camera capture session.
///
/// # Example
///
/// ```ignore
/// use pitchsight::{Frame, FrameSource};
///
/// struct Replay {
///     frames: std::vec::IntoIter<Frame>,
/// }
///
/// impl FrameSource for Replay {
///     type Error = std::io::Error;
///
///     fn start(&mut self) -> Result<(), Self::Error> {
///         Ok(())
///     }
///
///     fn stop(&mut self) {}
///
///     fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
///         Ok(self.frames.next())
///     }
/// }
/// ```
pub trait FrameSource: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    fn start(&mut self) -> Result<(), Self::Error>;

    fn stop(&mut self);

    /// Block until the next frame is available. `None` means the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
}

/// Body-pose estimation backend.
pub trait PoseEstimator: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Estimate the pose in `frame`. Frames without a person yield `None`.
    fn estimate(&mut self, frame: &Frame) -> Result<Option<PoseObservation>, Self::Error>;
}

/// Object recognition backend.
pub trait ObjectRecognizer: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Recognize objects in `frame`. Boxes are expected in normalized coordinates.
    fn recognize(&mut self, frame: &Frame) -> Result<Vec<RecognizedObject>, Self::Error>;
}

/// Grants or denies camera access.
///
/// The answer may arrive at any later point, from any thread, through
/// `reply`. Dropping `reply` without answering is treated as an error by
/// the caller.
pub trait PermissionAuthority {
    fn request_access(&self, reply: oneshot::Sender<bool>);
}

impl<F> PermissionAuthority for F
where
    F: Fn(oneshot::Sender<bool>),
{
    fn request_access(&self, reply: oneshot::Sender<bool>) {
        self(reply)
    }
}
