//! Integration with camera, inference and permission backends.
//!
//! This module provides the traits external backends implement, the frame
//! pipeline that turns their outputs into published state, and the camera
//! view-model that drives the capture session.

mod error;
mod pipeline;
mod source;
mod state;
mod view_model;

pub use error::{BoxError, PipelineError, SessionError};
pub use pipeline::FramePipeline;
pub use source::{Frame, FrameSource, ObjectRecognizer, PermissionAuthority, PoseEstimator};
pub use state::{FrameSnapshot, PublishedState};
pub use view_model::CameraViewModel;
