//! Ball detection, ball tracking and body-pose state for football pitch
//! camera applications.
//!
//! The heavy lifting (3D body-pose estimation, object classification) is
//! done by external backends plugged in through the traits of
//! [`integration`]. This crate decides which recognized objects are balls,
//! keeps ball identities across frames, smooths joint positions and
//! publishes one consistent snapshot per processed frame.

pub mod config;
pub mod detection;
pub mod integration;
pub mod pose;
pub mod tracker;

pub use config::{ConfigError, VisionConfig};
pub use detection::{
    BallFilter, BallFilterConfig, Classification, ObservationBuilder, Rect, RecognizedObject,
    detect_balls,
};
pub use integration::{
    CameraViewModel, Frame, FramePipeline, FrameSnapshot, FrameSource, ObjectRecognizer,
    PermissionAuthority, PipelineError, PoseEstimator, PublishedState, SessionError,
};
pub use pose::{JointName, JointSample, JointSmoother, PoseObservation, SmoothingConfig};
pub use tracker::{BallTrack, BallTracker, TrackState, TrackerConfig};
