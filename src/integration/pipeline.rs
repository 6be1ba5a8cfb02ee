//! FramePipeline for turning backend outputs into published state.

use tracing::debug;

use crate::config::VisionConfig;
use crate::detection::BallFilter;
use crate::pose::{JointSample, JointSmoother};
use crate::tracker::BallTracker;

use super::error::PipelineError;
use super::source::{Frame, ObjectRecognizer, PoseEstimator};
use super::state::{FrameSnapshot, PublishedState};

/// Runs one inference pass per frame and publishes the result.
///
/// A pass either completes and replaces the published snapshot, or fails
/// and leaves the previous snapshot untouched.
pub struct FramePipeline<P: PoseEstimator, O: ObjectRecognizer> {
    pose_estimator: P,
    recognizer: O,
    ball_filter: BallFilter,
    smoother: JointSmoother,
    tracker: BallTracker,
    state: PublishedState,
}

impl<P: PoseEstimator, O: ObjectRecognizer> FramePipeline<P, O> {
    pub fn new(
        pose_estimator: P,
        recognizer: O,
        config: &VisionConfig,
        state: PublishedState,
    ) -> Self {
        Self {
            pose_estimator,
            recognizer,
            ball_filter: BallFilter::new(config.ball_filter.clone()),
            smoother: JointSmoother::new(config.smoothing.clone()),
            tracker: BallTracker::new(config.tracker.clone()),
            state,
        }
    }

    /// Pipeline with default configuration and its own state slots.
    pub fn with_default_config(pose_estimator: P, recognizer: O) -> Self {
        Self::new(
            pose_estimator,
            recognizer,
            &VisionConfig::default(),
            PublishedState::new(),
        )
    }

    pub fn process_frame(&mut self, frame: &Frame) -> Result<FrameSnapshot, PipelineError> {
        let pose = self
            .pose_estimator
            .estimate(frame)
            .map_err(|e| PipelineError::PoseEstimation {
                frame_id: frame.id,
                source: Box::new(e),
            })?;
        let observations =
            self.recognizer
                .recognize(frame)
                .map_err(|e| PipelineError::Recognition {
                    frame_id: frame.id,
                    source: Box::new(e),
                })?;

        let joints = match pose {
            Some(pose) => self.smoother.smooth(&pose.joints),
            None => self.smoother.smooth(&JointSample::new()),
        };
        let balls = self.ball_filter.filter(&observations);
        let tracks = self.tracker.update(&balls);

        debug!(
            frame_id = frame.id,
            joints = joints.len(),
            observations = observations.len(),
            balls = balls.len(),
            tracks = tracks.len(),
            "frame processed"
        );

        let snapshot = FrameSnapshot {
            frame_id: frame.id,
            timestamp: frame.timestamp,
            joints,
            balls,
            tracks,
        };
        self.state.publish(snapshot.clone());
        Ok(snapshot)
    }

    pub fn state(&self) -> &PublishedState {
        &self.state
    }

    /// Publish into `state` from now on.
    pub(crate) fn set_state(&mut self, state: PublishedState) {
        self.state = state;
    }

    pub fn pose_estimator_mut(&mut self) -> &mut P {
        &mut self.pose_estimator
    }

    pub fn recognizer_mut(&mut self) -> &mut O {
        &mut self.recognizer
    }

    pub fn tracker(&self) -> &BallTracker {
        &self.tracker
    }

    pub fn ball_filter(&self) -> &BallFilter {
        &self.ball_filter
    }
}
