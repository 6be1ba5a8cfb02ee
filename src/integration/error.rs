use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single inference pass.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pose estimation failed on frame {frame_id}")]
    PoseEstimation {
        frame_id: u64,
        #[source]
        source: BoxError,
    },
    #[error("object recognition failed on frame {frame_id}")]
    Recognition {
        frame_id: u64,
        #[source]
        source: BoxError,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("camera access has not been granted")]
    PermissionDenied,
    #[error("permission request was dropped without an answer")]
    PermissionChannelClosed,
    #[error("capture session is already running")]
    AlreadyRunning,
    #[error("capture session is not running")]
    NotRunning,
    #[error("no tokio runtime available to run the capture loop")]
    NoRuntime,
    #[error("capture source failed")]
    Capture(#[source] BoxError),
    #[error("capture loop panicked")]
    WorkerPanicked,
}
