mod joint;
mod smoothing;

pub use joint::{JointName, JointSample, ParseJointError, PoseObservation};
pub use smoothing::{JointSmoother, SmoothingConfig};
