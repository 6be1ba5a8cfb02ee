mod ball_track;
mod ball_tracker;
mod kalman_filter;
mod matching;
mod track_state;

pub use ball_track::BallTrack;
pub use ball_tracker::{BallTracker, TrackerConfig};
pub use kalman_filter::{KalmanFilter, KalmanState};
pub use matching::{Assignment, iou_distance, linear_assignment};
pub use track_state::TrackState;
