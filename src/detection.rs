//! Recognized-object observations and the ball-label filter.

mod ball_filter;
mod builder;
mod observation;
mod rect;

pub use ball_filter::{BallFilter, BallFilterConfig, DEFAULT_BALL_LABELS, detect_balls};
pub use builder::ObservationBuilder;
pub use observation::{Classification, RecognizedObject};
pub use rect::{Rect, iou_batch};
