use serde::{Deserialize, Serialize};

/// Lifecycle of a ball track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackState {
    /// Seen, but not yet confirmed by enough consecutive frames
    #[default]
    New,
    Tracked,
    /// Missed in recent frames, kept around for re-identification
    Lost,
    Removed,
}

impl TrackState {
    pub fn is_alive(&self) -> bool {
        !matches!(self, TrackState::Removed)
    }
}
