//! A single ball followed across frames.

use crate::detection::Rect;
use crate::tracker::kalman_filter::{KalmanFilter, KalmanState};
use crate::tracker::track_state::TrackState;

fn xyah_f64(rect: &Rect) -> [f64; 4] {
    rect.to_xyah().map(f64::from)
}

#[derive(Debug, Clone)]
pub struct BallTrack {
    /// Unique per tracker, starting at 1
    pub track_id: u64,
    pub state: TrackState,
    /// Whether the track has been seen in enough consecutive frames
    pub is_confirmed: bool,
    /// Consecutive frames with a matching detection
    pub hits: u32,
    /// Last frame with a matching detection
    pub frame_id: u32,
    pub start_frame: u32,
    /// Last associated detection
    pub detection: Rect,
    kalman: Option<KalmanState>,
}

impl BallTrack {
    pub(crate) fn new(detection: Rect) -> Self {
        Self {
            track_id: 0,
            state: TrackState::New,
            is_confirmed: false,
            hits: 0,
            frame_id: 0,
            start_frame: 0,
            detection,
            kalman: None,
        }
    }

    /// Filtered box, or the raw detection before the filter is started.
    pub fn rect(&self) -> Rect {
        match &self.kalman {
            Some(k) => {
                let [cx, cy, a, h] = k.xyah().map(|v| v as f32);
                Rect::from_xyah(cx, cy, a, h)
            }
            None => self.detection,
        }
    }

    /// Estimated center velocity in normalized units per frame.
    pub fn velocity(&self) -> (f32, f32) {
        self.kalman
            .as_ref()
            .map(|k| {
                let (vx, vy) = k.velocity();
                (vx as f32, vy as f32)
            })
            .unwrap_or_default()
    }

    /// Frames since the track was started.
    pub fn age(&self) -> u32 {
        self.frame_id.saturating_sub(self.start_frame)
    }

    pub(crate) fn activate(
        &mut self,
        kalman_filter: &KalmanFilter,
        track_id: u64,
        frame_id: u32,
        confirmed: bool,
    ) {
        self.track_id = track_id;
        self.kalman = Some(kalman_filter.initiate(xyah_f64(&self.detection)));
        self.hits = 1;
        self.is_confirmed = confirmed;
        self.state = if confirmed {
            TrackState::Tracked
        } else {
            TrackState::New
        };
        self.frame_id = frame_id;
        self.start_frame = frame_id;
    }

    /// Associate a new detection. Lost tracks come back as tracked.
    pub(crate) fn update(
        &mut self,
        kalman_filter: &KalmanFilter,
        detection: Rect,
        frame_id: u32,
        min_hits: u32,
    ) {
        if let Some(k) = &self.kalman {
            // Keep the prediction when the measurement cannot be fused.
            if let Some(updated) = kalman_filter.update(k, xyah_f64(&detection)) {
                self.kalman = Some(updated);
            }
        }

        self.detection = detection;
        self.hits = if self.state == TrackState::Lost {
            1
        } else {
            self.hits + 1
        };
        self.frame_id = frame_id;

        if !self.is_confirmed && self.hits >= min_hits {
            self.is_confirmed = true;
        }
        self.state = if self.is_confirmed {
            TrackState::Tracked
        } else {
            TrackState::New
        };
    }

    pub(crate) fn predict(&mut self, kalman_filter: &KalmanFilter) {
        if let Some(k) = &self.kalman {
            let mut current = k.clone();
            if self.state != TrackState::Tracked {
                current.mean[7] = 0.0;
            }
            self.kalman = Some(kalman_filter.predict(&current));
        }
    }

    pub(crate) fn mark_lost(&mut self) {
        self.state = TrackState::Lost;
    }

    pub(crate) fn mark_removed(&mut self) {
        self.state = TrackState::Removed;
    }
}
