//! Cross-frame ball tracker.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::detection::Rect;
use crate::tracker::ball_track::BallTrack;
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::matching::{self, Assignment};
use crate::tracker::track_state::TrackState;

/// Maximum IoU distance for pairing an unconfirmed track with a detection.
const UNCONFIRMED_MATCH_THRESH: f32 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum IoU distance (`1 - IoU`) for pairing a track with a detection.
    pub match_thresh: f32,
    /// Consecutive hits before a new track is reported.
    pub min_hits: u32,
    /// Frames a lost track is kept, expressed at 30 fps.
    pub track_buffer: u32,
    pub frame_rate: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            match_thresh: 0.8,
            min_hits: 3,
            track_buffer: 30,
            frame_rate: 30.0,
        }
    }
}

impl TrackerConfig {
    pub fn max_time_lost(&self) -> u32 {
        (self.frame_rate / 30.0 * self.track_buffer as f32) as u32
    }
}

pub struct BallTracker {
    tracks: Vec<BallTrack>,
    frame_id: u32,
    next_id: u64,
    config: TrackerConfig,
    max_time_lost: u32,
    kalman_filter: KalmanFilter,
}

impl Default for BallTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl BallTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let max_time_lost = config.max_time_lost();
        Self {
            tracks: Vec::new(),
            frame_id: 0,
            next_id: 0,
            config,
            max_time_lost,
            kalman_filter: KalmanFilter::default(),
        }
    }

    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    /// Every live track, including unconfirmed and lost ones.
    pub fn tracks(&self) -> &[BallTrack] {
        &self.tracks
    }

    pub fn reset(&mut self) {
        self.tracks.clear();
        self.frame_id = 0;
        self.next_id = 0;
    }

    /// Feed the ball boxes of one frame and get the confirmed, currently tracked balls.
    pub fn update(&mut self, balls: &[Rect]) -> Vec<BallTrack> {
        self.frame_id += 1;
        let frame_id = self.frame_id;
        let min_hits = self.config.min_hits;

        for track in self.tracks.iter_mut() {
            track.predict(&self.kalman_filter);
        }

        let (confirmed, unconfirmed): (Vec<usize>, Vec<usize>) =
            (0..self.tracks.len()).partition(|&i| self.tracks[i].is_confirmed);

        // Step 1: confirmed and lost tracks against all detections
        let Assignment {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = self.associate(&confirmed, balls, self.config.match_thresh);

        for (t, d) in matches {
            let track = &mut self.tracks[confirmed[t]];
            if track.state == TrackState::Lost {
                debug!(track_id = track.track_id, frame_id, "ball track re-found");
            }
            track.update(&self.kalman_filter, balls[d], frame_id, min_hits);
        }

        for t in unmatched_tracks {
            let track = &mut self.tracks[confirmed[t]];
            match track.state {
                TrackState::Tracked => {
                    debug!(track_id = track.track_id, frame_id, "ball track lost");
                    track.mark_lost();
                }
                TrackState::Lost if frame_id - track.frame_id > self.max_time_lost => {
                    debug!(track_id = track.track_id, frame_id, "ball track removed");
                    track.mark_removed();
                }
                _ => {}
            }
        }

        // Step 2: unconfirmed tracks against what is left
        let remaining: Vec<Rect> = unmatched_detections.iter().map(|&d| balls[d]).collect();
        let Assignment {
            matches,
            unmatched_tracks,
            unmatched_detections: unmatched_new,
        } = self.associate(&unconfirmed, &remaining, UNCONFIRMED_MATCH_THRESH);

        for (t, d) in matches {
            self.tracks[unconfirmed[t]].update(&self.kalman_filter, remaining[d], frame_id, min_hits);
        }
        for t in unmatched_tracks {
            self.tracks[unconfirmed[t]].mark_removed();
        }

        // Step 3: start new tracks. Everything seen on the first frame is trusted.
        for d in unmatched_new {
            let trusted = frame_id == 1 || min_hits <= 1;
            let mut track = BallTrack::new(remaining[d]);
            self.next_id += 1;
            track.activate(&self.kalman_filter, self.next_id, frame_id, trusted);
            debug!(track_id = track.track_id, frame_id, trusted, "ball track started");
            self.tracks.push(track);
        }

        self.tracks.retain(|t| t.state.is_alive());

        self.tracks
            .iter()
            .filter(|t| t.is_confirmed && t.state == TrackState::Tracked)
            .cloned()
            .collect()
    }

    fn associate(&self, track_indices: &[usize], detections: &[Rect], thresh: f32) -> Assignment {
        let track_rects: Vec<Rect> = track_indices.iter().map(|&i| self.tracks[i].rect()).collect();
        let dists = matching::iou_distance(&track_rects, detections);
        matching::linear_assignment(&dists, thresh)
    }
}
