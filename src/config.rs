//! Configuration for the whole frame pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::detection::BallFilterConfig;
use crate::pose::SmoothingConfig;
use crate::tracker::TrackerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every section falls back to its defaults when missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub ball_filter: BallFilterConfig,
    pub tracker: TrackerConfig,
    pub smoothing: SmoothingConfig,
}

impl VisionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: VisionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading vision config");
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let filter = &self.ball_filter;
        if filter.labels.is_empty() || filter.labels.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "ball_filter.labels must contain non-empty labels".into(),
            ));
        }
        if !(0.0..=1.0).contains(&filter.min_confidence) {
            return Err(ConfigError::Invalid(format!(
                "ball_filter.min_confidence must be in [0, 1], got {}",
                filter.min_confidence
            )));
        }

        let tracker = &self.tracker;
        if !(0.0..=1.0).contains(&tracker.match_thresh) {
            return Err(ConfigError::Invalid(format!(
                "tracker.match_thresh must be in [0, 1], got {}",
                tracker.match_thresh
            )));
        }
        if tracker.frame_rate <= 0.0 || tracker.track_buffer == 0 {
            return Err(ConfigError::Invalid(
                "tracker.frame_rate and tracker.track_buffer must be positive".into(),
            ));
        }

        let smoothing = &self.smoothing;
        if smoothing.process_noise <= 0.0 || smoothing.measurement_noise <= 0.0 {
            return Err(ConfigError::Invalid(
                "smoothing noise terms must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = VisionConfig::from_json_str("{}").unwrap();
        assert_eq!(config, VisionConfig::default());
        assert_eq!(config.ball_filter.min_confidence, 0.5);
        assert_eq!(config.ball_filter.labels.len(), 4);
    }

    #[test]
    fn test_partial_sections() {
        let config = VisionConfig::from_json_str(
            r#"{"tracker": {"min_hits": 1}, "smoothing": {"enabled": false}}"#,
        )
        .unwrap();
        assert_eq!(config.tracker.min_hits, 1);
        assert_eq!(config.tracker.track_buffer, 30);
        assert!(!config.smoothing.enabled);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let err = VisionConfig::from_json_str(r#"{"ball_filter": {"min_confidence": 1.5}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_vocabulary() {
        let err = VisionConfig::from_json_str(r#"{"ball_filter": {"labels": []}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = VisionConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = VisionConfig::from_path("/nonexistent/pitchsight.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
