//! Decides which recognized objects are balls.

use serde::{Deserialize, Serialize};

use super::observation::{Classification, RecognizedObject};
use super::rect::Rect;

/// Label substrings that identify a ball.
pub const DEFAULT_BALL_LABELS: [&str; 4] = ["ball", "sports ball", "soccer ball", "football"];

/// Confidence a matching label must strictly exceed.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// Configuration for the [`BallFilter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallFilterConfig {
    /// Substrings matched case-insensitively against each label.
    pub labels: Vec<String>,
    /// A matching label is accepted only when its confidence is strictly greater.
    pub min_confidence: f32,
}

impl Default for BallFilterConfig {
    fn default() -> Self {
        Self {
            labels: DEFAULT_BALL_LABELS.iter().map(|s| s.to_string()).collect(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// Filters recognized-object observations down to ball bounding boxes.
#[derive(Debug, Clone)]
pub struct BallFilter {
    vocabulary: Vec<String>,
    min_confidence: f32,
}

impl Default for BallFilter {
    fn default() -> Self {
        Self::new(BallFilterConfig::default())
    }
}

impl BallFilter {
    pub fn new(config: BallFilterConfig) -> Self {
        Self {
            vocabulary: config.labels.iter().map(|l| l.to_lowercase()).collect(),
            min_confidence: config.min_confidence,
        }
    }

    /// Whether a single classification names a ball with enough confidence.
    pub fn is_ball_label(&self, classification: &Classification) -> bool {
        if classification.confidence <= self.min_confidence {
            return false;
        }
        let label = classification.label.to_lowercase();
        self.vocabulary.iter().any(|term| label.contains(term.as_str()))
    }

    /// The first classification of `object` accepted as a ball, if any.
    pub fn matching_label<'a>(&self, object: &'a RecognizedObject) -> Option<&'a Classification> {
        object.labels.iter().find(|c| self.is_ball_label(c))
    }

    pub fn is_ball(&self, object: &RecognizedObject) -> bool {
        self.matching_label(object).is_some()
    }

    /// Bounding boxes of every accepted observation, in input order.
    pub fn filter(&self, observations: &[RecognizedObject]) -> Vec<Rect> {
        observations
            .iter()
            .filter(|obj| self.is_ball(obj))
            .map(|obj| obj.bbox)
            .collect()
    }
}

/// Filter with the default vocabulary and threshold.
pub fn detect_balls(observations: &[RecognizedObject]) -> Vec<Rect> {
    BallFilter::default().filter(observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(label: &str, confidence: f32, bbox: Rect) -> RecognizedObject {
        RecognizedObject::single(label, confidence, bbox)
    }

    #[test]
    fn test_accepts_ball_rejects_cat() {
        let input = vec![
            obj("ball", 0.9, Rect::new(0.1, 0.1, 0.2, 0.2)),
            obj("cat", 0.8, Rect::new(0.5, 0.5, 0.1, 0.1)),
        ];
        assert_eq!(detect_balls(&input), vec![Rect::new(0.1, 0.1, 0.2, 0.2)]);
    }

    #[test]
    fn test_no_match() {
        let input = vec![obj("cat", 0.8, Rect::new(0.5, 0.5, 0.1, 0.1))];
        assert!(detect_balls(&input).is_empty());
    }

    #[test]
    fn test_threshold_is_strict() {
        let input = vec![obj("football", 0.5, Rect::new(0.1, 0.1, 0.1, 0.1))];
        assert!(detect_balls(&input).is_empty());

        let input = vec![obj("football", 0.5001, Rect::new(0.1, 0.1, 0.1, 0.1))];
        assert_eq!(detect_balls(&input).len(), 1);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let filter = BallFilter::default();
        assert!(filter.is_ball_label(&Classification::new("Soccer Ball", 0.6)));
        assert!(filter.is_ball_label(&Classification::new("FOOTBALL_HELMET", 0.6)));
        assert!(filter.is_ball_label(&Classification::new("baseball", 0.6)));
        assert!(!filter.is_ball_label(&Classification::new("goal post", 0.9)));
    }

    #[test]
    fn test_any_label_matches() {
        let filter = BallFilter::default();
        let object = RecognizedObject::new(
            vec![
                Classification::new("person", 0.95),
                Classification::new("football", 0.2),
                Classification::new("sports ball", 0.6),
            ],
            Rect::new(0.3, 0.3, 0.05, 0.05),
        );
        assert!(filter.is_ball(&object));
        assert_eq!(
            filter.matching_label(&object).map(|c| c.label.as_str()),
            Some("sports ball")
        );
    }

    #[test]
    fn test_empty_labels_never_match() {
        let object = RecognizedObject::new(vec![], Rect::new(0.3, 0.3, 0.05, 0.05));
        assert!(!BallFilter::default().is_ball(&object));
    }

    #[test]
    fn test_custom_vocabulary() {
        let filter = BallFilter::new(BallFilterConfig {
            labels: vec!["Futsal".to_string()],
            min_confidence: 0.3,
        });
        assert!(filter.is_ball_label(&Classification::new("futsal", 0.4)));
        assert!(!filter.is_ball_label(&Classification::new("ball", 0.9)));
    }
}
