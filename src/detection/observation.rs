//! Recognized-object observations as delivered by an object recognizer.

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// One (label, confidence) pair attached to a recognized object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// A single recognized object in one video frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedObject {
    /// Candidate labels, usually sorted by the recognizer from most to least likely.
    pub labels: Vec<Classification>,
    pub bbox: Rect,
}

impl RecognizedObject {
    pub fn new(labels: Vec<Classification>, bbox: Rect) -> Self {
        Self { labels, bbox }
    }

    /// Shorthand for an object carrying a single label.
    pub fn single(label: impl Into<String>, confidence: f32, bbox: Rect) -> Self {
        Self::new(vec![Classification::new(label, confidence)], bbox)
    }

    /// The label with the highest confidence, if any.
    pub fn top_label(&self) -> Option<&Classification> {
        self.labels
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_label() {
        let obj = RecognizedObject::new(
            vec![
                Classification::new("person", 0.3),
                Classification::new("sports ball", 0.7),
            ],
            Rect::default(),
        );
        assert_eq!(obj.top_label().map(|c| c.label.as_str()), Some("sports ball"));
    }

    #[test]
    fn test_top_label_empty() {
        let obj = RecognizedObject::new(vec![], Rect::default());
        assert!(obj.top_label().is_none());
    }

    #[test]
    fn test_deserialize_observation() {
        let json = r#"{
            "labels": [{"label": "Soccer Ball", "confidence": 0.8}],
            "bbox": {"x": 0.1, "y": 0.2, "width": 0.05, "height": 0.05}
        }"#;
        let obj: RecognizedObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj.labels[0].label, "Soccer Ball");
        assert_eq!(obj.bbox, Rect::new(0.1, 0.2, 0.05, 0.05));
    }
}
