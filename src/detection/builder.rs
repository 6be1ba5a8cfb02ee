//! Builder for creating RecognizedObject values from various box formats.

use super::observation::{Classification, RecognizedObject};
use super::rect::Rect;

/// Builder for [`RecognizedObject`], handy for adapting recognizer outputs.
///
/// Pixel boxes can be normalized against the frame size with
/// [`ObservationBuilder::normalize`].
#[derive(Debug, Clone, Default)]
pub struct ObservationBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    labels: Vec<Classification>,
    frame_size: Option<(u32, u32)>,
}

impl ObservationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.tlbr(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.tlbr(x, y, x + w, y + h)
    }

    /// Treat the box as pixel coordinates of a `width` x `height` frame.
    pub fn normalize(mut self, width: u32, height: u32) -> Self {
        self.frame_size = Some((width, height));
        self
    }

    pub fn label(mut self, label: impl Into<String>, confidence: f32) -> Self {
        self.labels.push(Classification::new(label, confidence));
        self
    }

    pub fn build(self) -> RecognizedObject {
        let bbox = match self.frame_size {
            Some((w, h)) if w > 0 && h > 0 => {
                let (w, h) = (w as f32, h as f32);
                Rect::from_tlbr(self.x1 / w, self.y1 / h, self.x2 / w, self.y2 / h)
            }
            _ => Rect::from_tlbr(self.x1, self.y1, self.x2, self.y2),
        };
        RecognizedObject::new(self.labels, bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_observation_builder() {
        let obj = ObservationBuilder::new()
            .tlbr(0.1, 0.2, 0.3, 0.4)
            .label("sports ball", 0.95)
            .label("orange", 0.2)
            .build();

        assert_eq!(obj.labels.len(), 2);
        assert_eq!(obj.labels[0].confidence, 0.95);
        assert_relative_eq!(obj.bbox.width, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_pixels() {
        let obj = ObservationBuilder::new()
            .xywh(320.0, 240.0, 64.0, 48.0)
            .normalize(640, 480)
            .label("ball", 0.7)
            .build();

        assert_relative_eq!(obj.bbox.x, 0.45, epsilon = 1e-6);
        assert_relative_eq!(obj.bbox.y, 0.45, epsilon = 1e-6);
        assert_relative_eq!(obj.bbox.width, 0.1, epsilon = 1e-6);
        assert_relative_eq!(obj.bbox.height, 0.1, epsilon = 1e-6);
    }
}
