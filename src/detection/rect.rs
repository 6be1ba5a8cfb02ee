use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Bounding box in normalized image coordinates.
///
/// The origin is the top-left corner and all components lie in `[0, 1]`
/// for boxes that fit the frame. Three layouts are supported:
/// - TLWH: Top-Left X, Top-Left Y, Width, Height
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
/// - XYAH: Center X, Center Y, Aspect Ratio (w/h), Height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Create a Rect from XYAH format (center x, center y, aspect ratio, height).
    #[inline]
    pub fn from_xyah(cx: f32, cy: f32, aspect_ratio: f32, height: f32) -> Self {
        let width = aspect_ratio * height;
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Convert to XYAH format. A zero-height box reports an aspect ratio of 0.
    #[inline]
    pub fn to_xyah(&self) -> [f32; 4] {
        let (cx, cy) = self.center();
        let aspect_ratio = if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        };
        [cx, cy, aspect_ratio, self.height]
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether the box lies entirely inside the unit square.
    pub fn is_normalized(&self) -> bool {
        let [x1, y1, x2, y2] = self.to_tlbr();
        self.width >= 0.0
            && self.height >= 0.0
            && (0.0..=1.0).contains(&x1)
            && (0.0..=1.0).contains(&y1)
            && (0.0..=1.0).contains(&x2)
            && (0.0..=1.0).contains(&y2)
    }

    /// Clip the box to the unit square. Boxes fully outside collapse to zero area.
    pub fn clamped(&self) -> Rect {
        let [x1, y1, x2, y2] = self.to_tlbr();
        let x1 = x1.clamp(0.0, 1.0);
        let y1 = y1.clamp(0.0, 1.0);
        let x2 = x2.clamp(0.0, 1.0).max(x1);
        let y2 = y2.clamp(0.0, 1.0).max(y1);
        Rect::from_tlbr(x1, y1, x2, y2)
    }

    /// Intersection over Union with another box.
    pub fn iou(&self, other: &Rect) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let inter_area = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

/// Calculate the IoU matrix between two sets of bounding boxes.
///
/// Returns a matrix of shape (M, N) where M is the length of `boxes_a`
/// and N is the length of `boxes_b`.
pub fn iou_batch(boxes_a: &[Rect], boxes_b: &[Rect]) -> Array2<f32> {
    let mut ious = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ious[[i, j]] = a.iou(b);
        }
    }
    ious
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_conversions() {
        let rect = Rect::new(0.1, 0.2, 0.3, 0.4);

        assert_eq!(rect.to_tlwh(), [0.1, 0.2, 0.3, 0.4]);

        let tlbr = rect.to_tlbr();
        assert_relative_eq!(tlbr[2], 0.4, epsilon = 1e-6);
        assert_relative_eq!(tlbr[3], 0.6, epsilon = 1e-6);

        let xyah = rect.to_xyah();
        assert_relative_eq!(xyah[0], 0.25, epsilon = 1e-6);
        assert_relative_eq!(xyah[1], 0.4, epsilon = 1e-6);
        assert_relative_eq!(xyah[2], 0.75, epsilon = 1e-6);
        assert_relative_eq!(xyah[3], 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_xyah_roundtrip() {
        let rect = Rect::from_xyah(0.25, 0.4, 0.75, 0.4);
        assert_relative_eq!(rect.x, 0.1, epsilon = 1e-6);
        assert_relative_eq!(rect.y, 0.2, epsilon = 1e-6);
        assert_relative_eq!(rect.width, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_iou() {
        let a = Rect::new(0.0, 0.0, 0.2, 0.2);
        let b = Rect::new(0.1, 0.1, 0.2, 0.2);
        // Intersection 0.01, union 0.04 + 0.04 - 0.01
        assert_relative_eq!(a.iou(&b), 0.01 / 0.07, epsilon = 1e-5);
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = Rect::new(0.0, 0.0, 0.1, 0.1);
        let b = Rect::new(0.5, 0.5, 0.1, 0.1);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_is_normalized() {
        assert!(Rect::new(0.1, 0.1, 0.2, 0.2).is_normalized());
        assert!(!Rect::new(0.9, 0.9, 0.2, 0.2).is_normalized());
        assert!(!Rect::new(-0.1, 0.0, 0.2, 0.2).is_normalized());
    }

    #[test]
    fn test_clamped() {
        let rect = Rect::new(0.9, -0.1, 0.2, 0.3).clamped();
        assert!(rect.is_normalized());
        assert_relative_eq!(rect.x, 0.9, epsilon = 1e-6);
        assert_relative_eq!(rect.width, 0.1, epsilon = 1e-6);
        assert_relative_eq!(rect.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rect.height, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_iou_batch_shape() {
        let a = [Rect::new(0.0, 0.0, 0.1, 0.1)];
        let b = [Rect::new(0.0, 0.0, 0.1, 0.1), Rect::new(0.5, 0.5, 0.1, 0.1)];
        let ious = iou_batch(&a, &b);
        assert_eq!(ious.dim(), (1, 2));
        assert_relative_eq!(ious[[0, 0]], 1.0, epsilon = 1e-6);
        assert_eq!(ious[[0, 1]], 0.0);
    }
}
