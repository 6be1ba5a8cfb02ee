//! Track to detection association.

use ndarray::Array2;
use tracing::warn;

use crate::detection::Rect;

/// Cost assigned to padding cells of the square assignment problem.
const PADDING_COST: f64 = 1e6;

/// Compute the IoU distance (`1 - IoU`) matrix between tracks and detections.
pub fn iou_distance(track_boxes: &[Rect], det_boxes: &[Rect]) -> Array2<f32> {
    crate::detection::iou_batch(track_boxes, det_boxes).mapv(|iou| 1.0 - iou)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    /// `(track index, detection index)` pairs.
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Solve the assignment problem on `cost_matrix`, rejecting pairs costlier than `thresh`.
pub fn linear_assignment(cost_matrix: &Array2<f32>, thresh: f32) -> Assignment {
    let (num_rows, num_cols) = cost_matrix.dim();
    if num_rows == 0 || num_cols == 0 {
        return Assignment {
            matches: vec![],
            unmatched_tracks: (0..num_rows).collect(),
            unmatched_detections: (0..num_cols).collect(),
        };
    }

    // lapjv needs a square matrix
    let size = num_rows.max(num_cols);
    let padded = Array2::from_shape_fn((size, size), |(i, j)| {
        if i < num_rows && j < num_cols {
            cost_matrix[[i, j]] as f64
        } else {
            PADDING_COST
        }
    });

    let row_to_col = match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => row_to_col,
        Err(err) => {
            warn!(?err, "assignment solver failed, leaving everything unmatched");
            return Assignment {
                matches: vec![],
                unmatched_tracks: (0..num_rows).collect(),
                unmatched_detections: (0..num_cols).collect(),
            };
        }
    };

    let mut result = Assignment::default();
    let mut detection_free = vec![true; num_cols];
    for (row, &col) in row_to_col.iter().enumerate().take(num_rows) {
        if col < num_cols && cost_matrix[[row, col]] <= thresh {
            result.matches.push((row, col));
            detection_free[col] = false;
        } else {
            result.unmatched_tracks.push(row);
        }
    }
    result.unmatched_detections = detection_free
        .iter()
        .enumerate()
        .filter_map(|(i, &free)| free.then_some(i))
        .collect();
    result
}
