//! Constant-velocity Kalman filter over XYAH boxes.
//!
//! State is `[cx, cy, a, h, vx, vy, va, vh]`; only the first four
//! components are observed.

use ndarray::{Array1, Array2};

/// Lower bound on the box height used to scale the noise terms, so that
/// degenerate boxes still give an invertible innovation covariance.
const MIN_NOISE_HEIGHT: f64 = 1e-3;

/// Mean and covariance of one track.
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanState {
    pub mean: Array1<f64>,
    pub covariance: Array2<f64>,
}

impl KalmanState {
    /// Observed part of the mean as `[cx, cy, a, h]`.
    pub fn xyah(&self) -> [f64; 4] {
        [self.mean[0], self.mean[1], self.mean[2], self.mean[3]]
    }

    /// Center velocity in normalized units per frame.
    pub fn velocity(&self) -> (f64, f64) {
        (self.mean[4], self.mean[5])
    }
}

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
    std_weight_position: f64,
    std_weight_velocity: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let ndim = 4;
        let mut motion_mat = Array2::eye(2 * ndim);
        for i in 0..ndim {
            motion_mat[[i, ndim + i]] = 1.0;
        }

        let mut update_mat = Array2::zeros((ndim, 2 * ndim));
        for i in 0..ndim {
            update_mat[[i, i]] = 1.0;
        }

        Self {
            motion_mat,
            update_mat,
            std_weight_position: 1.0 / 20.0,
            std_weight_velocity: 1.0 / 160.0,
        }
    }

    fn diag(std: &[f64]) -> Array2<f64> {
        Array2::from_diag(&Array1::from_iter(std.iter().map(|s| s * s)))
    }

    /// Start a track from an unassociated measurement.
    pub fn initiate(&self, measurement: [f64; 4]) -> KalmanState {
        let mut mean = Array1::zeros(8);
        for (i, m) in measurement.iter().enumerate() {
            mean[i] = *m;
        }

        let h = measurement[3].max(MIN_NOISE_HEIGHT);
        let pos = 2.0 * self.std_weight_position * h;
        let vel = 10.0 * self.std_weight_velocity * h;
        let covariance = Self::diag(&[pos, pos, 1e-2, pos, vel, vel, 1e-5, vel]);

        KalmanState { mean, covariance }
    }

    /// Advance the state by one frame.
    pub fn predict(&self, state: &KalmanState) -> KalmanState {
        let h = state.mean[3].max(MIN_NOISE_HEIGHT);
        let pos = self.std_weight_position * h;
        let vel = self.std_weight_velocity * h;
        let motion_cov = Self::diag(&[pos, pos, 1e-2, pos, vel, vel, 1e-5, vel]);

        KalmanState {
            mean: self.motion_mat.dot(&state.mean),
            covariance: self
                .motion_mat
                .dot(&state.covariance)
                .dot(&self.motion_mat.t())
                + motion_cov,
        }
    }

    /// Project the state into measurement space.
    pub fn project(&self, state: &KalmanState) -> (Array1<f64>, Array2<f64>) {
        let h = state.mean[3].max(MIN_NOISE_HEIGHT);
        let pos = self.std_weight_position * h;
        let innovation_cov = Self::diag(&[pos, pos, 1e-1, pos]);

        let mean = self.update_mat.dot(&state.mean);
        let covariance =
            self.update_mat.dot(&state.covariance).dot(&self.update_mat.t()) + innovation_cov;
        (mean, covariance)
    }

    /// Correct the state with a new measurement.
    ///
    /// Returns `None` when the innovation covariance is singular.
    pub fn update(&self, state: &KalmanState, measurement: [f64; 4]) -> Option<KalmanState> {
        let (projected_mean, projected_cov) = self.project(state);
        let innovation = Array1::from_vec(measurement.to_vec()) - projected_mean;

        // K = P * H^T * S^-1
        let s_inv = invert_4x4(&projected_cov)?;
        let pht = state.covariance.dot(&self.update_mat.t());
        let kalman_gain = pht.dot(&s_inv);

        Some(KalmanState {
            mean: &state.mean + &kalman_gain.dot(&innovation),
            covariance: &state.covariance - &kalman_gain.dot(&projected_cov).dot(&kalman_gain.t()),
        })
    }
}

/// 4x4 inverse through nalgebra, avoiding a BLAS/LAPACK dependency.
fn invert_4x4(m: &Array2<f64>) -> Option<Array2<f64>> {
    let nm = nalgebra::Matrix4::from_fn(|i, j| m[[i, j]]);
    let inv = nm.try_inverse()?;
    Some(Array2::from_shape_fn((4, 4), |(i, j)| inv[(i, j)]))
}
