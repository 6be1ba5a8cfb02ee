//! Temporal smoothing of joint positions.
//!
//! Every coordinate of every joint runs through its own constant-velocity
//! Kalman filter with a one-frame time step.

use std::collections::HashMap;

use nalgebra::{Matrix2, Point3, Vector2};
use serde::{Deserialize, Serialize};

use super::joint::{JointName, JointSample};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub enabled: bool,
    /// Acceleration noise of the constant-velocity model.
    pub process_noise: f32,
    /// Variance of a single joint measurement.
    pub measurement_noise: f32,
    /// Frames a joint may be missing before its filter is dropped.
    pub max_missed_frames: u32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            process_noise: 1e-3,
            measurement_noise: 1e-2,
            max_missed_frames: 5,
        }
    }
}

#[derive(Debug, Clone)]
struct AxisFilter {
    state: Vector2<f32>,
    covariance: Matrix2<f32>,
}

impl AxisFilter {
    fn initiate(position: f32, measurement_noise: f32) -> Self {
        Self {
            state: Vector2::new(position, 0.0),
            covariance: Matrix2::new(measurement_noise, 0.0, 0.0, 1.0),
        }
    }

    fn predict(&mut self, process_noise: f32) {
        let motion = Matrix2::new(1.0, 1.0, 0.0, 1.0);
        let noise = Matrix2::new(0.25, 0.5, 0.5, 1.0) * process_noise;
        self.state = motion * self.state;
        self.covariance = motion * self.covariance * motion.transpose() + noise;
    }

    fn update(&mut self, measurement: f32, measurement_noise: f32) -> f32 {
        // H = [1 0], so S is scalar
        let innovation_cov = self.covariance[(0, 0)] + measurement_noise;
        let gain = self.covariance.column(0) / innovation_cov;
        let innovation = measurement - self.state[0];
        self.state += gain * innovation;
        let correction = gain * self.covariance.row(0);
        self.covariance -= correction;
        self.state[0]
    }
}

#[derive(Debug, Clone)]
struct JointFilter {
    axes: [AxisFilter; 3],
    missed: u32,
}

/// Smooths successive [`JointSample`]s.
#[derive(Debug, Clone, Default)]
pub struct JointSmoother {
    config: SmoothingConfig,
    filters: HashMap<JointName, JointFilter>,
}

impl JointSmoother {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            config,
            filters: HashMap::new(),
        }
    }

    /// Smooth one frame. The result has exactly the joints of `sample`.
    pub fn smooth(&mut self, sample: &JointSample) -> JointSample {
        if !self.config.enabled {
            return sample.clone();
        }

        let max_missed = self.config.max_missed_frames;
        self.filters.retain(|joint, filter| {
            if sample.contains(*joint) {
                return true;
            }
            filter.missed += 1;
            filter.missed <= max_missed
        });

        let SmoothingConfig {
            process_noise,
            measurement_noise,
            ..
        } = self.config;

        sample
            .iter()
            .map(|(joint, position)| {
                let smoothed = match self.filters.get_mut(&joint) {
                    Some(filter) => {
                        // one step per frame since the last measurement
                        let steps = filter.missed + 1;
                        filter.missed = 0;
                        let mut out = [0.0f32; 3];
                        for (i, axis) in filter.axes.iter_mut().enumerate() {
                            for _ in 0..steps {
                                axis.predict(process_noise);
                            }
                            out[i] = axis.update(position[i], measurement_noise);
                        }
                        Point3::new(out[0], out[1], out[2])
                    }
                    None => {
                        let axes = [0, 1, 2]
                            .map(|i| AxisFilter::initiate(position[i], measurement_noise));
                        self.filters.insert(joint, JointFilter { axes, missed: 0 });
                        *position
                    }
                };
                (joint, smoothed)
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.filters.clear();
    }

    /// Number of joints currently carrying filter state.
    pub fn tracked_joints(&self) -> usize {
        self.filters.len()
    }
}
