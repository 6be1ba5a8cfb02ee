//! Anatomical landmarks and per-frame joint samples.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Landmarks of a 3D human body pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JointName {
    Root,
    Spine,
    CenterShoulder,
    CenterHead,
    TopHead,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl JointName {
    pub const ALL: [JointName; 17] = [
        JointName::Root,
        JointName::Spine,
        JointName::CenterShoulder,
        JointName::CenterHead,
        JointName::TopHead,
        JointName::LeftShoulder,
        JointName::RightShoulder,
        JointName::LeftElbow,
        JointName::RightElbow,
        JointName::LeftWrist,
        JointName::RightWrist,
        JointName::LeftHip,
        JointName::RightHip,
        JointName::LeftKnee,
        JointName::RightKnee,
        JointName::LeftAnkle,
        JointName::RightAnkle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JointName::Root => "root",
            JointName::Spine => "spine",
            JointName::CenterShoulder => "centerShoulder",
            JointName::CenterHead => "centerHead",
            JointName::TopHead => "topHead",
            JointName::LeftShoulder => "leftShoulder",
            JointName::RightShoulder => "rightShoulder",
            JointName::LeftElbow => "leftElbow",
            JointName::RightElbow => "rightElbow",
            JointName::LeftWrist => "leftWrist",
            JointName::RightWrist => "rightWrist",
            JointName::LeftHip => "leftHip",
            JointName::RightHip => "rightHip",
            JointName::LeftKnee => "leftKnee",
            JointName::RightKnee => "rightKnee",
            JointName::LeftAnkle => "leftAnkle",
            JointName::RightAnkle => "rightAnkle",
        }
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown joint name: {0}")]
pub struct ParseJointError(pub String);

impl FromStr for JointName {
    type Err = ParseJointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JointName::ALL
            .iter()
            .copied()
            .find(|j| j.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseJointError(s.to_string()))
    }
}

/// Joint positions of one processed frame.
///
/// A sample is replaced as a whole on every frame; it is never merged with
/// the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointSample {
    joints: BTreeMap<JointName, Point3<f32>>,
}

impl JointSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: JointName, position: Point3<f32>) -> Option<Point3<f32>> {
        self.joints.insert(joint, position)
    }

    pub fn get(&self, joint: JointName) -> Option<&Point3<f32>> {
        self.joints.get(&joint)
    }

    pub fn contains(&self, joint: JointName) -> bool {
        self.joints.contains_key(&joint)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointName, &Point3<f32>)> {
        self.joints.iter().map(|(j, p)| (*j, p))
    }

    /// Mean position of all joints, `None` for an empty sample.
    pub fn centroid(&self) -> Option<Point3<f32>> {
        if self.joints.is_empty() {
            return None;
        }
        let sum = self
            .joints
            .values()
            .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / self.joints.len() as f32))
    }
}

impl FromIterator<(JointName, Point3<f32>)> for JointSample {
    fn from_iter<T: IntoIterator<Item = (JointName, Point3<f32>)>>(iter: T) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}

/// A body pose found in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseObservation {
    pub joints: JointSample,
}

impl PoseObservation {
    pub fn new(joints: JointSample) -> Self {
        Self { joints }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_joint_name() {
        assert_eq!("leftKnee".parse::<JointName>(), Ok(JointName::LeftKnee));
        assert_eq!("TOPHEAD".parse::<JointName>(), Ok(JointName::TopHead));
        assert!("tail".parse::<JointName>().is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for joint in JointName::ALL {
            let json = serde_json::to_string(&joint).unwrap();
            assert_eq!(json, format!("\"{joint}\""));
        }
    }

    #[test]
    fn test_centroid() {
        let sample: JointSample = [
            (JointName::LeftHip, Point3::new(-1.0, 0.0, 0.0)),
            (JointName::RightHip, Point3::new(1.0, 0.0, 2.0)),
        ]
        .into_iter()
        .collect();

        let c = sample.centroid().unwrap();
        assert_relative_eq!(c.x, 0.0);
        assert_relative_eq!(c.z, 1.0);
        assert!(JointSample::new().centroid().is_none());
    }

    #[test]
    fn test_sample_json() {
        let mut sample = JointSample::new();
        sample.insert(JointName::Root, Point3::new(0.0, 1.0, 2.0));
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.starts_with(r#"{"root":"#));
        let back: JointSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}
