// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Mapping decoded poses onto the source frame for drawing.
//!
//! Decoded positions live in model-input pixels with a top-left origin. A
//! renderer usually wants source-frame pixels with a bottom-left origin,
//! mirrored horizontally for webcam input, and only keypoints above a
//! confidence cut-off.

use serde::Serialize;

use crate::keypoint::{Point, Pose, NUM_KEYPOINTS};
use crate::skeleton::{LimbGroup, DISPLAY_SKELETON, LIMB_GROUPS};

/// Source frame geometry and display options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Model-input to source-frame scale factor.
    pub scale: f32,
    /// Source frame width in pixels.
    pub source_width: f32,
    /// Source frame height in pixels.
    pub source_height: f32,
    /// Mirror x, as for a front-facing camera.
    pub mirror: bool,
    /// Minimum confidence to show a keypoint, in percent (0 to 100).
    pub min_confidence: f32,
}

impl Projection {
    /// Projection for a source frame and the model input it was resized to.
    #[must_use]
    pub fn new(source: (usize, usize), input: (usize, usize)) -> Self {
        Self {
            scale: display_scale(source, input),
            source_width: source.0 as f32,
            source_height: source.1 as f32,
            mirror: false,
            min_confidence: 70.0,
        }
    }

    /// Enable or disable horizontal mirroring.
    #[must_use]
    pub const fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Set the visibility cut-off in percent.
    #[must_use]
    pub const fn with_min_confidence(mut self, percent: f32) -> Self {
        self.min_confidence = percent;
        self
    }

    /// Map one model-input point into the source frame.
    #[must_use]
    pub fn project_point(&self, point: Point) -> Point {
        let x = point.x * self.scale;
        let y = self.source_height - point.y * self.scale;
        let x = if self.mirror { self.source_width - x } else { x };
        Point::new(x, y)
    }

    /// Project every keypoint of a pose.
    #[must_use]
    pub fn project_pose(&self, pose: &Pose) -> [ScreenKeypoint; NUM_KEYPOINTS] {
        let threshold = self.min_confidence / 100.0;
        std::array::from_fn(|id| {
            let kpt = pose[id];
            ScreenKeypoint {
                id,
                name: kpt.name(),
                position: self.project_point(kpt.position),
                visible: kpt.score >= threshold,
            }
        })
    }
}

/// Scale between the model input and the source frame, from their shorter sides.
#[must_use]
pub fn display_scale(source: (usize, usize), input: (usize, usize)) -> f32 {
    let input_min = input.0.min(input.1);
    if input_min == 0 {
        return 1.0;
    }
    source.0.min(source.1) as f32 / input_min as f32
}

/// A keypoint placed in the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenKeypoint {
    /// Part id.
    pub id: usize,
    /// Part name.
    pub name: &'static str,
    /// Position in source-frame pixels.
    pub position: Point,
    /// Whether the keypoint clears the confidence cut-off.
    pub visible: bool,
}

/// A drawable line between two visible keypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    /// Start position.
    pub from: Point,
    /// End position.
    pub to: Point,
    /// Colour group.
    pub group: LimbGroup,
}

/// Display skeleton lines whose endpoints are both visible.
#[must_use]
pub fn visible_bones(keypoints: &[ScreenKeypoint; NUM_KEYPOINTS]) -> Vec<Bone> {
    DISPLAY_SKELETON
        .iter()
        .zip(LIMB_GROUPS)
        .filter_map(|(&(a, b), group)| {
            let (start, end) = (&keypoints[a], &keypoints[b]);
            (start.visible && end.visible).then_some(Bone {
                from: start.position,
                to: end.position,
                group,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::Keypoint;

    #[test]
    fn test_display_scale() {
        assert!((display_scale((1280, 720), (455, 256)) - 720.0 / 256.0).abs() < 1e-6);
        assert!((display_scale((640, 480), (0, 0)) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_project_point_flip_and_mirror() {
        let proj = Projection {
            scale: 2.0,
            source_width: 640.0,
            source_height: 480.0,
            mirror: false,
            min_confidence: 70.0,
        };
        assert_eq!(proj.project_point(Point::new(10.0, 20.0)), Point::new(20.0, 440.0));

        let mirrored = proj.with_mirror(true);
        assert_eq!(mirrored.project_point(Point::new(10.0, 20.0)), Point::new(620.0, 440.0));
    }

    #[test]
    fn test_visibility_and_bones() {
        let mut pose = Pose::empty();
        pose[5] = Keypoint::new(0.9, Point::new(10.0, 10.0), 5);
        pose[7] = Keypoint::new(0.8, Point::new(10.0, 30.0), 7);
        pose[9] = Keypoint::new(0.5, Point::new(10.0, 50.0), 9);

        let proj = Projection::new((100, 100), (100, 100)).with_min_confidence(70.0);
        let screen = proj.project_pose(&pose);
        assert!(screen[5].visible && screen[7].visible);
        assert!(!screen[9].visible);
        assert_eq!(screen[7].name, "leftElbow");

        let bones = visible_bones(&screen);
        assert_eq!(bones.len(), 1);
        assert_eq!(bones[0].group, LimbGroup::Arm);
        assert_eq!(bones[0].from, Point::new(10.0, 90.0));
        assert_eq!(bones[0].to, Point::new(10.0, 70.0));
    }
}
