//! Fishing rod tether as a cubic Bézier
//!
//! The rod runs from the player's root point to a tip that sits at a fixed
//! offset from the root, pulled off its rest position by a bounded slack as
//! the magnet moves away. The curve is re-sampled every frame into rod
//! segments (drawn with a bending sprite chain) and a coarser line polyline
//! that runs on to the magnet.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{angle_to, rotate_around};
use crate::tuning::{RodTuning, ScavengeTuning};

/// One drawable piece of the rod
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RodSegment {
    /// Start sample of the segment
    pub position: Vec2,
    pub rotation: f32,
    /// Clamped to `[1, sprite_width]`
    pub length: f32,
}

/// Standard cubic Bézier blend
#[inline]
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TetherCurve {
    rod: RodTuning,
    /// Slack is at its maximum once the magnet is this far from the rest tip
    max_magnet_distance: f32,
    root: Vec2,
    root_control: Vec2,
    tip: Vec2,
    tip_control: Vec2,
    points: Vec<Vec2>,
    segments: Vec<RodSegment>,
    line: Vec<Vec2>,
}

impl TetherCurve {
    /// Rod at rest with its root at `root`
    pub fn new(tuning: &ScavengeTuning, root: Vec2) -> Self {
        let rod = tuning.rod.clone();
        let n = rod.resolution.max(1);
        let mut curve = Self {
            rod,
            max_magnet_distance: tuning.line_length,
            root,
            root_control: root,
            tip: root,
            tip_control: root,
            points: vec![root; n + 1],
            segments: vec![RodSegment::default(); n],
            line: Vec::new(),
        };
        let rest = curve.rest_tip();
        curve.update(rest, rest);
        curve
    }

    pub fn set_root(&mut self, root: Vec2) {
        self.root = root;
    }

    pub fn root(&self) -> Vec2 {
        self.root
    }

    /// Unslacked tip: where the tip sits with no magnet pull
    pub fn rest_tip(&self) -> Vec2 {
        self.root + self.rod.tip_offset
    }

    pub fn tip(&self) -> Vec2 {
        self.tip
    }

    pub fn root_control(&self) -> Vec2 {
        self.root_control
    }

    pub fn tip_control(&self) -> Vec2 {
        self.tip_control
    }

    /// Curve samples, root first, tip last
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn segments(&self) -> &[RodSegment] {
        &self.segments
    }

    /// Fishing line polyline from the root to the magnet
    pub fn line(&self) -> &[Vec2] {
        &self.line
    }

    /// Slack of the tip for a magnet at `magnet_pos`
    fn slack(&self, magnet_pos: Vec2) -> Vec2 {
        let rest = self.rest_tip();
        let pull = magnet_pos - rest;
        let dist = pull.length();
        let ratio = if self.max_magnet_distance > 0.0 {
            (dist / self.max_magnet_distance).clamp(0.0, 1.0)
        } else if dist > 0.0 {
            1.0
        } else {
            0.0
        };
        -pull.normalize_or_zero() * ratio * self.rod.tip_max_slop
    }

    /// Recompute control points and samples for this frame's magnet
    ///
    /// `magnet_line_point` is where the line ties onto the magnet head.
    pub fn update(&mut self, magnet_pos: Vec2, magnet_line_point: Vec2) {
        self.root_control = self.root + Vec2::from_angle(self.rod.base_angle) * self.rod.base_flex;
        self.tip = self.rest_tip() + self.slack(magnet_pos);

        let tip_angle = angle_to(self.tip, magnet_line_point);
        self.tip_control = rotate_around(self.tip - Vec2::new(0.0, self.rod.tip_flex), self.tip, tip_angle);

        self.sample_points();
        self.rebuild_segments();
        self.rebuild_line(magnet_line_point);
    }

    fn sample_points(&mut self) {
        let n = self.points.len() - 1;
        for (i, point) in self.points.iter_mut().enumerate() {
            let t = i as f32 / n as f32;
            *point = cubic_bezier(self.root, self.root_control, self.tip_control, self.tip, t);
        }
        // Endpoints exactly, not up to float error
        self.points[0] = self.root;
        self.points[n] = self.tip;
    }

    fn rebuild_segments(&mut self) {
        let max_len = self.rod.sprite_width.max(1.0);
        for (segment, pair) in self.segments.iter_mut().zip(self.points.windows(2)) {
            let delta = pair[1] - pair[0];
            *segment = RodSegment {
                position: pair[0],
                rotation: (-delta.y).atan2(-delta.x),
                length: delta.length().clamp(1.0, max_len),
            };
        }
    }

    fn rebuild_line(&mut self, magnet_line_point: Vec2) {
        let n = self.points.len() - 1;
        let stride = (n / self.rod.line_resolution.max(1)).max(1);
        let hang = Vec2::new(0.0, self.rod.line_offset);

        self.line.clear();
        self.line.push(self.root);
        self.line.extend(
            self.points[1..n]
                .iter()
                .enumerate()
                .filter(|(i, _)| (i + 1) % stride == 0)
                .map(|(_, p)| *p + hang),
        );
        self.line.push(self.tip);
        self.line.push(magnet_line_point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn curve() -> TetherCurve {
        TetherCurve::new(&ScavengeTuning::default(), Vec2::new(100.0, 300.0))
    }

    #[test]
    fn test_bezier_endpoints_and_midpoint() {
        let p0 = Vec2::ZERO;
        let p3 = Vec2::new(30.0, 0.0);
        assert_eq!(cubic_bezier(p0, p0, p3, p3, 0.0), p0);
        assert_eq!(cubic_bezier(p0, p0, p3, p3, 1.0), p3);
        let mid = cubic_bezier(p0, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0), p3, 0.5);
        assert!((mid - Vec2::new(15.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_rest_curve_shape() {
        let c = curve();
        assert_eq!(c.points().len(), 21);
        assert_eq!(c.segments().len(), 20);
        assert_eq!(c.points()[0], c.root());
        assert_eq!(c.points()[20], c.tip());
        // magnet at rest: no slack
        assert!((c.tip() - c.rest_tip()).length() < 1e-5);
        // root, four hanging samples, tip, magnet
        assert_eq!(c.line().len(), 7);
        assert_eq!(c.line()[0], c.root());
        assert!((c.line()[1] - (c.points()[4] + Vec2::new(0.0, 4.0))).length() < 1e-5);
    }

    #[test]
    fn test_segments_clamped_and_oriented() {
        let mut c = curve();
        c.update(Vec2::new(600.0, 500.0), Vec2::new(600.0, 480.0));
        for (segment, pair) in c.segments().iter().zip(c.points().windows(2)) {
            assert!(segment.length >= 1.0 && segment.length <= 16.0);
            assert_eq!(segment.position, pair[0]);
            let d = pair[1] - pair[0];
            assert!((segment.rotation - (-d.y).atan2(-d.x)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_slack_pulls_tip_away_from_magnet() {
        let mut c = curve();
        let rest = c.rest_tip();
        let magnet = rest + Vec2::new(800.0, 0.0);
        c.update(magnet, magnet);
        assert!((c.tip() - (rest - Vec2::new(5.0, 0.0))).length() < 1e-4);

        let half_way = rest + Vec2::new(200.0, 0.0);
        c.update(half_way, half_way);
        assert!((c.tip() - (rest - Vec2::new(2.5, 0.0))).length() < 1e-4);
    }

    #[test]
    fn test_controls_follow_moved_root() {
        let mut c = curve();
        let before = c.root_control();
        c.set_root(Vec2::new(160.0, 300.0));
        let rest = c.rest_tip();
        c.update(rest, rest);
        assert!((c.root_control() - (before + Vec2::new(60.0, 0.0))).length() < 1e-4);
        assert_eq!(c.points()[0], Vec2::new(160.0, 300.0));
        assert_eq!(c.line()[0], Vec2::new(160.0, 300.0));
    }

    #[test]
    fn test_tip_control_faces_magnet() {
        let mut c = curve();
        let rest = c.rest_tip();
        // magnet straight below the tip: control swings to the tip's right
        let magnet = rest + Vec2::new(0.0, 100.0);
        c.update(magnet, magnet);
        let arm = c.tip_control() - c.tip();
        assert!((arm.length() - 25.0).abs() < 1e-3);
        assert!((arm - Vec2::new(25.0, 0.0)).length() < 1e-3);
    }

    proptest! {
        #[test]
        fn tip_slack_is_bounded(x in -3000.0f32..3000.0, y in -3000.0f32..3000.0) {
            let mut c = curve();
            let magnet = Vec2::new(x, y);
            c.update(magnet, magnet);
            prop_assert!(c.tip().distance(c.rest_tip()) <= 5.0 + 1e-4);
            prop_assert_eq!(c.points()[0], c.root());
            prop_assert_eq!(c.points()[20], c.tip());
        }
    }
}
