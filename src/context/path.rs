use std::f32::consts::{FRAC_PI_2, TAU};

use tiny_skia::{Path, PathBuilder};

use crate::math::Vector2;

/// One path command, in device space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Segment {
    MoveTo(Vector2),
    LineTo(Vector2),
    CubicTo(Vector2, Vector2, Vector2),
    Close,
}

/// The path under construction plus its current point.
#[derive(Clone, Debug, Default)]
pub(crate) struct PathData {
    segments: Vec<Segment>,
    current: Option<Vector2>,
    subpath_start: Option<Vector2>,
}

impl PathData {
    pub fn clear(&mut self) {
        self.segments.clear();
        self.current = None;
        self.subpath_start = None;
    }

    pub fn current_point(&self) -> Option<Vector2> {
        self.current
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn move_to(&mut self, p: Vector2) {
        // Consecutive moves collapse into the last one.
        if let Some(Segment::MoveTo(last)) = self.segments.last_mut() {
            *last = p;
        } else {
            self.segments.push(Segment::MoveTo(p));
        }

        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    pub fn line_to(&mut self, p: Vector2) {
        if self.current.is_none() {
            self.move_to(p);
            return;
        }

        self.reopen_after_close();
        self.segments.push(Segment::LineTo(p));
        self.current = Some(p);
    }

    pub fn cubic_to(&mut self, c1: Vector2, c2: Vector2, p: Vector2) {
        if self.current.is_none() {
            self.move_to(c1);
        }

        self.reopen_after_close();
        self.segments.push(Segment::CubicTo(c1, c2, p));
        self.current = Some(p);
    }

    pub fn close(&mut self) {
        if self.current.is_none() {
            return;
        }

        self.segments.push(Segment::Close);
        self.current = self.subpath_start;
    }

    // Drawing after a close starts a new subpath at the closed one's start.
    fn reopen_after_close(&mut self) {
        if let (Some(Segment::Close), Some(start)) = (self.segments.last(), self.subpath_start) {
            self.segments.push(Segment::MoveTo(start));
        }
    }

    /// Builds a tiny-skia path. Returns `None` when nothing drawable was added.
    pub fn to_path(&self) -> Option<Path> {
        let mut builder = PathBuilder::new();

        for segment in self.segments.iter() {
            match *segment {
                Segment::MoveTo(p) => builder.move_to(p.x, p.y),
                Segment::LineTo(p) => builder.line_to(p.x, p.y),
                Segment::CubicTo(c1, c2, p) => builder.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                Segment::Close => builder.close(),
            }
        }

        builder.finish()
    }
}

/// Brings `end` to at least `start` by adding full turns.
pub(crate) fn normalize_positive_sweep(start: f32, end: f32) -> f32 {
    if end < start {
        start + (end - start).rem_euclid(TAU)
    } else {
        end
    }
}

/// Brings `end` to at most `start` by subtracting full turns.
pub(crate) fn normalize_negative_sweep(start: f32, end: f32) -> f32 {
    if end > start {
        start - (start - end).rem_euclid(TAU)
    } else {
        end
    }
}

/// Approximates a circular arc with cubic bezier curves of at most a
/// quarter turn each.
///
/// Returns the start point followed by `(control1, control2, end)` per
/// segment, all in user space. A sweep of more than one full turn is reduced
/// to one turn plus the remainder.
pub(crate) fn arc_to_cubics(
    center: Vector2,
    radius: f32,
    start: f32,
    end: f32,
) -> (Vector2, Vec<(Vector2, Vector2, Vector2)>) {
    let mut sweep = end - start;
    if sweep.abs() > TAU {
        sweep = sweep.signum() * (TAU + sweep.abs() % TAU);
    }

    let point_at = |angle: f32| {
        Vector2::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    };

    let first = point_at(start);
    let count = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / count as f32;
    let k = 4.0 / 3.0 * (step / 4.0).tan() * radius;

    let mut curves = Vec::with_capacity(count);
    let mut a0 = start;

    for i in 0..count {
        let a1 = if i + 1 == count { start + sweep } else { a0 + step };

        let p0 = point_at(a0);
        let p3 = point_at(a1);
        let c1 = Vector2::new(p0.x - k * a0.sin(), p0.y + k * a0.cos());
        let c2 = Vector2::new(p3.x + k * a1.sin(), p3.y - k * a1.cos());

        curves.push((c1, c2, p3));
        a0 = a1;
    }

    (first, curves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn close(a: Vector2, b: Vector2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn sweeps_are_normalized() {
        assert_eq!(normalize_positive_sweep(1.0, 2.0), 2.0);
        assert!((normalize_positive_sweep(PI, 0.0) - TAU).abs() < 1e-5);
        assert!(normalize_positive_sweep(0.0, -10.0 * TAU - 0.5) >= 0.0);

        assert_eq!(normalize_negative_sweep(2.0, 1.0), 1.0);
        assert!((normalize_negative_sweep(0.0, PI) - (-PI)).abs() < 1e-5);
    }

    #[test]
    fn extreme_angles_normalize_within_one_turn() {
        let end = normalize_positive_sweep(0.0, -1e30);
        assert!((0.0..=TAU).contains(&end));

        let end = normalize_negative_sweep(0.0, 1e30);
        assert!((-TAU..=0.0).contains(&end));

        let end = normalize_positive_sweep(1e30, 0.0);
        assert!(end >= 1e30);
    }

    #[test]
    fn full_circle_uses_four_quarter_curves() {
        let (first, curves) = arc_to_cubics(Vector2::new(10.0, 10.0), 5.0, 0.0, TAU);

        assert_eq!(curves.len(), 4);
        assert!(close(first, Vector2::new(15.0, 10.0)));
        assert!(close(curves[0].2, Vector2::new(10.0, 15.0)));
        assert!(close(curves[1].2, Vector2::new(5.0, 10.0)));
        assert!(close(curves[3].2, first));
    }

    #[test]
    fn quarter_arc_control_points() {
        let (_, curves) = arc_to_cubics(Vector2::ZERO, 1.0, 0.0, FRAC_PI_2);
        let k = 0.552_284_8;

        assert_eq!(curves.len(), 1);
        assert!(close(curves[0].0, Vector2::new(1.0, k)));
        assert!(close(curves[0].1, Vector2::new(k, 1.0)));
        assert!(close(curves[0].2, Vector2::new(0.0, 1.0)));
    }

    #[test]
    fn negative_sweep_runs_counter_clockwise() {
        let (_, curves) = arc_to_cubics(Vector2::ZERO, 1.0, 0.0, -FRAC_PI_2);

        assert_eq!(curves.len(), 1);
        assert!(close(curves[0].2, Vector2::new(0.0, -1.0)));
        assert!(curves[0].0.y < 0.0);
    }

    #[test]
    fn huge_sweeps_are_bounded() {
        let (_, curves) = arc_to_cubics(Vector2::ZERO, 1.0, 0.0, 1000.0 * TAU + 0.1);
        assert!(curves.len() <= 5);
    }

    #[test]
    fn line_without_current_point_moves() {
        let mut path = PathData::default();
        path.line_to(Vector2::new(3.0, 4.0));

        assert_eq!(path.segments(), &[Segment::MoveTo(Vector2::new(3.0, 4.0))]);
        assert_eq!(path.current_point(), Some(Vector2::new(3.0, 4.0)));
        assert!(path.to_path().is_none());
    }

    #[test]
    fn close_returns_to_subpath_start() {
        let mut path = PathData::default();
        path.move_to(Vector2::new(1.0, 1.0));
        path.line_to(Vector2::new(5.0, 1.0));
        path.line_to(Vector2::new(5.0, 5.0));
        path.close();

        assert_eq!(path.current_point(), Some(Vector2::new(1.0, 1.0)));

        path.line_to(Vector2::new(0.0, 9.0));
        assert_eq!(
            &path.segments()[4..],
            &[
                Segment::MoveTo(Vector2::new(1.0, 1.0)),
                Segment::LineTo(Vector2::new(0.0, 9.0)),
            ]
        );

        let built = path.to_path().unwrap();
        assert_eq!(built.bounds().right(), 5.0);
    }

    #[test]
    fn consecutive_moves_collapse() {
        let mut path = PathData::default();
        path.move_to(Vector2::new(1.0, 1.0));
        path.move_to(Vector2::new(2.0, 2.0));

        assert_eq!(path.segments().len(), 1);

        path.clear();
        assert!(path.segments().is_empty());
        assert!(path.current_point().is_none());
    }
}
