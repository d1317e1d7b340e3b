//! Placement math for vertices, edge decorations and annotations.

use serde::{Deserialize, Serialize};

/// A point in canvas units (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation toward `other`; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Point, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Distance from the destination center at which the arrowhead sits,
/// just outside the vertex outline.
const ARROW_BACKOFF: f64 = 30.0;

/// Vertical lift of the weight label above the edge midpoint.
const WEIGHT_LIFT: f64 = 15.0;

/// Center and rotation (degrees) of the arrowhead of a directed edge.
pub fn arrowhead_placement(from: Point, to: Point) -> (Point, f64) {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let center = Point::new(
        to.x - angle.cos() * ARROW_BACKOFF,
        to.y - angle.sin() * ARROW_BACKOFF,
    );
    (center, angle.to_degrees() + 90.0)
}

/// Anchor of the weight label of an edge.
pub fn weight_label_anchor(from: Point, to: Point) -> Point {
    from.midpoint(to).offset(0.0, -WEIGHT_LIFT)
}

/// Corners of a `size`×`size` triangle pointing up, rotated `angle_deg`
/// clockwise around `center`.
pub fn triangle_points(center: Point, size: f64, angle_deg: f64) -> [Point; 3] {
    let half = size / 2.0;
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    [(0.0, -half), (half, half), (-half, half)].map(|(x, y)| {
        Point::new(center.x + x * cos - y * sin, center.y + x * sin + y * cos)
    })
}

/// Side of a vertex an annotation is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl AnnotationPosition {
    /// Recognized names map to their side; anything else falls back to top.
    pub fn parse_or_top(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Top,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Pixel offset from the vertex center.
    pub fn offset(self) -> (f64, f64) {
        match self {
            Self::Top => (0.0, -40.0),
            Self::Bottom => (0.0, 60.0),
            Self::Left => (-80.0, 0.0),
            Self::Right => (80.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn lerp_clamps() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 20.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 10.0));
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
    }

    #[test]
    fn arrowhead_backs_off_from_destination() {
        let (center, angle) = arrowhead_placement(Point::new(100.0, 100.0), Point::new(300.0, 100.0));
        assert!(approx(center.x, 270.0));
        assert!(approx(center.y, 100.0));
        assert!(approx(angle, 90.0));

        let (center, angle) = arrowhead_placement(Point::new(100.0, 300.0), Point::new(100.0, 100.0));
        assert!(approx(center.x, 100.0));
        assert!(approx(center.y, 130.0));
        assert!(approx(angle, 0.0));
    }

    #[test]
    fn triangle_tip_follows_rotation() {
        let [tip, ..] = triangle_points(Point::new(50.0, 50.0), 12.0, 0.0);
        assert!(approx(tip.x, 50.0) && approx(tip.y, 44.0));

        // An edge heading right gets angle 90: the tip points right.
        let [tip, ..] = triangle_points(Point::new(50.0, 50.0), 12.0, 90.0);
        assert!(approx(tip.x, 56.0) && approx(tip.y, 50.0));
    }

    #[test]
    fn weight_label_sits_above_midpoint() {
        let p = weight_label_anchor(Point::new(200.0, 200.0), Point::new(400.0, 200.0));
        assert_eq!(p, Point::new(300.0, 185.0));
    }

    #[test]
    fn unknown_position_falls_back_to_top() {
        assert_eq!(AnnotationPosition::parse_or_top("left"), AnnotationPosition::Left);
        assert_eq!(AnnotationPosition::parse_or_top(" Bottom "), AnnotationPosition::Bottom);
        assert_eq!(AnnotationPosition::parse_or_top("northeast"), AnnotationPosition::Top);
        assert_eq!(AnnotationPosition::parse_or_top(""), AnnotationPosition::Top);
    }
}
