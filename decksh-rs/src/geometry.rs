//! Plane geometry behind the computed shapes: polar coordinates, range
//! mapping, arrowheads and braces.
//!
//! Angles passed in and out of these functions are radians; conversion from
//! the script's degrees happens in the assignment evaluator.

use std::f64::consts::PI;

/// Notch depth of curved-arrow heads, as a fraction of the head length.
pub const STD_NOTCH: f64 = 0.75;

/// A point in deck coordinates (percent of the canvas).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub fn radians(degrees: f64) -> f64 {
    degrees * (PI / 180.0)
}

/// Polar → Cartesian around centre `(cx, cy)`.
pub fn polar(cx: f64, cy: f64, r: f64, theta: f64) -> Point {
    Point::new(cx + r * theta.cos(), cy + r * theta.sin())
}

/// Map `value` from `[low1, high1]` onto `[low2, high2]`.
pub fn vmap(value: f64, low1: f64, high1: f64, low2: f64, high2: f64) -> f64 {
    low2 + (high2 - low2) * (value - low1) / (high1 - low1)
}

/// Length and angle of the segment from `(x1, y1)` to `(x2, y2)`.
pub fn distance_angle(x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64) {
    let dx = x2 - x1;
    let dy = y2 - y1;
    ((dx * dx + dy * dy).sqrt(), dy.atan2(dx))
}

// ── Arrowheads ────────────────────────────────────────────────────────────────

/// The four corners of an arrowhead polygon: tip, one barb, the notch where
/// the shaft joins, the other barb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    pub tip: Point,
    pub left: Point,
    pub notch: Point,
    pub right: Point,
}

impl Arrowhead {
    pub fn points(&self) -> [Point; 4] {
        [self.tip, self.left, self.notch, self.right]
    }
}

/// Head of a straight arrow from `(x1, y1)` to `(x2, y2)` with head width
/// `aw` and height `ah`.
pub fn straight_arrowhead(x1: f64, y1: f64, x2: f64, y2: f64, aw: f64, ah: f64) -> Arrowhead {
    let (r, t) = distance_angle(x1, y1, x2, y2);
    let n = r - aw * 0.75;
    let (_, nt) = distance_angle(x1, y1, x1 + n, y1 + ah / 2.0);
    Arrowhead {
        tip: polar(x1, y1, r, t),
        left: polar(x1, y1, r - aw, t + nt),
        notch: polar(x1, y1, n, t),
        right: polar(x1, y1, r - aw, t - nt),
    }
}

/// Which way an axis-aligned arrowhead points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Direction named by a keyword's first letter (`l`, `r`, `u`, `d`).
    pub fn from_initial(keyword: &str) -> Option<Self> {
        match keyword.chars().next()? {
            'l' => Some(Self::Left),
            'r' => Some(Self::Right),
            'u' => Some(Self::Up),
            'd' => Some(Self::Down),
            _ => None,
        }
    }
}

/// Axis-aligned arrowhead with its tip at `(x, y)`.
pub fn axis_arrowhead(x: f64, y: f64, aw: f64, ah: f64, notch: f64, dir: Direction) -> Arrowhead {
    let tip = Point::new(x, y);
    match dir {
        Direction::Right => Arrowhead {
            tip,
            left: Point::new(x - aw, y + ah / 2.0),
            notch: Point::new(x - aw * notch, y),
            right: Point::new(x - aw, y - ah / 2.0),
        },
        Direction::Left => Arrowhead {
            tip,
            left: Point::new(x + aw, y + ah / 2.0),
            notch: Point::new(x + aw * notch, y),
            right: Point::new(x + aw, y - ah / 2.0),
        },
        Direction::Up => Arrowhead {
            tip,
            left: Point::new(x + aw / 2.0, y - ah),
            notch: Point::new(x, y - ah * notch),
            right: Point::new(x - aw / 2.0, y - ah),
        },
        Direction::Down => Arrowhead {
            tip,
            left: Point::new(x + aw / 2.0, y + ah),
            notch: Point::new(x, y + ah * notch),
            right: Point::new(x - aw / 2.0, y + ah),
        },
    }
}

// ── Braces ────────────────────────────────────────────────────────────────────

/// One stroke of a brace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Quadratic curve: start, control, end.
    Curve(Point, Point, Point),
    Line(Point, Point),
}

/// The six strokes of a brace whose point sits at `(x, y)`.
///
/// `size` is the span of the brace, `aw`/`ah` the width and height of its
/// arms.  Left and right braces emit four curves then two connecting lines;
/// up and down braces emit two curves, two lines, then the end curves.
pub fn brace(x: f64, y: f64, size: f64, aw: f64, ah: f64, dir: Direction) -> [Segment; 6] {
    use Segment::{Curve, Line};
    let p = Point::new;
    match dir {
        Direction::Left | Direction::Right => {
            let sign = if dir == Direction::Left { 1.0 } else { -1.0 };
            let h2 = size / 2.0;
            let linelen = h2 - ah / 2.0;
            let xshift = x + sign * aw / 2.0;
            let xend = x + sign * aw;
            [
                Curve(p(x, y), p(xshift, y), p(xshift, y + ah)),
                Curve(p(x, y), p(xshift, y), p(xshift, y - ah)),
                Curve(p(xshift, y + linelen), p(xshift, y + h2), p(xend, y + h2)),
                Curve(p(xshift, y - linelen), p(xshift, y - h2), p(xend, y - h2)),
                Line(p(xshift, y + ah), p(xshift, y + linelen)),
                Line(p(xshift, y - ah), p(xshift, y - linelen)),
            ]
        }
        Direction::Up | Direction::Down => {
            let sign = if dir == Direction::Up { -1.0 } else { 1.0 };
            let linelen = size / 2.0 - aw;
            let yshift = y + sign * ah;
            let yend = y + sign * 2.0 * ah;
            [
                Curve(p(x, y), p(x, yshift), p(x + aw, yshift)),
                Curve(p(x, y), p(x, yshift), p(x - aw, yshift)),
                Line(p(x + aw, yshift), p(x + linelen, yshift)),
                Line(p(x - aw, yshift), p(x - linelen, yshift)),
                Curve(p(x + linelen, yshift), p(x + linelen + aw, yshift), p(x + linelen + aw, yend)),
                Curve(p(x - linelen, yshift), p(x - linelen - aw, yshift), p(x - linelen - aw, yend)),
            ]
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn polar_cardinal_points() {
        let p = polar(50.0, 50.0, 10.0, 0.0);
        assert!(close(p.x, 60.0) && close(p.y, 50.0));
        let p = polar(50.0, 50.0, 10.0, radians(90.0));
        assert!(close(p.x, 50.0) && close(p.y, 60.0));
    }

    #[test]
    fn vmap_linear() {
        assert_eq!(vmap(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_eq!(vmap(0.0, 0.0, 1.0, 20.0, 30.0), 20.0);
    }

    #[test]
    fn straight_arrowhead_points_along_line() {
        let head = straight_arrowhead(10.0, 50.0, 90.0, 50.0, 3.0, 3.0);
        assert!(close(head.tip.x, 90.0) && close(head.tip.y, 50.0));
        assert!(close(head.notch.x, 90.0 - 2.25) && close(head.notch.y, 50.0));
        // barbs are mirror images across the shaft
        assert!(close(head.left.x, head.right.x));
        assert!(close(head.left.y - 50.0, 50.0 - head.right.y));
    }

    #[test]
    fn axis_arrowhead_right() {
        let head = axis_arrowhead(80.0, 40.0, 4.0, 2.0, STD_NOTCH, Direction::Right);
        assert_eq!(head.left, Point::new(76.0, 41.0));
        assert_eq!(head.notch, Point::new(77.0, 40.0));
        assert_eq!(head.right, Point::new(76.0, 39.0));
    }

    #[test]
    fn axis_arrowhead_down() {
        let head = axis_arrowhead(50.0, 10.0, 2.0, 4.0, STD_NOTCH, Direction::Down);
        assert_eq!(head.left, Point::new(51.0, 14.0));
        assert_eq!(head.notch, Point::new(50.0, 13.0));
        assert_eq!(head.right, Point::new(49.0, 14.0));
    }

    #[test]
    fn direction_from_keyword() {
        assert_eq!(Direction::from_initial("lbrace"), Some(Direction::Left));
        assert_eq!(Direction::from_initial("dcarrow"), Some(Direction::Down));
        assert_eq!(Direction::from_initial("xbrace"), None);
        assert_eq!(Direction::from_initial(""), None);
    }

    #[test]
    fn left_brace_layout() {
        let segs = brace(10.0, 50.0, 20.0, 4.0, 2.0, Direction::Left);
        assert_eq!(
            segs[0],
            Segment::Curve(Point::new(10.0, 50.0), Point::new(12.0, 50.0), Point::new(12.0, 52.0))
        );
        assert_eq!(
            segs[2],
            Segment::Curve(Point::new(12.0, 59.0), Point::new(12.0, 60.0), Point::new(14.0, 60.0))
        );
        assert_eq!(segs[5], Segment::Line(Point::new(12.0, 48.0), Point::new(12.0, 41.0)));
    }

    #[test]
    fn up_brace_layout() {
        let segs = brace(50.0, 50.0, 20.0, 2.0, 3.0, Direction::Up);
        assert_eq!(segs[2], Segment::Line(Point::new(52.0, 47.0), Point::new(58.0, 47.0)));
        assert_eq!(
            segs[4],
            Segment::Curve(Point::new(58.0, 47.0), Point::new(60.0, 47.0), Point::new(60.0, 44.0))
        );
    }
}
