use std::fmt;

/// Grid position reported by a robot.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    #[inline]
    pub fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    /// True once the robot stands on the pickup cell.
    #[inline]
    pub fn is_origin(&self) -> bool {
        *self == Point::ORIGIN
    }
}

impl fmt::Display for Point {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Facing of a robot on the grid. `Unknown` only occurs before the
/// navigator has inferred an initial heading; once cardinal, the heading
/// changes by 90 degree turns only.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
    Unknown,
}

impl Heading {
    /// Heading after a left turn. Total; `Unknown` is a fixed point.
    #[inline]
    pub fn turn_left(self) -> Heading {
        match self {
            Heading::Up => Heading::Left,
            Heading::Left => Heading::Down,
            Heading::Down => Heading::Right,
            Heading::Right => Heading::Up,
            Heading::Unknown => Heading::Unknown,
        }
    }

    /// Heading after a right turn. Total; `Unknown` is a fixed point.
    #[inline]
    pub fn turn_right(self) -> Heading {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
            Heading::Unknown => Heading::Unknown,
        }
    }

    /// Infers the heading from two consecutive position reports. Anything
    /// other than a unit step (an obstacle, or a nonsensical jump) maps to
    /// `Unknown` and sends the navigator back into acquisition.
    #[inline]
    pub fn between(prev: Point, next: Point) -> Heading {
        match (next.x - prev.x, next.y - prev.y) {
            (0, 1) => Heading::Up,
            (0, -1) => Heading::Down,
            (-1, 0) => Heading::Left,
            (1, 0) => Heading::Right,
            _ => Heading::Unknown,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Heading::Up => "UP",
            Heading::Down => "DOWN",
            Heading::Left => "LEFT",
            Heading::Right => "RIGHT",
            Heading::Unknown => "UNKNOWN",
        };

        write!(f, "{}", name)
    }
}

/// Per-session robot state, created by a successful handshake. The
/// position fields are meaningless until the navigator's first fix.
#[derive(Debug)]
pub struct Robot {
    pub username: String,
    pub key_id: u8,
    pub pos: Point,
    pub prev: Point,
    pub heading: Heading,
}

impl Robot {
    pub fn new(username: String, key_id: u8) -> Robot {
        Robot {
            username,
            key_id,
            pos: Point::ORIGIN,
            prev: Point::ORIGIN,
            heading: Heading::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDINALS: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    #[test]
    fn test_left_then_right_is_identity() {
        for heading in &CARDINALS {
            assert_eq!(heading.turn_left().turn_right(), *heading);
            assert_eq!(heading.turn_right().turn_left(), *heading);
        }
    }

    #[test]
    fn test_four_lefts_make_a_circle() {
        for heading in &CARDINALS {
            assert_eq!(
                heading.turn_left().turn_left().turn_left().turn_left(),
                *heading
            );
        }
    }

    #[test]
    fn test_unknown_is_a_fixed_point() {
        assert_eq!(Heading::Unknown.turn_left(), Heading::Unknown);
        assert_eq!(Heading::Unknown.turn_right(), Heading::Unknown);
    }

    #[test]
    fn test_heading_between_unit_steps() {
        let origin = Point::ORIGIN;

        assert_eq!(Heading::between(origin, Point::new(0, 1)), Heading::Up);
        assert_eq!(Heading::between(origin, Point::new(0, -1)), Heading::Down);
        assert_eq!(Heading::between(origin, Point::new(-1, 0)), Heading::Left);
        assert_eq!(Heading::between(origin, Point::new(1, 0)), Heading::Right);
    }

    #[test]
    fn test_heading_between_degenerate_steps() {
        let origin = Point::ORIGIN;

        assert_eq!(Heading::between(origin, origin), Heading::Unknown);
        assert_eq!(Heading::between(origin, Point::new(2, 0)), Heading::Unknown);
        assert_eq!(Heading::between(origin, Point::new(1, 1)), Heading::Unknown);
    }

    #[test]
    fn test_origin_check() {
        assert!(Point::new(0, 0).is_origin());
        assert!(!Point::new(0, 1).is_origin());
    }
}
