use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Point { x, y } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self { Size { width, height } }
}

/// A screen rectangle in pixels. The y axis grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn perpendicular(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }

    /// Whether the direction points toward increasing coordinates.
    pub fn is_positive(self) -> bool { matches!(self, Direction::Right | Direction::Down) }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self { Rect { origin, size } }

    pub fn from_parts(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect::new(Point::new(x, y), Size::new(width, height))
    }

    pub fn min(&self) -> Point { self.origin }

    pub fn max(&self) -> Point {
        Point::new(self.origin.x + self.size.width, self.origin.y + self.size.height)
    }

    pub fn mid(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min().x && p.x <= self.max().x && p.y >= self.min().y && p.y <= self.max().y
    }

    /// The rect's start coordinate along `orientation`.
    pub fn position(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.origin.x,
            Orientation::Vertical => self.origin.y,
        }
    }

    /// The rect's length along `orientation`.
    pub fn extent(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.size.width,
            Orientation::Vertical => self.size.height,
        }
    }

    /// The coordinate of the face the given direction points at.
    pub fn face(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Left => self.min().x,
            Direction::Right => self.max().x,
            Direction::Up => self.min().y,
            Direction::Down => self.max().y,
        }
    }

    /// Replaces the span along `orientation`, keeping the perpendicular span.
    pub fn with_span(&self, orientation: Orientation, position: f64, extent: f64) -> Rect {
        match orientation {
            Orientation::Horizontal => {
                Rect::from_parts(position, self.origin.y, extent, self.size.height)
            }
            Orientation::Vertical => {
                Rect::from_parts(self.origin.x, position, self.size.width, extent)
            }
        }
    }

    /// Rounds the near and far edges independently so adjacent rects stay
    /// seam-aligned after rounding.
    pub fn round(&self) -> Rect {
        let min_x = self.min().x.round();
        let min_y = self.min().y.round();
        Rect::from_parts(
            min_x,
            min_y,
            self.max().x.round() - min_x,
            self.max().y.round() - min_y,
        )
    }

    pub fn same_as(&self, other: Rect) -> bool {
        fn eq(a: f64, b: f64) -> bool { (a - b).abs() < 1.0 }
        eq(self.origin.x, other.origin.x)
            && eq(self.origin.y, other.origin.y)
            && eq(self.size.width, other.size.width)
            && eq(self.size.height, other.size.height)
    }

    /// Maps this rect proportionally from one enclosing rect into another.
    /// Used to carry floating windows across monitor changes.
    pub fn translate_between(&self, from: Rect, to: Rect) -> Rect {
        if from.size.width <= 0.0 || from.size.height <= 0.0 {
            return *self;
        }
        let sx = to.size.width / from.size.width;
        let sy = to.size.height / from.size.height;
        Rect::from_parts(
            to.origin.x + (self.origin.x - from.origin.x) * sx,
            to.origin.y + (self.origin.y - from.origin.y) * sy,
            self.size.width * sx,
            self.size.height * sy,
        )
    }

    /// Length of the overlap of the two rects' projections onto `orientation`.
    pub fn overlap(&self, other: Rect, orientation: Orientation) -> f64 {
        let lo = self.position(orientation).max(other.position(orientation));
        let hi = (self.position(orientation) + self.extent(orientation))
            .min(other.position(orientation) + other.extent(orientation));
        (hi - lo).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_keeps_seams_aligned() {
        let a = Rect::from_parts(0.0, 0.0, 293.333, 400.0);
        let b = Rect::from_parts(303.333, 0.0, 293.333, 400.0);
        assert_eq!(a.round().size.width, 293.0);
        assert_eq!(b.round().origin.x, 303.0);
        assert_eq!(b.round().size.width, 294.0);
    }

    #[test]
    fn faces_and_extents() {
        let r = Rect::from_parts(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.face(Direction::Left), 10.0);
        assert_eq!(r.face(Direction::Right), 110.0);
        assert_eq!(r.face(Direction::Down), 70.0);
        assert_eq!(r.extent(Orientation::Vertical), 50.0);
    }

    #[test]
    fn proportional_translation() {
        let from = Rect::from_parts(0.0, 0.0, 1000.0, 500.0);
        let to = Rect::from_parts(1000.0, 0.0, 2000.0, 1000.0);
        let r = Rect::from_parts(100.0, 100.0, 200.0, 100.0);
        let t = r.translate_between(from, to);
        assert_eq!(t, Rect::from_parts(1200.0, 200.0, 400.0, 200.0));
    }

    #[test]
    fn overlap_projection() {
        let a = Rect::from_parts(0.0, 0.0, 100.0, 100.0);
        let b = Rect::from_parts(200.0, 50.0, 100.0, 100.0);
        assert_eq!(a.overlap(b, Orientation::Vertical), 50.0);
        assert_eq!(a.overlap(b, Orientation::Horizontal), 0.0);
    }
}
