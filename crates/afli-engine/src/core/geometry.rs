use serde::{Deserialize, Serialize};

/// Point in playfield coordinates.
///
/// The origin is the top-left corner of the playfield; `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn at(position: Position, width: f64, height: f64) -> Self {
        Self::new(position.x, position.y, width, height)
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns `true` if the interiors of the two rectangles intersect.
    ///
    /// Rectangles that merely share an edge do not overlap. Empty rectangles
    /// never overlap anything.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && other.width > 0.0
            && other.height > 0.0
            && self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Something that occupies a point on the playfield.
pub trait HasPosition {
    fn position(&self) -> Position;
}

/// Something that occupies an area on the playfield.
///
/// Collision tests and renderers only ever see entities through this trait.
pub trait HasBoundingBox: HasPosition {
    fn bounding_box(&self) -> Rect;
}

impl HasPosition for Rect {
    fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl HasBoundingBox for Rect {
    fn bounding_box(&self) -> Rect {
        *self
    }
}

/// Rectangle-overlap collision test between two entities.
pub fn collides<A, B>(a: &A, b: &B) -> bool
where
    A: HasBoundingBox + ?Sized,
    B: HasBoundingBox + ?Sized,
{
    a.bounding_box().overlaps(&b.bounding_box())
}

/// Horizontal travel direction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::IsVariant,
)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Returns `-1.0` for [`Direction::Left`] and `+1.0` for [`Direction::Right`].
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The wall an entity travelling in this direction is approaching.
    #[must_use]
    pub const fn approaching_wall(self) -> Wall {
        match self {
            Self::Left => Wall::Left,
            Self::Right => Wall::Right,
        }
    }
}

/// One of the two side walls.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum Wall {
    Left,
    Right,
}

impl Wall {
    pub const ALL: [Wall; 2] = [Wall::Left, Wall::Right];

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Index into two-element per-wall arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// The direction that moves an entity away from this wall.
    #[must_use]
    pub const fn rebound_direction(self) -> Direction {
        match self {
            Self::Left => Direction::Right,
            Self::Right => Direction::Left,
        }
    }
}
