use crate::error::{QuadtreeError, QuadtreeResult};
use common::shapes::Rectangle;

/// Axis-aligned square described by its center and half size.
///
/// Fields are private so width and height can never drift apart; the only way
/// to obtain a `Region` is [`Region::new`] or [`Region::child`].
///
/// Edges are stored explicitly. A child takes its edges verbatim from the
/// parent's edges and center, so siblings share bit-identical boundaries and
/// every point routed by [`Region::quadrant_of`] lands inside its child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    center_x: f32,
    center_y: f32,
    half_size: f32,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Region {
    pub fn new(center_x: f32, center_y: f32, half_size: f32) -> QuadtreeResult<Self> {
        let invalid = QuadtreeError::InvalidRegion {
            center_x,
            center_y,
            half_size,
        };
        if !(center_x.is_finite() && center_y.is_finite() && half_size.is_finite())
            || half_size <= 0.0
        {
            return Err(invalid);
        }
        let region = Self {
            center_x,
            center_y,
            half_size,
            min_x: center_x - half_size,
            min_y: center_y - half_size,
            max_x: center_x + half_size,
            max_y: center_y + half_size,
        };
        // A half size below the center's precision collapses the square.
        if !(region.min_x < region.max_x && region.min_y < region.max_y) {
            return Err(invalid);
        }
        Ok(region)
    }

    #[inline(always)]
    pub fn center_x(&self) -> f32 {
        self.center_x
    }

    #[inline(always)]
    pub fn center_y(&self) -> f32 {
        self.center_y
    }

    #[inline(always)]
    pub fn half_size(&self) -> f32 {
        self.half_size
    }

    pub fn size(&self) -> f32 {
        self.half_size * 2.0
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.min_x
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.max_x
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.min_y
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.max_y
    }

    /// Closed containment test on both axes.
    #[inline(always)]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Closed overlap test between two squares; touching edges count.
    #[inline(always)]
    pub fn overlaps(&self, other: &Region) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Standard rectangle intersection against a left/top/width/height box.
    /// Rectangles that only share an edge do not overlap.
    pub fn overlaps_rect(&self, left: f32, top: f32, width: f32, height: f32) -> bool {
        self.min_x < left + width
            && self.max_x > left
            && self.min_y < top + height
            && self.max_y > top
    }

    /// Quadrant index of a point relative to the center:
    ///
    /// ```text
    /// ---------
    /// | 0 | 1 |
    /// ---------
    /// | 2 | 3 |
    /// ---------
    /// ```
    ///
    /// Points on a center line belong to the lower index.
    #[inline(always)]
    pub fn quadrant_of(&self, x: f32, y: f32) -> usize {
        let mut quadrant = 0;
        if x > self.center_x {
            quadrant += 1;
        }
        if y > self.center_y {
            quadrant += 2;
        }
        quadrant
    }

    #[inline(always)]
    pub fn squared_distance_to_center(&self, x: f32, y: f32) -> f32 {
        let dx = self.center_x - x;
        let dy = self.center_y - y;
        dx * dx + dy * dy
    }

    /// Minimum squared Euclidean distance from the point to the closed square.
    /// Zero when the point is inside. Never larger than the computed distance
    /// to any point the square contains.
    #[inline(always)]
    pub fn squared_distance_to_region(&self, x: f32, y: f32) -> f32 {
        let dx = f32::max(f32::max(self.min_x - x, x - self.max_x), 0.0);
        let dy = f32::max(f32::max(self.min_y - y, y - self.max_y), 0.0);
        dx * dx + dy * dy
    }

    /// Region of the child occupying `quadrant` (see [`Region::quadrant_of`]).
    #[inline(always)]
    pub fn child(&self, quadrant: usize) -> Region {
        debug_assert!(quadrant < 4, "quadrant {} out of range", quadrant);
        let (min_x, max_x) = if quadrant & 1 == 0 {
            (self.min_x, self.center_x)
        } else {
            (self.center_x, self.max_x)
        };
        let (min_y, max_y) = if quadrant & 2 == 0 {
            (self.min_y, self.center_y)
        } else {
            (self.center_y, self.max_y)
        };
        Region {
            center_x: min_x + (max_x - min_x) * 0.5,
            center_y: min_y + (max_y - min_y) * 0.5,
            half_size: self.half_size * 0.5,
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    #[inline(always)]
    pub fn extent(&self) -> RectExtent {
        RectExtent {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
        }
    }

    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::from_left_top(
            self.min_x,
            self.min_y,
            self.max_x - self.min_x,
            self.max_y - self.min_y,
        )
    }
}

/// Closed axis-aligned box used by range queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectExtent {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl RectExtent {
    pub fn from_left_top(left: f32, top: f32, width: f32, height: f32) -> QuadtreeResult<Self> {
        validate_rect_dims(left, top, width, height)?;
        Ok(Self {
            min_x: left,
            min_y: top,
            max_x: left + width,
            max_y: top + height,
        })
    }

    /// Converts a center-based [`Rectangle`].
    pub fn from_rectangle(rect: &Rectangle) -> QuadtreeResult<Self> {
        Self::from_left_top(rect.left(), rect.top(), rect.width, rect.height)
    }

    #[inline(always)]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    #[inline(always)]
    pub fn intersects_region(&self, region: &Region) -> bool {
        self.min_x <= region.right()
            && self.max_x >= region.left()
            && self.min_y <= region.bottom()
            && self.max_y >= region.top()
    }
}

/// Handle to an entry stored in a [`QuadTree`](super::QuadTree).
///
/// Handles carry a generation, so a handle to a removed entry never aliases an
/// entry inserted later into the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Borrowed view of a resident entry.
#[derive(Debug)]
pub struct EntryRef<'a, T> {
    pub id: EntryId,
    pub x: f32,
    pub y: f32,
    pub payload: &'a T,
}

impl<T> Clone for EntryRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntryRef<'_, T> {}

/// A kNN result: the entry and its squared distance to the query point.
#[derive(Debug)]
pub struct Neighbor<'a, T> {
    pub entry: EntryRef<'a, T>,
    pub distance_sq: f32,
}

impl<T> Clone for Neighbor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Neighbor<'_, T> {}

#[derive(Debug, Clone)]
pub struct Config {
    /// Nodes preallocated in the arena.
    pub pool_size: usize,
    pub node_capacity: usize,
    /// Leaves at this depth keep accepting entries instead of splitting.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pool_size: 256,
            node_capacity: 4,
            max_depth: 8,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateRequest {
    pub id: EntryId,
    pub x: f32,
    pub y: f32,
}

pub(crate) fn validate_rect_dims(
    left: f32,
    top: f32,
    width: f32,
    height: f32,
) -> QuadtreeResult<()> {
    if !(left.is_finite() && top.is_finite() && width.is_finite() && height.is_finite())
        || width < 0.0
        || height < 0.0
    {
        return Err(QuadtreeError::InvalidRectangleDims {
            left,
            top,
            width,
            height,
        });
    }
    Ok(())
}

pub(crate) fn validate_circle_radius(radius: f32) -> QuadtreeResult<()> {
    if !(radius.is_finite() && radius >= 0.0) {
        return Err(QuadtreeError::InvalidCircleRadius { radius });
    }
    Ok(())
}
