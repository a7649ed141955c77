use thiserror::Error;

use crate::quadtree::EntryId;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuadtreeError {
    #[error("point is outside the quadtree bounds (x: {x}, y: {y})")]
    OutOfBounds { x: f32, y: f32 },
    #[error("entry {id:?} is not resident in the quadtree")]
    EntryNotFound { id: EntryId },
    #[error(
        "region must be finite with a positive half size (center_x: {center_x}, center_y: {center_y}, half_size: {half_size})"
    )]
    InvalidRegion {
        center_x: f32,
        center_y: f32,
        half_size: f32,
    },
    #[error("node capacity must be at least 1 (capacity: {capacity})")]
    InvalidCapacity { capacity: usize },
    #[error(
        "rectangle must be finite with non-negative width/height (left: {left}, top: {top}, width: {width}, height: {height})"
    )]
    InvalidRectangleDims {
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    },
    #[error("circle radius must be finite and non-negative (radius: {radius})")]
    InvalidCircleRadius { radius: f32 },
    #[error("quadtree invariant violated at node {node}: {reason}")]
    InvariantViolated { node: u32, reason: &'static str },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;
