use super::query_rect::QueryKind;
use super::types::validate_circle_radius;
use super::*;
use crate::error::QuadtreeResult;
use common::shapes::ShapeEnum;

impl<T> QuadTree<T> {
    /// Entries within `radius` of `(x, y)`, boundary included.
    pub fn query_circle(&self, x: f32, y: f32, radius: f32) -> QuadtreeResult<Query<'_, T>> {
        validate_circle_radius(radius)?;
        Ok(Query::new(
            self,
            QueryKind::Circle {
                x,
                y,
                radius_sq: radius * radius,
            },
        ))
    }

    /// Dispatches a shared shape to the matching range query. Rectangles are
    /// center-based, as `common::shapes` defines them.
    pub fn query_shape(&self, shape: &ShapeEnum) -> QuadtreeResult<Query<'_, T>> {
        match shape {
            ShapeEnum::Rectangle(rect) => {
                let extent = RectExtent::from_rectangle(rect)?;
                Ok(Query::new(self, QueryKind::Rect(extent)))
            }
            ShapeEnum::Circle(circle) => self.query_circle(circle.x, circle.y, circle.radius),
        }
    }

    pub fn query_shapes_batch(&self, shapes: &[ShapeEnum]) -> QuadtreeResult<Vec<Vec<EntryId>>> {
        shapes
            .iter()
            .map(|shape| -> QuadtreeResult<Vec<EntryId>> {
                Ok(self.query_shape(shape)?.map(|entry| entry.id).collect())
            })
            .collect()
    }
}
