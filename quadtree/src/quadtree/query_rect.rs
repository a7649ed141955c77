use super::*;
use crate::error::QuadtreeResult;

#[derive(Clone, Copy, Debug)]
pub(super) enum QueryKind {
    All,
    Rect(RectExtent),
    Square(Region),
    Circle { x: f32, y: f32, radius_sq: f32 },
}

impl QueryKind {
    /// Whether a node's region can hold a match. Must never reject a region
    /// containing a point that `matches` would accept.
    #[inline(always)]
    fn visits(&self, region: &Region) -> bool {
        match self {
            QueryKind::All => true,
            QueryKind::Rect(extent) => extent.intersects_region(region),
            QueryKind::Square(square) => square.overlaps(region),
            QueryKind::Circle { x, y, radius_sq } => {
                region.squared_distance_to_region(*x, *y) <= *radius_sq
            }
        }
    }

    #[inline(always)]
    fn matches(&self, px: f32, py: f32) -> bool {
        match self {
            QueryKind::All => true,
            QueryKind::Rect(extent) => extent.contains_point(px, py),
            QueryKind::Square(square) => square.contains_point(px, py),
            QueryKind::Circle { x, y, radius_sq } => {
                let dx = px - x;
                let dy = py - y;
                dx * dx + dy * dy <= *radius_sq
            }
        }
    }
}

/// Lazy depth-first range query.
///
/// Children are visited in quadrant order, so the output order is
/// deterministic but not sorted by distance. The iterator borrows the tree,
/// which keeps it from being mutated mid-traversal; run the query again to
/// restart from the root.
pub struct Query<'a, T> {
    tree: &'a QuadTree<T>,
    kind: QueryKind,
    stack: NodeStack,
    leaf: std::slice::Iter<'a, u32>,
}

impl<'a, T> Query<'a, T> {
    pub(super) fn new(tree: &'a QuadTree<T>, kind: QueryKind) -> Self {
        let mut stack = NodeStack::new();
        if kind.visits(&tree.nodes[ROOT as usize].region) {
            stack.push(ROOT);
        }
        Self {
            tree,
            kind,
            stack,
            leaf: [].iter(),
        }
    }
}

impl<'a, T> Iterator for Query<'a, T> {
    type Item = EntryRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            for &slot in self.leaf.by_ref() {
                if let Some(entry) = tree.entry_ref(slot) {
                    if self.kind.matches(entry.x, entry.y) {
                        return Some(entry);
                    }
                }
            }

            let node_idx = self.stack.pop()?;
            let node = &tree.nodes[node_idx as usize];
            match &node.kind {
                NodeKind::Leaf { entries } => self.leaf = entries.iter(),
                NodeKind::Internal { children } => {
                    // Reversed so quadrant 0 is popped first.
                    for &child in children.iter().rev() {
                        if self.kind.visits(&tree.nodes[child as usize].region) {
                            self.stack.push(child);
                        }
                    }
                }
            }
        }
    }
}

impl<T> QuadTree<T> {
    /// Entries inside the closed rectangle `[left, left + width] x [top, top + height]`.
    pub fn query_rect(
        &self,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    ) -> QuadtreeResult<Query<'_, T>> {
        let extent = RectExtent::from_left_top(left, top, width, height)?;
        Ok(Query::new(self, QueryKind::Rect(extent)))
    }

    /// Entries inside the closed square centered at `(center_x, center_y)`.
    pub fn query_square(
        &self,
        center_x: f32,
        center_y: f32,
        half_size: f32,
    ) -> QuadtreeResult<Query<'_, T>> {
        let square = Region::new(center_x, center_y, half_size)?;
        Ok(Query::new(self, QueryKind::Square(square)))
    }

    /// Every entry, in depth-first quadrant order.
    pub fn iter(&self) -> Query<'_, T> {
        Query::new(self, QueryKind::All)
    }
}

impl<'a, T> IntoIterator for &'a QuadTree<T> {
    type Item = EntryRef<'a, T>;
    type IntoIter = Query<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
