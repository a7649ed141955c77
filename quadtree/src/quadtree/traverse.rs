use super::*;
use crate::error::{QuadtreeError, QuadtreeResult};
use smallvec::smallvec;

impl<T> QuadTree<T> {
    /// Visits every node region and every entry in depth-first pre-order.
    /// A node's region is reported before its entries, children in quadrant
    /// order. This is the hook renderers use to draw the tree.
    pub fn traverse<'a, F, G>(&'a self, mut on_entry: F, mut on_node: G)
    where
        F: FnMut(EntryRef<'a, T>),
        G: FnMut(&Region),
    {
        let mut stack: NodeStack = smallvec![ROOT];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            on_node(&node.region);
            match &node.kind {
                NodeKind::Leaf { entries } => {
                    for &slot in entries {
                        if let Some(entry) = self.entry_ref(slot) {
                            on_entry(entry);
                        }
                    }
                }
                NodeKind::Internal { children } => {
                    stack.extend(children.iter().rev().copied());
                }
            }
        }
    }

    pub fn all_node_regions(&self, regions: &mut Vec<Region>) {
        self.traverse(|_| {}, |region| regions.push(*region));
    }

    pub fn all_entries<'a>(&'a self, entries: &mut Vec<EntryRef<'a, T>>) {
        entries.extend(self.iter());
    }

    /// Entries sharing the leaf that owns `id`, excluding `id` itself.
    pub fn leaf_neighbours(&self, id: EntryId) -> Option<impl Iterator<Item = EntryRef<'_, T>>> {
        let owner = self.entry(id)?.owner;
        Some(
            self.nodes[owner as usize]
                .entries()
                .iter()
                .filter(move |&&slot| slot != id.index)
                .filter_map(move |&slot| self.entry_ref(slot)),
        )
    }

    /// Walks the whole tree and checks its structural invariants. Every entry
    /// must sit inside the leaf it points back at. Internal nodes must be tiled
    /// exactly by their four children.
    pub fn validate(&self) -> QuadtreeResult<()> {
        let violation =
            |node: u32, reason: &'static str| QuadtreeError::InvariantViolated { node, reason };

        let root = &self.nodes[ROOT as usize];
        if root.parent.is_some() || root.depth != 0 {
            return Err(violation(ROOT, "root has a parent or a non-zero depth"));
        }

        let mut resident = 0usize;
        let mut stack: NodeStack = smallvec![ROOT];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            match &node.kind {
                NodeKind::Leaf { entries } => {
                    if entries.len() > self.config.node_capacity
                        && (node.depth as usize) < self.config.max_depth
                    {
                        return Err(violation(
                            node_idx,
                            "leaf exceeds capacity below the depth cap",
                        ));
                    }
                    for &slot in entries {
                        let Some(entry) = self
                            .slots
                            .get(slot as usize)
                            .and_then(|slot| slot.entry.as_ref())
                        else {
                            return Err(violation(node_idx, "leaf references a vacant entry slot"));
                        };
                        if entry.owner != node_idx {
                            return Err(violation(
                                node_idx,
                                "entry owner does not point at its leaf",
                            ));
                        }
                        if !node.region.contains_point(entry.x, entry.y) {
                            return Err(violation(node_idx, "entry lies outside its leaf region"));
                        }
                    }
                    resident += entries.len();
                }
                NodeKind::Internal { children } => {
                    for (quadrant, &child) in children.iter().enumerate() {
                        let Some(child_node) = self.nodes.get(child as usize) else {
                            return Err(violation(node_idx, "child index outside the node arena"));
                        };
                        if child_node.region != node.region.child(quadrant) {
                            return Err(violation(child, "child region does not tile its quadrant"));
                        }
                        if child_node.parent != Some(node_idx) || child_node.depth != node.depth + 1
                        {
                            return Err(violation(child, "child parent link or depth is stale"));
                        }
                        stack.push(child);
                    }
                }
            }
        }

        if resident != self.len {
            return Err(violation(ROOT, "resident entry count does not match len"));
        }
        Ok(())
    }
}
