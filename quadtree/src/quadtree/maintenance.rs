use super::*;
use crate::error::{QuadtreeError, QuadtreeResult};
use tracing::{debug, trace};

impl<T> QuadTree<T> {
    /// Removes the entry and returns its payload, or `None` if the handle is
    /// not resident (already removed, or the tree was cleared).
    pub fn remove(&mut self, id: EntryId) -> Option<T> {
        let owner = self.entry(id)?.owner;
        self.detach(owner, id.index);
        let entry = self.free_entry(id.index)?;
        self.len -= 1;
        self.merge_upwards(owner);
        Some(entry.payload)
    }

    /// Moves an entry to a new position.
    ///
    /// When the point stays inside its current leaf only the coordinates
    /// change. Otherwise the entry is detached (with merge checks) and inserted
    /// again from the root. Bounds are checked before anything is touched.
    pub fn update(&mut self, id: EntryId, x: f32, y: f32) -> QuadtreeResult<()> {
        let owner = match self.entry(id) {
            Some(entry) => entry.owner,
            None => return Err(QuadtreeError::EntryNotFound { id }),
        };
        self.ensure_in_bounds(x, y)?;

        if self.nodes[owner as usize].region.contains_point(x, y) {
            if let Some(entry) = self.entry_mut(id) {
                entry.x = x;
                entry.y = y;
            }
            return Ok(());
        }

        self.detach(owner, id.index);
        self.merge_upwards(owner);
        let leaf = self.leaf_for_point(x, y);
        if let Some(entry) = self.entry_mut(id) {
            entry.x = x;
            entry.y = y;
            entry.owner = leaf;
        }
        self.attach(leaf, id.index);
        Ok(())
    }

    /// Applies every request in order. All requests are validated first, so
    /// either the whole batch is applied or none of it is.
    pub fn update_batch(&mut self, requests: &[UpdateRequest]) -> QuadtreeResult<()> {
        for request in requests {
            if !self.contains(request.id) {
                return Err(QuadtreeError::EntryNotFound { id: request.id });
            }
            self.ensure_in_bounds(request.x, request.y)?;
        }
        for request in requests {
            self.update(request.id, request.x, request.y)?;
        }
        Ok(())
    }

    /// Drops every entry and collapses the tree to an empty root leaf.
    /// Outstanding handles become stale.
    pub fn clear(&mut self) {
        let region = self.nodes[ROOT as usize].region;
        self.nodes.truncate(1);
        self.nodes[ROOT as usize] = Node::new_leaf(region, 0, None);
        self.free_nodes.clear();

        self.free_slots.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_slots.push(index as u32);
        }
        debug!(entries = self.len, "cleared quadtree");
        self.len = 0;
    }

    fn detach(&mut self, leaf: u32, slot: u32) {
        if let NodeKind::Leaf { entries } = &mut self.nodes[leaf as usize].kind {
            if let Some(position) = entries.iter().position(|&resident| resident == slot) {
                entries.remove(position);
            }
        }
    }

    // An ancestor can only collapse if every node below it already did, so the
    // walk stops at the first parent that stays internal.
    fn merge_upwards(&mut self, leaf: u32) {
        let mut parent = self.nodes[leaf as usize].parent;
        while let Some(node_idx) = parent {
            if !self.try_merge(node_idx) {
                break;
            }
            parent = self.nodes[node_idx as usize].parent;
        }
    }

    fn try_merge(&mut self, node_idx: u32) -> bool {
        let children = match &self.nodes[node_idx as usize].kind {
            NodeKind::Internal { children } => *children,
            NodeKind::Leaf { .. } => return false,
        };

        let mut total = 0;
        for &child in &children {
            match &self.nodes[child as usize].kind {
                NodeKind::Leaf { entries } => total += entries.len(),
                NodeKind::Internal { .. } => return false,
            }
        }
        if total > self.config.node_capacity {
            return false;
        }

        let mut merged = Vec::with_capacity(total);
        for &child in &children {
            if let NodeKind::Leaf { entries } = &mut self.nodes[child as usize].kind {
                merged.append(entries);
            }
            self.free_node(child);
        }
        for &slot in &merged {
            if let Some(entry) = self.slots[slot as usize].entry.as_mut() {
                entry.owner = node_idx;
            }
        }
        self.nodes[node_idx as usize].kind = NodeKind::Leaf { entries: merged };
        trace!(node = node_idx, entries = total, "merged children into leaf");
        true
    }
}
