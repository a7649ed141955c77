use super::*;
use crate::error::{QuadtreeError, QuadtreeResult};
use smallvec::smallvec;
use tracing::{debug, trace};

impl<T> QuadTree<T> {
    pub fn new(region: Region, capacity: usize) -> QuadtreeResult<Self> {
        Self::new_with_config(
            region,
            Config {
                node_capacity: capacity,
                ..Config::default()
            },
        )
    }

    pub fn new_with_config(region: Region, config: Config) -> QuadtreeResult<Self> {
        if config.node_capacity == 0 {
            return Err(QuadtreeError::InvalidCapacity {
                capacity: config.node_capacity,
            });
        }
        let mut nodes = Vec::with_capacity(config.pool_size.max(1));
        nodes.push(Node::new_leaf(region, 0, None));
        Ok(Self {
            nodes,
            free_nodes: Vec::new(),
            slots: Vec::new(),
            free_slots: Vec::new(),
            len: 0,
            config,
        })
    }

    /// Inserts a point and returns its handle.
    ///
    /// Fails with [`QuadtreeError::OutOfBounds`] when the point lies outside the
    /// root region; the tree is left untouched in that case.
    pub fn insert(&mut self, x: f32, y: f32, payload: T) -> QuadtreeResult<EntryId> {
        self.ensure_in_bounds(x, y)?;
        let leaf = self.leaf_for_point(x, y);
        let id = self.alloc_entry(Entry {
            x,
            y,
            owner: leaf,
            payload,
        });
        self.attach(leaf, id.index);
        self.len += 1;
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Root region. It never moves or shrinks.
    pub fn region(&self) -> Region {
        self.nodes[ROOT as usize].region
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.entry(id).is_some()
    }

    pub fn get(&self, id: EntryId) -> Option<EntryRef<'_, T>> {
        self.entry(id).map(|entry| EntryRef {
            id,
            x: entry.x,
            y: entry.y,
            payload: &entry.payload,
        })
    }

    /// Mutable access to the payload. Positions change only through `update`.
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut T> {
        self.entry_mut(id).map(|entry| &mut entry.payload)
    }

    pub fn position(&self, id: EntryId) -> Option<(f32, f32)> {
        self.entry(id).map(|entry| (entry.x, entry.y))
    }

    /// Region of the leaf currently owning the entry.
    pub fn leaf_region(&self, id: EntryId) -> Option<Region> {
        self.entry(id).map(|entry| self.nodes[entry.owner as usize].region)
    }

    /// Number of live nodes, leaves and internal nodes alike.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_nodes.len()
    }

    /// Depth of the deepest live node; a lone root leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: NodeStack = smallvec![ROOT];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            deepest = deepest.max(node.depth as usize);
            if let NodeKind::Internal { children } = &node.kind {
                stack.extend_from_slice(children);
            }
        }
        deepest
    }

    pub(super) fn ensure_in_bounds(&self, x: f32, y: f32) -> QuadtreeResult<()> {
        if self.nodes[ROOT as usize].region.contains_point(x, y) {
            Ok(())
        } else {
            Err(QuadtreeError::OutOfBounds { x, y })
        }
    }

    pub(super) fn entry(&self, id: EntryId) -> Option<&Entry<T>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub(super) fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry<T>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    /// View of the entry resident in `slot`, as referenced from a leaf.
    #[inline(always)]
    pub(super) fn entry_ref(&self, slot: u32) -> Option<EntryRef<'_, T>> {
        let slot_ref = self.slots.get(slot as usize)?;
        slot_ref.entry.as_ref().map(|entry| EntryRef {
            id: EntryId {
                index: slot,
                generation: slot_ref.generation,
            },
            x: entry.x,
            y: entry.y,
            payload: &entry.payload,
        })
    }

    /// Descends by quadrant until a leaf is reached.
    pub(super) fn leaf_for_point(&self, x: f32, y: f32) -> u32 {
        let mut node_idx = ROOT;
        loop {
            let node = &self.nodes[node_idx as usize];
            match &node.kind {
                NodeKind::Leaf { .. } => return node_idx,
                NodeKind::Internal { children } => {
                    node_idx = children[node.region.quadrant_of(x, y)];
                }
            }
        }
    }

    /// Appends the entry in `slot` to a leaf and splits the leaf if it overflows.
    /// The entry's owner must already point at `leaf`.
    pub(super) fn attach(&mut self, leaf: u32, slot: u32) {
        let overflow = match &mut self.nodes[leaf as usize].kind {
            NodeKind::Leaf { entries } => {
                entries.push(slot);
                entries.len() > self.config.node_capacity
            }
            NodeKind::Internal { .. } => {
                debug_assert!(false, "attach called on internal node {}", leaf);
                false
            }
        };
        if overflow {
            self.split(leaf);
        }
    }

    // Children that overflow again are pushed back on the work stack, so tight
    // clusters keep subdividing until they fit or hit the depth cap.
    fn split(&mut self, node_idx: u32) {
        let mut stack: NodeStack = smallvec![node_idx];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            let (region, depth, count) = (node.region, node.depth, node.entries().len());
            if count <= self.config.node_capacity {
                continue;
            }
            if depth as usize >= self.config.max_depth {
                debug!(
                    node = node_idx,
                    depth,
                    entries = count,
                    "leaf at max depth exceeds node capacity"
                );
                continue;
            }

            let mut children = [0u32; 4];
            for (quadrant, child) in children.iter_mut().enumerate() {
                *child = self.alloc_node(Node::new_leaf(
                    region.child(quadrant),
                    depth + 1,
                    Some(node_idx),
                ));
            }
            let previous = std::mem::replace(
                &mut self.nodes[node_idx as usize].kind,
                NodeKind::Internal { children },
            );
            let NodeKind::Leaf { entries } = previous else {
                continue;
            };

            for slot in entries {
                let Some(entry) = self.slots[slot as usize].entry.as_mut() else {
                    continue;
                };
                let child = children[region.quadrant_of(entry.x, entry.y)];
                entry.owner = child;
                if let NodeKind::Leaf { entries } = &mut self.nodes[child as usize].kind {
                    entries.push(slot);
                }
            }
            trace!(node = node_idx, depth, entries = count, "split leaf");

            stack.extend_from_slice(&children);
        }
    }

    fn alloc_node(&mut self, node: Node) -> u32 {
        if let Some(node_idx) = self.free_nodes.pop() {
            self.nodes[node_idx as usize] = node;
            return node_idx;
        }
        self.nodes.push(node);
        (self.nodes.len() - 1) as u32
    }

    pub(super) fn free_node(&mut self, node_idx: u32) {
        debug_assert!(node_idx != ROOT, "the root node is never freed");
        let node = &mut self.nodes[node_idx as usize];
        node.kind = NodeKind::Leaf {
            entries: Vec::new(),
        };
        node.parent = None;
        self.free_nodes.push(node_idx);
    }

    fn alloc_entry(&mut self, entry: Entry<T>) -> EntryId {
        if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return EntryId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        EntryId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    /// Vacates a slot and bumps its generation so outstanding handles go stale.
    pub(super) fn free_entry(&mut self, index: u32) -> Option<Entry<T>> {
        let slot = self.slots.get_mut(index as usize)?;
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(index);
        Some(entry)
    }
}
