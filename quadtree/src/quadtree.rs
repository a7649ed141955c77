//! Region quadtree over 2D points.
//!
//! Nodes live in an arena addressed by `u32` with the root always at index 0.
//! Entries live in a slot arena and remember the leaf that owns them, so
//! removal and relocation never have to search the tree by coordinates.

mod insert;
mod maintenance;
mod nearest;
mod query_circle;
mod query_rect;
mod traverse;
mod types;

pub use query_rect::Query;
pub use types::{Config, EntryId, EntryRef, Neighbor, RectExtent, Region, UpdateRequest};

use smallvec::SmallVec;

pub(crate) const ROOT: u32 = 0;

pub(crate) type NodeStack = SmallVec<[u32; 64]>;

#[derive(Debug, Clone)]
enum NodeKind {
    Leaf { entries: Vec<u32> },
    Internal { children: [u32; 4] },
}

#[derive(Debug, Clone)]
struct Node {
    region: Region,
    depth: u32,
    parent: Option<u32>,
    kind: NodeKind,
}

impl Node {
    #[inline(always)]
    fn new_leaf(region: Region, depth: u32, parent: Option<u32>) -> Self {
        Self {
            region,
            depth,
            parent,
            kind: NodeKind::Leaf {
                entries: Vec::new(),
            },
        }
    }

    #[inline(always)]
    fn entries(&self) -> &[u32] {
        match &self.kind {
            NodeKind::Leaf { entries } => entries,
            NodeKind::Internal { .. } => &[],
        }
    }
}

#[derive(Debug)]
struct Entry<T> {
    x: f32,
    y: f32,
    owner: u32,
    payload: T,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

/// Mutable point quadtree with range and k-nearest-neighbor queries.
///
/// The tree does no internal locking. Share it across threads behind a single
/// lock and collect query results before releasing it.
#[derive(Debug)]
pub struct QuadTree<T> {
    nodes: Vec<Node>,
    free_nodes: Vec<u32>,
    slots: Vec<Slot<T>>,
    free_slots: Vec<u32>,
    len: usize,
    config: Config,
}
