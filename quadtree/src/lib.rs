pub mod error;
pub mod quadtree;

pub use common::shapes;
pub use error::{QuadtreeError, QuadtreeResult};
pub use quadtree::{
    Config, EntryId, EntryRef, Neighbor, QuadTree, Query, RectExtent, Region, UpdateRequest,
};
