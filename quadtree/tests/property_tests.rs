use proptest::prelude::*;
use quadtree::{EntryId, QuadTree, Region};

// Quarter-unit grid inside [-64, 64]; every coordinate is exact in f32.
fn coord() -> impl Strategy<Value = f32> {
    (-256i32..=256).prop_map(|v| v as f32 * 0.25)
}

fn tree(capacity: usize) -> QuadTree<u32> {
    QuadTree::new(Region::new(0.0, 0.0, 64.0).unwrap(), capacity).unwrap()
}

fn distance_sq(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

proptest! {
    #[test]
    fn prop_behaves_like_vec_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(
            (0u8..3, any::<prop::sample::Index>(), coord(), coord()), 0..200
        )
    ) {
        let mut qt = tree(capacity);
        let mut model: Vec<(EntryId, u32, f32, f32)> = Vec::new();
        let mut next_payload = 0u32;

        for (op, pick, x, y) in ops {
            match op {
                0 => { // insert
                    let id = qt.insert(x, y, next_payload).unwrap();
                    model.push((id, next_payload, x, y));
                    next_payload += 1;
                }
                1 if !model.is_empty() => { // remove
                    let (id, payload, _, _) = model.swap_remove(pick.index(model.len()));
                    prop_assert_eq!(qt.remove(id), Some(payload));
                    prop_assert_eq!(qt.remove(id), None);
                }
                2 if !model.is_empty() => { // update
                    let at = pick.index(model.len());
                    qt.update(model[at].0, x, y).unwrap();
                    model[at].2 = x;
                    model[at].3 = y;
                }
                _ => {}
            }

            prop_assert_eq!(qt.len(), model.len());
            prop_assert!(qt.validate().is_ok());
        }

        let mut found: Vec<_> = qt.iter().map(|e| (*e.payload, e.x, e.y)).collect();
        found.sort_by_key(|item| item.0);
        let mut expected: Vec<_> = model.iter().map(|&(_, p, x, y)| (p, x, y)).collect();
        expected.sort_by_key(|item| item.0);
        prop_assert_eq!(found, expected);

        if model.is_empty() {
            prop_assert_eq!(qt.node_count(), 1);
        }
    }
}

proptest! {
    #[test]
    fn prop_nearest_matches_brute_force(
        points in prop::collection::vec((coord(), coord()), 0..150),
        qx in coord(),
        qy in coord(),
        k in 0usize..20,
        radius in prop::option::of(0u8..80),
    ) {
        let mut qt = tree(3);
        for (i, &(x, y)) in points.iter().enumerate() {
            qt.insert(x, y, i as u32).unwrap();
        }
        let max_radius = radius.map(f32::from);

        let found: Vec<f32> = qt
            .query_nearest(qx, qy, k, max_radius)
            .unwrap()
            .iter()
            .map(|n| n.distance_sq)
            .collect();

        let limit = max_radius.map_or(f32::INFINITY, |r| r * r);
        let mut expected: Vec<f32> = points
            .iter()
            .map(|&(x, y)| distance_sq(x, y, qx, qy))
            .filter(|&d| d <= limit)
            .collect();
        expected.sort_by(|a, b| a.total_cmp(b));
        expected.truncate(k);
        prop_assert_eq!(found, expected);
    }
}

proptest! {
    #[test]
    fn prop_range_matches_brute_force(
        points in prop::collection::vec((coord(), coord()), 0..150),
        left in coord(),
        top in coord(),
        width in 0u8..64,
        height in 0u8..64,
    ) {
        let mut qt = tree(2);
        for (i, &(x, y)) in points.iter().enumerate() {
            qt.insert(x, y, i as u32).unwrap();
        }
        let (width, height) = (f32::from(width), f32::from(height));

        let mut found: Vec<u32> = qt
            .query_rect(left, top, width, height)
            .unwrap()
            .map(|e| *e.payload)
            .collect();
        found.sort_unstable();

        let expected: Vec<u32> = points
            .iter()
            .enumerate()
            .filter(|&(_, &(x, y))| {
                x >= left && x <= left + width && y >= top && y <= top + height
            })
            .map(|(i, _)| i as u32)
            .collect();
        prop_assert_eq!(found, expected);
    }
}

proptest! {
    #[test]
    fn prop_removing_everything_collapses_to_root(
        points in prop::collection::vec((coord(), coord()), 1..120),
        capacity in 1usize..5,
    ) {
        let mut qt = tree(capacity);
        let ids: Vec<_> = points
            .iter()
            .map(|&(x, y)| qt.insert(x, y, 0).unwrap())
            .collect();

        for id in ids.into_iter().rev() {
            prop_assert!(qt.remove(id).is_some());
            prop_assert!(qt.validate().is_ok());
        }
        prop_assert!(qt.is_empty());
        prop_assert_eq!(qt.node_count(), 1);
    }
}

proptest! {
    #[test]
    fn prop_entries_on_node_edges_are_found(
        points in prop::collection::vec((-0.59f32..0.79f32, -0.59f32..0.79f32), 1..80),
    ) {
        // Root edges are inexact in f32, so children inherit rounded boundaries.
        let mut qt = QuadTree::new(Region::new(0.1, 0.1, 0.7).unwrap(), 1).unwrap();
        for &(x, y) in &points {
            qt.insert(x, y, 0).unwrap();
        }
        let mut regions = Vec::new();
        qt.all_node_regions(&mut regions);
        for r in &regions {
            qt.insert(r.left(), r.top(), 1).unwrap();
            qt.insert(r.center_x(), r.center_y(), 1).unwrap();
        }
        prop_assert!(qt.validate().is_ok());

        for entry in qt.iter() {
            let hit = qt
                .query_rect(entry.x, entry.y, 0.0, 0.0)
                .unwrap()
                .any(|e| e.id == entry.id);
            prop_assert!(hit);
            let nearest = qt.query_nearest(entry.x, entry.y, 1, Some(0.0)).unwrap();
            prop_assert_eq!(nearest.len(), 1);
        }
    }
}
