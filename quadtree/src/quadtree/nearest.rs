use super::types::validate_circle_radius;
use super::*;
use crate::error::QuadtreeResult;
use ordered_float::OrderedFloat;
use std::collections::BinaryHeap;

/// Accepted kNN candidate. The heap top is the current worst: largest
/// distance, and among equal distances the one visited last.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    distance_sq: OrderedFloat<f32>,
    sequence: u32,
    slot: u32,
}

type SearchStack = SmallVec<[(u32, f32); 32]>;

impl<T> QuadTree<T> {
    /// Up to `k` entries closest to `(x, y)`, nearest first.
    ///
    /// With `max_radius`, only entries at distance `<= max_radius` qualify.
    /// The result is exact; equal distances keep traversal order.
    pub fn query_nearest(
        &self,
        x: f32,
        y: f32,
        k: usize,
        max_radius: Option<f32>,
    ) -> QuadtreeResult<Vec<Neighbor<'_, T>>> {
        let limit_sq = match max_radius {
            Some(radius) => {
                validate_circle_radius(radius)?;
                radius * radius
            }
            None => f32::INFINITY,
        };
        if k == 0 || self.len == 0 {
            return Ok(Vec::new());
        }

        let mut best: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k.min(self.len) + 1);
        let mut worst_sq = limit_sq;
        let mut sequence = 0u32;
        let mut stack = SearchStack::new();
        stack.push((
            ROOT,
            self.nodes[ROOT as usize]
                .region
                .squared_distance_to_region(x, y),
        ));

        while let Some((start, region_distance_sq)) = stack.pop() {
            // The bound may have tightened since this node was deferred.
            if region_distance_sq > worst_sq {
                continue;
            }

            let mut node_idx = start;
            loop {
                match &self.nodes[node_idx as usize].kind {
                    NodeKind::Internal { children } => {
                        let mut ranked = children.map(|child| {
                            let region = &self.nodes[child as usize].region;
                            (
                                region.squared_distance_to_region(x, y),
                                region.squared_distance_to_center(x, y),
                                child,
                            )
                        });
                        // Center distance only breaks ties in visiting order;
                        // pruning below uses the exact region distance. The
                        // sort is stable so full ties keep quadrant order.
                        ranked.sort_by(|a, b| {
                            a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1))
                        });

                        for &(distance_sq, _, child) in ranked[1..].iter().rev() {
                            if distance_sq <= worst_sq {
                                stack.push((child, distance_sq));
                            }
                        }
                        let (distance_sq, _, nearest) = ranked[0];
                        if distance_sq > worst_sq {
                            break;
                        }
                        node_idx = nearest;
                    }
                    NodeKind::Leaf { entries } => {
                        for &slot in entries {
                            let Some(entry) = self.slots[slot as usize].entry.as_ref() else {
                                continue;
                            };
                            let dx = entry.x - x;
                            let dy = entry.y - y;
                            let distance_sq = dx * dx + dy * dy;

                            let candidate = Candidate {
                                distance_sq: OrderedFloat(distance_sq),
                                sequence,
                                slot,
                            };
                            if best.len() < k {
                                if distance_sq <= limit_sq {
                                    best.push(candidate);
                                    sequence += 1;
                                }
                            } else if distance_sq < worst_sq {
                                best.pop();
                                best.push(candidate);
                                sequence += 1;
                            }

                            if best.len() == k {
                                worst_sq = best
                                    .peek()
                                    .map_or(limit_sq, |worst| worst.distance_sq.0);
                            }
                        }
                        break;
                    }
                }
            }
        }

        Ok(best
            .into_sorted_vec()
            .into_iter()
            .filter_map(|candidate| {
                self.entry_ref(candidate.slot).map(|entry| Neighbor {
                    entry,
                    distance_sq: candidate.distance_sq.0,
                })
            })
            .collect())
    }

    /// Nearest entry to `(x, y)`, if any.
    pub fn nearest(&self, x: f32, y: f32) -> Option<Neighbor<'_, T>> {
        self.query_nearest(x, y, 1, None)
            .ok()
            .and_then(|mut found| found.pop())
    }
}
