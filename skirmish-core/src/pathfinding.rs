//! A* pathfinding and bounded reachability on the battlefield

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::battlefield::Battlefield;
use crate::hex::Hex;

/// Node in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenNode {
    hex: Hex,
    g: u32,
    f: u32,
    /// Push order, breaks ties on equal f
    seq: u64,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the shortest path from `start` to `end` taking at most `max_steps` steps.
///
/// Occupied cells block unless `ignore_occupied` is set or the cell is the
/// destination itself. The returned path includes both endpoints; `None`
/// means no path exists within the budget.
pub fn find_path(
    field: &Battlefield,
    start: Hex,
    end: Hex,
    max_steps: u32,
    ignore_occupied: bool,
) -> Option<Vec<Hex>> {
    if start == end {
        return Some(vec![start]);
    }
    if !field.is_valid_position(end) || start.distance_to(end) > max_steps {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: FxHashMap<Hex, Hex> = FxHashMap::default();
    let mut g_scores: FxHashMap<Hex, u32> = FxHashMap::default();
    let mut seq = 0u64;

    g_scores.insert(start, 0);
    open_set.push(OpenNode {
        hex: start,
        g: 0,
        f: start.distance_to(end),
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.hex == end {
            return Some(reconstruct_path(&came_from, end));
        }

        // Stale entry superseded by a cheaper route
        if g_scores.get(&current.hex).is_some_and(|&g| g < current.g) {
            continue;
        }
        if current.g >= max_steps {
            continue;
        }

        for neighbor in field.neighbors(current.hex) {
            if field.is_occupied(neighbor) && !ignore_occupied && neighbor != end {
                continue;
            }

            let tentative_g = current.g + 1;
            let known = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);
            if tentative_g < known {
                came_from.insert(neighbor, current.hex);
                g_scores.insert(neighbor, tentative_g);
                seq += 1;
                open_set.push(OpenNode {
                    hex: neighbor,
                    g: tentative_g,
                    f: tentative_g + neighbor.distance_to(end),
                    seq,
                });
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &FxHashMap<Hex, Hex>, mut current: Hex) -> Vec<Hex> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Cells reachable from `start` in at most `range` steps without passing
/// through or ending on an occupied cell. `start` itself is excluded.
pub fn reachable_cells(field: &Battlefield, start: Hex, range: u32) -> Vec<Hex> {
    let mut visited: FxHashSet<Hex> = FxHashSet::default();
    let mut queue = VecDeque::new();
    let mut reachable = Vec::new();

    visited.insert(start);
    queue.push_back((start, 0u32));

    while let Some((hex, depth)) = queue.pop_front() {
        if depth >= range {
            continue;
        }
        for neighbor in field.neighbors(hex) {
            if field.is_occupied(neighbor) || !visited.insert(neighbor) {
                continue;
            }
            reachable.push(neighbor);
            queue.push_back((neighbor, depth + 1));
        }
    }

    reachable
}
