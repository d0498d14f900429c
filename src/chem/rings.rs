//! Ring perception over a molecular adjacency list.

use std::collections::{BTreeSet, VecDeque};

use crate::model::types::BondOrder;

/// Rings larger than this are not reported; generated ligands do not carry
/// meaningful macrocycles and the search cost grows with the cap.
const MAX_RING_SIZE: usize = 12;

/// Finds the shortest ring through every bond.
///
/// For each edge (i, j), the edge is removed and the shortest remaining
/// path j -> i is sought with BFS; the path plus the edge forms a ring.
/// Rings sharing the same member set are reported once, ordered by their
/// smallest atom index.
pub fn perceive_rings(n_atoms: usize, adjacency: &[Vec<(usize, BondOrder)>]) -> Vec<Vec<usize>> {
    let mut rings: Vec<Vec<usize>> = Vec::new();
    let mut member_sets: Vec<BTreeSet<usize>> = Vec::new();

    for i in 0..n_atoms {
        for &(j, _) in &adjacency[i] {
            if j < i {
                continue;
            }
            if let Some(path) = shortest_path_avoiding(adjacency, n_atoms, j, i, (i, j)) {
                if path.len() + 1 > MAX_RING_SIZE {
                    continue;
                }
                let mut ring = path;
                ring.push(j);
                let members: BTreeSet<usize> = ring.iter().copied().collect();
                if members.len() == ring.len() && !member_sets.contains(&members) {
                    member_sets.push(members);
                    rings.push(ring);
                }
            }
        }
    }

    rings.sort_by_key(|ring| (ring.len(), ring.iter().copied().min()));
    rings
}

/// BFS shortest path from `start` to `goal` that never crosses `banned`.
/// Returns the path as `goal ... start` without the final `start` repeat.
fn shortest_path_avoiding(
    adjacency: &[Vec<(usize, BondOrder)>],
    n_atoms: usize,
    start: usize,
    goal: usize,
    banned: (usize, usize),
) -> Option<Vec<usize>> {
    let mut parent: Vec<Option<usize>> = vec![None; n_atoms];
    let mut visited = vec![false; n_atoms];
    let mut queue = VecDeque::new();
    visited[start] = true;
    queue.push_back(start);

    while let Some(u) = queue.pop_front() {
        if u == goal {
            let mut path = vec![goal];
            let mut cur = goal;
            while let Some(p) = parent[cur] {
                path.push(p);
                cur = p;
            }
            path.pop(); // drop `start`; the caller closes the ring
            return Some(path);
        }
        for &(v, _) in &adjacency[u] {
            let edge = (u.min(v), u.max(v));
            if edge == (banned.0.min(banned.1), banned.0.max(banned.1)) {
                continue;
            }
            if !visited[v] {
                visited[v] = true;
                parent[v] = Some(u);
                queue.push_back(v);
            }
        }
    }
    None
}
