//! Canonical atom ranking by iterative neighborhood refinement.

use crate::model::atom::Atom;
use crate::model::types::BondOrder;

/// Assigns every atom a rank in `0..n` such that the ranking depends only on
/// the graph and atom attributes, not on floating-point positions.
///
/// Starts from an invariant of (atomic number, aromaticity, degree, doubled
/// bond-order sum) and repeatedly extends each atom's key with its
/// neighbors' sorted ranks until the partition stops refining. Remaining
/// ties are broken by atom index, which keeps the result deterministic for
/// identical input orderings.
pub fn canonical_ranks(atoms: &[Atom], adjacency: &[Vec<(usize, BondOrder)>]) -> Vec<usize> {
    let n = atoms.len();
    if n == 0 {
        return Vec::new();
    }

    let initial: Vec<(u8, bool, usize, u32)> = (0..n)
        .map(|i| {
            let order_sum: f64 = adjacency[i].iter().map(|(_, o)| o.value()).sum();
            (
                atoms[i].element.atomic_number(),
                atoms[i].is_aromatic,
                adjacency[i].len(),
                (order_sum * 2.0).round() as u32,
            )
        })
        .collect();

    let mut ranks = dense_ranks(&initial);
    let mut n_classes = distinct(&ranks);

    for _ in 0..n {
        let keys: Vec<(usize, Vec<usize>)> = (0..n)
            .map(|i| {
                let mut neighbor_ranks: Vec<usize> =
                    adjacency[i].iter().map(|&(j, _)| ranks[j]).collect();
                neighbor_ranks.sort_unstable();
                (ranks[i], neighbor_ranks)
            })
            .collect();
        ranks = dense_ranks(&keys);
        let refined = distinct(&ranks);
        if refined == n_classes {
            break;
        }
        n_classes = refined;
    }

    ranks
}

fn dense_ranks<K: Ord + Clone>(keys: &[K]) -> Vec<usize> {
    let mut sorted: Vec<K> = keys.to_vec();
    sorted.sort();
    sorted.dedup();
    keys.iter()
        .map(|k| sorted.binary_search(k).expect("key present"))
        .collect()
}

fn distinct(ranks: &[usize]) -> usize {
    let mut seen: Vec<usize> = ranks.to_vec();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}
