//! Bond graph reconstruction from generated geometry.
//!
//! Reconstruction is all-or-nothing per sample: either every atom ends up
//! in a chemically consistent assignment that survives sanitization, or the
//! sample fails with a reconstruction-category error.

use std::collections::BTreeSet;

use super::error::Error;
use super::geometry::euclidean;
use super::rules::BondingRules;
use crate::chem::{self, Molecule};
use crate::model::atom::Atom;
use crate::model::molecule::{Bond, MoleculeGraph};
use crate::model::types::{BondOrder, Element};

/// A geometry-implied bond prior to order assignment.
#[derive(Debug, Clone, Copy)]
struct BondCandidate {
    i: usize,
    j: usize,
    distance: f64,
    order: BondOrder,
}

/// Reconstructs a validated molecule from positions, elements, and
/// per-atom aromaticity flags.
///
/// Candidate bonds come from the same distance brackets the stability
/// checker uses. Orders are assigned greedily from the shortest candidate
/// outward, downgrading (triple -> double -> single) when an endpoint lacks
/// valence capacity and dropping the candidate when even a single bond does
/// not fit. Bonds between aromatic-flagged atoms that lie on an aromatic
/// cycle become aromatic; an aromatic flag with no supporting cycle fails
/// the sample.
pub fn reconstruct(
    positions: &[[f64; 3]],
    elements: &[Element],
    aromatic: &[bool],
    rules: &BondingRules,
) -> Result<Molecule, Error> {
    let n = positions.len();
    if n == 0 {
        return Err(Error::reconstruction("sample has no atoms"));
    }
    if elements.len() != n || aromatic.len() != n {
        return Err(Error::reconstruction(
            "positions, elements and aromatic flags must have equal length",
        ));
    }

    let mut candidates = collect_candidates(positions, elements, rules);
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut capacity: Vec<f64> = elements
        .iter()
        .map(|&e| f64::from(rules.max_valence(e)))
        .collect();
    let mut accepted: Vec<Bond> = Vec::new();

    for cand in &candidates {
        if let Some(order) = fit_order(cand.order, capacity[cand.i], capacity[cand.j]) {
            capacity[cand.i] -= order.value();
            capacity[cand.j] -= order.value();
            accepted.push(Bond::new(cand.i, cand.j, order));
        }
    }

    apply_aromatic_rings(&mut accepted, aromatic, n)?;

    let graph = MoleculeGraph {
        atoms: (0..n)
            .map(|i| Atom {
                element: elements[i],
                position: positions[i],
                is_aromatic: aromatic[i],
            })
            .collect(),
        bonds: accepted,
    };

    Ok(chem::sanitize(graph)?)
}

fn collect_candidates(
    positions: &[[f64; 3]],
    elements: &[Element],
    rules: &BondingRules,
) -> Vec<BondCandidate> {
    let n = positions.len();
    let mut candidates = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let distance = euclidean(&positions[i], &positions[j]);
            if let Some(order) = rules.infer_order(elements[i], elements[j], distance) {
                candidates.push(BondCandidate {
                    i,
                    j,
                    distance,
                    order,
                });
            }
        }
    }
    candidates
}

/// Highest order at or below `wanted` that fits both remaining capacities.
fn fit_order(wanted: BondOrder, cap_i: f64, cap_j: f64) -> Option<BondOrder> {
    let chain: &[BondOrder] = match wanted {
        BondOrder::Triple => &[BondOrder::Triple, BondOrder::Double, BondOrder::Single],
        BondOrder::Double => &[BondOrder::Double, BondOrder::Single],
        BondOrder::Single | BondOrder::Aromatic => &[BondOrder::Single],
    };
    chain
        .iter()
        .copied()
        .find(|order| order.value() <= cap_i + 1e-9 && order.value() <= cap_j + 1e-9)
}

/// Rewrites ring bonds between aromatic-flagged atoms to aromatic order.
///
/// Every aromatic-flagged atom must sit on a cycle within the subgraph of
/// aromatic-flagged atoms; a flag without a geometric ring closure means
/// the generated geometry does not support the labeled aromatic system.
fn apply_aromatic_rings(bonds: &mut [Bond], aromatic: &[bool], n_atoms: usize) -> Result<(), Error> {
    if !aromatic.iter().any(|&a| a) {
        return Ok(());
    }

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n_atoms];
    for bond in bonds.iter() {
        if aromatic[bond.i] && aromatic[bond.j] {
            adjacency[bond.i].push(bond.j);
            adjacency[bond.j].push(bond.i);
        }
    }

    let adjacency_typed: Vec<Vec<(usize, BondOrder)>> = adjacency
        .iter()
        .map(|nbrs| nbrs.iter().map(|&j| (j, BondOrder::Single)).collect())
        .collect();
    let rings = chem::perceive_rings(n_atoms, &adjacency_typed);

    let mut ring_atoms: BTreeSet<usize> = BTreeSet::new();
    let mut ring_edges: BTreeSet<(usize, usize)> = BTreeSet::new();
    for ring in &rings {
        for k in 0..ring.len() {
            let a = ring[k];
            let b = ring[(k + 1) % ring.len()];
            ring_atoms.insert(a);
            ring_edges.insert((a.min(b), a.max(b)));
        }
    }

    for (index, &flag) in aromatic.iter().enumerate() {
        if flag && !ring_atoms.contains(&index) {
            return Err(Error::reconstruction(format!(
                "aromatic atom {} is not part of any aromatic ring",
                index
            )));
        }
    }

    for bond in bonds.iter_mut() {
        if ring_edges.contains(&(bond.i, bond.j)) {
            bond.order = BondOrder::Aromatic;
        }
    }

    Ok(())
}
