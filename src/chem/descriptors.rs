//! Descriptor computation for validated molecules.

use std::collections::BTreeSet;

use serde::Serialize;

use super::Molecule;
use crate::model::types::{BondOrder, Element};

/// Structure-derived descriptors for a reconstructed molecule.
#[derive(Debug, Clone, Serialize)]
pub struct Descriptors {
    pub mol_weight: f64,
    pub n_atoms: usize,
    pub n_heavy_atoms: usize,
    pub n_rings: usize,
    /// Sizes of the perceived rings, ascending.
    pub ring_sizes: Vec<usize>,
    pub n_rotatable_bonds: usize,
}

pub fn descriptors(mol: &Molecule) -> Descriptors {
    let mol_weight = mol.atoms().iter().map(|a| a.element.atomic_mass()).sum();
    let n_heavy_atoms = mol
        .atoms()
        .iter()
        .filter(|a| a.element != Element::H)
        .count();

    let mut ring_sizes: Vec<usize> = mol.rings().iter().map(|r| r.len()).collect();
    ring_sizes.sort_unstable();

    let ring_edges: BTreeSet<(usize, usize)> = mol
        .rings()
        .iter()
        .flat_map(|ring| {
            ring.iter()
                .zip(ring.iter().cycle().skip(1))
                .take(ring.len())
                .map(|(&a, &b)| (a.min(b), a.max(b)))
        })
        .collect();

    let n_rotatable_bonds = mol
        .bonds()
        .iter()
        .filter(|b| b.order == BondOrder::Single)
        .filter(|b| !ring_edges.contains(&(b.i, b.j)))
        .filter(|b| heavy_degree(mol, b.i) >= 2 && heavy_degree(mol, b.j) >= 2)
        .count();

    Descriptors {
        mol_weight,
        n_atoms: mol.atom_count(),
        n_heavy_atoms,
        n_rings: ring_sizes.len(),
        ring_sizes,
        n_rotatable_bonds,
    }
}

fn heavy_degree(mol: &Molecule, atom: usize) -> usize {
    mol.adjacency()[atom]
        .iter()
        .filter(|&&(j, _)| mol.atoms()[j].element != Element::H)
        .count()
}
