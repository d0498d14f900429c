//! Cheminformatics support: graph sanitization, ring perception, canonical
//! SMILES generation, and simple molecular descriptors.
//!
//! [`sanitize`] is the single entry point that turns a raw
//! [`MoleculeGraph`](crate::model::molecule::MoleculeGraph) into a validated
//! [`Molecule`] handle. A molecule that fails sanitization is rejected as a
//! whole; there is no partially valid handle.

mod canon;
mod descriptors;
mod rings;
mod smiles;

pub use descriptors::{descriptors, Descriptors};
pub(crate) use rings::perceive_rings;

use thiserror::Error;

use crate::model::atom::Atom;
use crate::model::molecule::{Bond, MoleculeGraph};
use crate::model::types::{BondOrder, Element};

/// Rejection reasons for an assembled molecular graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SanitizeError {
    #[error("molecule has no atoms")]
    Empty,

    #[error("bond references atom {index} but the molecule has {n_atoms} atoms")]
    BondIndexOutOfRange { index: usize, n_atoms: usize },

    #[error("atom {0} is bonded to itself")]
    SelfBond(usize),

    #[error("duplicate bond between atoms {i} and {j}")]
    DuplicateBond { i: usize, j: usize },

    #[error("valence {valence:.1} on atom {index} ({element}) exceeds the maximum {max:.1}")]
    ValenceExceeded {
        index: usize,
        element: Element,
        valence: f64,
        max: f64,
    },

    #[error("aromatic bond between atoms {i} and {j} with a non-aromatic endpoint")]
    AromaticBondEndpoint { i: usize, j: usize },

    #[error("aromatic atom {0} has fewer than two aromatic bonds")]
    BrokenAromaticRing(usize),
}

/// A validated molecule handle.
///
/// Construction goes through [`sanitize`]; the adjacency list, perceived
/// rings, and canonical SMILES string are computed once at that point.
#[derive(Debug, Clone)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<(usize, BondOrder)>>,
    rings: Vec<Vec<usize>>,
    smiles: String,
}

impl Molecule {
    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[inline]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Neighbor list per atom as `(neighbor index, bond order)` pairs.
    #[inline]
    pub fn adjacency(&self) -> &[Vec<(usize, BondOrder)>] {
        &self.adjacency
    }

    /// Perceived rings, each a cyclic sequence of atom indices.
    #[inline]
    pub fn rings(&self) -> &[Vec<usize>] {
        &self.rings
    }

    /// Canonical SMILES. Disconnected fragments are joined with `.`.
    #[inline]
    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_connected(&self) -> bool {
        !self.smiles.contains('.')
    }
}

/// Highest valence the sanitizer tolerates per element.
///
/// This is the toolkit's own (permissive) valence model; the stricter
/// per-element allowed-valence sets used by the stability heuristic live in
/// the injectable bonding rules instead.
fn max_valence(element: Element) -> f64 {
    match element {
        Element::H => 1.0,
        Element::B => 3.0,
        Element::C => 4.0,
        Element::N => 3.0,
        Element::O => 2.0,
        Element::F => 1.0,
        Element::Al => 3.0,
        Element::Si => 4.0,
        Element::P => 5.0,
        Element::S => 6.0,
        Element::Cl => 1.0,
        Element::As => 5.0,
        Element::Se => 6.0,
        Element::Br => 1.0,
        Element::I => 1.0,
        Element::Hg => 2.0,
        Element::Bi => 5.0,
    }
}

/// Validates an assembled graph and materializes a [`Molecule`].
///
/// Checks bond indices, duplicate bonds, per-atom valence against
/// [`max_valence`] (aromatic bonds weigh 1.5; atoms inside an aromatic ring
/// get one extra unit of slack for the delocalized system), and aromatic
/// consistency: every aromatic bond joins two aromatic atoms and every
/// aromatic atom carries at least two aromatic bonds.
pub fn sanitize(graph: MoleculeGraph) -> Result<Molecule, SanitizeError> {
    let MoleculeGraph { atoms, bonds } = graph;
    let n = atoms.len();
    if n == 0 {
        return Err(SanitizeError::Empty);
    }

    let mut seen = std::collections::HashSet::new();
    let mut adjacency: Vec<Vec<(usize, BondOrder)>> = vec![Vec::new(); n];
    for bond in &bonds {
        for index in [bond.i, bond.j] {
            if index >= n {
                return Err(SanitizeError::BondIndexOutOfRange { index, n_atoms: n });
            }
        }
        if bond.i == bond.j {
            return Err(SanitizeError::SelfBond(bond.i));
        }
        if !seen.insert((bond.i, bond.j)) {
            return Err(SanitizeError::DuplicateBond {
                i: bond.i,
                j: bond.j,
            });
        }
        adjacency[bond.i].push((bond.j, bond.order));
        adjacency[bond.j].push((bond.i, bond.order));
    }

    for (index, atom) in atoms.iter().enumerate() {
        let mut valence = 0.0;
        let mut n_aromatic = 0usize;
        for &(_, order) in &adjacency[index] {
            valence += order.value();
            if order == BondOrder::Aromatic {
                n_aromatic += 1;
            }
        }
        let mut max = max_valence(atom.element);
        if n_aromatic >= 2 {
            max += 1.0;
        }
        if valence > max + 1e-9 {
            return Err(SanitizeError::ValenceExceeded {
                index,
                element: atom.element,
                valence,
                max,
            });
        }
    }

    for bond in &bonds {
        if bond.order == BondOrder::Aromatic
            && !(atoms[bond.i].is_aromatic && atoms[bond.j].is_aromatic)
        {
            return Err(SanitizeError::AromaticBondEndpoint {
                i: bond.i,
                j: bond.j,
            });
        }
    }
    for (index, atom) in atoms.iter().enumerate() {
        if atom.is_aromatic {
            let n_aromatic = adjacency[index]
                .iter()
                .filter(|(_, order)| *order == BondOrder::Aromatic)
                .count();
            if n_aromatic < 2 {
                return Err(SanitizeError::BrokenAromaticRing(index));
            }
        }
    }

    let rings = rings::perceive_rings(n, &adjacency);
    let ranks = canon::canonical_ranks(&atoms, &adjacency);
    let smiles = smiles::write_smiles(&atoms, &adjacency, &ranks);

    Ok(Molecule {
        atoms,
        bonds,
        adjacency,
        rings,
        smiles,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Ethanol heavy-atom + hydrogen graph: C-C-O with hydrogens.
    pub fn ethanol() -> MoleculeGraph {
        let mut g = MoleculeGraph::new();
        g.atoms.push(Atom::new(Element::C, [-1.270, 0.248, 0.000]));
        g.atoms.push(Atom::new(Element::C, [0.139, -0.308, 0.000]));
        g.atoms.push(Atom::new(Element::O, [1.036, 0.789, 0.000]));
        g.atoms.push(Atom::new(Element::H, [-1.317, 0.885, 0.883]));
        g.atoms.push(Atom::new(Element::H, [-1.317, 0.885, -0.883]));
        g.atoms.push(Atom::new(Element::H, [-2.030, -0.533, 0.000]));
        g.atoms.push(Atom::new(Element::H, [0.358, -0.920, 0.876]));
        g.atoms.push(Atom::new(Element::H, [0.358, -0.920, -0.876]));
        g.atoms.push(Atom::new(Element::H, [1.939, 0.473, 0.000]));
        g.bonds.push(Bond::new(0, 1, BondOrder::Single));
        g.bonds.push(Bond::new(1, 2, BondOrder::Single));
        g.bonds.push(Bond::new(0, 3, BondOrder::Single));
        g.bonds.push(Bond::new(0, 4, BondOrder::Single));
        g.bonds.push(Bond::new(0, 5, BondOrder::Single));
        g.bonds.push(Bond::new(1, 6, BondOrder::Single));
        g.bonds.push(Bond::new(1, 7, BondOrder::Single));
        g.bonds.push(Bond::new(2, 8, BondOrder::Single));
        g
    }

    /// Benzene ring, heavy atoms only, all aromatic.
    pub fn benzene() -> MoleculeGraph {
        let mut g = MoleculeGraph::new();
        for i in 0..6 {
            let angle = (i as f64) * std::f64::consts::PI / 3.0;
            let x = 1.39 * angle.cos();
            let y = 1.39 * angle.sin();
            g.atoms.push(Atom::aromatic(Element::C, [x, y, 0.0]));
        }
        for i in 0..6 {
            g.bonds.push(Bond::new(i, (i + 1) % 6, BondOrder::Aromatic));
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_ethanol() {
        let mol = sanitize(fixtures::ethanol()).unwrap();
        assert_eq!(mol.atom_count(), 9);
        assert!(mol.is_connected());
        assert!(mol.rings().is_empty());
    }

    #[test]
    fn sanitizes_benzene_with_one_ring() {
        let mol = sanitize(fixtures::benzene()).unwrap();
        assert_eq!(mol.rings().len(), 1);
        assert_eq!(mol.rings()[0].len(), 6);
        assert!(mol.is_connected());
    }

    #[test]
    fn rejects_empty_graph() {
        assert!(matches!(
            sanitize(MoleculeGraph::new()),
            Err(SanitizeError::Empty)
        ));
    }

    #[test]
    fn rejects_out_of_range_bond() {
        let mut g = MoleculeGraph::new();
        g.atoms.push(Atom::new(Element::C, [0.0; 3]));
        g.bonds.push(Bond::new(0, 3, BondOrder::Single));
        assert!(matches!(
            sanitize(g),
            Err(SanitizeError::BondIndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_bond() {
        let mut g = MoleculeGraph::new();
        g.atoms.push(Atom::new(Element::C, [0.0; 3]));
        g.atoms.push(Atom::new(Element::C, [1.5, 0.0, 0.0]));
        g.bonds.push(Bond::new(0, 1, BondOrder::Single));
        g.bonds.push(Bond::new(1, 0, BondOrder::Single));
        assert!(matches!(
            sanitize(g),
            Err(SanitizeError::DuplicateBond { i: 0, j: 1 })
        ));
    }

    #[test]
    fn rejects_overvalent_carbon() {
        let mut g = MoleculeGraph::new();
        g.atoms.push(Atom::new(Element::C, [0.0; 3]));
        for k in 0..3 {
            g.atoms.push(Atom::new(Element::O, [k as f64 + 1.0, 0.0, 0.0]));
            g.bonds.push(Bond::new(0, k + 1, BondOrder::Double));
        }
        assert!(matches!(
            sanitize(g),
            Err(SanitizeError::ValenceExceeded { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_aromatic_bond_to_plain_atom() {
        let mut g = MoleculeGraph::new();
        g.atoms.push(Atom::aromatic(Element::C, [0.0; 3]));
        g.atoms.push(Atom::new(Element::C, [1.4, 0.0, 0.0]));
        g.bonds.push(Bond::new(0, 1, BondOrder::Aromatic));
        assert!(matches!(
            sanitize(g),
            Err(SanitizeError::AromaticBondEndpoint { .. })
        ));
    }

    #[test]
    fn rejects_dangling_aromatic_atom() {
        let mut g = MoleculeGraph::new();
        g.atoms.push(Atom::aromatic(Element::C, [0.0; 3]));
        g.atoms.push(Atom::aromatic(Element::C, [1.4, 0.0, 0.0]));
        g.bonds.push(Bond::new(0, 1, BondOrder::Aromatic));
        assert!(matches!(
            sanitize(g),
            Err(SanitizeError::BrokenAromaticRing(_))
        ));
    }

    #[test]
    fn disconnected_fragments_show_in_smiles() {
        let mut g = MoleculeGraph::new();
        g.atoms.push(Atom::new(Element::C, [0.0; 3]));
        g.atoms.push(Atom::new(Element::O, [5.0, 0.0, 0.0]));
        let mol = sanitize(g).unwrap();
        assert!(!mol.is_connected());
        assert!(mol.smiles().contains('.'));
    }
}
