//! Pairwise distance extraction.
//!
//! Element pairs are canonically ordered (ascending atomic number) so that
//! (C, N) and (N, C) fold onto the same key regardless of atom labeling.

use super::rules::pair_key;
use crate::chem::Molecule;
use crate::model::types::{BondOrder, Element};

/// Distance between two atoms of a sample, keyed by element pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairDistanceRecord {
    pub a: Element,
    pub b: Element,
    pub distance: f64,
}

/// Distance along an accepted bond, keyed by element pair and order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondDistanceRecord {
    pub a: Element,
    pub b: Element,
    pub order: BondOrder,
    pub distance: f64,
}

#[inline]
pub fn euclidean(p: &[f64; 3], q: &[f64; 3]) -> f64 {
    let dx = p[0] - q[0];
    let dy = p[1] - q[1];
    let dz = p[2] - q[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// All unordered atom pairs of one sample, O(n²).
pub fn pair_distances(positions: &[[f64; 3]], elements: &[Element]) -> Vec<PairDistanceRecord> {
    let n = positions.len().min(elements.len());
    let mut records = Vec::with_capacity(n.saturating_sub(1) * n / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = pair_key(elements[i], elements[j]);
            records.push(PairDistanceRecord {
                a,
                b,
                distance: euclidean(&positions[i], &positions[j]),
            });
        }
    }
    records
}

/// Accepted bonds of a reconstructed molecule, tagged with order.
pub fn bond_distances(mol: &Molecule) -> Vec<BondDistanceRecord> {
    mol.bonds()
        .iter()
        .map(|bond| {
            let (a, b) = pair_key(mol.atoms()[bond.i].element, mol.atoms()[bond.j].element);
            BondDistanceRecord {
                a,
                b,
                order: bond.order,
                distance: euclidean(
                    &mol.atoms()[bond.i].position,
                    &mol.atoms()[bond.j].position,
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn distances_are_euclidean() {
        let positions = [[0.0, 0.0, 0.0], [3.0, 4.0, 0.0]];
        let elements = [Element::C, Element::N];
        let records = pair_distances(&positions, &elements);
        assert_eq!(records.len(), 1);
        assert!(approx_eq(records[0].distance, 5.0, 1e-12));
    }

    #[test]
    fn element_pairs_are_canonically_ordered() {
        let positions = [[0.0; 3], [1.0, 0.0, 0.0]];
        let forward = pair_distances(&positions, &[Element::C, Element::N]);
        let swapped = pair_distances(&positions, &[Element::N, Element::C]);
        assert_eq!(forward[0].a, Element::C);
        assert_eq!(forward[0].b, Element::N);
        assert_eq!(swapped[0].a, Element::C);
        assert_eq!(swapped[0].b, Element::N);
    }

    #[test]
    fn record_set_invariant_under_relabeling() {
        let positions = [[0.0; 3], [1.4, 0.0, 0.0], [2.8, 0.0, 0.0]];
        let elements = [Element::C, Element::N, Element::O];
        // Reverse the atom order entirely.
        let reversed_pos = [[2.8, 0.0, 0.0], [1.4, 0.0, 0.0], [0.0; 3]];
        let reversed_elem = [Element::O, Element::N, Element::C];

        let mut a: Vec<(Element, Element, u64)> = pair_distances(&positions, &elements)
            .into_iter()
            .map(|r| (r.a, r.b, r.distance.to_bits()))
            .collect();
        let mut b: Vec<(Element, Element, u64)> = pair_distances(&reversed_pos, &reversed_elem)
            .into_iter()
            .map(|r| (r.a, r.b, r.distance.to_bits()))
            .collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn pair_count_is_quadratic() {
        let positions = vec![[0.0; 3]; 5];
        let elements = vec![Element::C; 5];
        assert_eq!(pair_distances(&positions, &elements).len(), 10);
    }

    #[test]
    fn bond_records_carry_order() {
        use crate::chem::sanitize;
        use crate::model::atom::Atom;
        use crate::model::molecule::{Bond, MoleculeGraph};

        let mut g = MoleculeGraph::new();
        g.atoms.push(Atom::new(Element::C, [0.0; 3]));
        g.atoms.push(Atom::new(Element::O, [1.22, 0.0, 0.0]));
        g.bonds.push(Bond::new(0, 1, BondOrder::Double));
        let mol = sanitize(g).unwrap();

        let records = bond_distances(&mol);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].order, BondOrder::Double);
        assert!(approx_eq(records[0].distance, 1.22, 1e-12));
        assert_eq!((records[0].a, records[0].b), (Element::C, Element::O));
    }
}
