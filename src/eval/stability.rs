//! Structural stability scoring.
//!
//! An atom is stable when the valence implied by distance-inferred bonds
//! matches one of its element's allowed valences exactly; a molecule is
//! stable when every atom is.

use super::geometry::euclidean;
use super::rules::BondingRules;
use crate::model::types::Element;

/// Per-sample stability result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityVerdict {
    pub molecule_stable: bool,
    pub n_stable_atoms: usize,
    pub n_atoms: usize,
}

/// Infers neighbors for every atom from the distance brackets and compares
/// the summed bond orders against the allowed valences.
///
/// Atoms with no inferred neighbor imply valence 0, which no element
/// allows, so isolated atoms are always unstable.
pub fn check_stability(
    positions: &[[f64; 3]],
    elements: &[Element],
    rules: &BondingRules,
) -> StabilityVerdict {
    let n = positions.len().min(elements.len());
    let mut implied_valence = vec![0u32; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let distance = euclidean(&positions[i], &positions[j]);
            if let Some(order) = rules.infer_order(elements[i], elements[j], distance) {
                let weight = order.value() as u32;
                implied_valence[i] += weight;
                implied_valence[j] += weight;
            }
        }
    }

    let n_stable_atoms = (0..n)
        .filter(|&i| rules.allowed_valences(elements[i]).contains(&implied_valence[i]))
        .count();

    StabilityVerdict {
        molecule_stable: n > 0 && n_stable_atoms == n,
        n_stable_atoms,
        n_atoms: n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> &'static BondingRules {
        BondingRules::default_rules()
    }

    #[test]
    fn isolated_atom_is_unstable() {
        let verdict = check_stability(&[[0.0; 3]], &[Element::C], rules());
        assert!(!verdict.molecule_stable);
        assert_eq!(verdict.n_stable_atoms, 0);
        assert_eq!(verdict.n_atoms, 1);
    }

    #[test]
    fn methane_is_stable() {
        // Tetrahedral CH4, C-H at 1.09 Å.
        let d = 1.09 / 3f64.sqrt();
        let positions = [
            [0.0, 0.0, 0.0],
            [d, d, d],
            [d, -d, -d],
            [-d, d, -d],
            [-d, -d, d],
        ];
        let elements = [
            Element::C,
            Element::H,
            Element::H,
            Element::H,
            Element::H,
        ];
        let verdict = check_stability(&positions, &elements, rules());
        assert!(verdict.molecule_stable);
        assert_eq!(verdict.n_stable_atoms, 5);
    }

    #[test]
    fn stretched_methane_loses_stability() {
        let d = 3.0;
        let positions = [
            [0.0, 0.0, 0.0],
            [d, 0.0, 0.0],
            [-d, 0.0, 0.0],
            [0.0, d, 0.0],
            [0.0, -d, 0.0],
        ];
        let elements = [
            Element::C,
            Element::H,
            Element::H,
            Element::H,
            Element::H,
        ];
        let verdict = check_stability(&positions, &elements, rules());
        assert!(!verdict.molecule_stable);
        assert_eq!(verdict.n_stable_atoms, 0);
    }

    #[test]
    fn carbon_monoxide_distance_counts_as_triple() {
        // C≡O at 1.13 Å gives both atoms implied valence 3: unstable for
        // O (allowed 2) and for C (allowed 4).
        let verdict = check_stability(
            &[[0.0; 3], [1.13, 0.0, 0.0]],
            &[Element::C, Element::O],
            rules(),
        );
        assert!(!verdict.molecule_stable);
    }

    #[test]
    fn formaldehyde_is_stable() {
        // H2C=O: C=O 1.21 Å, C-H 1.10 Å.
        let positions = [
            [0.0, 0.0, 0.0],
            [1.21, 0.0, 0.0],
            [-0.55, 0.95, 0.0],
            [-0.55, -0.95, 0.0],
        ];
        let elements = [Element::C, Element::O, Element::H, Element::H];
        let verdict = check_stability(&positions, &elements, rules());
        assert!(verdict.molecule_stable);
        assert_eq!(verdict.n_stable_atoms, 4);
    }

    #[test]
    fn empty_sample_is_not_stable() {
        let verdict = check_stability(&[], &[], rules());
        assert!(!verdict.molecule_stable);
        assert_eq!(verdict.n_atoms, 0);
    }
}
