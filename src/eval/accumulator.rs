//! Run-level accumulator state.
//!
//! All corpus counters and distance lists live in one explicit value owned
//! by the orchestrator. `merge` is commutative and associative, so partial
//! accumulators produced independently (one per worker, if the fold is ever
//! parallelized) combine into the same totals in any order.

use std::collections::BTreeMap;

use super::geometry::{BondDistanceRecord, PairDistanceRecord};
use super::stability::StabilityVerdict;
use crate::model::types::Element;

/// Terminal classification of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SampleOutcome {
    /// Atom-type decoding rejected the sample.
    DecodeFailed,
    /// No consistent bond/valence assignment was found.
    ReconstructionFailed,
    /// Reconstructed but split into disconnected fragments.
    Incomplete,
    /// Complete but the scoring stage (docking) failed.
    ScoringFailed,
    /// Passed every stage.
    Success,
}

#[derive(Debug, Clone, Default)]
pub struct RunAccumulator {
    pub n_samples: usize,
    pub n_mol_stable: usize,
    pub n_atom_stable: usize,
    pub n_atoms: usize,
    pub n_recon_success: usize,
    pub n_complete: usize,
    pub n_eval_success: usize,
    pub outcomes: BTreeMap<SampleOutcome, usize>,

    pub all_pair_records: Vec<PairDistanceRecord>,
    pub success_pair_records: Vec<PairDistanceRecord>,
    pub bond_records: Vec<BondDistanceRecord>,

    pub all_atom_types: BTreeMap<Element, usize>,
    pub success_atom_types: BTreeMap<Element, usize>,

    /// Ring size -> number of statistics-contributing molecules containing
    /// at least one ring of that size.
    pub ring_size_mols: BTreeMap<usize, usize>,
    /// Molecules contributing to the ring-size tallies.
    pub n_ring_counted: usize,
}

impl RunAccumulator {
    pub fn new(n_samples: usize) -> Self {
        Self {
            n_samples,
            ..Self::default()
        }
    }

    pub fn record_outcome(&mut self, outcome: SampleOutcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }

    pub fn fold_stability(&mut self, verdict: &StabilityVerdict) {
        if verdict.molecule_stable {
            self.n_mol_stable += 1;
        }
        self.n_atom_stable += verdict.n_stable_atoms;
        self.n_atoms += verdict.n_atoms;
    }

    pub fn count_atom_types(&mut self, elements: &[Element], success: bool) {
        let tally = if success {
            &mut self.success_atom_types
        } else {
            &mut self.all_atom_types
        };
        for &element in elements {
            *tally.entry(element).or_insert(0) += 1;
        }
    }

    /// Folds one molecule's ring sizes into the corpus tallies; a molecule
    /// counts once per distinct ring size it contains.
    pub fn count_ring_sizes(&mut self, ring_sizes: &[usize]) {
        self.n_ring_counted += 1;
        let mut distinct: Vec<usize> = ring_sizes.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        for size in distinct {
            *self.ring_size_mols.entry(size).or_insert(0) += 1;
        }
    }

    /// Combines two partial accumulators. Commutative and associative.
    pub fn merge(mut self, other: Self) -> Self {
        self.n_samples += other.n_samples;
        self.n_mol_stable += other.n_mol_stable;
        self.n_atom_stable += other.n_atom_stable;
        self.n_atoms += other.n_atoms;
        self.n_recon_success += other.n_recon_success;
        self.n_complete += other.n_complete;
        self.n_eval_success += other.n_eval_success;
        for (outcome, count) in other.outcomes {
            *self.outcomes.entry(outcome).or_insert(0) += count;
        }
        self.all_pair_records.extend(other.all_pair_records);
        self.success_pair_records.extend(other.success_pair_records);
        self.bond_records.extend(other.bond_records);
        for (element, count) in other.all_atom_types {
            *self.all_atom_types.entry(element).or_insert(0) += count;
        }
        for (element, count) in other.success_atom_types {
            *self.success_atom_types.entry(element).or_insert(0) += count;
        }
        for (size, count) in other.ring_size_mols {
            *self.ring_size_mols.entry(size).or_insert(0) += count;
        }
        self.n_ring_counted += other.n_ring_counted;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulator_with_counts(stable: usize, atoms: usize) -> RunAccumulator {
        let mut acc = RunAccumulator::new(1);
        acc.fold_stability(&StabilityVerdict {
            molecule_stable: stable == atoms,
            n_stable_atoms: stable,
            n_atoms: atoms,
        });
        acc
    }

    #[test]
    fn fold_stability_accumulates() {
        let mut acc = RunAccumulator::new(2);
        acc.fold_stability(&StabilityVerdict {
            molecule_stable: true,
            n_stable_atoms: 4,
            n_atoms: 4,
        });
        acc.fold_stability(&StabilityVerdict {
            molecule_stable: false,
            n_stable_atoms: 1,
            n_atoms: 3,
        });
        assert_eq!(acc.n_mol_stable, 1);
        assert_eq!(acc.n_atom_stable, 5);
        assert_eq!(acc.n_atoms, 7);
    }

    #[test]
    fn merge_is_commutative() {
        let a = accumulator_with_counts(3, 4);
        let b = accumulator_with_counts(2, 2);

        let ab = a.clone().merge(b.clone());
        let ba = b.merge(a);
        assert_eq!(ab.n_samples, ba.n_samples);
        assert_eq!(ab.n_atom_stable, ba.n_atom_stable);
        assert_eq!(ab.n_mol_stable, ba.n_mol_stable);
        assert_eq!(ab.n_atoms, ba.n_atoms);
    }

    #[test]
    fn ring_sizes_count_molecules_not_rings() {
        let mut acc = RunAccumulator::new(1);
        // Two six-rings and a five-ring in one molecule.
        acc.count_ring_sizes(&[6, 6, 5]);
        assert_eq!(acc.ring_size_mols[&6], 1);
        assert_eq!(acc.ring_size_mols[&5], 1);
        assert_eq!(acc.n_ring_counted, 1);
    }

    #[test]
    fn outcome_tallies() {
        let mut acc = RunAccumulator::new(3);
        acc.record_outcome(SampleOutcome::Success);
        acc.record_outcome(SampleOutcome::Success);
        acc.record_outcome(SampleOutcome::Incomplete);
        assert_eq!(acc.outcomes[&SampleOutcome::Success], 2);
        assert_eq!(acc.outcomes[&SampleOutcome::Incomplete], 1);
        assert_eq!(acc.outcomes.get(&SampleOutcome::DecodeFailed), None);
    }
}
