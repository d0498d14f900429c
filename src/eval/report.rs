//! Consolidated run report.

use std::collections::BTreeMap;

use serde::Serialize;

use super::accumulator::RunAccumulator;
use super::profile::{
    atom_type_divergence, bond_profile, eval_bond_profile, eval_pair_profile, pair_profile,
    ReferenceProfile,
};

/// Final metrics of one evaluation run.
///
/// Fractions are in [0, 1]; divergence metrics are `None` when the
/// corresponding distribution had no observations.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub reference_version: String,
    pub n_samples: usize,
    pub n_recon_success: usize,
    pub n_complete: usize,
    pub n_eval_success: usize,

    /// Stage-gate fractions: `mol_stable`, `atm_stable`, `recon_success`,
    /// `eval_success`, `complete`.
    pub validity: BTreeMap<String, Option<f64>>,

    /// Jensen-Shannon scores for bonded distances of success molecules.
    pub bond_metrics: BTreeMap<String, Option<f64>>,

    /// Jensen-Shannon scores for all-pair distances of success molecules.
    pub pair_metrics: BTreeMap<String, Option<f64>>,

    /// Divergence of the success atom-type distribution from the reference.
    pub atom_type_js: Option<f64>,

    /// Fraction of statistics-contributing molecules containing a ring of
    /// each size 3..=9.
    pub ring_ratios: BTreeMap<usize, f64>,
}

impl EvalReport {
    pub fn from_run(acc: &RunAccumulator, reference: &ReferenceProfile) -> Self {
        let n = acc.n_samples as f64;
        let mut validity = BTreeMap::new();
        validity.insert(
            "mol_stable".to_string(),
            Some(acc.n_mol_stable as f64 / n),
        );
        validity.insert(
            "atm_stable".to_string(),
            (acc.n_atoms > 0).then(|| acc.n_atom_stable as f64 / acc.n_atoms as f64),
        );
        validity.insert(
            "recon_success".to_string(),
            Some(acc.n_recon_success as f64 / n),
        );
        validity.insert(
            "eval_success".to_string(),
            Some(acc.n_eval_success as f64 / n),
        );
        validity.insert("complete".to_string(), Some(acc.n_complete as f64 / n));

        let bond_metrics = eval_bond_profile(&bond_profile(&acc.bond_records), reference);
        let pair_metrics = eval_pair_profile(&pair_profile(&acc.success_pair_records), reference);
        let atom_type_js = atom_type_divergence(&acc.success_atom_types, reference);

        let mut ring_ratios = BTreeMap::new();
        if acc.n_ring_counted > 0 {
            for size in 3..=9usize {
                let count = acc.ring_size_mols.get(&size).copied().unwrap_or(0);
                ring_ratios.insert(size, count as f64 / acc.n_ring_counted as f64);
            }
        }

        Self {
            reference_version: reference.version.clone(),
            n_samples: acc.n_samples,
            n_recon_success: acc.n_recon_success,
            n_complete: acc.n_complete,
            n_eval_success: acc.n_eval_success,
            validity,
            bond_metrics,
            pair_metrics,
            atom_type_js,
            ring_ratios,
        }
    }

    /// Every named metric in display order.
    pub fn metrics(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.validity
            .iter()
            .chain(self.bond_metrics.iter())
            .chain(self.pair_metrics.iter())
            .map(|(name, value)| (name.as_str(), *value))
    }
}
