//! The evaluation pipeline core.
//!
//! [`evaluate`] drives every sample through the gated stage sequence
//! decode -> stability (non-gating) -> reconstruct -> completeness ->
//! scoring, folds the per-sample results into a [`RunAccumulator`], and
//! emits one consolidated [`EvalReport`]. Per-sample failures are tallied
//! and skipped; only run-level problems (empty input, missing docking
//! target) abort.

mod accumulator;
mod decode;
mod docking;
mod error;
mod geometry;
mod profile;
mod reconstruct;
mod report;
mod rules;
mod stability;

pub use accumulator::{RunAccumulator, SampleOutcome};
pub use decode::{decode, decode_all, AtomEncoding, DecodedAtom};
pub use docking::{run_docking, DockingConfig, DockingMode, DockingScores};
pub use error::Error;
pub use geometry::{bond_distances, pair_distances, BondDistanceRecord, PairDistanceRecord};
pub use profile::{
    atom_type_divergence, bond_profile, eval_bond_profile, eval_pair_profile, format_bond_key,
    format_pair_key, jensen_shannon, pair_profile, parse_bond_key, parse_pair_key, BinSpec,
    BondKey, PairKey, ReferenceProfile,
};
pub use reconstruct::reconstruct;
pub use report::EvalReport;
pub use rules::{BondingRules, Margins};
pub use stability::{check_stability, StabilityVerdict};

use log::{debug, warn};

use crate::chem;
use crate::io::samples::GeneratedSample;

/// Which samples feed the "success" distance statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuccessStatsPolicy {
    /// Chemical scoring must pass; the docking outcome is ignored.
    Scored,
    /// Docking (when configured) must also pass.
    #[default]
    Docked,
}

/// Configuration of one evaluation run.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub encoding: AtomEncoding,
    pub rules: BondingRules,
    pub reference: ReferenceProfile,
    pub docking: Option<DockingConfig>,
    pub success_stats: SuccessStatsPolicy,
    /// Reference ligand id addressing the docking receptor.
    pub ligand_id: Option<String>,
}

impl EvalConfig {
    pub fn new(reference: ReferenceProfile) -> Self {
        Self {
            encoding: AtomEncoding::default(),
            rules: BondingRules::default_rules().clone(),
            reference,
            docking: None,
            success_stats: SuccessStatsPolicy::default(),
            ligand_id: None,
        }
    }
}

/// Report plus the raw accumulator, kept for artifact output.
#[derive(Debug)]
pub struct EvalRun {
    pub report: EvalReport,
    pub accumulator: RunAccumulator,
}

/// Evaluates a batch of generated samples.
pub fn evaluate(samples: &[GeneratedSample], config: &EvalConfig) -> Result<EvalRun, Error> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }
    if config.docking.is_some() && config.ligand_id.is_none() {
        return Err(Error::docking(
            "docking is enabled but no reference ligand id was provided",
        ));
    }

    let mut acc = RunAccumulator::new(samples.len());

    for (sample_idx, sample) in samples.iter().enumerate() {
        process_sample(sample_idx, sample, config, &mut acc);
    }

    let report = EvalReport::from_run(&acc, &config.reference);
    Ok(EvalRun {
        report,
        accumulator: acc,
    })
}

fn process_sample(
    sample_idx: usize,
    sample: &GeneratedSample,
    config: &EvalConfig,
    acc: &mut RunAccumulator,
) {
    // Decode gate.
    let decoded = match decode_sample(sample, config.encoding) {
        Ok(d) => d,
        Err(e) => {
            warn!("sample {}: decode failed: {}", sample_idx, e);
            acc.record_outcome(SampleOutcome::DecodeFailed);
            return;
        }
    };
    let elements: Vec<_> = decoded.iter().map(|d| d.element).collect();
    let aromatic: Vec<_> = decoded.iter().map(|d| d.is_aromatic).collect();
    acc.count_atom_types(&elements, false);

    // Stability branch; informs counters only, never gates.
    let verdict = check_stability(&sample.pred_pos, &elements, &config.rules);
    acc.fold_stability(&verdict);

    let pair_records = pair_distances(&sample.pred_pos, &elements);
    acc.all_pair_records.extend_from_slice(&pair_records);

    // Reconstruction gate.
    let mol = match reconstruct(&sample.pred_pos, &elements, &aromatic, &config.rules) {
        Ok(mol) => mol,
        Err(e) => {
            warn!("sample {}: reconstruction failed: {}", sample_idx, e);
            acc.record_outcome(SampleOutcome::ReconstructionFailed);
            return;
        }
    };
    acc.n_recon_success += 1;

    // Completeness gate: no fragment separator in the canonical form.
    if !mol.is_connected() {
        debug!(
            "sample {}: incomplete molecule {}",
            sample_idx,
            mol.smiles()
        );
        acc.record_outcome(SampleOutcome::Incomplete);
        return;
    }
    acc.n_complete += 1;

    // Chemical scoring, then optional docking.
    let descriptors = chem::descriptors(&mol);
    debug!(
        "sample {}: {} ({:.1} Da, {} rings)",
        sample_idx,
        mol.smiles(),
        descriptors.mol_weight,
        descriptors.n_rings
    );

    let mut eval_ok = true;
    if let Some(docking_config) = &config.docking {
        let ligand_id = config.ligand_id.as_deref().expect("checked at run start");
        match run_docking(&mol, ligand_id, docking_config) {
            Ok(scores) => {
                debug!(
                    "sample {}: docking score {:.3}",
                    sample_idx, scores.score_only
                );
            }
            Err(e) => {
                warn!("sample {}: docking failed: {}", sample_idx, e);
                eval_ok = false;
            }
        }
    }
    if eval_ok {
        acc.n_eval_success += 1;
        acc.record_outcome(SampleOutcome::Success);
    } else {
        acc.record_outcome(SampleOutcome::ScoringFailed);
    }

    // Success statistics, per the configured inclusion policy.
    if eval_ok || config.success_stats == SuccessStatsPolicy::Scored {
        acc.bond_records.extend(bond_distances(&mol));
        acc.success_pair_records.extend_from_slice(&pair_records);
        acc.count_atom_types(&elements, true);
        acc.count_ring_sizes(&descriptors.ring_sizes);
    }
}

fn decode_sample(
    sample: &GeneratedSample,
    encoding: AtomEncoding,
) -> Result<Vec<DecodedAtom>, Error> {
    if sample.pred_pos.len() != sample.pred_v.len() {
        return Err(Error::LengthMismatch {
            n_positions: sample.pred_pos.len(),
            n_types: sample.pred_v.len(),
        });
    }
    decode_all(&sample.pred_v, encoding)
}
