//! Chemical plausibility screening for machine-generated 3D molecular
//! structures. Each generated sample (atom positions + type indices) is
//! decoded, scored for structural stability, reconstructed into a discrete
//! molecular graph, and folded into corpus-level distributional metrics;
//! successfully reconstructed molecules can optionally be handed to an
//! external docking scorer.
//!
//! # Pipeline
//!
//! Per sample, strictly gated stages:
//!
//! 1. **Decode** — atom-type indices to elements and aromaticity flags
//! 2. **Stability** — distance/valence heuristic (independent branch)
//! 3. **Reconstruct** — infer bonds and orders from geometry
//! 4. **Completeness** — reject molecules with disconnected fragments
//! 5. **Scoring** — descriptors plus optional out-of-process docking
//!
//! Per-sample failures are counted and skipped; the run never aborts on a
//! bad sample. Afterwards the accumulated bond-length and pair-distance
//! distributions are compared against a reference profile with the
//! Jensen-Shannon divergence.
//!
//! # Quick Start
//!
//! ```
//! use molscreen::{evaluate, EvalConfig};
//! use molscreen::io::reference::default_reference;
//! use molscreen::io::samples::GeneratedSample;
//!
//! // One methane-like sample in the add-aromatic encoding
//! // (index 1 = carbon, index 0 = hydrogen).
//! let d = 1.09 / 3f64.sqrt();
//! let sample = GeneratedSample {
//!     pred_pos: vec![
//!         [0.0, 0.0, 0.0],
//!         [d, d, d],
//!         [d, -d, -d],
//!         [-d, d, -d],
//!         [-d, -d, d],
//!     ],
//!     pred_v: vec![1, 0, 0, 0, 0],
//! };
//!
//! let config = EvalConfig::new(default_reference().clone());
//! let run = evaluate(&[sample], &config)?;
//!
//! assert_eq!(run.accumulator.n_recon_success, 1);
//! assert_eq!(run.accumulator.n_complete, 1);
//! assert_eq!(run.report.validity["mol_stable"], Some(1.0));
//! # Ok::<(), molscreen::EvalError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`chem`] — graph sanitization, canonical SMILES, ring perception,
//!   descriptors
//! - [`io`] — sample sets, reference profiles, report/histogram artifacts,
//!   SDF handoff
//! - [`evaluate`] — the batch evaluation entry point
//!
//! # Data Types
//!
//! - [`Atom`], [`Bond`], [`MoleculeGraph`] — raw graph model
//! - [`Element`], [`BondOrder`] — chemistry vocabulary
//! - [`BondingRules`] — injectable distance/valence tables
//! - [`RunAccumulator`], [`EvalReport`] — run statistics and final metrics
//! - [`DockingConfig`] — external scorer invocation settings

mod eval;
mod model;

pub mod chem;
pub mod io;

pub use model::atom::Atom;
pub use model::molecule::{Bond, MoleculeGraph};
pub use model::types::{BondOrder, Element, ParseBondOrderError, ParseElementError};

pub use eval::{
    atom_type_divergence, bond_distances, bond_profile, check_stability, decode, decode_all,
    eval_bond_profile, eval_pair_profile, evaluate, format_bond_key, format_pair_key,
    jensen_shannon, pair_distances, pair_profile, parse_bond_key, parse_pair_key, reconstruct,
    run_docking, AtomEncoding, BinSpec, BondDistanceRecord, BondKey, BondingRules, DecodedAtom,
    DockingConfig, DockingMode, DockingScores, EvalConfig, EvalReport, EvalRun, Margins, PairKey,
    PairDistanceRecord, ReferenceProfile, RunAccumulator, SampleOutcome, StabilityVerdict,
    SuccessStatsPolicy,
};

pub use eval::Error as EvalError;
