//! Bond-length profiles and divergence scoring against a reference.
//!
//! Profiles are grouped observation lists, recomputed per run from the
//! accumulated records. Scoring discretizes both sides over the reference's
//! fixed bin domain and compares them with the Jensen-Shannon divergence
//! (base-2 logarithms, so the range is [0, 1]).

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geometry::{BondDistanceRecord, PairDistanceRecord};
use crate::model::types::{BondOrder, Element};

pub type PairKey = (Element, Element);
pub type BondKey = (Element, Element, BondOrder);

/// Fixed equal-width binning over [lo, hi).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    pub lo: f64,
    pub hi: f64,
    pub n: usize,
}

impl BinSpec {
    /// Bin counts for `values`; observations outside the domain are dropped.
    pub fn histogram(&self, values: &[f64]) -> Vec<f64> {
        let mut counts = vec![0.0; self.n];
        if self.n == 0 || self.hi <= self.lo {
            return counts;
        }
        let width = (self.hi - self.lo) / self.n as f64;
        for &v in values {
            if v >= self.lo && v < self.hi {
                let bin = ((v - self.lo) / width) as usize;
                counts[bin.min(self.n - 1)] += 1.0;
            }
        }
        counts
    }
}

/// Groups pair-distance records by canonical element pair.
pub fn pair_profile(records: &[PairDistanceRecord]) -> BTreeMap<PairKey, Vec<f64>> {
    let mut profile: BTreeMap<PairKey, Vec<f64>> = BTreeMap::new();
    for r in records {
        profile.entry((r.a, r.b)).or_default().push(r.distance);
    }
    profile
}

/// Groups bond-distance records by element pair and order.
pub fn bond_profile(records: &[BondDistanceRecord]) -> BTreeMap<BondKey, Vec<f64>> {
    let mut profile: BTreeMap<BondKey, Vec<f64>> = BTreeMap::new();
    for r in records {
        profile
            .entry((r.a, r.b, r.order))
            .or_default()
            .push(r.distance);
    }
    profile
}

pub fn format_pair_key(key: &PairKey) -> String {
    format!("{}-{}", key.0.symbol(), key.1.symbol())
}

pub fn format_bond_key(key: &BondKey) -> String {
    format!("{}-{}|{}", key.0.symbol(), key.1.symbol(), key.2.token())
}

pub fn parse_pair_key(s: &str) -> Option<PairKey> {
    let (a, b) = s.split_once('-')?;
    Some((Element::from_str(a).ok()?, Element::from_str(b).ok()?))
}

pub fn parse_bond_key(s: &str) -> Option<BondKey> {
    let (pair, order) = s.split_once('|')?;
    let (a, b) = parse_pair_key(pair)?;
    Some((a, b, BondOrder::from_str(order).ok()?))
}

/// Jensen-Shannon divergence between two nonnegative vectors after
/// normalization. `None` when the lengths differ or either side has no
/// mass, which keeps empty distributions out of the scores instead of
/// mapping them to zero.
pub fn jensen_shannon(p: &[f64], q: &[f64]) -> Option<f64> {
    if p.len() != q.len() || p.is_empty() {
        return None;
    }
    let p_total: f64 = p.iter().sum();
    let q_total: f64 = q.iter().sum();
    if p_total <= 0.0 || q_total <= 0.0 {
        return None;
    }

    let mut divergence = 0.0;
    for (&pi, &qi) in p.iter().zip(q.iter()) {
        let pi = pi / p_total;
        let qi = qi / q_total;
        let mi = 0.5 * (pi + qi);
        if pi > 0.0 {
            divergence += 0.5 * pi * (pi / mi).log2();
        }
        if qi > 0.0 {
            divergence += 0.5 * qi * (qi / mi).log2();
        }
    }
    // Clamp fp noise; the divergence is bounded by 1 bit.
    Some(divergence.clamp(0.0, 1.0))
}

/// Reference distributions, versioned alongside the reference dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceProfile {
    pub version: String,
    pub bond_bins: BinSpec,
    pub pair_bins: BinSpec,
    /// Probability vector per bond key ("C-O|2"), `bond_bins.n` entries.
    pub bonds: BTreeMap<String, Vec<f64>>,
    /// Probability vector per pair key ("C-N"), `pair_bins.n` entries.
    pub pairs: BTreeMap<String, Vec<f64>>,
    /// Element symbol -> probability of occurrence.
    pub atom_types: BTreeMap<String, f64>,
}

/// Scores an evaluated pair profile against every pair key the reference
/// carries. Keys with no evaluated observations score `None`. The aggregate
/// `jsd_pair_weighted_mean` weights each scored key by its evaluated
/// observation count.
pub fn eval_pair_profile(
    profile: &BTreeMap<PairKey, Vec<f64>>,
    reference: &ReferenceProfile,
) -> BTreeMap<String, Option<f64>> {
    let mut metrics = BTreeMap::new();
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for (key_str, ref_vec) in &reference.pairs {
        let name = format!("jsd_pair_{}", key_str);
        let score = parse_pair_key(key_str)
            .and_then(|key| profile.get(&key))
            .filter(|lengths| !lengths.is_empty())
            .and_then(|lengths| {
                let hist = reference.pair_bins.histogram(lengths);
                let score = jensen_shannon(&hist, ref_vec);
                if let Some(s) = score {
                    weighted_sum += s * lengths.len() as f64;
                    weight_total += lengths.len() as f64;
                }
                score
            });
        metrics.insert(name, score);
    }

    let mean = (weight_total > 0.0).then(|| weighted_sum / weight_total);
    metrics.insert("jsd_pair_weighted_mean".to_string(), mean);
    metrics
}

/// Bond-profile counterpart of [`eval_pair_profile`].
pub fn eval_bond_profile(
    profile: &BTreeMap<BondKey, Vec<f64>>,
    reference: &ReferenceProfile,
) -> BTreeMap<String, Option<f64>> {
    let mut metrics = BTreeMap::new();
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for (key_str, ref_vec) in &reference.bonds {
        let name = format!("jsd_bond_{}", key_str);
        let score = parse_bond_key(key_str)
            .and_then(|key| profile.get(&key))
            .filter(|lengths| !lengths.is_empty())
            .and_then(|lengths| {
                let hist = reference.bond_bins.histogram(lengths);
                let score = jensen_shannon(&hist, ref_vec);
                if let Some(s) = score {
                    weighted_sum += s * lengths.len() as f64;
                    weight_total += lengths.len() as f64;
                }
                score
            });
        metrics.insert(name, score);
    }

    let mean = (weight_total > 0.0).then(|| weighted_sum / weight_total);
    metrics.insert("jsd_bond_weighted_mean".to_string(), mean);
    metrics
}

/// Divergence between an observed atom-type tally and the reference type
/// distribution, aligned over the union of both key sets.
pub fn atom_type_divergence(
    counts: &BTreeMap<Element, usize>,
    reference: &ReferenceProfile,
) -> Option<f64> {
    if counts.is_empty() || reference.atom_types.is_empty() {
        return None;
    }
    let mut symbols: Vec<String> = reference.atom_types.keys().cloned().collect();
    for element in counts.keys() {
        let symbol = element.symbol().to_string();
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols.sort();

    let observed: Vec<f64> = symbols
        .iter()
        .map(|s| {
            Element::from_str(s)
                .ok()
                .and_then(|e| counts.get(&e))
                .map(|&c| c as f64)
                .unwrap_or(0.0)
        })
        .collect();
    let expected: Vec<f64> = symbols
        .iter()
        .map(|s| reference.atom_types.get(s).copied().unwrap_or(0.0))
        .collect();

    jensen_shannon(&observed, &expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::geometry::PairDistanceRecord;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn small_reference() -> ReferenceProfile {
        let mut pairs = BTreeMap::new();
        pairs.insert("C-C".to_string(), vec![0.0, 0.5, 0.5, 0.0]);
        pairs.insert("C-N".to_string(), vec![0.25, 0.25, 0.25, 0.25]);
        let mut bonds = BTreeMap::new();
        bonds.insert("C-C|1".to_string(), vec![0.0, 1.0, 0.0, 0.0]);
        let mut atom_types = BTreeMap::new();
        atom_types.insert("C".to_string(), 0.8);
        atom_types.insert("N".to_string(), 0.2);
        ReferenceProfile {
            version: "test-1".to_string(),
            bond_bins: BinSpec {
                lo: 1.0,
                hi: 2.0,
                n: 4,
            },
            pair_bins: BinSpec {
                lo: 0.0,
                hi: 4.0,
                n: 4,
            },
            bonds,
            pairs,
            atom_types,
        }
    }

    #[test]
    fn histogram_drops_out_of_domain_values() {
        let bins = BinSpec {
            lo: 0.0,
            hi: 4.0,
            n: 4,
        };
        let hist = bins.histogram(&[0.5, 1.5, 1.7, 3.9, 4.0, -1.0, 12.0]);
        assert_eq!(hist, vec![1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn divergence_of_identical_distributions_is_zero() {
        let p = vec![0.1, 0.4, 0.5];
        assert!(approx_eq(jensen_shannon(&p, &p).unwrap(), 0.0, 1e-12));
    }

    #[test]
    fn divergence_of_disjoint_distributions_is_one() {
        let p = vec![1.0, 0.0, 0.0];
        let q = vec![0.0, 0.0, 1.0];
        assert!(approx_eq(jensen_shannon(&p, &q).unwrap(), 1.0, 1e-12));
    }

    #[test]
    fn divergence_of_empty_distribution_is_none() {
        assert_eq!(jensen_shannon(&[0.0, 0.0], &[0.5, 0.5]), None);
        assert_eq!(jensen_shannon(&[], &[]), None);
        assert_eq!(jensen_shannon(&[1.0], &[0.5, 0.5]), None);
    }

    #[test]
    fn divergence_is_symmetric() {
        let p = vec![0.7, 0.2, 0.1];
        let q = vec![0.1, 0.3, 0.6];
        assert!(approx_eq(
            jensen_shannon(&p, &q).unwrap(),
            jensen_shannon(&q, &p).unwrap(),
            1e-12
        ));
    }

    #[test]
    fn profiles_group_by_key() {
        let records = vec![
            PairDistanceRecord {
                a: Element::C,
                b: Element::C,
                distance: 1.5,
            },
            PairDistanceRecord {
                a: Element::C,
                b: Element::C,
                distance: 2.5,
            },
            PairDistanceRecord {
                a: Element::C,
                b: Element::N,
                distance: 1.4,
            },
        ];
        let profile = pair_profile(&records);
        assert_eq!(profile.len(), 2);
        assert_eq!(profile[&(Element::C, Element::C)].len(), 2);
        assert_eq!(profile[&(Element::C, Element::N)].len(), 1);
    }

    #[test]
    fn missing_key_scores_none_not_zero() {
        let records = vec![PairDistanceRecord {
            a: Element::C,
            b: Element::C,
            distance: 1.5,
        }];
        let metrics = eval_pair_profile(&pair_profile(&records), &small_reference());
        // C-N is in the reference but absent from the evaluated set.
        assert_eq!(metrics["jsd_pair_C-N"], None);
        assert!(metrics["jsd_pair_C-C"].is_some());
    }

    #[test]
    fn weighted_mean_follows_population() {
        let mut records = vec![
            PairDistanceRecord {
                a: Element::C,
                b: Element::C,
                distance: 1.5,
            };
            9
        ];
        records.push(PairDistanceRecord {
            a: Element::C,
            b: Element::N,
            distance: 0.5,
        });
        let metrics = eval_pair_profile(&pair_profile(&records), &small_reference());
        let cc = metrics["jsd_pair_C-C"].unwrap();
        let cn = metrics["jsd_pair_C-N"].unwrap();
        let mean = metrics["jsd_pair_weighted_mean"].unwrap();
        assert!(approx_eq(mean, (9.0 * cc + cn) / 10.0, 1e-12));
    }

    #[test]
    fn bond_keys_roundtrip() {
        let key = (Element::C, Element::O, BondOrder::Double);
        assert_eq!(format_bond_key(&key), "C-O|2");
        assert_eq!(parse_bond_key("C-O|2"), Some(key));
        assert_eq!(parse_bond_key("C-O"), None);
        assert_eq!(parse_pair_key("C-N"), Some((Element::C, Element::N)));
    }

    #[test]
    fn atom_type_divergence_against_matching_counts() {
        let mut counts = BTreeMap::new();
        counts.insert(Element::C, 8usize);
        counts.insert(Element::N, 2usize);
        let score = atom_type_divergence(&counts, &small_reference()).unwrap();
        assert!(approx_eq(score, 0.0, 1e-12));
    }

    #[test]
    fn atom_type_divergence_handles_novel_elements() {
        let mut counts = BTreeMap::new();
        counts.insert(Element::S, 5usize);
        let score = atom_type_divergence(&counts, &small_reference()).unwrap();
        assert!(approx_eq(score, 1.0, 1e-12));
    }
}
