//! Result artifacts: the consolidated report and per-key histogram data.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use super::error::Error;
use crate::eval::{
    bond_profile, format_bond_key, format_pair_key, pair_profile, BinSpec, EvalReport,
    ReferenceProfile, RunAccumulator,
};

/// Writes the consolidated report as JSON.
pub fn write_report(path: &Path, report: &EvalReport) -> Result<(), Error> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .map_err(|e| Error::parse("report", path, e))?;
    Ok(())
}

#[derive(Serialize)]
struct Histogram<'a> {
    key: &'a str,
    bins: BinSpec,
    counts: Vec<f64>,
    n_observations: usize,
}

/// Writes one histogram JSON per observed profile key into `dir`.
///
/// Bond histograms come from the complete-molecule bond records, pair
/// histograms from the success pair records, both discretized over the
/// reference bin domains. The `|` in bond keys is replaced with `_` in
/// file names.
pub fn write_histograms(
    dir: &Path,
    acc: &RunAccumulator,
    reference: &ReferenceProfile,
) -> Result<usize, Error> {
    fs::create_dir_all(dir)?;
    let mut written = 0;

    for (key, lengths) in bond_profile(&acc.bond_records) {
        let key_str = format_bond_key(&key);
        let histogram = Histogram {
            key: &key_str,
            bins: reference.bond_bins,
            counts: reference.bond_bins.histogram(&lengths),
            n_observations: lengths.len(),
        };
        write_histogram_file(dir, "bond", &key_str, &histogram)?;
        written += 1;
    }

    for (key, lengths) in pair_profile(&acc.success_pair_records) {
        let key_str = format_pair_key(&key);
        let histogram = Histogram {
            key: &key_str,
            bins: reference.pair_bins,
            counts: reference.pair_bins.histogram(&lengths),
            n_observations: lengths.len(),
        };
        write_histogram_file(dir, "pair", &key_str, &histogram)?;
        written += 1;
    }

    Ok(written)
}

fn write_histogram_file(
    dir: &Path,
    kind: &str,
    key: &str,
    histogram: &Histogram<'_>,
) -> Result<(), Error> {
    let path = dir.join(format!("{}_hist_{}.json", kind, key.replace('|', "_")));
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), histogram)
        .map_err(|e| Error::parse("histogram", path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{BondDistanceRecord, PairDistanceRecord};
    use crate::io::reference::default_reference;
    use crate::model::types::{BondOrder, Element};

    fn accumulator_with_records() -> RunAccumulator {
        let mut acc = RunAccumulator::new(1);
        acc.bond_records.push(BondDistanceRecord {
            a: Element::C,
            b: Element::C,
            order: BondOrder::Single,
            distance: 1.52,
        });
        acc.success_pair_records.push(PairDistanceRecord {
            a: Element::C,
            b: Element::C,
            distance: 1.52,
        });
        acc
    }

    #[test]
    fn writes_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let n = write_histograms(dir.path(), &accumulator_with_records(), default_reference())
            .unwrap();
        assert_eq!(n, 2);
        assert!(dir.path().join("bond_hist_C-C_1.json").exists());
        assert!(dir.path().join("pair_hist_C-C.json").exists());
    }

    #[test]
    fn histogram_counts_match_observations() {
        let dir = tempfile::tempdir().unwrap();
        write_histograms(dir.path(), &accumulator_with_records(), default_reference()).unwrap();
        let text = fs::read_to_string(dir.path().join("bond_hist_C-C_1.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["n_observations"], 1);
        let total: f64 = value["counts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}
