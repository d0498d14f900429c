//! Generated sample-set input.
//!
//! A sample set is the persisted output of a generation run: one entry per
//! generated structure, plus the reference ligand id used to address the
//! docking receptor.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Error;

/// One generated structure: positions and atom-type indices, row-aligned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSample {
    pub pred_pos: Vec<[f64; 3]>,
    pub pred_v: Vec<usize>,
}

/// A persisted batch of generation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSet {
    pub samples: Vec<GeneratedSample>,
    /// Reference ligand filename of the generation target, when known.
    #[serde(default)]
    pub ligand_filename: Option<String>,
}

/// Reads a sample set from JSON.
pub fn read_samples(path: &Path) -> Result<SampleSet, Error> {
    let file = File::open(path)?;
    let set: SampleSet = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::parse("sample set", path, e))?;

    for (idx, sample) in set.samples.iter().enumerate() {
        if sample.pred_pos.len() != sample.pred_v.len() {
            return Err(Error::invalid_sample_set(
                path,
                format!(
                    "sample {} has {} positions but {} type indices",
                    idx,
                    sample.pred_pos.len(),
                    sample.pred_v.len()
                ),
            ));
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_minimal_sample_set() {
        let file = write_temp(
            r#"{"samples": [{"pred_pos": [[0.0, 0.0, 0.0], [1.5, 0.0, 0.0]], "pred_v": [1, 1]}]}"#,
        );
        let set = read_samples(file.path()).unwrap();
        assert_eq!(set.samples.len(), 1);
        assert_eq!(set.samples[0].pred_pos.len(), 2);
        assert_eq!(set.ligand_filename, None);
    }

    #[test]
    fn reads_ligand_filename() {
        let file = write_temp(
            r#"{"samples": [], "ligand_filename": "BRD4/ligand_ref.sdf"}"#,
        );
        let set = read_samples(file.path()).unwrap();
        assert_eq!(set.ligand_filename.as_deref(), Some("BRD4/ligand_ref.sdf"));
    }

    #[test]
    fn rejects_misaligned_sample() {
        let file = write_temp(
            r#"{"samples": [{"pred_pos": [[0.0, 0.0, 0.0]], "pred_v": [1, 1]}]}"#,
        );
        assert!(matches!(
            read_samples(file.path()),
            Err(Error::InvalidSampleSet { .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let file = write_temp("not json at all");
        assert!(matches!(
            read_samples(file.path()),
            Err(Error::Parse { .. })
        ));
    }
}
