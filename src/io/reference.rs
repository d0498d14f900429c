//! Reference bond-length profile loading.
//!
//! The embedded default profile ships with the crate and is versioned with
//! the reference dataset it was derived from; `--reference` swaps in an
//! alternative profile file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::OnceLock;

use super::error::Error;
use crate::eval::ReferenceProfile;

const DEFAULT_REFERENCE_JSON: &str = include_str!("../../resources/default.reference.json");

static DEFAULT_REFERENCE: OnceLock<ReferenceProfile> = OnceLock::new();

/// The embedded default profile.
pub fn default_reference() -> &'static ReferenceProfile {
    DEFAULT_REFERENCE.get_or_init(|| {
        serde_json::from_str(DEFAULT_REFERENCE_JSON).expect("embedded reference profile is valid")
    })
}

/// Loads the profile at `path`, or the embedded default when `None`.
pub fn load_reference(path: Option<&Path>) -> Result<ReferenceProfile, Error> {
    match path {
        Some(path) => {
            let file = File::open(path)?;
            let profile: ReferenceProfile = serde_json::from_reader(BufReader::new(file))
                .map_err(|e| Error::parse("reference profile", path, e))?;
            Ok(profile)
        }
        None => Ok(default_reference().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_consistent() {
        let profile = default_reference();
        assert!(!profile.version.is_empty());
        for (key, vec) in &profile.bonds {
            assert_eq!(vec.len(), profile.bond_bins.n, "bond key {}", key);
        }
        for (key, vec) in &profile.pairs {
            assert_eq!(vec.len(), profile.pair_bins.n, "pair key {}", key);
        }
        let type_total: f64 = profile.atom_types.values().sum();
        assert!((type_total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn default_profile_keys_parse() {
        use crate::eval::{parse_bond_key, parse_pair_key};
        let profile = default_reference();
        for key in profile.bonds.keys() {
            assert!(parse_bond_key(key).is_some(), "unparseable bond key {}", key);
        }
        for key in profile.pairs.keys() {
            assert!(parse_pair_key(key).is_some(), "unparseable pair key {}", key);
        }
    }

    #[test]
    fn missing_reference_file_errors() {
        let missing = Path::new("/nonexistent/reference.json");
        assert!(load_reference(Some(missing)).is_err());
    }
}
