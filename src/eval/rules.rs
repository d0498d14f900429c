//! Injectable bonding rules: covalent distance brackets and allowed
//! valences, loaded from TOML. The embedded default table is the versioned
//! constant the stability and reconstruction heuristics are calibrated
//! against; swapping it swaps the results.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Deserialize;

use super::error::Error;
use crate::model::types::{BondOrder, Element};

const DEFAULT_RULES_TOML: &str = include_str!("../../resources/default.rules.toml");

static DEFAULT_RULES: OnceLock<BondingRules> = OnceLock::new();

/// Tolerance margins (pm) added to each bracket's tabulated length.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Margins {
    pub single: f64,
    pub double: f64,
    pub triple: f64,
}

#[derive(Debug, Deserialize)]
struct RawRules {
    margins: Margins,
    valence: HashMap<String, Vec<u32>>,
    single: HashMap<String, f64>,
    #[serde(default)]
    double: HashMap<String, f64>,
    #[serde(default)]
    triple: HashMap<String, f64>,
}

/// Distance/valence tables driving bond inference.
#[derive(Debug, Clone)]
pub struct BondingRules {
    margins: Margins,
    valence: HashMap<Element, Vec<u32>>,
    single: HashMap<(Element, Element), f64>,
    double: HashMap<(Element, Element), f64>,
    triple: HashMap<(Element, Element), f64>,
}

impl BondingRules {
    /// Parses rules from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let raw: RawRules = toml::from_str(text)?;

        let mut valence = HashMap::new();
        for (symbol, allowed) in raw.valence {
            let element = Element::from_str(&symbol)
                .map_err(|e| Error::rule_entry(&symbol, e.to_string()))?;
            if allowed.is_empty() {
                return Err(Error::rule_entry(&symbol, "empty allowed-valence list"));
            }
            valence.insert(element, allowed);
        }

        Ok(Self {
            margins: raw.margins,
            valence,
            single: parse_pair_table(raw.single)?,
            double: parse_pair_table(raw.double)?,
            triple: parse_pair_table(raw.triple)?,
        })
    }

    /// The embedded default table.
    pub fn default_rules() -> &'static Self {
        DEFAULT_RULES.get_or_init(|| {
            Self::from_toml(DEFAULT_RULES_TOML).expect("embedded default rules are valid")
        })
    }

    /// Classifies an interatomic distance (Å) into a bond order.
    ///
    /// The brackets are nested: for every pair carrying a double (triple)
    /// entry, that length is below the single (double) length, so the rule
    /// "highest order whose bracket contains the distance wins" is
    /// equivalent to testing triple, then double, then single. Distances
    /// beyond the single bracket are not bonds.
    pub fn infer_order(&self, a: Element, b: Element, distance: f64) -> Option<BondOrder> {
        let key = pair_key(a, b);
        let d = distance * 100.0; // Å -> pm, matching the tables
        let single = *self.single.get(&key)?;
        if d >= single + self.margins.single {
            return None;
        }
        if let Some(&double) = self.double.get(&key) {
            if d < double + self.margins.double {
                if let Some(&triple) = self.triple.get(&key) {
                    if d < triple + self.margins.triple {
                        return Some(BondOrder::Triple);
                    }
                }
                return Some(BondOrder::Double);
            }
        }
        Some(BondOrder::Single)
    }

    /// Allowed valences for an element; empty when the element is not
    /// covered by the table (such atoms are never stable).
    pub fn allowed_valences(&self, element: Element) -> &[u32] {
        self.valence.get(&element).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Largest allowed valence, used as bonding capacity during
    /// reconstruction.
    pub fn max_valence(&self, element: Element) -> u32 {
        self.allowed_valences(element).iter().copied().max().unwrap_or(0)
    }
}

fn parse_pair_table(
    raw: HashMap<String, f64>,
) -> Result<HashMap<(Element, Element), f64>, Error> {
    let mut table = HashMap::with_capacity(raw.len());
    for (entry, length) in raw {
        let (a, b) = entry
            .split_once('-')
            .ok_or_else(|| Error::rule_entry(&entry, "expected '<El>-<El>'"))?;
        let a = Element::from_str(a).map_err(|e| Error::rule_entry(&entry, e.to_string()))?;
        let b = Element::from_str(b).map_err(|e| Error::rule_entry(&entry, e.to_string()))?;
        if length <= 0.0 {
            return Err(Error::rule_entry(&entry, "length must be positive"));
        }
        table.insert(pair_key(a, b), length);
    }
    Ok(table)
}

/// Canonical unordered pair key, ascending atomic number.
#[inline]
pub fn pair_key(a: Element, b: Element) -> (Element, Element) {
    if a <= b { (a, b) } else { (b, a) }
}
