//! Decoding of generator atom-type indices.

use std::fmt;
use std::str::FromStr;

use super::error::Error;
use crate::model::types::Element;

/// Atom-type encoding scheme used by the generative model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AtomEncoding {
    /// Indices map to elements only.
    Basic,
    /// Indices carry an additional aromaticity bit for C, N, O, P and S.
    #[default]
    AddAromatic,
}

impl AtomEncoding {
    fn name(&self) -> &'static str {
        match self {
            AtomEncoding::Basic => "basic",
            AtomEncoding::AddAromatic => "add-aromatic",
        }
    }

    /// Number of valid type indices in the scheme.
    pub fn domain_size(&self) -> usize {
        match self {
            AtomEncoding::Basic => BASIC_TABLE.len(),
            AtomEncoding::AddAromatic => AROMATIC_TABLE.len(),
        }
    }
}

impl fmt::Display for AtomEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AtomEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(AtomEncoding::Basic),
            "add-aromatic" | "add_aromatic" => Ok(AtomEncoding::AddAromatic),
            _ => Err(format!("unknown atom encoding: '{}'", s)),
        }
    }
}

/// A decoded atom type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAtom {
    pub element: Element,
    pub is_aromatic: bool,
}

const BASIC_TABLE: [Element; 8] = [
    Element::H,
    Element::C,
    Element::N,
    Element::O,
    Element::F,
    Element::P,
    Element::S,
    Element::Cl,
];

const AROMATIC_TABLE: [(Element, bool); 13] = [
    (Element::H, false),
    (Element::C, false),
    (Element::C, true),
    (Element::N, false),
    (Element::N, true),
    (Element::O, false),
    (Element::O, true),
    (Element::F, false),
    (Element::P, false),
    (Element::P, true),
    (Element::S, false),
    (Element::S, true),
    (Element::Cl, false),
];

/// Decodes a single type index. Pure lookup, total over the scheme's
/// domain; out-of-range indices are an input defect and fail loudly.
pub fn decode(index: usize, mode: AtomEncoding) -> Result<DecodedAtom, Error> {
    match mode {
        AtomEncoding::Basic => BASIC_TABLE
            .get(index)
            .map(|&element| DecodedAtom {
                element,
                is_aromatic: false,
            })
            .ok_or(Error::Decode {
                index,
                mode: mode.name(),
            }),
        AtomEncoding::AddAromatic => AROMATIC_TABLE
            .get(index)
            .map(|&(element, is_aromatic)| DecodedAtom {
                element,
                is_aromatic,
            })
            .ok_or(Error::Decode {
                index,
                mode: mode.name(),
            }),
    }
}

/// Decodes a whole sample's type indices.
pub fn decode_all(indices: &[usize], mode: AtomEncoding) -> Result<Vec<DecodedAtom>, Error> {
    indices.iter().map(|&i| decode(i, mode)).collect()
}
