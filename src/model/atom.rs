use super::types::Element;

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub position: [f64; 3],
    pub is_aromatic: bool,
}

impl Atom {
    pub fn new(element: Element, position: [f64; 3]) -> Self {
        Self {
            element,
            position,
            is_aromatic: false,
        }
    }

    pub fn aromatic(element: Element, position: [f64; 3]) -> Self {
        Self {
            element,
            position,
            is_aromatic: true,
        }
    }
}
