//! SMILES generation with a two-pass traversal: one depth-first pass to
//! locate ring-closure bonds, a second to emit the string with closure
//! digits. Disconnected fragments are written independently and joined
//! with the `.` separator.

use std::collections::HashMap;

use crate::model::atom::Atom;
use crate::model::types::{BondOrder, Element};

pub fn write_smiles(
    atoms: &[Atom],
    adjacency: &[Vec<(usize, BondOrder)>],
    ranks: &[usize],
) -> String {
    let components = connected_components(atoms.len(), adjacency);
    let fragments: Vec<String> = components
        .iter()
        .map(|component| {
            let start = component
                .iter()
                .copied()
                .min_by_key(|&i| (ranks[i], i))
                .expect("non-empty component");
            Writer::new(atoms, adjacency, ranks).component(start)
        })
        .collect();
    fragments.join(".")
}

fn connected_components(n: usize, adjacency: &[Vec<(usize, BondOrder)>]) -> Vec<Vec<usize>> {
    let mut component_of = vec![usize::MAX; n];
    let mut components: Vec<Vec<usize>> = Vec::new();
    for root in 0..n {
        if component_of[root] != usize::MAX {
            continue;
        }
        let id = components.len();
        let mut members = vec![root];
        component_of[root] = id;
        let mut stack = vec![root];
        while let Some(u) = stack.pop() {
            for &(v, _) in &adjacency[u] {
                if component_of[v] == usize::MAX {
                    component_of[v] = id;
                    members.push(v);
                    stack.push(v);
                }
            }
        }
        members.sort_unstable();
        components.push(members);
    }
    components
}

struct Writer<'a> {
    atoms: &'a [Atom],
    adjacency: &'a [Vec<(usize, BondOrder)>],
    ranks: &'a [usize],
    visited: Vec<bool>,
    on_path: Vec<bool>,
    // ring-opening atom -> descendants that close back to it
    openings: HashMap<usize, Vec<usize>>,
    // ring-closing atom -> (partner, digit)
    closings: HashMap<usize, Vec<(usize, usize)>>,
    digits_in_use: Vec<usize>,
}

impl<'a> Writer<'a> {
    fn new(atoms: &'a [Atom], adjacency: &'a [Vec<(usize, BondOrder)>], ranks: &'a [usize]) -> Self {
        Self {
            atoms,
            adjacency,
            ranks,
            visited: vec![false; atoms.len()],
            on_path: vec![false; atoms.len()],
            openings: HashMap::new(),
            closings: HashMap::new(),
            digits_in_use: Vec::new(),
        }
    }

    fn component(mut self, start: usize) -> String {
        self.find_closures(start, None);
        self.visited.iter_mut().for_each(|v| *v = false);
        self.emit(start, None)
    }

    fn ordered_neighbors(&self, current: usize, parent: Option<usize>) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self.adjacency[current]
            .iter()
            .map(|&(j, _)| j)
            .filter(|&j| Some(j) != parent)
            .collect();
        neighbors.sort_by_key(|&j| (self.ranks[j], j));
        neighbors
    }

    fn find_closures(&mut self, current: usize, parent: Option<usize>) {
        self.visited[current] = true;
        self.on_path[current] = true;

        for neighbor in self.ordered_neighbors(current, parent) {
            if self.on_path[neighbor] {
                self.openings.entry(neighbor).or_default().push(current);
            } else if !self.visited[neighbor] {
                self.find_closures(neighbor, Some(current));
            }
        }

        self.on_path[current] = false;
    }

    fn emit(&mut self, current: usize, parent: Option<usize>) -> String {
        self.visited[current] = true;
        let mut out = String::new();

        if let Some(p) = parent {
            out.push_str(self.bond_symbol(p, current));
        }
        out.push_str(&atom_token(&self.atoms[current]));

        if let Some(mut pending) = self.closings.remove(&current) {
            pending.sort_by_key(|&(_, digit)| digit);
            for (partner, digit) in pending {
                out.push_str(self.bond_symbol(current, partner));
                out.push_str(&digit_token(digit));
                self.digits_in_use.retain(|&d| d != digit);
            }
        }

        if let Some(closers) = self.openings.remove(&current) {
            for closer in closers {
                let digit = self.claim_digit();
                out.push_str(&digit_token(digit));
                self.closings.entry(closer).or_default().push((current, digit));
            }
        }

        let mut branches: Vec<String> = Vec::new();
        for neighbor in self.ordered_neighbors(current, parent) {
            if !self.visited[neighbor] {
                branches.push(self.emit(neighbor, Some(current)));
            }
        }

        if let Some((last, init)) = branches.split_last() {
            for branch in init {
                out.push('(');
                out.push_str(branch);
                out.push(')');
            }
            out.push_str(last);
        }

        out
    }

    fn bond_symbol(&self, i: usize, j: usize) -> &'static str {
        let order = self.adjacency[i]
            .iter()
            .find(|&&(n, _)| n == j)
            .map(|&(_, o)| o)
            .expect("bond exists");
        match order {
            BondOrder::Single | BondOrder::Aromatic => "",
            BondOrder::Double => "=",
            BondOrder::Triple => "#",
        }
    }

    fn claim_digit(&mut self) -> usize {
        let mut digit = 1;
        while self.digits_in_use.contains(&digit) {
            digit += 1;
        }
        self.digits_in_use.push(digit);
        digit
    }
}

fn digit_token(digit: usize) -> String {
    if digit > 9 {
        format!("%{}", digit)
    } else {
        digit.to_string()
    }
}

/// Organic-subset elements are written bare, aromatic ones lowercased;
/// everything else is bracketed.
fn atom_token(atom: &Atom) -> String {
    let organic = matches!(
        atom.element,
        Element::B
            | Element::C
            | Element::N
            | Element::O
            | Element::P
            | Element::S
            | Element::F
            | Element::Cl
            | Element::Br
            | Element::I
    );
    let symbol = atom.element.symbol();
    if atom.is_aromatic {
        let lower = symbol.to_lowercase();
        if organic { lower } else { format!("[{}]", lower) }
    } else if organic {
        symbol.to_string()
    } else {
        format!("[{}]", symbol)
    }
}
