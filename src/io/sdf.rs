//! Minimal SDF (V2000) writer for the docking handoff.

use std::io::Write;

use super::error::Error;
use crate::chem::Molecule;
use crate::model::types::BondOrder;

pub fn write<W: Write>(mut writer: W, mol: &Molecule) -> Result<(), Error> {
    writeln!(writer, "Generated ligand")?;
    writeln!(writer, "molscreen")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0  0999 V2000",
        mol.atoms().len(),
        mol.bonds().len()
    )?;

    for atom in mol.atoms() {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            atom.position[0],
            atom.position[1],
            atom.position[2],
            atom.element.symbol()
        )?;
    }

    for bond in mol.bonds() {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0  0  0  0",
            bond.i + 1,
            bond.j + 1,
            ctfile_order(bond.order)
        )?;
    }

    writeln!(writer, "M  END")?;
    writeln!(writer, "$$$$")?;
    Ok(())
}

fn ctfile_order(order: BondOrder) -> u8 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{fixtures, sanitize};

    #[test]
    fn writes_counts_line_and_terminator() {
        let mol = sanitize(fixtures::ethanol()).unwrap();
        let mut buf = Vec::new();
        write(&mut buf, &mol).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let counts = text.lines().nth(3).unwrap();
        assert!(counts.starts_with("  9  8"));
        assert!(text.ends_with("$$$$\n"));
        assert!(text.contains("M  END"));
    }

    #[test]
    fn aromatic_bonds_use_code_four() {
        let mol = sanitize(fixtures::benzene()).unwrap();
        let mut buf = Vec::new();
        write(&mut buf, &mol).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let bond_lines: Vec<&str> = text
            .lines()
            .skip(4 + mol.atoms().len())
            .take(mol.bonds().len())
            .collect();
        assert_eq!(bond_lines.len(), 6);
        assert!(bond_lines.iter().all(|l| l.contains("  4  0")));
    }
}
