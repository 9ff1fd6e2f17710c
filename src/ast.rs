//! The derivation tree produced by the SELFIES decoder.
//!
//! [`Ast`] is an append-only arena: atoms are addressed by their emission
//! index, which never changes once assigned. Only edge orders are mutable
//! after creation, and only upwards.

use serde::Serialize;

use crate::element::Element;

/// Highest bond order an edge may carry.
pub const MAX_BOND_ORDER: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Atom {
    /// Position in emission order.
    pub index: usize,
    pub element: Element,
    /// Bonding capacity looked up when the atom was placed.
    pub capacity: u8,
    /// Full bracket content (e.g. `C@@H`) when the token carried chirality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stereo: Option<String>,
}

/// Edge between atoms placed one after the other (chain or branch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bond {
    pub from: usize,
    pub to: usize,
    pub order: u8,
}

/// Ring-closure edge between non-adjacent atoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ring {
    pub from: usize,
    pub to: usize,
    pub order: u8,
    /// Stereo pair from the ring token, e.g. `-/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stereo: Option<String>,
}

impl Bond {
    pub fn joins(&self, a: usize, b: usize) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    pub fn other(&self, atom: usize) -> Option<usize> {
        if self.from == atom {
            Some(self.to)
        } else if self.to == atom {
            Some(self.from)
        } else {
            None
        }
    }
}

impl Ring {
    pub fn joins(&self, a: usize, b: usize) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    pub fn other(&self, atom: usize) -> Option<usize> {
        if self.from == atom {
            Some(self.to)
        } else if self.to == atom {
            Some(self.from)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ast {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    rings: Vec<Ring>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn atom(&self, idx: usize) -> &Atom {
        &self.atoms[idx]
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn add_atom(&mut self, element: Element, capacity: u8, stereo: Option<String>) -> usize {
        let index = self.atoms.len();
        self.atoms.push(Atom {
            index,
            element,
            capacity,
            stereo,
        });
        index
    }

    pub fn add_bond(&mut self, from: usize, to: usize, order: u8) -> usize {
        debug_assert!((1..=MAX_BOND_ORDER).contains(&order));
        self.bonds.push(Bond { from, to, order });
        self.bonds.len() - 1
    }

    pub fn add_ring(
        &mut self,
        from: usize,
        to: usize,
        order: u8,
        stereo: Option<String>,
    ) -> usize {
        debug_assert!((1..=MAX_BOND_ORDER).contains(&order));
        self.rings.push(Ring {
            from,
            to,
            order,
            stereo,
        });
        self.rings.len() - 1
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.bonds.iter().position(|bond| bond.joins(a, b))
    }

    pub fn ring_between(&self, a: usize, b: usize) -> Option<usize> {
        self.rings.iter().position(|ring| ring.joins(a, b))
    }

    /// Raise a bond's order by up to `by`, never past [`MAX_BOND_ORDER`].
    /// Returns the amount actually added.
    pub(crate) fn raise_bond(&mut self, idx: usize, by: u8) -> u8 {
        let bond = &mut self.bonds[idx];
        let added = by.min(MAX_BOND_ORDER.saturating_sub(bond.order));
        bond.order += added;
        added
    }

    pub(crate) fn raise_ring(&mut self, idx: usize, by: u8) -> u8 {
        let ring = &mut self.rings[idx];
        let added = by.min(MAX_BOND_ORDER.saturating_sub(ring.order));
        ring.order += added;
        added
    }

    /// Sum of bond and ring orders incident to `atom`.
    pub fn used_capacity(&self, atom: usize) -> u8 {
        let bonds = self
            .bonds
            .iter()
            .filter(|b| b.other(atom).is_some())
            .map(|b| b.order);
        let rings = self
            .rings
            .iter()
            .filter(|r| r.other(atom).is_some())
            .map(|r| r.order);
        bonds.chain(rings).fold(0u8, |acc, o| acc.saturating_add(o))
    }

    pub fn free_capacity(&self, atom: usize) -> u8 {
        self.atoms[atom]
            .capacity
            .saturating_sub(self.used_capacity(atom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Ast {
        let mut ast = Ast::new();
        for i in 0..n {
            let idx = ast.add_atom(Element::C, 4, None);
            if i > 0 {
                ast.add_bond(idx - 1, idx, 1);
            }
        }
        ast
    }

    #[test]
    fn indices_are_emission_order() {
        let ast = chain(3);
        for (i, atom) in ast.atoms().iter().enumerate() {
            assert_eq!(atom.index, i);
        }
    }

    #[test]
    fn bond_lookup_is_unordered() {
        let ast = chain(3);
        assert_eq!(ast.bond_between(0, 1), Some(0));
        assert_eq!(ast.bond_between(1, 0), Some(0));
        assert_eq!(ast.bond_between(0, 2), None);
    }

    #[test]
    fn raise_caps_at_triple() {
        let mut ast = chain(2);
        assert_eq!(ast.raise_bond(0, 1), 1);
        assert_eq!(ast.raise_bond(0, 3), 1);
        assert_eq!(ast.bonds()[0].order, 3);
        assert_eq!(ast.raise_bond(0, 1), 0);
    }

    #[test]
    fn capacity_accounting_counts_rings() {
        let mut ast = chain(3);
        ast.add_ring(2, 0, 2, None);
        assert_eq!(ast.used_capacity(0), 3);
        assert_eq!(ast.used_capacity(1), 2);
        assert_eq!(ast.free_capacity(0), 1);
        assert_eq!(ast.ring_between(0, 2), Some(0));
        ast.raise_ring(0, 2);
        assert_eq!(ast.rings()[0].order, 3);
    }

    #[test]
    fn serializes_without_empty_stereo() {
        let mut ast = Ast::new();
        ast.add_atom(Element::O, 2, None);
        let json = serde_json::to_string(&ast).unwrap();
        assert_eq!(
            json,
            r#"{"atoms":[{"index":0,"element":"O","capacity":2}],"bonds":[],"rings":[]}"#
        );
    }
}
