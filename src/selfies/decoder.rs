//! SELFIES derivation: token sequence to [`Ast`].
//!
//! Every token sequence derives to some graph. Irregular input (truncated
//! branches or rings, rings onto the current atom, structural tokens with no
//! capacity left) are defined no-ops or stop the derivation; unsupported
//! atom tokens are dropped.

use log::{debug, trace};

use crate::ast::Ast;
use crate::constraints::Constraints;
use crate::selfies::grammar::{
    index_from_selfies, next_atom_state, next_branch_state, next_ring_state, State,
};
use crate::selfies::tokenizer::{AtomToken, Token, TokenKind};

pub(crate) fn derive(tokens: &[Token<'_>], constraints: &Constraints) -> Ast {
    let mut deriver = Deriver {
        tokens,
        constraints,
        cursor: 0,
        ast: Ast::new(),
    };
    deriver.run();
    deriver.ast
}

struct Deriver<'t, 'a> {
    tokens: &'t [Token<'a>],
    constraints: &'t Constraints,
    cursor: usize,
    ast: Ast,
}

/// Result of reading the index symbols that follow a Branch or Ring token.
enum IndexRead {
    Complete(usize),
    Truncated,
}

impl<'t, 'a> Deriver<'t, 'a> {
    fn run(&mut self) {
        let mut state = State::START;
        let mut prev: Option<usize> = None;

        while let Some(token) = self.next_token() {
            let Some(remaining) = state.remaining() else {
                break;
            };
            match &token.kind {
                TokenKind::Nop => {}
                TokenKind::Unknown => {
                    debug!("dropping unsupported symbol {} at {}", token.symbol, token.pos);
                }
                TokenKind::Atom(atom) => {
                    let (idx, next) = self.place_atom(atom, prev, remaining);
                    prev = Some(idx);
                    state = next;
                }
                TokenKind::Branch { order, length } => {
                    let (Some(root), Some((init, next))) =
                        (prev, next_branch_state(*order, remaining))
                    else {
                        debug!("skipping {} at {}: state {remaining}", token.symbol, token.pos);
                        continue;
                    };
                    let IndexRead::Complete(q) = self.read_index(*length) else {
                        break;
                    };
                    self.derive_branch(root, init, q + 1);
                    state = State::Remaining(next);
                }
                TokenKind::Ring {
                    order,
                    length,
                    stereo,
                } => {
                    let (Some(current), Some((bond_order, next))) =
                        (prev, next_ring_state(*order, remaining))
                    else {
                        debug!("skipping {} at {}: state {remaining}", token.symbol, token.pos);
                        continue;
                    };
                    match self.read_index(*length) {
                        IndexRead::Complete(q) => {
                            let target = current.saturating_sub(q + 1);
                            self.close_ring(target, current, bond_order, stereo.clone());
                            state = next;
                        }
                        IndexRead::Truncated => {
                            self.strengthen_last_bond(bond_order);
                            break;
                        }
                    }
                }
            }
            if state.is_exhausted() {
                trace!("state exhausted after {}", token.symbol);
                break;
            }
        }
    }

    fn next_token(&mut self) -> Option<&'t Token<'a>> {
        let tokens = self.tokens;
        let token = tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    fn read_index(&mut self, length: u8) -> IndexRead {
        let end = self.cursor + length as usize;
        if end > self.tokens.len() {
            self.cursor = self.tokens.len();
            return IndexRead::Truncated;
        }
        let symbols: Vec<&str> = self.tokens[self.cursor..end]
            .iter()
            .map(|t| t.symbol)
            .collect();
        self.cursor = end;
        IndexRead::Complete(index_from_selfies(&symbols))
    }

    /// Append an atom bonded to `prev` under `state`; returns its index and
    /// the state after it.
    fn place_atom(&mut self, atom: &AtomToken, prev: Option<usize>, state: u8) -> (usize, State) {
        let symbol = atom.element.symbol();
        let capacity = self.constraints.bonding_capacity(symbol, 0);
        let (order, next) = next_atom_state(atom.bond_order, capacity, state);
        let idx = self.ast.add_atom(atom.element, capacity, atom.stereo.clone());
        if let (Some(prev), true) = (prev, order > 0) {
            self.ast.add_bond(prev, idx, order);
        }
        (idx, next)
    }

    /// Place up to `max_atoms` atoms hanging off `root`.
    ///
    /// Structural tokens inside the branch body are skipped, not derived.
    fn derive_branch(&mut self, root: usize, init: u8, max_atoms: usize) {
        let mut state = State::Remaining(init);
        let mut prev = root;
        let mut placed = 0;

        while placed < max_atoms {
            let Some(remaining) = state.remaining() else {
                break;
            };
            let Some(token) = self.next_token() else {
                break;
            };
            match &token.kind {
                TokenKind::Atom(atom) => {
                    let (idx, next) = self.place_atom(atom, Some(prev), remaining);
                    prev = idx;
                    state = next;
                    placed += 1;
                }
                TokenKind::Nop => {}
                TokenKind::Unknown | TokenKind::Branch { .. } | TokenKind::Ring { .. } => {
                    debug!("skipping {} inside branch", token.symbol);
                }
            }
        }
        trace!("branch from atom {root} placed {placed} of {max_atoms} atoms");
    }

    fn close_ring(&mut self, target: usize, current: usize, order: u8, stereo: Option<String>) {
        if target == current {
            trace!("ring onto atom {current} itself ignored");
            return;
        }
        let order = order
            .min(self.ast.free_capacity(target))
            .min(self.ast.free_capacity(current));
        if order == 0 {
            debug!("ring {current}->{target} dropped: no free capacity");
            return;
        }
        if let Some(bond) = self.ast.bond_between(target, current) {
            self.ast.raise_bond(bond, order);
        } else if let Some(ring) = self.ast.ring_between(target, current) {
            self.ast.raise_ring(ring, order);
        } else {
            self.ast.add_ring(target, current, order, stereo);
        }
    }

    /// A ring whose index symbols were cut off by the end of input adds its
    /// order to the last bond placed.
    fn strengthen_last_bond(&mut self, order: u8) {
        let Some(last) = self.ast.bonds().len().checked_sub(1) else {
            return;
        };
        let bond = self.ast.bonds()[last];
        let order = order
            .min(self.ast.free_capacity(bond.from))
            .min(self.ast.free_capacity(bond.to));
        self.ast.raise_bond(last, order);
    }
}
