//! Index alphabet and the pure state-transition rules of the SELFIES grammar.
//!
//! The derivation state is the number of bonds the most recently placed atom
//! can still form. `Remaining(0)` is the start state (no atom yet);
//! [`State::Exhausted`] ends the derivation.

use log::trace;

use crate::selfies::error::IndexError;

/// Base of the positional numerals that size branches and rings.
pub const INDEX_BASE: usize = 16;

/// Ordered index vocabulary. A symbol's position is its digit value.
pub const INDEX_ALPHABET: [&str; INDEX_BASE] = [
    "[C]",
    "[Ring1]",
    "[Ring2]",
    "[Branch1]",
    "[=Branch1]",
    "[#Branch1]",
    "[Branch2]",
    "[=Branch2]",
    "[#Branch2]",
    "[O]",
    "[N]",
    "[=N]",
    "[=C]",
    "[#C]",
    "[S]",
    "[P]",
];

/// Most index symbols a Branch or Ring token may request.
pub const MAX_INDEX_LENGTH: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Remaining(u8),
    Exhausted,
}

impl State {
    pub const START: State = State::Remaining(0);

    fn after(remaining: u8) -> State {
        if remaining == 0 {
            State::Exhausted
        } else {
            State::Remaining(remaining)
        }
    }

    pub fn remaining(self) -> Option<u8> {
        match self {
            State::Remaining(n) => Some(n),
            State::Exhausted => None,
        }
    }

    pub fn is_exhausted(self) -> bool {
        self == State::Exhausted
    }
}

fn bond_prefix_order(prefix: &str) -> Option<u8> {
    match prefix {
        "" => Some(1),
        "=" => Some(2),
        "#" => Some(3),
        _ => None,
    }
}

fn structural_parts<'a>(symbol: &'a str, name: &str) -> Option<(&'a str, u8)> {
    let content = symbol.strip_prefix('[')?.strip_suffix(']')?;
    let digit = content.chars().last()?;
    let length = digit.to_digit(10)? as u8;
    if !(1..=MAX_INDEX_LENGTH).contains(&length) {
        return None;
    }
    let head = &content[..content.len() - 1];
    let prefix = head.strip_suffix(name)?;
    Some((prefix, length))
}

/// Parse a `[Branch*]` symbol into `(bond order, index length)`.
pub fn process_branch_symbol(symbol: &str) -> Option<(u8, u8)> {
    let (prefix, length) = structural_parts(symbol, "Branch")?;
    Some((bond_prefix_order(prefix)?, length))
}

/// Parse a `[Ring*]` symbol into `(bond order, index length, stereo pair)`.
///
/// A two-character prefix drawn from `-`, `/` and `\` is a stereo pair and
/// implies a single bond.
pub fn process_ring_symbol(symbol: &str) -> Option<(u8, u8, Option<String>)> {
    let (prefix, length) = structural_parts(symbol, "Ring")?;
    if let Some(order) = bond_prefix_order(prefix) {
        return Some((order, length, None));
    }
    let is_stereo_pair =
        prefix.chars().count() == 2 && prefix.chars().all(|c| matches!(c, '-' | '/' | '\\'));
    if is_stereo_pair {
        Some((1, length, Some(prefix.to_string())))
    } else {
        None
    }
}

/// Bond order and next state when placing an atom of `capacity`.
pub fn next_atom_state(requested: u8, capacity: u8, state: u8) -> (u8, State) {
    let (order, next) = if state == 0 {
        (0, State::after(capacity))
    } else {
        let order = requested.min(state).min(capacity);
        (order, State::after(capacity - order))
    };
    trace!("atom: requested={requested} capacity={capacity} state={state} -> order={order} next={next:?}");
    (order, next)
}

/// Initial state inside a branch and the state left on the main chain.
///
/// A branch needs one bond for itself and one to continue the chain, so
/// `state` must exceed 1.
pub fn next_branch_state(branch_type: u8, state: u8) -> Option<(u8, u8)> {
    if state <= 1 {
        return None;
    }
    let init = (state - 1).min(branch_type);
    Some((init, state - init))
}

/// Ring bond order and next state.
pub fn next_ring_state(ring_type: u8, state: u8) -> Option<(u8, State)> {
    if state == 0 {
        return None;
    }
    let order = ring_type.min(state);
    Some((order, State::after(state - order)))
}

/// Digit value of one index symbol; symbols outside the alphabet read as 0.
pub fn index_symbol_value(symbol: &str) -> usize {
    INDEX_ALPHABET
        .iter()
        .position(|&s| s == symbol)
        .unwrap_or(0)
}

/// Read `symbols` as a base-16 numeral, most significant first.
pub fn index_from_selfies<S: AsRef<str>>(symbols: &[S]) -> usize {
    symbols.iter().fold(0usize, |acc, s| {
        acc.saturating_mul(INDEX_BASE)
            .saturating_add(index_symbol_value(s.as_ref()))
    })
}

/// Spell `index` with the index alphabet, most significant symbol first.
pub fn selfies_from_index(index: i64) -> Result<Vec<&'static str>, IndexError> {
    if index < 0 {
        return Err(IndexError::Negative(index));
    }
    let mut remaining = index as u64;
    let base = INDEX_BASE as u64;
    let mut symbols = Vec::new();
    loop {
        symbols.push(INDEX_ALPHABET[(remaining % base) as usize]);
        remaining /= base;
        if remaining == 0 {
            break;
        }
    }
    symbols.reverse();
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for n in 0..10_000i64 {
            let symbols = selfies_from_index(n).unwrap();
            assert_eq!(index_from_selfies(&symbols), n as usize, "n = {n}");
        }
    }

    #[test]
    fn index_digit_lengths() {
        assert_eq!(selfies_from_index(0).unwrap(), vec!["[C]"]);
        assert_eq!(selfies_from_index(15).unwrap(), vec!["[P]"]);
        assert_eq!(selfies_from_index(16).unwrap(), vec!["[Ring1]", "[C]"]);
        assert_eq!(selfies_from_index(255).unwrap().len(), 2);
        assert_eq!(selfies_from_index(256).unwrap().len(), 3);
    }

    #[test]
    fn negative_index_fails() {
        assert_eq!(selfies_from_index(-1), Err(IndexError::Negative(-1)));
    }

    #[test]
    fn unknown_index_symbols_read_as_zero() {
        assert_eq!(index_from_selfies(&["[Xe]"]), 0);
        assert_eq!(index_from_selfies(&["[Ring1]", "[nop]"]), 16);
        assert_eq!(index_from_selfies::<&str>(&[]), 0);
    }

    #[test]
    fn branch_symbols() {
        assert_eq!(process_branch_symbol("[Branch1]"), Some((1, 1)));
        assert_eq!(process_branch_symbol("[=Branch2]"), Some((2, 2)));
        assert_eq!(process_branch_symbol("[#Branch3]"), Some((3, 3)));
        assert_eq!(process_branch_symbol("[Branch4]"), None);
        assert_eq!(process_branch_symbol("[/Branch1]"), None);
        assert_eq!(process_branch_symbol("[Ring1]"), None);
        assert_eq!(process_branch_symbol("Branch1"), None);
    }

    #[test]
    fn ring_symbols() {
        assert_eq!(process_ring_symbol("[Ring1]"), Some((1, 1, None)));
        assert_eq!(process_ring_symbol("[=Ring2]"), Some((2, 2, None)));
        assert_eq!(process_ring_symbol("[#Ring3]"), Some((3, 3, None)));
        assert_eq!(
            process_ring_symbol("[-/Ring1]"),
            Some((1, 1, Some("-/".to_string())))
        );
        assert_eq!(
            process_ring_symbol("[\\/Ring2]"),
            Some((1, 2, Some("\\/".to_string())))
        );
        assert_eq!(process_ring_symbol("[/Ring1]"), None);
        assert_eq!(process_ring_symbol("[Ring0]"), None);
        assert_eq!(process_ring_symbol("[Branch1]"), None);
    }

    #[test]
    fn atom_state_from_start() {
        assert_eq!(next_atom_state(2, 4, 0), (0, State::Remaining(4)));
        assert_eq!(next_atom_state(1, 0, 0), (0, State::Exhausted));
    }

    #[test]
    fn atom_state_limits_order() {
        assert_eq!(next_atom_state(3, 2, 4), (2, State::Exhausted));
        assert_eq!(next_atom_state(2, 4, 1), (1, State::Remaining(3)));
        assert_eq!(next_atom_state(1, 1, 3), (1, State::Exhausted));
    }

    #[test]
    fn atom_order_never_exceeds_bounds() {
        for req in 1..=3u8 {
            for cap in 0..=8u8 {
                for state in 1..=8u8 {
                    let (order, _) = next_atom_state(req, cap, state);
                    assert!(order <= req.min(state).min(cap));
                }
            }
        }
    }

    #[test]
    fn branch_state() {
        assert_eq!(next_branch_state(1, 0), None);
        assert_eq!(next_branch_state(1, 1), None);
        assert_eq!(next_branch_state(1, 4), Some((1, 3)));
        assert_eq!(next_branch_state(3, 3), Some((2, 1)));
        assert_eq!(next_branch_state(2, 2), Some((1, 1)));
    }

    #[test]
    fn ring_state() {
        assert_eq!(next_ring_state(1, 0), None);
        assert_eq!(next_ring_state(2, 3), Some((2, State::Remaining(1))));
        assert_eq!(next_ring_state(3, 2), Some((2, State::Exhausted)));
    }

    #[test]
    fn state_helpers() {
        assert_eq!(State::START.remaining(), Some(0));
        assert!(State::Exhausted.is_exhausted());
        assert_eq!(State::Exhausted.remaining(), None);
    }
}
