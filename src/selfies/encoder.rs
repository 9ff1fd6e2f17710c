//! SMILES to SELFIES translation.
//!
//! A single left-to-right scan over the SMILES text. Parenthesised branches
//! are encoded recursively and prefixed with a Branch token sized by their
//! symbol count; ring labels are turned into Ring tokens that point back at
//! the opening atom. Aromatic atoms are kekulized by alternating single and
//! double bonds along each aromatic path, which is only correct for simple
//! carbocycles.

use std::collections::BTreeMap;

use log::trace;

use crate::element::{is_element_symbol, TWO_LETTER_ALIPHATIC};
use crate::selfies::error::EncodeError;
use crate::selfies::grammar::{selfies_from_index, MAX_INDEX_LENGTH};
use crate::selfies::tokenizer::{classify, TokenKind};

pub(crate) fn encode_smiles(smiles: &str) -> Result<String, EncodeError> {
    let trimmed = smiles.trim();
    if trimmed.is_empty() {
        return Err(EncodeError::EmptyInput);
    }
    let chars: Vec<char> = trimmed.chars().collect();
    let mut encoder = Encoder {
        chars: &chars,
        atom_count: 0,
        kekule: Vec::new(),
        open_rings: BTreeMap::new(),
    };
    let symbols = encoder.encode_chain(0, chars.len(), None)?;
    if let Some((&label, _)) = encoder.open_rings.iter().next() {
        return Err(EncodeError::UnclosedRing { label });
    }
    Ok(symbols.concat())
}

struct RingOpen {
    atom: usize,
    order: u8,
    marker: Option<char>,
}

struct Encoder<'a> {
    chars: &'a [char],
    atom_count: usize,
    /// Per atom: `None` if aliphatic, otherwise whether it was emitted with
    /// a double bond to its predecessor.
    kekule: Vec<Option<bool>>,
    open_rings: BTreeMap<u16, RingOpen>,
}

/// State local to one chain (the top level or one branch body).
struct Chain {
    prev: Option<usize>,
    bond: Option<(char, usize)>,
    stereo: Option<(char, usize)>,
    symbols: Vec<String>,
}

impl Chain {
    fn ensure_no_pending_bond(&self) -> Result<(), EncodeError> {
        match self.bond {
            Some((ch, pos)) => Err(EncodeError::DanglingBond { pos, ch }),
            None => Ok(()),
        }
    }
}

impl Encoder<'_> {
    fn encode_chain(
        &mut self,
        start: usize,
        end: usize,
        root: Option<usize>,
    ) -> Result<Vec<String>, EncodeError> {
        let mut chain = Chain {
            prev: root,
            bond: None,
            stereo: None,
            symbols: Vec::new(),
        };
        let mut i = start;

        while i < end {
            match self.chars[i] {
                '(' => {
                    chain.ensure_no_pending_bond()?;
                    let close = self.matching_paren(i, end)?;
                    if close == i + 1 {
                        return Err(EncodeError::EmptyBranch { pos: i });
                    }
                    let inner = self.encode_chain(i + 1, close, chain.prev)?;
                    if inner.is_empty() {
                        return Err(EncodeError::EmptyBranch { pos: i });
                    }
                    self.push_branch(&mut chain, inner)?;
                    i = close + 1;
                }
                ')' => return Err(EncodeError::UnmatchedParen { pos: i }),
                ch @ ('=' | '#' | '-') => {
                    chain.ensure_no_pending_bond()?;
                    chain.bond = Some((ch, i));
                    i += 1;
                }
                ch @ ('/' | '\\') => {
                    chain.stereo = Some((ch, i));
                    i += 1;
                }
                '0'..='9' => {
                    let label = self.chars[i] as u16 - '0' as u16;
                    self.ring_label(&mut chain, label, i)?;
                    i += 1;
                }
                '%' => {
                    let (label, next) = self.percent_label(i, end)?;
                    self.ring_label(&mut chain, label, i)?;
                    i = next;
                }
                '[' => {
                    let (body, aromatic, next) = self.bracket_atom(i, end)?;
                    self.push_atom(&mut chain, &body, aromatic);
                    i = next;
                }
                c if c.is_ascii_uppercase() => {
                    let (symbol, next) = self.aliphatic_symbol(i, end)?;
                    self.push_atom(&mut chain, &symbol, false);
                    i = next;
                }
                c @ ('b' | 'c' | 'n' | 'o' | 'p' | 's') => {
                    let symbol = c.to_ascii_uppercase().to_string();
                    self.push_atom(&mut chain, &symbol, true);
                    i += 1;
                }
                ch => return Err(EncodeError::UnexpectedChar { pos: i, ch }),
            }
        }

        chain.ensure_no_pending_bond()?;
        Ok(chain.symbols)
    }

    fn matching_paren(&self, open: usize, end: usize) -> Result<usize, EncodeError> {
        let mut depth = 0usize;
        for j in open..end {
            match self.chars[j] {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(j);
                    }
                }
                _ => {}
            }
        }
        Err(EncodeError::UnmatchedParen { pos: open })
    }

    fn push_branch(&self, chain: &mut Chain, inner: Vec<String>) -> Result<(), EncodeError> {
        // The branch token carries the bond into the branch.
        let prefix = match inner.first().map(|s| classify(s)) {
            Some(TokenKind::Atom(atom)) => bond_prefix(atom.bond_order),
            _ => "",
        };
        let index = length_symbols(inner.len() - 1)?;
        chain
            .symbols
            .push(format!("[{prefix}Branch{}]", index.len()));
        chain.symbols.extend(index.into_iter().map(String::from));
        chain.symbols.extend(inner);
        Ok(())
    }

    fn ring_label(&mut self, chain: &mut Chain, label: u16, pos: usize) -> Result<(), EncodeError> {
        let Some(current) = chain.prev else {
            return Err(EncodeError::RingWithoutAtom { label, pos });
        };
        let order = chain.bond.take().map_or(1, |(ch, _)| bond_order(ch));
        let marker = chain.stereo.take().map(|(ch, _)| ch);

        let Some(open) = self.open_rings.remove(&label) else {
            self.open_rings.insert(
                label,
                RingOpen {
                    atom: current,
                    order,
                    marker,
                },
            );
            return Ok(());
        };

        if open.atom == current {
            return Err(EncodeError::SelfRing { label, pos });
        }
        let distance = current.abs_diff(open.atom);
        let index = length_symbols(distance - 1)?;
        let prefix = if open.marker.is_some() || marker.is_some() {
            format!("{}{}", open.marker.unwrap_or('-'), marker.unwrap_or('-'))
        } else {
            bond_prefix(open.order.max(order)).to_string()
        };
        trace!("ring {label}: atom {current} -> atom {}", open.atom);
        chain
            .symbols
            .push(format!("[{prefix}Ring{}]", index.len()));
        chain.symbols.extend(index.into_iter().map(String::from));
        Ok(())
    }

    /// Ring label after `%`: two digits, or any number in `%(n)` form.
    fn percent_label(&self, start: usize, end: usize) -> Result<(u16, usize), EncodeError> {
        let bad_label = EncodeError::UnexpectedChar {
            pos: start,
            ch: '%',
        };
        if self.chars.get(start + 1) == Some(&'(') && start + 1 < end {
            let close = (start + 2..end)
                .find(|&j| self.chars[j] == ')')
                .ok_or(bad_label.clone())?;
            let text: String = self.chars[start + 2..close].iter().collect();
            if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
                return Err(bad_label);
            }
            let label = text.parse::<u16>().map_err(|_| bad_label)?;
            return Ok((label, close + 1));
        }
        let digits: Option<Vec<u32>> = (start + 1..start + 3)
            .map(|j| {
                if j < end {
                    self.chars[j].to_digit(10)
                } else {
                    None
                }
            })
            .collect();
        match digits.as_deref() {
            Some(&[d1, d2]) => Ok(((d1 * 10 + d2) as u16, start + 3)),
            _ => Err(bad_label),
        }
    }

    /// Parse `[...]`, keeping only the element and any chirality.
    fn bracket_atom(&self, start: usize, end: usize) -> Result<(String, bool, usize), EncodeError> {
        let close = (start + 1..end)
            .find(|&j| self.chars[j] == ']')
            .ok_or(EncodeError::UnclosedBracket { pos: start })?;
        let content: String = self.chars[start + 1..close].iter().collect();
        let body = content.trim_start_matches(|c: char| c.is_ascii_digit());

        let invalid = || EncodeError::InvalidElement {
            pos: start,
            text: content.clone(),
        };
        let first = body.chars().next().ok_or_else(invalid)?;
        let aromatic = first.is_ascii_lowercase();
        let two: String = body.chars().take(2).collect();
        let (element, rest) = if two.len() == 2
            && two.chars().nth(1).is_some_and(|c| c.is_ascii_lowercase())
            && is_element_symbol(&capitalize(&two))
        {
            (capitalize(&two), &body[2..])
        } else if first.is_ascii_alphabetic() && is_element_symbol(&capitalize(&body[..1])) {
            (capitalize(&body[..1]), &body[1..])
        } else {
            return Err(invalid());
        };

        let symbol = match rest.find('@') {
            Some(at) => {
                let chirality: String = rest[at..].chars().take_while(|&c| c == '@').collect();
                let after = &rest[at + chirality.len()..];
                let hydrogens: String = match after.strip_prefix('H') {
                    Some(h) => std::iter::once('H')
                        .chain(h.chars().take_while(|c| c.is_ascii_digit()))
                        .collect(),
                    None => String::new(),
                };
                format!("{element}{chirality}{hydrogens}")
            }
            None => element,
        };
        Ok((symbol, aromatic, close + 1))
    }

    fn aliphatic_symbol(&self, start: usize, end: usize) -> Result<(String, usize), EncodeError> {
        if start + 1 < end {
            let pair: String = self.chars[start..start + 2].iter().collect();
            if TWO_LETTER_ALIPHATIC.contains(&pair.as_str()) {
                return Ok((pair, start + 2));
            }
        }
        let single = self.chars[start].to_string();
        if is_element_symbol(&single) {
            Ok((single, start + 1))
        } else {
            Err(EncodeError::UnexpectedChar {
                pos: start,
                ch: self.chars[start],
            })
        }
    }

    fn push_atom(&mut self, chain: &mut Chain, body: &str, aromatic: bool) {
        let explicit = chain.bond.take().map(|(ch, _)| ch);
        let stereo = chain.stereo.take().map(|(ch, _)| ch);
        let follows_plain_aromatic = chain
            .prev
            .and_then(|p| self.kekule.get(p).copied().flatten())
            == Some(false);

        let prefix = match (explicit, stereo) {
            (Some(ch), _) => bond_prefix(bond_order(ch)).to_string(),
            (None, Some(marker)) => marker.to_string(),
            (None, None) if aromatic && follows_plain_aromatic => "=".to_string(),
            (None, None) => String::new(),
        };

        let idx = self.atom_count;
        self.atom_count += 1;
        self.kekule.push(aromatic.then_some(prefix == "="));
        chain.prev = Some(idx);
        chain.symbols.push(format!("[{prefix}{body}]"));
    }
}

fn bond_order(ch: char) -> u8 {
    match ch {
        '=' => 2,
        '#' => 3,
        _ => 1,
    }
}

fn bond_prefix(order: u8) -> &'static str {
    match order {
        2 => "=",
        3 => "#",
        _ => "",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Index symbols for a branch or ring length.
fn length_symbols(value: usize) -> Result<Vec<&'static str>, EncodeError> {
    let index = selfies_from_index(value as i64)?;
    if index.len() > MAX_INDEX_LENGTH as usize {
        return Err(EncodeError::LengthOverflow { value });
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(s: &str) -> String {
        encode_smiles(s).unwrap()
    }

    #[test]
    fn simple_chains() {
        assert_eq!(enc("C"), "[C]");
        assert_eq!(enc("CCO"), "[C][C][O]");
        assert_eq!(enc("C=O"), "[C][=O]");
        assert_eq!(enc("C#N"), "[C][#N]");
        assert_eq!(enc("C-C"), "[C][C]");
    }

    #[test]
    fn two_letter_elements() {
        assert_eq!(enc("ClCBr"), "[Cl][C][Br]");
        assert_eq!(enc("C[Si]C"), "[C][Si][C]");
        assert_eq!(enc("Cn1ccnc1"), "[C][N][=C][C][=N][C][Ring1][Branch1]");
    }

    #[test]
    fn branches() {
        assert_eq!(enc("CC(C)C"), "[C][C][Branch1][C][C][C]");
        assert_eq!(enc("CC(=O)O"), "[C][C][=Branch1][C][=O][O]");
        assert_eq!(enc("C(CC)C"), "[C][Branch1][Ring1][C][C][C]");
    }

    #[test]
    fn nested_branches_count_symbols() {
        // Inner branch "C(C)C" encodes to 5 symbols -> index 4 = [=Branch1].
        assert_eq!(
            enc("CC(C(C)C)C"),
            "[C][C][Branch1][=Branch1][C][Branch1][C][C][C][C]"
        );
    }

    #[test]
    fn rings() {
        assert_eq!(enc("C1CC1"), "[C][C][C][Ring1][Ring1]");
        assert_eq!(enc("C1CCCCC1"), "[C][C][C][C][C][C][Ring1][=Branch1]");
        assert_eq!(enc("C=1CC1"), "[C][C][C][=Ring1][Ring1]");
        assert_eq!(enc("C1CC=1"), "[C][C][C][=Ring1][Ring1]");
        assert_eq!(enc("C%12CC%12"), "[C][C][C][Ring1][Ring1]");
        assert_eq!(enc("C%(123)CC%(123)"), "[C][C][C][Ring1][Ring1]");
        assert_eq!(enc("C%(7)CC7"), "[C][C][C][Ring1][Ring1]");
    }

    #[test]
    fn ring_stereo_pair() {
        assert_eq!(enc("C1CC/1"), "[C][C][C][-/Ring1][Ring1]");
    }

    #[test]
    fn long_ring_spills_into_two_index_symbols() {
        let smiles = format!("C1{}C1", "C".repeat(17));
        let encoded = enc(&smiles);
        // 19 atoms: distance 18, index 17 = [Ring1][Ring1].
        assert!(encoded.ends_with("[Ring2][Ring1][Ring1]"), "{encoded}");
    }

    #[test]
    fn aromatic_alternation() {
        assert_eq!(enc("c1ccccc1"), "[C][=C][C][=C][C][=C][Ring1][=Branch1]");
    }

    #[test]
    fn bracket_atoms() {
        assert_eq!(enc("[NH4+]"), "[N]");
        assert_eq!(enc("[13CH3]C"), "[C][C]");
        assert_eq!(enc("N[C@@H](C)C(=O)O"), "[N][C@@H][Branch1][C][C][C][=Branch1][C][=O][O]");
    }

    #[test]
    fn stereo_bond_markers() {
        assert_eq!(enc("F/C=C/F"), "[F][/C][=C][/F]");
    }

    #[test]
    fn failures() {
        assert_eq!(encode_smiles(""), Err(EncodeError::EmptyInput));
        assert_eq!(encode_smiles("   "), Err(EncodeError::EmptyInput));
        assert_eq!(
            encode_smiles("C(C"),
            Err(EncodeError::UnmatchedParen { pos: 1 })
        );
        assert_eq!(
            encode_smiles("CC)"),
            Err(EncodeError::UnmatchedParen { pos: 2 })
        );
        assert_eq!(
            encode_smiles("C="),
            Err(EncodeError::DanglingBond { pos: 1, ch: '=' })
        );
        assert_eq!(
            encode_smiles("C=(O)"),
            Err(EncodeError::DanglingBond { pos: 1, ch: '=' })
        );
        assert_eq!(
            encode_smiles("C?"),
            Err(EncodeError::UnexpectedChar { pos: 1, ch: '?' })
        );
        assert_eq!(encode_smiles("C()"), Err(EncodeError::EmptyBranch { pos: 1 }));
        assert_eq!(encode_smiles("C(1)C1"), Err(EncodeError::EmptyBranch { pos: 1 }));
        assert_eq!(encode_smiles("C1CC"), Err(EncodeError::UnclosedRing { label: 1 }));
        assert_eq!(
            encode_smiles("1CC"),
            Err(EncodeError::RingWithoutAtom { label: 1, pos: 0 })
        );
        assert_eq!(
            encode_smiles("C11"),
            Err(EncodeError::SelfRing { label: 1, pos: 2 })
        );
        assert_eq!(
            encode_smiles("C[C"),
            Err(EncodeError::UnclosedBracket { pos: 1 })
        );
        assert_eq!(
            encode_smiles("C%(12CC"),
            Err(EncodeError::UnexpectedChar { pos: 1, ch: '%' })
        );
        assert_eq!(
            encode_smiles("C%()C"),
            Err(EncodeError::UnexpectedChar { pos: 1, ch: '%' })
        );
        assert!(matches!(
            encode_smiles("[Xx]"),
            Err(EncodeError::InvalidElement { pos: 0, .. })
        ));
    }
}
