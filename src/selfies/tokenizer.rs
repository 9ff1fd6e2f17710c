use log::debug;

use crate::element::Element;
use crate::selfies::grammar::{process_branch_symbol, process_ring_symbol};

/// One bracketed SELFIES symbol with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The symbol including brackets, e.g. `[=C]`.
    pub symbol: &'a str,
    pub kind: TokenKind,
    /// Byte offset of the opening bracket in the input.
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Atom(AtomToken),
    Branch { order: u8, length: u8 },
    Ring {
        order: u8,
        length: u8,
        stereo: Option<String>,
    },
    Nop,
    /// Well-formed brackets naming nothing the decoder can place.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    pub element: Element,
    pub bond_order: u8,
    /// Bracket content (minus bond prefix) when it carries `@`.
    pub stereo: Option<String>,
}

/// Split a SELFIES string into its bracketed symbols.
///
/// Text outside brackets and a trailing unclosed `[` are ignored.
pub fn split_selfies(input: &str) -> Vec<&str> {
    symbol_spans(input).map(|(_, sym)| sym).collect()
}

/// Number of symbols in a SELFIES string.
pub fn len_selfies(input: &str) -> usize {
    symbol_spans(input).count()
}

fn symbol_spans(input: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        let rest = input.get(cursor..)?;
        let open = cursor + rest.find('[')?;
        let close = open + input[open..].find(']')?;
        cursor = close + 1;
        Some((open, &input[open..=close]))
    })
}

pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    symbol_spans(input)
        .map(|(pos, symbol)| Token {
            symbol,
            kind: classify(symbol),
            pos,
        })
        .collect()
}

/// Classify a single bracketed symbol.
pub fn classify(symbol: &str) -> TokenKind {
    if symbol == "[nop]" {
        return TokenKind::Nop;
    }
    if let Some((order, length)) = process_branch_symbol(symbol) {
        return TokenKind::Branch { order, length };
    }
    if let Some((order, length, stereo)) = process_ring_symbol(symbol) {
        return TokenKind::Ring {
            order,
            length,
            stereo,
        };
    }
    match parse_atom_symbol(symbol) {
        Some(atom) => TokenKind::Atom(atom),
        None => {
            debug!("unrecognized SELFIES symbol {symbol}");
            TokenKind::Unknown
        }
    }
}

fn parse_atom_symbol(symbol: &str) -> Option<AtomToken> {
    let content = symbol.strip_prefix('[')?.strip_suffix(']')?;
    let (bond_order, body) = match content.chars().next()? {
        '=' => (2, &content[1..]),
        '#' => (3, &content[1..]),
        '/' | '\\' => (1, &content[1..]),
        _ => (1, content),
    };
    if body.contains('@') {
        let element = Element::from_symbol(leading_element(body)?)?;
        Some(AtomToken {
            element,
            bond_order,
            stereo: Some(body.to_string()),
        })
    } else {
        Some(AtomToken {
            element: Element::from_symbol(body)?,
            bond_order,
            stereo: None,
        })
    }
}

/// The `[A-Z][a-z]?` prefix of `body`.
fn leading_element(body: &str) -> Option<&str> {
    let mut chars = body.char_indices();
    let (_, first) = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    let end = match chars.next() {
        Some((i, c)) if c.is_ascii_lowercase() => i + c.len_utf8(),
        Some((i, _)) => i,
        None => body.len(),
    };
    Some(&body[..end])
}
