use thiserror::Error;

/// Errors from converting an integer to index symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("cannot encode negative index {0}")]
    Negative(i64),
}

/// Errors produced when encoding a SMILES string as SELFIES.
///
/// Encoding stops at the first malformed construct; no partial output is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The input string was empty or contained only whitespace.
    #[error("empty SMILES string")]
    EmptyInput,
    /// A parenthesis was opened without a matching close, or vice versa.
    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },
    /// A branch `()` with nothing inside.
    #[error("empty branch at position {pos}")]
    EmptyBranch { pos: usize },
    /// A bond symbol not followed by an atom or ring label.
    #[error("bond symbol '{ch}' at position {pos} is not followed by an atom")]
    DanglingBond { pos: usize, ch: char },
    /// An unexpected character was encountered at the given position.
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    /// A bracket atom `[` was opened but never closed with `]`.
    #[error("unclosed bracket atom starting at position {pos}")]
    UnclosedBracket { pos: usize },
    /// A bracket atom without a recognizable element symbol.
    #[error("invalid element '{text}' at position {pos}")]
    InvalidElement { pos: usize, text: String },
    /// A ring-closure label appears before any atom.
    #[error("ring label {label} at position {pos} has no preceding atom")]
    RingWithoutAtom { label: u16, pos: usize },
    /// A ring-opening label was never matched by a ring-closing label.
    #[error("unclosed ring {label}")]
    UnclosedRing { label: u16 },
    /// A ring closed on the atom that opened it.
    #[error("ring {label} at position {pos} closes on its opening atom")]
    SelfRing { label: u16, pos: usize },
    /// A branch or ring length that needs more than three index symbols.
    #[error("length {value} needs more index symbols than a SELFIES token can request")]
    LengthOverflow { value: usize },
    #[error(transparent)]
    Index(#[from] IndexError),
}
