mod decoder;
mod encoder;
pub mod error;
pub mod grammar;
pub mod tokenizer;

use crate::ast::Ast;
use crate::constraints::Constraints;
use crate::smiles::to_smiles;
pub use error::{EncodeError, IndexError};
pub use tokenizer::{len_selfies, split_selfies};

/// Decode a SELFIES string to SMILES under the default constraints.
///
/// Never fails: any sequence of symbols derives some molecule, possibly the
/// empty one.
///
/// ```
/// assert_eq!(selfcrab::decode("[C][C][Branch1][C][C][C]"), "CC(C)C");
/// assert_eq!(selfcrab::decode("[C][F][C]"), "CF");
/// ```
pub fn decode(selfies: &str) -> String {
    decode_with(selfies, &Constraints::default())
}

pub fn decode_with(selfies: &str, constraints: &Constraints) -> String {
    to_smiles(&decode_to_ast_with(selfies, constraints))
}

/// Derive the molecular graph without serializing it.
pub fn decode_to_ast(selfies: &str) -> Ast {
    decode_to_ast_with(selfies, &Constraints::default())
}

pub fn decode_to_ast_with(selfies: &str, constraints: &Constraints) -> Ast {
    let tokens = tokenizer::tokenize(selfies);
    decoder::derive(&tokens, constraints)
}

/// Pretty-printed JSON of the derived graph, for inspection.
pub fn dump_ast(selfies: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&decode_to_ast(selfies))
}

/// Encode a SMILES string as SELFIES.
///
/// ```
/// assert_eq!(selfcrab::encode("C=O").unwrap(), "[C][=O]");
/// assert!(selfcrab::encode("C(C").is_err());
/// ```
pub fn encode(smiles: &str) -> Result<String, EncodeError> {
    encoder::encode_smiles(smiles)
}
