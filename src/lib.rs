pub mod ast;
pub mod constraints;
pub mod element;
pub mod selfies;
pub mod smiles;

pub use ast::{Ast, Atom, Bond, Ring};
pub use constraints::{Constraints, ConstraintsError, Preset};
pub use element::Element;
pub use selfies::grammar::{index_from_selfies, selfies_from_index};
pub use selfies::{
    decode, decode_to_ast, decode_to_ast_with, decode_with, dump_ast, encode, len_selfies,
    split_selfies, EncodeError, IndexError,
};
pub use smiles::to_smiles;

#[cfg(test)]
mod tests;
