mod writer;

pub use writer::to_smiles;
