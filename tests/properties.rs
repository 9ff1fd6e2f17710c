//! Properties that must hold for every symbol sequence, not just valid ones.

use selfcrab::selfies::grammar::INDEX_ALPHABET;
use selfcrab::{decode, decode_to_ast, encode, Ast};

const ALPHABET: &[&str] = &[
    "[C]", "[=C]", "[#C]", "[O]", "[=O]", "[N]", "[#N]", "[F]", "[S]", "[=S]", "[P]", "[Cl]",
    "[Branch1]", "[=Branch1]", "[#Branch2]", "[Ring1]", "[=Ring1]", "[Ring2]", "[nop]", "[Xe]",
];

/// Deterministic pseudo-random symbol strings (64-bit LCG).
fn sequences(count: usize, max_len: usize) -> Vec<String> {
    let mut seed: u64 = 0x5eed_cafe;
    let mut next = move || {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (seed >> 33) as usize
    };
    (0..count)
        .map(|_| {
            let len = next() % max_len;
            (0..len).map(|_| ALPHABET[next() % ALPHABET.len()]).collect()
        })
        .collect()
}

fn assert_valid(ast: &Ast, input: &str) {
    for atom in ast.atoms() {
        assert!(
            ast.used_capacity(atom.index) <= atom.capacity,
            "{input}: atom {} over capacity",
            atom.index
        );
    }
    for bond in ast.bonds() {
        assert!((1..=3).contains(&bond.order), "{input}: bond order {}", bond.order);
        assert_ne!(bond.from, bond.to, "{input}: self bond");
    }
    for ring in ast.rings() {
        assert!((1..=3).contains(&ring.order), "{input}: ring order {}", ring.order);
        assert_ne!(ring.from, ring.to, "{input}: self ring");
    }
}

#[test]
fn every_sequence_derives_a_valid_graph() {
    for input in sequences(2000, 24) {
        let ast = decode_to_ast(&input);
        assert_valid(&ast, &input);
    }
}

#[test]
fn index_symbols_alone_decode() {
    let input: String = INDEX_ALPHABET.concat();
    assert_valid(&decode_to_ast(&input), &input);
}

#[test]
fn decoded_output_reencodes() {
    // Whatever the decoder writes is SMILES the encoder accepts.
    for input in sequences(500, 16) {
        let smiles = decode(&input);
        if smiles.is_empty() {
            continue;
        }
        if let Err(e) = encode(&smiles) {
            panic!("{input} -> {smiles}: {e}");
        }
    }
}
