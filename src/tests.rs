use crate::*;

#[test]
fn ast_from_decode_matches_serializer() {
    let ast = decode_to_ast("[C][C][=Branch1][C][=O][O]");
    assert_eq!(ast.atom_count(), 4);
    assert_eq!(ast.bonds().len(), 3);
    assert_eq!(ast.atom(2).element, Element::O);
    assert_eq!(to_smiles(&ast), "CC(=O)O");
}

#[test]
fn symbol_helpers() {
    let selfies = encode("CC(C)C").unwrap();
    assert_eq!(len_selfies(&selfies), 6);
    assert_eq!(split_selfies(&selfies)[2], "[Branch1]");
}

#[test]
fn index_helpers_are_inverse() {
    for i in [0, 1, 15, 16, 255, 4095] {
        let symbols = selfies_from_index(i).unwrap();
        assert_eq!(index_from_selfies(&symbols), i as usize);
    }
    assert_eq!(selfies_from_index(-1), Err(IndexError::Negative(-1)));
}

#[test]
fn constraints_from_json_drive_decoding() {
    let constraints = Constraints::from_json(r#"{"preset": "octet_rule"}"#).unwrap();
    assert_eq!(constraints.base_preset(), Preset::OctetRule);
    assert_eq!(decode_with("[C][=S][=O]", &constraints), "C=S");
    assert_eq!(
        decode_to_ast_with("[C][=S][=O]", &constraints).atom_count(),
        2
    );
}

#[test]
fn encode_errors_display() {
    let err = encode("C=").unwrap_err();
    assert_eq!(err, EncodeError::DanglingBond { pos: 1, ch: '=' });
    assert_eq!(
        err.to_string(),
        "bond symbol '=' at position 1 is not followed by an atom"
    );
    assert_eq!(encode("").unwrap_err().to_string(), "empty SMILES string");
}

#[test]
fn many_ring_closures_reencode() {
    let mut ast = Ast::new();
    for _ in 0..103 {
        ast.add_atom(Element::C, 4, None);
    }
    for i in 0..102 {
        ast.add_bond(i, i + 1, 1);
    }
    for i in 0..101 {
        ast.add_ring(i, i + 2, 1, None);
    }
    let smiles = to_smiles(&ast);
    assert!(smiles.contains("%(100)"), "{smiles}");
    assert!(encode(&smiles).is_ok(), "{smiles}");
}
