/// Elements the SELFIES decoder can place as atoms.
///
/// The set is deliberately closed: atom tokens naming anything else are
/// dropped during derivation. Capacities for these elements live in
/// [`Constraints`](crate::Constraints), not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    P,
    S,
    Cl,
    Br,
    I,
}

impl Element {
    pub const ALL: [Element; 11] = [
        Element::C,
        Element::N,
        Element::O,
        Element::S,
        Element::P,
        Element::F,
        Element::Cl,
        Element::Br,
        Element::I,
        Element::B,
        Element::H,
    ];

    pub fn from_symbol(s: &str) -> Option<Element> {
        Self::ALL.iter().copied().find(|e| e.symbol() == s)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    /// Whether a bare (unbracketed) SMILES atom may spell this element.
    pub fn is_organic_subset(self) -> bool {
        !matches!(self, Element::H)
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Whether `s` is the symbol of any element 1–118.
pub fn is_element_symbol(s: &str) -> bool {
    SYMBOLS.contains(&s)
}

/// Two-letter symbols the encoder reads from unbracketed SMILES.
///
/// Symbols whose second letter is also an aromatic atom (`Cs`, `Sc`, `Co`,
/// `Sn`, ...) are excluded: `Cn1ccnc1` must read as carbon + aromatic
/// nitrogen.
pub(crate) const TWO_LETTER_ALIPHATIC: [&str; 27] = [
    "Cl", "Br", "Si", "Se", "Na", "Li", "Mg", "Al", "Ca", "Fe", "Cu", "Ni", "Ag", "Au", "Pt",
    "Hg", "Te", "Ge", "Ba", "Sr", "Ti", "Cr", "Ga", "He", "Ne", "Ar", "Kr",
];

static SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];
