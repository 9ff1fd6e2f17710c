//! Bonding-capacity tables consumed by the decoder.
//!
//! A [`Constraints`] value maps an element (optionally with a formal charge)
//! to the number of bonds an atom of that kind may hold. Keys are element
//! symbols, `Symbol+n`/`Symbol-n` for charged species, and the mandatory
//! wildcard `?` used for everything else.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::element::is_element_symbol;

/// Key of the fallback entry every table carries.
pub const WILDCARD: &str = "?";

/// Largest capacity accepted from user configuration.
pub const MAX_CAPACITY: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintsError {
    #[error("unknown constraints preset '{0}'")]
    UnknownPreset(String),
    #[error("invalid constraint key '{0}'")]
    InvalidKey(String),
    #[error("bonding capacity {value} for '{key}' exceeds the maximum of 8")]
    CapacityTooLarge { key: String, value: u8 },
    #[error("constraint table is missing the '?' wildcard entry")]
    MissingWildcard,
    #[error("failed to parse constraints document: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConstraintsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Built-in capacity tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Default,
    /// Octet-rule valences: P and S limited to 3 and 2.
    OctetRule,
    /// Expanded valences for halogens and nitrogen.
    Hypervalent,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::OctetRule => "octet_rule",
            Preset::Hypervalent => "hypervalent",
        }
    }

    fn table(self) -> BTreeMap<String, u8> {
        let mut table: BTreeMap<String, u8> = DEFAULT_TABLE
            .iter()
            .map(|&(k, v)| (k.to_string(), v))
            .collect();
        let overrides: &[(&str, u8)] = match self {
            Preset::Default => &[],
            Preset::OctetRule => &OCTET_RULE_OVERRIDES,
            Preset::Hypervalent => &HYPERVALENT_OVERRIDES,
        };
        for &(k, v) in overrides {
            table.insert(k.to_string(), v);
        }
        table
    }
}

impl FromStr for Preset {
    type Err = ConstraintsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Preset::Default),
            "octet_rule" => Ok(Preset::OctetRule),
            "hypervalent" => Ok(Preset::Hypervalent),
            other => Err(ConstraintsError::UnknownPreset(other.to_string())),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const DEFAULT_TABLE: [(&str, u8); 24] = [
    ("H", 1),
    ("F", 1),
    ("Cl", 1),
    ("Br", 1),
    ("I", 1),
    ("B", 3),
    ("B+1", 2),
    ("B-1", 4),
    ("O", 2),
    ("O+1", 3),
    ("O-1", 1),
    ("N", 3),
    ("N+1", 4),
    ("N-1", 2),
    ("C", 4),
    ("C+1", 5),
    ("C-1", 3),
    ("P", 5),
    ("P+1", 6),
    ("P-1", 4),
    ("S", 6),
    ("S+1", 7),
    ("S-1", 5),
    (WILDCARD, 8),
];

const OCTET_RULE_OVERRIDES: [(&str, u8); 6] = [
    ("S", 2),
    ("S+1", 3),
    ("S-1", 1),
    ("P", 3),
    ("P+1", 4),
    ("P-1", 2),
];

const HYPERVALENT_OVERRIDES: [(&str, u8); 4] = [("Cl", 7), ("Br", 7), ("I", 7), ("N", 5)];

/// A bonding-capacity table.
///
/// Values are immutable once built; derive a modified table with
/// [`with_capacity`](Self::with_capacity) instead of mutating a shared one.
///
/// ```
/// use selfcrab::{Constraints, Preset};
///
/// let octet = Constraints::preset(Preset::OctetRule);
/// assert_eq!(octet.bonding_capacity("S", 0), 2);
/// assert_eq!(octet.bonding_capacity("Xe", 0), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constraints {
    preset: Preset,
    capacities: BTreeMap<String, u8>,
}

/// On-disk form: a preset plus per-key overrides.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConstraintsDocument {
    #[serde(default)]
    preset: Preset,
    #[serde(default)]
    capacities: BTreeMap<String, u8>,
}

impl Constraints {
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            capacities: preset.table(),
        }
    }

    /// Build a table from an explicit mapping. The mapping must contain the
    /// `?` wildcard.
    pub fn from_table<I, K>(entries: I) -> Result<Self, ConstraintsError>
    where
        I: IntoIterator<Item = (K, u8)>,
        K: Into<String>,
    {
        let mut capacities = BTreeMap::new();
        for (key, value) in entries {
            let key = key.into();
            validate_entry(&key, value)?;
            capacities.insert(key, value);
        }
        if !capacities.contains_key(WILDCARD) {
            return Err(ConstraintsError::MissingWildcard);
        }
        Ok(Self {
            preset: Preset::Default,
            capacities,
        })
    }

    /// Parse a JSON document of the form
    /// `{"preset": "octet_rule", "capacities": {"N": 5}}`.
    pub fn from_json(s: &str) -> Result<Self, ConstraintsError> {
        let doc: ConstraintsDocument = serde_json::from_str(s)?;
        let mut constraints = Self::preset(doc.preset);
        for (key, value) in doc.capacities {
            constraints = constraints.with_capacity(key, value)?;
        }
        Ok(constraints)
    }

    /// Return a copy of this table with one entry set.
    pub fn with_capacity(
        mut self,
        key: impl Into<String>,
        value: u8,
    ) -> Result<Self, ConstraintsError> {
        let key = key.into();
        validate_entry(&key, value)?;
        self.capacities.insert(key, value);
        Ok(self)
    }

    /// The preset this table was derived from.
    pub fn base_preset(&self) -> Preset {
        self.preset
    }

    /// Maximum number of bonds for `element` carrying `charge`.
    ///
    /// Falls back to the `?` entry when no specific key exists.
    pub fn bonding_capacity(&self, element: &str, charge: i8) -> u8 {
        let key = if charge == 0 {
            element.to_string()
        } else {
            format!("{element}{charge:+}")
        };
        self.capacities
            .get(&key)
            .or_else(|| self.capacities.get(WILDCARD))
            .copied()
            .unwrap_or(MAX_CAPACITY)
    }

    /// Serialize in the shape [`from_json`](Self::from_json) reads back.
    pub fn to_json(&self) -> Result<String, ConstraintsError> {
        serde_json::to_string_pretty(self).map_err(ConstraintsError::from)
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::preset(Preset::Default)
    }
}

fn validate_entry(key: &str, value: u8) -> Result<(), ConstraintsError> {
    if value > MAX_CAPACITY {
        return Err(ConstraintsError::CapacityTooLarge {
            key: key.to_string(),
            value,
        });
    }
    if key == WILDCARD {
        return Ok(());
    }
    let (symbol, charge) = match key.find(['+', '-']) {
        Some(pos) => (&key[..pos], Some(&key[pos..])),
        None => (key, None),
    };
    if !is_element_symbol(symbol) {
        return Err(ConstraintsError::InvalidKey(key.to_string()));
    }
    if let Some(charge) = charge {
        let valid = charge
            .parse::<i8>()
            .map(|c| c != 0)
            .unwrap_or(false);
        if !valid {
            return Err(ConstraintsError::InvalidKey(key.to_string()));
        }
    }
    Ok(())
}
