//! Gas mixture composition and physical constants

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{StudyError, StudyResult};

/// Molar gas constant R \[J/(mol·K)\]
pub const GAS_CONSTANT: f64 = 8.314_462_618;

/// One standard atmosphere \[Pa\]
pub const ONE_ATMOSPHERE: f64 = 101_325.0;

/// Initial mixture composition
///
/// Maps species names to mole amounts. Amounts are relative: only their ratios
/// matter, so `{CH4: 1, O2: 2}` and `{CH4: 0.5, O2: 1}` describe the same gas.
///
/// Two textual forms are accepted:
///
/// ```rust
/// use ignite_rs::physics::Composition;
///
/// let parsed: Composition = "CH4:1, O2:2, N2:7.52".parse().unwrap();
/// let built = Composition::from_pairs([("CH4", 1.0), ("O2", 2.0), ("N2", 7.52)]).unwrap();
/// assert_eq!(parsed, built);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "CompositionDocument", into = "BTreeMap<String, f64>")]
pub struct Composition {
    amounts: BTreeMap<String, f64>,
}

impl Composition {
    /// Build a composition from `(species, amount)` pairs
    pub fn from_pairs<S: Into<String>>(
        pairs: impl IntoIterator<Item = (S, f64)>,
    ) -> StudyResult<Self> {
        let mut composition = Self::default();
        for (species, amount) in pairs {
            composition.insert_new(species.into(), amount)?;
        }
        composition.validate()?;
        Ok(composition)
    }

    /// Add a species that is not present yet
    fn insert_new(&mut self, species: String, amount: f64) -> StudyResult<()> {
        if self.amounts.contains_key(&species) {
            return Err(StudyError::config(format!("species {} is listed more than once", species)));
        }
        self.amounts.insert(species, amount);
        Ok(())
    }

    /// Check amounts are finite, non-negative and not all zero
    pub fn validate(&self) -> StudyResult<()> {
        if self.amounts.is_empty() {
            return Err(StudyError::config("composition has no species"));
        }
        for (species, amount) in &self.amounts {
            if species.trim().is_empty() {
                return Err(StudyError::config("composition has an empty species name"));
            }
            if !amount.is_finite() || *amount < 0.0 {
                return Err(StudyError::config(format!(
                    "amount of {} must be finite and non-negative, got {}",
                    species, amount
                )));
            }
        }
        if self.total() <= 0.0 {
            return Err(StudyError::config("composition total amount must be positive"));
        }
        Ok(())
    }

    /// Amount of a species (0.0 when absent)
    pub fn amount(&self, species: &str) -> f64 {
        self.amounts.get(species).copied().unwrap_or(0.0)
    }

    /// Set the amount of one species, keeping the others
    pub fn set_amount(&mut self, species: &str, amount: f64) {
        self.amounts.insert(species.to_string(), amount);
    }

    /// Sum of all amounts
    pub fn total(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// Normalised mole fractions, in species-name order
    pub fn mole_fractions(&self) -> Vec<(&str, f64)> {
        let total = self.total();
        self.amounts
            .iter()
            .map(|(species, amount)| (species.as_str(), amount / total))
            .collect()
    }

    /// Species names, sorted
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.amounts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts.iter().map(|(s, a)| (s.as_str(), *a))
    }
}

impl FromStr for Composition {
    type Err = StudyError;

    /// Parse `"CH4:0.1, O2:1, N2:3.76"`
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut composition = Self::default();

        for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (species, amount) = entry.split_once(':').ok_or_else(|| {
                StudyError::config(format!("expected 'species:amount', got '{}'", entry))
            })?;
            let amount: f64 = amount.trim().parse().map_err(|_| {
                StudyError::config(format!("invalid amount '{}' for {}", amount.trim(), species.trim()))
            })?;
            composition.insert_new(species.trim().to_string(), amount)?;
        }

        composition.validate()?;
        Ok(composition)
    }
}

/// Either textual form, as written in a study document
#[derive(Deserialize)]
#[serde(untagged)]
enum CompositionDocument {
    Text(String),
    Amounts(BTreeMap<String, f64>),
}

impl TryFrom<CompositionDocument> for Composition {
    type Error = StudyError;

    fn try_from(document: CompositionDocument) -> Result<Self, Self::Error> {
        match document {
            CompositionDocument::Text(text) => text.parse(),
            CompositionDocument::Amounts(amounts) => Composition::from_pairs(amounts),
        }
    }
}

impl From<Composition> for BTreeMap<String, f64> {
    fn from(composition: Composition) -> Self {
        composition.amounts
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .amounts
            .iter()
            .map(|(species, amount)| format!("{}:{}", species, amount))
            .collect();
        write!(f, "{}", entries.join(", "))
    }
}
