//! Agreement configurations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Agreement family, e.g. `nondisclosure`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgreementType(pub String);

impl AgreementType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn nondisclosure() -> Self {
        Self::new("nondisclosure")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgreementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether confidentiality obligations run one way or all ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directionality {
    Unilateral,
    Mutual,
}

/// Number of parties to the agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyCount {
    /// Exactly two parties.
    Two,
    /// Three or more parties.
    Many,
}

impl PartyCount {
    /// Check whether `n` parties fit this count.
    pub fn admits(self, n: usize) -> bool {
        match self {
            PartyCount::Two => n == 2,
            PartyCount::Many => n >= 3,
        }
    }
}

impl fmt::Display for Directionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directionality::Unilateral => write!(f, "unilateral"),
            Directionality::Mutual => write!(f, "mutual"),
        }
    }
}

impl fmt::Display for PartyCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyCount::Two => write!(f, "two"),
            PartyCount::Many => write!(f, "many"),
        }
    }
}

/// An immutable request for one agreement variant.
///
/// `(agreement, directionality, party_count)` picks the registered fragment
/// set; `options` choose between alternative fragments at the set's slots
/// (e.g. `term = limited`). Slots without an option use their default.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgreementConfiguration {
    pub agreement: AgreementType,
    pub directionality: Directionality,
    pub party_count: PartyCount,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl AgreementConfiguration {
    pub fn new(agreement: AgreementType, directionality: Directionality, party_count: PartyCount) -> Self {
        Self {
            agreement,
            directionality,
            party_count,
            options: BTreeMap::new(),
        }
    }

    /// Configuration of a non-disclosure agreement.
    pub fn nondisclosure(directionality: Directionality, party_count: PartyCount) -> Self {
        Self::new(AgreementType::nondisclosure(), directionality, party_count)
    }

    /// Choose `choice` for the slot named `slot`.
    pub fn with_option(mut self, slot: impl Into<String>, choice: impl Into<String>) -> Self {
        self.options.insert(slot.into(), choice.into());
        self
    }

    pub fn is_multi_party(&self) -> bool {
        self.party_count == PartyCount::Many
    }
}

impl fmt::Display for AgreementConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.agreement, self.directionality, self.party_count)?;
        for (slot, choice) in &self.options {
            write!(f, " {}={}", slot, choice)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_options() {
        let config = AgreementConfiguration::nondisclosure(Directionality::Mutual, PartyCount::Many)
            .with_option("term", "limited");
        assert_eq!(config.to_string(), "nondisclosure/mutual/many term=limited");
    }

    #[test]
    fn party_count_admits() {
        assert!(PartyCount::Two.admits(2));
        assert!(!PartyCount::Two.admits(3));
        assert!(PartyCount::Many.admits(3));
        assert!(!PartyCount::Many.admits(2));
    }
}
