//! Number-dependent phrasings.
//!
//! Clause templates refer to inflected words through `[[Role:key]]` tokens;
//! the table stores the singular and plural phrasing for each key so that
//! templates do not need near-duplicate singular and plural copies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::roles::GrammaticalNumber;

/// Singular and plural phrasing of one inflected word or phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrasing {
    pub singular: String,
    pub plural: String,
}

impl Phrasing {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    pub fn pick(&self, number: GrammaticalNumber) -> &str {
        match number {
            GrammaticalNumber::Singular => &self.singular,
            GrammaticalNumber::Plural => &self.plural,
        }
    }
}

/// Table of phrasings keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InflectionTable {
    entries: BTreeMap<String, Phrasing>,
}

impl InflectionTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, phrasing: Phrasing) {
        self.entries.insert(key.into(), phrasing);
    }

    pub fn with(mut self, key: impl Into<String>, singular: &str, plural: &str) -> Self {
        self.insert(key, Phrasing::new(singular, plural));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Phrasing> {
        self.entries.get(key)
    }

    /// Add every entry of `other`, overriding entries with the same key.
    pub fn merge(&mut self, other: &InflectionTable) {
        for (key, phrasing) in &other.entries {
            self.entries.insert(key.clone(), phrasing.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InflectionTable {
    /// The common English verb and pronoun forms.
    fn default() -> Self {
        Self::empty()
            .with("is", "is", "are")
            .with("was", "was", "were")
            .with("has", "has", "have")
            .with("does", "does", "do")
            .with("it", "it", "they")
            .with("its", "its", "their")
            .with("itself", "itself", "themselves")
            .with("party", "Party", "Parties")
    }
}
