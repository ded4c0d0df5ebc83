//! The `library.toml` manifest.
//!
//! ```toml
//! [engine.numbering]
//! reference_prefix = "Clause"
//!
//! [inflections]
//! breaches = { singular = "breaches", plural = "breach" }
//!
//! [[families]]
//! agreement = "nondisclosure"
//! title = "Non-Disclosure Agreement"
//! directory = "nondisclosure"
//!
//! [families.fragments]
//! definitions = "definitions.json"
//!
//! [families.slots.term]
//! default = "unlimited"
//! choices = { limited = "term-limited", unlimited = "term-unlimited" }
//!
//! [[families.variants]]
//! directionality = "mutual"
//! party_count = "two"
//! fragments = ["definitions", "@term"]
//! ```

use std::collections::BTreeMap;

use layered_agreements::{AgreementType, Directionality, EngineConfig, InflectionTable, PartyCount, Slot};
use serde::{Deserialize, Serialize};

use crate::errors::{LibraryError, LibraryResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryManifest {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Phrasings added on top of the engine's default table.
    #[serde(default = "InflectionTable::empty")]
    pub inflections: InflectionTable,
    #[serde(default)]
    pub families: Vec<FamilyManifest>,
}

/// One agreement family: its fragments, slots and fragment sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyManifest {
    pub agreement: AgreementType,
    #[serde(default)]
    pub title: Option<String>,
    /// Directory of the fragment files, relative to the manifest.
    #[serde(default)]
    pub directory: Option<String>,
    /// Fragment id -> clause-definition file.
    pub fragments: BTreeMap<String, String>,
    #[serde(default)]
    pub slots: BTreeMap<String, Slot>,
    #[serde(default)]
    pub variants: Vec<VariantManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantManifest {
    pub directionality: Directionality,
    pub party_count: PartyCount,
    /// Fragment ids and `@slot` references in document order.
    pub fragments: Vec<String>,
}

impl LibraryManifest {
    /// Parse a manifest; `path` is used in error messages only.
    pub fn from_toml_str(source: &str, path: &str) -> LibraryResult<Self> {
        toml::from_str(source).map_err(|e| LibraryError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

impl FamilyManifest {
    /// Path of a fragment file relative to the library root.
    pub fn fragment_path(&self, file: &str) -> String {
        match self.directory.as_deref().map(|d| d.trim_end_matches('/')) {
            Some(dir) if !dir.is_empty() => format!("{}/{}", dir, file),
            _ => file.to_string(),
        }
    }
}
