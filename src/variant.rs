//! Variant selection.
//!
//! A [`VariantIndex`] registers, per agreement type, one ordered fragment set
//! for each `(directionality, party_count)` pair. A set entry is either a
//! fragment id or a reference to a named [`Slot`] (`@term`), which resolves
//! to one of several alternative fragments through the configuration's
//! options.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::configuration::{AgreementConfiguration, AgreementType, Directionality, PartyCount};
use crate::errors::{AssemblyError, AssemblyResult};

/// Identifier of a clause fragment within its agreement family.
pub type FragmentId = String;

/// One position in a registered fragment set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FragmentEntry {
    Fragment(FragmentId),
    Slot(String),
}

impl FragmentEntry {
    /// Parse `@name` as a slot reference and anything else as a fragment id.
    pub fn parse(entry: &str) -> Self {
        match entry.trim().strip_prefix('@') {
            Some(slot) => FragmentEntry::Slot(slot.trim().to_string()),
            None => FragmentEntry::Fragment(entry.trim().to_string()),
        }
    }
}

impl fmt::Display for FragmentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentEntry::Fragment(id) => write!(f, "{}", id),
            FragmentEntry::Slot(name) => write!(f, "@{}", name),
        }
    }
}

/// Alternative fragments for one position of a fragment set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slot {
    /// Choice used when the configuration names none.
    pub default: String,
    /// Choice name -> fragment id.
    pub choices: BTreeMap<String, FragmentId>,
}

impl Slot {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            choices: BTreeMap::new(),
        }
    }

    pub fn with_choice(mut self, choice: impl Into<String>, fragment: impl Into<FragmentId>) -> Self {
        self.choices.insert(choice.into(), fragment.into());
        self
    }
}

/// A registered fragment set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantEntry {
    pub agreement: AgreementType,
    pub directionality: Directionality,
    pub party_count: PartyCount,
    pub entries: Vec<FragmentEntry>,
}

impl VariantEntry {
    fn matches(&self, agreement: &AgreementType, directionality: Directionality, party_count: PartyCount) -> bool {
        self.agreement == *agreement && self.directionality == directionality && self.party_count == party_count
    }

    fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            FragmentEntry::Slot(name) => Some(name.as_str()),
            FragmentEntry::Fragment(_) => None,
        })
    }
}

/// Registry of fragment sets and slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantIndex {
    variants: Vec<VariantEntry>,
    slots: BTreeMap<AgreementType, BTreeMap<String, Slot>>,
}

impl VariantIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot for `agreement`. Slots must be registered before the
    /// fragment sets that reference them.
    pub fn register_slot(&mut self, agreement: &AgreementType, name: &str, slot: Slot) -> AssemblyResult<()> {
        if !slot.choices.contains_key(&slot.default) {
            return Err(AssemblyError::UnsupportedConfiguration(format!(
                "slot `{}` of `{}` defaults to `{}`, which is not one of its choices",
                name, agreement, slot.default
            )));
        }
        let slots = self.slots.entry(agreement.clone()).or_default();
        if slots.contains_key(name) {
            return Err(AssemblyError::UnsupportedConfiguration(format!(
                "slot `{}` of `{}` is registered twice",
                name, agreement
            )));
        }
        slots.insert(name.to_string(), slot);
        Ok(())
    }

    /// Register the fragment set for one `(agreement, directionality,
    /// party_count)` combination.
    ///
    /// Rejects a second set for the same combination, references to unknown
    /// slots and any fragment id that could appear twice in a selection.
    pub fn register(
        &mut self,
        agreement: &AgreementType,
        directionality: Directionality,
        party_count: PartyCount,
        entries: Vec<FragmentEntry>,
    ) -> AssemblyResult<()> {
        if self.lookup(agreement, directionality, party_count).is_some() {
            return Err(AssemblyError::UnsupportedConfiguration(format!(
                "{}/{}/{} is registered twice",
                agreement, directionality, party_count
            )));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut slots_seen: HashSet<&str> = HashSet::new();
        for entry in &entries {
            let ids: Vec<&str> = match entry {
                FragmentEntry::Fragment(id) => vec![id.as_str()],
                FragmentEntry::Slot(name) => {
                    if !slots_seen.insert(name.as_str()) {
                        return Err(AssemblyError::UnsupportedConfiguration(format!(
                            "slot `{}` appears twice in {}/{}/{}",
                            name, agreement, directionality, party_count
                        )));
                    }
                    let slot = self.slot(agreement, name).ok_or_else(|| {
                        AssemblyError::UnsupportedConfiguration(format!(
                            "{}/{}/{} references unknown slot `{}`",
                            agreement, directionality, party_count, name
                        ))
                    })?;
                    slot.choices.values().map(String::as_str).collect()
                }
            };
            for id in ids {
                if !seen.insert(id) {
                    return Err(AssemblyError::UnsupportedConfiguration(format!(
                        "fragment `{}` appears twice in {}/{}/{}",
                        id, agreement, directionality, party_count
                    )));
                }
            }
        }

        self.variants.push(VariantEntry {
            agreement: agreement.clone(),
            directionality,
            party_count,
            entries,
        });
        Ok(())
    }

    pub fn lookup(
        &self,
        agreement: &AgreementType,
        directionality: Directionality,
        party_count: PartyCount,
    ) -> Option<&VariantEntry> {
        self.variants
            .iter()
            .find(|v| v.matches(agreement, directionality, party_count))
    }

    pub fn slot(&self, agreement: &AgreementType, name: &str) -> Option<&Slot> {
        self.slots.get(agreement).and_then(|slots| slots.get(name))
    }

    /// Registered fragment sets in registration order.
    pub fn variants(&self) -> &[VariantEntry] {
        &self.variants
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Picks the ordered fragment ids for a configuration.
#[derive(Debug, Clone, Copy)]
pub struct VariantSelector<'a> {
    index: &'a VariantIndex,
}

impl<'a> VariantSelector<'a> {
    pub fn new(index: &'a VariantIndex) -> Self {
        Self { index }
    }

    /// Fragment ids for `config`, in registered order.
    pub fn select(&self, config: &AgreementConfiguration) -> AssemblyResult<Vec<FragmentId>> {
        let variant = self
            .index
            .lookup(&config.agreement, config.directionality, config.party_count)
            .ok_or_else(|| {
                AssemblyError::UnsupportedConfiguration(format!("no fragment set registered for {}", config))
            })?;

        for (slot, choice) in &config.options {
            if !variant.slot_names().any(|name| name == slot.as_str()) {
                return Err(AssemblyError::UnsupportedConfiguration(format!(
                    "{} has no slot `{}`",
                    config, slot
                )));
            }
            let offered = self
                .index
                .slot(&config.agreement, slot)
                .map_or(false, |s| s.choices.contains_key(choice));
            if !offered {
                return Err(AssemblyError::UnsupportedConfiguration(format!(
                    "slot `{}` has no choice `{}`",
                    slot, choice
                )));
            }
        }

        let mut fragments = Vec::with_capacity(variant.entries.len());
        for entry in &variant.entries {
            match entry {
                FragmentEntry::Fragment(id) => fragments.push(id.clone()),
                FragmentEntry::Slot(name) => {
                    let slot = self.index.slot(&config.agreement, name).ok_or_else(|| {
                        AssemblyError::UnsupportedConfiguration(format!("unknown slot `{}`", name))
                    })?;
                    let choice = config.options.get(name).unwrap_or(&slot.default);
                    let id = slot.choices.get(choice).ok_or_else(|| {
                        AssemblyError::UnsupportedConfiguration(format!(
                            "slot `{}` has no choice `{}`",
                            name, choice
                        ))
                    })?;
                    fragments.push(id.clone());
                }
            }
        }

        tracing::debug!(configuration = %config, fragments = fragments.len(), "selected fragment set");
        Ok(fragments)
    }

    /// Every registered configuration, with each slot set to its default.
    pub fn configurations(&self) -> Vec<AgreementConfiguration> {
        self.index
            .variants()
            .iter()
            .map(|variant| {
                let mut config = AgreementConfiguration::new(
                    variant.agreement.clone(),
                    variant.directionality,
                    variant.party_count,
                );
                for name in variant.slot_names() {
                    if let Some(slot) = self.index.slot(&variant.agreement, name) {
                        config = config.with_option(name, slot.default.clone());
                    }
                }
                config
            })
            .collect()
    }
}
