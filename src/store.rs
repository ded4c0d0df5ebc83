//! Clause store abstraction and the in-memory fragment library.
//!
//! A store is built once at startup and shared read-only between requests.
//! Fragment templates are held as `Arc<ClauseNode>` so that concurrent
//! requests share them without copying.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::clause::{parse_fragment, ClauseNode, NodePath};
use crate::configuration::{AgreementType, Directionality, PartyCount};
use crate::errors::{AssemblyError, AssemblyResult};
use crate::inflection::InflectionTable;
use crate::variant::{FragmentEntry, FragmentId, Slot, VariantIndex};

/// Fragment id -> shared clause template.
pub type FragmentMap = BTreeMap<FragmentId, Arc<ClauseNode>>;

/// Read-only supplier of clause templates and variant registrations.
pub trait ClauseStore: Send + Sync {
    /// All fragments of one agreement family.
    fn load_fragments(&self, agreement: &AgreementType) -> AssemblyResult<&FragmentMap>;

    fn variant_index(&self) -> &VariantIndex;

    /// Phrasings available to `[[Role:key]]` tokens.
    fn inflections(&self) -> &InflectionTable;

    /// Display title of an agreement family, if it has one.
    fn title(&self, agreement: &AgreementType) -> Option<&str>;
}

impl<S: ClauseStore + ?Sized> ClauseStore for Arc<S> {
    fn load_fragments(&self, agreement: &AgreementType) -> AssemblyResult<&FragmentMap> {
        (**self).load_fragments(agreement)
    }

    fn variant_index(&self) -> &VariantIndex {
        (**self).variant_index()
    }

    fn inflections(&self) -> &InflectionTable {
        (**self).inflections()
    }

    fn title(&self, agreement: &AgreementType) -> Option<&str> {
        (**self).title(agreement)
    }
}

#[derive(Debug, Clone, Default)]
struct Family {
    title: Option<String>,
    fragments: FragmentMap,
}

/// In-memory clause store.
///
/// ```
/// use layered_agreements::{ClauseNode, Directionality, FragmentLibrary, PartyCount, AgreementType};
///
/// let nda = AgreementType::nondisclosure();
/// let mut library = FragmentLibrary::new();
/// library
///     .insert_fragment(&nda, ClauseNode::text("Keep it secret.").with_anchor("secrecy"))
///     .unwrap();
/// library
///     .register_variant(&nda, Directionality::Mutual, PartyCount::Two, &["secrecy"])
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FragmentLibrary {
    families: BTreeMap<AgreementType, Family>,
    index: VariantIndex,
    inflections: InflectionTable,
}

impl Default for FragmentLibrary {
    fn default() -> Self {
        Self {
            families: BTreeMap::new(),
            index: VariantIndex::new(),
            inflections: InflectionTable::default(),
        }
    }
}

impl FragmentLibrary {
    /// An empty library with the default inflection table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `table` on top of the current inflections.
    pub fn with_inflections(mut self, table: &InflectionTable) -> Self {
        self.inflections.merge(table);
        self
    }

    pub fn set_title(&mut self, agreement: &AgreementType, title: impl Into<String>) {
        self.families.entry(agreement.clone()).or_default().title = Some(title.into());
    }

    /// Add a validated fragment, keyed by its root anchor.
    pub fn insert_fragment(&mut self, agreement: &AgreementType, fragment: ClauseNode) -> AssemblyResult<()> {
        let id = fragment.anchor.clone().ok_or_else(|| AssemblyError::InvalidFragment {
            fragment: "<unnamed>".to_string(),
            message: "fragment root has no anchor".to_string(),
        })?;
        fragment.validate(&NodePath::fragment(id.clone()))?;

        let family = self.families.entry(agreement.clone()).or_default();
        if family.fragments.contains_key(&id) {
            return Err(AssemblyError::DuplicateAnchor(id));
        }
        family.fragments.insert(id, Arc::new(fragment));
        Ok(())
    }

    /// Parse a clause-definition JSON document and add it under `id`.
    pub fn insert_json(&mut self, agreement: &AgreementType, id: &str, json: &str) -> AssemblyResult<()> {
        let fragment = parse_fragment(id, json)?;
        self.insert_fragment(agreement, fragment)
    }

    pub fn register_slot(&mut self, agreement: &AgreementType, name: &str, slot: Slot) -> AssemblyResult<()> {
        self.index.register_slot(agreement, name, slot)
    }

    /// Register a fragment set; `@name` entries refer to slots.
    pub fn register_variant(
        &mut self,
        agreement: &AgreementType,
        directionality: Directionality,
        party_count: PartyCount,
        entries: &[&str],
    ) -> AssemblyResult<()> {
        let entries = entries.iter().map(|e| FragmentEntry::parse(e)).collect();
        self.index.register(agreement, directionality, party_count, entries)
    }

    pub fn variant_index_mut(&mut self) -> &mut VariantIndex {
        &mut self.index
    }

    pub fn fragment(&self, agreement: &AgreementType, id: &str) -> Option<&Arc<ClauseNode>> {
        self.families.get(agreement).and_then(|f| f.fragments.get(id))
    }

    /// Agreement families held by this library.
    pub fn agreements(&self) -> impl Iterator<Item = &AgreementType> {
        self.families.keys()
    }
}

impl ClauseStore for FragmentLibrary {
    fn load_fragments(&self, agreement: &AgreementType) -> AssemblyResult<&FragmentMap> {
        self.families
            .get(agreement)
            .map(|f| &f.fragments)
            .ok_or_else(|| AssemblyError::UnsupportedConfiguration(format!("no clause library for `{}`", agreement)))
    }

    fn variant_index(&self) -> &VariantIndex {
        &self.index
    }

    fn inflections(&self) -> &InflectionTable {
        &self.inflections
    }

    fn title(&self, agreement: &AgreementType) -> Option<&str> {
        self.families.get(agreement).and_then(|f| f.title.as_deref())
    }
}
