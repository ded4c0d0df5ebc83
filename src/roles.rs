//! Party role bindings for placeholder substitution.
//!
//! A [`PartyRoleMap`] binds placeholder names (`DisclosingParty`,
//! `ReceivingParty`, `Representatives`, but also plain named terms such as
//! `Purpose` or `GoverningLaw`) to concrete text with a grammatical number.
//! Possessive forms are derived from the binding when a template asks for
//! them.
//!
//! Besides the shared bindings, a map holds one set of bindings per party
//! (`PartyName`, `PartyDetails`, `PartyRole`, `Signatory`) for paragraphs
//! that repeat once per party.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::configuration::{AgreementConfiguration, Directionality, PartyCount};
use crate::errors::{AssemblyError, AssemblyResult};

/// Grammatical number of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammaticalNumber {
    Singular,
    Plural,
}

/// Concrete text bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub text: String,
    pub number: GrammaticalNumber,
}

impl RoleBinding {
    pub fn singular(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            number: GrammaticalNumber::Singular,
        }
    }

    pub fn plural(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            number: GrammaticalNumber::Plural,
        }
    }

    pub fn is_plural(&self) -> bool {
        self.number == GrammaticalNumber::Plural
    }

    /// Possessive form of the bound text.
    ///
    /// Plural text ending in `s` takes a bare apostrophe ("the Receiving
    /// Parties'"); everything else takes `'s` ("Jane Doe's"). Text that is
    /// already possessive is returned unchanged.
    pub fn possessive(&self) -> String {
        let text = self.text.trim_end();
        if text.ends_with("'s") || text.ends_with("’s") || text.ends_with("s'") || text.ends_with("s’") {
            return text.to_string();
        }
        if self.is_plural() && text.ends_with('s') {
            format!("{}'", text)
        } else {
            format!("{}'s", text)
        }
    }
}

/// Normalise a placeholder name by removing whitespace.
///
/// `"Disclosing Party"` and `"DisclosingParty"` name the same placeholder.
pub fn placeholder_key(name: &str) -> String {
    name.split_whitespace().collect()
}

/// Mapping from placeholder name to bound text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartyRoleMap {
    #[serde(default)]
    bindings: BTreeMap<String, RoleBinding>,
    /// Per-party bindings, in party order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parties: Vec<PartyRoleMap>,
}

impl PartyRoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `binding`, replacing any previous binding.
    pub fn insert(&mut self, name: &str, binding: RoleBinding) {
        self.bindings.insert(placeholder_key(name), binding);
    }

    pub fn with(mut self, name: &str, binding: RoleBinding) -> Self {
        self.insert(name, binding);
        self
    }

    pub fn with_singular(self, name: &str, text: impl Into<String>) -> Self {
        self.with(name, RoleBinding::singular(text))
    }

    pub fn with_plural(self, name: &str, text: impl Into<String>) -> Self {
        self.with(name, RoleBinding::plural(text))
    }

    pub fn get(&self, name: &str) -> Option<&RoleBinding> {
        self.bindings.get(&placeholder_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<RoleBinding> {
        self.bindings.remove(&placeholder_key(name))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleBinding)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Append the bindings of one more party.
    pub fn push_party(&mut self, party: PartyRoleMap) {
        self.parties.push(party);
    }

    pub fn with_party(mut self, party: PartyRoleMap) -> Self {
        self.push_party(party);
        self
    }

    /// Per-party bindings, in party order.
    pub fn parties(&self) -> &[PartyRoleMap] {
        &self.parties
    }

    /// The shared bindings overlaid with the bindings of one party.
    ///
    /// The result has no per-party bindings of its own.
    pub fn for_party(&self, party: &PartyRoleMap) -> PartyRoleMap {
        let mut bindings = self.bindings.clone();
        bindings.extend(party.bindings.iter().map(|(k, v)| (k.clone(), v.clone())));
        PartyRoleMap {
            bindings,
            parties: Vec::new(),
        }
    }

    /// Build the party role bindings for `config` from a party list.
    ///
    /// Unilateral agreements need exactly one disclosing party; the party
    /// count must match the configuration. Two-party unilateral agreements
    /// bind the roles to the party names; otherwise the roles bind to the
    /// defined terms, with the receiving side plural for multi-party
    /// agreements. `Representatives` and `Affiliates` get their defined-term
    /// defaults.
    ///
    /// Every party also gets its own bindings: `PartyName`, `PartyDetails`
    /// (the description from [`PartyDetails`], empty when none is given),
    /// `PartyRole` (how the agreement refers to the party, empty when it is
    /// referred to by name only) and `Signatory`.
    pub fn for_parties(config: &AgreementConfiguration, parties: &[Party]) -> AssemblyResult<Self> {
        if !config.party_count.admits(parties.len()) {
            return Err(AssemblyError::InvalidParties(format!(
                "{} parties given for a {}-party agreement",
                parties.len(),
                config.party_count
            )));
        }
        if let Some(party) = parties.iter().find(|p| p.name.trim().is_empty()) {
            return Err(AssemblyError::InvalidParties(format!(
                "party with role {:?} has no name",
                party.role
            )));
        }

        let mut map = PartyRoleMap::new();
        match config.directionality {
            Directionality::Unilateral => {
                let disclosing: Vec<&Party> =
                    parties.iter().filter(|p| p.role == PartyRole::Disclosing).collect();
                if disclosing.len() != 1 {
                    return Err(AssemblyError::InvalidParties(
                        "unilateral agreements must have exactly one disclosing party".to_string(),
                    ));
                }
                if let Some(party) = parties.iter().find(|p| p.role == PartyRole::Mutual) {
                    return Err(AssemblyError::InvalidParties(format!(
                        "party `{}` has a mutual role in a unilateral agreement",
                        party.name
                    )));
                }
                map.insert("DisclosingParty", RoleBinding::singular(disclosing[0].name.clone()));

                match config.party_count {
                    PartyCount::Two => {
                        let receiving = parties
                            .iter()
                            .find(|p| p.role == PartyRole::Receiving)
                            .ok_or_else(|| {
                                AssemblyError::InvalidParties("no receiving party".to_string())
                            })?;
                        map.insert("ReceivingParty", RoleBinding::singular(receiving.name.clone()));
                    }
                    PartyCount::Many => {
                        map.insert("ReceivingParty", RoleBinding::plural("the Receiving Parties"));
                    }
                }
            }
            Directionality::Mutual => {
                map.insert("DisclosingParty", RoleBinding::singular("the Disclosing Party"));
                let receiving = match config.party_count {
                    PartyCount::Two => RoleBinding::singular("the Receiving Party"),
                    PartyCount::Many => RoleBinding::plural("the Receiving Parties"),
                };
                map.insert("ReceivingParty", receiving);
            }
        }

        map.insert("Representatives", RoleBinding::plural("Representatives"));
        map.insert("Affiliates", RoleBinding::plural("Affiliates"));

        for party in parties {
            let details = party.details.as_ref().map(PartyDetails::description).unwrap_or_default();
            map.push_party(
                PartyRoleMap::new()
                    .with_singular("PartyName", party.name.clone())
                    .with_singular("PartyDetails", details)
                    .with_singular("PartyRole", role_phrase(config, party.role))
                    .with_singular("Signatory", party.signatory()),
            );
        }
        Ok(map)
    }
}

/// How the parties clause introduces a party, with a leading space.
fn role_phrase(config: &AgreementConfiguration, role: PartyRole) -> &'static str {
    match (config.directionality, config.party_count, role) {
        (Directionality::Unilateral, _, PartyRole::Disclosing) => " (the \"Disclosing Party\")",
        (Directionality::Unilateral, PartyCount::Two, PartyRole::Receiving) => " (the \"Receiving Party\")",
        (Directionality::Unilateral, PartyCount::Many, PartyRole::Receiving) => " (a receiving party)",
        _ => "",
    }
}

/// Role of a party with respect to confidential information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Disclosing,
    Receiving,
    /// Both discloses and receives.
    Mutual,
}

/// Identifying details of a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PartyDetails {
    /// A company or other legal entity, signing through a representative.
    LegalEntity {
        company_type: String,
        jurisdiction: String,
        address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        registration_number: Option<String>,
        signatory: String,
    },
    /// An individual, signing in person.
    NaturalPerson {
        address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_of_birth: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        place_of_birth: Option<String>,
    },
}

impl PartyDetails {
    /// Description following the party name, with a leading comma.
    ///
    /// ```
    /// use layered_agreements::PartyDetails;
    ///
    /// let person = PartyDetails::NaturalPerson {
    ///     address: "Keizersgracht 1, Amsterdam".to_string(),
    ///     date_of_birth: Some("1 May 1980".to_string()),
    ///     place_of_birth: None,
    /// };
    /// assert_eq!(person.description(), ", born on 1 May 1980, residing at Keizersgracht 1, Amsterdam");
    /// ```
    pub fn description(&self) -> String {
        match self {
            PartyDetails::LegalEntity {
                company_type,
                jurisdiction,
                address,
                registration_number,
                signatory,
            } => {
                let registered = registration_number
                    .as_ref()
                    .map(|n| format!(", registered under number {}", n))
                    .unwrap_or_default();
                format!(
                    ", a {} organised under the laws of {}, having its registered office at {}{}, duly represented by {}",
                    company_type, jurisdiction, address, registered, signatory
                )
            }
            PartyDetails::NaturalPerson {
                address,
                date_of_birth,
                place_of_birth,
            } => {
                let born = match (date_of_birth, place_of_birth) {
                    (Some(date), Some(place)) => format!(", born on {} in {}", date, place),
                    (Some(date), None) => format!(", born on {}", date),
                    (None, Some(place)) => format!(", born in {}", place),
                    (None, None) => String::new(),
                };
                format!("{}, residing at {}", born, address)
            }
        }
    }
}

/// A party to the agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub role: PartyRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PartyDetails>,
}

impl Party {
    pub fn new(name: impl Into<String>, role: PartyRole) -> Self {
        Self {
            name: name.into(),
            role,
            details: None,
        }
    }

    pub fn with_details(mut self, details: PartyDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Who signs for the party: a legal entity's representative, otherwise
    /// the party itself.
    pub fn signatory(&self) -> String {
        match &self.details {
            Some(PartyDetails::LegalEntity { signatory, .. }) => signatory.clone(),
            _ => self.name.clone(),
        }
    }
}
