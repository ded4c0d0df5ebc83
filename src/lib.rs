#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-agreements/issues/"
)]

//! Clause-tree composition and rendering for legal agreements.
//!
//! Agreements are assembled from reusable clause fragments held by a
//! [`ClauseStore`]. One request runs through four stages:
//!
//! - [`VariantSelector`] - Picks the ordered fragment set for an [`AgreementConfiguration`]
//! - [`TermSubstitution`] - Replaces `{{Role}}`, `{{Role's}}` and `[[Role: one | many]]` tokens
//! - [`DocumentComposer`] - Numbers the merged tree, resolves `<<anchor>>` references and indexes defined terms
//! - [`Renderer`] - Writes plain text, HTML or JSON
//!
//! [`AgreementEngine`] wires the stages together over a shared store.
//!
//! ## Example
//!
//! ```
//! use layered_agreements::{
//!     AgreementConfiguration, AgreementEngine, AgreementType, ClauseNode, Directionality,
//!     FragmentLibrary, PartyCount, PartyRoleMap, RenderFormat,
//! };
//!
//! let nda = AgreementType::nondisclosure();
//! let mut library = FragmentLibrary::new();
//! library
//!     .insert_fragment(
//!         &nda,
//!         ClauseNode::text("{{ReceivingParty}} shall keep {{DisclosingParty's}} secrets.")
//!             .with_anchor("secrecy")
//!             .with_heading("Secrecy"),
//!     )
//!     .unwrap();
//! library
//!     .register_variant(&nda, Directionality::Unilateral, PartyCount::Two, &["secrecy"])
//!     .unwrap();
//!
//! let engine = AgreementEngine::new(library);
//! let roles = PartyRoleMap::new()
//!     .with_singular("DisclosingParty", "Acme Corp")
//!     .with_singular("ReceivingParty", "Jane Doe");
//! let config = AgreementConfiguration::nondisclosure(Directionality::Unilateral, PartyCount::Two);
//!
//! let text = engine.render(&config, &roles, RenderFormat::PlainText).unwrap();
//! assert_eq!(text, "1. Secrecy\n    Jane Doe shall keep Acme Corp's secrets.\n");
//! ```

mod clause;
mod composer;
mod config;
mod configuration;
mod document;
mod emphasis;
mod engine;
mod errors;
mod inflection;
mod numbering;
mod roles;
mod store;
mod substitution;
mod variant;

pub mod render;

pub use clause::{parse_fragment, ClauseNode, FragmentDocument, NodePath, ParagraphDocument, Placement};
pub use composer::{compose, DocumentComposer};
pub use config::EngineConfig;
pub use configuration::{AgreementConfiguration, AgreementType, Directionality, PartyCount};
pub use document::{ComposedDocument, ComposedNode, CrossReference, ReferenceTarget};
pub use emphasis::{parse_emphasis, plain_emphasis, strip_emphasis, EmphasisSpan, EmphasisStyle};
pub use engine::AgreementEngine;
pub use errors::{AssemblyError, AssemblyResult, ConfigError};
pub use inflection::{InflectionTable, Phrasing};
pub use numbering::{NumberPath, NumberStyle, NumberingScheme, ReferenceFormat};
pub use render::{render, render_with, HtmlRenderer, JsonRenderer, PlainTextOptions, PlainTextRenderer, RenderFormat, Renderer};
pub use roles::{placeholder_key, GrammaticalNumber, Party, PartyDetails, PartyRole, PartyRoleMap, RoleBinding};
pub use store::{ClauseStore, FragmentLibrary, FragmentMap};
pub use substitution::{required_placeholders, substitute, TermSubstitution};
pub use variant::{FragmentEntry, FragmentId, Slot, VariantEntry, VariantIndex, VariantSelector};
