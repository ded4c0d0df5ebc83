//! Clause libraries for layered-agreements.
//!
//! A library is a `library.toml` manifest plus one JSON clause-definition
//! file per fragment. This crate provides:
//!
//! - [`LibraryManifest`] - The manifest schema
//! - [`LibraryLoader`] - Loads a library from a [`FragmentSource`]
//! - [`DirectorySource`] and [`EmbeddedSource`] - On-disk and compiled-in sources
//! - [`builtin::nondisclosure`] - The bundled non-disclosure agreement library
//!
//! ## Example
//!
//! ```
//! use layered_agreements::{AgreementConfiguration, Directionality, PartyCount, PartyRoleMap, RenderFormat};
//!
//! let engine = layered_agreements_library::builtin::nondisclosure().unwrap().into_engine();
//! let config = AgreementConfiguration::nondisclosure(Directionality::Mutual, PartyCount::Two);
//! let roles = PartyRoleMap::new()
//!     .with_singular("DisclosingParty", "the Disclosing Party")
//!     .with_singular("ReceivingParty", "the Receiving Party")
//!     .with_singular("Purpose", "evaluating a joint venture")
//!     .with_singular("GoverningLaw", "the Netherlands")
//!     .with_singular("Jurisdiction", "Amsterdam");
//!
//! let html = engine.render(&config, &roles, RenderFormat::Html).unwrap();
//! assert!(html.starts_with("<article>"));
//! ```

pub mod builtin;
mod errors;
mod loader;
mod manifest;

pub use errors::{LibraryError, LibraryResult};
pub use loader::{
    load_directory, DirectorySource, EmbeddedSource, FragmentSource, LibraryLoader, LoadedLibrary, MANIFEST_FILE,
};
pub use manifest::{FamilyManifest, LibraryManifest, VariantManifest};
