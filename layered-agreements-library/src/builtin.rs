//! The bundled non-disclosure agreement library.
//!
//! Covers unilateral and mutual agreements between two or more parties.
//! Every variant has a `term` slot (`unlimited` by default, or `limited`)
//! and an `enforcement` slot (`remedies` by default, or `penalties`).
//! Unilateral variants add a clause on information of the receiving side.
//! Every document opens with an unnumbered list of the parties and closes
//! with a signature block, one entry per party.
//!
//! Placeholders used by the bundled clauses:
//!
//! | Name | Needed for |
//! |------|------------|
//! | `DisclosingParty`, `ReceivingParty` | every variant |
//! | `Purpose`, `GoverningLaw`, `Jurisdiction` | every variant |
//! | `TermDuration` | `term = limited` |
//! | `InitialPenalty`, `SubsequentPenalty` | `enforcement = penalties` |
//! | `PartyName`, `PartyDetails`, `PartyRole`, `Signatory` | per party, from [`PartyRoleMap::for_parties`] |
//!
//! [`PartyRoleMap::for_parties`]: layered_agreements::PartyRoleMap::for_parties

use std::path::{Path, PathBuf};

use crate::errors::LibraryResult;
use crate::loader::{EmbeddedSource, LibraryLoader, LoadedLibrary};

macro_rules! library_file {
    ($path:literal) => {
        ($path, include_str!(concat!("../library/", $path)))
    };
}

const FILES: &[(&str, &str)] = &[
    library_file!("library.toml"),
    library_file!("nondisclosure/parties-unilateral.json"),
    library_file!("nondisclosure/parties-mutual.json"),
    library_file!("nondisclosure/definitions.json"),
    library_file!("nondisclosure/exclusions.json"),
    library_file!("nondisclosure/reciprocity.json"),
    library_file!("nondisclosure/nonuse-and-nondisclosure.json"),
    library_file!("nondisclosure/use-and-treatment.json"),
    library_file!("nondisclosure/data-privacy.json"),
    library_file!("nondisclosure/rights-to-information.json"),
    library_file!("nondisclosure/return-or-destruction.json"),
    library_file!("nondisclosure/third-party-stipulation.json"),
    library_file!("nondisclosure/term-limited.json"),
    library_file!("nondisclosure/term-unlimited.json"),
    library_file!("nondisclosure/enforcement-remedies.json"),
    library_file!("nondisclosure/enforcement-penalties.json"),
    library_file!("nondisclosure/information-receiving-party.json"),
    library_file!("nondisclosure/no-warranty.json"),
    library_file!("nondisclosure/miscellaneous.json"),
    library_file!("nondisclosure/signatures.json"),
];

/// The bundled library files, compiled into the binary.
pub fn source() -> EmbeddedSource {
    EmbeddedSource::new(FILES)
}

/// Load the bundled non-disclosure library.
pub fn nondisclosure() -> LibraryResult<LoadedLibrary> {
    LibraryLoader::new(source()).load()
}

/// Directory holding the bundled library files on disk.
pub fn library_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("library")
}
