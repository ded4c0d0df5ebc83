//! Clause library loading.
//!
//! A [`LibraryLoader`] reads `library.toml` and every clause-definition file
//! it lists from a [`FragmentSource`], then registers slots and fragment sets
//! with a [`FragmentLibrary`]. All checks run at load time so that a loaded
//! library is internally consistent.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use layered_agreements::{
    AgreementEngine, AssemblyError, EngineConfig, FragmentEntry, FragmentLibrary,
};

use crate::errors::{LibraryError, LibraryResult};
use crate::manifest::{FamilyManifest, LibraryManifest};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "library.toml";

/// Where library files come from.
pub trait FragmentSource {
    /// Read the file at `path`, relative to the library root.
    fn read(&self, path: &str) -> LibraryResult<String>;
}

/// Library files in a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FragmentSource for DirectorySource {
    fn read(&self, path: &str) -> LibraryResult<String> {
        let full = self.root.join(path);
        fs::read_to_string(&full).map_err(|e| LibraryError::Read {
            path: full.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Library files compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSource {
    files: BTreeMap<&'static str, &'static str>,
}

impl EmbeddedSource {
    pub fn new(files: &[(&'static str, &'static str)]) -> Self {
        Self {
            files: files.iter().copied().collect(),
        }
    }
}

impl FragmentSource for EmbeddedSource {
    fn read(&self, path: &str) -> LibraryResult<String> {
        self.files
            .get(path)
            .map(|content| content.to_string())
            .ok_or_else(|| LibraryError::Read {
                path: path.to_string(),
                message: "file is not embedded".to_string(),
            })
    }
}

/// A loaded library together with the engine configuration of its manifest.
#[derive(Debug, Clone)]
pub struct LoadedLibrary {
    pub library: FragmentLibrary,
    pub config: EngineConfig,
}

impl LoadedLibrary {
    /// Build an engine over this library using the manifest's configuration.
    pub fn into_engine(self) -> AgreementEngine<FragmentLibrary> {
        AgreementEngine::new(self.library).with_config(self.config)
    }
}

pub struct LibraryLoader<S> {
    source: S,
    manifest: String,
}

impl<S: FragmentSource> LibraryLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            manifest: MANIFEST_FILE.to_string(),
        }
    }

    /// Use a manifest other than `library.toml`.
    pub fn with_manifest(mut self, path: impl Into<String>) -> Self {
        self.manifest = path.into();
        self
    }

    pub fn load(&self) -> LibraryResult<LoadedLibrary> {
        let text = self.source.read(&self.manifest)?;
        let manifest = LibraryManifest::from_toml_str(&text, &self.manifest)?;

        let mut library = FragmentLibrary::new().with_inflections(&manifest.inflections);
        let mut fragment_count = 0;
        for family in &manifest.families {
            fragment_count += self.load_family(&mut library, family)?;
        }

        tracing::info!(
            manifest = %self.manifest,
            families = manifest.families.len(),
            fragments = fragment_count,
            "loaded clause library"
        );

        Ok(LoadedLibrary {
            library,
            config: manifest.engine,
        })
    }

    fn load_family(&self, library: &mut FragmentLibrary, family: &FamilyManifest) -> LibraryResult<usize> {
        let agreement = &family.agreement;
        if let Some(title) = &family.title {
            library.set_title(agreement, title.clone());
        }

        for (id, file) in &family.fragments {
            let path = family.fragment_path(file);
            let json = self.source.read(&path)?;
            library
                .insert_json(agreement, id, &json)
                .map_err(|source| LibraryError::Assembly { path, source })?;
        }

        let mut referenced = BTreeSet::new();
        for (name, slot) in &family.slots {
            for fragment in slot.choices.values() {
                self.check_listed(family, fragment, &format!("slot `{}`", name))?;
                referenced.insert(fragment.as_str());
            }
            library
                .register_slot(agreement, name, slot.clone())
                .map_err(|source| self.assembly(source))?;
        }

        for variant in &family.variants {
            let context = format!("{}/{}/{}", agreement, variant.directionality, variant.party_count);
            let entries: Vec<FragmentEntry> = variant.fragments.iter().map(|e| FragmentEntry::parse(e)).collect();
            for entry in &entries {
                if let FragmentEntry::Fragment(id) = entry {
                    self.check_listed(family, id, &context)?;
                    if let Some((listed, _)) = family.fragments.get_key_value(id.as_str()) {
                        referenced.insert(listed.as_str());
                    }
                }
            }
            library
                .variant_index_mut()
                .register(agreement, variant.directionality, variant.party_count, entries)
                .map_err(|source| self.assembly(source))?;
        }

        for id in family.fragments.keys() {
            if !referenced.contains(id.as_str()) {
                tracing::warn!(agreement = %agreement, fragment = %id, "fragment is not used by any variant");
            }
        }
        Ok(family.fragments.len())
    }

    fn check_listed(&self, family: &FamilyManifest, id: &str, context: &str) -> LibraryResult<()> {
        if family.fragments.contains_key(id) {
            Ok(())
        } else {
            Err(LibraryError::Manifest(format!(
                "{} of `{}` references unlisted fragment `{}`",
                context, family.agreement, id
            )))
        }
    }

    fn assembly(&self, source: AssemblyError) -> LibraryError {
        LibraryError::Assembly {
            path: self.manifest.clone(),
            source,
        }
    }
}

/// Load the library rooted at `dir` (containing `library.toml`).
pub fn load_directory(dir: &Path) -> LibraryResult<LoadedLibrary> {
    LibraryLoader::new(DirectorySource::new(dir)).load()
}
