//! The agreement engine facade.
//!
//! Runs the full pipeline for one request:
//!
//! ```text
//! select -> load -> substitute -> compose -> render
//! ```
//!
//! Each request is an independent computation over the shared, read-only
//! store. It either produces a complete output or fails with a single
//! [`AssemblyError`].

use std::sync::Arc;

use crate::clause::NodePath;
use crate::composer::DocumentComposer;
use crate::config::EngineConfig;
use crate::configuration::AgreementConfiguration;
use crate::document::ComposedDocument;
use crate::errors::{AssemblyError, AssemblyResult};
use crate::render::{render_with, RenderFormat};
use crate::roles::PartyRoleMap;
use crate::store::ClauseStore;
use crate::substitution::TermSubstitution;
use crate::variant::{FragmentId, VariantSelector};

pub struct AgreementEngine<S> {
    store: Arc<S>,
    config: EngineConfig,
}

impl<S> Clone for AgreementEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: ClauseStore> AgreementEngine<S> {
    pub fn new(store: S) -> Self {
        Self::shared(Arc::new(store))
    }

    /// Use a store that is already shared elsewhere.
    pub fn shared(store: Arc<S>) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every supported configuration, with slots at their defaults.
    pub fn list_configurations(&self) -> Vec<AgreementConfiguration> {
        VariantSelector::new(self.store.variant_index()).configurations()
    }

    pub fn select(&self, config: &AgreementConfiguration) -> AssemblyResult<Vec<FragmentId>> {
        VariantSelector::new(self.store.variant_index()).select(config)
    }

    /// Select, substitute and compose the document for `config`.
    pub fn compose(&self, config: &AgreementConfiguration, roles: &PartyRoleMap) -> AssemblyResult<ComposedDocument> {
        let ids = self.select(config)?;
        let library = self.store.load_fragments(&config.agreement)?;

        let templates = ids
            .iter()
            .map(|id| {
                library
                    .get(id)
                    .map(|template| (id, template))
                    .ok_or_else(|| AssemblyError::MissingFragment {
                        agreement: config.agreement.to_string(),
                        fragment: id.clone(),
                    })
            })
            .collect::<AssemblyResult<Vec<_>>>()?;

        let substitution = TermSubstitution::new(roles, self.store.inflections());
        let fragments = templates
            .into_iter()
            .map(|(id, template)| substitution.substitute(template, &NodePath::fragment(id.clone())))
            .collect::<AssemblyResult<Vec<_>>>()?;

        let mut composer = DocumentComposer::new(self.config.numbering.clone());
        if let Some(title) = self.store.title(&config.agreement) {
            composer = composer.with_title(title);
        }
        let doc = composer.compose(&fragments)?;

        tracing::debug!(
            configuration = %config,
            fragments = fragments.len(),
            nodes = doc.nodes().len(),
            "composed agreement"
        );
        Ok(doc)
    }

    /// Compose the document for `config` and render it as `format`.
    pub fn render(
        &self,
        config: &AgreementConfiguration,
        roles: &PartyRoleMap,
        format: RenderFormat,
    ) -> AssemblyResult<String> {
        let doc = self.compose(config, roles)?;
        render_with(&doc, format, &self.config)
    }
}
