//! Factory-scoped cache of aggregated bean metadata.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::aggregator::BeanMetaDataBuilder;
use super::elements::ConstrainedElementBuilder;
use crate::metadata::{
    domain::{BeanConfiguration, BeanMetaData},
    error::DefinitionResult,
    ports::DeclarationFeed,
};
use crate::model::{TypeName, TypeSystem};

/// Builds and caches [`BeanMetaData`] per validated type.
///
/// Configurations are read from the declaration feed at most once per
/// declaring type. Concurrent first accesses may build the same metadata
/// twice; the first one stored is kept and returned to every caller.
pub struct BeanMetaDataManager {
    type_system: Arc<TypeSystem>,
    feed: Arc<dyn DeclarationFeed>,
    elements: ConstrainedElementBuilder,
    configurations: DashMap<TypeName, Option<Arc<BeanConfiguration>>>,
    metadata: DashMap<TypeName, Arc<BeanMetaData>>,
}

impl BeanMetaDataManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new(
        type_system: Arc<TypeSystem>,
        feed: Arc<dyn DeclarationFeed>,
        elements: ConstrainedElementBuilder,
    ) -> Self {
        Self {
            type_system,
            feed,
            elements,
            configurations: DashMap::new(),
            metadata: DashMap::new(),
        }
    }

    /// Returns the type system.
    #[must_use]
    pub const fn type_system(&self) -> &Arc<TypeSystem> {
        &self.type_system
    }

    /// Returns the aggregated metadata of `bean_type`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::metadata::DefinitionError`] when a declaration of
    /// the hierarchy is invalid or the feed fails.
    pub fn get(&self, bean_type: &TypeName) -> DefinitionResult<Arc<BeanMetaData>> {
        if let Some(cached) = self.metadata.get(bean_type) {
            return Ok(Arc::clone(cached.value()));
        }
        let built = Arc::new(self.build(bean_type)?);
        debug!(bean = %bean_type, "built bean metadata");
        Ok(Arc::clone(
            self.metadata
                .entry(bean_type.clone())
                .or_insert(built)
                .value(),
        ))
    }

    /// Returns `true` when the metadata of `bean_type` is cached.
    #[must_use]
    pub fn is_cached(&self, bean_type: &TypeName) -> bool {
        self.metadata.contains_key(bean_type)
    }

    /// Drops every cached configuration and metadata.
    pub fn clear(&self) {
        self.configurations.clear();
        self.metadata.clear();
    }

    fn build(&self, bean_type: &TypeName) -> DefinitionResult<BeanMetaData> {
        let mut builder = BeanMetaDataBuilder::new(bean_type.clone(), &self.type_system);
        for declaring in self.type_system.hierarchy(bean_type) {
            if let Some(configuration) = self.configuration(&declaring)? {
                builder.add(&configuration);
            }
        }
        builder.build()
    }

    fn configuration(&self, declaring: &TypeName) -> DefinitionResult<Option<Arc<BeanConfiguration>>> {
        if let Some(cached) = self.configurations.get(declaring) {
            return Ok(cached.value().clone());
        }
        let configuration = match self.feed.declarations(declaring)? {
            Some(declaration) => Some(Arc::new(self.elements.configure(&declaration)?)),
            None => None,
        };
        Ok(self
            .configurations
            .entry(declaring.clone())
            .or_insert(configuration)
            .value()
            .clone())
    }
}

impl std::fmt::Debug for BeanMetaDataManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanMetaDataManager")
            .field("configurations", &self.configurations.len())
            .field("metadata", &self.metadata.len())
            .finish_non_exhaustive()
    }
}
