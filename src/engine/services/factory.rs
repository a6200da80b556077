//! Assembly of validator factories from their collaborators.

use super::executor::ConstraintTreeExecutor;
use super::order::ValidationOrderGenerator;
use super::units::CheckingUnitRegistry;
use super::validator::{Collaborators, Validator};
use crate::engine::{
    adapters::{SharedClock, TemplateInterpolator, TraverseAll},
    config::ValidatorConfig,
    error::ValidationResult,
    ports::{CheckingUnit, MessageInterpolator, TraversableResolver},
};
use crate::extraction::{ExtractorDeclaration, ValueExtractorRegistry};
use crate::metadata::{
    BeanDeclaration, BeanMetaDataManager, ConstrainedElementBuilder, ConstraintCatalog,
    ConstraintDefinition, ConstraintDescriptorFactory, DeclarationFeed, FeedResult,
    InMemoryDeclarationFeed, JsonMappingFeed,
};
use crate::model::{TypeDecl, TypeName, TypeSystem};
use mockable::DefaultClock;
use std::sync::Arc;
use tracing::debug;

/// Owns the caches shared by its validators: bean metadata, resolved
/// extractors, flattened group sequences and initialised checking units.
///
/// Dropping the factory drops every cache.
#[derive(Debug, Clone)]
pub struct ValidatorFactory {
    inner: Arc<Collaborators>,
    config: ValidatorConfig,
}

impl ValidatorFactory {
    /// Starts building a factory.
    #[must_use]
    pub fn builder() -> ValidatorFactoryBuilder {
        ValidatorFactoryBuilder::default()
    }

    /// Returns a validator using the factory configuration.
    #[must_use]
    pub fn validator(&self) -> Validator {
        Validator::new(Arc::clone(&self.inner), self.config)
    }

    /// Returns a validator sharing the factory caches with its own configuration.
    #[must_use]
    pub fn validator_with_config(&self, config: ValidatorConfig) -> Validator {
        Validator::new(Arc::clone(&self.inner), config)
    }

    /// Returns the factory configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Returns `true` when the metadata of `bean_type` has been built.
    #[must_use]
    pub fn is_cached(&self, bean_type: &TypeName) -> bool {
        self.inner.metadata.is_cached(bean_type)
    }
}

/// Collects the collaborators of a [`ValidatorFactory`].
///
/// Types, constraint definitions, extractors and checking units are
/// registered on top of the built-in ones. Declarations added with
/// [`ValidatorFactoryBuilder::with_declaration`] take precedence over an
/// external feed.
#[derive(Default)]
pub struct ValidatorFactoryBuilder {
    types: Vec<TypeDecl>,
    definitions: Vec<ConstraintDefinition>,
    extractors: Vec<ExtractorDeclaration>,
    units: Vec<CheckingUnit>,
    declarations: Vec<BeanDeclaration>,
    feed: Option<Arc<dyn DeclarationFeed>>,
    interpolator: Option<Arc<dyn MessageInterpolator>>,
    traversable: Option<Arc<dyn TraversableResolver>>,
    clock: Option<SharedClock>,
    config: ValidatorConfig,
}

impl ValidatorFactoryBuilder {
    /// Registers a type.
    #[must_use]
    pub fn with_type(mut self, declaration: TypeDecl) -> Self {
        self.types.push(declaration);
        self
    }

    /// Registers several types.
    #[must_use]
    pub fn with_types(mut self, declarations: impl IntoIterator<Item = TypeDecl>) -> Self {
        self.types.extend(declarations);
        self
    }

    /// Registers a user-defined constraint.
    #[must_use]
    pub fn with_constraint(mut self, definition: ConstraintDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Registers a value extractor.
    #[must_use]
    pub fn with_extractor(mut self, declaration: ExtractorDeclaration) -> Self {
        self.extractors.push(declaration);
        self
    }

    /// Registers a checking unit.
    #[must_use]
    pub fn with_checking_unit(mut self, unit: CheckingUnit) -> Self {
        self.units.push(unit);
        self
    }

    /// Adds the declarations of one bean type.
    #[must_use]
    pub fn with_declaration(mut self, declaration: BeanDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Adds the declarations of several bean types.
    #[must_use]
    pub fn with_declarations(mut self, declarations: impl IntoIterator<Item = BeanDeclaration>) -> Self {
        self.declarations.extend(declarations);
        self
    }

    /// Reads declarations from an external feed.
    #[must_use]
    pub fn with_feed(mut self, feed: Arc<dyn DeclarationFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Uses a JSON mapping: its types, constraint definitions and bean
    /// declarations.
    #[must_use]
    pub fn with_mapping(mut self, mapping: JsonMappingFeed) -> Self {
        self.types.extend_from_slice(mapping.type_declarations());
        self.definitions
            .extend_from_slice(mapping.constraint_definitions());
        self.feed = Some(Arc::new(mapping));
        self
    }

    /// Replaces the message interpolator.
    #[must_use]
    pub fn with_interpolator(mut self, interpolator: Arc<dyn MessageInterpolator>) -> Self {
        self.interpolator = Some(interpolator);
        self
    }

    /// Replaces the traversable resolver.
    #[must_use]
    pub fn with_traversable_resolver(mut self, resolver: Arc<dyn TraversableResolver>) -> Self {
        self.traversable = Some(resolver);
        self
    }

    /// Replaces the clock used by temporal checking units.
    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the configuration of the factory's validators.
    #[must_use]
    pub const fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the factory.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::engine::ValidationError`] when a type, constraint
    /// definition, extractor, checking unit or declaration is rejected.
    pub fn build(self) -> ValidationResult<ValidatorFactory> {
        let mut types = TypeSystem::new();
        for declaration in self.types {
            types.register(declaration)?;
        }
        let type_system = Arc::new(types);

        let catalog = ConstraintCatalog::with_definitions(self.definitions)?;

        let mut registry = ValueExtractorRegistry::new(Arc::clone(&type_system))?;
        for declaration in self.extractors {
            registry.register(declaration)?;
        }
        let extractors = Arc::new(registry);

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(DefaultClock) as SharedClock);
        let mut units = CheckingUnitRegistry::new(Arc::clone(&type_system), &clock);
        for unit in self.units {
            units.register(unit)?;
        }

        let local = InMemoryDeclarationFeed::with_declarations(self.declarations)?;
        let feed: Arc<dyn DeclarationFeed> = match self.feed {
            Some(external) => Arc::new(LayeredFeed { local, external }),
            None => Arc::new(local),
        };
        let descriptors = Arc::new(ConstraintDescriptorFactory::new(Arc::new(catalog)));
        let elements = ConstrainedElementBuilder::new(
            Arc::clone(&type_system),
            descriptors,
            Arc::clone(&extractors),
        );
        let metadata = BeanMetaDataManager::new(Arc::clone(&type_system), feed, elements);

        let inner = Collaborators {
            order: ValidationOrderGenerator::new(Arc::clone(&type_system)),
            type_system,
            metadata,
            extractors,
            executor: ConstraintTreeExecutor::new(Arc::new(units)),
            interpolator: self
                .interpolator
                .unwrap_or_else(|| Arc::new(TemplateInterpolator::new())),
            traversable: self.traversable.unwrap_or_else(|| Arc::new(TraverseAll)),
        };
        debug!(config = ?self.config, "built validator factory");
        Ok(ValidatorFactory {
            inner: Arc::new(inner),
            config: self.config,
        })
    }
}

impl std::fmt::Debug for ValidatorFactoryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorFactoryBuilder")
            .field("types", &self.types.len())
            .field("definitions", &self.definitions.len())
            .field("extractors", &self.extractors.len())
            .field("units", &self.units.len())
            .field("declarations", &self.declarations.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Declarations supplied in code, falling back to an external feed.
struct LayeredFeed {
    local: InMemoryDeclarationFeed,
    external: Arc<dyn DeclarationFeed>,
}

impl DeclarationFeed for LayeredFeed {
    fn declarations(&self, bean_type: &TypeName) -> FeedResult<Option<BeanDeclaration>> {
        match self.local.declarations(bean_type)? {
            Some(declaration) => Ok(Some(declaration)),
            None => self.external.declarations(bean_type),
        }
    }
}
