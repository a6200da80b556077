//! Registry of value extractors and maximally-specific resolution.

use crate::extraction::{
    adapters::builtin_declarations,
    domain::{ExtractorDeclaration, ValueExtractorDescriptor},
    error::{ExtractionError, ExtractionResult},
};
use crate::model::{ContainerContent, TypeName, TypeSystem, Value, well_known};
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ExtractorKey {
    container: TypeName,
    type_argument: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ResolutionKey {
    Slot {
        declared: TypeName,
        type_argument: usize,
        runtime: TypeName,
    },
    AllElements(TypeName),
}

/// Registry mapping container type arguments to value extractors.
///
/// Resolution keeps every extractor whose container type is assignable
/// from the runtime type and whose extracted type argument is bound to the
/// requested slot, then retains the maximally specific ones. Several
/// maximal candidates are an error unless they share a declaration origin.
/// Resolved extractors are cached per (declared type, slot, runtime type).
#[derive(Debug)]
pub struct ValueExtractorRegistry {
    type_system: Arc<TypeSystem>,
    descriptors: BTreeMap<ExtractorKey, Arc<ValueExtractorDescriptor>>,
    resolved: DashMap<ResolutionKey, Option<Arc<ValueExtractorDescriptor>>>,
}

impl ValueExtractorRegistry {
    /// Creates a registry holding the built-in extractors.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the type system redefines a
    /// built-in container with incompatible type parameters.
    pub fn new(type_system: Arc<TypeSystem>) -> ExtractionResult<Self> {
        let mut registry = Self::empty(type_system);
        for declaration in builtin_declarations() {
            let descriptor =
                ValueExtractorDescriptor::from_declaration(declaration, &registry.type_system)?
                    .into_builtin();
            registry.insert(descriptor);
        }
        Ok(registry)
    }

    /// Creates a registry without any extractor.
    #[must_use]
    pub fn empty(type_system: Arc<TypeSystem>) -> Self {
        Self {
            type_system,
            descriptors: BTreeMap::new(),
            resolved: DashMap::new(),
        }
    }

    /// Registers a user extractor.
    ///
    /// A user extractor replaces a built-in one for the same container slot.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the declaration is invalid or another
    /// user extractor already targets the same slot.
    pub fn register(&mut self, declaration: ExtractorDeclaration) -> ExtractionResult<()> {
        let descriptor = ValueExtractorDescriptor::from_declaration(declaration, &self.type_system)?;
        let key = ExtractorKey {
            container: descriptor.container().clone(),
            type_argument: descriptor.type_argument(),
        };
        if let Some(existing) = self.descriptors.get(&key) {
            if !existing.is_builtin() {
                return Err(ExtractionError::DuplicateExtractor {
                    container: key.container,
                    type_argument: key.type_argument,
                });
            }
            debug!(
                extractor = descriptor.name(),
                replaced = existing.name(),
                "replacing built-in value extractor"
            );
        }
        self.insert(descriptor);
        Ok(())
    }

    fn insert(&mut self, descriptor: ValueExtractorDescriptor) {
        let key = ExtractorKey {
            container: descriptor.container().clone(),
            type_argument: descriptor.type_argument(),
        };
        self.descriptors.insert(key, Arc::new(descriptor));
        self.resolved.clear();
    }

    /// Returns the type system the registry resolves against.
    #[must_use]
    pub const fn type_system(&self) -> &Arc<TypeSystem> {
        &self.type_system
    }

    /// Returns every registered extractor.
    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<ValueExtractorDescriptor>> {
        self.descriptors.values()
    }

    /// Resolves the extractor for type argument `type_argument` of the
    /// `declared` container type, given the value's `runtime` type.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Ambiguous`] when several unrelated
    /// extractors are maximally specific.
    pub fn resolve(
        &self,
        declared: &TypeName,
        type_argument: usize,
        runtime: &TypeName,
    ) -> ExtractionResult<Option<Arc<ValueExtractorDescriptor>>> {
        let key = ResolutionKey::Slot {
            declared: declared.clone(),
            type_argument,
            runtime: runtime.clone(),
        };
        if let Some(cached) = self.resolved.get(&key) {
            return Ok(cached.value().clone());
        }
        let candidates = self
            .descriptors
            .values()
            .filter(|descriptor| {
                self.type_system.is_assignable(descriptor.container(), runtime)
                    && self.binds_slot(descriptor, declared, type_argument)
            })
            .cloned()
            .collect::<Vec<_>>();
        let chosen = self.choose(&candidates, runtime)?;
        Ok(self.resolved.entry(key).or_insert(chosen).value().clone())
    }

    /// Resolves the extractor used to cascade into every element of a
    /// container whose declaration does not name a type argument.
    ///
    /// Maps cascade into their values.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Ambiguous`] when several unrelated
    /// extractors are maximally specific.
    pub fn resolve_all_elements(
        &self,
        runtime: &TypeName,
    ) -> ExtractionResult<Option<Arc<ValueExtractorDescriptor>>> {
        let map = TypeName::new(well_known::MAP);
        if self.type_system.is_assignable(&map, runtime) {
            return self.resolve(&map, 1, runtime);
        }
        let key = ResolutionKey::AllElements(runtime.clone());
        if let Some(cached) = self.resolved.get(&key) {
            return Ok(cached.value().clone());
        }
        let candidates = self
            .descriptors
            .values()
            .filter(|descriptor| self.type_system.is_assignable(descriptor.container(), runtime))
            .cloned()
            .collect::<Vec<_>>();
        let chosen = self.choose(&candidates, runtime)?;
        Ok(self.resolved.entry(key).or_insert(chosen).value().clone())
    }

    /// Resolves the extractor for a concrete value, falling back to the
    /// built-in handling of the value's storage shape when no registered
    /// extractor matches.
    ///
    /// # Errors
    ///
    /// Propagates ambiguity errors from resolution.
    pub fn resolve_for_value(
        &self,
        declared: Option<(&TypeName, usize)>,
        value: &Value,
    ) -> ExtractionResult<Option<Arc<ValueExtractorDescriptor>>> {
        let Some(runtime) = value.runtime_type() else {
            return Ok(None);
        };
        let resolved = match declared {
            Some((declared_type, type_argument)) => {
                self.resolve(declared_type, type_argument, &runtime)?
            }
            None => self.resolve_all_elements(&runtime)?,
        };
        if resolved.is_some() {
            return Ok(resolved);
        }
        let slot = declared.map(|(_, type_argument)| type_argument);
        Ok(value
            .as_container()
            .and_then(|container| self.fallback(container.content(), slot)))
    }

    fn fallback(
        &self,
        content: &ContainerContent,
        slot: Option<usize>,
    ) -> Option<Arc<ValueExtractorDescriptor>> {
        let (container, type_argument) = match content {
            ContainerContent::Sequence(_) => (well_known::ITERABLE, 0),
            ContainerContent::Entries(_) if slot == Some(0) => (well_known::MAP, 0),
            ContainerContent::Entries(_) => (well_known::MAP, 1),
            ContainerContent::Single(_) => (well_known::OPTIONAL, 0),
        };
        self.descriptors
            .get(&ExtractorKey {
                container: TypeName::new(container),
                type_argument,
            })
            .cloned()
    }

    fn binds_slot(
        &self,
        descriptor: &ValueExtractorDescriptor,
        declared: &TypeName,
        type_argument: usize,
    ) -> bool {
        if let Some(bindings) = self
            .type_system
            .ancestor_bindings(declared, descriptor.container())
        {
            return bindings.get(descriptor.type_argument()) == Some(&Some(type_argument));
        }
        if let Some(bindings) = self
            .type_system
            .ancestor_bindings(descriptor.container(), declared)
        {
            return bindings.get(type_argument) == Some(&Some(descriptor.type_argument()));
        }
        false
    }

    fn choose(
        &self,
        candidates: &[Arc<ValueExtractorDescriptor>],
        runtime: &TypeName,
    ) -> ExtractionResult<Option<Arc<ValueExtractorDescriptor>>> {
        let maximal = candidates
            .iter()
            .filter(|candidate| {
                !candidates.iter().any(|other| {
                    self.type_system
                        .is_proper_subtype(candidate.container(), other.container())
                })
            })
            .cloned()
            .collect::<Vec<_>>();
        let origins = maximal
            .iter()
            .map(|descriptor| descriptor.origin())
            .collect::<BTreeSet<_>>();
        if origins.len() > 1 {
            return Err(ExtractionError::ambiguous(
                runtime.clone(),
                maximal.iter().map(|descriptor| descriptor.name().to_owned()),
            ));
        }
        Ok(maximal.into_iter().next())
    }
}
