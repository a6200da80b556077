//! Constraint metadata: definitions, declarations and aggregated bean metadata.
//!
//! Raw declarations come from a [`DeclarationFeed`]; constraint types are
//! resolved against a [`ConstraintDefinitionSource`]. Each declaring type is
//! turned into a [`BeanConfiguration`] once, and the configurations of a
//! type's hierarchy are merged into one cached [`BeanMetaData`].
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Feeds and the constraint catalogue in [`adapters`]
//! - Building and caching in [`services`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

pub use adapters::{ConstraintCatalog, InMemoryDeclarationFeed, JsonMappingFeed};
pub use domain::{
    AttributeDefinition, AttributeKind, AttributeOverride, BeanConfiguration, BeanDeclaration,
    BeanDescriptor, BeanMetaData, CheckingUnitId, CompositionType, ConstraintAnnotation,
    ConstraintDefinition, ConstraintDescriptor, ContainerElementDeclaration, DefinedOn,
    ElementDeclaration, ElementDescriptor, ElementKind, MetaConstraint, MethodDeclaration,
    ParameterDeclaration, Signature,
};
pub use error::{DefinitionError, DefinitionResult, FeedError, FeedResult};
pub use ports::{ConstraintDefinitionSource, DeclarationFeed};
pub use services::{
    BeanMetaDataBuilder, BeanMetaDataManager, ConstrainedElementBuilder,
    ConstraintDescriptorFactory,
};
