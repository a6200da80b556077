//! Domain types for constraint metadata.

pub mod bean;
pub mod declaration;
pub mod definition;
pub mod descriptor;
pub mod element;

pub use bean::{
    BeanDescriptor, BeanMetaData, BeanMetaDataParts, ElementDescriptor, ExecutableMetaData,
    MethodDescriptor, ParameterMetaData, PropertyMetaData,
};
pub use declaration::{
    BeanDeclaration, ContainerElementDeclaration, ElementDeclaration, MemberDeclaration,
    MethodDeclaration, ParameterDeclaration, Signature,
};
pub use definition::{
    AttributeDefinition, AttributeKind, AttributeOverride, CheckingUnitId, ComposingConstraint,
    CompositionType, ConstraintAnnotation, ConstraintDefinition, GROUPS_ATTRIBUTE,
    MESSAGE_ATTRIBUTE, PAYLOAD_ATTRIBUTE,
};
pub use descriptor::{ConstraintDescriptor, DefinedOn, DescriptorParts, ElementKind};
pub use element::{
    BeanConfiguration, Cascadable, ConstrainedElement, ConstrainedExecutable, ConstrainedParameter,
    ConstrainedProperty, ConstrainedValue, ConstraintLocation, ContainerStep, MetaConstraint,
};
