//! Turns raw bean declarations into constrained elements.

use std::sync::Arc;

use super::descriptors::ConstraintDescriptorFactory;
use crate::extraction::{ExtractionError, ValueExtractorRegistry};
use crate::metadata::{
    domain::{
        BeanConfiguration, BeanDeclaration, Cascadable, ConstrainedElement,
        ConstrainedExecutable, ConstrainedParameter, ConstrainedProperty, ConstrainedValue,
        ConstraintAnnotation, ConstraintLocation, ContainerElementDeclaration, ContainerStep,
        ElementDeclaration, ElementKind, MetaConstraint, MethodDeclaration,
    },
    error::{DefinitionError, DefinitionResult},
};
use crate::model::{TypeName, TypeRef, TypeSystem};

/// Builds the [`BeanConfiguration`] of one declaring type.
///
/// Container element declarations are checked against the container's
/// type parameters and must resolve to a value extractor.
#[derive(Debug, Clone)]
pub struct ConstrainedElementBuilder {
    type_system: Arc<TypeSystem>,
    descriptors: Arc<ConstraintDescriptorFactory>,
    extractors: Arc<ValueExtractorRegistry>,
}

impl ConstrainedElementBuilder {
    /// Creates a builder.
    #[must_use]
    pub const fn new(
        type_system: Arc<TypeSystem>,
        descriptors: Arc<ConstraintDescriptorFactory>,
        extractors: Arc<ValueExtractorRegistry>,
    ) -> Self {
        Self {
            type_system,
            descriptors,
            extractors,
        }
    }

    /// Returns the descriptor factory.
    #[must_use]
    pub const fn descriptors(&self) -> &Arc<ConstraintDescriptorFactory> {
        &self.descriptors
    }

    /// Builds the constrained elements declared on one type.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] when a constraint cannot be resolved or
    /// a container element declaration is invalid.
    pub fn configure(&self, declaration: &BeanDeclaration) -> DefinitionResult<BeanConfiguration> {
        let bean = &declaration.bean_type;
        let mut elements = Vec::new();

        if !declaration.class_constraints.is_empty() {
            let location = ConstraintLocation::Type { bean: bean.clone() };
            let constraints = self.meta_constraints(
                &declaration.class_constraints,
                ElementKind::Type,
                &location,
                &[],
                &TypeRef::new(bean.clone()),
            )?;
            elements.push(ConstrainedElement::Type(constraints));
        }

        for field in &declaration.fields {
            let location = ConstraintLocation::Field {
                bean: bean.clone(),
                property: field.name.clone(),
            };
            elements.push(ConstrainedElement::Field(ConstrainedProperty {
                name: field.name.clone(),
                value: self.constrained_value(&field.element, ElementKind::Field, &location)?,
            }));
        }

        for getter in &declaration.getters {
            let property = getter.property_name();
            let location = ConstraintLocation::Getter {
                bean: bean.clone(),
                property: property.clone(),
            };
            elements.push(ConstrainedElement::Getter(ConstrainedProperty {
                name: property,
                value: self.constrained_value(&getter.element, ElementKind::Method, &location)?,
            }));
        }

        for method in &declaration.methods {
            elements.push(ConstrainedElement::Executable(
                self.executable(declaration, method)?,
            ));
        }

        Ok(BeanConfiguration {
            bean_type: bean.clone(),
            elements,
            default_group_sequence: declaration.default_group_sequence.clone(),
        })
    }

    fn executable(
        &self,
        declaration: &BeanDeclaration,
        method: &MethodDeclaration,
    ) -> DefinitionResult<ConstrainedExecutable> {
        let signature = method.signature();
        let parameters = method
            .parameters
            .iter()
            .enumerate()
            .map(|(index, parameter)| {
                let location = ConstraintLocation::Parameter {
                    bean: declaration.bean_type.clone(),
                    method: signature.clone(),
                    index,
                };
                Ok(ConstrainedParameter {
                    name: parameter.name.clone(),
                    value: self.constrained_value(
                        &parameter.element,
                        ElementKind::Parameter,
                        &location,
                    )?,
                })
            })
            .collect::<DefinitionResult<Vec<_>>>()?;
        let return_value = match &method.return_value {
            Some(element) => {
                let location = ConstraintLocation::ReturnValue {
                    bean: declaration.bean_type.clone(),
                    method: signature.clone(),
                };
                self.constrained_value(element, ElementKind::ReturnValue, &location)?
            }
            None => ConstrainedValue::new(TypeRef::new(TypeName::object())),
        };
        Ok(ConstrainedExecutable {
            signature,
            parameters,
            return_value,
        })
    }

    fn constrained_value(
        &self,
        element: &ElementDeclaration,
        kind: ElementKind,
        location: &ConstraintLocation,
    ) -> DefinitionResult<ConstrainedValue> {
        let mut value = ConstrainedValue::new(element.declared_type.clone());
        value.constraints = self.meta_constraints(
            &element.constraints,
            kind,
            location,
            &[],
            &element.declared_type,
        )?;
        if element.cascading {
            value.cascades.push(Cascadable::whole());
        }
        for container_element in &element.container_elements {
            self.container_element(
                &element.declared_type,
                container_element,
                &[],
                location,
                &mut value,
            )?;
        }
        Ok(value)
    }

    fn container_element(
        &self,
        container: &TypeRef,
        declaration: &ContainerElementDeclaration,
        path: &[ContainerStep],
        location: &ConstraintLocation,
        value: &mut ConstrainedValue,
    ) -> DefinitionResult<()> {
        let parameters = self.type_system.type_parameters(&container.name);
        let type_argument = declaration.type_argument;
        if type_argument >= parameters.len() {
            return Err(DefinitionError::InvalidTypeArgument {
                container: container.name.clone(),
                type_argument,
            });
        }
        if self
            .extractors
            .resolve(&container.name, type_argument, &container.name)?
            .is_none()
        {
            return Err(ExtractionError::NoExtractor {
                container: container.name.clone(),
                type_argument,
            }
            .into());
        }

        let step = ContainerStep {
            container: container.name.clone(),
            type_argument,
            type_parameter: (parameters.len() > 1)
                .then(|| parameters.get(type_argument).cloned())
                .flatten(),
            element_type: container.argument(type_argument),
        };
        let mut steps = path.to_vec();
        steps.push(step.clone());

        value.constraints.extend(self.meta_constraints(
            &declaration.constraints,
            ElementKind::ContainerElement,
            location,
            &steps,
            &step.element_type,
        )?);
        if declaration.cascading {
            value.cascades.push(Cascadable {
                steps: steps.clone(),
            });
        }
        for nested in &declaration.nested {
            self.container_element(&step.element_type, nested, &steps, location, value)?;
        }
        Ok(())
    }

    fn meta_constraints(
        &self,
        annotations: &[ConstraintAnnotation],
        kind: ElementKind,
        location: &ConstraintLocation,
        path: &[ContainerStep],
        value_type: &TypeRef,
    ) -> DefinitionResult<Vec<MetaConstraint>> {
        annotations
            .iter()
            .map(|annotation| {
                Ok(MetaConstraint::new(
                    self.descriptors.build(annotation, kind)?,
                    location.clone(),
                    path.to_vec(),
                    value_type.clone(),
                ))
            })
            .collect()
    }
}
