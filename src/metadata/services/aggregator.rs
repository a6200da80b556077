//! Merges the configurations of a type hierarchy into one [`BeanMetaData`].

use std::collections::BTreeMap;

use crate::metadata::{
    domain::{
        BeanConfiguration, BeanMetaData, BeanMetaDataParts, ConstrainedElement,
        ConstrainedExecutable, ConstrainedValue, DefinedOn, ExecutableMetaData, MetaConstraint,
        ParameterMetaData, PropertyMetaData, Signature,
    },
    error::{DefinitionError, DefinitionResult},
};
use crate::model::{TypeName, TypeRef, TypeSystem};

/// One declaration of a method within the hierarchy.
#[derive(Debug)]
struct MethodSite {
    declaring: TypeName,
    executable: ConstrainedExecutable,
    defined_on: DefinedOn,
    implicit_group: Option<TypeName>,
}

/// Accumulates the configurations of every type in a hierarchy.
///
/// Configurations must be added in hierarchy order, validated type first.
/// Constraints declared on the validated type are tagged
/// [`DefinedOn::Locally`], all others [`DefinedOn::InHierarchy`]; constraints
/// declared on an implemented interface additionally apply to a group named
/// after that interface.
#[derive(Debug)]
pub struct BeanMetaDataBuilder<'a> {
    type_system: &'a TypeSystem,
    bean_type: TypeName,
    class_constraints: Vec<MetaConstraint>,
    properties: BTreeMap<String, PropertyMetaData>,
    methods: BTreeMap<Signature, Vec<MethodSite>>,
    default_group_sequence: Option<Vec<TypeName>>,
}

impl<'a> BeanMetaDataBuilder<'a> {
    /// Starts aggregating metadata for `bean_type`.
    #[must_use]
    pub fn new(bean_type: TypeName, type_system: &'a TypeSystem) -> Self {
        Self {
            type_system,
            bean_type,
            class_constraints: Vec::new(),
            properties: BTreeMap::new(),
            methods: BTreeMap::new(),
            default_group_sequence: None,
        }
    }

    /// Merges the configuration of one type of the hierarchy.
    pub fn add(&mut self, configuration: &BeanConfiguration) {
        let declaring = &configuration.bean_type;
        let is_root = declaring == &self.bean_type;
        let defined_on = if is_root {
            DefinedOn::Locally
        } else {
            DefinedOn::InHierarchy
        };
        let implicit_group =
            (!is_root && self.type_system.is_interface(declaring)).then_some(declaring);

        for element in &configuration.elements {
            match element {
                ConstrainedElement::Type(constraints) => {
                    self.class_constraints.extend(
                        constraints
                            .iter()
                            .map(|constraint| constraint.adapted(defined_on, implicit_group)),
                    );
                }
                ConstrainedElement::Field(property) | ConstrainedElement::Getter(property) => {
                    self.properties
                        .entry(property.name.clone())
                        .or_insert_with(|| PropertyMetaData {
                            name: property.name.clone(),
                            value: ConstrainedValue::new(property.value.declared_type.clone()),
                        })
                        .value
                        .merge(&property.value, defined_on, implicit_group);
                }
                ConstrainedElement::Executable(executable) => {
                    self.methods
                        .entry(executable.signature.clone())
                        .or_default()
                        .push(MethodSite {
                            declaring: declaring.clone(),
                            executable: executable.clone(),
                            defined_on,
                            implicit_group: implicit_group.cloned(),
                        });
                }
            }
        }

        if is_root {
            self.default_group_sequence
                .clone_from(&configuration.default_group_sequence);
        }
    }

    /// Finishes aggregation.
    ///
    /// Method overriding errors are not returned here; they are recorded on
    /// the affected [`ExecutableMetaData`].
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] when the redefined default group
    /// sequence is invalid.
    pub fn build(self) -> DefinitionResult<BeanMetaData> {
        let (default_group_sequence, redefines_default_group_sequence) =
            self.default_group_sequence()?;
        let executables = self
            .methods
            .iter()
            .map(|(signature, sites)| (signature.clone(), self.executable(signature, sites)))
            .collect();
        Ok(BeanMetaData::from_parts(BeanMetaDataParts {
            hierarchy: self.type_system.hierarchy(&self.bean_type),
            bean_type: self.bean_type,
            class_constraints: self.class_constraints,
            properties: self.properties,
            executables,
            default_group_sequence,
            redefines_default_group_sequence,
        }))
    }

    fn default_group_sequence(&self) -> DefinitionResult<(Vec<TypeName>, bool)> {
        let Some(sequence) = &self.default_group_sequence else {
            return Ok((vec![TypeName::default_group()], false));
        };
        let occurrences = sequence
            .iter()
            .filter(|group| *group == &self.bean_type)
            .count();
        match occurrences {
            0 => Err(DefinitionError::DefaultSequenceWithoutBean(
                self.bean_type.clone(),
            )),
            1 if sequence.iter().any(TypeName::is_default_group) => Err(
                DefinitionError::DefaultGroupInSequence(self.bean_type.clone()),
            ),
            1 => Ok((
                sequence
                    .iter()
                    .map(|group| {
                        if group == &self.bean_type {
                            TypeName::default_group()
                        } else {
                            group.clone()
                        }
                    })
                    .collect(),
                true,
            )),
            _ => Err(DefinitionError::BeanRepeatedInDefaultSequence(
                self.bean_type.clone(),
            )),
        }
    }

    fn executable(&self, signature: &Signature, sites: &[MethodSite]) -> ExecutableMetaData {
        let mut parameters: Vec<ParameterMetaData> = Vec::new();
        let mut return_value: Option<ConstrainedValue> = None;
        for site in sites {
            let implicit_group = site.implicit_group.as_ref();
            for (index, parameter) in site.executable.parameters.iter().enumerate() {
                if parameters.len() == index {
                    parameters.push(ParameterMetaData {
                        name: parameter.name.clone(),
                        value: ConstrainedValue::new(parameter.value.declared_type.clone()),
                    });
                }
                if let Some(merged) = parameters.get_mut(index) {
                    merged
                        .value
                        .merge(&parameter.value, site.defined_on, implicit_group);
                }
            }
            return_value
                .get_or_insert_with(|| {
                    ConstrainedValue::new(site.executable.return_value.declared_type.clone())
                })
                .merge(&site.executable.return_value, site.defined_on, implicit_group);
        }
        ExecutableMetaData {
            signature: signature.clone(),
            parameters,
            return_value: return_value
                .unwrap_or_else(|| ConstrainedValue::new(TypeRef::new(TypeName::object()))),
            deferred_error: self.overriding_error(signature, sites),
        }
    }

    fn overriding_error(&self, signature: &Signature, sites: &[MethodSite]) -> Option<DefinitionError> {
        let constrained = sites
            .iter()
            .filter(|site| site.executable.has_parameter_constraints())
            .map(|site| site.declaring.clone())
            .collect::<Vec<_>>();
        match constrained.as_slice() {
            [] => None,
            [single] => sites
                .iter()
                .map(|site| &site.declaring)
                .find(|declaring| !self.type_system.is_assignable(single, declaring))
                .map(|parallel| DefinitionError::ParallelParameterConstraints {
                    method: signature.to_string(),
                    constrained: single.clone(),
                    parallel: parallel.clone(),
                }),
            _ => Some(DefinitionError::ParameterConstraintsStrengthened {
                method: signature.to_string(),
                declared_by: constrained,
            }),
        }
    }
}
