//! Object-graph traversal: bean, property, value and method validation.

use super::context::ValidationContext;
use super::executor::ConstraintTreeExecutor;
use super::order::{ValidationOrder, ValidationOrderGenerator};
use crate::engine::{
    config::ValidatorConfig,
    domain::{
        ConstraintViolation, PathNode, PathSegment, PropertyPath, Selector, ViolationParts,
        Violations,
    },
    error::{ValidationError, ValidationResult},
    ports::{MessageInterpolator, TraversableResolver},
};
use crate::extraction::{ExtractedValue, ExtractionError, ValueExtractorRegistry};
use crate::metadata::{
    BeanDescriptor, BeanMetaData, BeanMetaDataManager, ConstraintDescriptor, ElementKind,
    MetaConstraint, Signature,
    domain::{ConstrainedValue, ContainerStep},
};
use crate::model::{BeanRef, ContainerContent, TypeName, TypeSystem, Value, well_known};
use std::sync::Arc;
use tracing::{debug, trace};

/// Factory-scoped collaborators shared by every validator of a factory.
pub(crate) struct Collaborators {
    pub(crate) type_system: Arc<TypeSystem>,
    pub(crate) metadata: BeanMetaDataManager,
    pub(crate) extractors: Arc<ValueExtractorRegistry>,
    pub(crate) executor: ConstraintTreeExecutor,
    pub(crate) order: ValidationOrderGenerator,
    pub(crate) interpolator: Arc<dyn MessageInterpolator>,
    pub(crate) traversable: Arc<dyn TraversableResolver>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("metadata", &self.metadata)
            .field("executor", &self.executor)
            .field("interpolator", &self.interpolator)
            .finish_non_exhaustive()
    }
}

/// One constrained value of a method call: its path, metadata and argument.
type ExecutableElement<'a> = (PropertyPath, &'a ConstrainedValue, &'a Value);

/// Validates object graphs against the constraint metadata of a factory.
///
/// Validators are cheap to clone and safe to share between threads; every
/// call keeps its traversal state to itself.
///
/// # Examples
///
/// ```
/// use vauban::engine::ValidatorFactory;
/// use vauban::metadata::{BeanDeclaration, ConstraintAnnotation, ElementDeclaration};
/// use vauban::model::{BeanRef, TypeDecl, Value};
///
/// let declaration = BeanDeclaration::new("Fish").with_field(
///     "name",
///     ElementDeclaration::new("String").with_constraint(ConstraintAnnotation::new("NotNull")),
/// );
/// let factory = ValidatorFactory::builder()
///     .with_type(TypeDecl::class("Fish"))
///     .with_declaration(declaration)
///     .build()
///     .expect("factory");
///
/// let fish = Value::Bean(BeanRef::new("Fish"));
/// let violations = factory.validator().validate(&fish, &[]).expect("validation");
/// assert_eq!(violations.paths(), vec!["name".to_owned()]);
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    inner: Arc<Collaborators>,
    config: ValidatorConfig,
}

impl Validator {
    pub(crate) const fn new(inner: Arc<Collaborators>, config: ValidatorConfig) -> Self {
        Self { inner, config }
    }

    /// Returns the configuration of this validator.
    #[must_use]
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates a bean and, through cascades, the graph reachable from it.
    ///
    /// No group means `Default`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NullRoot`] or
    /// [`ValidationError::NotABean`] for an invalid root, and definition or
    /// checking unit errors surfaced while validating.
    pub fn validate(&self, object: &Value, groups: &[TypeName]) -> ValidationResult<Violations> {
        let bean = root_bean(object)?;
        let order = self.inner.order.order_for(groups)?;
        debug!(bean = %bean.class(), groups = groups.len(), "validating bean");
        let mut context =
            ValidationContext::new(Some(bean.clone()), bean.class().clone(), self.config);
        self.validate_bean(&mut context, bean, &PropertyPath::root(), &order, 0)?;
        Ok(context.into_violations())
    }

    /// Validates the constraints of one property reached through `property_path`.
    ///
    /// The path is dotted and may select container elements, e.g.
    /// `orders[0].total` or `owners[alice].name`. Cascades are not
    /// followed. A null intermediate value yields no violation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPropertyPath`] when the path does
    /// not resolve, plus the errors of [`Validator::validate`].
    pub fn validate_property(
        &self,
        object: &Value,
        property_path: &str,
        groups: &[TypeName],
    ) -> ValidationResult<Violations> {
        let root = root_bean(object)?;
        let invalid = || ValidationError::invalid_path(root.class(), property_path);
        let segments = PathSegment::parse_all(property_path).ok_or_else(invalid)?;
        let Some((last, intermediate)) = segments.split_last() else {
            return Err(invalid());
        };

        let mut leaf = root.clone();
        let mut path = PropertyPath::root();
        for segment in intermediate {
            path.push(PathNode::property(&segment.name));
            let value = leaf.value_of(&segment.name);
            let selected = match &segment.selector {
                None => value,
                Some(selector) => {
                    let Some((node, element)) = select_element(&value, selector) else {
                        return if value.is_null() {
                            Ok(Violations::new())
                        } else {
                            Err(invalid())
                        };
                    };
                    path.push(node);
                    element
                }
            };
            leaf = match selected {
                Value::Null => return Ok(Violations::new()),
                Value::Bean(next) => next,
                _ => return Err(invalid()),
            };
        }
        if last.selector.is_some() {
            return Err(invalid());
        }

        let metadata = self.inner.metadata.get(leaf.class())?;
        let property = metadata.property(&last.name).ok_or_else(invalid)?;
        let order = self.inner.order.order_for(groups)?;
        path.push(PathNode::property(&last.name));
        let value = leaf.value_of(&last.name);
        let mut context =
            ValidationContext::new(Some(root.clone()), root.class().clone(), self.config);
        self.validate_property_in_order(
            &mut context,
            &metadata,
            &property.value,
            Some(&leaf),
            &path,
            &value,
            &order,
        )?;
        Ok(context.into_violations())
    }

    /// Validates `value` as if it were the property at `property_path` of
    /// a `bean_type` instance.
    ///
    /// Intermediate segments are resolved through declared types; a
    /// selector steps into the element type of the declared container.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPropertyPath`] when the path does
    /// not resolve, plus definition and checking unit errors.
    pub fn validate_value(
        &self,
        bean_type: &TypeName,
        property_path: &str,
        value: &Value,
        groups: &[TypeName],
    ) -> ValidationResult<Violations> {
        let invalid = || ValidationError::invalid_path(bean_type, property_path);
        let segments = PathSegment::parse_all(property_path).ok_or_else(invalid)?;
        let Some((last, intermediate)) = segments.split_last() else {
            return Err(invalid());
        };

        let map = TypeName::new(well_known::MAP);
        let mut current = bean_type.clone();
        let mut path = PropertyPath::root();
        for segment in intermediate {
            let metadata = self.inner.metadata.get(&current)?;
            let property = metadata.property(&segment.name).ok_or_else(invalid)?;
            let declared = &property.value.declared_type;
            path.push(PathNode::property(&segment.name));
            current = match &segment.selector {
                None => declared.name.clone(),
                Some(selector) => {
                    let type_argument =
                        usize::from(self.inner.type_system.is_assignable(&map, &declared.name));
                    path.push(selector_node(
                        PathNode::container_element(declared.name.clone(), type_argument),
                        selector,
                    ));
                    declared.argument(type_argument).name
                }
            };
        }
        if last.selector.is_some() {
            return Err(invalid());
        }

        let metadata = self.inner.metadata.get(&current)?;
        let property = metadata.property(&last.name).ok_or_else(invalid)?;
        let order = self.inner.order.order_for(groups)?;
        path.push(PathNode::property(&last.name));
        let mut context = ValidationContext::new(None, bean_type.clone(), self.config);
        self.validate_property_in_order(
            &mut context,
            &metadata,
            &property.value,
            None,
            &path,
            value,
            &order,
        )?;
        Ok(context.into_violations())
    }

    /// Validates the arguments of a method call on `object`.
    ///
    /// A method without metadata yields no violation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterCount`] when the argument count
    /// differs from the signature, the deferred overriding error recorded
    /// for the method, plus the errors of [`Validator::validate`].
    pub fn validate_parameters(
        &self,
        object: &Value,
        method: &Signature,
        arguments: &[Value],
        groups: &[TypeName],
    ) -> ValidationResult<Violations> {
        let bean = root_bean(object)?;
        let metadata = self.inner.metadata.get(bean.class())?;
        let Some(declared) = metadata.executable(method) else {
            return Ok(Violations::new());
        };
        let executable = declared.checked()?;
        if executable.parameters.len() != arguments.len() {
            return Err(ValidationError::ParameterCount {
                method: method.to_string(),
                expected: executable.parameters.len(),
                given: arguments.len(),
            });
        }
        let method_path = PropertyPath::root().with(PathNode::method(&method.name));
        let elements = executable
            .parameters
            .iter()
            .zip(arguments)
            .enumerate()
            .map(|(index, (parameter, argument))| {
                (
                    method_path.with(PathNode::parameter(&parameter.name, index)),
                    &parameter.value,
                    argument,
                )
            })
            .collect::<Vec<ExecutableElement<'_>>>();
        self.validate_executable(bean, &metadata, &elements, groups)
    }

    /// Validates the value returned by a method call on `object`.
    ///
    /// # Errors
    ///
    /// See [`Validator::validate_parameters`].
    pub fn validate_return_value(
        &self,
        object: &Value,
        method: &Signature,
        returned: &Value,
        groups: &[TypeName],
    ) -> ValidationResult<Violations> {
        let bean = root_bean(object)?;
        let metadata = self.inner.metadata.get(bean.class())?;
        let Some(declared) = metadata.executable(method) else {
            return Ok(Violations::new());
        };
        let executable = declared.checked()?;
        let path = PropertyPath::root()
            .with(PathNode::method(&method.name))
            .with(PathNode::return_value());
        let elements = [(path, &executable.return_value, returned)];
        self.validate_executable(bean, &metadata, &elements, groups)
    }

    /// Returns the read-only view of the constraints of `bean_type`.
    ///
    /// # Errors
    ///
    /// Returns the definition error raised while building the metadata.
    pub fn constraints_for(&self, bean_type: &TypeName) -> ValidationResult<BeanDescriptor> {
        Ok(self.inner.metadata.get(bean_type)?.descriptor())
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    fn validate_bean(
        &self,
        context: &mut ValidationContext,
        bean: &BeanRef,
        path: &PropertyPath,
        order: &ValidationOrder,
        depth: usize,
    ) -> ValidationResult<()> {
        let metadata = self.inner.metadata.get(bean.class())?;
        for group in order.groups() {
            self.validate_own(context, bean, &metadata, path, group)?;
        }
        for group in order.groups() {
            self.cascade_properties(context, bean, &metadata, path, group, depth)?;
        }
        for sequence in order.sequences() {
            let before = context.violation_count();
            for group in sequence.groups() {
                self.validate_own(context, bean, &metadata, path, group)?;
                self.cascade_properties(context, bean, &metadata, path, group, depth)?;
                if context.violation_count() > before {
                    trace!(sequence = %sequence.name(), group = %group, "group sequence stopped");
                    break;
                }
            }
        }
        Ok(())
    }

    fn validate_own(
        &self,
        context: &mut ValidationContext,
        bean: &BeanRef,
        metadata: &BeanMetaData,
        path: &PropertyPath,
        group: &TypeName,
    ) -> ValidationResult<()> {
        let before = context.violation_count();
        for stage in self.stages_for(metadata, group)? {
            self.validate_own_group(context, bean, metadata, path, &stage)?;
            if context.violation_count() > before {
                break;
            }
        }
        context.mark_processed(bean, group, path);
        Ok(())
    }

    fn validate_own_group(
        &self,
        context: &mut ValidationContext,
        bean: &BeanRef,
        metadata: &BeanMetaData,
        path: &PropertyPath,
        group: &TypeName,
    ) -> ValidationResult<()> {
        let bean_path = path.with(PathNode::bean());
        let bean_value = Value::Bean(bean.clone());
        for constraint in metadata.class_constraints() {
            self.run_constraint(context, constraint, group, Some(bean), &bean_path, &bean_value)?;
        }
        for property in metadata.properties().values() {
            if property.value.constraints.is_empty() {
                continue;
            }
            let property_path = path.with(PathNode::property(&property.name));
            let value = bean.value_of(&property.name);
            for constraint in &property.value.constraints {
                self.run_constraint(context, constraint, group, Some(bean), &property_path, &value)?;
            }
        }
        Ok(())
    }

    fn cascade_properties(
        &self,
        context: &mut ValidationContext,
        bean: &BeanRef,
        metadata: &BeanMetaData,
        path: &PropertyPath,
        group: &TypeName,
        depth: usize,
    ) -> ValidationResult<()> {
        for property in metadata.cascaded_properties() {
            if context.should_stop() {
                return Ok(());
            }
            let value = bean.value_of(&property.name);
            if value.is_null() {
                continue;
            }
            if !self.inner.traversable.is_traversable(
                bean,
                &property.name,
                context.root_type(),
                path,
                ElementKind::Field,
            ) {
                trace!(bean = %bean.class(), property = %property.name, "cascade vetoed");
                continue;
            }
            let property_path = path.with(PathNode::property(&property.name));
            self.cascade_value(context, &property.value, &property_path, &value, group, depth)?;
        }
        Ok(())
    }

    fn cascade_value(
        &self,
        context: &mut ValidationContext,
        constrained: &ConstrainedValue,
        path: &PropertyPath,
        value: &Value,
        group: &TypeName,
        depth: usize,
    ) -> ValidationResult<()> {
        for cascade in &constrained.cascades {
            if cascade.steps.is_empty() {
                self.cascade_into(context, path, value, group, depth)?;
                continue;
            }
            for (element_path, element) in self.extract_along(&cascade.steps, path, value)? {
                self.cascade_into(context, &element_path, &element, group, depth)?;
            }
        }
        Ok(())
    }

    fn cascade_into(
        &self,
        context: &mut ValidationContext,
        path: &PropertyPath,
        value: &Value,
        group: &TypeName,
        depth: usize,
    ) -> ValidationResult<()> {
        match value {
            Value::Bean(child) => self.cascade_bean(context, child, path, group, depth),
            Value::Container(_) => {
                let Some(extractor) = self.inner.extractors.resolve_for_value(None, value)? else {
                    return Ok(());
                };
                for extracted in extractor.extract_all(value) {
                    let element_path = path.with(element_node(
                        PathNode::container_element(
                            extractor.container().clone(),
                            extractor.type_argument(),
                        ),
                        &extracted,
                    ));
                    self.cascade_into(context, &element_path, &extracted.value, group, depth)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn cascade_bean(
        &self,
        context: &mut ValidationContext,
        child: &BeanRef,
        path: &PropertyPath,
        group: &TypeName,
        depth: usize,
    ) -> ValidationResult<()> {
        let next = depth + 1;
        if context.config().max_depth.is_some_and(|max| next > max) {
            trace!(bean = %child.class(), path = %path, "cascade depth limit reached");
            return Ok(());
        }
        if context.is_already_validated(child, group, path) {
            trace!(bean = %child.class(), path = %path, group = %group, "bean already validated");
            return Ok(());
        }
        trace!(bean = %child.class(), path = %path, group = %group, "cascading");
        self.validate_bean(
            context,
            child,
            path,
            &ValidationOrder::single(group.clone()),
            next,
        )
    }

    // ========================================================================
    // Single properties and executables
    // ========================================================================

    #[expect(
        clippy::too_many_arguments,
        reason = "the property coordinates travel together through one call"
    )]
    fn validate_property_in_order(
        &self,
        context: &mut ValidationContext,
        metadata: &BeanMetaData,
        constrained: &ConstrainedValue,
        leaf: Option<&BeanRef>,
        path: &PropertyPath,
        value: &Value,
        order: &ValidationOrder,
    ) -> ValidationResult<()> {
        for group in order.groups() {
            self.validate_property_group(context, metadata, constrained, leaf, path, value, group)?;
        }
        for sequence in order.sequences() {
            let before = context.violation_count();
            for group in sequence.groups() {
                self.validate_property_group(
                    context, metadata, constrained, leaf, path, value, group,
                )?;
                if context.violation_count() > before {
                    break;
                }
            }
        }
        Ok(())
    }

    #[expect(
        clippy::too_many_arguments,
        reason = "the property coordinates travel together through one call"
    )]
    fn validate_property_group(
        &self,
        context: &mut ValidationContext,
        metadata: &BeanMetaData,
        constrained: &ConstrainedValue,
        leaf: Option<&BeanRef>,
        path: &PropertyPath,
        value: &Value,
        group: &TypeName,
    ) -> ValidationResult<()> {
        let before = context.violation_count();
        for stage in self.stages_for(metadata, group)? {
            for constraint in &constrained.constraints {
                self.run_constraint(context, constraint, &stage, leaf, path, value)?;
            }
            if context.violation_count() > before {
                break;
            }
        }
        Ok(())
    }

    fn validate_executable(
        &self,
        bean: &BeanRef,
        metadata: &BeanMetaData,
        elements: &[ExecutableElement<'_>],
        groups: &[TypeName],
    ) -> ValidationResult<Violations> {
        let order = self.inner.order.order_for(groups)?;
        let mut context =
            ValidationContext::new(Some(bean.clone()), bean.class().clone(), self.config);
        for group in order.groups() {
            self.validate_executable_group(&mut context, bean, metadata, elements, group)?;
        }
        for sequence in order.sequences() {
            let before = context.violation_count();
            for group in sequence.groups() {
                self.validate_executable_group(&mut context, bean, metadata, elements, group)?;
                if context.violation_count() > before {
                    break;
                }
            }
        }
        Ok(context.into_violations())
    }

    fn validate_executable_group(
        &self,
        context: &mut ValidationContext,
        bean: &BeanRef,
        metadata: &BeanMetaData,
        elements: &[ExecutableElement<'_>],
        group: &TypeName,
    ) -> ValidationResult<()> {
        let before = context.violation_count();
        for stage in self.stages_for(metadata, group)? {
            for (path, constrained, value) in elements {
                for constraint in &constrained.constraints {
                    self.run_constraint(context, constraint, &stage, Some(bean), path, value)?;
                }
                if constrained.is_cascading() && !value.is_null() {
                    self.cascade_value(context, constrained, path, value, &stage, 0)?;
                }
            }
            if context.violation_count() > before {
                break;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Constraint evaluation
    // ========================================================================

    /// Expands `Default` into the bean's redefined default group sequence.
    fn stages_for(
        &self,
        metadata: &BeanMetaData,
        group: &TypeName,
    ) -> ValidationResult<Vec<TypeName>> {
        if group.is_default_group() && metadata.redefines_default_group_sequence() {
            return Ok(self.inner.order.stages(metadata.default_group_sequence())?);
        }
        Ok(vec![group.clone()])
    }

    fn run_constraint(
        &self,
        context: &mut ValidationContext,
        constraint: &MetaConstraint,
        group: &TypeName,
        leaf: Option<&BeanRef>,
        path: &PropertyPath,
        value: &Value,
    ) -> ValidationResult<()> {
        if context.should_stop()
            || !constraint.descriptor().applies_to(group)
            || !context.mark_constraint(leaf, path, constraint.descriptor().id())
        {
            return Ok(());
        }
        let declared = &constraint.value_type().name;
        if constraint.element_path().is_empty() {
            return self.evaluate(context, constraint.descriptor(), declared, leaf, path, value);
        }
        for (element_path, element) in self.extract_along(constraint.element_path(), path, value)? {
            self.evaluate(context, constraint.descriptor(), declared, leaf, &element_path, &element)?;
        }
        Ok(())
    }

    fn evaluate(
        &self,
        context: &mut ValidationContext,
        descriptor: &Arc<ConstraintDescriptor>,
        declared: &TypeName,
        leaf: Option<&BeanRef>,
        path: &PropertyPath,
        value: &Value,
    ) -> ValidationResult<()> {
        if context.should_stop() {
            return Ok(());
        }
        let fail_fast = context.config().fail_fast;
        for pending in self.inner.executor.execute(descriptor, value, declared, fail_fast)? {
            let message = self.inner.interpolator.interpolate(
                &pending.message_template,
                pending.descriptor.attributes(),
                value,
            );
            context.add(ConstraintViolation::from_parts(ViolationParts {
                message,
                message_template: pending.message_template,
                root_bean: context.root().cloned(),
                root_bean_type: context.root_type().clone(),
                leaf_bean: leaf.cloned(),
                invalid_value: value.clone(),
                property_path: path.clone(),
                descriptor: pending.descriptor,
                element_kind: descriptor.element_kind(),
            }));
        }
        Ok(())
    }

    /// Follows container steps from `value`, returning every reached
    /// element with its path. Null containers are not entered.
    fn extract_along(
        &self,
        steps: &[ContainerStep],
        path: &PropertyPath,
        value: &Value,
    ) -> ValidationResult<Vec<(PropertyPath, Value)>> {
        let mut reached = vec![(path.clone(), value.clone())];
        for step in steps {
            let mut next = Vec::new();
            for (container_path, container) in reached {
                if container.is_null() {
                    continue;
                }
                let extractor = self
                    .inner
                    .extractors
                    .resolve_for_value(Some((&step.container, step.type_argument)), &container)?
                    .ok_or_else(|| ExtractionError::NoExtractor {
                        container: step.container.clone(),
                        type_argument: step.type_argument,
                    })?;
                for extracted in extractor.extract_all(&container) {
                    let mut node = element_node(
                        PathNode::container_element(step.container.clone(), step.type_argument),
                        &extracted,
                    );
                    if let Some(parameter) = &step.type_parameter {
                        node = node.with_type_parameter(parameter);
                    }
                    next.push((container_path.with(node), extracted.value));
                }
            }
            reached = next;
        }
        Ok(reached)
    }
}

fn root_bean(object: &Value) -> ValidationResult<&BeanRef> {
    match object {
        Value::Null => Err(ValidationError::NullRoot),
        Value::Bean(bean) => Ok(bean),
        other => Err(ValidationError::NotABean(
            other.runtime_type().unwrap_or_else(TypeName::object),
        )),
    }
}

fn element_node(node: PathNode, extracted: &ExtractedValue) -> PathNode {
    let named = match &extracted.node_name {
        Some(name) => node.named(name),
        None => node,
    };
    if let Some(index) = extracted.index {
        named.at_index(index)
    } else if let Some(key) = &extracted.key {
        named.at_key(key.clone())
    } else if extracted.iterable {
        named.in_iterable()
    } else {
        named
    }
}

fn selector_node(node: PathNode, selector: &Selector) -> PathNode {
    match selector {
        Selector::Iterable => node.in_iterable(),
        Selector::Index(index) => node.at_index(*index),
        Selector::Key(key) => node.at_key(Value::text(key.as_str())),
    }
}

/// Picks the element a selector designates in a container value.
fn select_element(value: &Value, selector: &Selector) -> Option<(PathNode, Value)> {
    let container = value.as_container()?;
    let type_name = container.type_name().clone();
    match (container.content(), selector) {
        (ContainerContent::Sequence(elements), Selector::Index(index)) => {
            let node = PathNode::container_element(type_name, 0).at_index(*index);
            Some((node, elements.get(*index).cloned().unwrap_or(Value::Null)))
        }
        (ContainerContent::Entries(entries), Selector::Index(_) | Selector::Key(_)) => {
            let wanted = match selector {
                Selector::Index(index) => index.to_string(),
                Selector::Key(key) => key.clone(),
                Selector::Iterable => return None,
            };
            let found = entries.iter().find(|(key, _)| key.to_string() == wanted);
            let (key, element) = found.map_or_else(
                || (Value::text(wanted.as_str()), Value::Null),
                |(key, element)| (key.clone(), element.clone()),
            );
            Some((PathNode::container_element(type_name, 1).at_key(key), element))
        }
        _ => None,
    }
}
