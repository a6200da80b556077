//! Registry of type declarations with assignability and hierarchy queries.

use super::{
    SuperType, TypeArgument, TypeDecl, TypeKind, TypeName, TypeSystemError, TypeSystemResult,
    well_known,
};
use std::collections::{HashMap, HashSet};

/// Registry of every type the validation engine reasons about.
///
/// A fresh registry already knows the scalar types, the container
/// interfaces (`Iterable<T>`, `Collection<E>`, `List<E>`, `Set<E>`,
/// `Map<K, V>`, `Optional<T>`, `Array<T>`) and the `Default` group.
/// Types that were never registered behave like classes without
/// supertypes.
#[derive(Debug, Clone)]
pub struct TypeSystem {
    types: HashMap<TypeName, TypeDecl>,
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSystem {
    /// Creates a type system pre-populated with the built-in types.
    #[must_use]
    pub fn new() -> Self {
        let builtins = [
            TypeDecl::class(well_known::OBJECT),
            TypeDecl::interface(well_known::DEFAULT),
            TypeDecl::interface(well_known::CHAR_SEQUENCE),
            TypeDecl::class(well_known::STRING).implementing(well_known::CHAR_SEQUENCE),
            TypeDecl::class(well_known::NUMBER),
            TypeDecl::class(well_known::INTEGER).extending(well_known::NUMBER),
            TypeDecl::class(well_known::DOUBLE).extending(well_known::NUMBER),
            TypeDecl::class(well_known::BOOLEAN),
            TypeDecl::class(well_known::INSTANT),
            TypeDecl::interface(well_known::ITERABLE).with_type_parameters(["T"]),
            TypeDecl::interface(well_known::COLLECTION)
                .with_type_parameters(["E"])
                .implementing(SuperType::new(well_known::ITERABLE).with_variable("E")),
            TypeDecl::interface(well_known::LIST)
                .with_type_parameters(["E"])
                .implementing(SuperType::new(well_known::COLLECTION).with_variable("E")),
            TypeDecl::interface(well_known::SET)
                .with_type_parameters(["E"])
                .implementing(SuperType::new(well_known::COLLECTION).with_variable("E")),
            TypeDecl::interface(well_known::MAP).with_type_parameters(["K", "V"]),
            TypeDecl::class(well_known::OPTIONAL).with_type_parameters(["T"]),
            TypeDecl::class(well_known::ARRAY).with_type_parameters(["T"]),
        ];
        Self {
            types: builtins
                .into_iter()
                .map(|declaration| (declaration.name.clone(), declaration))
                .collect(),
        }
    }

    /// Registers a type declaration.
    ///
    /// # Errors
    ///
    /// Returns [`TypeSystemError::DuplicateType`] when the name is taken,
    /// [`TypeSystemError::DuplicateGroupSequence`] when both declarations
    /// define a group sequence, and binding errors for supertypes that
    /// reference unknown variables or pass too many arguments.
    pub fn register(&mut self, declaration: TypeDecl) -> TypeSystemResult<()> {
        if let Some(existing) = self.types.get(&declaration.name) {
            if existing.group_sequence.is_some() && declaration.group_sequence.is_some() {
                return Err(TypeSystemError::DuplicateGroupSequence(declaration.name));
            }
            return Err(TypeSystemError::DuplicateType(declaration.name));
        }
        self.check_bindings(&declaration)?;
        self.types.insert(declaration.name.clone(), declaration);
        Ok(())
    }

    /// Registers a type declaration, returning the updated registry.
    ///
    /// # Errors
    ///
    /// See [`TypeSystem::register`].
    pub fn with(mut self, declaration: TypeDecl) -> TypeSystemResult<Self> {
        self.register(declaration)?;
        Ok(self)
    }

    fn check_bindings(&self, declaration: &TypeDecl) -> TypeSystemResult<()> {
        for supertype in declaration.supertypes() {
            let unknown = supertype.arguments.iter().find_map(|argument| match argument {
                TypeArgument::Variable(variable)
                    if !declaration.type_parameters.contains(variable) =>
                {
                    Some(variable)
                }
                _ => None,
            });
            if let Some(variable) = unknown {
                return Err(TypeSystemError::UnknownTypeVariable {
                    owner: declaration.name.clone(),
                    variable: variable.clone(),
                });
            }
            let expected = self.type_parameters(&supertype.name).len();
            if supertype.arguments.len() > expected {
                return Err(TypeSystemError::SupertypeArity {
                    owner: declaration.name.clone(),
                    supertype: supertype.name.clone(),
                    expected,
                    given: supertype.arguments.len(),
                });
            }
        }
        Ok(())
    }

    /// Looks up a declaration.
    #[must_use]
    pub fn get(&self, name: &TypeName) -> Option<&TypeDecl> {
        self.types.get(name)
    }

    /// Returns `true` when the type is a registered interface.
    #[must_use]
    pub fn is_interface(&self, name: &TypeName) -> bool {
        self.get(name)
            .is_some_and(|declaration| declaration.kind == TypeKind::Interface)
    }

    /// Returns the type parameter names of a type (empty for raw or unknown types).
    #[must_use]
    pub fn type_parameters(&self, name: &TypeName) -> &[String] {
        self.get(name)
            .map(|declaration| declaration.type_parameters.as_slice())
            .unwrap_or_default()
    }

    /// Returns the groups of a group sequence type.
    #[must_use]
    pub fn group_sequence(&self, name: &TypeName) -> Option<&[TypeName]> {
        self.get(name)
            .and_then(|declaration| declaration.group_sequence.as_deref())
    }

    /// Returns `true` when a value of type `candidate` can be used where
    /// `target` is expected.
    #[must_use]
    pub fn is_assignable(&self, target: &TypeName, candidate: &TypeName) -> bool {
        if target == candidate || target.as_str() == well_known::OBJECT {
            return true;
        }
        let mut pending = vec![candidate.clone()];
        let mut seen = HashSet::new();
        while let Some(current) = pending.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if &current == target {
                return true;
            }
            if let Some(declaration) = self.get(&current) {
                pending.extend(declaration.supertypes().map(|s| s.name.clone()));
            }
        }
        false
    }

    /// Returns `true` when `candidate` is a proper subtype of `target`.
    #[must_use]
    pub fn is_proper_subtype(&self, target: &TypeName, candidate: &TypeName) -> bool {
        target != candidate && self.is_assignable(target, candidate)
    }

    /// Computes the hierarchy closure of a type: the type itself followed by
    /// its interfaces and superclasses, depth first, each type once.
    /// `Object` is excluded.
    #[must_use]
    pub fn hierarchy(&self, name: &TypeName) -> Vec<TypeName> {
        let mut closure = Vec::new();
        let mut seen = HashSet::new();
        self.collect_hierarchy(name, &mut closure, &mut seen);
        closure
    }

    fn collect_hierarchy(
        &self,
        name: &TypeName,
        closure: &mut Vec<TypeName>,
        seen: &mut HashSet<TypeName>,
    ) {
        if name.as_str() == well_known::OBJECT || !seen.insert(name.clone()) {
            return;
        }
        closure.push(name.clone());
        if let Some(declaration) = self.get(name) {
            for supertype in declaration.supertypes() {
                self.collect_hierarchy(&supertype.name, closure, seen);
            }
        }
    }

    /// Maps each type parameter of `ancestor` to the index of the
    /// `descendant` type parameter it is bound to.
    ///
    /// Returns `None` when `ancestor` is not in the hierarchy of
    /// `descendant`. An entry is `None` when the ancestor parameter is
    /// bound to a concrete type or left raw.
    #[must_use]
    pub fn ancestor_bindings(
        &self,
        descendant: &TypeName,
        ancestor: &TypeName,
    ) -> Option<Vec<Option<usize>>> {
        let own = (0..self.type_parameters(descendant).len())
            .map(Some)
            .collect::<Vec<_>>();
        self.bind_towards(descendant, ancestor, own, &mut HashSet::new())
    }

    fn bind_towards(
        &self,
        current: &TypeName,
        ancestor: &TypeName,
        bindings: Vec<Option<usize>>,
        seen: &mut HashSet<TypeName>,
    ) -> Option<Vec<Option<usize>>> {
        if current == ancestor {
            return Some(bindings);
        }
        if !seen.insert(current.clone()) {
            return None;
        }
        let declaration = self.get(current)?;
        for supertype in declaration.supertypes() {
            let arity = self.type_parameters(&supertype.name).len();
            let projected = (0..arity)
                .map(|position| match supertype.arguments.get(position) {
                    Some(TypeArgument::Variable(variable)) => declaration
                        .type_parameters
                        .iter()
                        .position(|parameter| parameter == variable)
                        .and_then(|own| bindings.get(own).copied().flatten()),
                    Some(TypeArgument::Concrete(_)) | None => None,
                })
                .collect();
            if let Some(found) = self.bind_towards(&supertype.name, ancestor, projected, seen) {
                return Some(found);
            }
        }
        None
    }
}
