//! Mutable state of one validation call.

use crate::engine::{
    config::ValidatorConfig,
    domain::{ConstraintViolation, PropertyPath, Violations},
};
use crate::model::{BeanRef, TypeName};
use std::collections::{HashMap, HashSet};

/// Per-call traversal state: root, collected violations and the beans and
/// constraints already processed.
#[derive(Debug)]
pub struct ValidationContext {
    root: Option<BeanRef>,
    root_type: TypeName,
    config: ValidatorConfig,
    violations: Violations,
    processed_groups: HashSet<(usize, TypeName)>,
    processed_paths: HashMap<usize, Vec<PropertyPath>>,
    processed_constraints: HashMap<(usize, u64), Vec<PropertyPath>>,
}

impl ValidationContext {
    /// Creates a context for a call rooted at `root`.
    #[must_use]
    pub fn new(root: Option<BeanRef>, root_type: TypeName, config: ValidatorConfig) -> Self {
        Self {
            root,
            root_type,
            config,
            violations: Violations::new(),
            processed_groups: HashSet::new(),
            processed_paths: HashMap::new(),
            processed_constraints: HashMap::new(),
        }
    }

    /// Returns the root bean, absent for value validation.
    #[must_use]
    pub const fn root(&self) -> Option<&BeanRef> {
        self.root.as_ref()
    }

    /// Returns the root type.
    #[must_use]
    pub const fn root_type(&self) -> &TypeName {
        &self.root_type
    }

    /// Returns the configuration of the call.
    #[must_use]
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Returns `true` when `bean` needs no further validation for `group`
    /// when reached at `path`.
    ///
    /// A bean is skipped only when it was processed for the group and one
    /// of its processed paths lies on the same branch as `path`. A bean
    /// reached again through an unrelated path is validated under that path.
    #[must_use]
    pub fn is_already_validated(&self, bean: &BeanRef, group: &TypeName, path: &PropertyPath) -> bool {
        if !self.config.track_processed_beans {
            return false;
        }
        let identity = bean.identity();
        if !self.processed_groups.contains(&(identity, group.clone())) {
            return false;
        }
        self.processed_paths
            .get(&identity)
            .is_some_and(|paths| paths.iter().any(|processed| processed.is_related_to(path)))
    }

    /// Records that `bean` was processed for `group` at `path`.
    pub fn mark_processed(&mut self, bean: &BeanRef, group: &TypeName, path: &PropertyPath) {
        if !self.config.track_processed_beans {
            return;
        }
        let identity = bean.identity();
        self.processed_groups.insert((identity, group.clone()));
        let paths = self.processed_paths.entry(identity).or_default();
        if !paths.contains(path) {
            paths.push(path.clone());
        }
    }

    /// Records that a constraint ran for the property of `bean` at `path`;
    /// returns `false` when it already had.
    ///
    /// `path` is the property path, before any container element is
    /// extracted, so every element of a container is checked in one run.
    pub fn mark_constraint(&mut self, bean: Option<&BeanRef>, path: &PropertyPath, constraint: u64) -> bool {
        let identity = bean.map_or(0, BeanRef::identity);
        let runs = self.processed_constraints.entry((identity, constraint)).or_default();
        if runs.contains(path) {
            return false;
        }
        runs.push(path.clone());
        true
    }

    /// Adds a violation; duplicates are dropped.
    pub fn add(&mut self, violation: ConstraintViolation) {
        self.violations.insert(violation);
    }

    /// Returns the number of violations collected so far.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` when fail-fast mode has seen a violation.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.config.fail_fast && !self.violations.is_empty()
    }

    /// Returns the collected violations.
    #[must_use]
    pub fn into_violations(self) -> Violations {
        self.violations
    }
}
