//! In-memory declaration feed.

use std::collections::HashMap;

use crate::metadata::{
    domain::BeanDeclaration,
    error::{FeedError, FeedResult},
    ports::DeclarationFeed,
};
use crate::model::TypeName;

/// Declaration feed backed by declarations supplied in code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeclarationFeed {
    declarations: HashMap<TypeName, BeanDeclaration>,
}

impl InMemoryDeclarationFeed {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a feed from declarations.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::DuplicateBean`] when a type is declared twice.
    pub fn with_declarations(
        declarations: impl IntoIterator<Item = BeanDeclaration>,
    ) -> FeedResult<Self> {
        let mut feed = Self::new();
        for declaration in declarations {
            feed.insert(declaration)?;
        }
        Ok(feed)
    }

    /// Adds a declaration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::DuplicateBean`] when the type is already declared.
    pub fn insert(&mut self, declaration: BeanDeclaration) -> FeedResult<()> {
        if self.declarations.contains_key(&declaration.bean_type) {
            return Err(FeedError::DuplicateBean(declaration.bean_type));
        }
        self.declarations
            .insert(declaration.bean_type.clone(), declaration);
        Ok(())
    }

    /// Returns the number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns `true` when nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl DeclarationFeed for InMemoryDeclarationFeed {
    fn declarations(&self, bean_type: &TypeName) -> FeedResult<Option<BeanDeclaration>> {
        Ok(self.declarations.get(bean_type).cloned())
    }
}
