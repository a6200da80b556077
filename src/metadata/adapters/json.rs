//! Declaration feed parsed from JSON mapping documents.
//!
//! A mapping document may declare types, constraint definitions and bean
//! declarations:
//!
//! ```json
//! {
//!   "types": [{ "name": "Fish", "kind": "class" }],
//!   "constraints": [],
//!   "beans": [
//!     {
//!       "type": "Fish",
//!       "fields": [
//!         { "name": "name", "type": { "name": "String" },
//!           "constraints": [{ "constraint": "NotNull" }] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use tracing::debug;

use super::memory::InMemoryDeclarationFeed;
use crate::metadata::{
    domain::{BeanDeclaration, ConstraintDefinition},
    error::{FeedError, FeedResult},
    ports::DeclarationFeed,
};
use crate::model::{TypeDecl, TypeName};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingDocument {
    #[serde(default)]
    types: Vec<TypeDecl>,
    #[serde(default)]
    constraints: Vec<ConstraintDefinition>,
    #[serde(default)]
    beans: Vec<BeanDeclaration>,
}

/// Declaration feed built from JSON mapping documents.
///
/// Type declarations and constraint definitions found in the documents
/// are exposed so that a validator factory can register them.
#[derive(Debug, Clone, Default)]
pub struct JsonMappingFeed {
    beans: InMemoryDeclarationFeed,
    types: Vec<TypeDecl>,
    constraints: Vec<ConstraintDefinition>,
}

impl JsonMappingFeed {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one mapping document.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Parse`] for invalid documents and
    /// [`FeedError::DuplicateBean`] for beans declared twice.
    pub fn from_json(document: &str) -> FeedResult<Self> {
        let mut feed = Self::new();
        feed.add_document("<inline>", document)?;
        Ok(feed)
    }

    /// Parses a mapping document and merges it into the feed.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Parse`] for invalid documents and
    /// [`FeedError::DuplicateBean`] for beans declared twice.
    pub fn add_document(&mut self, source_name: &str, document: &str) -> FeedResult<()> {
        let parsed: MappingDocument = serde_json::from_str(document)
            .map_err(|error| FeedError::parse(source_name, &error))?;
        debug!(
            source = source_name,
            beans = parsed.beans.len(),
            types = parsed.types.len(),
            constraints = parsed.constraints.len(),
            "loaded constraint mapping"
        );
        for bean in parsed.beans {
            self.beans.insert(bean)?;
        }
        self.types.extend(parsed.types);
        self.constraints.extend(parsed.constraints);
        Ok(())
    }

    /// Loads every `*.json` document in a directory, in file name order.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] when the directory or a file cannot be read,
    /// and parse or duplicate errors from [`JsonMappingFeed::add_document`].
    pub fn load_dir(path: &Utf8Path) -> FeedResult<Self> {
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|error| FeedError::io(path.as_str(), &error))?;
        let mut names = Vec::new();
        for entry in dir
            .entries()
            .map_err(|error| FeedError::io(path.as_str(), &error))?
        {
            let entry = entry.map_err(|error| FeedError::io(path.as_str(), &error))?;
            let name = entry
                .file_name()
                .map_err(|error| FeedError::io(path.as_str(), &error))?;
            if Utf8Path::new(&name).extension() == Some("json") {
                names.push(name);
            }
        }
        names.sort();

        let mut feed = Self::new();
        for name in names {
            let document = dir
                .read_to_string(&name)
                .map_err(|error| FeedError::io(path.join(&name).as_str(), &error))?;
            feed.add_document(path.join(&name).as_str(), &document)?;
        }
        Ok(feed)
    }

    /// Returns the type declarations found in the documents.
    #[must_use]
    pub fn type_declarations(&self) -> &[TypeDecl] {
        &self.types
    }

    /// Returns the constraint definitions found in the documents.
    #[must_use]
    pub fn constraint_definitions(&self) -> &[ConstraintDefinition] {
        &self.constraints
    }

    /// Returns the number of declared beans.
    #[must_use]
    pub fn bean_count(&self) -> usize {
        self.beans.len()
    }
}

impl DeclarationFeed for JsonMappingFeed {
    fn declarations(&self, bean_type: &TypeName) -> FeedResult<Option<BeanDeclaration>> {
        self.beans.declarations(bean_type)
    }
}
