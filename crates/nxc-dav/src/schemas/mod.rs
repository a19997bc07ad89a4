//! Built-in entity schemas and the process-wide catalog.

mod file;
mod tag;

use std::sync::OnceLock;

use crate::dav::core::{EntitySchema, NamespaceRegistry};
use crate::error::DavResult;

pub use file::{COLLECTION, FILE_KIND, TRASH_FILE_KIND, file_schema, trash_file_schema};
pub use tag::{DEFAULT_TAG_NAME, TAG_KIND, tag_schema};

/// Default namespace registry plus the built-in schemas.
#[derive(Debug, Clone)]
pub struct Catalog {
    namespaces: NamespaceRegistry,
    file: EntitySchema,
    trash_file: EntitySchema,
    tag: EntitySchema,
}

impl Catalog {
    /// Builds the catalog from the default registry.
    ///
    /// ## Errors
    /// Fails if a built-in schema is inconsistent.
    pub fn build() -> DavResult<Self> {
        let mut namespaces = NamespaceRegistry::with_defaults();
        let file = file_schema(&mut namespaces)?;
        let trash_file = trash_file_schema(&mut namespaces, &file)?;
        let tag = tag_schema(&mut namespaces)?;
        Ok(Self {
            namespaces,
            file,
            trash_file,
            tag,
        })
    }

    /// Default namespace registry.
    #[must_use]
    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// Files and folders.
    #[must_use]
    pub fn file(&self) -> &EntitySchema {
        &self.file
    }

    /// Trash bin entries.
    #[must_use]
    pub fn trash_file(&self) -> &EntitySchema {
        &self.trash_file
    }

    /// System tags.
    #[must_use]
    pub fn tag(&self) -> &EntitySchema {
        &self.tag
    }

    /// Looks a schema up by entity kind.
    #[must_use]
    pub fn schema(&self, kind: &str) -> Option<&EntitySchema> {
        [&self.file, &self.trash_file, &self.tag]
            .into_iter()
            .find(|schema| schema.kind() == kind)
    }
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Returns the process-wide catalog, building it on first use.
///
/// ## Panics
/// Panics if a built-in schema is inconsistent, which the unit tests rule
/// out.
#[must_use]
#[expect(clippy::expect_used, reason = "built-in schemas are static data")]
pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(|| Catalog::build().expect("built-in schema catalog must be consistent"))
}
