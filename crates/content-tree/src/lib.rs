//! Content Tree Navigation
//!
//! Ancestor, descendant, sibling and child queries over a hierarchical
//! content store that is only reachable through a loader.
//!
//! # Core Concepts
//!
//! - **Content**: read-only snapshot of one item (id, parent link, type, payload)
//! - **ContentLoader**: the store contract (`try_get`, `children`)
//! - **ContentNavigation**: the query set, available on every loader
//! - **Query**: type filter + predicate + hop bound
//!
//! # Example
//!
//! ```
//! use content_tree::prelude::*;
//!
//! static FOLDER: ContentType = ContentType::root("Folder");
//! static PAGE: ContentType = ContentType::root("Page");
//!
//! let mut repo = ContentRepository::new();
//! let root = repo.create(None, "Root", FOLDER, ())?;
//! let a = repo.create(Some(root), "A", PAGE, ())?;
//! let b = repo.create(Some(a), "B", FOLDER, ())?;
//!
//! let b = repo.get(b)?;
//! let page = repo.ancestor(&b, &Query::of_type(PAGE))?;
//! assert_eq!(page.map(|p| p.name), Some("A".to_string()));
//! # Ok::<_, anyhow::Error>(())
//! ```

mod content;
mod error;
pub mod filesystem;
mod loader;
mod navigator;
mod query;
mod repository;

pub use content::{is_null_or_empty, Content, ContentId, ContentType};
pub use error::NavigationError;
pub use filesystem::{FileData, FilesystemLoader};
pub use loader::ContentLoader;
pub use navigator::ContentNavigation;
pub use query::{NavigationOptions, Query, DEFAULT_MAX_HOPS};
pub use repository::ContentRepository;

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::{
        Content, ContentId, ContentLoader, ContentNavigation, ContentRepository, ContentType,
        NavigationError, NavigationOptions, Query, DEFAULT_MAX_HOPS,
    };
}
