//! The contract between the navigator and whatever stores the content

use anyhow::Result;
use log::debug;

use crate::content::{Content, ContentId};
use crate::error::NavigationError;
use crate::query::Query;

/// Read access to a hierarchical content store
///
/// Implementations only have to answer two questions: "what is item `id`?"
/// and "which items sit directly below `id`?". Everything else, including
/// the whole [`ContentNavigation`](crate::ContentNavigation) query set, is
/// derived from those.
///
/// Snapshots are returned by value. Stores that are expensive to query are
/// expected to cache behind this trait; the navigator never caches.
///
/// # Example
///
/// ```ignore
/// fn print_children<L: ContentLoader>(loader: &L, id: ContentId) -> anyhow::Result<()> {
///     for child in loader.children(id)? {
///         println!("{}", child.name);
///     }
///     Ok(())
/// }
/// ```
pub trait ContentLoader {
    /// Payload carried by every item of this store
    type Data: Clone;

    /// Look up an item
    ///
    /// Returns `Ok(None)` if the store has no item with this id. Errors are
    /// reserved for failures of the store itself.
    fn try_get(&self, id: ContentId) -> Result<Option<Content<Self::Data>>>;

    /// Direct children of an item, in store order
    ///
    /// Returns an empty list for leaves and for unknown ids.
    fn children(&self, id: ContentId) -> Result<Vec<Content<Self::Data>>>;

    /// Look up an item that is expected to exist
    ///
    /// # Errors
    ///
    /// Fails with [`NavigationError::ContentNotFound`] if the id is unknown.
    fn get(&self, id: ContentId) -> Result<Content<Self::Data>> {
        self.try_get(id)?
            .ok_or_else(|| NavigationError::ContentNotFound(id).into())
    }

    /// Load the parent of an item
    ///
    /// Returns `None` for the root. A parent link that does not resolve is
    /// treated the same way.
    fn parent(&self, content: &Content<Self::Data>) -> Result<Option<Content<Self::Data>>> {
        let Some(parent_id) = content.parent_link() else {
            return Ok(None);
        };

        let parent = self.try_get(parent_id)?;
        if parent.is_none() {
            debug!("{} links to missing parent {}", content.id, parent_id);
        }
        Ok(parent)
    }

    /// Direct children of an item that match `query`
    fn children_of(
        &self,
        id: ContentId,
        query: &Query<'_, Self::Data>,
    ) -> Result<Vec<Content<Self::Data>>> {
        Ok(self
            .children(id)?
            .into_iter()
            .filter(|child| query.matches(child))
            .collect())
    }
}
