//! In-memory content store

use anyhow::Result;
use log::{debug, info};
use std::collections::HashMap;

use crate::content::{is_null_or_empty, Content, ContentId, ContentType};
use crate::error::NavigationError;
use crate::loader::ContentLoader;
use crate::query::Query;

/// An in-memory content store
///
/// Items are kept in insertion order per parent, which is the order
/// [`children`](ContentLoader::children) reports them in.
///
/// `insert` stores snapshots exactly as given and does not check that the
/// parent exists, so fixtures can describe any shape, including broken ones
/// (dangling parents, cycles). `create` is the checked way to grow a tree.
///
/// # Example
///
/// ```ignore
/// let mut repo = ContentRepository::new();
/// let root = repo.create(None, "Home", START, PageData::default())?;
/// let about = repo.create(Some(root), "About", STANDARD, PageData::default())?;
/// ```
#[derive(Debug, Clone)]
pub struct ContentRepository<D> {
    /// Snapshot storage by id
    items: HashMap<ContentId, Content<D>>,
    /// Child lists by parent id, in insertion order
    children: HashMap<ContentId, Vec<ContentId>>,
    /// Next id handed out by `create`
    next_id: u64,
}

impl<D> Default for ContentRepository<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> ContentRepository<D> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            children: HashMap::new(),
            next_id: 1,
        }
    }

    /// Number of items stored
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been stored yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if an item with this id is stored
    pub fn contains(&self, id: ContentId) -> bool {
        self.items.contains_key(&id)
    }

    /// Store a snapshot as is
    ///
    /// # Errors
    ///
    /// Fails with [`NavigationError::DuplicateContent`] if the id is taken
    /// and with [`NavigationError::ContentNotFound`] for the empty id.
    pub fn insert(&mut self, content: Content<D>) -> Result<ContentId> {
        let id = content.id;
        if id.is_empty() {
            return Err(NavigationError::ContentNotFound(id).into());
        }
        if self.items.contains_key(&id) {
            return Err(NavigationError::DuplicateContent(id).into());
        }

        if let Some(parent) = content.parent_link() {
            self.children.entry(parent).or_default().push(id);
        }
        self.next_id = self.next_id.max(id.get() + 1);
        self.items.insert(id, content);
        Ok(id)
    }

    /// Create a new item under `parent` (or as a root) with the next free id
    ///
    /// # Errors
    ///
    /// Fails with [`NavigationError::UnknownParent`] if `parent` is not
    /// stored.
    pub fn create(
        &mut self,
        parent: Option<ContentId>,
        name: impl Into<String>,
        content_type: ContentType,
        data: D,
    ) -> Result<ContentId> {
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(NavigationError::UnknownParent(parent).into());
            }
        }

        let id = ContentId::new(self.next_id);
        let mut content = Content::new(id, name, content_type, data);
        content.parent = parent;
        debug!("Creating {} under {:?}", content, parent);
        self.insert(content)
    }
}

impl<D: Clone> ContentRepository<D> {
    /// Return the first child of `parent` of type `content_type`, creating
    /// one named `name` if there is none
    ///
    /// Returns the id and whether it was created.
    pub fn get_or_create_child(
        &mut self,
        parent: ContentId,
        content_type: ContentType,
        name: impl Into<String>,
        data: D,
    ) -> Result<(ContentId, bool)> {
        let existing = self.children_of(parent, &Query::of_type(content_type))?;
        if let Some(first) = existing.first() {
            return Ok((first.id, false));
        }

        let name = name.into();
        info!("No {} under {}, creating \"{}\"", content_type, parent, name);
        let id = self.create(Some(parent), name, content_type, data)?;
        Ok((id, true))
    }

    /// Items without a usable parent link, in id order
    pub fn roots(&self) -> Vec<Content<D>> {
        let mut roots: Vec<_> = self
            .items
            .values()
            .filter(|c| is_null_or_empty(c.parent))
            .cloned()
            .collect();
        roots.sort_by_key(|c| c.id);
        roots
    }
}

impl<D: Clone> ContentLoader for ContentRepository<D> {
    type Data = D;

    fn try_get(&self, id: ContentId) -> Result<Option<Content<D>>> {
        Ok(self.items.get(&id).cloned())
    }

    fn children(&self, id: ContentId) -> Result<Vec<Content<D>>> {
        Ok(self
            .children
            .get(&id)
            .map(|ids| ids.iter().filter_map(|id| self.items.get(id)).cloned().collect())
            .unwrap_or_default())
    }
}
