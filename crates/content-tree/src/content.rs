//! Core content types for the navigation layer

use derive_more::Display;
use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier of a content item
///
/// `ContentId::EMPTY` plays the role of the empty reference: a parent link
/// holding it (or no parent link at all) marks the root of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[display(fmt = "ContentId({})", _0)]
pub struct ContentId(pub u64);

impl ContentId {
    /// The empty reference, never handed out by a store
    pub const EMPTY: ContentId = ContentId(0);

    /// Create a new ContentId from a raw value
    pub const fn new(id: u64) -> Self {
        ContentId(id)
    }

    /// Get the inner value
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns true for the empty reference
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for ContentId {
    fn from(id: u64) -> Self {
        ContentId(id)
    }
}

impl From<ContentId> for u64 {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

/// Returns true when a parent link points nowhere (absent or empty)
pub fn is_null_or_empty(link: Option<ContentId>) -> bool {
    link.map_or(true, ContentId::is_empty)
}

/// The kind of a content item
///
/// Kinds form a single-inheritance hierarchy declared up front, usually as
/// statics:
///
/// ```
/// use content_tree::ContentType;
///
/// static PAGE: ContentType = ContentType::root("Page");
/// static ARTICLE: ContentType = ContentType::derived("Article", &PAGE);
///
/// assert!(ARTICLE.is(&PAGE));
/// assert!(!PAGE.is(&ARTICLE));
/// ```
///
/// Two types are equal when their names are equal.
#[derive(Debug, Clone, Copy)]
pub struct ContentType {
    name: &'static str,
    base: Option<&'static ContentType>,
}

impl ContentType {
    /// A type with no base type
    pub const fn root(name: &'static str) -> Self {
        Self { name, base: None }
    }

    /// A type deriving from `base`
    pub const fn derived(name: &'static str, base: &'static ContentType) -> Self {
        Self {
            name,
            base: Some(base),
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn base(&self) -> Option<&'static ContentType> {
        self.base
    }

    /// Returns true if this type is `other` or derives from it
    pub fn is(&self, other: &ContentType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.base;
        }
        false
    }
}

impl PartialEq for ContentType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ContentType {}

impl Hash for ContentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A read-only snapshot of one item in the content tree
///
/// Generic over the payload `D` a store attaches to its items (page
/// properties, file metadata, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Content<D> {
    /// Identifier of this item
    pub id: ContentId,
    /// Link to the parent item, absent for the root
    pub parent: Option<ContentId>,
    /// Display name
    pub name: String,
    /// Kind of the item
    pub content_type: ContentType,
    /// Store-defined payload
    pub data: D,
}

impl<D> Content<D> {
    /// Create a new root-level content snapshot
    pub fn new(id: ContentId, name: impl Into<String>, content_type: ContentType, data: D) -> Self {
        Self {
            id,
            parent: None,
            name: name.into(),
            content_type,
            data,
        }
    }

    /// Set the parent link
    pub fn with_parent(mut self, parent: ContentId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// The parent link, if it points anywhere
    pub fn parent_link(&self) -> Option<ContentId> {
        if is_null_or_empty(self.parent) {
            None
        } else {
            self.parent
        }
    }

    /// Returns true if the item has no parent link
    pub fn is_root(&self) -> bool {
        is_null_or_empty(self.parent)
    }

    /// Returns true if the item's type is `content_type` or derives from it
    pub fn is_a(&self, content_type: &ContentType) -> bool {
        self.content_type.is(content_type)
    }
}

impl<D: Default> Content<D> {
    /// Create a new content snapshot with a default payload
    pub fn with_default(id: ContentId, name: impl Into<String>, content_type: ContentType) -> Self {
        Self::new(id, name, content_type, D::default())
    }
}

impl<D> fmt::Display for Content<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({})", self.name, self.content_type, self.id.0)
    }
}
