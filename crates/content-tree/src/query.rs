//! Filters shared by every navigation query

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::content::{Content, ContentType};

/// Maximum number of hops a single query walks by default
pub const DEFAULT_MAX_HOPS: usize = 10;

/// Tunables for navigation queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigationOptions {
    /// Upper bound on the levels one query may walk, up or down.
    /// Walks that reach it end with "not found".
    pub max_hops: usize,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

impl NavigationOptions {
    /// Set the hop bound
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }
}

type Predicate<'a, D> = Box<dyn Fn(&Content<D>) -> bool + 'a>;

/// What a navigation query is looking for
///
/// A query combines an optional type filter, an optional predicate and the
/// hop bound. The predicate only runs on items that pass the type filter.
///
/// ```
/// use content_tree::{Content, ContentId, ContentType, Query};
///
/// static PAGE: ContentType = ContentType::root("Page");
///
/// let query = Query::of_type(PAGE).matching(|c: &Content<()>| c.name.starts_with("News"));
/// assert!(query.matches(&Content::new(ContentId(1), "News 2024", PAGE, ())));
/// ```
pub struct Query<'a, D> {
    content_type: Option<ContentType>,
    predicate: Option<Predicate<'a, D>>,
    max_hops: usize,
}

impl<'a, D> Query<'a, D> {
    /// Matches every item
    pub fn any() -> Self {
        Self {
            content_type: None,
            predicate: None,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    /// Matches items of `content_type` or of a type deriving from it
    pub fn of_type(content_type: ContentType) -> Self {
        Self {
            content_type: Some(content_type),
            ..Self::any()
        }
    }

    /// Add a predicate
    pub fn matching<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Content<D>) -> bool + 'a,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Add a predicate that needs something besides the item, such as the
    /// loader itself to count children
    pub fn matching_with<C, F>(self, context: &'a C, predicate: F) -> Self
    where
        C: ?Sized,
        F: Fn(&C, &Content<D>) -> bool + 'a,
    {
        self.matching(move |content| predicate(context, content))
    }

    /// Override the hop bound
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Take the hop bound from shared options
    pub fn with_options(self, options: &NavigationOptions) -> Self {
        self.with_max_hops(options.max_hops)
    }

    pub fn content_type(&self) -> Option<&ContentType> {
        self.content_type.as_ref()
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    /// Returns true if `content` passes the type filter and the predicate
    pub fn matches(&self, content: &Content<D>) -> bool {
        if let Some(content_type) = &self.content_type {
            if !content.is_a(content_type) {
                return false;
            }
        }
        self.predicate
            .as_ref()
            .map_or(true, |predicate| predicate(content))
    }
}

impl<D> Default for Query<'_, D> {
    fn default() -> Self {
        Self::any()
    }
}

impl<D> fmt::Debug for Query<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("content_type", &self.content_type.map(|t| t.name()))
            .field("has_predicate", &self.has_predicate())
            .field("max_hops", &self.max_hops)
            .finish()
    }
}
