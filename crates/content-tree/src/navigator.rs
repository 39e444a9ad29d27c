//! Ancestor, descendant, sibling and child queries over any content loader

use anyhow::Result;
use log::{debug, trace};

use crate::content::{Content, ContentId};
use crate::error::NavigationError;
use crate::loader::ContentLoader;
use crate::query::Query;

/// Extension trait providing tree navigation queries
///
/// This trait is automatically implemented for all types that implement
/// [`ContentLoader`]. Every query reads through the loader on each call and
/// keeps no state of its own.
///
/// Singular queries return `Ok(None)` when nothing matches and plural
/// queries return an empty list. Every walk is bounded by the query's hop
/// bound, so malformed trees (cycles, very deep chains) end in "not found"
/// instead of looping. Loader errors are passed through untouched.
pub trait ContentNavigation: ContentLoader {
    /// First item matching `query` on the way from `content` up to the root,
    /// starting with `content` itself
    fn ancestor_or_self(
        &self,
        content: &Content<Self::Data>,
        query: &Query<'_, Self::Data>,
    ) -> Result<Option<Content<Self::Data>>> {
        let mut pivot = content.clone();

        for hop in 0..query.max_hops() {
            if query.matches(&pivot) {
                trace!("ancestor_or_self matched {} after {} hops", pivot.id, hop);
                return Ok(Some(pivot));
            }

            match self.parent(&pivot)? {
                Some(parent) => pivot = parent,
                None => return Ok(None),
            }
        }

        debug!(
            "ancestor_or_self from {} gave up after {} hops",
            content.id,
            query.max_hops()
        );
        Ok(None)
    }

    /// Like [`ancestor_or_self`](Self::ancestor_or_self), but the predicate
    /// also sees the parent of the item under examination
    ///
    /// The parent is loaded once per step and passed along even when it is
    /// absent, so a predicate that needs it does not load it again.
    fn ancestor_or_self_with_parent<F>(
        &self,
        content: &Content<Self::Data>,
        predicate: F,
        max_hops: usize,
    ) -> Result<Option<Content<Self::Data>>>
    where
        F: Fn(&Content<Self::Data>, Option<&Content<Self::Data>>) -> bool,
    {
        let mut pivot = content.clone();

        for _ in 0..max_hops {
            let parent = self.parent(&pivot)?;

            if predicate(&pivot, parent.as_ref()) {
                return Ok(Some(pivot));
            }

            match parent {
                Some(parent) => pivot = parent,
                None => return Ok(None),
            }
        }

        debug!(
            "ancestor_or_self_with_parent from {} gave up after {} hops",
            content.id, max_hops
        );
        Ok(None)
    }

    /// First item matching `query` strictly above `content`
    fn ancestor(
        &self,
        content: &Content<Self::Data>,
        query: &Query<'_, Self::Data>,
    ) -> Result<Option<Content<Self::Data>>> {
        match self.parent(content)? {
            Some(parent) => self.ancestor_or_self(&parent, query),
            None => Ok(None),
        }
    }

    /// Every item matching `query` above `content`, nearest first
    ///
    /// Unlike the singular queries this always walks the whole path (up to
    /// the hop bound).
    fn ancestors(
        &self,
        content: &Content<Self::Data>,
        query: &Query<'_, Self::Data>,
    ) -> Result<Vec<Content<Self::Data>>> {
        let mut found = Vec::new();
        let mut pivot = self.parent(content)?;

        for _ in 0..query.max_hops() {
            let Some(current) = pivot else {
                return Ok(found);
            };

            pivot = self.parent(&current)?;
            if query.matches(&current) {
                found.push(current);
            }
        }

        if pivot.is_some() {
            debug!(
                "ancestors from {} stopped at the hop bound ({})",
                content.id,
                query.max_hops()
            );
        }
        Ok(found)
    }

    /// `content` itself if it matches, otherwise the first match below it in
    /// breadth-first, left-to-right order
    ///
    /// # Errors
    ///
    /// Fails with [`NavigationError::MissingPredicate`] if `query` has no
    /// predicate.
    fn descendant_or_self(
        &self,
        content: &Content<Self::Data>,
        query: &Query<'_, Self::Data>,
    ) -> Result<Option<Content<Self::Data>>> {
        require_predicate(query, "descendant_or_self")?;

        if query.matches(content) {
            return Ok(Some(content.clone()));
        }
        first_below(self, content, query)
    }

    /// First match strictly below `content` in breadth-first, left-to-right
    /// order
    ///
    /// # Errors
    ///
    /// Fails with [`NavigationError::MissingPredicate`] if `query` has no
    /// predicate.
    fn descendant(
        &self,
        content: &Content<Self::Data>,
        query: &Query<'_, Self::Data>,
    ) -> Result<Option<Content<Self::Data>>> {
        require_predicate(query, "descendant")?;
        first_below(self, content, query)
    }

    /// Every match strictly below `content`, level by level, left to right
    fn descendants(
        &self,
        content: &Content<Self::Data>,
        query: &Query<'_, Self::Data>,
    ) -> Result<Vec<Content<Self::Data>>> {
        let mut found = Vec::new();
        let mut frontier = vec![content.clone()];

        for _ in 0..query.max_hops() {
            let level = next_level(self, &frontier)?;
            if level.is_empty() {
                return Ok(found);
            }

            found.extend(level.iter().filter(|c| query.matches(c)).cloned());
            frontier = level;
        }

        debug!(
            "descendants of {} stopped at the hop bound ({})",
            content.id,
            query.max_hops()
        );
        Ok(found)
    }

    /// Children of `content`'s parent that match `query`, `content` included
    /// if it matches
    ///
    /// Returns an empty list for the root, and for an item whose parent
    /// link does not resolve.
    fn siblings_and_self(
        &self,
        content: &Content<Self::Data>,
        query: &Query<'_, Self::Data>,
    ) -> Result<Vec<Content<Self::Data>>> {
        match self.parent(content)? {
            Some(parent) => self.children_of(parent.id, query),
            None => Ok(Vec::new()),
        }
    }

    /// Children of `content`'s parent that match `query`, never including
    /// `content` itself
    fn siblings(
        &self,
        content: &Content<Self::Data>,
        query: &Query<'_, Self::Data>,
    ) -> Result<Vec<Content<Self::Data>>> {
        let mut siblings = self.siblings_and_self(content, query)?;
        siblings.retain(|sibling| sibling.id != content.id);
        Ok(siblings)
    }

    /// First sibling matching `query`, in store order
    fn first_sibling(
        &self,
        content: &Content<Self::Data>,
        query: &Query<'_, Self::Data>,
    ) -> Result<Option<Content<Self::Data>>> {
        Ok(self.siblings(content, query)?.into_iter().next())
    }

    /// Last sibling matching `query`, in store order
    fn last_sibling(
        &self,
        content: &Content<Self::Data>,
        query: &Query<'_, Self::Data>,
    ) -> Result<Option<Content<Self::Data>>> {
        Ok(self.siblings(content, query)?.pop())
    }

    /// All children of `content`'s parent, `content` included, sorted by
    /// `key`
    ///
    /// The sort is stable: items with equal keys keep store order.
    fn ordered_siblings_and_self<K, F>(
        &self,
        content: &Content<Self::Data>,
        key: F,
    ) -> Result<Vec<Content<Self::Data>>>
    where
        K: Ord,
        F: FnMut(&Content<Self::Data>) -> K,
    {
        let mut ordered = self.siblings_and_self(content, &Query::any())?;
        ordered.sort_by_cached_key(key);
        Ok(ordered)
    }

    /// Siblings that come after `content` when ordered by `key`, filtered
    /// by `query`
    ///
    /// If `content` is missing from its parent's children the whole ordered
    /// set (filtered) is returned.
    fn following_siblings<K, F>(
        &self,
        content: &Content<Self::Data>,
        key: F,
        query: &Query<'_, Self::Data>,
    ) -> Result<Vec<Content<Self::Data>>>
    where
        K: Ord,
        F: FnMut(&Content<Self::Data>) -> K,
    {
        let ordered = self.ordered_siblings_and_self(content, key)?;
        let start = position_of(&ordered, content.id).map_or(0, |index| index + 1);

        Ok(ordered
            .into_iter()
            .skip(start)
            .filter(|sibling| query.matches(sibling))
            .collect())
    }

    /// The nearest following sibling matching `query`
    fn following_sibling<K, F>(
        &self,
        content: &Content<Self::Data>,
        key: F,
        query: &Query<'_, Self::Data>,
    ) -> Result<Option<Content<Self::Data>>>
    where
        K: Ord,
        F: FnMut(&Content<Self::Data>) -> K,
    {
        Ok(self
            .following_siblings(content, key, query)?
            .into_iter()
            .next())
    }

    /// Siblings that come before `content` when ordered by `key`, filtered
    /// by `query`, in ascending key order (nearest last)
    ///
    /// If `content` is missing from its parent's children the result is
    /// empty.
    fn previous_siblings<K, F>(
        &self,
        content: &Content<Self::Data>,
        key: F,
        query: &Query<'_, Self::Data>,
    ) -> Result<Vec<Content<Self::Data>>>
    where
        K: Ord,
        F: FnMut(&Content<Self::Data>) -> K,
    {
        let ordered = self.ordered_siblings_and_self(content, key)?;
        let end = position_of(&ordered, content.id).unwrap_or(0);

        Ok(ordered
            .into_iter()
            .take(end)
            .filter(|sibling| query.matches(sibling))
            .collect())
    }

    /// The nearest previous sibling matching `query`
    fn previous_sibling<K, F>(
        &self,
        content: &Content<Self::Data>,
        key: F,
        query: &Query<'_, Self::Data>,
    ) -> Result<Option<Content<Self::Data>>>
    where
        K: Ord,
        F: FnMut(&Content<Self::Data>) -> K,
    {
        Ok(self.previous_siblings(content, key, query)?.pop())
    }

    /// First child of `parent` matching `query`
    fn first_child(
        &self,
        parent: ContentId,
        query: &Query<'_, Self::Data>,
    ) -> Result<Option<Content<Self::Data>>> {
        Ok(self
            .children(parent)?
            .into_iter()
            .find(|child| query.matches(child)))
    }

    /// Last child of `parent` matching `query`
    fn last_child(
        &self,
        parent: ContentId,
        query: &Query<'_, Self::Data>,
    ) -> Result<Option<Content<Self::Data>>> {
        Ok(self
            .children(parent)?
            .into_iter()
            .rev()
            .find(|child| query.matches(child)))
    }
}

// Blanket implementation for all loaders
impl<L: ContentLoader + ?Sized> ContentNavigation for L {}

fn require_predicate<D>(query: &Query<'_, D>, operation: &'static str) -> Result<()> {
    if query.has_predicate() {
        Ok(())
    } else {
        Err(NavigationError::MissingPredicate { operation }.into())
    }
}

/// Children of every frontier item, flattened in frontier order
fn next_level<L: ContentLoader + ?Sized>(
    loader: &L,
    frontier: &[Content<L::Data>],
) -> Result<Vec<Content<L::Data>>> {
    let mut level = Vec::new();
    for item in frontier {
        level.extend(loader.children(item.id)?);
    }
    Ok(level)
}

fn first_below<L: ContentLoader + ?Sized>(
    loader: &L,
    content: &Content<L::Data>,
    query: &Query<'_, L::Data>,
) -> Result<Option<Content<L::Data>>> {
    let mut frontier = vec![content.clone()];

    for depth in 1..=query.max_hops() {
        let level = next_level(loader, &frontier)?;
        if level.is_empty() {
            return Ok(None);
        }

        if let Some(found) = level.iter().find(|c| query.matches(c)) {
            trace!("descendant of {} found at depth {}", content.id, depth);
            return Ok(Some(found.clone()));
        }
        frontier = level;
    }

    debug!(
        "descendant search below {} stopped at the hop bound ({})",
        content.id,
        query.max_hops()
    );
    Ok(None)
}

fn position_of<D>(ordered: &[Content<D>], id: ContentId) -> Option<usize> {
    let position = ordered.iter().position(|item| item.id == id);
    if position.is_none() {
        debug!("{} is missing from its parent's children", id);
    }
    position
}
