use derive_more::Display;

use crate::content::ContentId;

/// Errors raised by the navigation layer itself
///
/// A query that simply finds nothing is not an error: it returns `None` or
/// an empty list. These variants are contract violations and store
/// bookkeeping failures. They travel inside `anyhow::Error`, so callers
/// recover them with `downcast_ref::<NavigationError>()`.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum NavigationError {
    /// A query that needs a predicate was called without one
    #[display(fmt = "{} requires a predicate", operation)]
    MissingPredicate { operation: &'static str },

    /// `get` was asked for an id the store does not know
    #[display(fmt = "content {} not found", _0)]
    ContentNotFound(ContentId),

    /// A store already holds content with this id
    #[display(fmt = "content {} already exists", _0)]
    DuplicateContent(ContentId),

    /// Content was created under a parent the store does not know
    #[display(fmt = "parent {} does not exist", _0)]
    UnknownParent(ContentId),
}

impl std::error::Error for NavigationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = NavigationError::MissingPredicate {
            operation: "descendant",
        };
        assert_eq!(err.to_string(), "descendant requires a predicate");
        assert_eq!(
            NavigationError::ContentNotFound(ContentId(9)).to_string(),
            "content ContentId(9) not found"
        );
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = NavigationError::UnknownParent(ContentId(2)).into();
        assert_eq!(
            err.downcast_ref::<NavigationError>(),
            Some(&NavigationError::UnknownParent(ContentId(2)))
        );
    }
}
