//! Error type shared by every [`StyleSheet`](crate::StyleSheet) operation.

use crate::css::model::GroupId;
use crate::css::parser::ParseError;

/// Errors returned by style model operations.
///
/// All variants are recoverable: a failed call leaves the model exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    /// An argument had the wrong shape (empty selector, unknown output mode, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A caller-supplied group identifier is already in use.
    #[error("group {0} already exists")]
    InvalidGroup(GroupId),
    /// The group identifier does not name a live group.
    #[error("group {0} does not exist")]
    NoGroup(GroupId),
    /// The selector has no declarations, neither individual nor through a group.
    #[error("element {0} does not exist")]
    NoElement(String),
    /// The selector (or group) exists but never declared the property.
    #[error("element {selector} has no property {property}")]
    NoElementProperty { selector: String, property: String },
    /// The stylesheet text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
