//! Style model data: Declaration, GroupId, Group, Rule.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Arena key of a live group. Stable across unrelated removals.
    pub(crate) struct GroupKey;
}

/// A single `property: value` pair.
///
/// The value is stored verbatim (`!important` included); nothing is merged, so the same
/// property may appear several times in one declaration list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    /// The property name, e.g. `"color"`.
    pub property: String,
    /// The raw value text, e.g. `"1em 2em"`.
    pub value: String,
}

impl Declaration {
    /// Create a new declaration.
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)
    }
}

/// A declaration tagged with the global order in which it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Slot {
    pub(crate) seq: u64,
    pub(crate) declaration: Declaration,
}

/// Identifier of a group: auto-assigned integer or caller-chosen alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupId {
    /// Numeric id, as handed out by `create_group` when none is supplied.
    Index(usize),
    /// Named id, e.g. `"myGroup"`.
    Alias(String),
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Index(n) => write!(f, "{n}"),
            GroupId::Alias(name) => f.write_str(name),
        }
    }
}

impl From<usize> for GroupId {
    fn from(n: usize) -> Self {
        GroupId::Index(n)
    }
}

impl From<&str> for GroupId {
    fn from(name: &str) -> Self {
        GroupId::Alias(name.to_string())
    }
}

impl From<String> for GroupId {
    fn from(name: String) -> Self {
        GroupId::Alias(name)
    }
}

/// One rule block sharing a declaration list among several selectors.
#[derive(Debug, Clone)]
pub(crate) struct Group {
    pub(crate) id: GroupId,
    /// Canonical selectors, in registration order, without duplicates.
    pub(crate) selectors: Vec<String>,
    pub(crate) declarations: Vec<Slot>,
}

impl Group {
    pub(crate) fn new(id: GroupId) -> Self {
        Self {
            id,
            selectors: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Selector text as written in a rule head: `body, html`.
    pub(crate) fn joined_selectors(&self) -> String {
        self.selectors.join(", ")
    }
}

/// One entry of [`StyleSheet::to_array`](crate::StyleSheet::to_array): a rule head and
/// its declarations in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// The selector text; groups use their comma-joined selector list.
    pub selector: String,
    /// Declarations in insertion order, duplicates preserved.
    pub declarations: Vec<Declaration>,
}

impl Rule {
    /// Values of `property` in this rule, in insertion order.
    pub fn values<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.declarations
            .iter()
            .filter(move |d| d.property == property)
            .map(|d| d.value.as_str())
    }
}
