//! Selector decomposition and selector-list canonicalization.
//!
//! A compound selector such as `a#heading.icon:active` is split by suffix marker, in
//! this order:
//!
//! 1. `:`: the pseudo-class, from the first `:` to the end
//! 2. `.`: the class, from the first `.` in what is left
//! 3. `#`: the id, from the first `#` in what is left
//!
//! Whatever remains is the element name. The canonical form is
//! `element + id + class + pseudo`. Whitespace inside a selector marks a descendant
//! chain (`#heading .icon img`); each link is decomposed on its own.

use std::fmt;

use serde::Serialize;

use crate::error::CssError;

/// The four parts of one compound selector. Each part keeps its marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompoundSelector {
    /// Bare element name, possibly empty (`#id` alone has no element).
    pub element: String,
    /// `#id`, or empty.
    pub id: String,
    /// `.class`, or empty. Chained classes stay together: `.a.b`.
    pub class: String,
    /// `:pseudo`, or empty.
    pub pseudo: String,
}

impl CompoundSelector {
    /// Decompose one compound token (no commas, no whitespace).
    ///
    /// With `xhtml` set, `element` and `pseudo` are lower-cased; `id` and `class` keep
    /// their case.
    pub fn parse(token: &str, xhtml: bool) -> Self {
        let mut rest = token;
        let pseudo = split_off_marker(&mut rest, ':');
        let class = split_off_marker(&mut rest, '.');
        let id = split_off_marker(&mut rest, '#');
        let element = rest.to_string();

        if xhtml {
            Self {
                element: element.to_lowercase(),
                id,
                class,
                pseudo: pseudo.to_lowercase(),
            }
        } else {
            Self {
                element,
                id,
                class,
                pseudo,
            }
        }
    }

    /// Returns `true` if all four parts are empty.
    pub fn is_empty(&self) -> bool {
        self.element.is_empty()
            && self.id.is_empty()
            && self.class.is_empty()
            && self.pseudo.is_empty()
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.element, self.id, self.class, self.pseudo)
    }
}

/// Cut `rest` at the first `marker`, returning the tail (marker included).
fn split_off_marker(rest: &mut &str, marker: char) -> String {
    match rest.find(marker) {
        Some(at) => {
            let (head, tail) = rest.split_at(at);
            *rest = head;
            tail.to_string()
        }
        None => String::new(),
    }
}

/// A decomposed selector: one compound, or a descendant chain of compounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorParts {
    /// A single compound selector.
    Compound(CompoundSelector),
    /// A whitespace-separated descendant chain, outermost ancestor first.
    Inheritance(Vec<CompoundSelector>),
}

impl fmt::Display for SelectorParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorParts::Compound(compound) => compound.fmt(f),
            SelectorParts::Inheritance(chain) => {
                for (i, compound) in chain.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    compound.fmt(f)?;
                }
                Ok(())
            }
        }
    }
}

/// Collapse every whitespace run to one space and trim both ends.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decompose one selector (no commas). Whitespace is normalized first.
pub fn decompose(selector: &str, xhtml: bool) -> SelectorParts {
    let normalized = collapse_whitespace(selector);
    if normalized.contains(' ') {
        SelectorParts::Inheritance(
            normalized
                .split(' ')
                .map(|link| CompoundSelector::parse(link, xhtml))
                .collect(),
        )
    } else {
        SelectorParts::Compound(CompoundSelector::parse(&normalized, xhtml))
    }
}

/// Shape of the value returned by [`parse_selectors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One comma-joined canonical string.
    #[default]
    String,
    /// A list of canonical selector strings.
    Array,
    /// A list of decompositions.
    Structured,
}

impl TryFrom<u8> for OutputMode {
    type Error = CssError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(OutputMode::String),
            1 => Ok(OutputMode::Array),
            2 => Ok(OutputMode::Structured),
            other => Err(CssError::InvalidInput(format!(
                "output mode {other} is out of range (expected 0, 1 or 2)"
            ))),
        }
    }
}

/// Result of [`parse_selectors`], one variant per [`OutputMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSelectors {
    /// `OutputMode::String`.
    Joined(String),
    /// `OutputMode::Array`.
    List(Vec<String>),
    /// `OutputMode::Structured`.
    Structured(Vec<SelectorParts>),
}

impl ParsedSelectors {
    /// The selectors as canonical strings, whatever the mode.
    pub fn into_strings(self) -> Vec<String> {
        match self {
            ParsedSelectors::Joined(joined) => joined.split(", ").map(str::to_string).collect(),
            ParsedSelectors::List(list) => list,
            ParsedSelectors::Structured(parts) => parts.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Split a comma-delimited selector list, canonicalize each item, and shape the result.
///
/// Empty items are kept as empty strings; an empty input yields one empty item.
pub fn parse_selectors(input: &str, mode: OutputMode, xhtml: bool) -> ParsedSelectors {
    let parts = input.split(',').map(|item| decompose(item, xhtml));
    match mode {
        OutputMode::String => ParsedSelectors::Joined(
            parts.map(|p| p.to_string()).collect::<Vec<_>>().join(", "),
        ),
        OutputMode::Array => ParsedSelectors::List(parts.map(|p| p.to_string()).collect()),
        OutputMode::Structured => ParsedSelectors::Structured(parts.collect()),
    }
}

/// Canonical strings for each item of a selector list.
pub(crate) fn canonical_list(input: &str, xhtml: bool) -> Vec<String> {
    parse_selectors(input, OutputMode::Array, xhtml).into_strings()
}
