//! # html-css
//!
//! An in-memory model of a CSS stylesheet for HTML generation.
//!
//! html-css keeps rule blocks the way a page author builds them: individual selectors
//! with their declarations, plus *groups* that share one declaration block across several
//! selectors. Stylesheets can be built programmatically, parsed from CSS text, queried for
//! effective values, and written back out as CSS or inline `style` attributes.
//!
//! ## Core Systems
//!
//! - **[`css::selector`]**: Selector decomposition and selector-list canonicalization
//! - **[`css::parser`]**: logos-based stylesheet parser with comment and voice-family handling
//! - **[`css::stylesheet`]**: The [`StyleSheet`] model: selectors, groups, alibis
//! - **[`css::cascade`]**: Effective values from a selector's own rules and its groups
//! - **[`css::render`]**: CSS text, inline style strings, rule arrays
//! - **[`options`]**: Serde-loadable compliance and rendering options
//! - **[`error`]**: [`CssError`]
//!
//! ## Example
//!
//! ```
//! use html_css::StyleSheet;
//!
//! let mut sheet = StyleSheet::new();
//! sheet.parse_string("body, html { color: #ffffff; }").unwrap();
//! sheet.set_style("body", "margin", "0").unwrap();
//!
//! assert_eq!(sheet.get_style("html", "color").unwrap(), vec!["#ffffff"]);
//! assert_eq!(sheet.to_inline("body"), "color:#ffffff;margin:0;");
//! ```

// Foundation
pub mod error;
pub mod options;

// Core systems
pub mod css;

pub use css::model::{Declaration, GroupId, Rule};
pub use css::parser::ParseError;
pub use css::selector::{CompoundSelector, OutputMode, ParsedSelectors, SelectorParts};
pub use css::stylesheet::StyleSheet;
pub use error::CssError;
pub use options::{Options, RenderOptions};
