//! Model and render configuration.
//!
//! Both structs derive serde so an embedding application can load them from its own
//! configuration file; every field has a default.

use serde::{Deserialize, Serialize};

/// How [`StyleSheet::render`](crate::StyleSheet::render) lays out text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Collapse every rule block onto one line.
    pub single_line: bool,
    /// Indentation written before each declaration in multi-line mode.
    pub tab: String,
    /// Line terminator.
    pub line_end: String,
    /// Emit all groups before individual selectors instead of registration order.
    pub groups_first: bool,
    /// Optional comment emitted as the first line.
    pub comment: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            single_line: false,
            tab: "  ".to_string(),
            line_end: "\n".to_string(),
            groups_first: false,
            comment: None,
        }
    }
}

impl RenderOptions {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set single-line output (builder).
    pub fn with_single_line(mut self, single_line: bool) -> Self {
        self.single_line = single_line;
        self
    }

    /// Set the indentation string (builder).
    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = tab.into();
        self
    }

    /// Set the line terminator (builder).
    pub fn with_line_end(mut self, line_end: impl Into<String>) -> Self {
        self.line_end = line_end.into();
        self
    }

    /// Emit groups before individual selectors (builder).
    pub fn with_groups_first(mut self, groups_first: bool) -> Self {
        self.groups_first = groups_first;
        self
    }

    /// Set the leading comment (builder).
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Configuration of a [`StyleSheet`](crate::StyleSheet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Lower-case element names and pseudo-classes when canonicalizing selectors.
    pub xhtml: bool,
    /// Settings used by `to_string()` and `to_array()`.
    pub render: RenderOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            xhtml: true,
            render: RenderOptions::default(),
        }
    }
}

impl Options {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set XHTML compliance (builder).
    pub fn with_xhtml(mut self, xhtml: bool) -> Self {
        self.xhtml = xhtml;
        self
    }

    /// Replace the render options (builder).
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert!(opts.xhtml);
        assert!(!opts.render.single_line);
        assert_eq!(opts.render.tab, "  ");
        assert_eq!(opts.render.line_end, "\n");
        assert!(!opts.render.groups_first);
        assert!(opts.render.comment.is_none());
    }

    #[test]
    fn test_builders() {
        let opts = Options::new().with_xhtml(false).with_render(
            RenderOptions::new()
                .with_single_line(true)
                .with_tab("\t")
                .with_line_end("\r\n")
                .with_groups_first(true)
                .with_comment("generated"),
        );
        assert!(!opts.xhtml);
        assert!(opts.render.single_line);
        assert_eq!(opts.render.tab, "\t");
        assert_eq!(opts.render.line_end, "\r\n");
        assert!(opts.render.groups_first);
        assert_eq!(opts.render.comment.as_deref(), Some("generated"));
    }
}
