//! Serialization: CSS text, inline `style` strings, and plain rule lists.

use std::fmt;

use crate::css::model::{Declaration, Rule, Slot};
use crate::css::selector::{canonical_list, collapse_whitespace};
use crate::css::stylesheet::{Entry, StyleSheet};
use crate::options::RenderOptions;

impl StyleSheet {
    /// Rule blocks as `(selector text, declarations)`, skipping groups left without
    /// selectors.
    fn blocks(&self, groups_first: bool) -> Vec<(String, &[Slot])> {
        let mut entries: Vec<&Entry> = self.order.iter().collect();
        if groups_first {
            // Stable: keeps registration order within each kind.
            entries.sort_by_key(|e| matches!(e, Entry::Selector(_)));
        }

        entries
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Group(key) => {
                    let group = self.groups.get(*key)?;
                    if group.selectors.is_empty() {
                        return None;
                    }
                    Some((group.joined_selectors(), group.declarations.as_slice()))
                }
                Entry::Selector(selector) => {
                    let slots = self.selectors.get(selector)?;
                    Some((selector.clone(), slots.as_slice()))
                }
            })
            .collect()
    }

    /// Every rule block with its declarations, duplicates preserved.
    ///
    /// Groups appear under their comma-joined selector text. Ordering follows
    /// registration order unless the `groups_first` render option is set.
    pub fn to_array(&self) -> Vec<Rule> {
        self.blocks(self.options.render.groups_first)
            .into_iter()
            .map(|(selector, slots)| Rule {
                selector,
                declarations: slots.iter().map(|s| s.declaration.clone()).collect(),
            })
            .collect()
    }

    /// Effective declarations of one selector as `property:value;` pairs, ready for a
    /// `style="..."` attribute.
    ///
    /// Unknown selectors and selector lists give an empty string.
    pub fn to_inline(&self, selector: &str) -> String {
        let mut list = canonical_list(selector, self.options.xhtml);
        if list.len() != 1 {
            return String::new();
        }
        let selector = list.remove(0);

        self.effective_slots(&selector)
            .unwrap_or_default()
            .into_iter()
            .map(|slot| format!("{}:{};", slot.declaration.property, slot.declaration.value))
            .collect()
    }

    /// Render the stylesheet as CSS text.
    pub fn render(&self, options: &RenderOptions) -> String {
        let eol = options.line_end.as_str();
        let mut out = String::new();

        if let Some(comment) = &options.comment {
            out.push_str("/* ");
            out.push_str(comment);
            out.push_str(" */");
            out.push_str(eol);
        }

        let blocks: Vec<String> = self
            .blocks(options.groups_first)
            .into_iter()
            .map(|(selector, slots)| {
                let declarations = slots.iter().map(|s| &s.declaration);
                if options.single_line {
                    single_line_block(&selector, declarations)
                } else {
                    multi_line_block(&selector, declarations, options)
                }
            })
            .collect();

        // Multi-line blocks end with a line break; the separator adds the blank line.
        out.push_str(&blocks.join(eol));
        out
    }
}

fn multi_line_block<'a>(
    selector: &str,
    declarations: impl Iterator<Item = &'a Declaration>,
    options: &RenderOptions,
) -> String {
    let eol = options.line_end.as_str();
    let mut block = format!("{selector} {{{eol}");
    for declaration in declarations {
        block.push_str(&options.tab);
        block.push_str(&format!("{declaration};{eol}"));
    }
    block.push('}');
    block.push_str(eol);
    block
}

fn single_line_block<'a>(
    selector: &str,
    declarations: impl Iterator<Item = &'a Declaration>,
) -> String {
    let mut block = format!("{selector} {{ ");
    for declaration in declarations {
        block.push_str(&format!("{declaration}; "));
    }
    block.push('}');
    collapse_whitespace(&block)
}

impl fmt::Display for StyleSheet {
    /// Renders with the stylesheet's own render options.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&self.options.render))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn sample() -> StyleSheet {
        let mut sheet = StyleSheet::new();
        sheet.set_style("h1", "text-align", "center").unwrap();
        let g = sheet.create_group("body, html").unwrap();
        sheet.set_group_style(&g, "color", "#ffffff").unwrap();
        sheet.set_style("p", "margin", "0").unwrap();
        sheet
    }

    // ── to_array ─────────────────────────────────────────────────────

    #[test]
    fn test_to_array_registration_order() {
        let heads: Vec<_> = sample().to_array().into_iter().map(|r| r.selector).collect();
        assert_eq!(heads, vec!["h1", "body, html", "p"]);
    }

    #[test]
    fn test_to_array_groups_first() {
        let mut sheet = sample();
        sheet.options_mut().render.groups_first = true;
        let heads: Vec<_> = sheet.to_array().into_iter().map(|r| r.selector).collect();
        assert_eq!(heads, vec!["body, html", "h1", "p"]);
    }

    #[test]
    fn test_empty_group_not_rendered() {
        let mut sheet = StyleSheet::new();
        let g = sheet.create_group("a, b").unwrap();
        sheet.remove_group_selector(&g, "a, b").unwrap();
        assert!(sheet.to_array().is_empty());
        assert_eq!(sheet.to_string(), "");
    }

    // ── to_inline ────────────────────────────────────────────────────

    #[test]
    fn test_inline_unknown_selector_is_empty() {
        assert_eq!(sample().to_inline("table"), "");
        assert_eq!(sample().to_inline("body, html"), "");
    }

    #[test]
    fn test_inline_explicit_overrides_group() {
        let mut sheet = sample();
        sheet.set_style("body", "color", "black").unwrap();
        sheet.set_style("body", "margin", "0").unwrap();
        assert_eq!(sheet.to_inline("body"), "color:black;margin:0;");
        assert_eq!(sheet.to_inline("html"), "color:#ffffff;");
    }

    // ── render ───────────────────────────────────────────────────────

    #[test]
    fn test_render_multi_line() {
        assert_eq!(
            sample().to_string(),
            "h1 {\n  text-align: center;\n}\n\nbody, html {\n  color: #ffffff;\n}\n\np {\n  margin: 0;\n}\n"
        );
    }

    #[test]
    fn test_render_single_line() {
        let options = RenderOptions::new().with_single_line(true);
        assert_eq!(
            sample().render(&options),
            "h1 { text-align: center; }\nbody, html { color: #ffffff; }\np { margin: 0; }"
        );
    }

    #[test]
    fn test_render_comment_tab_and_line_end() {
        let mut sheet = StyleSheet::with_options(Options::new());
        sheet.set_style("p", "color", "red").unwrap();
        let options = RenderOptions::new()
            .with_tab("\t")
            .with_line_end("\r\n")
            .with_comment("generated");
        assert_eq!(
            sheet.render(&options),
            "/* generated */\r\np {\r\n\tcolor: red;\r\n}\r\n"
        );
    }

    #[test]
    fn test_single_line_collapses_value_whitespace() {
        let mut sheet = StyleSheet::new();
        sheet.set_style("p", "font", "12pt\n    helvetica").unwrap();
        let options = RenderOptions::new().with_single_line(true);
        assert_eq!(sheet.render(&options), "p { font: 12pt helvetica; }");
    }

    #[test]
    fn test_render_empty_block() {
        let mut sheet = StyleSheet::new();
        sheet.create_group("a, b").unwrap();
        assert_eq!(sheet.to_string(), "a, b {\n}\n");
        let options = RenderOptions::new().with_single_line(true);
        assert_eq!(sheet.render(&options), "a, b { }");
    }
}
