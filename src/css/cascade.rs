//! Cascade resolution for one selector.
//!
//! A selector draws declarations from every group that lists it, in alibi order, and
//! from its own individual declarations. For each property, the source holding the most
//! recently issued declaration of that property wins, and every value that source holds
//! for the property survives. An explicit `set_style` therefore overrides an earlier
//! group, and a group declared later overrides earlier explicit rules, as in stylesheet
//! source order.

use std::collections::HashMap;

use crate::css::model::{Group, Slot};
use crate::css::stylesheet::StyleSheet;
use crate::error::CssError;

/// Merge declarations from several sources; the result is ordered by issue order.
///
/// Per property, only the source with the newest declaration of it contributes.
fn resolve<'a>(sources: &[&'a [Slot]]) -> Vec<&'a Slot> {
    // property -> (newest seq, index of the source holding it)
    let mut winners: HashMap<&str, (u64, usize)> = HashMap::new();
    for (index, source) in sources.iter().enumerate() {
        for slot in source.iter() {
            let winner = winners
                .entry(slot.declaration.property.as_str())
                .or_insert((slot.seq, index));
            if slot.seq > winner.0 {
                *winner = (slot.seq, index);
            }
        }
    }

    let mut effective: Vec<&Slot> = sources
        .iter()
        .enumerate()
        .flat_map(|(index, source)| source.iter().map(move |slot| (index, slot)))
        .filter(|(index, slot)| {
            winners
                .get(slot.declaration.property.as_str())
                .is_some_and(|(_, winner)| winner == index)
        })
        .map(|(_, slot)| slot)
        .collect();
    effective.sort_by_key(|slot| slot.seq);
    effective
}

impl StyleSheet {
    /// Groups that list `selector`, in the order it joined them.
    pub(crate) fn groups_of<'a>(
        &'a self,
        selector: &str,
    ) -> impl Iterator<Item = &'a Group> + 'a {
        self.alibis
            .get(selector)
            .into_iter()
            .flatten()
            .filter_map(|key| self.groups.get(*key))
    }

    /// Effective declarations for a canonical selector, or `None` if the selector has
    /// neither individual declarations nor a group.
    pub(crate) fn effective_slots(&self, selector: &str) -> Option<Vec<&Slot>> {
        let mut sources: Vec<&[Slot]> = self
            .groups_of(selector)
            .map(|g| g.declarations.as_slice())
            .collect();
        let own = self.selectors.get(selector);
        if own.is_none() && sources.is_empty() {
            return None;
        }
        if let Some(own) = own {
            sources.push(own.as_slice());
        }
        Some(resolve(&sources))
    }

    /// Every effective value of `property` for `selector`, in insertion order.
    ///
    /// More than one value is returned when the winning source declared the property
    /// repeatedly; the caller decides which to use.
    pub fn get_style(&self, selector: &str, property: &str) -> Result<Vec<&str>, CssError> {
        let selector = self.canonical_selector(selector)?;
        let property = property.trim();
        let Some(effective) = self.effective_slots(&selector) else {
            return Err(CssError::NoElement(selector));
        };

        let values: Vec<&str> = effective
            .into_iter()
            .filter(|slot| slot.declaration.property == property)
            .map(|slot| slot.declaration.value.as_str())
            .collect();

        if values.is_empty() {
            return Err(CssError::NoElementProperty {
                selector,
                property: property.to_string(),
            });
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::model::{Declaration, GroupId};

    fn slot(seq: u64, property: &str, value: &str) -> Slot {
        Slot {
            seq,
            declaration: Declaration::new(property, value),
        }
    }

    fn values<'a>(slots: &[&'a Slot]) -> Vec<&'a str> {
        slots.iter().map(|s| s.declaration.value.as_str()).collect()
    }

    // ── resolve ──────────────────────────────────────────────────────

    #[test]
    fn test_resolve_later_source_wins_per_property() {
        let group = vec![slot(1, "color", "red"), slot(4, "margin", "0")];
        let own = vec![slot(2, "color", "blue"), slot(3, "margin", "1em")];
        assert_eq!(values(&resolve(&[&group[..], &own[..]])), vec!["blue", "0"]);
    }

    #[test]
    fn test_resolve_keeps_all_values_of_winner() {
        let group = vec![slot(1, "height", "10px")];
        let own = vec![slot(2, "height", "81px"), slot(3, "height", "99px")];
        assert_eq!(values(&resolve(&[&group[..], &own[..]])), vec!["81px", "99px"]);
    }

    #[test]
    fn test_resolve_across_groups() {
        let first = vec![slot(1, "color", "red"), slot(2, "padding", "0")];
        let second = vec![slot(3, "color", "green")];
        let own = vec![slot(4, "margin", "0")];
        assert_eq!(
            values(&resolve(&[&first[..], &second[..], &own[..]])),
            vec!["0", "green", "0"]
        );
    }

    #[test]
    fn test_resolve_orders_by_issue() {
        let group = vec![slot(2, "padding", "1em"), slot(5, "color", "red")];
        let own = vec![slot(1, "font", "Arial"), slot(7, "border", "0")];
        assert_eq!(values(&resolve(&[&group[..], &own[..]])), vec!["Arial", "1em", "red", "0"]);
    }

    // ── get_style ────────────────────────────────────────────────────

    #[test]
    fn test_group_value_reaches_member() {
        let mut sheet = StyleSheet::new();
        let g = sheet.create_group("body, html").unwrap();
        sheet.set_group_style(&g, "color", "#ffffff").unwrap();
        assert_eq!(sheet.get_style("body", "color").unwrap(), vec!["#ffffff"]);
        assert_eq!(sheet.get_style("HTML", "color").unwrap(), vec!["#ffffff"]);
    }

    #[test]
    fn test_every_group_contributes() {
        let mut sheet = StyleSheet::new();
        let g1 = sheet.create_group("html, body").unwrap();
        sheet.set_group_style(&g1, "padding", "0").unwrap();
        sheet.set_group_style(&g1, "color", "red").unwrap();
        let g2 = sheet.create_group("p, body").unwrap();
        sheet.set_group_style(&g2, "margin", "4px").unwrap();
        sheet.set_group_style(&g2, "color", "green").unwrap();

        assert_eq!(sheet.get_style("body", "margin").unwrap(), vec!["4px"]);
        assert_eq!(sheet.get_style("body", "padding").unwrap(), vec!["0"]);
        assert_eq!(sheet.get_style("body", "color").unwrap(), vec!["green"]);
        assert_eq!(sheet.get_style("html", "color").unwrap(), vec!["red"]);
        assert!(matches!(
            sheet.get_style("html", "margin"),
            Err(CssError::NoElementProperty { .. })
        ));
    }

    #[test]
    fn test_earlier_group_redeclared_later_wins() {
        let mut sheet = StyleSheet::new();
        let g1 = sheet.create_group("a, b").unwrap();
        let g2 = sheet.create_group("a, i").unwrap();
        sheet.set_group_style(&g2, "color", "green").unwrap();
        sheet.set_group_style(&g1, "color", "red").unwrap();
        assert_eq!(sheet.get_style("a", "color").unwrap(), vec!["red"]);
    }

    #[test]
    fn test_property_name_is_trimmed() {
        let mut sheet = StyleSheet::new();
        sheet.set_style("ul li", " a ", "1").unwrap();
        assert_eq!(sheet.get_style("ul li", " a").unwrap(), vec!["1"]);
        assert_eq!(sheet.get_style("ul li", "a").unwrap(), vec!["1"]);
    }

    #[test]
    fn test_unknown_selector() {
        let sheet = StyleSheet::new();
        assert_eq!(sheet.get_style("h1", "color"), Err(CssError::NoElement("h1".into())));
    }

    #[test]
    fn test_orphaned_after_unset() {
        let mut sheet = StyleSheet::new();
        let g: GroupId = sheet.create_group("body, html").unwrap();
        sheet.set_group_style(&g, "color", "red").unwrap();
        sheet.set_style("html", "margin", "0").unwrap();
        sheet.unset_group(&g).unwrap();

        assert_eq!(sheet.get_style("body", "color"), Err(CssError::NoElement("body".into())));
        assert!(matches!(
            sheet.get_style("html", "color"),
            Err(CssError::NoElementProperty { .. })
        ));
        assert_eq!(sheet.get_style("html", "margin").unwrap(), vec!["0"]);
    }

    #[test]
    fn test_same_style_shares_values() {
        let mut sheet = StyleSheet::new();
        sheet.set_style("p", "color", "black").unwrap();
        sheet.set_same_style("div#black", "p").unwrap();
        sheet.set_style("p", "margin-left", "3em").unwrap();

        assert_eq!(sheet.get_style("div#black", "color").unwrap(), vec!["black"]);
        assert_eq!(sheet.get_style("p", "color").unwrap(), vec!["black"]);
        assert!(sheet.get_style("div#black", "margin-left").is_err());
    }

    #[test]
    fn test_same_style_keeps_inherited_group_values() {
        let mut sheet = StyleSheet::new();
        let g = sheet.create_group("h2, h3").unwrap();
        sheet.set_group_style(&g, "color", "red").unwrap();
        sheet.set_style("h2", "margin", "0").unwrap();
        sheet.set_same_style(".x", "h2").unwrap();

        assert_eq!(sheet.get_style("h2", "color").unwrap(), vec!["red"]);
        assert_eq!(sheet.to_inline("h2"), "color:red;margin:0;");
        assert_eq!(sheet.get_style(".x", "margin").unwrap(), vec!["0"]);
        assert!(sheet.get_style(".x", "color").is_err());
    }
}
