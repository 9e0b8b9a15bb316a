//! The style model: individual declarations, groups, and the alibi index.
//!
//! Groups live in a slotmap arena. Three structures are kept consistent on every
//! mutation:
//!
//! - `group_index`: caller-visible [`GroupId`] → arena key
//! - `alibis`: selector → keys of the groups that list it, in registration order
//! - `order`: every rule block (group or individual selector) in registration order
//!
//! Every declaration gets a sequence number when it is issued; the cascade in
//! [`crate::css::cascade`] uses it to decide which source was declared last.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::css::model::{Declaration, Group, GroupId, GroupKey, Slot};
use crate::css::parser::parse_stylesheet;
use crate::css::selector::{canonical_list, parse_selectors, OutputMode, ParsedSelectors};
use crate::error::CssError;
use crate::options::Options;

/// One rule block in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Entry {
    Group(GroupKey),
    Selector(String),
}

/// Where a parsed rule block's declarations go.
enum Target {
    Group(Vec<String>),
    Selector(String),
}

/// An in-memory stylesheet.
///
/// Not synchronized: share it across threads only behind your own lock.
#[derive(Debug, Default)]
pub struct StyleSheet {
    pub(crate) options: Options,
    pub(crate) groups: SlotMap<GroupKey, Group>,
    group_index: HashMap<GroupId, GroupKey>,
    pub(crate) alibis: HashMap<String, Vec<GroupKey>>,
    pub(crate) selectors: HashMap<String, Vec<Slot>>,
    pub(crate) order: Vec<Entry>,
    group_count: usize,
    next_seq: u64,
}

impl StyleSheet {
    /// Create an empty stylesheet with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stylesheet with the given options.
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable access to the options. Selectors already stored are not re-canonicalized.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Turn lower-casing of element names and pseudo-classes on or off.
    pub fn set_xhtml_compliance(&mut self, xhtml: bool) {
        self.options.xhtml = xhtml;
    }

    /// Returns `true` if the stylesheet holds no rule blocks.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // ── Selectors ────────────────────────────────────────────────────

    /// Canonicalize a selector list with this stylesheet's XHTML setting.
    pub fn parse_selectors(&self, selectors: &str, mode: OutputMode) -> ParsedSelectors {
        parse_selectors(selectors, mode, self.options.xhtml)
    }

    /// Canonical, de-duplicated selectors of a list. Empty items are rejected.
    fn canonical_selectors(&self, selectors: &str) -> Result<Vec<String>, CssError> {
        let mut result: Vec<String> = Vec::new();
        for selector in canonical_list(selectors, self.options.xhtml) {
            if selector.is_empty() {
                return Err(CssError::InvalidInput(format!(
                    "selector list '{selectors}' contains an empty selector"
                )));
            }
            if !result.contains(&selector) {
                result.push(selector);
            }
        }
        Ok(result)
    }

    /// Canonical form of exactly one selector.
    pub(crate) fn canonical_selector(&self, selector: &str) -> Result<String, CssError> {
        let mut list = self.canonical_selectors(selector)?;
        match list.len() {
            1 => Ok(list.remove(0)),
            n => Err(CssError::InvalidInput(format!(
                "'{selector}' names {n} selectors; use a group for selector lists"
            ))),
        }
    }

    // ── Individual declarations ──────────────────────────────────────

    /// Append `property: value` to the declarations of `selector`.
    ///
    /// Existing declarations of the same property are kept; the new one is added after
    /// them.
    pub fn set_style(
        &mut self,
        selector: &str,
        property: &str,
        value: &str,
    ) -> Result<(), CssError> {
        let selector = self.canonical_selector(selector)?;
        let declaration = checked_declaration(property, value)?;
        self.push_style(selector, declaration);
        Ok(())
    }

    fn push_style(&mut self, selector: String, declaration: Declaration) {
        let slot = self.next_slot(declaration);
        match self.selectors.get_mut(&selector) {
            Some(slots) => slots.push(slot),
            None => {
                self.order.push(Entry::Selector(selector.clone()));
                self.selectors.insert(selector, vec![slot]);
            }
        }
    }

    /// Make the selectors in `new` share the declarations of `old`.
    ///
    /// `old`'s individual declarations move into a new group `{old, new...}` that takes
    /// `old`'s place in the stylesheet. Returns the new group's id.
    pub fn set_same_style(&mut self, new: &str, old: &str) -> Result<GroupId, CssError> {
        let old = self.canonical_selector(old)?;
        let others = self.canonical_selectors(new)?;
        if !self.selectors.contains_key(&old) {
            return Err(CssError::NoElement(old));
        }

        let mut members = vec![old.clone()];
        members.extend(others.into_iter().filter(|s| *s != old));

        let id = self.auto_group_id();
        let mut group = Group::new(id.clone());
        group.declarations = self.selectors.remove(&old).unwrap_or_default();
        let key = self.attach_group(group, members);

        match self.order.iter().position(|e| *e == Entry::Selector(old.clone())) {
            Some(at) => self.order[at] = Entry::Group(key),
            None => self.order.push(Entry::Group(key)),
        }

        log::debug!(target: "css", "Selector '{old}' now shares its style through group {id}");
        Ok(id)
    }

    // ── Groups ───────────────────────────────────────────────────────

    /// Create a group for a comma-delimited selector list with an auto-assigned id.
    pub fn create_group(&mut self, selectors: &str) -> Result<GroupId, CssError> {
        let members = self.canonical_selectors(selectors)?;
        let id = self.auto_group_id();
        self.register_group(id.clone(), members);
        Ok(id)
    }

    /// Create a group under a caller-chosen id. Fails if the id is already live.
    pub fn create_group_with_id(
        &mut self,
        selectors: &str,
        id: impl Into<GroupId>,
    ) -> Result<GroupId, CssError> {
        let id = id.into();
        if self.group_index.contains_key(&id) {
            return Err(CssError::InvalidGroup(id));
        }
        let members = self.canonical_selectors(selectors)?;
        self.register_group(id.clone(), members);
        Ok(id)
    }

    /// Destroy a group: its declarations and every alibi entry pointing at it.
    ///
    /// Individual declarations of its selectors are untouched.
    pub fn unset_group(&mut self, group: &GroupId) -> Result<(), CssError> {
        let key = self.group_key(group)?;
        self.group_index.remove(group);
        if let Some(removed) = self.groups.remove(key) {
            for selector in &removed.selectors {
                self.drop_alibi(selector, key);
            }
        }
        self.order.retain(|e| *e != Entry::Group(key));
        log::debug!(target: "css", "Unset group {group}");
        Ok(())
    }

    /// Append `property: value` to a group's declarations.
    pub fn set_group_style(
        &mut self,
        group: &GroupId,
        property: &str,
        value: &str,
    ) -> Result<(), CssError> {
        let key = self.group_key(group)?;
        let declaration = checked_declaration(property, value)?;
        let slot = self.next_slot(declaration);
        if let Some(group) = self.groups.get_mut(key) {
            group.declarations.push(slot);
        }
        Ok(())
    }

    /// Every value the group declares for `property`, in insertion order.
    pub fn get_group_style(&self, group: &GroupId, property: &str) -> Result<Vec<&str>, CssError> {
        let key = self.group_key(group)?;
        let property = property.trim();
        let group = &self.groups[key];
        let values: Vec<&str> = group
            .declarations
            .iter()
            .filter(|slot| slot.declaration.property == property)
            .map(|slot| slot.declaration.value.as_str())
            .collect();
        if values.is_empty() {
            return Err(CssError::NoElementProperty {
                selector: group.joined_selectors(),
                property: property.to_string(),
            });
        }
        Ok(values)
    }

    /// Add selectors to a group. Selectors already in the group are skipped.
    pub fn add_group_selector(&mut self, group: &GroupId, selectors: &str) -> Result<(), CssError> {
        let key = self.group_key(group)?;
        let members = self.canonical_selectors(selectors)?;
        for selector in members {
            let group = &mut self.groups[key];
            if group.selectors.contains(&selector) {
                continue;
            }
            group.selectors.push(selector.clone());
            self.register_alibi(selector, key);
        }
        Ok(())
    }

    /// Remove selectors from a group. Selectors not in the group are ignored.
    pub fn remove_group_selector(
        &mut self,
        group: &GroupId,
        selectors: &str,
    ) -> Result<(), CssError> {
        let key = self.group_key(group)?;
        let members = self.canonical_selectors(selectors)?;
        for selector in members {
            self.groups[key].selectors.retain(|s| *s != selector);
            self.drop_alibi(&selector, key);
        }
        Ok(())
    }

    /// Ids of the live groups, in registration order.
    pub fn group_ids(&self) -> Vec<GroupId> {
        self.order
            .iter()
            .filter_map(|e| match e {
                Entry::Group(key) => self.groups.get(*key).map(|g| g.id.clone()),
                Entry::Selector(_) => None,
            })
            .collect()
    }

    /// The canonical selectors of a group, in registration order.
    pub fn group_selectors(&self, group: &GroupId) -> Result<&[String], CssError> {
        let key = self.group_key(group)?;
        Ok(&self.groups[key].selectors)
    }

    fn group_key(&self, group: &GroupId) -> Result<GroupKey, CssError> {
        self.group_index
            .get(group)
            .copied()
            .ok_or_else(|| CssError::NoGroup(group.clone()))
    }

    /// Next free integer id. Integers taken by caller-supplied ids are skipped.
    fn auto_group_id(&mut self) -> GroupId {
        loop {
            self.group_count += 1;
            let id = GroupId::Index(self.group_count);
            if !self.group_index.contains_key(&id) {
                return id;
            }
        }
    }

    fn register_group(&mut self, id: GroupId, members: Vec<String>) -> GroupKey {
        let key = self.attach_group(Group::new(id.clone()), members);
        self.order.push(Entry::Group(key));
        log::debug!(target: "css", "Created group {id}: {}", self.groups[key].joined_selectors());
        key
    }

    /// Insert `group` into the arena with `members` as its selectors. Does not touch
    /// `order`.
    fn attach_group(&mut self, mut group: Group, members: Vec<String>) -> GroupKey {
        let id = group.id.clone();
        group.selectors = members.clone();
        let key = self.groups.insert(group);
        self.group_index.insert(id, key);
        for selector in members {
            self.register_alibi(selector, key);
        }
        key
    }

    fn register_alibi(&mut self, selector: String, key: GroupKey) {
        let keys = self.alibis.entry(selector).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    fn drop_alibi(&mut self, selector: &str, key: GroupKey) {
        if let Some(keys) = self.alibis.get_mut(selector) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.alibis.remove(selector);
            }
        }
    }

    fn next_slot(&mut self, declaration: Declaration) -> Slot {
        self.next_seq += 1;
        Slot {
            seq: self.next_seq,
            declaration,
        }
    }

    // ── Text input ───────────────────────────────────────────────────

    /// Parse CSS text and append its rule blocks.
    ///
    /// Blocks with more than one selector become auto-id groups. The whole input is
    /// validated first, so on error the stylesheet is unchanged.
    pub fn parse_string(&mut self, css: &str) -> Result<(), CssError> {
        self.parse_data([css])
    }

    /// Parse several CSS texts in order, atomically.
    pub fn parse_data<I, S>(&mut self, sources: I) -> Result<(), CssError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut planned = Vec::new();
        for source in sources {
            for block in parse_stylesheet(source.as_ref())? {
                let mut members = self.canonical_selectors(&block.selectors)?;
                let target = if members.len() > 1 {
                    Target::Group(members)
                } else {
                    Target::Selector(members.remove(0))
                };
                planned.push((target, block.declarations));
            }
        }

        for (target, declarations) in planned {
            match target {
                Target::Group(members) => {
                    let id = self.auto_group_id();
                    let key = self.register_group(id, members);
                    for declaration in declarations {
                        let slot = self.next_slot(declaration);
                        self.groups[key].declarations.push(slot);
                    }
                }
                Target::Selector(selector) => {
                    for declaration in declarations {
                        self.push_style(selector.clone(), declaration);
                    }
                }
            }
        }
        Ok(())
    }
}

fn checked_declaration(property: &str, value: &str) -> Result<Declaration, CssError> {
    let property = property.trim();
    if property.is_empty() {
        return Err(CssError::InvalidInput("property name is empty".into()));
    }
    Ok(Declaration::new(property, value.trim()))
}
