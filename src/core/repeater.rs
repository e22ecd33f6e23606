// UAProbe - core/repeater.rs
//
// A list repeater: instantiates a template of child components once per
// index, wraps each copy in an index-carrying proxy and hands it to a setup
// strategy for decoration.
//
// Rebuild policy: every build destroys all items and recreates them. There
// is no diffing; `render_row` is the only way to refresh a single item
// without losing its state.

use crate::util::constants;
use crate::util::error::RepeaterError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Components
// =============================================================================

/// Declarative description of one child in the item template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Component kind (e.g. "Label").
    pub kind: String,

    /// Lookup name inside an item. Defaults to the kind with a lowercase
    /// first letter ("Label" -> "label").
    #[serde(default)]
    pub name: Option<String>,

    /// Initial property values.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ComponentDescriptor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A live component created from a descriptor and owned by one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    kind: String,
    name: String,
    properties: BTreeMap<String, String>,
}

impl Component {
    fn from_descriptor(descriptor: &ComponentDescriptor) -> Self {
        let name = descriptor
            .name
            .clone()
            .unwrap_or_else(|| default_name(&descriptor.kind));
        Self {
            kind: descriptor.kind.clone(),
            name,
            properties: descriptor.properties.clone(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Visible text: the `text` property, or the kind when it is unset.
    pub fn text(&self) -> &str {
        self.get(constants::TEXT_PROPERTY).unwrap_or(&self.kind)
    }
}

fn default_name(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// Items and events
// =============================================================================

/// An event travelling up from inside an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemEvent {
    pub name: String,

    /// Index of the innermost item the event passed through.
    pub index: Option<usize>,

    /// Every index on the path, innermost first, once more than one proxy
    /// has decorated the event. Empty for single-level events.
    pub indices: Vec<usize>,
}

impl ItemEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One repeated item: owns the copy of the template and remembers its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerProxy {
    index: usize,
    children: Vec<Component>,
}

impl OwnerProxy {
    fn new(index: usize, template: &[ComponentDescriptor]) -> Self {
        Self {
            index,
            children: template.iter().map(Component::from_descriptor).collect(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Component> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Component> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Tag `event` with this item's index.
    ///
    /// A first proxy just sets `index`. When the event already carries an
    /// index (nested repeaters), the path is recorded in `indices` and the
    /// innermost index stays in `index`.
    pub fn decorate_event(&self, event: &mut ItemEvent) {
        match event.index {
            Some(inner) => {
                if event.indices.is_empty() {
                    event.indices.push(inner);
                }
                event.indices.push(self.index);
            }
            None => event.index = Some(self.index),
        }
    }
}

// =============================================================================
// Setup strategies
// =============================================================================

/// Per-item setup, invoked after an item is created and on `render_row`.
pub trait SetupItem {
    fn setup_item(&mut self, index: usize, item: &mut OwnerProxy);
}

impl<F> SetupItem for F
where
    F: FnMut(usize, &mut OwnerProxy),
{
    fn setup_item(&mut self, index: usize, item: &mut OwnerProxy) {
        self(index, item)
    }
}

/// Runs `0` (the base behaviour) and then `1` (the extension).
#[derive(Debug, Clone, Default)]
pub struct Chain<A, B>(pub A, pub B);

impl<A: SetupItem, B: SetupItem> SetupItem for Chain<A, B> {
    fn setup_item(&mut self, index: usize, item: &mut OwnerProxy) {
        self.0.setup_item(index, item);
        self.1.setup_item(index, item);
    }
}

/// Leaves items exactly as the template made them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSetup;

impl SetupItem for NoSetup {
    fn setup_item(&mut self, _index: usize, _item: &mut OwnerProxy) {}
}

// =============================================================================
// Repeater
// =============================================================================

pub struct Repeater<S> {
    template: Vec<ComponentDescriptor>,
    items: Vec<OwnerProxy>,
    setup: S,
    separator: String,
}

impl<S: SetupItem> Repeater<S> {
    /// Create an empty repeater. No items exist until the first build.
    pub fn new(template: Vec<ComponentDescriptor>, setup: S) -> Self {
        Self {
            template,
            items: Vec::new(),
            setup,
            separator: constants::DEFAULT_COLUMN_SEPARATOR.to_string(),
        }
    }

    /// Separator placed between columns by `render`.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Validate an externally supplied count, then rebuild with it.
    ///
    /// Negative counts and counts above `MAX_REPEATER_ITEMS` are rejected and
    /// leave the current items untouched.
    pub fn set_count(&mut self, count: i64) -> Result<(), RepeaterError> {
        let valid = usize::try_from(count)
            .ok()
            .filter(|c| *c <= constants::MAX_REPEATER_ITEMS);
        match valid {
            Some(c) => self.build(c),
            None => Err(RepeaterError::InvalidCount {
                count,
                max: constants::MAX_REPEATER_ITEMS,
            }),
        }
    }

    /// Destroy every item, then create `count` fresh ones from the template
    /// and run setup on each in index order.
    ///
    /// Always a full rebuild, even when `count` is unchanged.
    pub fn build(&mut self, count: usize) -> Result<(), RepeaterError> {
        if count > constants::MAX_REPEATER_ITEMS {
            return Err(RepeaterError::InvalidCount {
                count: i64::try_from(count).unwrap_or(i64::MAX),
                max: constants::MAX_REPEATER_ITEMS,
            });
        }

        let destroyed = self.items.len();
        self.items.clear();
        self.items.reserve(count);

        for index in 0..count {
            let mut item = OwnerProxy::new(index, &self.template);
            self.setup.setup_item(index, &mut item);
            self.items.push(item);
        }

        tracing::debug!(destroyed, created = count, "Repeater rebuilt");
        Ok(())
    }

    /// Rebuild with the current count.
    pub fn rebuild(&mut self) -> Result<(), RepeaterError> {
        self.build(self.items.len())
    }

    /// Run setup again on an existing item without recreating it, so any
    /// state stored in the item survives.
    pub fn render_row(&mut self, index: usize) -> Result<(), RepeaterError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(RepeaterError::IndexOutOfRange { index, len })?;
        self.setup.setup_item(index, item);
        Ok(())
    }

    /// Tag `event` as having come from the item at `index`.
    pub fn decorate_event(&self, index: usize, event: &mut ItemEvent) -> Result<(), RepeaterError> {
        let item = self.item_at(index).ok_or(RepeaterError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })?;
        item.decorate_event(event);
        Ok(())
    }
}

impl<S> Repeater<S> {
    pub fn item_at(&self, index: usize) -> Option<&OwnerProxy> {
        self.items.get(index)
    }

    pub fn item_at_mut(&mut self, index: usize) -> Option<&mut OwnerProxy> {
        self.items.get_mut(index)
    }

    pub fn items(&self) -> &[OwnerProxy] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items built by the last successful build.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn template(&self) -> &[ComponentDescriptor] {
        &self.template
    }

    pub fn setup(&self) -> &S {
        &self.setup
    }

    /// One line of text per item, children's text joined by the separator.
    pub fn render(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| {
                item.children
                    .iter()
                    .map(Component::text)
                    .collect::<Vec<_>>()
                    .join(&self.separator)
            })
            .collect()
    }
}

impl<S> std::fmt::Debug for Repeater<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repeater")
            .field("template", &self.template)
            .field("items", &self.items.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
