//! Interactive elements of an island
//!
//! Just enough of a control tree to find triggers and argument sources:
//! every element has attributes, an optional input value, its text content,
//! and a parent. Index 0 is always the island root.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub const ROOT: ElementId = ElementId(0);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    parent: Option<ElementId>,
    attrs: BTreeMap<String, String>,
    value: Option<String>,
    text: String,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder: give the element an input value
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Builder: set text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn input_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn text_content(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }
}

/// Element arena rooted at the island
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTree {
    elements: Vec<Element>,
}

impl ElementTree {
    pub fn new(root: Element) -> Self {
        Self { elements: vec![Element { parent: None, ..root }] }
    }

    /// Append `element` under `parent`. An unknown parent attaches to the root.
    pub fn append(&mut self, parent: ElementId, mut element: Element) -> ElementId {
        let parent = if parent.0 < self.elements.len() { parent } else { ElementId::ROOT };
        element.parent = Some(parent);
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    /// Nearest element, starting at `id` and walking up, that has `attr`
    pub fn closest(&self, id: ElementId, attr: &str) -> Option<(ElementId, &Element)> {
        let mut current = Some(id);
        while let Some(cur) = current {
            let element = self.get(cur)?;
            if element.get_attr(attr).is_some() {
                return Some((cur, element));
            }
            current = element.parent;
        }
        None
    }

    /// First element whose `attr` equals `value`
    pub fn find(&self, attr: &str, value: &str) -> Option<ElementId> {
        self.elements.iter()
            .position(|e| e.get_attr(attr) == Some(value))
            .map(ElementId)
    }

    /// All elements below the root, in document order, that have `attr`
    pub fn descendants_with<'a>(&'a self, attr: &str) -> impl Iterator<Item = &'a Element> + 'a {
        let attr = attr.to_string();
        self.elements.iter().skip(1).filter(move |e| e.get_attr(&attr).is_some())
    }
}
