//! Flattening of a namespaced XML element tree into ordered key/value nodes.
//!
//! Dia stores everything as `<dia:attribute name="..">` bags nested under
//! objects, so the flattened form keeps the document order of every key and
//! turns repeated sibling tags into lists.

use roxmltree::{Document, ExpandedName, Node};
use serde::Serialize;

use crate::error::Result;

/// Ordered mapping produced by [`flatten`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatNode {
    entries: Vec<(String, FlatValue)>,
}

/// Value stored under a key of a [`FlatNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlatValue {
    Text(String),
    Node(FlatNode),
    List(Vec<FlatValue>),
}

impl FlatValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FlatValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&FlatNode> {
        match self {
            FlatValue::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Iterate the value as a sequence: lists yield their items, anything
    /// else yields itself once.
    pub fn iter(&self) -> impl Iterator<Item = &FlatValue> {
        let items: &[FlatValue] = match self {
            FlatValue::List(items) => items,
            other => std::slice::from_ref(other),
        };
        items.iter()
    }
}

impl FlatNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Text stored directly under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FlatValue::as_text)
    }

    /// Nested node stored directly under `key`.
    pub fn node(&self, key: &str) -> Option<&FlatNode> {
        self.get(key).and_then(FlatValue::as_node)
    }

    /// Every node under `key`, whether it was stored once or repeated.
    pub fn nodes<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a FlatNode> + use<'a> {
        self.get(key)
            .into_iter()
            .flat_map(FlatValue::iter)
            .filter_map(FlatValue::as_node)
    }

    /// Insert a value, turning repeated keys into an ordered list.
    pub fn insert(&mut self, key: impl Into<String>, value: FlatValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            None => self.entries.push((key, value)),
            Some((_, FlatValue::List(items))) => items.push(value),
            Some((_, slot)) => {
                let previous = std::mem::replace(slot, FlatValue::List(Vec::new()));
                *slot = FlatValue::List(vec![previous, value]);
            }
        }
    }
}

/// Flatten an XML document, stripping `namespace` from tag and attribute names.
pub fn flatten(xml: &[u8], namespace: &str) -> Result<FlatNode> {
    let text = std::str::from_utf8(xml)?;
    let document = Document::parse(text)?;
    Ok(flatten_element(document.root_element(), namespace))
}

fn flatten_element(element: Node<'_, '_>, namespace: &str) -> FlatNode {
    let mut node = FlatNode::new();
    merge_attributes(&mut node, element, namespace);

    for child in element.children().filter(Node::is_element) {
        let tag = local_key(child.tag_name(), namespace);

        if child.children().any(|grandchild| grandchild.is_element()) {
            node.insert(tag, FlatValue::Node(flatten_element(child, namespace)));
        } else if child.attributes().len() > 0 {
            let mut leaf = FlatNode::new();
            merge_attributes(&mut leaf, child, namespace);
            if let Some(text) = child.text().filter(|text| !text.is_empty()) {
                leaf.insert(tag.clone(), FlatValue::Text(text.to_string()));
            }
            node.insert(tag, FlatValue::Node(leaf));
        } else {
            let text = child.text().unwrap_or_default().to_string();
            node.insert(tag, FlatValue::Text(text));
        }
    }

    node
}

fn merge_attributes(node: &mut FlatNode, element: Node<'_, '_>, namespace: &str) {
    for attribute in element.attributes() {
        let key = match attribute.namespace() {
            Some(ns) if ns != namespace => format!("{{{ns}}}{}", attribute.name()),
            _ => attribute.name().to_string(),
        };
        node.insert(key, FlatValue::Text(attribute.value().to_string()));
    }
}

fn local_key(name: ExpandedName<'_, '_>, namespace: &str) -> String {
    match name.namespace() {
        Some(ns) if ns != namespace => format!("{{{ns}}}{}", name.name()),
        _ => name.name().to_string(),
    }
}
