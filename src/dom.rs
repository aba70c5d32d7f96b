//! A flat in-memory element store standing in for the rendered page.
//!
//! Only what the page behaviours touch is modelled: tag names, ids, classes,
//! text content and inline style properties.

use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag_name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: String,
    pub style: BTreeMap<String, String>,
}

impl Element {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.add_class(class_name);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes.iter().any(|c| c == class_name)
    }

    pub fn add_class(&mut self, class_name: &str) {
        if !self.has_class(class_name) {
            self.classes.push(class_name.to_string());
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Element>,
    id_index: HashMap<String, NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element. A repeated id keeps pointing at the first element
    /// that claimed it, the way `getElementById` resolves duplicates.
    pub fn append(&mut self, element: Element) -> NodeId {
        let node = NodeId(self.nodes.len());
        if let Some(id) = &element.id {
            self.id_index.entry(id.clone()).or_insert(node);
        }
        self.nodes.push(element);
        node
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0)
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub fn by_tag(&self, tag_name: &str) -> Vec<NodeId> {
        let tag_name = tag_name.to_ascii_lowercase();
        self.select(|element| element.tag_name == tag_name)
    }

    pub fn by_class(&self, class_name: &str) -> Vec<NodeId> {
        self.select(|element| element.has_class(class_name))
    }

    pub fn text_of(&self, id: &str) -> Option<&str> {
        self.by_id(id)
            .and_then(|node| self.get(node))
            .map(|element| element.text.as_str())
    }

    /// Returns false when no element carries `id`.
    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        match self.by_id(id).and_then(|node| self.get_mut(node)) {
            Some(element) => {
                element.text = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn style_of(&self, id: &str, property: &str) -> Option<&str> {
        self.by_id(id)
            .and_then(|node| self.get(node))
            .and_then(|element| element.style.get(property))
            .map(String::as_str)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> bool {
        match self.get_mut(node) {
            Some(element) => {
                element.style.insert(property.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    pub fn set_style_by_id(&mut self, id: &str, property: &str, value: &str) -> bool {
        match self.by_id(id) {
            Some(node) => self.set_style(node, property, value),
            None => false,
        }
    }

    fn select(&self, matches: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, element)| matches(element))
            .map(|(index, _)| NodeId(index))
            .collect()
    }
}
