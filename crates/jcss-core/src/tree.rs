//! The canonical document: an arena of rule nodes built by successive `add`
//! calls.
//!
//! Maps deep-merge key by key, leaves collide last-write-wins, and a sequence
//! of maps folds left-to-right into one map so a later entry overrides an
//! earlier one.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{CompileError, KeyPath, Result};

/// Index of a node inside a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: Self = Self(0);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    Node(NodeId),
    /// Opaque text emitted verbatim at its position in the walk.
    Raw(String),
}

impl Child {
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Child::Node(id) => Some(*id),
            Child::Raw(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    /// Key text as authored. Empty for the root.
    pub key: String,
    /// Back-reference used for diagnostics only.
    pub parent: Option<NodeId>,
    /// Non-map leaves in first-seen order: scalars, and lists of scalars that
    /// may be extension arguments.
    pub declarations: IndexMap<String, Value>,
    pub children: Vec<Child>,
}

impl Node {
    fn new(key: String, parent: Option<NodeId>) -> Self {
        Self {
            key,
            parent,
            declarations: IndexMap::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(String::new(), None)],
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// True when nothing has been added since creation or the last clear.
    pub fn is_empty(&self) -> bool {
        let root = self.node(NodeId::ROOT);
        root.declarations.is_empty() && root.children.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Child of `id` whose key is exactly `key`.
    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        self.node(id).children.iter().find_map(|child| match child {
            Child::Node(child_id) if self.node(*child_id).key == key => Some(*child_id),
            _ => None,
        })
    }

    /// Merge one `add` submission into the document.
    pub fn merge(&mut self, fragment: &Value) -> Result<()> {
        match fragment {
            Value::Object(map) => {
                self.merge_map(NodeId::ROOT, map, None);
                Ok(())
            }
            Value::Array(items) if is_fragment_sequence(items) => {
                self.merge_sequence(NodeId::ROOT, items, None);
                Ok(())
            }
            Value::Array(items) if items.is_empty() => Ok(()),
            other => Err(CompileError::InvalidFragment {
                reason: format!(
                    "expected a map or a sequence of maps, found {}",
                    value_kind(other)
                ),
            }),
        }
    }

    pub fn push_raw(&mut self, text: String) {
        self.node_mut(NodeId::ROOT).children.push(Child::Raw(text));
    }

    /// Deep-merge `map` into node `id`.
    ///
    /// With a `slot`, declaration keys new to the node are inserted from that
    /// position onwards instead of appended; keys already present keep their
    /// position and take the new value.
    pub fn merge_map(&mut self, id: NodeId, map: &Map<String, Value>, mut slot: Option<&mut usize>) {
        for (key, value) in map {
            match value {
                Value::Object(inner) => {
                    let child = self.child_or_insert(id, key, slot.as_deref_mut());
                    self.merge_map(child, inner, None);
                }
                Value::Array(items) if is_fragment_sequence(items) => {
                    let child = self.child_or_insert(id, key, slot.as_deref_mut());
                    self.merge_sequence(child, items, None);
                }
                leaf => self.set_declaration(id, key, leaf.clone(), slot.as_deref_mut()),
            }
        }
    }

    pub fn merge_sequence(&mut self, id: NodeId, items: &[Value], mut slot: Option<&mut usize>) {
        for item in items {
            match item {
                Value::Object(map) => self.merge_map(id, map, slot.as_deref_mut()),
                Value::Array(inner) => self.merge_sequence(id, inner, slot.as_deref_mut()),
                _ => {}
            }
        }
    }

    /// Remove `child` from the children of `parent`. The arena slot stays.
    pub fn detach(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent)
            .children
            .retain(|entry| entry.node_id() != Some(child));
    }

    /// Rebuild the authored map for the subtree at `id`.
    pub fn to_value(&self, id: NodeId) -> Value {
        let node = self.node(id);
        let mut map = Map::new();
        for (key, value) in &node.declarations {
            map.insert(key.clone(), value.clone());
        }
        for child in node.children.iter().filter_map(Child::node_id) {
            map.insert(self.node(child).key.clone(), self.to_value(child));
        }
        Value::Object(map)
    }

    pub fn key_path(&self, id: NodeId) -> KeyPath {
        let mut keys = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if node.parent.is_some() {
                keys.push(node.key.clone());
            }
            current = node.parent;
        }
        keys.reverse();
        KeyPath::from(keys)
    }

    fn child_or_insert(&mut self, id: NodeId, key: &str, slot: Option<&mut usize>) -> NodeId {
        if let Some(existing) = self.child(id, key) {
            return existing;
        }
        // a map replaces a leaf of the same name
        if let Some((index, _, _)) = self.node_mut(id).declarations.shift_remove_full(key) {
            if let Some(slot) = slot {
                if index < *slot {
                    *slot -= 1;
                }
            }
        }

        let child = NodeId(self.nodes.len());
        self.nodes.push(Node::new(key.to_string(), Some(id)));
        self.node_mut(id).children.push(Child::Node(child));
        child
    }

    fn set_declaration(&mut self, id: NodeId, key: &str, value: Value, slot: Option<&mut usize>) {
        if let Some(existing) = self.child(id, key) {
            self.detach(id, existing);
        }

        let declarations = &mut self.node_mut(id).declarations;
        if let Some(current) = declarations.get_mut(key) {
            *current = value;
            return;
        }
        match slot {
            Some(index) => {
                *index = (*index).min(declarations.len());
                declarations.shift_insert(*index, key.to_string(), value);
                *index += 1;
            }
            None => {
                declarations.insert(key.to_string(), value);
            }
        }
    }
}

/// A sequence folds into one node when it holds at least one map and nothing
/// but maps (or nested sequences of maps). Anything else, the empty sequence
/// included, is a list leaf.
pub(crate) fn is_fragment_sequence(items: &[Value]) -> bool {
    holds_only_fragments(items) && holds_a_map(items)
}

fn holds_only_fragments(items: &[Value]) -> bool {
    items.iter().all(|item| match item {
        Value::Object(_) => true,
        Value::Array(inner) => holds_only_fragments(inner),
        _ => false,
    })
}

fn holds_a_map(items: &[Value]) -> bool {
    items.iter().any(|item| match item {
        Value::Object(_) => true,
        Value::Array(inner) => holds_a_map(inner),
        _ => false,
    })
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}
