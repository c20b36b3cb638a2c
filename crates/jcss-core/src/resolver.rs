use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::{CompileError, Result};
use crate::registry::Registry;
use crate::tree::{self, Child, Document, NodeId};

/// How many nested expansions a single key may go through before the
/// resolver gives up and reports a cycle.
pub const MAX_RESOLUTION_DEPTH: usize = 32;

/// Expand every extension invocation in `document`, to a fixpoint.
///
/// The input stays untouched; expansion happens on a copy so the canonical
/// document can be recompiled with a different registry later.
pub fn resolve(document: &Document, registry: &Registry) -> Result<Document> {
    let mut resolved = document.clone();
    if registry.is_empty() {
        return Ok(resolved);
    }

    let mut expansions = 0;
    resolve_node(&mut resolved, NodeId::ROOT, 0, registry, &mut expansions)?;
    debug!(expansions, "resolved extensions");
    Ok(resolved)
}

/// Depth of every key merged into one node. Authored keys sit at the node's
/// base depth; keys produced by an expansion at depth `d` sit at `d + 1`.
struct Depths {
    base: usize,
    by_key: HashMap<String, usize>,
}

impl Depths {
    fn new(base: usize) -> Self {
        Self {
            base,
            by_key: HashMap::new(),
        }
    }

    fn of(&self, key: &str) -> usize {
        self.by_key.get(key).copied().unwrap_or(self.base)
    }

    fn mark(&mut self, fragment: &Value, depth: usize) {
        match fragment {
            Value::Object(map) => {
                for key in map.keys() {
                    self.by_key.insert(key.clone(), depth);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.mark(item, depth);
                }
            }
            _ => {}
        }
    }
}

enum Invocation {
    /// Scalar or list argument, found at this declaration slot.
    Declaration { slot: usize, name: String },
    /// Map argument carried by a child node.
    Node { child: NodeId, name: String },
}

fn next_invocation(document: &Document, id: NodeId, registry: &Registry) -> Option<Invocation> {
    let node = document.node(id);
    if let Some((slot, name)) = node
        .declarations
        .keys()
        .enumerate()
        .find(|(_, key)| registry.contains(key))
    {
        return Some(Invocation::Declaration {
            slot,
            name: name.clone(),
        });
    }

    node.children
        .iter()
        .filter_map(Child::node_id)
        .find(|child| registry.contains(&document.node(*child).key))
        .map(|child| Invocation::Node {
            child,
            name: document.node(child).key.clone(),
        })
}

fn resolve_node(
    document: &mut Document,
    id: NodeId,
    base_depth: usize,
    registry: &Registry,
    expansions: &mut usize,
) -> Result<()> {
    let mut depths = Depths::new(base_depth);

    while let Some(invocation) = next_invocation(document, id, registry) {
        match invocation {
            Invocation::Declaration { slot, name } => {
                let depth = depths.of(&name);
                let argument = document
                    .node_mut(id)
                    .declarations
                    .shift_remove(&name)
                    .unwrap_or(Value::Null);
                let mut slot = slot;
                expand(document, id, &name, &argument, Some(&mut slot), depth, registry, &mut depths)?;
            }
            Invocation::Node { child, name } => {
                let depth = depths.of(&name);
                let argument = document.to_value(child);
                document.detach(id, child);
                expand(document, id, &name, &argument, None, depth, registry, &mut depths)?;
            }
        }
        *expansions += 1;
    }

    let children: Vec<NodeId> = document
        .node(id)
        .children
        .iter()
        .filter_map(Child::node_id)
        .collect();
    for child in children {
        let depth = depths.of(&document.node(child).key);
        resolve_node(document, child, depth, registry, expansions)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn expand(
    document: &mut Document,
    id: NodeId,
    name: &str,
    argument: &Value,
    slot: Option<&mut usize>,
    depth: usize,
    registry: &Registry,
    depths: &mut Depths,
) -> Result<()> {
    if depth >= MAX_RESOLUTION_DEPTH {
        return Err(CompileError::CyclicExtension {
            name: name.to_string(),
            depth,
        });
    }
    let Some(extension) = registry.get(name) else {
        return Ok(());
    };

    trace!(extension = name, depth, "expanding");
    let fragment = extension(argument);
    depths.mark(&fragment, depth + 1);

    match &fragment {
        Value::Object(map) => document.merge_map(id, map, slot),
        Value::Array(items) if tree::is_fragment_sequence(items) => {
            document.merge_sequence(id, items, slot)
        }
        Value::Null => {}
        Value::Array(items) if items.is_empty() => {}
        other => warn!(
            extension = name,
            "extension returned {} instead of a map; ignoring it",
            tree::value_kind(other)
        ),
    }
    Ok(())
}
