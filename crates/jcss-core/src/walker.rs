//! Tree walk: builds the selector path of every declaration-bearing node and
//! hoists at-rule blocks into their own buckets.
//!
//! At-rule keys never add a selector level. Their content is walked with the
//! parent paths in effect where they appear (or none, for `@keyframes`), and
//! every fact it yields lands in the bucket for the condition chain so far.

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::ast::{Fact, Stylesheet};
use crate::emitter;
use crate::error::{CompileError, Result};
use crate::options::CompileOptions;
use crate::selector::{self, KeyKind};
use crate::tree::{Child, Document, NodeId};

/// Walk a resolved document into per-bucket rule tables.
pub fn build(document: &Document, options: &CompileOptions) -> Result<Stylesheet> {
    let mut walker = Walker {
        document,
        keep_camel_case: options.keep_camel_case,
        sheet: Stylesheet::default(),
    };
    walker.walk(NodeId::ROOT, &[], &[])?;

    debug!(
        rules = walker.sheet.root.rules().count(),
        buckets = walker.sheet.buckets.len(),
        "built rule tables"
    );
    Ok(walker.sheet)
}

struct Walker<'d> {
    document: &'d Document,
    keep_camel_case: bool,
    sheet: Stylesheet,
}

impl Walker<'_> {
    fn walk(&mut self, id: NodeId, paths: &[String], chain: &[String]) -> Result<()> {
        let document = self.document;
        let node = document.node(id);

        for (property, value) in &node.declarations {
            let Some(value) = render_value(value) else {
                trace!(property = property.as_str(), "skipping valueless declaration");
                continue;
            };
            if paths.is_empty() {
                warn!(
                    property = property.as_str(),
                    at = %document.key_path(id),
                    "declaration outside of any selector dropped"
                );
                continue;
            }

            let property = emitter::property_name(property, self.keep_camel_case);
            let table = self.sheet.table_mut(chain);
            for path in paths {
                table.apply(Fact {
                    selector: path.clone(),
                    property: property.to_string(),
                    value: value.clone(),
                });
            }
        }

        for child in &node.children {
            match child {
                Child::Raw(text) => self.sheet.table_mut(chain).push_raw(text.clone()),
                Child::Node(child_id) => self.walk_child(*child_id, paths, chain)?,
            }
        }
        Ok(())
    }

    fn walk_child(&mut self, id: NodeId, paths: &[String], chain: &[String]) -> Result<()> {
        let document = self.document;
        let key = document.node(id).key.as_str();

        match selector::key_kind(key) {
            KeyKind::Conditional(condition) => {
                let chain = extend_chain(chain, condition);
                self.sheet.table_mut(&chain);
                self.walk(id, paths, &chain)
            }
            KeyKind::Keyframes(condition) => {
                let chain = extend_chain(chain, condition);
                self.sheet.table_mut(&chain);
                self.walk(id, &[], &chain)
            }
            KeyKind::Standalone(at_rule) => self.walk(id, &[at_rule.to_string()], chain),
            KeyKind::Selector(key) => {
                let alternatives =
                    selector::split_alternatives(key).map_err(|reason| CompileError::MalformedKey {
                        key: key.to_string(),
                        path: document.key_path(id),
                        reason,
                    })?;
                let paths = selector::combine(paths, &alternatives);
                self.walk(id, &paths, chain)
            }
        }
    }
}

fn extend_chain(chain: &[String], condition: &str) -> Vec<String> {
    let mut extended = chain.to_vec();
    extended.push(condition.to_string());
    extended
}

/// Text of a declaration value, or `None` when the leaf carries nothing.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if text.is_empty() => Some("\"\"".to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render_value).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Null | Value::Bool(_) | Value::Object(_) => None,
    }
}
