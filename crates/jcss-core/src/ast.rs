use std::collections::HashMap;
use std::iter;

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A resolved `(selector, property, value)` triple produced by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub selector: String,
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEntry {
    Rule {
        selector: String,
        declarations: IndexMap<String, String>,
    },
    Raw(String),
}

/// Declarations per selector path, in first-seen order.
///
/// A path enters the table with its first fact, so a path that never
/// receives one never appears.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    entries: Vec<TableEntry>,
    by_selector: HashMap<String, usize>,
}

impl RuleTable {
    /// Record a fact. A repeated `(selector, property)` takes the new value
    /// and keeps its first position.
    pub fn apply(&mut self, fact: Fact) {
        let index = match self.by_selector.get(&fact.selector) {
            Some(&index) => index,
            None => {
                let index = self.entries.len();
                self.entries.push(TableEntry::Rule {
                    selector: fact.selector.clone(),
                    declarations: IndexMap::new(),
                });
                self.by_selector.insert(fact.selector, index);
                index
            }
        };
        if let TableEntry::Rule { declarations, .. } = &mut self.entries[index] {
            declarations.insert(fact.property, fact.value);
        }
    }

    pub fn push_raw(&mut self, text: impl Into<String>) {
        self.entries.push(TableEntry::Raw(text.into()));
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &IndexMap<String, String>)> {
        self.entries.iter().filter_map(|entry| match entry {
            TableEntry::Rule {
                selector,
                declarations,
            } => Some((selector.as_str(), declarations)),
            TableEntry::Raw(_) => None,
        })
    }

    pub fn declarations(&self, selector: &str) -> Option<&IndexMap<String, String>> {
        let index = *self.by_selector.get(selector)?;
        match &self.entries[index] {
            TableEntry::Rule { declarations, .. } => Some(declarations),
            TableEntry::Raw(_) => None,
        }
    }

    pub fn selector_at(&self, index: usize) -> Option<&str> {
        match self.entries.get(index)? {
            TableEntry::Rule { selector, .. } => Some(selector),
            TableEntry::Raw(_) => None,
        }
    }

    pub fn declarations_at(&self, index: usize) -> Option<&IndexMap<String, String>> {
        match self.entries.get(index)? {
            TableEntry::Rule { declarations, .. } => Some(declarations),
            TableEntry::Raw(_) => None,
        }
    }

    pub fn declaration_count(&self) -> usize {
        self.rules().map(|(_, declarations)| declarations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RuleTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.rules())
    }
}

/// Rule tables for one compile pass: the root bucket plus one bucket per
/// at-rule condition chain, in first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub root: RuleTable,
    pub buckets: IndexMap<Vec<String>, RuleTable>,
}

impl Stylesheet {
    /// Table for `chain`, created on first use. The empty chain is the root.
    pub fn table_mut(&mut self, chain: &[String]) -> &mut RuleTable {
        if chain.is_empty() {
            return &mut self.root;
        }
        let index = match self.buckets.get_index_of(chain) {
            Some(index) => index,
            None => {
                self.buckets.insert(chain.to_vec(), RuleTable::default());
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[index]
    }

    pub fn bucket(&self, chain: &[&str]) -> Option<&RuleTable> {
        self.buckets
            .iter()
            .find(|(key, _)| key.iter().map(String::as_str).eq(chain.iter().copied()))
            .map(|(_, table)| table)
    }
}

/// Snapshot form: `{"mainstream": {selector: {property: value}}, "<chain>": {...}}`.
impl Serialize for Stylesheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let buckets = self
            .buckets
            .iter()
            .map(|(chain, table)| (chain.join(" "), table));
        serializer.collect_map(iter::once(("mainstream".to_string(), &self.root)).chain(buckets))
    }
}

/// Selectors sharing one declaration list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBlock {
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
}

impl RuleBlock {
    pub fn new(selectors: Vec<String>) -> Self {
        Self {
            selectors,
            declarations: Vec::new(),
        }
    }
}

/// One piece of optimizer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    /// Declarations shared verbatim by several selectors.
    Group(RuleBlock),
    /// What is left for a single selector.
    Solo(RuleBlock),
    Raw(String),
}

impl Unit {
    pub fn block(&self) -> Option<&RuleBlock> {
        match self {
            Unit::Group(block) | Unit::Solo(block) => Some(block),
            Unit::Raw(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRuleBlock {
    pub chain: Vec<String>,
    pub units: Vec<Unit>,
}

impl AtRuleBlock {
    /// Nested conditions are flattened into their own block, headed by the
    /// innermost one.
    pub fn header(&self) -> &str {
        self.chain.last().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizedSheet {
    pub root: Vec<Unit>,
    pub blocks: Vec<AtRuleBlock>,
}
