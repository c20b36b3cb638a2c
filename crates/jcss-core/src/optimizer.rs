//! Selector grouping.
//!
//! Every `(property, value)` pair has a carrier set: the selector paths that
//! declare it, in table order. Paths are visited in order; the first time an
//! undecided pair is shared, a group is emitted for the carriers that can take
//! it without reordering their own overlapping properties (`margin` and
//! `margin-top`, say). The group then takes every later declaration of the
//! current path with exactly the same members. Whatever a path shares with
//! nobody goes to a solo unit; a new one is opened when a solo declaration
//! overlaps something grouped after the current unit.
//!
//! Each declaration of each path is emitted exactly once, and within a path
//! overlapping properties are emitted in authored order.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::ast::{
    AtRuleBlock, Declaration, OptimizedSheet, RuleBlock, RuleTable, Stylesheet, TableEntry, Unit,
};
use crate::options::CompileOptions;

pub fn optimize_sheet(sheet: &Stylesheet, options: &CompileOptions) -> OptimizedSheet {
    let root = optimize(&sheet.root, options);
    let blocks = sheet
        .buckets
        .iter()
        .map(|(chain, table)| AtRuleBlock {
            chain: chain.clone(),
            units: optimize(table, options),
        })
        .collect();
    OptimizedSheet { root, blocks }
}

/// Turn one rule table into emission units.
pub fn optimize(table: &RuleTable, options: &CompileOptions) -> Vec<Unit> {
    let mut grouper = Grouper {
        table,
        carriers: carrier_sets(table, options),
        emitted: HashSet::new(),
    };
    let mut units = Vec::new();
    let mut groups = 0;

    for (index, entry) in table.entries().iter().enumerate() {
        let (selector, declarations) = match entry {
            TableEntry::Raw(text) => {
                units.push(Unit::Raw(text.clone()));
                continue;
            }
            TableEntry::Rule {
                selector,
                declarations,
            } => (selector, declarations),
        };

        let mut solo: Option<usize> = None;
        let mut grouped_after_solo: Vec<&str> = Vec::new();
        for (property, value) in declarations {
            if grouper.is_emitted(index, property) {
                continue;
            }

            let members = grouper.eligible_members(index, property, value);
            if members.len() < 2 || members.first() != Some(&index) {
                let reopen = grouped_after_solo
                    .iter()
                    .any(|grouped| overlaps(grouped, property));
                if solo.is_none() || reopen {
                    units.push(Unit::Solo(RuleBlock::new(vec![selector.clone()])));
                    solo = Some(units.len() - 1);
                    grouped_after_solo.clear();
                }
                if let Some(Unit::Solo(block)) = solo.and_then(|slot| units.get_mut(slot)) {
                    block.declarations.push(Declaration::new(property, value));
                }
                grouper.mark(&[index], property);
                continue;
            }

            let mut block = RuleBlock::new(
                members
                    .iter()
                    .filter_map(|&member| table.selector_at(member))
                    .map(str::to_string)
                    .collect(),
            );
            block.declarations.push(Declaration::new(property, value));
            grouper.mark(&members, property);
            let mut grouped = vec![property.as_str()];

            for (other, other_value) in declarations {
                if grouper.is_emitted(index, other)
                    || grouper.eligible_members(index, other, other_value) != members
                {
                    continue;
                }
                block.declarations.push(Declaration::new(other, other_value));
                grouper.mark(&members, other);
                grouped.push(other.as_str());
            }

            if solo.is_some() {
                grouped_after_solo.extend(grouped);
            }
            units.push(Unit::Group(block));
            groups += 1;
        }
    }

    debug!(groups, units = units.len(), "grouped selectors");
    units
}

struct Grouper<'t> {
    table: &'t RuleTable,
    carriers: HashMap<(&'t str, &'t str), Vec<usize>>,
    emitted: HashSet<(usize, &'t str)>,
}

impl<'t> Grouper<'t> {
    fn is_emitted(&self, path: usize, property: &'t str) -> bool {
        self.emitted.contains(&(path, property))
    }

    fn mark(&mut self, paths: &[usize], property: &'t str) {
        for &path in paths {
            self.emitted.insert((path, property));
        }
    }

    /// Paths, from `index` on, that can emit `property: value` right now.
    fn eligible_members(&self, index: usize, property: &'t str, value: &'t str) -> Vec<usize> {
        let Some(carriers) = self.carriers.get(&(property, value)) else {
            return vec![index];
        };
        carriers
            .iter()
            .copied()
            .filter(|&path| path >= index)
            .filter(|&path| !self.is_emitted(path, property) && self.in_order(path, property))
            .collect()
    }

    /// Whether emitting `property` of `path` now keeps every overlapping
    /// property of that path on its authored side.
    fn in_order(&self, path: usize, property: &'t str) -> bool {
        let Some(declarations) = self.table.declarations_at(path) else {
            return false;
        };
        let Some(position) = declarations.get_index_of(property) else {
            return false;
        };
        declarations
            .keys()
            .enumerate()
            .filter(|(_, other)| other.as_str() != property && overlaps(other, property))
            .all(|(other_position, other)| {
                self.is_emitted(path, other) == (other_position < position)
            })
    }
}

/// `margin` overlaps `margin-top`, `border` overlaps `border-top-color`, and
/// every property overlaps itself.
fn overlaps(a: &str, b: &str) -> bool {
    let prefix_of = |short: &str, long: &str| {
        long.strip_prefix(short)
            .is_some_and(|rest| rest.starts_with('-'))
    };
    a == b || prefix_of(a, b) || prefix_of(b, a)
}

/// Paths carrying each shareable `(property, value)` pair, ascending.
fn carrier_sets<'t>(
    table: &'t RuleTable,
    options: &CompileOptions,
) -> HashMap<(&'t str, &'t str), Vec<usize>> {
    let mut carriers: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
    if !options.combine_selectors {
        return carriers;
    }

    for (index, entry) in table.entries().iter().enumerate() {
        let TableEntry::Rule {
            selector,
            declarations,
        } = entry
        else {
            continue;
        };
        // at-rule blocks such as @font-face stand alone
        if selector.starts_with('@') {
            continue;
        }
        for (property, value) in declarations {
            if options.prevents(property) {
                continue;
            }
            carriers
                .entry((property.as_str(), value.as_str()))
                .or_default()
                .push(index);
        }
    }
    carriers
}
