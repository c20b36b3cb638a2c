use std::borrow::Cow;

use crate::ast::{AtRuleBlock, Declaration, OptimizedSheet, RuleBlock, Unit};

/// Render optimized units as stylesheet text: the root bucket first, then one
/// flat block per at-rule chain.
pub fn emit_css(sheet: &OptimizedSheet, minify: bool) -> String {
    let mut out = String::new();

    for unit in &sheet.root {
        emit_unit(unit, minify, &mut out);
    }
    for block in &sheet.blocks {
        emit_block(block, minify, &mut out);
    }
    out
}

fn emit_block(block: &AtRuleBlock, minify: bool, out: &mut String) {
    if block.units.is_empty() {
        return;
    }
    out.push_str(block.header());
    out.push_str(if minify { " {" } else { " {\n" });
    for unit in &block.units {
        emit_unit(unit, minify, out);
    }
    out.push_str(if minify { "}" } else { "}\n" });
}

fn emit_unit(unit: &Unit, minify: bool, out: &mut String) {
    match unit {
        Unit::Group(rule) | Unit::Solo(rule) => emit_rule(rule, minify, out),
        Unit::Raw(text) => {
            out.push_str(text);
            if !minify {
                out.push('\n');
            }
        }
    }
}

fn emit_rule(rule: &RuleBlock, minify: bool, out: &mut String) {
    out.push_str(&rule.selectors.join(if minify { "," } else { ", " }));
    out.push_str(if minify { "{" } else { " {\n" });

    for decl in &rule.declarations {
        emit_declaration(decl, minify, out);
    }
    out.push_str(if minify { "}" } else { "}\n" });
}

fn emit_declaration(decl: &Declaration, minify: bool, out: &mut String) {
    if !minify {
        out.push_str("  ");
    }
    out.push_str(&decl.property);
    out.push_str(": ");
    out.push_str(&decl.value);
    out.push(';');
    if !minify {
        out.push('\n');
    }
}

/// CSS spelling of an authored property name.
///
/// Every ASCII capital becomes `-` plus its lowercase form, so
/// `WebkitTransform` is `-webkit-transform`. Custom properties pass through.
pub fn property_name(name: &str, keep_camel_case: bool) -> Cow<'_, str> {
    if keep_camel_case || name.starts_with("--") || !name.bytes().any(|b| b.is_ascii_uppercase()) {
        return Cow::Borrowed(name);
    }

    let mut kebab = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            kebab.push('-');
            kebab.push(ch.to_ascii_lowercase());
        } else {
            kebab.push(ch);
        }
    }
    Cow::Owned(kebab)
}
