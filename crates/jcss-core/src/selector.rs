//! Selector key parsing and path combination.

/// Placeholder replaced by the parent selector.
pub const PARENT_MARKER: char = '&';

/// What an authored map key stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind<'a> {
    /// `@media`, `@supports`, ...: hoisted into a bucket, content keeps the
    /// current parent paths.
    Conditional(&'a str),
    /// `@keyframes`: hoisted into a bucket, content starts without parents.
    Keyframes(&'a str),
    /// Any other at-rule (`@font-face`, `@page`): a block of its own.
    Standalone(&'a str),
    Selector(&'a str),
}

const CONDITIONAL_AT_RULES: &[&str] = &["media", "supports", "container", "layer", "document"];

pub fn key_kind(key: &str) -> KeyKind<'_> {
    let trimmed = key.trim();
    let Some(name) = at_rule_name(trimmed) else {
        return KeyKind::Selector(key);
    };

    if CONDITIONAL_AT_RULES.contains(&name) {
        KeyKind::Conditional(trimmed)
    } else if is_keyframes(name) {
        KeyKind::Keyframes(trimmed)
    } else {
        KeyKind::Standalone(trimmed)
    }
}

fn at_rule_name(key: &str) -> Option<&str> {
    let rest = key.strip_prefix('@')?;
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn is_keyframes(name: &str) -> bool {
    if name == "keyframes" {
        return true;
    }
    // vendor forms: -webkit-keyframes, -moz-keyframes, ...
    name.strip_prefix('-')
        .and_then(|rest| rest.split_once('-'))
        .is_some_and(|(_, tail)| tail == "keyframes")
}

/// One comma-separated branch of a selector key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alternative<'a> {
    /// Plain selector at the top of a path.
    Root(&'a str),
    /// Joined to each parent with a space.
    Descendant(&'a str),
    /// `:hover`, `::before`: joined to each parent without a separator.
    PseudoAttach(&'a str),
    /// Contains [`PARENT_MARKER`], replaced by each parent.
    ParentReference(&'a str),
}

impl<'a> Alternative<'a> {
    pub fn classify(text: &'a str, has_parent: bool) -> Self {
        if text.contains(PARENT_MARKER) {
            Alternative::ParentReference(text)
        } else if text.starts_with(':') {
            Alternative::PseudoAttach(text)
        } else if has_parent {
            Alternative::Descendant(text)
        } else {
            Alternative::Root(text)
        }
    }
}

/// Split `key` on top-level commas. Brackets, parentheses and quotes nest;
/// commas inside them belong to the alternative.
///
/// The error is a human readable reason.
pub fn split_alternatives(key: &str) -> Result<Vec<&str>, String> {
    let mut alternatives = Vec::new();
    let mut open: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut escaped = false;

    for (index, ch) in key.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '[' | '(' => open.push(ch),
            ']' | ')' => {
                let expected = if ch == ']' { '[' } else { '(' };
                if open.pop() != Some(expected) {
                    return Err(format!("unbalanced '{ch}'"));
                }
            }
            ',' if open.is_empty() => {
                alternatives.push(key[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }

    if let Some(q) = quote {
        return Err(format!("unclosed quote {q}"));
    }
    if let Some(bracket) = open.last() {
        return Err(format!("unclosed '{bracket}'"));
    }
    alternatives.push(key[start..].trim());
    alternatives.retain(|alt| !alt.is_empty());

    if alternatives.is_empty() {
        return Err("empty selector".to_string());
    }
    Ok(alternatives)
}

/// Paths for a node reached with `parents` whose key split into
/// `alternatives`: every parent crossed with every alternative, parent-major,
/// duplicates removed.
pub fn combine(parents: &[String], alternatives: &[&str]) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    let mut push = |path: String| {
        if !paths.contains(&path) {
            paths.push(path);
        }
    };

    if parents.is_empty() {
        for alt in alternatives {
            match Alternative::classify(alt, false) {
                Alternative::ParentReference(text) => {
                    push(text.replace(PARENT_MARKER, "").trim().to_string())
                }
                Alternative::Root(text)
                | Alternative::PseudoAttach(text)
                | Alternative::Descendant(text) => push(text.to_string()),
            }
        }
        return paths;
    }

    for parent in parents {
        for alt in alternatives {
            let path = match Alternative::classify(alt, true) {
                Alternative::ParentReference(text) => {
                    text.replace(PARENT_MARKER, parent)
                }
                Alternative::PseudoAttach(text) => format!("{parent}{text}"),
                Alternative::Descendant(text) | Alternative::Root(text) => {
                    format!("{parent} {text}")
                }
            };
            push(path);
        }
    }
    paths
}
