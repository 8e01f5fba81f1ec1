//! Parameter Extractor
//!
//! Scans tokenized task text for path-like, version-like and email-like
//! substrings and binds them to the named slots an operation requires.
//!
//! Binding rules:
//! - slots are processed by shape specificity (exact-suffix paths first,
//!   generic paths last), declaration order within the same tier, so a token
//!   that satisfies both `*.json` and "any path" always goes to the suffix
//!   slot;
//! - for each slot the first still-unclaimed matching token wins, which gives
//!   the first-unfilled-slot tie-break when two slots share a shape;
//! - weekday slots are never scanned from tokens, the dispatcher binds them
//!   through the weekday resolver;
//! - after the scan, unbound slots fall back to their declared default; a
//!   slot with neither binding nor default makes the result partial.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.-]*@\d+(\.\d+)*$").unwrap());

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").unwrap());

/// Shape predicate used to recognize candidate values in free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotShape {
    /// Path-like token with an exact suffix, e.g. `.json`. Most specific.
    FileWithSuffix(&'static str),
    /// Path-like token ending in a separator.
    Directory,
    /// Path-like token with any (or no) suffix. Least specific.
    AnyPath,
    /// `name@version` marker, e.g. `prettier@3.4.2`.
    VersionMarker,
    /// `local@domain.tld` address.
    Email,
    /// Bound by the weekday resolver, never from tokens.
    Weekday,
}

impl SlotShape {
    fn matches(&self, token: &str) -> bool {
        match self {
            SlotShape::FileWithSuffix(suffix) => is_path_like(token) && token.ends_with(suffix),
            SlotShape::Directory => is_path_like(token) && token.ends_with('/'),
            SlotShape::AnyPath => is_path_like(token) && !token.ends_with('/'),
            SlotShape::VersionMarker => VERSION_MARKER.is_match(token),
            SlotShape::Email => !VERSION_MARKER.is_match(token) && EMAIL.is_match(token),
            SlotShape::Weekday => false,
        }
    }

    /// Lower tier binds first.
    fn specificity_tier(&self) -> u8 {
        match self {
            SlotShape::FileWithSuffix(_) => 0,
            SlotShape::Directory | SlotShape::VersionMarker | SlotShape::Email => 1,
            SlotShape::AnyPath => 2,
            SlotShape::Weekday => 3,
        }
    }

    /// Human-readable shape, used in missing-slot error messages.
    pub fn describe(&self) -> String {
        match self {
            SlotShape::FileWithSuffix(suffix) => format!("*{}", suffix),
            SlotShape::Directory => "directory".to_string(),
            SlotShape::AnyPath => "path".to_string(),
            SlotShape::VersionMarker => "name@version".to_string(),
            SlotShape::Email => "email".to_string(),
            SlotShape::Weekday => "weekday".to_string(),
        }
    }
}

/// A named, typed placeholder an operation requires. Declared per operation
/// in the registry; values are bound at dispatch time.
#[derive(Debug, Clone)]
pub struct SlotSpec {
    pub name: &'static str,
    pub shape: SlotShape,
    pub default: Option<&'static str>,
}

impl SlotSpec {
    pub fn required(name: &'static str, shape: SlotShape) -> Self {
        Self {
            name,
            shape,
            default: None,
        }
    }

    pub fn with_default(name: &'static str, shape: SlotShape, default: &'static str) -> Self {
        Self {
            name,
            shape,
            default: Some(default),
        }
    }
}

/// Mapping from slot name to bound string value.
pub type SlotBindings = HashMap<String, String>;

/// Result of a scan. Partial binding is legal and must be detected as a
/// distinct failure by the dispatcher, never silently proceeded with.
#[derive(Debug)]
pub struct Extraction {
    pub bindings: SlotBindings,
    /// Unbound required slots, as `name (shape)` descriptions.
    pub missing: Vec<String>,
}

impl Extraction {
    pub fn is_partial(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// Tokenize on commas and whitespace, stripping wrapping quotes/backticks and
/// trailing sentence punctuation from each token.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(clean_token)
        .filter(|t| !t.is_empty())
        .collect()
}

fn clean_token(raw: &str) -> String {
    let token = raw.trim_matches(|c| matches!(c, '"' | '\'' | '`' | '(' | ')'));
    token.trim_end_matches(['.', '?', '!', ';', ':']).to_string()
}

fn is_path_like(token: &str) -> bool {
    token.starts_with('/') || token.starts_with("./") || token.starts_with("data/")
}

/// Scan task text for the given slot specs. See the module docs for the
/// binding rules.
pub fn extract(text: &str, slots: &[SlotSpec]) -> Extraction {
    let tokens = tokenize(text);
    let mut claimed = vec![false; tokens.len()];
    let mut bindings = SlotBindings::new();

    let mut order: Vec<&SlotSpec> = slots.iter().collect();
    // Stable sort keeps declaration order within a tier.
    order.sort_by_key(|slot| slot.shape.specificity_tier());

    for slot in &order {
        if slot.shape == SlotShape::Weekday {
            continue;
        }
        for (i, token) in tokens.iter().enumerate() {
            if claimed[i] {
                continue;
            }
            if slot.shape.matches(token) {
                claimed[i] = true;
                bindings.insert(slot.name.to_string(), token.clone());
                break;
            }
        }
    }

    let mut missing = Vec::new();
    for slot in slots {
        if slot.shape == SlotShape::Weekday || bindings.contains_key(slot.name) {
            continue;
        }
        match slot.default {
            Some(default) => {
                bindings.insert(slot.name.to_string(), default.to_string());
            }
            None => missing.push(format!("{} ({})", slot.name, slot.shape.describe())),
        }
    }

    Extraction { bindings, missing }
}
