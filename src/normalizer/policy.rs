//! Field-removal policy for normalized output
//!
//! Rules are keyed by (node-kind selector, field name). A field is dropped when a
//! deny rule matches and no keep rule does. `parent`, `pos` and `end` are always
//! dropped: they carry no syntax and `parent` would make every subtree cyclic.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

/// Fields no policy can keep
pub const STRUCTURAL_FIELDS: &[&str] = &["parent", "pos", "end"];

/// Fields the default policy drops on every kind
pub const DEFAULT_DROPPED_FIELDS: &[&str] = &[
    "parent",
    "pos",
    "end",
    "flags",
    "modifierFlagsCache",
    "transformFlags",
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid field rule '{0}' (expected KIND:FIELD, KIND may be '*')")]
pub struct FieldRuleError(pub String);

/// Which node kinds a rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KindSelector {
    Any,
    Kind(String),
}

impl KindSelector {
    pub fn matches(&self, kind: &str) -> bool {
        match self {
            KindSelector::Any => true,
            KindSelector::Kind(k) => k == kind,
        }
    }
}

impl fmt::Display for KindSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindSelector::Any => write!(f, "*"),
            KindSelector::Kind(kind) => write!(f, "{}", kind),
        }
    }
}

/// One (selector, field) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRule {
    pub selector: KindSelector,
    pub field: String,
}

impl FieldRule {
    pub fn new(selector: KindSelector, field: impl Into<String>) -> Self {
        Self {
            selector,
            field: field.into(),
        }
    }

    fn matches(&self, kind: &str, field: &str) -> bool {
        self.field == field && self.selector.matches(kind)
    }
}

impl FromStr for FieldRule {
    type Err = FieldRuleError;

    /// Parse `KIND:FIELD`, e.g. `lexical_declaration:flags` or `*:flags`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, field) = s
            .split_once(':')
            .ok_or_else(|| FieldRuleError(s.to_string()))?;
        let (kind, field) = (kind.trim(), field.trim());
        if kind.is_empty() || field.is_empty() {
            return Err(FieldRuleError(s.to_string()));
        }

        let selector = match kind {
            "*" => KindSelector::Any,
            kind => KindSelector::Kind(kind.to_string()),
        };
        Ok(FieldRule::new(selector, field))
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.selector, self.field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPolicy {
    deny: Vec<FieldRule>,
    keep: Vec<FieldRule>,
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self {
            deny: DEFAULT_DROPPED_FIELDS
                .iter()
                .map(|field| FieldRule::new(KindSelector::Any, *field))
                .collect(),
            keep: Vec::new(),
        }
    }
}

impl FieldPolicy {
    /// Policy that drops only the structural fields
    pub fn structural_only() -> Self {
        Self {
            deny: Vec::new(),
            keep: Vec::new(),
        }
    }

    /// Also drop `field` on nodes matching `selector`
    pub fn deny(mut self, selector: KindSelector, field: impl Into<String>) -> Self {
        self.deny.push(FieldRule::new(selector, field));
        self
    }

    /// Opt a (kind, field) pair back in. Structural fields are refused.
    pub fn keep(mut self, selector: KindSelector, field: impl Into<String>) -> Self {
        let rule = FieldRule::new(selector, field);
        if STRUCTURAL_FIELDS.contains(&rule.field.as_str()) {
            warn!("Ignoring keep rule {}: field is always dropped", rule);
            return self;
        }
        self.keep.push(rule);
        self
    }

    pub fn keep_rule(self, rule: FieldRule) -> Self {
        self.keep(rule.selector, rule.field)
    }

    pub fn is_dropped(&self, kind: &str, field: &str) -> bool {
        if STRUCTURAL_FIELDS.contains(&field) {
            return true;
        }
        if self.keep.iter().any(|rule| rule.matches(kind, field)) {
            return false;
        }
        self.deny.iter().any(|rule| rule.matches(kind, field))
    }
}
