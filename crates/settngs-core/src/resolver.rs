//! Merge resolution of defaults, persisted values and command-line values
//!
//! For every declared setting, in declaration order, the resolver starts from
//! the schema default, lets a coercible persisted value override it, and lets
//! an explicitly given command-line value override both. Values that cannot
//! be used are never fatal: they are recorded as [`Diagnostic`]s and the
//! previous layer's value stands.

use serde::{Deserialize, Serialize};
use settngs_schema::{Schema, Setting, SettingKey, SettingKind, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Persisted values keyed by setting, before coercion
pub type FlatValues = BTreeMap<SettingKey, serde_json::Value>;

/// The layer a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Default,
    File,
    Cli,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Default => f.write_str("default"),
            Provenance::File => f.write_str("file"),
            Provenance::Cli => f.write_str("cli"),
        }
    }
}

/// A value produced by the command-line parser
#[derive(Debug, Clone, PartialEq)]
pub struct CliEntry {
    pub value: Value,
    /// Whether the user actually passed the switch, as opposed to the parser
    /// filling in a default
    pub explicit: bool,
}

/// Command-line values with their explicit-set flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliValues {
    entries: BTreeMap<SettingKey, CliEntry>,
}

impl CliValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parsed value, replacing any previous entry for `key`
    pub fn insert(&mut self, key: SettingKey, value: impl Into<Value>, explicit: bool) {
        self.entries.insert(
            key,
            CliEntry {
                value: value.into(),
                explicit,
            },
        );
    }

    pub fn get(&self, key: &SettingKey) -> Option<&CliEntry> {
        self.entries.get(key)
    }

    pub fn is_explicit(&self, key: &SettingKey) -> bool {
        self.entries.get(key).is_some_and(|e| e.explicit)
    }

    /// Keys the user set explicitly
    pub fn explicit_keys(&self) -> impl Iterator<Item = &SettingKey> {
        self.entries
            .iter()
            .filter(|(_, e)| e.explicit)
            .map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SettingKey, &CliEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The final value of one setting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedValue {
    pub key: SettingKey,
    pub value: Value,
    pub provenance: Provenance,
    pub persistent: bool,
}

/// A persisted value whose structure does not match the declared kind
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Schema mismatch for {key}: expected {expected}, found {found}")]
pub struct SchemaMismatchError {
    pub key: SettingKey,
    pub expected: SettingKind,
    pub found: &'static str,
}

/// A non-fatal problem found while resolving
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Structural mismatch between a persisted value and its declaration
    SchemaMismatch(SchemaMismatchError),

    /// A value of the right shape that could not be used
    Discarded {
        key: SettingKey,
        source: Provenance,
        reason: String,
    },

    /// A declared group whose persisted value is not a mapping
    MalformedGroup { group: String, found: &'static str },
}

impl Diagnostic {
    /// The setting this diagnostic is about, if it concerns a single one
    pub fn key(&self) -> Option<&SettingKey> {
        match self {
            Diagnostic::SchemaMismatch(e) => Some(&e.key),
            Diagnostic::Discarded { key, .. } => Some(key),
            Diagnostic::MalformedGroup { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SchemaMismatch(e) => e.fmt(f),
            Diagnostic::Discarded {
                key,
                source,
                reason,
            } => write!(f, "Discarded {} value for {}: {}", source, key, reason),
            Diagnostic::MalformedGroup { group, found } => {
                write!(f, "Group {:?} must be a mapping, found {}", group, found)
            }
        }
    }
}

/// Output of [`resolve`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    /// One entry per declared setting, in declaration order
    pub values: Vec<ResolvedValue>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve every declared setting against the persisted and command-line
/// layers.
///
/// Precedence is command line (explicit only) over persisted over default.
/// Persisted values for non-persistent settings are ignored, as are keys the
/// schema does not declare.
pub fn resolve(schema: &Schema, persisted: &FlatValues, cli: &CliValues) -> Resolved {
    let mut resolved = Resolved::default();

    for setting in schema.all_settings() {
        let value = resolve_setting(setting, persisted, cli, &mut resolved.diagnostics);
        resolved.values.push(value);
    }

    for key in persisted.keys().filter(|k| schema.lookup_key(k).is_none()) {
        tracing::debug!(%key, "Ignoring persisted value for undeclared setting");
    }

    resolved
}

fn resolve_setting(
    setting: &Setting,
    persisted: &FlatValues,
    cli: &CliValues,
    diagnostics: &mut Vec<Diagnostic>,
) -> ResolvedValue {
    let key = setting.key();
    let mut value = setting.default().clone();
    let mut provenance = Provenance::Default;

    match persisted.get(key) {
        Some(_) if !setting.is_persistent() => {
            tracing::debug!(%key, "Ignoring persisted value for non-persistent setting");
        }
        Some(raw) => match setting.kind().coerce(raw) {
            Ok(coerced) => {
                value = coerced;
                provenance = Provenance::File;
            }
            Err(settngs_schema::CoerceError::Mismatch { expected, found }) => {
                tracing::warn!(%key, %expected, found, "Persisted value does not match schema");
                diagnostics.push(Diagnostic::SchemaMismatch(SchemaMismatchError {
                    key: key.clone(),
                    expected,
                    found,
                }));
            }
            Err(e) => {
                tracing::warn!(%key, reason = %e, "Discarding persisted value");
                diagnostics.push(Diagnostic::Discarded {
                    key: key.clone(),
                    source: Provenance::File,
                    reason: e.to_string(),
                });
            }
        },
        None => {}
    }

    if let Some(entry) = cli.get(key).filter(|e| e.explicit) {
        if setting.kind().accepts(&entry.value) {
            value = entry.value.clone();
            provenance = Provenance::Cli;
        } else {
            let reason = format!(
                "expected {}, found {}",
                setting.kind(),
                entry.value.kind()
            );
            tracing::warn!(%key, %reason, "Discarding command-line value");
            diagnostics.push(Diagnostic::Discarded {
                key: key.clone(),
                source: Provenance::Cli,
                reason,
            });
        }
    }

    tracing::debug!(%key, %provenance, "Resolved setting");

    ResolvedValue {
        key: key.clone(),
        value,
        provenance,
        persistent: setting.is_persistent(),
    }
}
