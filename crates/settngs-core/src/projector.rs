//! Projection between resolved values and the nested persisted layout
//!
//! A [`Namespace`] is an ordered two-level mapping of group -> option ->
//! value that mirrors the top level of the settings document. Persisted
//! entries the schema does not know about are kept aside verbatim in the
//! unrecognized bucket and written back after the declared ones.

use crate::resolver::{Diagnostic, FlatValues, ResolvedValue};
use settngs_codec::Document;
use settngs_schema::{Schema, SettingKey, Value, json_shape};
use std::collections::HashSet;

/// The values of one group, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupValues {
    name: String,
    values: Vec<(String, Value)>,
}

impl GroupValues {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.values.push((name, value));
                None
            }
        }
    }
}

/// The persistent settings of a host program, grouped as they are stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    groups: Vec<GroupValues>,
    unrecognized: Document,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach persisted entries that matched no declaration
    pub fn with_unrecognized(mut self, unrecognized: Document) -> Self {
        self.unrecognized = unrecognized;
        self
    }

    pub fn get(&self, group: &str, name: &str) -> Option<&Value> {
        self.group(group).and_then(|g| g.get(name))
    }

    pub fn group(&self, name: &str) -> Option<&GroupValues> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupValues> {
        self.groups.iter()
    }

    pub fn unrecognized(&self) -> &Document {
        &self.unrecognized
    }

    /// Set a value, appending the group and option if they are new.
    ///
    /// Returns the previous value, if any.
    pub fn set(&mut self, group: &str, name: &str, value: impl Into<Value>) -> Option<Value> {
        let index = match self.groups.iter().position(|g| g.name == group) {
            Some(index) => index,
            None => {
                self.groups.push(GroupValues::new(group));
                self.groups.len() - 1
            }
        };
        self.groups[index].set(name, value.into())
    }

    /// Build the nested document for this namespace.
    ///
    /// Groups and options keep their order. Unrecognized options of a known
    /// group follow its declared options and unrecognized groups come last,
    /// verbatim, even when empty. Groups without values are omitted.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        let mut consumed = HashSet::new();

        for group in &self.groups {
            let mut entries: Document = group
                .values
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect();

            if let Some(serde_json::Value::Object(extra)) = self.unrecognized.get(&group.name) {
                consumed.insert(group.name.as_str());
                for (name, value) in extra {
                    if !entries.contains_key(name) {
                        entries.insert(name.clone(), value.clone());
                    }
                }
            }

            if !entries.is_empty() {
                document.insert(group.name.clone(), serde_json::Value::Object(entries));
            }
        }

        for (name, value) in &self.unrecognized {
            if consumed.contains(name.as_str()) || document.contains_key(name) {
                continue;
            }
            document.insert(name.clone(), value.clone());
        }

        document
    }
}

/// Group resolved values into a [`Namespace`], keeping only persistent ones.
///
/// Groups appear in the order of their first resolved value.
pub fn project(resolved: &[ResolvedValue]) -> Namespace {
    let mut namespace = Namespace::new();
    for value in resolved.iter().filter(|v| v.persistent) {
        namespace.set(&value.key.group, &value.key.name, value.value.clone());
    }
    namespace
}

/// Output of [`flatten`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    /// Raw persisted values of declared persistent settings
    pub values: FlatValues,
    /// Entries matching no declaration, kept verbatim
    pub unrecognized: Document,
    pub diagnostics: Vec<Diagnostic>,
}

/// Split a persisted document into declared values and the unrecognized
/// bucket.
///
/// Entries for declared non-persistent settings are dropped. A declared
/// group whose value is not a mapping is dropped with a
/// [`Diagnostic::MalformedGroup`].
pub fn flatten(schema: &Schema, document: &Document) -> Flattened {
    let mut flattened = Flattened::default();

    for (group_name, raw) in document {
        if schema.group_named(group_name).is_none() {
            tracing::debug!(group = %group_name, "Keeping unrecognized group");
            flattened.unrecognized.insert(group_name.clone(), raw.clone());
            continue;
        }

        let Some(entries) = raw.as_object() else {
            let found = json_shape(raw);
            tracing::warn!(group = %group_name, found, "Dropping malformed group");
            flattened.diagnostics.push(Diagnostic::MalformedGroup {
                group: group_name.clone(),
                found,
            });
            continue;
        };

        let mut extra = Document::new();
        for (name, value) in entries {
            match schema.lookup(group_name, name) {
                Some(setting) if setting.is_persistent() => {
                    flattened
                        .values
                        .insert(SettingKey::new(group_name, name), value.clone());
                }
                Some(setting) => {
                    tracing::debug!(key = %setting.key(), "Dropping stored non-persistent setting");
                }
                None => {
                    tracing::debug!(group = %group_name, option = %name, "Keeping unrecognized option");
                    extra.insert(name.clone(), value.clone());
                }
            }
        }

        if !extra.is_empty() {
            flattened
                .unrecognized
                .insert(group_name.clone(), serde_json::Value::Object(extra));
        }
    }

    flattened
}
