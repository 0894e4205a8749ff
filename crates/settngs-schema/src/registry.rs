//! Schema registry holding every declared group and setting
//!
//! The registry is an explicit value built once by the host and passed by
//! reference to the resolver, the projector and the command-line adapter.
//! Declaration order is preserved everywhere since it drives both help
//! output and the layout of the persisted document.

use crate::error::{Error, Result};
use crate::setting::{Setting, SettingBuilder, SettingKey};
use crate::value::{SettingKind, Value};
use std::collections::HashMap;

/// Handle to a declared group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupHandle(usize);

/// Handle to a declared setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettingHandle(usize);

/// A named collection of settings
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: String,
    help: Option<String>,
    settings: Vec<SettingHandle>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// The declared settings of a host program.
///
/// # Example
///
/// ```
/// use settngs_schema::{Schema, SettingKind, Value};
///
/// let mut schema = Schema::new();
/// let example = schema.declare_group("example");
/// schema
///     .declare_option(example, "hello", SettingKind::String, Value::from("world"), true, &["--hello"])
///     .unwrap();
///
/// assert_eq!(schema.lookup("example", "hello").unwrap().default(), &Value::from("world"));
/// assert!(schema.lookup("example", "missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    groups: Vec<Group>,
    settings: Vec<Setting>,
    /// Maps every bound switch spelling to its owner
    switches: HashMap<String, SettingKey>,
    /// Maps every internal name to its owner
    internal_names: HashMap<String, SettingKey>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a group, or return the handle of an existing group with the
    /// same name.
    pub fn declare_group(&mut self, name: impl Into<String>) -> GroupHandle {
        let name = name.into();
        if let Some(index) = self.groups.iter().position(|g| g.name == name) {
            return GroupHandle(index);
        }
        tracing::debug!(group = %name, "Declared group");
        self.groups.push(Group {
            name,
            help: None,
            settings: Vec::new(),
        });
        GroupHandle(self.groups.len() - 1)
    }

    /// Attach help text to a group, shown as the heading of its switches
    pub fn set_group_help(&mut self, group: GroupHandle, help: impl Into<String>) {
        self.groups[group.0].help = Some(help.into());
    }

    /// Declare a setting from its raw parts.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateOption`] if `(group, name)` is already declared
    /// - [`Error::InvalidDefault`] if `default` does not conform to `kind`
    /// - [`Error::InvalidSwitch`] / [`Error::DuplicateSwitch`] for bad switches
    pub fn declare_option(
        &mut self,
        group: GroupHandle,
        name: &str,
        kind: SettingKind,
        default: Value,
        persistent: bool,
        cli_switches: &[&str],
    ) -> Result<SettingHandle> {
        let builder = Setting::builder(name, default)
            .kind(kind)
            .persistent(persistent)
            .switches(cli_switches.iter().copied());
        self.declare(group, builder)
    }

    /// Declare a setting from a builder
    pub fn declare(&mut self, group: GroupHandle, builder: SettingBuilder) -> Result<SettingHandle> {
        let group_name = self.groups[group.0].name.clone();
        let setting = builder.build(&group_name)?;
        let key = setting.key().clone();

        if self.lookup_key(&key).is_some() {
            return Err(Error::DuplicateOption { key });
        }

        let internal_name = setting.internal_name();
        if let Some(other) = self.internal_names.get(&internal_name) {
            return Err(Error::NameCollision {
                key,
                other: other.clone(),
                internal_name,
            });
        }

        let mut seen = Vec::new();
        for spelling in setting.switches().iter().chain(setting.negated_switches()) {
            if let Some(first) = self.switches.get(spelling) {
                return Err(Error::DuplicateSwitch {
                    switch: spelling.clone(),
                    first: first.clone(),
                    second: key,
                });
            }
            if seen.contains(&spelling) {
                return Err(Error::DuplicateSwitch {
                    switch: spelling.clone(),
                    first: key.clone(),
                    second: key,
                });
            }
            seen.push(spelling);
        }

        for spelling in setting.switches().iter().chain(setting.negated_switches()) {
            self.switches.insert(spelling.clone(), key.clone());
        }
        self.internal_names.insert(internal_name, key.clone());

        tracing::debug!(setting = %key, kind = %setting.kind(), "Declared setting");
        let handle = SettingHandle(self.settings.len());
        self.settings.push(setting);
        self.groups[group.0].settings.push(handle);
        Ok(handle)
    }

    /// Declare a group and its settings in one closure.
    ///
    /// ```
    /// use settngs_schema::{Schema, Setting};
    ///
    /// let mut schema = Schema::new();
    /// schema
    ///     .add_group("tst", |group| {
    ///         group.help("Testing options");
    ///         group.add(Setting::builder("test", "hello").switch("--test"))?;
    ///         Ok(())
    ///     })
    ///     .unwrap();
    /// assert_eq!(schema.groups().next().unwrap().help(), Some("Testing options"));
    /// ```
    pub fn add_group<F>(&mut self, name: impl Into<String>, declare: F) -> Result<GroupHandle>
    where
        F: FnOnce(&mut GroupBuilder<'_>) -> Result<()>,
    {
        let handle = self.declare_group(name);
        let mut builder = GroupBuilder {
            schema: self,
            handle,
        };
        declare(&mut builder)?;
        Ok(handle)
    }

    /// Look up a setting by group and name
    pub fn lookup(&self, group: &str, name: &str) -> Option<&Setting> {
        self.settings
            .iter()
            .find(|s| s.group() == group && s.name() == name)
    }

    /// Look up a setting by key
    pub fn lookup_key(&self, key: &SettingKey) -> Option<&Setting> {
        self.lookup(&key.group, &key.name)
    }

    /// Find a group by name
    pub fn group_named(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group(&self, handle: GroupHandle) -> &Group {
        &self.groups[handle.0]
    }

    pub fn setting(&self, handle: SettingHandle) -> &Setting {
        &self.settings[handle.0]
    }

    /// All settings in declaration order
    pub fn all_settings(&self) -> impl Iterator<Item = &Setting> {
        self.settings.iter()
    }

    /// All groups in declaration order
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Settings of a group in declaration order
    pub fn group_settings<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Setting> + 'a {
        group.settings.iter().map(|h| &self.settings[h.0])
    }

    /// The setting owning a switch spelling, if any
    pub fn switch_owner(&self, spelling: &str) -> Option<&SettingKey> {
        self.switches.get(spelling)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// Scoped declaration helper handed out by [`Schema::add_group`]
pub struct GroupBuilder<'a> {
    schema: &'a mut Schema,
    handle: GroupHandle,
}

impl GroupBuilder<'_> {
    /// Declare a setting in this group
    pub fn add(&mut self, builder: SettingBuilder) -> Result<SettingHandle> {
        self.schema.declare(self.handle, builder)
    }

    /// Set the group's help text
    pub fn help(&mut self, help: impl Into<String>) {
        self.schema.set_group_help(self.handle, help);
    }

    pub fn handle(&self) -> GroupHandle {
        self.handle
    }
}
