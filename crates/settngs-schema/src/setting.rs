//! Setting definitions and the fluent builder used to declare them

use crate::error::{Error, Result};
use crate::value::{SettingKind, Value};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Switches claimed by the command-line help renderer
const RESERVED_SWITCHES: &[&str] = &["-h", "--help"];

/// Characters collapsed into `_` when deriving internal names
const SANITIZED_CHARS: &str = " -_,.!@#$%^&*(){}[]'\"<>;:";

/// Pattern to match runs of sanitized characters
static SANITIZED_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("[{}]+", regex::escape(SANITIZED_CHARS))).unwrap());

/// Identity of a setting: its group and its name within that group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SettingKey {
    pub group: String,
    pub name: String,
}

impl SettingKey {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Identifier used on the parser side, `{group}__{name}` after
    /// sanitizing both parts.
    pub fn internal_name(&self) -> String {
        format!("{}__{}", sanitize_name(&self.group), sanitize_name(&self.name))
            .trim_start_matches('_')
            .to_string()
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.group, self.name)
        }
    }
}

/// Collapse runs of whitespace and punctuation into a single `_` and trim
/// leading/trailing underscores.
///
/// ```
/// assert_eq!(settngs_schema::sanitize_name("Example Group"), "Example_Group");
/// assert_eq!(settngs_schema::sanitize_name("--dry-run"), "dry_run");
/// ```
pub fn sanitize_name(name: &str) -> String {
    SANITIZED_RUNS
        .replace_all(name, "_")
        .trim_matches('_')
        .to_string()
}

/// A parsed command-line switch spelling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Switch {
    /// `--name`
    Long(String),
    /// `-c`
    Short(char),
}

impl Switch {
    /// Parse a spelling such as `--verbose` or `-v`.
    pub fn parse(spelling: &str) -> Option<Switch> {
        if let Some(long) = spelling.strip_prefix("--") {
            let valid = !long.is_empty()
                && !long.starts_with('-')
                && long
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
            return valid.then(|| Switch::Long(long.to_string()));
        }
        let short = spelling.strip_prefix('-')?;
        let mut chars = short.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_alphanumeric() => Some(Switch::Short(c)),
            _ => None,
        }
    }
}

/// A single declared setting
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    key: SettingKey,
    kind: SettingKind,
    default: Value,
    persistent: bool,
    switches: Vec<String>,
    negated_switches: Vec<String>,
    help: Option<String>,
    display_name: String,
    metavar: String,
}

impl Setting {
    /// Start declaring a setting. The kind is taken from the default unless
    /// set explicitly with [`SettingBuilder::kind`].
    pub fn builder(name: impl Into<String>, default: impl Into<Value>) -> SettingBuilder {
        SettingBuilder::new(name, default)
    }

    pub fn key(&self) -> &SettingKey {
        &self.key
    }

    pub fn group(&self) -> &str {
        &self.key.group
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn kind(&self) -> SettingKind {
        self.kind
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    /// Whether this setting is read from and written to the settings file
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Switch spellings that set this setting (or set a boolean to `true`)
    pub fn switches(&self) -> &[String] {
        &self.switches
    }

    /// Switch spellings that set a boolean setting to `false`
    pub fn negated_switches(&self) -> &[String] {
        &self.negated_switches
    }

    /// Whether any switch is bound to this setting
    pub fn is_cmdline(&self) -> bool {
        !self.switches.is_empty() || !self.negated_switches.is_empty()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn metavar(&self) -> &str {
        &self.metavar
    }

    pub fn internal_name(&self) -> String {
        self.key.internal_name()
    }
}

/// Fluent builder for [`Setting`]s
#[derive(Debug, Clone)]
pub struct SettingBuilder {
    name: String,
    kind: Option<SettingKind>,
    default: Value,
    persistent: bool,
    switches: Vec<String>,
    negated_switches: Vec<String>,
    help: Option<String>,
    display_name: Option<String>,
    metavar: Option<String>,
}

impl SettingBuilder {
    pub fn new(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            default: default.into(),
            persistent: true,
            switches: Vec::new(),
            negated_switches: Vec::new(),
            help: None,
            display_name: None,
            metavar: None,
        }
    }

    /// Declare the kind explicitly instead of inferring it from the default
    pub fn kind(mut self, kind: SettingKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set whether the setting is persisted (defaults to `true`)
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Bind a switch spelling
    pub fn switch(mut self, spelling: impl Into<String>) -> Self {
        self.switches.push(spelling.into());
        self
    }

    /// Bind several switch spellings at once
    pub fn switches<I, S>(mut self, spellings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.switches.extend(spellings.into_iter().map(Into::into));
        self
    }

    /// Bind a switch that sets a boolean setting to `false`
    pub fn negated_switch(mut self, spelling: impl Into<String>) -> Self {
        self.negated_switches.push(spelling.into());
        self
    }

    /// Bind `--name` and its `--no-name` counterpart
    pub fn toggle(self, long: impl Into<String>) -> Self {
        let long = long.into();
        let negated = match long.strip_prefix("--") {
            Some(rest) => format!("--no-{}", rest),
            None => format!("--no-{}", long.trim_start_matches('-')),
        };
        self.switch(long).negated_switch(negated)
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Validate and produce the setting for `group`
    pub(crate) fn build(self, group: &str) -> Result<Setting> {
        let key = SettingKey::new(group, self.name.as_str());

        if self.name.trim().is_empty() || sanitize_name(&self.name).is_empty() {
            return Err(Error::InvalidName {
                group: group.to_string(),
                name: self.name,
            });
        }

        let kind = self.kind.unwrap_or_else(|| self.default.kind());
        if !kind.accepts(&self.default) {
            let reason = match &self.default {
                Value::Float(v) if kind == SettingKind::Float => {
                    format!("{} is not a finite float", v)
                }
                other => format!("expected {}, found {}", kind, other.kind()),
            };
            return Err(Error::InvalidDefault { key, reason });
        }

        for spelling in self.switches.iter().chain(&self.negated_switches) {
            let reason = if Switch::parse(spelling).is_none() {
                Some("expected `--long` or `-s`")
            } else if RESERVED_SWITCHES.contains(&spelling.as_str()) {
                Some("reserved for help output")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(Error::InvalidSwitch {
                    key,
                    switch: spelling.clone(),
                    reason: reason.to_string(),
                });
            }
        }

        if let Some(spelling) = self.negated_switches.first() {
            if kind != SettingKind::Boolean {
                return Err(Error::InvalidSwitch {
                    key,
                    switch: spelling.clone(),
                    reason: format!("negated switches need a boolean, not a {}", kind),
                });
            }
        }

        let display_name = self.display_name.unwrap_or_else(|| self.name.clone());
        let metavar = self
            .metavar
            .unwrap_or_else(|| sanitize_name(&self.name).to_uppercase());

        Ok(Setting {
            key,
            kind,
            default: self.default,
            persistent: self.persistent,
            switches: self.switches,
            negated_switches: self.negated_switches,
            help: self.help,
            display_name,
            metavar,
        })
    }
}
