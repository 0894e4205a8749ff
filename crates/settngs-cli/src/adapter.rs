//! Command-line adapter: a clap parser generated from a schema
//!
//! Every setting with at least one switch becomes a clap argument, listed
//! under a help heading named after its group. Parsing yields
//! [`CliValues`] where each entry records whether the user actually passed
//! the switch, so that parser defaults never override persisted values.

use clap::builder::TypedValueParser;
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use settngs_core::CliValues;
use settngs_schema::{Schema, Setting, SettingKey, SettingKind, Switch, Value};
use std::ffi::{OsStr, OsString};

/// Suffix of the argument id backing a setting's negated switches.
///
/// Internal names never contain '-', so these ids cannot clash with them.
const NEGATED_SUFFIX: &str = "-negated";

/// Parses switch values into [`Value`]s of a fixed kind
#[derive(Debug, Clone, Copy)]
struct KindParser(SettingKind);

impl TypedValueParser for KindParser {
    type Value = Value;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Value, clap::Error> {
        let token = value.to_str().ok_or_else(|| {
            clap::Error::new(ErrorKind::InvalidUtf8).with_cmd(cmd)
        })?;

        self.0.parse_str(token).map_err(|e| {
            let arg = arg
                .map(|a| a.to_string())
                .unwrap_or_else(|| "...".to_string());
            clap::Error::raw(
                ErrorKind::ValueValidation,
                format!("invalid value '{}' for '{}': {}\n", token, arg, e),
            )
            .with_cmd(cmd)
        })
    }
}

/// How one setting maps onto parser arguments
#[derive(Debug, Clone)]
struct Binding {
    key: SettingKey,
    kind: SettingKind,
    default: Value,
    /// Id of the argument for the positive switches, if any
    id: Option<String>,
    /// Id of the argument for the negated switches, if any
    negated_id: Option<String>,
}

/// A command-line parser for one schema
#[derive(Debug, Clone)]
pub struct CliParser {
    command: Command,
    bindings: Vec<Binding>,
}

/// Build a parser for every setting of `schema` that binds a switch.
///
/// Arguments appear in declaration order under one help heading per group.
pub fn build_parser(schema: &Schema) -> CliParser {
    let mut command = Command::new("settngs")
        .no_binary_name(true)
        .args_override_self(true);
    let mut bindings = Vec::new();

    for group in schema.groups() {
        let heading = Some(group.help().unwrap_or(group.name()))
            .filter(|h| !h.is_empty())
            .map(str::to_string);

        for setting in schema.group_settings(group).filter(|s| s.is_cmdline()) {
            let id = setting.internal_name();
            let negated_id = format!("{}{}", id, NEGATED_SUFFIX);
            let has_positive = !setting.switches().is_empty();
            let has_negated = !setting.negated_switches().is_empty();

            if has_positive {
                let mut arg = positive_arg(setting, &id);
                if let Some(heading) = &heading {
                    arg = arg.help_heading(heading.clone());
                }
                if has_negated {
                    arg = arg.overrides_with(negated_id.clone());
                }
                command = command.arg(arg);
            }

            if has_negated {
                let mut arg = with_switches(
                    Arg::new(negated_id.clone()).action(ArgAction::SetTrue),
                    setting.negated_switches(),
                );
                if let Some(heading) = &heading {
                    arg = arg.help_heading(heading.clone());
                }
                let positive = setting.switches();
                if let Some(first) = positive.iter().find(|s| s.starts_with("--")).or(positive.first()) {
                    arg = arg.help(format!("Turn off {}", first));
                    arg = arg.overrides_with(id.clone());
                }
                command = command.arg(arg);
            }

            tracing::debug!(key = %setting.key(), %id, "Bound command-line switches");

            bindings.push(Binding {
                key: setting.key().clone(),
                kind: setting.kind(),
                default: setting.default().clone(),
                id: has_positive.then_some(id),
                negated_id: has_negated.then_some(negated_id),
            });
        }
    }

    CliParser { command, bindings }
}

fn positive_arg(setting: &Setting, id: &str) -> Arg {
    let mut arg = with_switches(Arg::new(id.to_string()), setting.switches());
    if let Some(help) = setting.help() {
        arg = arg.help(help.to_string());
    }

    match setting.kind() {
        SettingKind::Boolean => arg.action(ArgAction::SetTrue),
        SettingKind::StringList => {
            let defaults = setting.default().to_tokens();
            arg = arg
                .action(ArgAction::Append)
                .num_args(1..)
                .value_name(setting.metavar().to_string())
                .value_parser(KindParser(SettingKind::String));
            if !defaults.is_empty() {
                arg = arg.default_values(defaults);
            }
            arg
        }
        kind => arg
            .action(ArgAction::Set)
            .value_name(setting.metavar().to_string())
            .value_parser(KindParser(kind))
            .allow_negative_numbers(matches!(kind, SettingKind::Integer | SettingKind::Float))
            .default_value(setting.default().to_string()),
    }
}

/// Attach switch spellings: the first long and short are primary, the rest
/// are visible aliases.
fn with_switches(mut arg: Arg, spellings: &[String]) -> Arg {
    let mut has_long = false;
    let mut has_short = false;

    for switch in spellings.iter().filter_map(|s| Switch::parse(s)) {
        match switch {
            Switch::Long(long) if !has_long => {
                arg = arg.long(long);
                has_long = true;
            }
            Switch::Long(long) => arg = arg.visible_alias(long),
            Switch::Short(short) if !has_short => {
                arg = arg.short(short);
                has_short = true;
            }
            Switch::Short(short) => arg = arg.visible_short_alias(short),
        }
    }

    arg
}

impl CliParser {
    /// Program name shown in usage and help
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.command = self.command.name(name.into());
        self
    }

    /// Description shown above the argument list
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.command = self.command.about(about.into());
        self
    }

    /// Epilog shown below the argument list
    pub fn after_help(mut self, epilog: impl Into<String>) -> Self {
        self.command = self.command.after_help(epilog.into());
        self
    }

    /// The underlying clap command
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Render the help text
    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    /// Parse arguments (without the program name).
    ///
    /// Every bound setting gets an entry. Entries are explicit only when the
    /// user passed one of the setting's switches; for a toggle pair the last
    /// switch on the command line wins.
    ///
    /// # Errors
    ///
    /// Unknown switches, missing values and values that do not parse as the
    /// setting's kind are reported as clap errors. So is `--help`, with kind
    /// [`ErrorKind::DisplayHelp`].
    pub fn parse<I, T>(&self, argv: I) -> Result<CliValues, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(argv)?;
        let mut values = CliValues::new();

        for binding in &self.bindings {
            if let Some((value, explicit)) = binding.read(&matches) {
                values.insert(binding.key.clone(), value, explicit);
            }
        }

        tracing::debug!(explicit = values.explicit_keys().count(), "Parsed command line");
        Ok(values)
    }
}

impl Binding {
    fn read(&self, matches: &ArgMatches) -> Option<(Value, bool)> {
        match self.kind {
            SettingKind::Boolean => {
                if self.negated_id.as_deref().is_some_and(|id| from_command_line(matches, id)) {
                    Some((Value::Boolean(false), true))
                } else if self.id.as_deref().is_some_and(|id| from_command_line(matches, id)) {
                    Some((Value::Boolean(true), true))
                } else {
                    Some((self.default.clone(), false))
                }
            }
            SettingKind::StringList => {
                let id = self.id.as_deref()?;
                let explicit = from_command_line(matches, id);
                let items: Vec<String> = matches
                    .get_many::<Value>(id)
                    .map(|values| values.filter_map(|v| v.as_str().map(String::from)).collect())
                    .unwrap_or_default();
                Some((Value::List(items), explicit))
            }
            _ => {
                let id = self.id.as_deref()?;
                let value = matches.get_one::<Value>(id)?.clone();
                Some((value, from_command_line(matches, id)))
            }
        }
    }
}

fn from_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema
            .add_group("Example Group", |g| {
                g.add(Setting::builder("hello", "world").switch("--hello"))?;
                g.add(Setting::builder("verbose", false).switch("-v").toggle("--verbose"))?;
                g.add(Setting::builder("quiet", true).negated_switch("--loud"))?;
                g.add(Setting::builder("file_only", 1i64))?;
                Ok(())
            })
            .unwrap();
        schema
    }

    fn key(name: &str) -> SettingKey {
        SettingKey::new("Example Group", name)
    }

    #[test]
    fn test_settings_without_switches_are_not_bound() {
        let values = build_parser(&schema()).parse(Vec::<String>::new()).unwrap();
        assert!(values.get(&key("file_only")).is_none());
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_defaults_are_not_explicit() {
        let values = build_parser(&schema()).parse(Vec::<String>::new()).unwrap();

        let hello = values.get(&key("hello")).unwrap();
        assert_eq!(hello.value, Value::from("world"));
        assert!(!hello.explicit);
        assert!(!values.is_explicit(&key("verbose")));
    }

    #[test]
    fn test_negated_only_switch() {
        let values = build_parser(&schema()).parse(["--loud"]).unwrap();
        let quiet = values.get(&key("quiet")).unwrap();
        assert_eq!(quiet.value, Value::Boolean(false));
        assert!(quiet.explicit);
    }

    #[test]
    fn test_argument_ids_do_not_collide_with_internal_names() {
        let parser = build_parser(&schema());
        let ids: Vec<&str> = parser
            .command()
            .get_arguments()
            .map(|a| a.get_id().as_str())
            .collect();
        assert!(ids.contains(&"Example_Group__verbose"));
        assert!(ids.contains(&"Example_Group__verbose-negated"));
    }

    #[test]
    fn test_negated_id_cannot_clash_with_a_setting_named_negated() {
        let mut schema = Schema::new();
        schema
            .add_group("", |g| {
                g.add(Setting::builder("a", false).toggle("--a"))?;
                Ok(())
            })
            .unwrap();
        schema
            .add_group("a", |g| {
                g.add(Setting::builder("negated", false).switch("--neg"))?;
                Ok(())
            })
            .unwrap();

        let values = build_parser(&schema).parse(["--neg"]).unwrap();

        assert_eq!(
            values.get(&SettingKey::new("a", "negated")).unwrap().value,
            Value::Boolean(true)
        );
        assert!(!values.is_explicit(&SettingKey::new("", "a")));
    }

    #[test]
    fn test_anonymous_group_has_no_heading() {
        let mut schema = Schema::new();
        schema
            .add_group("", |g| {
                g.add(Setting::builder("top", false).switch("--top").help("Top level"))?;
                Ok(())
            })
            .unwrap();

        let parser = build_parser(&schema);
        let arg = parser
            .command()
            .get_arguments()
            .find(|a| a.get_id().as_str() == "top")
            .unwrap();

        assert_eq!(arg.get_help_heading(), None);
        let help = parser.render_help();
        assert!(help.contains("Options:"));
        assert!(!help.lines().any(|l| l.trim() == ":"));
    }
}
