//! Scenario tests across the whole stack
//!
//! Each test declares a schema, parses a command line, loads and saves
//! settings files, and checks the values and provenance a host would see.

use pretty_assertions::assert_eq;
use serde_json::json;
use settngs_cli::{build_parser, load, load_file};
use settngs_codec::{Codec, Format};
use settngs_core::{Diagnostic, Provenance, save, save_file};
use settngs_schema::{Schema, Setting, SettingKind, Value};
use settngs_test_utils::dir::TestSettingsDir;
use settngs_test_utils::schema::example_schema;

// =============================================================================
// Greeting scenario
// =============================================================================

#[test]
fn test_greeting_scenario_round_trip() {
    let dir = TestSettingsDir::new();
    let schema = example_schema();

    let first = load_file(&schema, ["--hello", "lordwelch"], &dir.settings_path()).unwrap();
    assert_eq!(first.provenance("example", "hello"), Some(Provenance::Cli));
    save_file(&schema, first.namespace(), &dir.settings_path()).unwrap();

    dir.assert_settings_json(json!({
        "example": {"hello": "lordwelch", "verbose": false},
        "persistent": {"test": false}
    }));

    let second = load_file(&schema, Vec::<String>::new(), &dir.settings_path()).unwrap();
    assert_eq!(second.namespace(), first.namespace());
    assert_eq!(second.provenance("example", "hello"), Some(Provenance::File));

    let third = load_file(&schema, ["--no-verbose"], &dir.settings_path()).unwrap();
    assert_eq!(third.value("example", "verbose"), Some(&Value::Boolean(false)));
    assert_eq!(third.provenance("example", "verbose"), Some(Provenance::Cli));
}

#[test]
fn test_disable_switch_beats_persisted_true() {
    let schema = example_schema();
    let stored = br#"{"example": {"verbose": true}, "persistent": {"test": true}}"#;

    let resolution = load(&schema, ["--no-test"], Some(stored)).unwrap();

    assert_eq!(resolution.value("persistent", "test"), Some(&Value::Boolean(false)));
    assert_eq!(resolution.provenance("persistent", "test"), Some(Provenance::Cli));
    assert_eq!(resolution.value("example", "verbose"), Some(&Value::Boolean(true)));
    assert_eq!(resolution.provenance("example", "verbose"), Some(Provenance::File));
}

#[test]
fn test_session_only_setting_is_visible_but_not_saved() {
    let schema = example_schema();

    let resolution = load(&schema, ["-s"], None).unwrap();

    assert_eq!(resolution.value("example", "save"), Some(&Value::Boolean(true)));
    assert_eq!(resolution.namespace().get("example", "save"), None);
    let saved: serde_json::Value =
        serde_json::from_slice(&save(&schema, resolution.namespace()).unwrap()).unwrap();
    assert_eq!(saved["example"], json!({"hello": "world", "verbose": false}));
}

// =============================================================================
// Unrecognized entries
// =============================================================================

#[test]
fn test_unrecognized_entries_survive_a_cli_override_and_save() {
    let dir = TestSettingsDir::new();
    dir.write_settings(
        r#"{
  "retired": {"flag": true},
  "persistent": {"test": false, "hello": "world"},
  "example": {"hello": "old"}
}"#,
    );
    let schema = example_schema();

    let resolution = load_file(&schema, ["--hello", "new", "-t"], &dir.settings_path()).unwrap();
    save_file(&schema, resolution.namespace(), &dir.settings_path()).unwrap();

    assert_eq!(
        dir.read_settings(),
        "{\n  \"example\": {\n    \"hello\": \"new\",\n    \"verbose\": false\n  },\n  \"persistent\": {\n    \"test\": true,\n    \"hello\": \"world\"\n  },\n  \"retired\": {\n    \"flag\": true\n  }\n}\n"
    );
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn test_mismatched_file_value_is_reported_and_cli_still_applies() {
    let schema = example_schema();
    let stored = br#"{"example": {"hello": {"nested": 1}, "verbose": "maybe"}}"#;

    let resolution = load(&schema, ["-v"], Some(stored)).unwrap();

    assert_eq!(resolution.value("example", "hello"), Some(&Value::from("world")));
    assert_eq!(resolution.value("example", "verbose"), Some(&Value::Boolean(true)));
    assert_eq!(resolution.provenance("example", "verbose"), Some(Provenance::Cli));

    let diagnostics = resolution.diagnostics();
    assert_eq!(diagnostics.len(), 2);
    match &diagnostics[0] {
        Diagnostic::SchemaMismatch(e) => {
            assert_eq!(e.key.name, "hello");
            assert_eq!(e.expected, SettingKind::String);
            assert_eq!(e.found, "object");
        }
        other => panic!("expected a schema mismatch, got {:?}", other),
    }
    assert!(matches!(
        &diagnostics[1],
        Diagnostic::Discarded { source: Provenance::File, .. }
    ));
}

// =============================================================================
// Formats
// =============================================================================

#[test]
fn test_json_and_toml_files_resolve_identically() {
    let schema = example_schema();
    let json_dir = TestSettingsDir::new();
    let toml_dir = TestSettingsDir::with_file_name("settings.toml");

    let seeded = load(&schema, ["--hello", "formats", "-v", "-t"], None).unwrap();
    save_file(&schema, seeded.namespace(), &json_dir.settings_path()).unwrap();
    save_file(&schema, seeded.namespace(), &toml_dir.settings_path()).unwrap();

    let from_json = load_file(&schema, Vec::<String>::new(), &json_dir.settings_path()).unwrap();
    let from_toml = load_file(&schema, Vec::<String>::new(), &toml_dir.settings_path()).unwrap();

    assert_eq!(from_json.namespace(), from_toml.namespace());
    assert_eq!(from_toml.value("example", "hello"), Some(&Value::from("formats")));
    let toml_doc = Format::Toml.codec().decode(toml_dir.read_settings().as_bytes()).unwrap();
    assert_eq!(toml_doc["persistent"]["test"], json!(true));
}

// =============================================================================
// Custom schemas
// =============================================================================

#[test]
fn test_groups_with_spaces_in_their_names() {
    let mut schema = Schema::new();
    schema
        .add_group("Example Group", |g| {
            g.help("Settings for the example");
            g.add(Setting::builder("retries", 2i64).switch("--retries").metavar("N"))?;
            Ok(())
        })
        .unwrap();

    let help = build_parser(&schema).render_help();
    assert!(help.contains("Settings for the example:"), "{}", help);
    assert!(help.contains("--retries <N>"), "{}", help);

    let resolution = load(&schema, ["--retries", "5"], Some(br#"{"Example Group": {"retries": 3}}"#)).unwrap();
    assert_eq!(resolution.value("Example Group", "retries"), Some(&Value::Integer(5)));
    let doc = resolution.namespace().to_document();
    assert_eq!(doc["Example Group"]["retries"], json!(5));
}

#[test]
fn test_custom_toggle_spellings() {
    let mut schema = Schema::new();
    schema
        .add_group("g", |g| {
            g.add(
                Setting::builder("x", false)
                    .switch("--enable-x")
                    .negated_switch("--disable-x"),
            )?;
            Ok(())
        })
        .unwrap();
    let stored = br#"{"g": {"x": true}}"#;

    let cli = build_parser(&schema).parse(["--disable-x"]).unwrap();
    let entry = cli.get(&settngs_schema::SettingKey::new("g", "x")).unwrap();
    assert!(entry.explicit);
    assert_eq!(entry.value, Value::Boolean(false));

    let resolution = load(&schema, ["--disable-x"], Some(stored)).unwrap();
    assert_eq!(resolution.value("g", "x"), Some(&Value::Boolean(false)));
    assert_eq!(resolution.provenance("g", "x"), Some(Provenance::Cli));

    let untouched = load(&schema, Vec::<String>::new(), Some(stored)).unwrap();
    assert_eq!(untouched.value("g", "x"), Some(&Value::Boolean(true)));
}
