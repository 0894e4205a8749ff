//! Property tests for layer precedence and default round-trips

use proptest::prelude::*;
use settngs_core::{CliValues, Provenance, defaults, flatten, load, project, resolve};
use settngs_core::FlatValues;
use settngs_schema::{SettingKey, Value};
use settngs_test_utils::schema::every_kind_schema;

fn count_key() -> SettingKey {
    SettingKey::new("kinds", "count")
}

proptest! {
    #[test]
    fn explicit_cli_always_wins(file in proptest::option::of(any::<i64>()), cli in any::<i64>()) {
        let schema = every_kind_schema();
        let mut persisted = FlatValues::new();
        if let Some(v) = file {
            persisted.insert(count_key(), serde_json::json!(v));
        }
        let mut cli_values = CliValues::new();
        cli_values.insert(count_key(), cli, true);

        let resolved = resolve(&schema, &persisted, &cli_values);
        let count = resolved.values.iter().find(|v| v.key == count_key()).unwrap();

        prop_assert_eq!(&count.value, &Value::Integer(cli));
        prop_assert_eq!(count.provenance, Provenance::Cli);
    }

    #[test]
    fn file_wins_over_default_without_explicit_cli(file in any::<i64>(), cli in any::<i64>()) {
        let schema = every_kind_schema();
        let mut persisted = FlatValues::new();
        persisted.insert(count_key(), serde_json::json!(file));
        let mut cli_values = CliValues::new();
        cli_values.insert(count_key(), cli, false);

        let resolved = resolve(&schema, &persisted, &cli_values);
        let count = resolved.values.iter().find(|v| v.key == count_key()).unwrap();

        prop_assert_eq!(&count.value, &Value::Integer(file));
        prop_assert_eq!(count.provenance, Provenance::File);
    }

    #[test]
    fn saved_strings_reload_unchanged(name in ".*") {
        let schema = every_kind_schema();
        let mut cli = CliValues::new();
        cli.insert(SettingKey::new("kinds", "name"), name.clone(), true);

        let first = load(&schema, &cli, None).unwrap();
        let bytes = settngs_core::save(&schema, first.namespace()).unwrap();
        let second = load(&schema, &CliValues::new(), Some(&bytes)).unwrap();

        prop_assert_eq!(second.value("kinds", "name"), Some(&Value::String(name)));
    }
}

#[test]
fn defaults_round_trip_through_flatten() {
    let schema = every_kind_schema();
    let resolved = resolve(&schema, &FlatValues::new(), &CliValues::new());

    let document = project(&resolved.values).to_document();
    let flattened = flatten(&schema, &document);
    let again = resolve(&schema, &flattened.values, &CliValues::new());

    for (before, after) in resolved.values.iter().zip(&again.values) {
        assert_eq!(before.value, after.value);
    }
    assert!(flattened.unrecognized.is_empty());
    assert_eq!(defaults(&schema).values(), resolved.values.as_slice());
}
