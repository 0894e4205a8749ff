//! Property tests over whole load/save cycles

use proptest::prelude::*;
use settngs_cli::load;
use settngs_codec::{Codec, Document, JsonCodec};
use settngs_core::{CliValues, Provenance, save};
use settngs_schema::Value;
use settngs_test_utils::schema::example_schema;

fn unknown_group_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}".prop_filter("must not be a declared group", |name| {
        name != "example" && name != "persistent"
    })
}

fn scalar() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        "[ -~]{0,12}".prop_map(serde_json::Value::from),
    ]
}

proptest! {
    #[test]
    fn unknown_groups_survive_load_and_save(
        group in unknown_group_name(),
        option in "[a-z]{1,8}",
        value in scalar(),
    ) {
        let schema = example_schema();
        let mut stored = Document::new();
        let mut entries = Document::new();
        entries.insert(option.clone(), value.clone());
        stored.insert(group.clone(), serde_json::Value::Object(entries));
        let bytes = JsonCodec.encode(&stored).unwrap();

        let resolution = load(&schema, Vec::<String>::new(), Some(&bytes)).unwrap();
        let saved = JsonCodec.decode(&save(&schema, resolution.namespace()).unwrap()).unwrap();

        prop_assert_eq!(&saved[&group][&option], &value);
    }

    #[test]
    fn cli_beats_file_for_hello(file in "[a-z]{1,10}", cli in "[a-z]{1,10}") {
        let schema = example_schema();
        let stored = serde_json::to_vec(&serde_json::json!({"example": {"hello": file}})).unwrap();

        let resolution = load(&schema, ["--hello", cli.as_str()], Some(&stored)).unwrap();

        prop_assert_eq!(resolution.value("example", "hello"), Some(&Value::String(cli)));
        prop_assert_eq!(resolution.provenance("example", "hello"), Some(Provenance::Cli));
    }

    #[test]
    fn saving_is_idempotent(hello in "[ -~]{0,16}", verbose in any::<bool>(), test in any::<bool>()) {
        let schema = example_schema();
        let mut stored = Document::new();
        stored.insert(
            "example".into(),
            serde_json::json!({"hello": hello, "verbose": verbose}),
        );
        stored.insert("persistent".into(), serde_json::json!({"test": test}));
        let bytes = JsonCodec.encode(&stored).unwrap();

        let once = settngs_core::load(&schema, &CliValues::new(), Some(&bytes)).unwrap();
        let saved_once = save(&schema, once.namespace()).unwrap();
        let twice = settngs_core::load(&schema, &CliValues::new(), Some(&saved_once)).unwrap();
        let saved_twice = save(&schema, twice.namespace()).unwrap();

        prop_assert_eq!(&saved_once, &bytes);
        prop_assert_eq!(saved_once, saved_twice);
    }
}
