//! Schemas shared by the test suites.

use settngs_schema::{Schema, Setting};

/// The demo program's schema.
///
/// - `example.hello`: string, default `world`, `--hello`
/// - `example.save`: boolean, `-s`/`--save`, not persistent
/// - `example.verbose`: boolean toggle, `-v`/`--verbose` and `--no-verbose`
/// - `persistent.test`: boolean toggle, `-t`/`--test` and `--no-test`
pub fn example_schema() -> Schema {
    let mut schema = Schema::new();
    schema
        .add_group("example", |g| {
            g.add(
                Setting::builder("hello", "world")
                    .switch("--hello")
                    .help("Who to greet"),
            )?;
            g.add(
                Setting::builder("save", false)
                    .switches(["-s", "--save"])
                    .persistent(false)
                    .help("Save settings to settings.json"),
            )?;
            g.add(
                Setting::builder("verbose", false)
                    .switch("-v")
                    .toggle("--verbose")
                    .help("Enable verbose output"),
            )?;
            Ok(())
        })
        .unwrap();
    schema
        .add_group("persistent", |g| {
            g.add(
                Setting::builder("test", false)
                    .switch("-t")
                    .toggle("--test")
                    .help("A persistent toggle"),
            )?;
            Ok(())
        })
        .unwrap();
    schema
}

/// One setting of every kind, in group `kinds`, each with a long switch
/// named after it.
pub fn every_kind_schema() -> Schema {
    let mut schema = Schema::new();
    schema
        .add_group("kinds", |g| {
            g.add(Setting::builder("name", "default").switch("--name"))?;
            g.add(Setting::builder("count", 3i64).switch("--count"))?;
            g.add(Setting::builder("ratio", 0.5f64).switch("--ratio"))?;
            g.add(Setting::builder("enabled", true).toggle("--enabled"))?;
            g.add(Setting::builder("tags", vec!["a", "b"]).switch("--tags"))?;
            Ok(())
        })
        .unwrap();
    schema
}
