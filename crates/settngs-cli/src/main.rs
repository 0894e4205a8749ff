//! settngs demo host
//!
//! Greets someone, optionally saving its settings to `./settings.json`.

use settngs_cli::{Error, Result, build_parser, logging};
use settngs_core::{CliValues, Resolution};
use settngs_schema::{Schema, Setting, SettingKey, Value};
use std::path::Path;

const SETTINGS_FILE: &str = "settings.json";

fn main() {
    if let Err(e) = logging::init() {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    match run() {
        Ok(()) => {}
        Err(Error::Argument(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn schema() -> Result<Schema> {
    let mut schema = Schema::new();
    schema.add_group("example", |g| {
        g.add(Setting::builder("hello", "world").switch("--hello").help("Who to greet"))?;
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
                .help("Print extra output"),
        )?;
        Ok(())
    })?;
    schema.add_group("persistent", |g| {
        g.add(Setting::builder("test", false).switch("-t").toggle("--test"))?;
        Ok(())
    })?;
    Ok(schema)
}

fn run() -> Result<()> {
    let schema = schema()?;
    let path = Path::new(SETTINGS_FILE);

    let cli = build_parser(&schema)
        .name("settngs-demo")
        .about("This is an example")
        .after_help("goodbye!")
        .parse(std::env::args_os().skip(1))?;

    let resolution = load(&schema, &cli, path)?;

    if let Some(hello) = resolution.value("example", "hello") {
        println!("Hello {}", hello);
    }

    if is_set(&resolution, "save") {
        settngs_core::save_file(&schema, resolution.namespace(), path)?;
        println!("Successfully saved settings to {}", SETTINGS_FILE);
    }

    if is_set(&resolution, "verbose") {
        if let Some(verbose) = resolution.get(&SettingKey::new("example", "verbose")) {
            println!("{}={}", verbose.key, verbose.value);
        }
    }

    Ok(())
}

/// Load the settings file, falling back to defaults when it cannot be read.
fn load(schema: &Schema, cli: &CliValues, path: &Path) -> Result<Resolution> {
    let resolution = match settngs_core::load_file(schema, cli, path) {
        Ok(resolution) => resolution,
        Err(e) if e.is_decode() => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable settings file");
            settngs_core::load(schema, cli, None)?
        }
        Err(e) => return Err(e.into()),
    };

    for diagnostic in resolution.diagnostics() {
        tracing::warn!("{}", diagnostic);
    }
    Ok(resolution)
}

fn is_set(resolution: &Resolution, name: &str) -> bool {
    resolution.value("example", name) == Some(&Value::Boolean(true))
}
