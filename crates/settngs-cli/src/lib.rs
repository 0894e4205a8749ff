//! Command-line front end for settngs
//!
//! Builds a clap parser from a [`Schema`](settngs_schema::Schema), turns
//! argv into explicit-aware [`CliValues`](settngs_core::CliValues) and runs
//! the full load: stored file, then command line.
//!
//! # Example
//!
//! ```
//! use settngs_cli::load;
//! use settngs_core::Provenance;
//! use settngs_schema::{Schema, Setting, Value};
//!
//! let mut schema = Schema::new();
//! schema
//!     .add_group("example", |group| {
//!         group.add(Setting::builder("verbose", false).toggle("--verbose"))?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let stored = br#"{"example": {"verbose": true}}"#;
//! let resolution = load(&schema, ["--no-verbose"], Some(stored)).unwrap();
//!
//! assert_eq!(resolution.value("example", "verbose"), Some(&Value::Boolean(false)));
//! assert_eq!(resolution.provenance("example", "verbose"), Some(Provenance::Cli));
//! ```

pub mod adapter;
pub mod error;
pub mod logging;

pub use adapter::{CliParser, build_parser};
pub use error::{Error, Result};

use settngs_core::Resolution;
use settngs_schema::Schema;
use std::ffi::OsString;
use std::path::Path;

/// Parse `argv` (without the program name) and resolve it over the stored
/// JSON settings.
pub fn load<I, T>(schema: &Schema, argv: I, stored: Option<&[u8]>) -> Result<Resolution>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = build_parser(schema).parse(argv)?;
    Ok(settngs_core::load(schema, &cli, stored)?)
}

/// Parse `argv` and resolve it over the settings file at `path`
pub fn load_file<I, T>(schema: &Schema, argv: I, path: &Path) -> Result<Resolution>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = build_parser(schema).parse(argv)?;
    Ok(settngs_core::load_file(schema, &cli, path)?)
}
