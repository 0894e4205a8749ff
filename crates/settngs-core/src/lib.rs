//! Layered settings resolution for settngs
//!
//! This crate merges the three sources of a setting's value and shapes the
//! result for the host program:
//!
//! - **Resolver**: per-setting precedence of command line over persisted file
//!   over schema default, with a provenance tag on every value
//! - **Projector**: the two-level group -> option -> value [`Namespace`] and
//!   its inverse, including the bucket of unrecognized persisted entries
//! - **Host surface**: [`load`], [`save`] and their file based variants
//!
//! # Architecture
//!
//! ```text
//!              settngs-cli
//!                   |
//!              settngs-core
//!                   |
//!       +-----------+-----------+
//!       |                       |
//! settngs-schema          settngs-codec
//! ```
//!
//! # Example
//!
//! ```
//! use settngs_core::{CliValues, Provenance, load};
//! use settngs_schema::{Schema, Setting, SettingKey, Value};
//!
//! let mut schema = Schema::new();
//! schema
//!     .add_group("example", |group| {
//!         group.add(Setting::builder("hello", "world").switch("--hello"))?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let mut cli = CliValues::new();
//! cli.insert(SettingKey::new("example", "hello"), Value::from("lordwelch"), true);
//!
//! let resolution = load(&schema, &cli, Some(br#"{"example": {"hello": "file"}}"#)).unwrap();
//! assert_eq!(resolution.value("example", "hello"), Some(&Value::from("lordwelch")));
//! assert_eq!(resolution.provenance("example", "hello"), Some(Provenance::Cli));
//! ```

pub mod error;
pub mod projector;
pub mod resolver;
pub mod settings;

pub use error::{Error, Result};
pub use projector::{Flattened, GroupValues, Namespace, flatten, project};
pub use resolver::{
    CliEntry, CliValues, Diagnostic, FlatValues, Provenance, Resolved, ResolvedValue,
    SchemaMismatchError, resolve,
};
pub use settings::{
    Resolution, defaults, load, load_file, load_with_codec, persisted_document, resolve_document,
    save, save_file, save_with_codec,
};

pub use settngs_codec::Document;
