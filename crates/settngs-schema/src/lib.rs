//! Option and group declarations for settngs.
//!
//! A host program declares its settings once, grouped by namespace, and
//! passes the resulting [`Schema`] by reference into every resolution call.
//! Each setting carries a closed [`SettingKind`] which owns the coercion
//! rules for persisted and command-line input.
//!
//! # Example
//!
//! ```
//! use settngs_schema::{Schema, Setting};
//!
//! let mut schema = Schema::new();
//! schema
//!     .add_group("example", |group| {
//!         group.add(Setting::builder("hello", "world").switch("--hello"))?;
//!         group.add(Setting::builder("verbose", false).toggle("--verbose"))?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let verbose = schema.lookup("example", "verbose").unwrap();
//! assert_eq!(verbose.negated_switches(), ["--no-verbose"]);
//! ```

pub mod error;
pub mod registry;
pub mod setting;
pub mod value;

pub use error::{Error, Result};
pub use registry::{Group, GroupBuilder, GroupHandle, Schema, SettingHandle};
pub use setting::{Setting, SettingBuilder, SettingKey, Switch, sanitize_name};
pub use value::{CoerceError, SettingKind, Value, json_shape};
