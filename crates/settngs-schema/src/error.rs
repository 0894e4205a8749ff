//! Error types for settngs-schema

use crate::setting::SettingKey;

/// Result type for schema declarations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while declaring settings.
///
/// All of these are programmer errors in the host's schema and are never
/// recoverable at runtime.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// `(group, name)` was declared twice
    #[error("Duplicate option: {key} is already declared")]
    DuplicateOption { key: SettingKey },

    /// The default value does not conform to the declared kind
    #[error("Invalid default for {key}: {reason}")]
    InvalidDefault { key: SettingKey, reason: String },

    #[error("Invalid option name {name:?} in group {group:?}")]
    InvalidName { group: String, name: String },

    /// A switch spelling is malformed, reserved, or not allowed for the kind
    #[error("Invalid switch {switch:?} for {key}: {reason}")]
    InvalidSwitch {
        key: SettingKey,
        switch: String,
        reason: String,
    },

    #[error("Switch {switch} is bound to both {first} and {second}")]
    DuplicateSwitch {
        switch: String,
        first: SettingKey,
        second: SettingKey,
    },

    /// Two distinct keys sanitize to the same internal name
    #[error("{key} collides with {other} (both map to {internal_name})")]
    NameCollision {
        key: SettingKey,
        other: SettingKey,
        internal_name: String,
    },
}
