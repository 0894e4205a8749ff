//! Shared test utilities for the settngs workspace.
//!
//! This crate provides standardised test fixtures to avoid duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`schema`]: ready-made schemas, including the demo program's
//! - [`dir`]: [`TestSettingsDir`](dir::TestSettingsDir), a scratch directory
//!   holding a settings file

pub mod dir;
pub mod schema;
