//! Host-facing load and save
//!
//! Loading decodes the stored bytes, splits the document into declared
//! values and unrecognized entries, resolves every setting and projects the
//! persistent ones into a [`Namespace`]. Saving goes the other way, re-reading
//! the namespace through the schema so that only declared persistent
//! settings (plus the unrecognized bucket) are written.

use crate::Result;
use crate::projector::{Namespace, flatten, project};
use crate::resolver::{CliValues, Diagnostic, Provenance, ResolvedValue, resolve};
use settngs_codec::{Codec, Document, Format, JsonCodec, io};
use settngs_schema::{Schema, SettingKey, Value};
use std::path::Path;

/// The outcome of loading settings
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    values: Vec<ResolvedValue>,
    namespace: Namespace,
    diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// The resolved value of any declared setting, persistent or not
    pub fn value(&self, group: &str, name: &str) -> Option<&Value> {
        self.find(group, name).map(|v| &v.value)
    }

    /// Which layer won for a setting
    pub fn provenance(&self, group: &str, name: &str) -> Option<Provenance> {
        self.find(group, name).map(|v| v.provenance)
    }

    pub fn get(&self, key: &SettingKey) -> Option<&ResolvedValue> {
        self.values.iter().find(|v| &v.key == key)
    }

    /// Every resolved value, in declaration order
    pub fn values(&self) -> &[ResolvedValue] {
        &self.values
    }

    /// The persistent settings, grouped
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn into_namespace(self) -> Namespace {
        self.namespace
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn find(&self, group: &str, name: &str) -> Option<&ResolvedValue> {
        self.values
            .iter()
            .find(|v| v.key.group == group && v.key.name == name)
    }
}

/// Resolve an already decoded document (or none) against the command line.
pub fn resolve_document(
    schema: &Schema,
    document: Option<&Document>,
    cli: &CliValues,
) -> Resolution {
    let empty = Document::new();
    let flattened = flatten(schema, document.unwrap_or(&empty));
    let resolved = resolve(schema, &flattened.values, cli);

    let mut diagnostics = flattened.diagnostics;
    diagnostics.extend(resolved.diagnostics);

    let namespace = project(&resolved.values).with_unrecognized(flattened.unrecognized);

    Resolution {
        values: resolved.values,
        namespace,
        diagnostics,
    }
}

/// Load settings from JSON bytes, or from defaults when `stored` is `None`.
///
/// # Errors
///
/// Returns an error only when `stored` cannot be decoded; see
/// [`Error::is_decode`](crate::Error::is_decode). Unusable values inside a
/// valid document are reported through [`Resolution::diagnostics`].
pub fn load(schema: &Schema, cli: &CliValues, stored: Option<&[u8]>) -> Result<Resolution> {
    load_with_codec(schema, cli, stored, &JsonCodec)
}

/// Same as [`load`] with an explicit codec
pub fn load_with_codec(
    schema: &Schema,
    cli: &CliValues,
    stored: Option<&[u8]>,
    codec: &dyn Codec,
) -> Result<Resolution> {
    let document = stored.map(|bytes| codec.decode(bytes)).transpose()?;
    Ok(resolve_document(schema, document.as_ref(), cli))
}

/// Resolution with no stored settings and no command line
pub fn defaults(schema: &Schema) -> Resolution {
    resolve_document(schema, None, &CliValues::new())
}

/// Build the document that would be persisted for `namespace`.
///
/// Only declared persistent settings are written, in declaration order, so
/// values the schema does not declare are left out. A missing entry, or one
/// whose value does not fit the declared kind, falls back to the default.
pub fn persisted_document(schema: &Schema, namespace: &Namespace) -> Document {
    let mut clean = Namespace::new();

    for setting in schema.all_settings().filter(|s| s.is_persistent()) {
        let key = setting.key();
        let value = match namespace.get(&key.group, &key.name) {
            Some(value) if setting.kind().accepts(value) => value.clone(),
            Some(value) => {
                tracing::warn!(
                    %key,
                    expected = %setting.kind(),
                    found = %value.kind(),
                    "Saving default in place of mistyped value"
                );
                setting.default().clone()
            }
            None => {
                tracing::warn!(%key, "Saving default for missing value");
                setting.default().clone()
            }
        };
        clean.set(&key.group, &key.name, value);
    }

    clean
        .with_unrecognized(namespace.unrecognized().clone())
        .to_document()
}

/// Encode a namespace as JSON
pub fn save(schema: &Schema, namespace: &Namespace) -> Result<Vec<u8>> {
    save_with_codec(schema, namespace, &JsonCodec)
}

/// Same as [`save`] with an explicit codec
pub fn save_with_codec(schema: &Schema, namespace: &Namespace, codec: &dyn Codec) -> Result<Vec<u8>> {
    let document = persisted_document(schema, namespace);
    Ok(codec.encode(&document)?)
}

/// Load settings from a file whose format follows its extension.
///
/// A missing file is treated like no stored settings.
pub fn load_file(schema: &Schema, cli: &CliValues, path: &Path) -> Result<Resolution> {
    let format = Format::from_path(path)?;
    let stored = io::read_optional(path)?;
    load_with_codec(schema, cli, stored.as_deref(), format.codec())
}

/// Save a namespace to a file whose format follows its extension.
///
/// The write is atomic: readers see either the old or the new content.
pub fn save_file(schema: &Schema, namespace: &Namespace, path: &Path) -> Result<()> {
    let format = Format::from_path(path)?;
    let bytes = save_with_codec(schema, namespace, format.codec())?;
    io::write_atomic(path, &bytes)?;
    tracing::info!(path = %path.display(), "Saved settings");
    Ok(())
}
