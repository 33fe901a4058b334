//! Preset attribute extraction.
//!
//! A preset container is treated as opaque text holding one `<tal ...>`
//! section. Inside it, the first `<program ...>` element carries the active
//! program as `name="value"` attributes. Every attribute whose value parses as
//! an `f32` becomes an entry of [`PresetAttributes`]; everything else is
//! dropped silently.
//!
//! Structural absence is a soft failure: a container without the section or
//! element yields an empty attribute set, which callers treat as "no
//! parameter overrides".

mod scanner;


use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::PresetError;

/// Immutable mapping from attribute name to numeric value.
///
/// Iteration is ordered by name, so anything derived from the attributes
/// (parameter application order, logs, serialized output) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PresetAttributes {
    values: BTreeMap<String, f32>,
}

impl PresetAttributes {
    /// Reads a preset container from disk and extracts its attributes.
    ///
    /// Only I/O failures are errors. A file that does not contain the expected
    /// section returns an empty set.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| PresetError::read(path, e))?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Extracts attributes from raw container bytes.
    ///
    /// Bytes are decoded as UTF-8 when valid, otherwise as Latin-1.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_text(&decode_text(bytes))
    }

    /// Extracts attributes from already-decoded container text.
    pub fn from_text(text: &str) -> Self {
        let Some(section) = scanner::outer_section(text) else {
            debug!("preset has no <tal> section");
            return Self::default();
        };
        let Some(element) = scanner::program_element(section) else {
            debug!("preset section has no <program> element");
            return Self::default();
        };

        let mut values = BTreeMap::new();
        let mut dropped = 0usize;
        for (name, literal) in scanner::AttributeTokens::new(element) {
            match literal.trim().parse::<f32>() {
                Ok(value) => {
                    values.insert(name.to_string(), value);
                }
                Err(_) => dropped += 1,
            }
        }

        debug!(parsed = values.len(), dropped, "extracted preset attributes");
        Self { values }
    }

    /// Returns the value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.get(name).copied()
    }

    /// Returns true if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of numeric attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no attribute was extracted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f32)> for PresetAttributes {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Decodes container bytes as UTF-8, falling back to Latin-1.
///
/// Latin-1 maps every byte to the code point of the same value, so the
/// fallback never fails and keeps all ASCII markup intact.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Returns the raw string value of attribute `name` on the program element.
///
/// Used for display-only attributes such as `programname` that are not
/// numeric and therefore absent from [`PresetAttributes`].
pub fn program_string_attribute(text: &str, name: &str) -> Option<String> {
    let section = scanner::outer_section(text)?;
    let element = scanner::program_element(section)?;
    scanner::AttributeTokens::new(element)
        .filter(|(key, _)| *key == name)
        .last()
        .map(|(_, value)| value.to_string())
}
