//! Patchscope preset library
//!
//! This crate turns a synthesizer preset container into engine parameter
//! writes. It has two halves:
//!
//! - **Attribute extraction**: a small scanner that bounds the `<tal>` section
//!   by tag search, picks the first `<program>` element and tokenizes its
//!   `name="value"` attributes into a [`PresetAttributes`] map. Missing
//!   structure yields an empty map rather than an error.
//! - **Address table**: the compiled-in [`ParameterAddressTable`] that maps
//!   attribute names to engine parameter addresses.
//!
//! # Example
//!
//! ```
//! use patchscope_preset::{ParameterAddressTable, PresetAttributes};
//!
//! let text = r#"<tal version="1"><programs><program volume="0.5" bogus="x"/></programs></tal>"#;
//! let attributes = PresetAttributes::from_text(text);
//! assert_eq!(attributes.get("volume"), Some(0.5));
//!
//! let mapped = ParameterAddressTable::builtin().resolve(&attributes);
//! assert_eq!(mapped[0].address, 1);
//! ```
//!
//! # Modules
//!
//! - [`attributes`]: Attribute extraction from container text or bytes
//! - [`address`]: Static name to address mapping
//! - [`preset`]: Preset loading with a file-derived display name
//! - [`error`]: Error types and the shared [`CodedError`] trait

pub mod address;
pub mod attributes;
pub mod error;
pub mod preset;

pub use address::{MappedParameter, ParameterAddress, ParameterAddressTable};
pub use attributes::{decode_text, program_string_attribute, PresetAttributes};
pub use error::{CodedError, PresetError};
pub use preset::{preset_name, Preset};
