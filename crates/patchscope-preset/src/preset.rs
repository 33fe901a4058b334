//! A loaded preset: display name plus extracted attributes.

use std::fs;
use std::path::Path;

use crate::attributes::{decode_text, program_string_attribute, PresetAttributes};
use crate::error::PresetError;

/// Fallback name when a path has no usable file stem.
const DEFAULT_PRESET_NAME: &str = "preset";

/// Preset loaded from a container file.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Name derived from the file's base name without extension.
    pub name: String,
    /// `programname` attribute, when the program element carries one.
    pub program_name: Option<String>,
    /// Numeric attributes of the active program.
    pub attributes: PresetAttributes,
}

impl Preset {
    /// Loads a preset container.
    ///
    /// Fails only when the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| PresetError::read(path, e))?;
        let text = decode_text(&bytes);

        Ok(Self {
            name: preset_name(path),
            program_name: program_string_attribute(&text, "programname"),
            attributes: PresetAttributes::from_text(&text),
        })
    }
}

/// Derives a preset name from a path's file stem.
pub fn preset_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| DEFAULT_PRESET_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_preset_name_strips_extension() {
        assert_eq!(preset_name(Path::new("/a/b/Fat Bass.vstpreset")), "Fat Bass");
        assert_eq!(preset_name(Path::new("lead")), "lead");
        assert_eq!(preset_name(Path::new("archive.tar.gz")), "archive.tar");
    }

    #[test]
    fn test_preset_name_fallback() {
        assert_eq!(preset_name(Path::new("/")), "preset");
        assert_eq!(preset_name(&PathBuf::new()), "preset");
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = Preset::load("/definitely/not/here.vstpreset").unwrap_err();
        assert!(matches!(err, PresetError::Read { .. }));
    }

    #[test]
    fn test_load_reads_name_and_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Sync Lead.vstpreset");
        fs::write(
            &path,
            r#"<tal ><program programname="Sync Lead" volume="0.6" sawvolume="1"/></tal>"#,
        )
        .unwrap();

        let preset = Preset::load(&path).unwrap();
        assert_eq!(preset.name, "Sync Lead");
        assert_eq!(preset.program_name.as_deref(), Some("Sync Lead"));
        assert_eq!(preset.attributes.len(), 2);
        assert_eq!(preset.attributes.get("volume"), Some(0.6));
    }
}
