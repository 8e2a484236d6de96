//! Built-in layouts that can be checked without writing a schema document.

use crate::load::SchemaLoadError;
use dirmatch_types::{DirectoryRequirement, FileRequirement, SchemaError};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Result<DirectoryRequirement, SchemaError>,
}

impl Preset {
    pub fn requirement(&self) -> Result<DirectoryRequirement, SchemaLoadError> {
        (self.build)().map_err(|source| SchemaLoadError::InvalidPreset {
            name: self.name.to_string(),
            source,
        })
    }
}

const PRESETS: &[Preset] = &[Preset {
    name: "texture-pack",
    description: "Texture pack: pack_info (txt or json) plus color, shadow and shape texture folders",
    build: texture_pack,
}];

/// Every built-in preset, sorted by name.
pub fn presets() -> &'static [Preset] {
    PRESETS
}

pub fn find_preset(name: &str) -> Result<DirectoryRequirement, SchemaLoadError> {
    debug!(preset = name, "resolving built-in preset");
    match PRESETS.iter().find(|p| p.name == name) {
        Some(preset) => preset.requirement(),
        None => Err(SchemaLoadError::UnknownPreset {
            name: name.to_string(),
            available: PRESETS
                .iter()
                .map(|p| p.name)
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// `pack_info.txt` or `pack_info.json`, and three texture folders whose contents are free-form.
pub fn texture_pack() -> Result<DirectoryRequirement, SchemaError> {
    DirectoryRequirement::builder()
        .file("pack_info", FileRequirement::any(["txt", "json"])?)
        .subdir("Color Textures", DirectoryRequirement::empty())
        .subdir("Shadow Textures", DirectoryRequirement::empty())
        .subdir("Shape Textures", DirectoryRequirement::empty())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirmatch_types::Quantifier;

    #[test]
    fn every_preset_builds() {
        for preset in presets() {
            preset.requirement().unwrap();
        }
    }

    #[test]
    fn presets_are_sorted_and_unique() {
        let names: Vec<_> = presets().iter().map(|p| p.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn texture_pack_shape() {
        let req = texture_pack().unwrap();
        assert!(!req.is_strict());
        let info = req.file("pack_info").unwrap();
        assert_eq!(info.quantifier(), Quantifier::Any);
        assert_eq!(info.extensions(), ["txt", "json"]);
        let names: Vec<_> = req.subdirs().keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["Color Textures", "Shadow Textures", "Shape Textures"]
        );
        assert!(req.subdirs().values().all(|d| d.files().is_empty() && !d.is_strict()));
    }

    #[test]
    fn unknown_preset_lists_available() {
        let err = find_preset("sprite-sheet").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown preset 'sprite-sheet' (available: texture-pack)"
        );
    }
}
