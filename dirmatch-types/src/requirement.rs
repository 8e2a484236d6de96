//! The Schema Model: declarative, immutable description of an expected tree.
//!
//! Values are only ever produced through validation, either by the constructors and
//! [`DirectoryRequirementBuilder`] or by deserialization (which routes through the same checks).
//! Nested requirements are owned by their parent, so a requirement can never be its own
//! descendant.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// How many accepted extensions of a file requirement must exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantifier {
    /// At least one accepted extension must exist; the first match (in declared order) wins.
    Any,
    /// Every accepted extension must exist as a separate file.
    #[default]
    All,
}

impl Quantifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Quantifier::Any => "any",
            Quantifier::All => "all",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("file requirement accepts no extensions")]
    NoExtensions,

    #[error("invalid extension '{extension}': {reason}")]
    InvalidExtension {
        extension: String,
        reason: &'static str,
    },

    #[error("duplicate extension '{extension}'")]
    DuplicateExtension { extension: String },

    #[error("invalid entry name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("duplicate {kind} requirement '{name}'")]
    DuplicateName { kind: &'static str, name: String },
}

/// A named file that must exist under one or more accepted extensions.
///
/// Extension order is significant: under [`Quantifier::Any`] candidates are inspected in this
/// order and the first one found wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFileRequirement")]
pub struct FileRequirement {
    extensions: Vec<String>,
    quantifier: Quantifier,
}

#[derive(Debug, Deserialize)]
struct RawFileRequirement {
    extensions: Vec<String>,

    #[serde(default, alias = "mode")]
    quantifier: Quantifier,
}

impl TryFrom<RawFileRequirement> for FileRequirement {
    type Error = SchemaError;

    fn try_from(raw: RawFileRequirement) -> Result<Self, Self::Error> {
        FileRequirement::new(raw.extensions, raw.quantifier)
    }
}

impl FileRequirement {
    pub fn new<I, S>(extensions: I, quantifier: Quantifier) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extensions: Vec<String> = extensions.into_iter().map(Into::into).collect();
        if extensions.is_empty() {
            return Err(SchemaError::NoExtensions);
        }

        let mut seen = BTreeSet::new();
        for ext in &extensions {
            validate_extension(ext)?;
            if !seen.insert(ext.as_str()) {
                return Err(SchemaError::DuplicateExtension {
                    extension: ext.clone(),
                });
            }
        }

        Ok(Self {
            extensions,
            quantifier,
        })
    }

    pub fn any<I, S>(extensions: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(extensions, Quantifier::Any)
    }

    pub fn all<I, S>(extensions: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(extensions, Quantifier::All)
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    /// The on-disk name of one candidate, e.g. `pack_info.json`.
    pub fn candidate_name(base: &str, extension: &str) -> String {
        format!("{base}.{extension}")
    }
}

/// A directory: named file requirements, named nested directories, and a strict flag.
///
/// Maps are key-ordered, so every walk over a requirement (and every report built from one) is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDirectoryRequirement")]
pub struct DirectoryRequirement {
    files: BTreeMap<String, FileRequirement>,
    subdirs: BTreeMap<String, DirectoryRequirement>,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct RawDirectoryRequirement {
    #[serde(default)]
    files: BTreeMap<String, FileRequirement>,

    #[serde(default)]
    subdirs: BTreeMap<String, DirectoryRequirement>,

    #[serde(default)]
    strict: bool,
}

impl TryFrom<RawDirectoryRequirement> for DirectoryRequirement {
    type Error = SchemaError;

    fn try_from(raw: RawDirectoryRequirement) -> Result<Self, Self::Error> {
        for name in raw.files.keys().chain(raw.subdirs.keys()) {
            validate_name(name)?;
        }
        Ok(Self {
            files: raw.files,
            subdirs: raw.subdirs,
            strict: raw.strict,
        })
    }
}

impl DirectoryRequirement {
    pub fn builder() -> DirectoryRequirementBuilder {
        DirectoryRequirementBuilder::default()
    }

    /// A non-strict directory that only has to exist.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &BTreeMap<String, FileRequirement> {
        &self.files
    }

    pub fn subdirs(&self) -> &BTreeMap<String, DirectoryRequirement> {
        &self.subdirs
    }

    pub fn file(&self, name: &str) -> Option<&FileRequirement> {
        self.files.get(name)
    }

    pub fn subdir(&self, name: &str) -> Option<&DirectoryRequirement> {
        self.subdirs.get(name)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Same requirement with the top-level strict flag replaced. Nested levels keep their own.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Collects children for a [`DirectoryRequirement`]; the first invalid input is reported by
/// [`build`](Self::build).
#[derive(Debug, Default)]
pub struct DirectoryRequirementBuilder {
    files: BTreeMap<String, FileRequirement>,
    subdirs: BTreeMap<String, DirectoryRequirement>,
    strict: bool,
    error: Option<SchemaError>,
}

impl DirectoryRequirementBuilder {
    pub fn file(mut self, name: impl Into<String>, requirement: FileRequirement) -> Self {
        let name = name.into();
        if let Some(err) = self.check_name(&name) {
            self.error.get_or_insert(err);
            return self;
        }
        match self.files.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(requirement);
            }
            Entry::Occupied(slot) => {
                self.error.get_or_insert(SchemaError::DuplicateName {
                    kind: "file",
                    name: slot.key().clone(),
                });
            }
        }
        self
    }

    pub fn subdir(mut self, name: impl Into<String>, requirement: DirectoryRequirement) -> Self {
        let name = name.into();
        if let Some(err) = self.check_name(&name) {
            self.error.get_or_insert(err);
            return self;
        }
        match self.subdirs.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(requirement);
            }
            Entry::Occupied(slot) => {
                self.error.get_or_insert(SchemaError::DuplicateName {
                    kind: "directory",
                    name: slot.key().clone(),
                });
            }
        }
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self) -> Result<DirectoryRequirement, SchemaError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(DirectoryRequirement {
            files: self.files,
            subdirs: self.subdirs,
            strict: self.strict,
        })
    }

    fn check_name(&self, name: &str) -> Option<SchemaError> {
        validate_name(name).err()
    }
}

fn validate_extension(ext: &str) -> Result<(), SchemaError> {
    let reason = if ext.is_empty() {
        "empty"
    } else if ext.starts_with('.') {
        "leading dot"
    } else if ext.contains(['/', '\\']) {
        "contains a path separator"
    } else {
        return Ok(());
    };
    Err(SchemaError::InvalidExtension {
        extension: ext.to_string(),
        reason,
    })
}

fn validate_name(name: &str) -> Result<(), SchemaError> {
    let reason = if name.is_empty() {
        "empty"
    } else if name == "." || name == ".." {
        "relative path component"
    } else if name.contains(['/', '\\']) {
        "contains a path separator"
    } else {
        return Ok(());
    };
    Err(SchemaError::InvalidName {
        name: name.to_string(),
        reason,
    })
}
