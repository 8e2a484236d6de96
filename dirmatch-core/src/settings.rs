//! Clap-free settings for the check pipeline.

use camino::Utf8PathBuf;

#[derive(Debug, Clone)]
pub struct CheckSettings {
    /// Directory matched against the schema.
    pub root: Utf8PathBuf,

    /// Replaces the strict flag of the top-level requirement. Nested levels keep their own.
    pub strict: Option<bool>,

    /// Where `report.json` and `report.md` go. Nothing is written when unset.
    pub out_dir: Option<Utf8PathBuf>,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            strict: None,
            out_dir: None,
        }
    }
}
