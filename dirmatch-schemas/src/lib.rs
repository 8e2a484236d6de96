//! Schema document ingestion.
//!
//! Schema documents are serialized `DirectoryRequirement` values in JSON, TOML or YAML. The loader
//! ignores unknown fields so documents written for newer releases still load, but every document
//! passes through the same validation as the builder API. Built-in layouts live in [`presets`].

mod load;
pub mod presets;

pub use load::{LoadedSchema, SchemaFormat, SchemaLoadError, load_schema, parse_schema};
pub use presets::{Preset, find_preset, presets};
