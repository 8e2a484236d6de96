//! Configuration file loading for dirmatch.
//!
//! Discovers and loads `dirmatch.toml` from the directory being checked.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "dirmatch.toml";

/// Output format for `check`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

/// Top-level configuration from dirmatch.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirmatchConfig {
    /// Defaults for the `check` command.
    pub check: CheckConfig,
}

/// `[check]` section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Schema document, relative to the config file.
    pub schema: Option<Utf8PathBuf>,

    /// Built-in preset name; mutually exclusive with `schema`.
    pub preset: Option<String>,

    /// Overrides the strict flag of the top-level requirement.
    pub strict: Option<bool>,

    pub format: Option<ReportFormat>,

    /// Artifact directory, relative to the config file.
    pub out_dir: Option<Utf8PathBuf>,
}

/// Discover the dirmatch.toml config file.
///
/// Returns `None` if there is no config file in `root`.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a dirmatch.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<DirmatchConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<DirmatchConfig> {
    let config: DirmatchConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Loads the explicit config file if given, otherwise the one discovered in `root`.
///
/// Returns the config together with the directory its relative paths resolve against.
pub fn load_or_default(
    root: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<(DirmatchConfig, Utf8PathBuf)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(root),
    };
    match path {
        Some(path) => {
            let base = path
                .parent()
                .map(Utf8Path::to_path_buf)
                .unwrap_or_else(|| Utf8PathBuf::from("."));
            Ok((load_config(&path)?, base))
        }
        None => Ok((DirmatchConfig::default(), root.to_path_buf())),
    }
}

/// Where the expected layout comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChoice {
    File(Utf8PathBuf),
    Preset(String),
}

/// Merged `check` configuration combining config file and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCheck {
    pub schema: SchemaChoice,
    pub strict: Option<bool>,
    pub format: ReportFormat,
    pub out_dir: Option<Utf8PathBuf>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: DirmatchConfig,
    base_dir: Utf8PathBuf,
}

impl ConfigMerger {
    pub fn new(config: DirmatchConfig, base_dir: Utf8PathBuf) -> Self {
        Self { config, base_dir }
    }

    /// Merge with check command CLI arguments.
    ///
    /// A schema or preset given on the command line replaces both config keys. `--strict` can
    /// only turn strict mode on; the config value applies otherwise.
    pub fn merge_check_args(
        self,
        cli_schema: Option<&Utf8Path>,
        cli_preset: Option<&str>,
        cli_strict: bool,
        cli_format: Option<ReportFormat>,
        cli_out_dir: Option<&Utf8Path>,
    ) -> anyhow::Result<MergedCheck> {
        let check = self.config.check;

        let schema = match (cli_schema, cli_preset) {
            (Some(path), _) => SchemaChoice::File(path.to_path_buf()),
            (None, Some(name)) => SchemaChoice::Preset(name.to_string()),
            (None, None) => match (check.schema, check.preset) {
                (Some(_), Some(_)) => {
                    anyhow::bail!("[check] sets both schema and preset; keep only one")
                }
                (Some(path), None) => SchemaChoice::File(self.base_dir.join(path)),
                (None, Some(name)) => SchemaChoice::Preset(name),
                (None, None) => anyhow::bail!(
                    "no schema given; pass --schema or --preset, or set [check] schema in {}",
                    CONFIG_FILE_NAME
                ),
            },
        };

        let strict = if cli_strict { Some(true) } else { check.strict };
        let format = cli_format.or(check.format).unwrap_or_default();
        let out_dir = match cli_out_dir {
            Some(dir) => Some(dir.to_path_buf()),
            None => check.out_dir.map(|dir| self.base_dir.join(dir)),
        };

        Ok(MergedCheck {
            schema,
            strict,
            format,
            out_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[check]
schema = "layout.json"
strict = true
format = "markdown"
out_dir = "artifacts/dirmatch"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(
            config.check.schema.as_deref(),
            Some(Utf8Path::new("layout.json"))
        );
        assert_eq!(config.check.strict, Some(true));
        assert_eq!(config.check.format, Some(ReportFormat::Markdown));
        assert_eq!(
            config.check.out_dir.as_deref(),
            Some(Utf8Path::new("artifacts/dirmatch"))
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.check.schema.is_none());
        assert!(config.check.preset.is_none());
        assert!(config.check.strict.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        assert!(parse_config("[check]\nformat = \"html\"\n").is_err());
    }

    #[test]
    fn test_config_paths_resolve_against_base() {
        let config = parse_config("[check]\nschema = \"layout.toml\"\nout_dir = \"out\"\n").unwrap();
        let merged = ConfigMerger::new(config, Utf8PathBuf::from("site"))
            .merge_check_args(None, None, false, None, None)
            .unwrap();

        assert_eq!(
            merged,
            MergedCheck {
                schema: SchemaChoice::File(Utf8PathBuf::from("site/layout.toml")),
                strict: None,
                format: ReportFormat::Text,
                out_dir: Some(Utf8PathBuf::from("site/out")),
            }
        );
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = parse_config(
            "[check]\npreset = \"texture-pack\"\nstrict = false\nformat = \"json\"\n",
        )
        .unwrap();
        let merged = ConfigMerger::new(config, Utf8PathBuf::from("."))
            .merge_check_args(
                Some(Utf8Path::new("mine.json")),
                None,
                true,
                Some(ReportFormat::Markdown),
                Some(Utf8Path::new("reports")),
            )
            .unwrap();

        assert_eq!(merged.schema, SchemaChoice::File("mine.json".into()));
        assert_eq!(merged.strict, Some(true));
        assert_eq!(merged.format, ReportFormat::Markdown);
        assert_eq!(merged.out_dir, Some(Utf8PathBuf::from("reports")));
    }

    #[test]
    fn test_config_strict_used_when_cli_flag_absent() {
        let config = parse_config("[check]\npreset = \"texture-pack\"\nstrict = false\n").unwrap();
        let merged = ConfigMerger::new(config, Utf8PathBuf::from("."))
            .merge_check_args(None, None, false, None, None)
            .unwrap();
        assert_eq!(merged.schema, SchemaChoice::Preset("texture-pack".into()));
        assert_eq!(merged.strict, Some(false));
    }

    #[test]
    fn test_missing_schema_is_an_error() {
        let err = ConfigMerger::new(DirmatchConfig::default(), Utf8PathBuf::from("."))
            .merge_check_args(None, None, false, None, None)
            .unwrap_err();
        assert!(err.to_string().contains("no schema given"));
    }

    #[test]
    fn test_schema_and_preset_in_config_conflict() {
        let config =
            parse_config("[check]\nschema = \"a.json\"\npreset = \"texture-pack\"\n").unwrap();
        let err = ConfigMerger::new(config, Utf8PathBuf::from("."))
            .merge_check_args(None, None, false, None, None)
            .unwrap_err();
        assert!(err.to_string().contains("both schema and preset"));
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let (cfg, base) = load_or_default(&root, None).expect("load default");
        assert!(cfg.check.schema.is_none());
        assert_eq!(base, root);
    }

    #[test]
    fn test_explicit_config_sets_base_dir() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let cfg_dir = root.join("conf");
        std::fs::create_dir(&cfg_dir).unwrap();
        let cfg_path = cfg_dir.join("custom.toml");
        std::fs::write(&cfg_path, "[check]\npreset = \"texture-pack\"\n").unwrap();

        let (cfg, base) = load_or_default(&root, Some(&cfg_path)).expect("load explicit");
        assert_eq!(cfg.check.preset.as_deref(), Some("texture-pack"));
        assert_eq!(base, cfg_dir);
    }
}
