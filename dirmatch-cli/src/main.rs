mod config;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::{ConfigMerger, ReportFormat, SchemaChoice};
use dirmatch_core::adapters::{FsSchemaSource, FsWritePort, PresetSchemaSource};
use dirmatch_core::pipeline::{ToolError, run_check};
use dirmatch_core::ports::SchemaSource;
use dirmatch_core::settings::CheckSettings;
use dirmatch_core::FsTreeView;
use dirmatch_domain::count_expected;
use dirmatch_render::{render_report_md, render_result_text};
use dirmatch_types::report::ReportToolInfo;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "dirmatch",
    version,
    about = "Validate a directory tree against a declarative layout schema."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Match a directory against a schema and report every deviation.
    Check(CheckArgs),
    /// Count the file and directory requirements a schema declares.
    Count(CountArgs),
    /// List the built-in layout presets.
    Presets(PresetsArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Directory to check (default: current directory).
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Schema document (.json, .toml, .yaml).
    #[arg(long, conflicts_with = "preset")]
    schema: Option<Utf8PathBuf>,

    /// Built-in preset name (see `dirmatch presets`).
    #[arg(long)]
    preset: Option<String>,

    /// Reject entries the schema does not declare at the top level.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Output format on stdout.
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Write report.json and report.md to this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Config file (default: <root>/dirmatch.toml).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct CountArgs {
    /// Schema document (.json, .toml, .yaml).
    #[arg(long, conflicts_with = "preset", required_unless_present = "preset")]
    schema: Option<Utf8PathBuf>,

    /// Built-in preset name.
    #[arg(long)]
    preset: Option<String>,

    /// Include requirements of nested directories.
    #[arg(long, default_value_t = false)]
    recursive: bool,
}

#[derive(Debug, Parser)]
struct PresetsArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: ListFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ListFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::from(0),
        Err(ToolError::Mismatch) => ExitCode::from(2),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn real_main() -> Result<(), ToolError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Count(args) => cmd_count(args).map_err(ToolError::from),
        Command::Presets(args) => cmd_presets(args).map_err(ToolError::from),
    }
}

fn cmd_check(args: CheckArgs) -> Result<(), ToolError> {
    // Load config file and merge with CLI arguments
    let (file_config, base_dir) = config::load_or_default(&args.root, args.config.as_deref())
        .context("load dirmatch.toml config")?;
    let merged = ConfigMerger::new(file_config, base_dir).merge_check_args(
        args.schema.as_deref(),
        args.preset.as_deref(),
        args.strict,
        args.format,
        args.out_dir.as_deref(),
    )?;
    debug!(?merged, "merged config");

    let source = schema_source(&merged.schema);
    let settings = CheckSettings {
        root: args.root,
        strict: merged.strict,
        out_dir: merged.out_dir,
    };
    let view = FsTreeView::new(Utf8PathBuf::from("."));

    let outcome = run_check(&settings, source.as_ref(), &view, &FsWritePort, tool_info())?;

    match merged.format {
        ReportFormat::Text => print!("{}", render_result_text(outcome.result())),
        ReportFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&outcome.report).context("serialize report")?
        ),
        ReportFormat::Markdown => print!("{}", render_report_md(&outcome.report)),
    }

    outcome.into_verdict().map(|_| ())
}

fn cmd_count(args: CountArgs) -> anyhow::Result<()> {
    let choice = match (args.schema, args.preset) {
        (Some(path), _) => SchemaChoice::File(path),
        (None, Some(name)) => SchemaChoice::Preset(name),
        (None, None) => anyhow::bail!("pass --schema or --preset"),
    };
    let requirement = schema_source(&choice).load()?;
    let size = count_expected(&requirement, args.recursive);
    println!("files={} subdirs={}", size.files, size.subdirs);
    Ok(())
}

fn cmd_presets(args: PresetsArgs) -> anyhow::Result<()> {
    let presets = dirmatch_schemas::presets();
    match args.format {
        ListFormat::Text => {
            println!("Available presets:\n");
            for preset in presets {
                println!("  {:<16} {}", preset.name, preset.description);
            }
            println!();
            println!("Use 'dirmatch check --preset <name>' to check a directory.");
        }
        ListFormat::Json => {
            let mut out = Vec::new();
            for preset in presets {
                out.push(serde_json::json!({
                    "name": preset.name,
                    "description": preset.description,
                    "schema": preset.requirement()?,
                }));
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn schema_source(choice: &SchemaChoice) -> Box<dyn SchemaSource> {
    match choice {
        SchemaChoice::File(path) => Box::new(FsSchemaSource::new(path.clone())),
        SchemaChoice::Preset(name) => Box::new(PresetSchemaSource::new(name.clone())),
    }
}

fn tool_info() -> ReportToolInfo {
    ReportToolInfo {
        name: "dirmatch".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: None,
    }
}
