mod config;
mod input;
mod logging;
mod output;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use diasql_core::{
    ConstraintNaming, Error as CoreError, OrderingStrategy, SchemaModel, SqlEmitter,
};
use diasql_export::{ExportError, render_document, write_workbook};
use thiserror::Error;

use config::{Settings, load_settings};
use input::{derived_path, read_diagram};
use output::StagedOutputs;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    ConfigDecode(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("output path has no file name: {}", .0.display())]
    OutputPath(PathBuf),
    #[error("strict mode: {0}")]
    Strict(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "diasql", version, about = "Dia diagram to SQL DDL")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, default_value_t = false, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a Dia diagram into a SQL script.
    Convert(ConvertArgs),
    /// Print the JSON Schema of the model written by `--model-json`.
    ModelSchema,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Dia diagram, plain or gzip compressed.
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Output path for the SQL script (defaults to INPUT with a .sql extension).
    #[arg(long, conflicts_with = "stdout")]
    out: Option<PathBuf>,
    /// Settings file (defaults to ./diasql.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Table ordering strategy.
    #[arg(long, value_enum)]
    ordering: Option<OrderingArg>,
    /// Foreign key constraint naming scheme.
    #[arg(long, value_enum)]
    constraint_naming: Option<NamingArg>,
    /// Render single-column primary keys inline.
    #[arg(long, default_value_t = false)]
    inline_primary_key: bool,
    /// Also write a Markdown data dictionary (defaults to INPUT with a .md extension).
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    doc: Option<Option<PathBuf>>,
    /// Also write one CSV template sheet per table into this directory.
    #[arg(long, value_name = "DIR")]
    sheets: Option<PathBuf>,
    /// Also write the resolved model as JSON.
    #[arg(long, value_name = "PATH")]
    model_json: Option<PathBuf>,
    /// Fail when the model carries diagnostics.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Print the SQL script to stdout instead of writing a file.
    #[arg(long, default_value_t = false)]
    stdout: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderingArg {
    InDegree,
    Topological,
}

impl From<OrderingArg> for OrderingStrategy {
    fn from(value: OrderingArg) -> Self {
        match value {
            OrderingArg::InDegree => OrderingStrategy::InDegree,
            OrderingArg::Topological => OrderingStrategy::Topological,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NamingArg {
    Positional,
    OwnerQualified,
}

impl From<NamingArg> for ConstraintNaming {
    fn from(value: NamingArg) -> Self {
        match value {
            NamingArg::Positional => ConstraintNaming::Positional,
            NamingArg::OwnerQualified => ConstraintNaming::OwnerQualified,
        }
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_json)?;

    match cli.command {
        Command::Convert(args) => run_convert(args),
        Command::ModelSchema => print_model_schema(),
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), CliError> {
    let started = Instant::now();
    let settings = resolve_settings(&args)?;
    tracing::info!(
        event = "run_started",
        input = %args.input.display(),
        ordering = ?settings.build.ordering,
        constraint_naming = ?settings.emit.constraint_naming,
        "conversion started"
    );

    let xml = read_diagram(&args.input)?;
    tracing::info!(event = "diagram_read", bytes = xml.len(), "diagram read");

    let model = SchemaModel::from_xml(&xml, &settings.build)?;
    tracing::info!(
        event = "model_built",
        tables = model.tables().len(),
        diagnostics = model.diagnostics().len(),
        "model built"
    );

    if args.strict && !model.diagnostics().is_empty() {
        let messages = model
            .diagnostics()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(CliError::Strict(messages));
    }

    let sql = SqlEmitter::new(settings.emit.clone()).emit(&model);
    let mut outputs = StagedOutputs::new();

    let sql_path = if args.stdout {
        None
    } else {
        let path = args
            .out
            .clone()
            .unwrap_or_else(|| derived_path(&args.input, "sql"));
        outputs.stage(&path, sql.as_bytes())?;
        Some(path)
    };

    let doc_path = match &args.doc {
        Some(doc) => {
            let path = doc
                .clone()
                .unwrap_or_else(|| derived_path(&args.input, "md"));
            outputs.stage(&path, render_document(&model).as_bytes())?;
            Some(path)
        }
        None => None,
    };

    if let Some(path) = &args.model_json {
        outputs.stage_json(path, &model)?;
    }

    if let Some(dir) = &args.sheets {
        let sheets = write_workbook(&model, dir)?;
        tracing::info!(
            event = "sheets_written",
            dir = %dir.display(),
            sheets = sheets.len(),
            "sheets written"
        );
    }

    outputs.commit()?;
    if args.stdout {
        print!("{sql}");
    }
    if let Some(path) = &sql_path {
        tracing::info!(event = "sql_written", path = %path.display(), "sql written");
    }
    if let Some(path) = &doc_path {
        tracing::info!(event = "document_written", path = %path.display(), "document written");
    }
    if let Some(path) = &args.model_json {
        tracing::info!(event = "model_json_written", path = %path.display(), "model json written");
    }

    tracing::info!(
        event = "run_finished",
        duration_ms = started.elapsed().as_millis() as u64,
        "conversion finished"
    );
    Ok(())
}

/// File settings first, then command line overrides.
fn resolve_settings(args: &ConvertArgs) -> Result<Settings, CliError> {
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(ordering) = args.ordering {
        settings.build.ordering = ordering.into();
    }
    if let Some(naming) = args.constraint_naming {
        settings.emit.constraint_naming = naming.into();
    }
    if args.inline_primary_key {
        settings.emit.inline_primary_key = true;
    }
    Ok(settings)
}

fn print_model_schema() -> Result<(), CliError> {
    let schema = schemars::schema_for!(SchemaModel);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
