//! Wetland Explorer CLI - explore the wetland biodiversity database
//!
//! Usage:
//!   explorer init [--demo]
//!   explorer sources
//!   explorer fields <source>
//!   explorer query --source <id> --x <field> [--y <field>] [--chart <type>] [--filter field=value]...
//!   explorer serve [--port <port>]
//!
//! Examples:
//!   explorer init --demo
//!   explorer query --source taxonomic_groups --x name --y species_count
//!   explorer query --source wetland_sites --x region --chart pie --filter is_ramsar_site=true
//!   explorer query --source threats --x threat__name --y site__name --chart table

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use wetland_explorer::config::Settings;
use wetland_explorer::explore::{
    ChartType, Explorer, ExplorerLimits, ExportFormat, FilterValue, QueryRequest,
};
use wetland_explorer::logging;
use wetland_explorer::registry::Registry;
use wetland_explorer::store::{RecordStore, SqliteStore};

#[derive(Parser)]
#[command(name = "explorer")]
#[command(about = "Wetland Explorer - dynamic exploration of wetland biodiversity data")]
#[command(version)]
struct Cli {
    /// Path to a configuration file (defaults to EXPLORER_CONFIG, ./explorer.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite database, overriding the configuration
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init {
        /// Also load the demonstration data set
        #[arg(long)]
        demo: bool,
    },

    /// List data sources with their record counts
    Sources,

    /// List the fields of a data source
    Fields {
        /// Source id (e.g. wetland_sites)
        source: String,
    },

    /// Run an exploration query and print the JSON result
    Query {
        /// Source id
        #[arg(short, long)]
        source: String,

        /// Grouping field (table mode: first column)
        #[arg(short = 'x', long = "x")]
        x_field: String,

        /// Value field; omit (or "count") to count records
        #[arg(short = 'y', long = "y")]
        y_field: Option<String>,

        /// Output shape
        #[arg(short, long, default_value = "bar")]
        chart: ChartArg,

        /// Filter as field=value; value may be JSON (true, 3, ["a","b"], null)
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, FilterValue)>,

        /// Extra table column
        #[arg(short, long)]
        group_by: Option<String>,

        /// Write an export file body instead of the query result
        #[arg(long)]
        export: Option<ExportFormat>,
    },

    /// Start the HTTP API
    Serve {
        /// Port to listen on, overriding the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartArg {
    Bar,
    Line,
    Pie,
    Table,
}

impl From<ChartArg> for ChartType {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Bar => ChartType::Bar,
            ChartArg::Line => ChartType::Line,
            ChartArg::Pie => ChartType::Pie,
            ChartArg::Table => ChartType::Table,
        }
    }
}

fn parse_filter(arg: &str) -> Result<(String, FilterValue), String> {
    let (field, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", arg))?;
    let value = serde_json::from_str::<FilterValue>(raw)
        .unwrap_or_else(|_| FilterValue::from(raw));
    Ok((field.trim().to_string(), value))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Warning: could not load configuration ({}), using defaults", e);
        Settings::default()
    });
    if let Some(database) = &cli.database {
        settings.database.path = database.display().to_string();
    }

    logging::init(&settings.logging.filter);

    match cli.command {
        Commands::Init { demo } => cmd_init(&settings, demo),
        Commands::Sources => cmd_sources(&settings),
        Commands::Fields { source } => cmd_fields(&settings, &source),
        Commands::Query {
            source,
            x_field,
            y_field,
            chart,
            filters,
            group_by,
            export,
        } => {
            let mut request = QueryRequest::new(&source, &x_field, chart.into());
            if let Some(y) = &y_field {
                request = request.with_y_field(y);
            }
            if let Some(g) = &group_by {
                request = request.with_group_by(g);
            }
            for (field, value) in filters {
                request = request.with_filter(&field, value);
            }
            cmd_query(&settings, &request, export)
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            cmd_serve(&settings)
        }
    }
}

fn open_store(settings: &Settings) -> Option<SqliteStore> {
    let path = match settings.database.resolved_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Invalid database path: {}", e);
            return None;
        }
    };
    match SqliteStore::open(&path) {
        Ok(store) => Some(store),
        Err(e) => {
            eprintln!("Error opening database '{}': {}", path.display(), e);
            None
        }
    }
}

fn open_explorer<S: RecordStore>(settings: &Settings, store: S) -> Option<Explorer<S>> {
    match Registry::builtin() {
        Ok(registry) => Some(
            Explorer::new(Arc::new(registry), store)
                .with_limits(ExplorerLimits::from(&settings.query)),
        ),
        Err(e) => {
            eprintln!("Invalid registry: {}", e);
            None
        }
    }
}

fn cmd_init(settings: &Settings, demo: bool) -> ExitCode {
    let Some(store) = open_store(settings) else {
        return ExitCode::FAILURE;
    };
    println!("Schema ready: {}", settings.database.path);

    if demo {
        match store.seed_demo() {
            Ok(true) => println!("Demonstration data loaded."),
            Ok(false) => println!("Database already holds sites; demonstration data skipped."),
            Err(e) => {
                eprintln!("Error loading demonstration data: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn cmd_sources(settings: &Settings) -> ExitCode {
    let Some(explorer) = open_store(settings).and_then(|s| open_explorer(settings, s)) else {
        return ExitCode::FAILURE;
    };

    match explorer.list_sources() {
        Ok(sources) => {
            println!("Data sources:");
            for source in sources {
                println!(
                    "  - {} ({}): {} records",
                    source.id, source.display_name, source.record_count
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_fields(settings: &Settings, source: &str) -> ExitCode {
    let Some(explorer) = open_store(settings).and_then(|s| open_explorer(settings, s)) else {
        return ExitCode::FAILURE;
    };

    let fields = explorer.list_fields(source);
    if fields.is_empty() {
        println!("No fields for source '{}'.", source);
        return ExitCode::SUCCESS;
    }

    println!("Fields of {}:", source);
    for field in fields {
        println!("  - {} [{}] {}", field.id, field.semantic_type.as_str(), field.name);
    }
    ExitCode::SUCCESS
}

fn cmd_query(settings: &Settings, request: &QueryRequest, export: Option<ExportFormat>) -> ExitCode {
    let Some(explorer) = open_store(settings).and_then(|s| open_explorer(settings, s)) else {
        return ExitCode::FAILURE;
    };

    let output = match export {
        Some(format) => explorer.export(request, format).map(|export| export.body),
        None => explorer.execute(request).map(|result| {
            serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }),
    };

    match output {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error ({}): {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "server")]
fn cmd_serve(settings: &Settings) -> ExitCode {
    let Some(store) = open_store(settings) else {
        return ExitCode::FAILURE;
    };
    let store: Arc<dyn RecordStore> = Arc::new(store);
    let Some(explorer) = open_explorer(settings, store) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Wetland Explorer API");
    println!("   URL: http://{}/api/dynamic/data-sources", settings.server.bind_address());
    println!("   Database: {}", settings.database.path);
    println!();
    println!("   Press Ctrl+C to stop");

    match runtime.block_on(wetland_explorer::web::serve(settings, Arc::new(explorer))) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "server"))]
fn cmd_serve(_settings: &Settings) -> ExitCode {
    eprintln!("This build has no HTTP server; rebuild with the 'server' feature.");
    ExitCode::FAILURE
}
