//! mariadb-metadata CLI - schema introspection for MariaDB and MySQL.

use clap::{Args, Parser, Subcommand};
use mariadb_metadata::{Config, DatabaseMetadata, MetadataError, MysqlExecutor, ResultSet};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mariadb-metadata")]
#[command(about = "Schema introspection for MariaDB and MySQL")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

/// Table selection shared by the per-table commands.
#[derive(Args)]
struct TableArgs {
    /// Catalog (database) name; omit for the connection's default database
    #[arg(long)]
    catalog: Option<String>,

    /// Table name or LIKE pattern (% and _ wildcards)
    #[arg(long)]
    table: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalogs (databases)
    Catalogs,

    /// List tables and views
    Tables {
        #[command(flatten)]
        target: TableArgs,

        /// Comma-separated table types (TABLE, VIEW, SYSTEM VIEW)
        #[arg(long, value_delimiter = ',')]
        types: Option<Vec<String>>,
    },

    /// Describe table columns
    Columns {
        #[command(flatten)]
        target: TableArgs,

        /// Column name or LIKE pattern
        #[arg(long)]
        column: Option<String>,
    },

    /// Show primary key columns of a table
    PrimaryKeys {
        #[command(flatten)]
        target: TableArgs,
    },

    /// Show foreign keys declared by a table
    ImportedKeys {
        #[command(flatten)]
        target: TableArgs,
    },

    /// Show foreign keys referencing a table
    ExportedKeys {
        #[command(flatten)]
        target: TableArgs,
    },

    /// Show foreign keys from a child table to a parent table
    CrossReference {
        /// Catalog of the referenced (parent) table
        #[arg(long)]
        parent_catalog: Option<String>,

        /// Referenced (parent) table
        #[arg(long)]
        parent_table: String,

        /// Catalog of the referencing (child) table
        #[arg(long)]
        child_catalog: Option<String>,

        /// Referencing (child) table
        #[arg(long)]
        child_table: String,
    },

    /// Show index columns of a table
    IndexInfo {
        #[command(flatten)]
        target: TableArgs,

        /// Only report unique indexes
        #[arg(long)]
        unique: bool,
    },

    /// List the native types the server supports
    TypeInfo,

    /// Test the database connection
    HealthCheck,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), MetadataError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let executor = Arc::new(MysqlExecutor::connect(&config.connection).await?);

    if let Commands::HealthCheck = cli.command {
        let result = health_check(&executor, config.connection.display_target()).await;
        executor.close().await;
        return result.and_then(|report| print_health(&report, cli.output_json));
    }

    let metadata = DatabaseMetadata::new(Arc::clone(&executor), config.metadata);
    let result = execute(&metadata, cli.command).await;
    executor.close().await;

    print_result_set(&result?, cli.output_json)
}

async fn execute(
    metadata: &DatabaseMetadata<MysqlExecutor>,
    command: Commands,
) -> Result<ResultSet, MetadataError> {
    match command {
        Commands::Catalogs => metadata.get_catalogs().await,

        Commands::Tables { target, types } => {
            let types: Option<Vec<&str>> = types
                .as_ref()
                .map(|t| t.iter().map(String::as_str).collect());
            metadata
                .get_tables(
                    target.catalog.as_deref(),
                    None,
                    target.table.as_deref(),
                    types.as_deref(),
                )
                .await
        }

        Commands::Columns { target, column } => {
            metadata
                .get_columns(
                    target.catalog.as_deref(),
                    None,
                    target.table.as_deref(),
                    column.as_deref(),
                )
                .await
        }

        Commands::PrimaryKeys { target } => {
            metadata
                .get_primary_keys(target.catalog.as_deref(), None, target.table.as_deref())
                .await
        }

        Commands::ImportedKeys { target } => {
            metadata
                .get_imported_keys(target.catalog.as_deref(), None, target.table.as_deref())
                .await
        }

        Commands::ExportedKeys { target } => {
            metadata
                .get_exported_keys(target.catalog.as_deref(), None, target.table.as_deref())
                .await
        }

        Commands::CrossReference {
            parent_catalog,
            parent_table,
            child_catalog,
            child_table,
        } => {
            metadata
                .get_cross_reference(
                    parent_catalog.as_deref(),
                    None,
                    Some(parent_table.as_str()),
                    child_catalog.as_deref(),
                    None,
                    Some(child_table.as_str()),
                )
                .await
        }

        Commands::IndexInfo { target, unique } => {
            metadata
                .get_index_info(
                    target.catalog.as_deref(),
                    None,
                    target.table.as_deref(),
                    unique,
                    false,
                )
                .await
        }

        Commands::TypeInfo => metadata.get_type_info().await,

        Commands::HealthCheck => unreachable!(), // Handled in run()
    }
}

struct HealthReport {
    target: String,
    server_version: String,
    current_database: Option<String>,
    latency_ms: u128,
}

async fn health_check(
    executor: &MysqlExecutor,
    target: String,
) -> Result<HealthReport, MetadataError> {
    let start = Instant::now();
    let server_version = executor.server_version().await?;
    let current_database = executor.current_database().await?;
    Ok(HealthReport {
        target,
        server_version,
        current_database,
        latency_ms: start.elapsed().as_millis(),
    })
}

fn print_health(report: &HealthReport, json: bool) -> Result<(), MetadataError> {
    if json {
        let value = serde_json::json!({
            "healthy": true,
            "target": report.target,
            "server_version": report.server_version,
            "current_database": report.current_database,
            "latency_ms": report.latency_ms,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Health Check Results: {}", report.target);
        println!("  Server: {} ({}ms)", report.server_version, report.latency_ms);
        println!(
            "  Database: {}",
            report.current_database.as_deref().unwrap_or("(none)")
        );
        println!("\n  Overall: HEALTHY");
    }
    Ok(())
}

fn print_result_set(rs: &ResultSet, json: bool) -> Result<(), MetadataError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&rs.to_json())?);
        return Ok(());
    }

    println!("{}", rs.labels().join("\t"));
    for row in rs.iter() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", cells.join("\t"));
    }
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG, when set, takes precedence over --verbosity.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    // Logs go to stderr so result sets on stdout stay machine-readable.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
