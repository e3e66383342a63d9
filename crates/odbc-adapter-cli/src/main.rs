//! odbc-adapter CLI - schema inspection and DDL over ODBC.

mod ops;

use clap::{Parser, Subcommand};
use odbc_adapter::{
    AdapterError, Config, Connection, DatabaseMetadata, Dialect, DialectImpl,
    ForeignKeyDefinition, IdentifierCase, SchemaStatements, ScriptedConnection,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "odbc-adapter")]
#[command(about = "Schema inspection and DDL for ODBC databases")]
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

#[derive(Subcommand)]
enum Commands {
    /// List tables
    Tables,

    /// List the columns of a table
    Columns {
        /// Table name
        table: String,
    },

    /// List the indexes of a table
    Indexes {
        /// Table name
        table: String,
    },

    /// List the foreign keys declared on a table
    ForeignKeys {
        /// Table name
        table: String,
    },

    /// Show the primary key column of a table
    PrimaryKey {
        /// Table name
        table: String,
    },

    /// List schemas
    Schemas,

    /// Test the database connection
    HealthCheck,

    /// Apply schema operations from a YAML file
    Migrate {
        /// Path to operations file
        #[arg(short, long)]
        file: PathBuf,

        /// Print the SQL instead of executing it
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), AdapterError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(AdapterError::Config)?;

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    match &cli.command {
        Commands::Migrate { file, dry_run: true } => {
            let operations = ops::load_operations(file)?;
            let mut adapter = dry_run_adapter(&config)?;
            ops::apply_all(&mut adapter, &operations)?;

            let statements = adapter.connection().statements();
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&statements)?);
            } else {
                for sql in &statements {
                    println!("{};", sql);
                }
            }
        }
        Commands::Migrate { file, dry_run: false } => {
            let operations = ops::load_operations(file)?;
            let mut adapter = connect(&config)?;
            let applied = ops::apply_all(&mut adapter, &operations)?;

            if cli.output_json {
                print_json(&serde_json::json!({ "applied": applied }))?;
            } else {
                println!("Applied {} operation(s)", applied);
            }
        }
        command => {
            let adapter = connect(&config)?;
            inspect(&adapter, command, cli.output_json)?;
        }
    }

    Ok(())
}

/// Run an inspection command.
fn inspect<C: Connection>(
    adapter: &SchemaStatements<C>,
    command: &Commands,
    output_json: bool,
) -> Result<(), AdapterError> {
    match command {
        Commands::Tables => print_names(&adapter.tables()?, output_json),
        Commands::Schemas => print_names(&adapter.schemas()?, output_json),
        Commands::Columns { table } => {
            let columns = adapter.columns(table)?;
            if output_json {
                return print_json(&columns);
            }
            for c in &columns {
                println!(
                    "{}\t{}\t{}\t{}",
                    c.name,
                    adapter.column_type_sql(c),
                    if c.null { "NULL" } else { "NOT NULL" },
                    c.default.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
        Commands::Indexes { table } => {
            let indexes = adapter.indexes(table)?;
            if output_json {
                return print_json(&indexes);
            }
            for idx in &indexes {
                println!(
                    "{}{}\t({})",
                    idx.name,
                    if idx.unique { " UNIQUE" } else { "" },
                    idx.columns.join(", ")
                );
            }
            Ok(())
        }
        Commands::ForeignKeys { table } => {
            let keys = adapter.foreign_keys(table)?;
            if output_json {
                return print_json(&keys);
            }
            for fk in &keys {
                println!("{}", foreign_key_line(fk));
            }
            Ok(())
        }
        Commands::PrimaryKey { table } => {
            let pk = adapter.primary_key(table)?;
            if output_json {
                return print_json(&serde_json::json!({ "table": table, "primary_key": pk }));
            }
            println!("{}", pk);
            Ok(())
        }
        Commands::HealthCheck => {
            let metadata = adapter.connection().database_metadata();
            if output_json {
                return print_json(metadata);
            }
            let detected = DialectImpl::from_dbms_name(&metadata.dbms_name);
            println!("Connection: OK");
            println!("  DBMS: {}", metadata.dbms_name);
            println!(
                "  Dialect: {} (detected: {})",
                adapter.dialect().name(),
                detected.name()
            );
            println!("  Database: {}", adapter.current_database());
            println!("  Schema: {}", adapter.current_schema());
            Ok(())
        }
        Commands::Migrate { .. } => Ok(()),
    }
}

fn foreign_key_line(fk: &ForeignKeyDefinition) -> String {
    let mut line = format!(
        "{}\t{}.{} -> {}.{}",
        fk.name.as_deref().unwrap_or("-"),
        fk.child_table,
        fk.child_column,
        fk.parent_table,
        fk.parent_column
    );
    if let Some(action) = fk.on_update {
        line.push_str(&format!(" ON UPDATE {}", action.as_sql()));
    }
    if let Some(action) = fk.on_delete {
        line.push_str(&format!(" ON DELETE {}", action.as_sql()));
    }
    line
}

fn print_names(names: &[String], output_json: bool) -> Result<(), AdapterError> {
    if output_json {
        return print_json(&names);
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AdapterError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Adapter over a recording connection: statements are captured, not run.
fn dry_run_adapter(config: &Config) -> Result<SchemaStatements<ScriptedConnection>, AdapterError> {
    let metadata = DatabaseMetadata {
        dbms_name: "dry-run".to_string(),
        database_name: config.connection.database.clone(),
        max_identifier_len: None,
        identifier_case: IdentifierCase::Mixed,
    };
    SchemaStatements::new(
        ScriptedConnection::new(metadata),
        config.dialect()?,
        config.settings(),
    )
}

#[cfg(feature = "odbc")]
fn connect(config: &Config) -> Result<SchemaStatements<odbc_adapter::OdbcConnection>, AdapterError> {
    odbc_adapter::drivers::check_odbc_available()?;
    let conn = odbc_adapter::OdbcConnection::connect(&config.connection.connection_string())?;
    SchemaStatements::new(conn, config.dialect()?, config.settings())
}

#[cfg(not(feature = "odbc"))]
fn connect(_config: &Config) -> Result<SchemaStatements<ScriptedConnection>, AdapterError> {
    Err(AdapterError::Config(
        "this build has no ODBC support; rebuild with `--features odbc` or use `migrate --dry-run`"
            .to_string(),
    ))
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries SQL and JSON output
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
