//! Command-line front end for the apartment registry.
//!
//! # Responsibility
//! - Translate commands into `ApartmentService` calls.
//! - Surface every core error to the operator with a non-zero exit.

use anyhow::{bail, Context};
use apartment_core::config::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
use apartment_core::transfer::export::same_flag_label;
use apartment_core::{Apartment, ApartmentDraft, ApartmentService, SqliteApartmentRepository};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "apartment", version, about = "Track apartment owners and residents")]
struct Cli {
    /// Database file (created on first run)
    #[arg(long, global = true, env = ENV_DB_PATH)]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = ENV_LOG_LEVEL)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true, env = ENV_LOG_DIR)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or replace an apartment
    Set {
        id: String,
        #[arg(long, default_value = "")]
        owner: String,
        /// Empty means `Vacant`
        #[arg(long, default_value = "")]
        resident: String,
    },
    /// Show one apartment by ID
    Get { id: String },
    /// Show the apartment at a zero-based list position
    At { index: u32 },
    /// Delete an apartment (missing IDs are ignored)
    Delete { id: String },
    /// Print the number of apartments
    Count,
    /// List all apartments in ID order
    List {
        #[arg(long)]
        json: bool,
    },
    /// Import a .csv or .xlsx file (all rows or nothing)
    Import { path: PathBuf },
    /// Export all apartments to a .csv or .xlsx file
    Export { path: PathBuf },
}

impl Cli {
    fn config(&self) -> CoreConfig {
        let mut config = CoreConfig::default();
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config.log_dir = self.log_dir.clone();
        config
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config();
    let conn = config
        .bootstrap()
        .with_context(|| format!("cannot start with database `{}`", config.db_path.display()))?;
    let service = ApartmentService::new(SqliteApartmentRepository::try_new(&conn)?);

    run(&service, cli.command)
}

fn run(
    service: &ApartmentService<SqliteApartmentRepository<'_>>,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Set {
            id,
            owner,
            resident,
        } => {
            let saved = service.save(&ApartmentDraft::new(id, owner, resident))?;
            println!("saved {}", describe(&saved));
        }
        Command::Get { id } => match service.get_by_id(&id)? {
            Some(apartment) => println!("{}", describe(&apartment)),
            None => bail!("apartment `{id}` not found"),
        },
        Command::At { index } => match service.get_by_position(index)? {
            Some(apartment) => println!("{}", describe(&apartment)),
            None => bail!("no apartment at position {index}"),
        },
        Command::Delete { id } => {
            if service.delete(&id)? {
                println!("deleted {id}");
            } else {
                println!("{id} was not stored; nothing deleted");
            }
        }
        Command::Count => println!("{}", service.count()?),
        Command::List { json } => {
            let apartments = service.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&apartments)?);
            } else {
                for apartment in &apartments {
                    println!("{}", describe(apartment));
                }
            }
        }
        Command::Import { path } => {
            let summary = service
                .import_file(&path)
                .with_context(|| format!("import of `{}` aborted; no changes made", path.display()))?;
            info!("event=cli_import module=cli status=ok imported={}", summary.imported);
            println!(
                "imported {} rows ({} short rows skipped)",
                summary.imported, summary.skipped
            );
        }
        Command::Export { path } => {
            let summary = service.export_file(&path)?;
            println!("exported {} rows to {}", summary.written, path.display());
        }
    }
    Ok(())
}

fn describe(apartment: &Apartment) -> String {
    format!(
        "ID: {} | Owner: {} | Resident: {} | Owner is Resident: {}",
        apartment.id(),
        apartment.owner(),
        apartment.resident(),
        same_flag_label(apartment.same_flag())
    )
}
