use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser};
use schemagen::{DdlGenerator, DdlOptions, SchemaDocument, TableSchema, YamlStorage};

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(version, about = "Render a YAML schema document to MySQL DDL")]
struct Cli {
    /// YAML schema document
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only render these tables, in document order (repeatable)
    #[arg(short = 't', long = "table", value_name = "NAME")]
    tables: Vec<String>,

    /// Emit CREATE TABLE IF NOT EXISTS
    #[arg(long)]
    if_not_exists: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let document = YamlStorage::load_document(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    log::info!(
        "loaded {} table(s) and {} enum(s) from {}",
        document.tables.len(),
        document.enums.len(),
        cli.input.display()
    );

    let selected = select_tables(&document, &cli.tables)?;

    let generator = DdlGenerator::with_options(DdlOptions {
        if_not_exists: cli.if_not_exists,
    });
    let ddl = generator
        .generate(&selected)
        .context("Failed to generate DDL")?;

    match &cli.output {
        Some(path) => {
            fs::write(path, format!("{ddl}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {} statement(s) to {}", selected.len(), path.display());
        }
        None => println!("{}", ddl),
    }

    Ok(())
}

fn select_tables(document: &SchemaDocument, names: &[String]) -> anyhow::Result<Vec<TableSchema>> {
    if names.is_empty() {
        return Ok(document.tables.clone());
    }
    for name in names {
        if document.table(name).is_none() {
            bail!("Unknown table: {}", name);
        }
    }
    Ok(document
        .tables
        .iter()
        .filter(|t| names.contains(&t.name))
        .cloned()
        .collect())
}
