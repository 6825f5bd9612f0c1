//! brainrot — The BrainrotSQL CLI
//!
//! # Usage
//!
//! ```bash
//! # Show the SQL for a query
//! brainrot "tralalero id name lirili users" --dry-run
//!
//! # Execute against a database
//! brainrot "tralalero * lirili users" --database-url sqlite://app.db
//!
//! # Seed an in-memory database and run the sample queries
//! brainrot demo --interactive
//! ```

mod demo;
mod repl;

use std::path::PathBuf;

use anyhow::Context;
use brainrot_sql::config::Config;
use brainrot_sql::prelude::*;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use tracing::Level;

#[derive(Parser)]
#[command(name = "brainrot")]
#[command(version)]
#[command(about = "🧠 BrainrotSQL: SQL with meme keywords", long_about = None)]
#[command(after_help = "EXAMPLES:
    brainrot 'tralalero id name lirili users' --dry-run
    brainrot 'bombombini lirili users patapim email bobrito girafa' --database-url sqlite://app.db
    brainrot explain 'cappuccino users cocofanto status burbaloni 1'")]
struct Cli {
    /// The BrainrotSQL query to compile or execute
    query: Option<String>,

    /// Don't execute, just show the generated SQL
    #[arg(short, long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Database connection URL
    #[arg(long, env = "BRAINROT_DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Configuration file (defaults to ./brainrot.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and show its structure
    Explain {
        /// The BrainrotSQL query to explain
        query: String,
    },
    /// Show the alias table
    Keywords,
    /// Interactive REPL mode
    Repl,
    /// Seed a sample SQLite database and run the demo queries
    Demo {
        /// Stay in the REPL after the demo queries
        #[arg(short = 'i', long)]
        interactive: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let compiler = Compiler::new(config.registry()?);
    let database_url = cli.database_url.clone().or_else(|| config.database.url.clone());

    match &cli.command {
        Some(Commands::Explain { query }) => explain_query(&compiler, query)?,
        Some(Commands::Keywords) => show_keywords(compiler.registry()),
        Some(Commands::Repl) => {
            let db = match &database_url {
                Some(url) => Some(
                    BrainrotDB::connect_with(url, config.database.max_connections, compiler.clone())
                        .await?,
                ),
                None => None,
            };
            repl::run_repl(&compiler, db, cli.format).await;
        }
        Some(Commands::Demo { interactive }) => {
            let url = database_url.as_deref().unwrap_or(demo::DEMO_URL);
            let mut db =
                BrainrotDB::connect_with(url, config.database.max_connections, compiler.clone())
                    .await?;
            demo::run_demo(&mut db, cli.format).await?;
            if *interactive {
                repl::run_repl(&compiler, Some(db), cli.format).await;
            } else {
                db.close().await?;
            }
        }
        None => match &cli.query {
            Some(query) => execute_query(&compiler, query, database_url.as_deref(), &cli, &config).await?,
            None => {
                println!("{}", "🧠 BrainrotSQL".cyan().bold());
                println!();
                println!("Usage: brainrot <QUERY> [OPTIONS]");
                println!();
                println!("Try: brainrot --help");
            }
        },
    }

    Ok(())
}

async fn execute_query(
    compiler: &Compiler,
    query: &str,
    database_url: Option<&str>,
    cli: &Cli,
    config: &Config,
) -> anyhow::Result<()> {
    if cli.verbose {
        println!("{} {}", "Input:".dimmed(), query.yellow());
    }

    let parsed = compiler.parse(query)?;
    let sql = parsed.to_sql();

    let url = match database_url {
        Some(url) if !cli.dry_run => url,
        _ => {
            println!("{}", "Generated SQL:".green().bold());
            println!("{}", sql.white());
            if database_url.is_none() && !cli.dry_run {
                println!();
                println!(
                    "{}",
                    "⚠ No database URL. Use --database-url or set BRAINROT_DATABASE_URL".yellow()
                );
            }
            return Ok(());
        }
    };

    if cli.verbose {
        println!("{} {}", "Connecting to:".dimmed(), url);
        println!("{} {}", "SQL:".dimmed(), sql);
    }

    let mut db = BrainrotDB::connect_with(url, config.database.max_connections, compiler.clone()).await?;
    let outcome = db.execute_query(&parsed).await?;
    print_outcome(&outcome, cli.format);
    db.close().await?;
    Ok(())
}

pub(crate) fn print_outcome(outcome: &Outcome, format: OutputFormat) {
    match outcome {
        Outcome::Rows(rows) => format_output(rows, format),
        Outcome::Affected(n) => println!("{} {} rows affected", "✓".green(), n),
        Outcome::Transaction(event) => println!("{} {}", "✓".green(), event),
    }
}

fn format_output(results: &RowSet, format: OutputFormat) {
    if results.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&results.to_json()).unwrap_or_default()
            );
        }
        OutputFormat::Table => {
            let columns = results.columns();

            let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
            for row in results.rows() {
                for (w, val) in widths.iter_mut().zip(row) {
                    *w = (*w).max(val_to_string(val).chars().count());
                }
            }

            let header: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| pad(c, *w))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in results.rows() {
                let cells: Vec<String> = row
                    .iter()
                    .zip(&widths)
                    .map(|(val, w)| pad(&val_to_string(val), *w))
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!("{} row(s) returned", results.len().to_string().cyan());
        }
    }
}

/// Left-align to a width counted in chars, so accented names line up.
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

fn val_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => val.to_string(),
    }
}

fn explain_query(compiler: &Compiler, query: &str) -> anyhow::Result<()> {
    println!("{}", "🧠 BrainrotSQL Query Explanation".cyan().bold());
    println!();
    println!("{} {}", "Query:".dimmed(), query.yellow());
    println!();

    let parsed = compiler.parse(query)?;

    println!("{}", "Parsed Structure:".green().bold());
    println!("  {} {}", "Kind:".dimmed(), parsed.kind().to_string().cyan());
    if let Some(table) = parsed.table() {
        println!("  {} {}", "Table:".dimmed(), table.white());
    }

    if !parsed.columns().is_empty() {
        println!("  {}", "Columns:".dimmed());
        for col in parsed.columns() {
            println!("    • {}", col.white());
        }
    }

    if !parsed.values().is_empty() {
        println!("  {}", "Values:".dimmed());
        for val in parsed.values() {
            println!("    • {}", val.yellow());
        }
    }

    if !parsed.joined_tables().is_empty() {
        println!("  {}", "Joins:".dimmed());
        for table in parsed.joined_tables() {
            println!("    ⋈ {}", table.white());
        }
    }

    if !parsed.where_conditions().is_empty() {
        println!("  {}", "Where:".dimmed());
        for (i, cond) in parsed.where_conditions().iter().enumerate() {
            let joiner = i
                .checked_sub(1)
                .and_then(|j| parsed.where_join_operators().get(j))
                .map(ToString::to_string)
                .unwrap_or_default();
            println!(
                "    {:3} {} {} {}",
                joiner.cyan(),
                cond.field.white(),
                cond.op.to_string().cyan(),
                cond.value.to_string().yellow()
            );
        }
    }

    println!();
    println!("{}", "Generated SQL:".green().bold());
    println!("  {}", parsed.to_sql().white());
    Ok(())
}

fn show_keywords(registry: &AliasRegistry) {
    println!("{}", "🧠 BrainrotSQL Keyword Reference".cyan().bold());
    println!();
    println!(
        "{:20} {}",
        "Operation".white().bold(),
        "Aliases".white().bold()
    );
    println!("{}", "─".repeat(80).dimmed());

    for (op, aliases) in registry.iter() {
        println!("{:20} {}", op.name().cyan().bold(), aliases.join(", ").yellow());
    }
}
