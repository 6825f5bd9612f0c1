//! REPL mode for interactive BrainrotSQL queries

use brainrot_sql::prelude::*;
use colored::*;

use crate::{OutputFormat, print_outcome};

/// Run the interactive REPL mode.
///
/// With a database every line is executed, otherwise only compiled. Errors
/// are printed and the loop keeps going.
pub async fn run_repl(compiler: &Compiler, mut db: Option<BrainrotDB>, format: OutputFormat) {
    use rustyline::DefaultEditor;
    use rustyline::error::ReadlineError;

    println!("{}", "🧠 BrainrotSQL REPL — Interactive Mode".cyan().bold());
    if db.is_some() {
        println!("{}", "Connected: queries are executed.".dimmed());
    } else {
        println!("{}", "No database: queries are compiled only.".dimmed());
    }
    println!("  {}  - Exit the REPL", ".exit".yellow());
    println!("  {}  - Show help", ".help".yellow());
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("{} {}", "Failed to initialize REPL:".red(), e);
            return;
        }
    };

    let history_path = dirs::home_dir()
        .map(|p| p.join(".brainrot_history"))
        .unwrap_or_default();
    let _ = rl.load_history(&history_path);

    loop {
        let prompt = if db.as_ref().is_some_and(BrainrotDB::in_transaction) {
            "brainrot*> ".yellow().bold().to_string()
        } else {
            "brainrot> ".cyan().bold().to_string()
        };
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match line {
                    ".exit" | ".quit" | "exit" | "quit" => {
                        println!("{}", "Goodbye! 👋".green());
                        break;
                    }
                    ".help" | "help" => {
                        show_repl_help();
                        continue;
                    }
                    ".keywords" => {
                        for (op, aliases) in compiler.registry().iter() {
                            println!("  {:20} {}", op.name().cyan(), aliases.join(", "));
                        }
                        continue;
                    }
                    ".clear" | "clear" => {
                        print!("\x1B[2J\x1B[1;1H");
                        continue;
                    }
                    _ => {}
                }

                let query = match compiler.parse(line) {
                    Ok(query) => query,
                    Err(e) => {
                        eprintln!("{} {}", "✗".red(), e.to_string().red());
                        continue;
                    }
                };
                println!("{} {}", "→".green(), query.to_sql().white().bold());

                if let Some(db) = db.as_mut() {
                    match db.execute_query(&query).await {
                        Ok(outcome) => print_outcome(&outcome, format),
                        Err(e) => eprintln!("{} {}", "✗".red(), e.to_string().red()),
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye! 👋".green());
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", "Error:".red(), err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);

    if let Some(db) = db {
        if let Err(e) = db.close().await {
            eprintln!("{} {}", "Error:".red(), e);
        }
    }
}

/// Show REPL help information.
pub fn show_repl_help() {
    println!("{}", "BrainrotSQL REPL Commands:".cyan().bold());
    println!("  {}      - Exit the REPL", ".exit".yellow());
    println!("  {}      - Show this help", ".help".yellow());
    println!("  {}  - Show the alias table", ".keywords".yellow());
    println!("  {}     - Clear screen", ".clear".yellow());
    println!();
    println!("{}", "Query Examples:".cyan().bold());
    println!("  tralalero tralala id name lirili larila users patapim age > 30");
    println!("  bombardiro crocodilo users id name trulimero 7 'Tung Tung'");
    println!("  cappuccino assassino users cocofanto status burbaloni 'premium' patapim id = 7");
    println!("  bombombini gusini lirili larila users patapim email bobrito girafa");
    println!("  tung tung  /  ballerina  /  chimpanzini  (BEGIN / COMMIT / ROLLBACK)");
    println!();
}
