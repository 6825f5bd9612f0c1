//! Demo: a seeded SQLite database and a tour of the dialect.

use brainrot_sql::prelude::*;
use colored::*;

use crate::{OutputFormat, print_outcome};

pub const DEMO_URL: &str = "sqlite::memory:";

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT,
        age INTEGER,
        status TEXT
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY,
        user_id INTEGER,
        order_date TEXT,
        total_amount REAL,
        FOREIGN KEY(user_id) REFERENCES users(id)
    )",
];

const SEED: &[&str] = &[
    "INSERT INTO users (id, name, email, age, status) VALUES
        (1, 'Tralalero Tralala', 'tralala@example.com', 25, 'active'),
        (2, 'Bombardiro Crocodilo', 'bombard@example.com', 32, 'inactive'),
        (3, 'Cappuccino Assassino', 'cappuccino@example.com', 18, 'active'),
        (4, 'Bombombini Gusini', 'bomber@example.com', 45, 'active'),
        (5, 'Boneca Ambalabu', 'boneca@example.com', NULL, 'pending')",
    "INSERT INTO orders (id, user_id, order_date, total_amount) VALUES
        (1, 1, '2025-01-15', 129.99),
        (2, 1, '2025-02-20', 55.50),
        (3, 2, '2025-01-10', 75.25),
        (4, 3, '2025-03-05', 210.75),
        (5, 5, '2025-02-28', 85.00)",
];

pub const DEMO_QUERIES: &[(&str, &str)] = &[
    ("All users", "tralalero tralala frulli lirili larila users"),
    ("Selected columns", "tralalero tralala id name email lirili larila users"),
    (
        "Filtered",
        "tralalero tralala id name lirili larila users patapim status = 'active'",
    ),
    (
        "Two conditions",
        "tralalero tralala id name age lirili larila users patapim status = 'active' camelo age > 20",
    ),
    (
        "NULL check",
        "tralalero tralala id name email lirili larila users patapim email bobrito girafa",
    ),
    (
        "Join",
        "tralalero tralala users.name orders.order_date orders.total_amount lirili larila users boneca ambalabu orders patapim users.id = orders.user_id",
    ),
    (
        "Insert",
        "bombardiro crocodilo users id name email age status trulimero 6 'Frullì Frullà' 'frulli@example.com' 29 'active'",
    ),
    (
        "Update",
        "cappuccino assassino users cocofanto status burbaloni 'premium' patapim id = 6",
    ),
    ("Delete", "bombombini gusini lirili larila users patapim id = 6"),
];

/// Create and fill the sample tables when `users` is empty.
pub async fn seed(db: &mut BrainrotDB) -> BrainrotResult<()> {
    for sql in SCHEMA {
        db.raw(sql).await?;
    }

    let existing = db.execute("tralalero frulli lirili users").await?;
    if matches!(existing, Outcome::Rows(ref rows) if !rows.is_empty()) {
        return Ok(());
    }
    for sql in SEED {
        db.raw(sql).await?;
    }
    Ok(())
}

/// Seed the database and run every demo query, printing SQL and results.
pub async fn run_demo(db: &mut BrainrotDB, format: OutputFormat) -> BrainrotResult<()> {
    println!("{}", "Initializing database...".dimmed());
    seed(db).await?;

    println!();
    println!("{}", "🧠 Running demo queries".cyan().bold());
    println!("{}", "═".repeat(60).dimmed());

    for (title, query) in DEMO_QUERIES {
        println!();
        println!("{} {}", "▶".cyan(), title.white().bold());
        println!("  {} {}", "Brainrot:".dimmed(), query.yellow());
        println!("  {} {}", "SQL:     ".dimmed(), db.compile(query)?.green());
        match db.execute(query).await {
            Ok(outcome) => print_outcome(&outcome, format),
            Err(e) => eprintln!("{} {}", "✗".red(), e.to_string().red()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_queries_run_against_seed() {
        let mut db = BrainrotDB::connect(DEMO_URL).await.unwrap();
        seed(&mut db).await.unwrap();
        // Seeding twice leaves the data alone.
        seed(&mut db).await.unwrap();

        for (title, query) in DEMO_QUERIES {
            db.execute(query)
                .await
                .unwrap_or_else(|e| panic!("{} failed: {}", title, e));
        }

        let Outcome::Rows(rows) = db.execute(DEMO_QUERIES[0].1).await.unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 5);
    }

    #[tokio::test]
    async fn test_null_check_finds_missing_age() {
        let mut db = BrainrotDB::connect(DEMO_URL).await.unwrap();
        seed(&mut db).await.unwrap();
        let Outcome::Rows(rows) = db
            .execute("tralalero id name age lirili users patapim age bobrito girafa")
            .await
            .unwrap()
        else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.get(0, "name"), Some(&serde_json::json!("Boneca Ambalabu")));
        assert!(rows.is_null(0, "age"));
    }
}
