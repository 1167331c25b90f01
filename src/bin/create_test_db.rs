use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;

use ledger_rs::{
    Amount, CategoryName, Email, Kind, Ledger, NewCategory, NewTransaction, PasswordHash,
    ValidatedPassword, create_user, initialize_db,
};

/// The email of the demo user.
const TEST_EMAIL: &str = "demo@example.com";
/// The password of the demo user.
const TEST_PASSWORD: &str = "correct horse battery staple";

/// A utility for creating a test database for the REST API server of ledger_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {TEST_EMAIL} with the password '{TEST_PASSWORD}'...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(Email::new(TEST_EMAIL)?, password_hash, &conn)?;

    println!("Creating categories and transactions...");

    let ledger = Ledger::new(Arc::new(Mutex::new(conn)), "Etc/UTC");

    let food = ledger.create_category(
        user.id,
        NewCategory::new(CategoryName::new("Food")?, Kind::Expense, Some("🛒"), None),
    )?;
    let salary = ledger.create_category(
        user.id,
        NewCategory::new(
            CategoryName::new("Salary")?,
            Kind::Income,
            Some("💼"),
            Some("from-green-500 to-green-600"),
        ),
    )?;

    ledger.create_transaction(
        user.id,
        NewTransaction::new(
            "Groceries",
            "50".parse::<Amount>()?,
            Kind::Expense,
            food.id,
            None,
        )?,
    )?;
    ledger.create_transaction(
        user.id,
        NewTransaction::new(
            "Paycheck",
            "2000".parse::<Amount>()?,
            Kind::Income,
            salary.id,
            None,
        )?,
    )?;

    let stats = ledger.get_stats(user.id, None)?;
    println!(
        "Income: {}, expenses: {}, balance: {}",
        stats.total_income, stats.total_expenses, stats.balance
    );

    println!("Success!");

    Ok(())
}
