mod importer;

use clap::Parser;
use importer::{import_ratings, parse_ratings};
use sqlx::SqlitePool;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seed", about = "Seed the lobby database with player ratings")]
struct Args {
    /// Path to a JSON array of {"username", "rating"} objects
    #[arg(short, long)]
    ratings: PathBuf,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Clear existing players before import
    #[arg(long)]
    clear: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Connecting to database...");
    let pool = SqlitePool::connect(&args.database_url).await?;

    // Run migrations to ensure schema exists
    sqlx::migrate!("../../migrations").run(&pool).await?;

    if args.clear {
        println!("Clearing existing players...");
        sqlx::query("DELETE FROM players").execute(&pool).await?;
    }

    println!("Parsing ratings: {:?}", args.ratings);
    let players = parse_ratings(&args.ratings)?;
    println!("Found {} players", players.len());

    let stats = import_ratings(&pool, players).await?;

    println!();
    println!("Import complete:");
    println!("  Inserted or updated: {}", stats.upserted);
    println!("  Skipped (no name):   {}", stats.skipped);

    Ok(())
}
