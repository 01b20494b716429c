mod backfill;
mod db;
mod price;

use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "price_backfill",
    about = "Backfill priceRange on the restaurants collection, derived from ratings"
)]
struct Cli {
    /// Target collection
    #[arg(long, default_value = "restaurants")]
    collection: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign price ranges to restaurants that lack one (the default)
    Run {
        /// Plan and report without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Insert sample restaurants for trying the backfill locally
    Seed,
    /// Labelled / unlabelled counts
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let client = db::connect().await?;
    let coll = db::restaurants(&client, &cli.collection);

    let result = match cli.command.unwrap_or(Commands::Run { dry_run: false }) {
        Commands::Run { dry_run } => backfill::run(&client, &coll, dry_run).await,
        Commands::Seed => {
            let inserted = db::seed_samples(&client, &cli.collection).await?;
            println!("Inserted {} sample restaurants", inserted);
            Ok(())
        }
        Commands::Stats => {
            let s = db::get_stats(&coll).await?;
            println!("Total:      {}", s.total);
            println!("Labelled:   {}", s.labelled);
            println!("Unlabelled: {}", s.unlabelled);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}
