//! Creates the schema and loads the Northwind sample set.
//!
//! Run with: cargo run --bin seed-data -- --database-url sqlite://northwind.db?mode=rwc

use clap::Parser;
use tracing::info;

use northwind as app;

#[derive(Debug, Parser)]
#[command(name = "seed-data", about = "Load the Northwind sample data set")]
struct Args {
    /// Overrides the configured database URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Assume the schema already exists
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut cfg = app::config::load_config()?;
    app::config::init_tracing(cfg.log_level(), cfg.log_json);

    if let Some(url) = args.database_url {
        cfg.database_url = url;
    }

    info!("=== Northwind Seed Data ===");
    let db = app::db::establish_connection_from_app_config(&cfg).await?;
    if !args.skip_migrations {
        app::db::run_migrations(&db).await?;
    }

    let summary = app::seed::seed_sample_data(&db).await?;
    if summary.skipped {
        info!("Store already has data; nothing inserted");
    } else {
        info!(
            "Inserted {} categories, {} suppliers, {} products, {} customers, {} orders ({} lines)",
            summary.categories,
            summary.suppliers,
            summary.products,
            summary.customers,
            summary.orders,
            summary.order_details
        );
    }

    app::db::close_pool(db).await?;
    Ok(())
}
