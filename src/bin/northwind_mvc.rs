use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use northwind as app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = app::config::load_config().context("failed to load configuration")?;
    app::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db_pool = app::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_migrate {
        app::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }

    let addr = cfg.mvc_addr();
    let service_url = cfg.service_base_url.clone();
    // The named client is built once here and shared by every request
    let state = app::mvc::MvcState::new(Arc::new(db_pool), cfg)
        .context("failed to build the Northwind service client")?;
    let router = app::mvc::mvc_router(state);

    info!(service = %service_url, "northwind-mvc listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(app::shutdown_signal())
        .await?;

    info!("northwind-mvc stopped");
    Ok(())
}
