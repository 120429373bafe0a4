use anyhow::Context;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use todo_rest::{SharedData, app_env, db, logging, persistence, routes};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenv().is_ok();

    let otel_exporters = match (
        env::var(app_env::OTEL_SPAN_EXPORT_URL),
        env::var(app_env::OTEL_METRIC_EXPORT_URL),
    ) {
        (Ok(span_url), Ok(metric_url)) => Some(logging::init_exporters(&span_url, &metric_url)?),
        _ => None,
    };
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters);
    if !dotenv_loaded {
        info!("Starting without a .env file");
    }

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("the {} environment variable is required", app_env::DB_URL))?;
    let pool = db::connect_sqlx(&db_url)
        .await
        .context("connecting to the database")?;
    db::create_schema(&pool).await?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(pool),
    });
    let router = routes::build_router(shared_data);

    let listen_addr =
        env::var(app_env::LISTEN_ADDR).unwrap_or_else(|_| app_env::DEFAULT_LISTEN_ADDR.to_owned());
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("binding to {listen_addr}"))?;
    info!("Starting server on {listen_addr}");
    axum::serve(listener, router).await?;

    Ok(())
}
