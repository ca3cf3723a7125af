use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use log::info;
use purchase_fx::app::{self, AppState};
use purchase_fx::config::AppConfig;
use purchase_fx::logging;
use purchase_fx::store::SqliteTransactionStore;
use purchase_fx::treasury::TreasuryClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    logging::init(&config)?;

    let store = SqliteTransactionStore::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    let feed = TreasuryClient::new(&config).context("failed to build Treasury API client")?;

    let state = web::Data::new(AppState::new(&config, Arc::new(store), Arc::new(feed)));

    info!(
        "transactions service ({}) listening on {}:{}",
        config.app_env, config.api_host, config.api_port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(app::cors())
            .wrap(app::security_headers())
            .wrap(Logger::default())
            .configure(app::configure)
    })
    .bind(config.bind_addr())
    .with_context(|| format!("failed to bind {}:{}", config.api_host, config.api_port))?
    .run()
    .await?;

    Ok(())
}
