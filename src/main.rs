use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use yatube::db::PgStore;
use yatube::services::auth::SessionKeys;
use yatube::{handlers, AppState, Config};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    if config.app.env.eq_ignore_ascii_case("production") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    init_tracing(&config);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = web::Data::new(AppState {
        store: Arc::new(PgStore::new(pool)),
        sessions: SessionKeys::new(
            config.auth.session_secret.as_bytes(),
            config.auth.session_ttl_hours,
        ),
    });

    tracing::info!(host = %config.app.host, port = config.app.port, "starting yatube");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::not_found))
    })
    .bind((config.app.host.as_str(), config.app.port))?
    .run()
    .await?;

    Ok(())
}
