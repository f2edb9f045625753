use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardwise::{config, db, handlers, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let app_config = config::AppConfig::load();
  let pool = db::init_db(&app_config.database_path).expect("Failed to initialize database");

  let bind_addr = app_config.bind_addr();
  let app = handlers::router(AppState::new(pool, app_config));

  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://{}", bind_addr);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
