use jobhunter_payments::config::AppConfig;
use jobhunter_payments::gateways::mock::MockGateway;
use jobhunter_payments::gateways::momo::MomoGateway;
use jobhunter_payments::gateways::WalletGateway;
use jobhunter_payments::http::middleware::rate_limit::RateLimitState;
use jobhunter_payments::http::router::build_router;
use jobhunter_payments::repo::packages_repo::PackagesRepo;
use jobhunter_payments::repo::transactions_repo::TransactionsRepo;
use jobhunter_payments::repo::users_repo::UsersRepo;
use jobhunter_payments::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let gateway: Arc<dyn WalletGateway> = match cfg.momo.mock_behavior.as_deref() {
        Some(behavior) => {
            tracing::warn!(behavior, "using mock wallet gateway");
            Arc::new(MockGateway::new(behavior))
        }
        None => Arc::new(MomoGateway::new(cfg.momo.clone(), reqwest::Client::new())),
    };

    let redis_client = cfg
        .redis_url
        .as_deref()
        .map(redis::Client::open)
        .transpose()?;

    let state = AppState::new(
        Arc::new(PackagesRepo { pool: pool.clone() }),
        Arc::new(TransactionsRepo { pool: pool.clone() }),
        Arc::new(UsersRepo { pool: pool.clone() }),
        gateway,
        cfg.momo.clone(),
        redis_client.clone(),
    );

    let rate_limit = redis_client.map(|client| RateLimitState {
        redis_client: client,
        max_per_minute: cfg.rate_limit_per_minute,
    });

    if cfg.internal_api_key.is_empty() {
        tracing::warn!("INTERNAL_API_KEY is not set; admin routes are locked");
    }
    let app = build_router(state, cfg.internal_api_key.clone(), rate_limit);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
