use anyhow::Result;
use jobhunter_payments::config::AppConfig;
use jobhunter_payments::repo::transactions_repo::TransactionsRepo;
use jobhunter_payments::service::reconciler::PendingReconciler;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&cfg.database_url)
        .await?;

    let reconciler = PendingReconciler {
        ledger: Arc::new(TransactionsRepo { pool }),
        expiry: chrono::Duration::minutes(cfg.pending_expiry_minutes),
        grace: chrono::Duration::minutes(cfg.pending_grace_minutes),
        batch_size: 100,
    };

    tracing::info!(
        expiry_minutes = cfg.pending_expiry_minutes,
        grace_minutes = cfg.pending_grace_minutes,
        interval_secs = cfg.reconcile_interval_secs,
        "pending reconciler started"
    );
    reconciler
        .run(std::time::Duration::from_secs(cfg.reconcile_interval_secs))
        .await;
    Ok(())
}
