use crate::domain::transaction::Settlement;
use crate::repo::LedgerStore;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Fails PENDING transactions whose wallet payment link can no longer be used.
///
/// `expiry` is the link lifetime; `grace` leaves room for the gateway to
/// redeliver a notification for a payment made just before the link expired.
#[derive(Clone)]
pub struct PendingReconciler {
    pub ledger: Arc<dyn LedgerStore>,
    pub expiry: Duration,
    pub grace: Duration,
    pub batch_size: i64,
}

impl PendingReconciler {
    pub async fn run(self, interval: std::time::Duration) {
        loop {
            match self.tick(Utc::now()).await {
                Ok(expired) if !expired.is_empty() => {
                    tracing::info!(count = expired.len(), "expired pending transactions");
                }
                Ok(_) => {}
                Err(err) => tracing::error!("pending reconciler error: {:#}", err),
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Returns the order ids this tick moved to FAILED. Rows settled by a
    /// notification in the meantime are skipped by the conditional update.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        let cutoff = now - self.expiry - self.grace;
        let stale = self.ledger.list_pending_before(cutoff, self.batch_size).await?;

        let mut expired = Vec::new();
        for tx in stale {
            let settled = self
                .ledger
                .settle_pending(
                    &tx.order_id,
                    &Settlement::failed(None, Some("expired without gateway notification".to_string())),
                )
                .await?;
            if settled.is_some() {
                tracing::warn!(order_id = %tx.order_id, created_at = %tx.created_at, "pending transaction expired");
                expired.push(tx.order_id);
            }
        }
        Ok(expired)
    }
}
