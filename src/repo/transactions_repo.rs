use crate::domain::transaction::{
    NewTransaction, PaymentMethod, Settlement, Transaction, TransactionStatus,
};
use crate::repo::LedgerStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct TransactionsRepo {
    pub pool: PgPool,
}

const COLUMNS: &str = "id, order_id, request_id, user_id, package_id, amount, payment_method, status, gateway_trans_id, result_message, created_at, updated_at";

fn map_transaction(r: &PgRow) -> Result<Transaction> {
    let method: String = r.try_get("payment_method")?;
    let status: String = r.try_get("status")?;
    Ok(Transaction {
        id: r.try_get("id")?,
        order_id: r.try_get("order_id")?,
        request_id: r.try_get("request_id")?,
        user_id: r.try_get("user_id")?,
        package_id: r.try_get("package_id")?,
        amount: r.try_get("amount")?,
        payment_method: PaymentMethod::parse(&method)
            .with_context(|| format!("unknown payment_method {method}"))?,
        status: TransactionStatus::parse(&status)
            .with_context(|| format!("unknown status {status}"))?,
        gateway_trans_id: r.try_get("gateway_trans_id")?,
        result_message: r.try_get("result_message")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

#[async_trait::async_trait]
impl LedgerStore for TransactionsRepo {
    async fn insert_pending(&self, new: NewTransaction) -> Result<Transaction> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO transactions (order_id, request_id, user_id, package_id, amount, payment_method, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'PENDING')
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new.order_id)
        .bind(&new.request_id)
        .bind(new.user_id)
        .bind(new.package_id)
        .bind(new.amount)
        .bind(new.payment_method.as_str())
        .fetch_one(&self.pool)
        .await?;

        map_transaction(&row)
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM transactions WHERE order_id = $1"))
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_transaction).transpose()
    }

    async fn settle_pending(
        &self,
        order_id: &str,
        settlement: &Settlement,
    ) -> Result<Option<Transaction>> {
        let status: TransactionStatus = settlement.status.into();
        let row = sqlx::query(&format!(
            r#"
            UPDATE transactions
            SET status = $2,
                gateway_trans_id = COALESCE($3, gateway_trans_id),
                result_message = COALESCE($4, result_message),
                updated_at = now()
            WHERE order_id = $1 AND status = 'PENDING'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(order_id)
        .bind(status.as_str())
        .bind(settlement.gateway_trans_id.as_deref())
        .bind(settlement.result_message.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_transaction).transpose()
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_transaction).collect()
    }

    async fn list_pending_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM transactions WHERE status = 'PENDING' AND created_at < $1 ORDER BY created_at ASC LIMIT $2"
        ))
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_transaction).collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
