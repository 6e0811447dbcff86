use crate::domain::context::{Caller, User};
use crate::domain::package::{ServicePackage, TargetUser};
use crate::domain::transaction::{NewTransaction, Settlement, Transaction};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub mod memory;
pub mod packages_repo;
pub mod transactions_repo;
pub mod users_repo;

#[async_trait::async_trait]
pub trait PackageStore: Send + Sync {
    /// Active packages for one audience, or all audiences when `None`.
    async fn list_active(&self, audience: Option<TargetUser>) -> Result<Vec<ServicePackage>>;

    async fn find_active(&self, package_id: i64) -> Result<Option<ServicePackage>>;

    /// Includes inactive packages; used to describe historical transactions.
    async fn find_any(&self, package_id: i64) -> Result<Option<ServicePackage>>;

    async fn update_price(&self, package_id: i64, price: Decimal) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    async fn insert_pending(&self, new: NewTransaction) -> Result<Transaction>;

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Transaction>>;

    /// Moves the row out of PENDING. Returns `None` when the row is absent or
    /// already terminal; exactly one concurrent caller can get `Some`.
    async fn settle_pending(
        &self,
        order_id: &str,
        settlement: &Settlement,
    ) -> Result<Option<Transaction>>;

    /// Newest first.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Transaction>>;

    /// Oldest first.
    async fn list_pending_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Transaction>>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn find_caller_by_token(&self, token: &str) -> Result<Option<Caller>>;

    async fn find_user(&self, user_id: i64) -> Result<Option<User>>;

    /// Returns `false` when the user has no applicant profile.
    async fn activate_premium(&self, user_id: i64) -> Result<bool>;
}
