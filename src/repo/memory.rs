use crate::domain::context::{Caller, Role, User};
use crate::domain::package::{ServicePackage, TargetUser};
use crate::domain::transaction::{NewTransaction, Settlement, Transaction, TransactionStatus};
use crate::repo::{LedgerStore, PackageStore, UserStore};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process implementation of every store, used by tests and local demos.
///
/// All tables sit behind one `RwLock`, so a settlement's read-check-write runs
/// under the write guard just like the conditional `UPDATE` in Postgres.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<i64, User>,
    applicant_premium: HashMap<i64, bool>,
    tokens: HashMap<String, i64>,
    packages: HashMap<i64, ServicePackage>,
    transactions: Vec<Transaction>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applicants get a profile unless `with_profile` is false.
    pub async fn add_user(&self, username: &str, role: Role, with_profile: bool) -> i64 {
        let mut t = self.inner.write().await;
        let id = t.next_id();
        t.users.insert(
            id,
            User {
                id,
                username: username.to_string(),
                role,
            },
        );
        if role == Role::Applicant && with_profile {
            t.applicant_premium.insert(id, false);
        }
        id
    }

    pub async fn issue_token(&self, user_id: i64, token: &str) {
        self.inner
            .write()
            .await
            .tokens
            .insert(token.to_string(), user_id);
    }

    pub async fn add_package(&self, name: &str, price: Decimal, target_user: TargetUser) -> i64 {
        let mut t = self.inner.write().await;
        let id = t.next_id();
        let now = Utc::now();
        t.packages.insert(
            id,
            ServicePackage {
                id,
                name: name.to_string(),
                price,
                duration_day: 30,
                description: String::new(),
                target_user,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    pub async fn deactivate_package(&self, package_id: i64) {
        if let Some(p) = self.inner.write().await.packages.get_mut(&package_id) {
            p.is_active = false;
        }
    }

    pub async fn is_premium(&self, user_id: i64) -> Option<bool> {
        self.inner.read().await.applicant_premium.get(&user_id).copied()
    }

    pub async fn transaction_count(&self) -> usize {
        self.inner.read().await.transactions.len()
    }

    pub async fn backdate(&self, order_id: &str, created_at: DateTime<Utc>) {
        let mut t = self.inner.write().await;
        if let Some(tx) = t.transactions.iter_mut().find(|tx| tx.order_id == order_id) {
            tx.created_at = created_at;
        }
    }
}

#[async_trait::async_trait]
impl PackageStore for MemoryStore {
    async fn list_active(&self, audience: Option<TargetUser>) -> Result<Vec<ServicePackage>> {
        let t = self.inner.read().await;
        let mut out: Vec<ServicePackage> = t
            .packages
            .values()
            .filter(|p| p.is_active && audience.map_or(true, |a| p.target_user == a))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn find_active(&self, package_id: i64) -> Result<Option<ServicePackage>> {
        let t = self.inner.read().await;
        Ok(t.packages.get(&package_id).filter(|p| p.is_active).cloned())
    }

    async fn find_any(&self, package_id: i64) -> Result<Option<ServicePackage>> {
        Ok(self.inner.read().await.packages.get(&package_id).cloned())
    }

    async fn update_price(&self, package_id: i64, price: Decimal) -> Result<bool> {
        let mut t = self.inner.write().await;
        Ok(match t.packages.get_mut(&package_id) {
            Some(p) => {
                p.price = price;
                p.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }
}

#[async_trait::async_trait]
impl LedgerStore for MemoryStore {
    async fn insert_pending(&self, new: NewTransaction) -> Result<Transaction> {
        let mut t = self.inner.write().await;
        if t.transactions.iter().any(|tx| tx.order_id == new.order_id) {
            anyhow::bail!("duplicate order_id {}", new.order_id);
        }
        let now = Utc::now();
        let tx = Transaction {
            id: t.next_id(),
            order_id: new.order_id,
            request_id: new.request_id,
            user_id: Some(new.user_id),
            package_id: Some(new.package_id),
            amount: new.amount,
            payment_method: new.payment_method,
            status: TransactionStatus::Pending,
            gateway_trans_id: None,
            result_message: None,
            created_at: now,
            updated_at: now,
        };
        t.transactions.push(tx.clone());
        Ok(tx)
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Transaction>> {
        let t = self.inner.read().await;
        Ok(t.transactions.iter().find(|tx| tx.order_id == order_id).cloned())
    }

    async fn settle_pending(
        &self,
        order_id: &str,
        settlement: &Settlement,
    ) -> Result<Option<Transaction>> {
        let mut t = self.inner.write().await;
        let Some(tx) = t.transactions.iter_mut().find(|tx| tx.order_id == order_id) else {
            return Ok(None);
        };
        Ok(tx.settle(settlement, Utc::now()).then(|| tx.clone()))
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let t = self.inner.read().await;
        let mut out: Vec<Transaction> = t
            .transactions
            .iter()
            .filter(|tx| tx.user_id == Some(user_id))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    async fn list_pending_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Transaction>> {
        let t = self.inner.read().await;
        let mut out: Vec<Transaction> = t
            .transactions
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Pending && tx.created_at < cutoff)
            .cloned()
            .collect();
        out.sort_by_key(|tx| tx.created_at);
        out.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(out)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn find_caller_by_token(&self, token: &str) -> Result<Option<Caller>> {
        let t = self.inner.read().await;
        Ok(t.tokens
            .get(token)
            .and_then(|id| t.users.get(id))
            .map(|u| Caller {
                user_id: u.id,
                role: u.role,
            }))
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&user_id).cloned())
    }

    async fn activate_premium(&self, user_id: i64) -> Result<bool> {
        let mut t = self.inner.write().await;
        Ok(match t.applicant_premium.get_mut(&user_id) {
            Some(flag) => {
                *flag = true;
                true
            }
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::PaymentMethod;

    fn new_tx(order_id: &str, user_id: i64) -> NewTransaction {
        NewTransaction {
            order_id: order_id.to_string(),
            request_id: format!("req-{order_id}"),
            user_id,
            package_id: 1,
            amount: 500,
            payment_method: PaymentMethod::Momo,
        }
    }

    #[tokio::test]
    async fn duplicate_order_ids_are_rejected() {
        let store = MemoryStore::new();
        store.insert_pending(new_tx("a", 1)).await.unwrap();
        assert!(store.insert_pending(new_tx("a", 1)).await.is_err());
        assert_eq!(store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn settle_only_once() {
        let store = MemoryStore::new();
        store.insert_pending(new_tx("a", 1)).await.unwrap();

        let first = store
            .settle_pending("a", &Settlement::success(None, None))
            .await
            .unwrap();
        assert_eq!(first.map(|t| t.status), Some(TransactionStatus::Success));

        let second = store
            .settle_pending("a", &Settlement::failed(None, None))
            .await
            .unwrap();
        assert!(second.is_none());
        assert!(store.settle_pending("missing", &Settlement::success(None, None)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn premium_requires_profile() {
        let store = MemoryStore::new();
        let with = store.add_user("an", Role::Applicant, true).await;
        let without = store.add_user("bo", Role::Applicant, false).await;
        assert!(store.activate_premium(with).await.unwrap());
        assert_eq!(store.is_premium(with).await, Some(true));
        assert!(!store.activate_premium(without).await.unwrap());
    }
}
