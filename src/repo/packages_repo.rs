use crate::domain::package::{ServicePackage, TargetUser};
use crate::repo::PackageStore;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct PackagesRepo {
    pub pool: PgPool,
}

const COLUMNS: &str =
    "id, name, price, duration_day, description, target_user, is_active, created_at, updated_at";

fn map_package(r: &PgRow) -> Result<ServicePackage> {
    let target: String = r.try_get("target_user")?;
    Ok(ServicePackage {
        id: r.try_get("id")?,
        name: r.try_get("name")?,
        price: r.try_get("price")?,
        duration_day: r.try_get("duration_day")?,
        description: r.try_get("description")?,
        target_user: TargetUser::parse(&target)
            .with_context(|| format!("unknown target_user {target}"))?,
        is_active: r.try_get("is_active")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

#[async_trait::async_trait]
impl PackageStore for PackagesRepo {
    async fn list_active(&self, audience: Option<TargetUser>) -> Result<Vec<ServicePackage>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM service_packages WHERE is_active = true AND ($1::text IS NULL OR target_user = $1) ORDER BY price ASC, id ASC"
        ))
        .bind(audience.map(|a| a.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_package).collect()
    }

    async fn find_active(&self, package_id: i64) -> Result<Option<ServicePackage>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM service_packages WHERE id = $1 AND is_active = true"
        ))
        .bind(package_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_package).transpose()
    }

    async fn find_any(&self, package_id: i64) -> Result<Option<ServicePackage>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM service_packages WHERE id = $1"))
            .bind(package_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_package).transpose()
    }

    async fn update_price(&self, package_id: i64, price: Decimal) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE service_packages SET price = $2, updated_at = now() WHERE id = $1",
        )
        .bind(package_id)
        .bind(price)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() > 0)
    }
}
