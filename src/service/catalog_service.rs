use crate::domain::context::Caller;
use crate::domain::package::{PackageDetail, PackageSummary, TargetUser};
use crate::domain::payment::PaymentError;
use crate::repo::PackageStore;
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogService {
    pub packages: Arc<dyn PackageStore>,
}

impl CatalogService {
    pub async fn list_packages(&self, caller: &Caller) -> Result<Vec<PackageSummary>, PaymentError> {
        let packages = self
            .packages
            .list_active(TargetUser::visible_to(caller.role))
            .await?;
        Ok(packages.iter().map(PackageSummary::from).collect())
    }

    pub async fn get_package(
        &self,
        caller: &Caller,
        package_id: i64,
    ) -> Result<PackageDetail, PaymentError> {
        let package = self
            .packages
            .find_active(package_id)
            .await?
            .filter(|p| TargetUser::visible_to(caller.role).map_or(true, |a| a == p.target_user))
            .ok_or_else(|| PaymentError::NotFound(format!("service package {package_id} not found")))?;
        Ok(PackageDetail::from(&package))
    }

    /// Only future transactions see the new price; existing rows keep their
    /// snapshotted amount.
    pub async fn reprice_package(&self, package_id: i64, price: Decimal) -> Result<(), PaymentError> {
        if price.is_sign_negative() {
            return Err(PaymentError::Validation("price must not be negative".to_string()));
        }
        if !self.packages.update_price(package_id, price).await? {
            return Err(PaymentError::NotFound(format!(
                "service package {package_id} not found"
            )));
        }
        tracing::info!(package_id, %price, "package repriced");
        Ok(())
    }
}
