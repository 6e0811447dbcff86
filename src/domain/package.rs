use crate::domain::context::Role;
use crate::domain::transaction::PaymentMethod;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which kind of buyer a package is sold to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetUser {
    Recruiter,
    Applicant,
}

impl TargetUser {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetUser::Recruiter => "RECRUITER",
            TargetUser::Applicant => "APPLICANT",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "RECRUITER" => Some(TargetUser::Recruiter),
            "APPLICANT" => Some(TargetUser::Applicant),
            _ => None,
        }
    }

    pub fn admits(&self, role: Role) -> bool {
        match (self, role) {
            (TargetUser::Recruiter, Role::Recruiter) | (TargetUser::Applicant, Role::Applicant) => true,
            (TargetUser::Recruiter, Role::Applicant)
            | (TargetUser::Applicant, Role::Recruiter)
            | (_, Role::Admin) => false,
        }
    }

    /// Catalog filter for a role; `None` means every audience.
    pub fn visible_to(role: Role) -> Option<TargetUser> {
        match role {
            Role::Recruiter => Some(TargetUser::Recruiter),
            Role::Applicant => Some(TargetUser::Applicant),
            Role::Admin => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicePackage {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub duration_day: i32,
    pub description: String,
    pub target_user: TargetUser,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServicePackage {
    /// Price in whole currency units, as charged by the wallet gateway.
    pub fn charge_amount(&self) -> anyhow::Result<i64> {
        if self.price.is_sign_negative() {
            anyhow::bail!("package {} has a negative price", self.id);
        }
        self.price
            .trunc()
            .to_i64()
            .ok_or_else(|| anyhow::anyhow!("package {} price does not fit an amount", self.id))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub duration_day: i32,
    pub description: String,
    pub target_user: TargetUser,
}

impl From<&ServicePackage> for PackageSummary {
    fn from(p: &ServicePackage) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
            duration_day: p.duration_day,
            description: p.description.clone(),
            target_user: p.target_user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodOption {
    pub id: PaymentMethod,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageDetail {
    #[serde(flatten)]
    pub summary: PackageSummary,
    pub is_active: bool,
    pub payment_methods: Vec<PaymentMethodOption>,
}

impl From<&ServicePackage> for PackageDetail {
    fn from(p: &ServicePackage) -> Self {
        Self {
            summary: PackageSummary::from(p),
            is_active: p.is_active,
            payment_methods: PaymentMethod::ALL
                .iter()
                .map(|m| PaymentMethodOption {
                    id: *m,
                    name: m.display_name(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepriceRequest {
    pub price: Decimal,
}
