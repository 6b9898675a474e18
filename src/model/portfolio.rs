use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::reconcile::Reconcile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PortfolioCash {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub portfolio: String,
    pub timestamp: DateTime<Utc>,
    pub market: String,
    pub value: Decimal,
    pub currency: String,
}

impl Reconcile for PortfolioCash {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashBalance {
    pub section: String,
    pub value: Decimal,
    pub currency: String,
}

impl From<&PortfolioCash> for CashBalance {
    fn from(cash: &PortfolioCash) -> Self {
        Self {
            section: cash.market.clone(),
            value: cash.value,
            currency: cash.currency.clone(),
        }
    }
}

pub fn serialize_balances(balances: &[CashBalance]) -> Result<String, ReportError> {
    serde_json::to_string(balances).map_err(|error| {
        ReportError::InvalidArgument(format!("can't serialize portfolio cash: {error}"))
    })
}

pub fn deserialize_balances(json: &str) -> Result<Vec<CashBalance>, ReportError> {
    serde_json::from_str(json).map_err(|error| {
        ReportError::InvalidArgument(format!("can't deserialize portfolio cash: {error}"))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PortfolioProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub portfolio: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub property: String,
    pub value: String,
}

impl Reconcile for PortfolioProperty {}
