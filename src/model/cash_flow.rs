use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MergeConflict, ReportError};
use crate::reconcile::Reconcile;

const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashFlowType {
    Cash,
    Price,
    AccruedInterest,
    Fee,
    Amortization,
    Redemption,
    Coupon,
    Dividend,
    DerivativeProfit,
    Margin,
    Tax,
    ForecastTax,
    DerivativePrice,
    DerivativeQuote,
}

impl CashFlowType {
    const ALL: [Self; 14] = [
        Self::Cash,
        Self::Price,
        Self::AccruedInterest,
        Self::Fee,
        Self::Amortization,
        Self::Redemption,
        Self::Coupon,
        Self::Dividend,
        Self::DerivativeProfit,
        Self::Margin,
        Self::Tax,
        Self::ForecastTax,
        Self::DerivativePrice,
        Self::DerivativeQuote,
    ];

    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Cash => 0,
            Self::Price => 1,
            Self::AccruedInterest => 2,
            Self::Fee => 3,
            Self::Amortization => 4,
            Self::Redemption => 5,
            Self::Coupon => 6,
            Self::Dividend => 7,
            Self::DerivativeProfit => 8,
            Self::Margin => 9,
            Self::Tax => 10,
            Self::ForecastTax => 11,
            Self::DerivativePrice => 12,
            Self::DerivativeQuote => 13,
        }
    }

    pub fn from_id(id: i32) -> Result<Self, ReportError> {
        Self::ALL
            .into_iter()
            .find(|kind| i32::from(kind.id()) == id)
            .ok_or_else(|| {
                ReportError::InvalidArgument(format!("invalid cash flow event type: {id}"))
            })
    }
}

fn sum_values(first: Decimal, second: Decimal) -> Result<Decimal, MergeConflict> {
    first
        .checked_add(second)
        .ok_or_else(|| MergeConflict::new(format!("value overflow adding {first} and {second}")))
}

fn default_rub() -> String {
    EventCashFlow::DEFAULT_CURRENCY.to_string()
}

fn default_rur() -> String {
    SecurityEventCashFlow::DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventCashFlow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub portfolio: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: CashFlowType,
    pub value: Decimal,
    #[serde(default = "default_rub")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventCashFlow {
    pub const DEFAULT_CURRENCY: &'static str = "RUB";

    #[must_use]
    pub fn new(
        portfolio: impl Into<String>,
        timestamp: DateTime<Utc>,
        event_type: CashFlowType,
        value: Decimal,
    ) -> Self {
        Self {
            id: None,
            portfolio: portfolio.into(),
            timestamp,
            event_type,
            value,
            currency: default_rub(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Reconcile for EventCashFlow {
    fn equals_for_merge(&self, other: &Self) -> bool {
        self.event_type == other.event_type
            && self.timestamp == other.timestamp
            && self.portfolio == other.portfolio
            && self.currency == other.currency
            && self.value == other.value
    }

    fn merge_duplicates(self, other: Self) -> Result<Vec<Self>, MergeConflict> {
        if self.currency != other.currency {
            return Err(MergeConflict::new(format!(
                "cash flows have different currencies, {} and {}",
                self.currency, other.currency
            )));
        }

        let joined = [self.description.as_deref(), other.description.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("; ");
        let description =
            (!joined.is_empty()).then(|| joined.chars().take(MAX_DESCRIPTION_CHARS).collect());

        Ok(vec![Self {
            value: sum_values(self.value, other.value)?,
            description,
            ..self
        }])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecurityEventCashFlow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub portfolio: String,
    pub timestamp: DateTime<Utc>,
    pub security: i32,
    #[serde(default)]
    pub count: Option<i64>,
    pub event_type: CashFlowType,
    pub value: Decimal,
    #[serde(default = "default_rur")]
    pub currency: String,
}

impl SecurityEventCashFlow {
    pub const DEFAULT_CURRENCY: &'static str = "RUR";

    #[must_use]
    pub fn new(
        portfolio: impl Into<String>,
        timestamp: DateTime<Utc>,
        security: i32,
        event_type: CashFlowType,
        value: Decimal,
    ) -> Self {
        Self {
            id: None,
            portfolio: portfolio.into(),
            timestamp,
            security,
            count: None,
            event_type,
            value,
            currency: default_rur(),
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

impl Reconcile for SecurityEventCashFlow {
    fn equals_for_merge(&self, other: &Self) -> bool {
        self.security == other.security
            && self.event_type == other.event_type
            && self.timestamp == other.timestamp
            && self.portfolio == other.portfolio
    }

    fn merge_duplicates(self, other: Self) -> Result<Vec<Self>, MergeConflict> {
        if self.currency != other.currency {
            return Err(MergeConflict::new(format!(
                "security events have different currencies, {} and {}",
                self.currency, other.currency
            )));
        }
        if self.count != other.count {
            return Err(MergeConflict::new(format!(
                "security events have different counts, {:?} and {:?}",
                self.count, other.count
            )));
        }

        Ok(vec![Self {
            value: sum_values(self.value, other.value)?,
            ..self
        }])
    }
}
