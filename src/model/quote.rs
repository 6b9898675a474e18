use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::reconcile::Reconcile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecurityQuote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub security: i32,
    pub timestamp: DateTime<Utc>,
    pub quote: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub accrued_interest: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl SecurityQuote {
    #[must_use]
    pub fn new(security: i32, timestamp: DateTime<Utc>, quote: Decimal) -> Self {
        Self {
            id: None,
            security,
            timestamp,
            quote,
            price: None,
            accrued_interest: None,
            currency: None,
        }
    }

    #[must_use]
    pub fn clean_price_in_currency(&self, is_derivative: bool) -> Option<Decimal> {
        if !is_derivative && self.price.is_none() && self.accrued_interest.is_none() {
            Some(self.quote)
        } else {
            self.price
        }
    }

    #[must_use]
    pub fn dirty_price_in_currency(&self, is_derivative: bool) -> Option<Decimal> {
        let clean = self.clean_price_in_currency(is_derivative)?;
        Some(match self.accrued_interest {
            Some(accrued_interest) => clean + accrued_interest,
            None => clean,
        })
    }
}

impl Reconcile for SecurityQuote {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ForeignExchangeRate {
    pub date: NaiveDate,
    pub currency_pair: String,
    pub rate: Decimal,
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{ForeignExchangeRate, SecurityQuote};

    fn quote() -> SecurityQuote {
        let timestamp = Utc.with_ymd_and_hms(2021, 1, 1, 19, 0, 0).unwrap();
        SecurityQuote::new(123, timestamp, Decimal::new(48002, 1))
    }

    #[test]
    fn stock_price_is_its_quote() {
        let quote = quote();
        assert_eq!(quote.clean_price_in_currency(false), Some(Decimal::new(48002, 1)));
        assert_eq!(quote.dirty_price_in_currency(false), Some(Decimal::new(48002, 1)));
    }

    #[test]
    fn bond_price_adds_accrued_interest() {
        let mut quote = quote();
        quote.price = Some(Decimal::new(10203, 1));
        quote.accrued_interest = Some(Decimal::new(102, 1));
        assert_eq!(quote.clean_price_in_currency(false), Some(Decimal::new(10203, 1)));
        assert_eq!(quote.dirty_price_in_currency(false), Some(Decimal::new(10305, 1)));
    }

    #[test]
    fn bond_without_price_has_no_clean_price() {
        let mut quote = quote();
        quote.accrued_interest = Some(Decimal::ONE);
        assert_eq!(quote.clean_price_in_currency(false), None);
        assert_eq!(quote.dirty_price_in_currency(false), None);
    }

    #[test]
    fn derivative_uses_price_only() {
        let mut quote = quote();
        assert_eq!(quote.clean_price_in_currency(true), None);
        quote.price = Some(Decimal::from(1020));
        assert_eq!(quote.clean_price_in_currency(true), Some(Decimal::from(1020)));
    }

    #[test]
    fn exchange_rate_equality_ignores_scale() {
        let date = NaiveDate::from_ymd_opt(2021, 12, 23).unwrap();
        let rate = |value| ForeignExchangeRate {
            date,
            currency_pair: "USDRUB".to_string(),
            rate: value,
        };
        assert_eq!(rate(Decimal::new(7567, 2)), rate(Decimal::new(75670, 3)));
    }
}
