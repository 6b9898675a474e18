use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cash_flow::CashFlowType;
use crate::reconcile::Reconcile;

pub const DERIVATIVE_QUOTE_CURRENCY: &str = "PNT";

/// Amounts below this are rounding noise and produce no cash flow.
const MIN_CASH_FLOW: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TradeDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub trade_id: String,
    pub portfolio: String,
    pub security: i32,
    pub timestamp: DateTime<Utc>,
    pub count: i64,
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub value_currency: Option<String>,
    #[serde(default)]
    pub fee_currency: Option<String>,
}

impl TradeDetails {
    #[must_use]
    pub fn new(
        trade_id: impl Into<String>,
        portfolio: impl Into<String>,
        security: i32,
        timestamp: DateTime<Utc>,
        count: i64,
    ) -> Self {
        Self {
            id: None,
            trade_id: trade_id.into(),
            portfolio: portfolio.into(),
            security,
            timestamp,
            count,
            value: None,
            fee: None,
            value_currency: None,
            fee_currency: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Decimal, currency: impl Into<String>) -> Self {
        self.value = Some(value);
        self.value_currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn with_fee(mut self, fee: Decimal, currency: impl Into<String>) -> Self {
        self.fee = Some(fee);
        self.fee_currency = Some(currency.into());
        self
    }

    fn cash_flow(
        &self,
        event_type: CashFlowType,
        value: Decimal,
        currency: &str,
    ) -> TransactionCashFlow {
        TransactionCashFlow {
            transaction_id: self.id,
            event_type,
            value,
            currency: Some(currency.to_string()),
        }
    }

    fn significant(
        &self,
        event_type: CashFlowType,
        value: Option<Decimal>,
        currency: Option<&str>,
    ) -> Option<TransactionCashFlow> {
        match (value, currency) {
            (Some(value), Some(currency)) if value.abs() >= MIN_CASH_FLOW => {
                Some(self.cash_flow(event_type, value, currency))
            }
            _ => None,
        }
    }

    fn value_cash_flow(&self, event_type: CashFlowType) -> Option<TransactionCashFlow> {
        self.significant(event_type, self.value, self.value_currency.as_deref())
    }

    fn fee_cash_flow(&self) -> Option<TransactionCashFlow> {
        self.significant(CashFlowType::Fee, self.fee, self.fee_currency.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionCashFlow {
    pub transaction_id: Option<i64>,
    pub event_type: CashFlowType,
    pub value: Decimal,
    /// Missing only for derivative values printed without a currency.
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub trade_id: String,
    pub portfolio: String,
    pub security: i32,
    pub timestamp: DateTime<Utc>,
    pub count: i64,
}

pub trait CashFlowStrategy {
    fn cash_flows(&self) -> Vec<TransactionCashFlow>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecurityTransaction {
    #[serde(flatten)]
    pub trade: TradeDetails,
    #[serde(default)]
    pub accrued_interest: Option<Decimal>,
}

impl CashFlowStrategy for SecurityTransaction {
    fn cash_flows(&self) -> Vec<TransactionCashFlow> {
        let trade = &self.trade;
        [
            trade.value_cash_flow(CashFlowType::Price),
            trade.significant(
                CashFlowType::AccruedInterest,
                self.accrued_interest,
                trade.value_currency.as_deref(),
            ),
            trade.fee_cash_flow(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DerivativeTransaction {
    #[serde(flatten)]
    pub trade: TradeDetails,
    #[serde(default)]
    pub value_in_points: Option<Decimal>,
}

impl CashFlowStrategy for DerivativeTransaction {
    fn cash_flows(&self) -> Vec<TransactionCashFlow> {
        let trade = &self.trade;
        let quote = self.value_in_points.map(|points| {
            trade.cash_flow(CashFlowType::DerivativeQuote, points, DERIVATIVE_QUOTE_CURRENCY)
        });
        // emitted whenever present, zero and missing currency included
        let price = trade.value.map(|value| TransactionCashFlow {
            transaction_id: trade.id,
            event_type: CashFlowType::DerivativePrice,
            value,
            currency: trade.value_currency.clone(),
        });

        [quote, price, trade.fee_cash_flow()]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ForeignExchangeTransaction {
    #[serde(flatten)]
    pub trade: TradeDetails,
}

impl CashFlowStrategy for ForeignExchangeTransaction {
    fn cash_flows(&self) -> Vec<TransactionCashFlow> {
        [
            self.trade.value_cash_flow(CashFlowType::Price),
            self.trade.fee_cash_flow(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Transaction {
    Security(SecurityTransaction),
    Derivative(DerivativeTransaction),
    ForeignExchange(ForeignExchangeTransaction),
}

impl Transaction {
    #[must_use]
    pub fn security(trade: TradeDetails, accrued_interest: Option<Decimal>) -> Self {
        Self::Security(SecurityTransaction {
            trade,
            accrued_interest,
        })
    }

    #[must_use]
    pub fn derivative(trade: TradeDetails, value_in_points: Option<Decimal>) -> Self {
        Self::Derivative(DerivativeTransaction {
            trade,
            value_in_points,
        })
    }

    #[must_use]
    pub fn foreign_exchange(trade: TradeDetails) -> Self {
        Self::ForeignExchange(ForeignExchangeTransaction { trade })
    }

    #[must_use]
    pub fn trade(&self) -> &TradeDetails {
        match self {
            Self::Security(transaction) => &transaction.trade,
            Self::Derivative(transaction) => &transaction.trade,
            Self::ForeignExchange(transaction) => &transaction.trade,
        }
    }

    fn strategy(&self) -> &dyn CashFlowStrategy {
        match self {
            Self::Security(transaction) => transaction,
            Self::Derivative(transaction) => transaction,
            Self::ForeignExchange(transaction) => transaction,
        }
    }

    #[must_use]
    pub fn record(&self) -> TransactionRecord {
        let trade = self.trade();
        TransactionRecord {
            id: trade.id,
            trade_id: trade.trade_id.clone(),
            portfolio: trade.portfolio.clone(),
            security: trade.security,
            timestamp: trade.timestamp,
            count: trade.count,
        }
    }

    #[must_use]
    pub fn cash_flows(&self) -> Vec<TransactionCashFlow> {
        self.strategy().cash_flows()
    }
}

impl Reconcile for Transaction {}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::{CashFlowType, TradeDetails, Transaction, TransactionCashFlow};

    fn trade() -> TradeDetails {
        let timestamp = Utc.with_ymd_and_hms(2021, 5, 20, 10, 30, 0).unwrap();
        let mut trade = TradeDetails::new("T-1", "40000", 7, timestamp, 10);
        trade.id = Some(3);
        trade
    }

    fn flow(event_type: CashFlowType, value: Decimal, currency: &str) -> TransactionCashFlow {
        TransactionCashFlow {
            transaction_id: Some(3),
            event_type,
            value,
            currency: Some(currency.to_string()),
        }
    }

    fn kinds(transaction: &Transaction) -> Vec<CashFlowType> {
        transaction
            .cash_flows()
            .into_iter()
            .map(|flow| flow.event_type)
            .collect()
    }

    #[test]
    fn security_trade_emits_price_interest_and_fee() {
        let transaction = Transaction::security(
            trade()
                .with_value(Decimal::from(-1000), "RUB")
                .with_fee(Decimal::new(-15, 1), "RUB"),
            Some(Decimal::from(-12)),
        );
        assert_eq!(
            transaction.cash_flows(),
            vec![
                flow(CashFlowType::Price, Decimal::from(-1000), "RUB"),
                flow(CashFlowType::AccruedInterest, Decimal::from(-12), "RUB"),
                flow(CashFlowType::Fee, Decimal::new(-15, 1), "RUB"),
            ]
        );
    }

    #[test]
    fn negligible_or_currencyless_amounts_are_dropped() {
        let mut details = trade()
            .with_value(Decimal::new(1, 5), "RUB")
            .with_fee(Decimal::new(1, 4), "RUB");
        details.value_currency = None;
        let transaction = Transaction::security(details, Some(Decimal::ZERO));
        assert_eq!(kinds(&transaction), vec![CashFlowType::Fee]);

        let transfer = Transaction::security(trade(), None);
        assert!(transfer.cash_flows().is_empty());
    }

    #[test]
    fn derivative_keeps_zero_quote_and_price() {
        let transaction = Transaction::derivative(
            trade().with_value(Decimal::ZERO, "RUB"),
            Some(Decimal::ZERO),
        );
        let flows = transaction.cash_flows();
        assert_eq!(
            flows,
            vec![
                flow(CashFlowType::DerivativeQuote, Decimal::ZERO, "PNT"),
                flow(CashFlowType::DerivativePrice, Decimal::ZERO, "RUB"),
            ]
        );
    }

    #[test]
    fn derivative_price_without_currency_is_still_emitted() {
        let mut details = trade().with_value(Decimal::from(5), "RUB");
        details.value_currency = None;
        let flows = Transaction::derivative(details, None).cash_flows();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].event_type, CashFlowType::DerivativePrice);
        assert_eq!(flows[0].currency, None);
    }

    #[test]
    fn foreign_exchange_emits_price_and_fee() {
        let transaction = Transaction::foreign_exchange(
            trade()
                .with_value(Decimal::from(7500), "RUB")
                .with_fee(Decimal::from(3), "RUB"),
        );
        assert_eq!(kinds(&transaction), vec![CashFlowType::Price, CashFlowType::Fee]);
    }

    #[test]
    fn record_drops_amounts() {
        let transaction =
            Transaction::foreign_exchange(trade().with_value(Decimal::from(1), "USD"));
        let record = transaction.record();
        assert_eq!(record.id, Some(3));
        assert_eq!(record.trade_id, "T-1");
        assert_eq!(record.portfolio, "40000");
        assert_eq!(record.security, 7);
        assert_eq!(record.count, 10);
    }

    #[test]
    fn equality_ignores_value_scale() {
        let first = Transaction::security(trade().with_value(Decimal::new(100, 0), "RUB"), None);
        let second = Transaction::security(trade().with_value(Decimal::new(10000, 2), "RUB"), None);
        assert_eq!(first, second);
    }
}
