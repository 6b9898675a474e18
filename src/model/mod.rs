mod cash_flow;
mod portfolio;
mod quote;
mod security;
mod transaction;

pub use cash_flow::{CashFlowType, EventCashFlow, SecurityEventCashFlow};
pub use portfolio::{
    CashBalance, PortfolioCash, PortfolioProperty, deserialize_balances, serialize_balances,
};
pub use quote::{ForeignExchangeRate, SecurityQuote};
pub use security::{Security, SecurityType};
pub use transaction::{
    CashFlowStrategy, DERIVATIVE_QUOTE_CURRENCY, DerivativeTransaction,
    ForeignExchangeTransaction, SecurityTransaction, TradeDetails, Transaction,
    TransactionCashFlow, TransactionRecord,
};
