use std::fmt;
use std::sync::Arc;

use crate::model::{
    EventCashFlow, PortfolioCash, PortfolioProperty, Security, SecurityEventCashFlow,
    SecurityQuote, Transaction,
};
use crate::page::ReportPage;
use crate::table::ReportTable;

/// Handle to one parsed broker report.
///
/// Clones share identity: tables built from clones of the same handle belong to the same
/// report, while two handles created separately never do, even for equal ids.
#[derive(Clone)]
pub struct BrokerReport {
    inner: Arc<ReportInner>,
}

struct ReportInner {
    id: String,
    page: Arc<dyn ReportPage>,
}

impl BrokerReport {
    pub fn new(id: impl Into<String>, page: impl ReportPage + 'static) -> Self {
        Self::from_shared(id, Arc::new(page))
    }

    pub fn from_shared(id: impl Into<String>, page: Arc<dyn ReportPage>) -> Self {
        Self {
            inner: Arc::new(ReportInner {
                id: id.into(),
                page,
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    #[must_use]
    pub fn page(&self) -> &dyn ReportPage {
        self.inner.page.as_ref()
    }

    #[must_use]
    pub fn same_report(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for BrokerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerReport")
            .field("id", &self.inner.id)
            .field("rows", &self.inner.page.row_count())
            .finish()
    }
}

impl fmt::Display for BrokerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.id)
    }
}

pub trait ReportTables: Send + Sync {
    fn report(&self) -> &BrokerReport;

    fn portfolio_property_table(&self) -> &dyn ReportTable<PortfolioProperty>;

    fn cash_table(&self) -> &dyn ReportTable<PortfolioCash>;

    fn cash_flow_table(&self) -> &dyn ReportTable<EventCashFlow>;

    fn securities_table(&self) -> &dyn ReportTable<Security>;

    fn security_transaction_table(&self) -> &dyn ReportTable<Transaction>;

    fn derivative_transaction_table(&self) -> &dyn ReportTable<Transaction>;

    fn foreign_exchange_transaction_table(&self) -> &dyn ReportTable<Transaction>;

    fn coupon_amortization_redemption_table(&self) -> &dyn ReportTable<SecurityEventCashFlow>;

    fn dividend_table(&self) -> &dyn ReportTable<SecurityEventCashFlow>;

    fn derivative_cash_flow_table(&self) -> &dyn ReportTable<SecurityEventCashFlow>;

    fn security_quote_table(&self) -> &dyn ReportTable<SecurityQuote>;
}
