#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};

use broker_report_tables::model::{CashFlowType, EventCashFlow};
use broker_report_tables::{
    ColumnSpec, GridPage, HeaderColumn, MergeConflict, ParseError, Reconcile, TableParser,
    TableRow,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn date(text: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(text, "%d.%m.%Y")
        .expect("fixture date")
        .and_hms_opt(0, 0, 0)
        .expect("midnight")
        .and_utc()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CashHeader {
    Date,
    Operation,
    Amount,
    Currency,
    Comment,
}

impl HeaderColumn for CashHeader {
    fn all() -> &'static [Self] {
        &[
            Self::Date,
            Self::Operation,
            Self::Amount,
            Self::Currency,
            Self::Comment,
        ]
    }

    fn spec(self) -> ColumnSpec {
        match self {
            Self::Date => ColumnSpec::prefix("date"),
            Self::Operation => ColumnSpec::prefix("operation"),
            Self::Amount => ColumnSpec::prefix("amount"),
            Self::Currency => ColumnSpec::prefix("currency").optional(),
            Self::Comment => ColumnSpec::prefix("comment").optional(),
        }
    }
}

/// Deposits and withdrawals of portfolio "1".
pub struct CashFlowParser;

impl TableParser<EventCashFlow> for CashFlowParser {
    type Header = CashHeader;

    fn parse_row(
        &self,
        row: &TableRow<'_, CashHeader>,
    ) -> Result<Option<EventCashFlow>, ParseError> {
        let operation = row.string(CashHeader::Operation)?.to_lowercase();
        let event_type = match operation.as_str() {
            "deposit" | "withdrawal" => CashFlowType::Cash,
            "tax" => CashFlowType::Tax,
            _ => return Ok(None),
        };
        let date = row.string(CashHeader::Date)?;
        let timestamp = NaiveDate::parse_from_str(&date, "%d.%m.%Y")
            .map_err(|error| ParseError::MalformedTable(format!("bad date '{date}': {error}")))?
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| ParseError::MalformedTable(format!("bad date '{date}'")))?;

        let mut cash_flow = EventCashFlow::new(
            "1",
            timestamp,
            event_type,
            row.decimal(CashHeader::Amount)?,
        );
        if let Some(currency) = row.optional_string(CashHeader::Currency)? {
            cash_flow = cash_flow.with_currency(currency);
        }
        if let Some(comment) = row.optional_string(CashHeader::Comment)? {
            cash_flow = cash_flow.with_description(comment);
        }
        Ok(Some(cash_flow))
    }

    fn check_equality(&self, first: &EventCashFlow, second: &EventCashFlow) -> bool {
        first.equals_for_merge(second)
    }

    fn merge_duplicates(
        &self,
        old: EventCashFlow,
        new: EventCashFlow,
    ) -> Result<Vec<EventCashFlow>, MergeConflict> {
        old.merge_duplicates(new)
    }
}

/// Statement with a cash section closed by a total row, a trades section and a
/// nameless positions section.
pub fn statement_page() -> GridPage {
    GridPage::from_strings(&[
        vec!["Broker statement", "", "", ""],
        vec!["Portfolio", "1", "", ""],
        vec![],
        vec!["Cash flows", "", "", ""],
        vec!["Date", "Operation", "Amount", "Currency", "Comment"],
        vec!["01.01.2021", "Deposit", "100.0", "RUB", "from bank"],
        vec!["02.01.2021", "Withdrawal", "-40", "RUB", ""],
        vec!["01.01.2021", "Deposit", "100.00", "RUB", "summary copy"],
        vec!["Total", "", "160", "RUB", ""],
        vec![],
        vec!["Ticker", "Position", "", ""],
        vec!["AAA", "10", "", ""],
        vec!["BBB", "5", "", ""],
    ])
}
