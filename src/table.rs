use std::fmt;
use std::marker::PhantomData;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::error::{ParseError, ReportError};
use crate::extract::{TableParser, extract};
use crate::locator::locate;
use crate::options::TableDefinition;
use crate::reconcile::reconcile;
use crate::report::BrokerReport;

pub trait ReportTable<R>: Send + Sync {
    fn report(&self) -> &BrokerReport;

    fn data(&self) -> Result<&[R], ReportError>;
}

type Producer<R> = dyn Fn(&BrokerReport) -> Result<Vec<R>, ParseError> + Send + Sync;

/// Table computed on first read and cached for every later read.
///
/// Concurrent first readers block until one of them has materialized the records. A
/// failed materialization leaves the table empty and the next read starts over.
pub struct LazyReportTable<R> {
    report: BrokerReport,
    name: String,
    producer: Box<Producer<R>>,
    data: OnceLock<Vec<R>>,
    materializing: Mutex<()>,
}

impl<R: Send + Sync> LazyReportTable<R> {
    pub fn new<F>(report: BrokerReport, name: impl Into<String>, producer: F) -> Self
    where
        F: Fn(&BrokerReport) -> Result<Vec<R>, ParseError> + Send + Sync + 'static,
    {
        Self {
            report,
            name: name.into(),
            producer: Box::new(producer),
            data: OnceLock::new(),
            materializing: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.data.get().is_some()
    }

    fn materialize(&self) -> Result<&[R], ReportError> {
        // a panic inside a previous producer run leaves nothing half-written behind
        let _guard = self
            .materializing
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(data) = self.data.get() {
            return Ok(data);
        }

        let records = (self.producer)(&self.report).map_err(|source| ReportError::Table {
            table: self.name.clone(),
            report: self.report.id().to_string(),
            source,
        })?;
        tracing::debug!(
            table = %self.name,
            report = %self.report,
            records = records.len(),
            "materialized report table"
        );

        Ok(self.data.get_or_init(|| records))
    }
}

impl<R: Send + Sync> ReportTable<R> for LazyReportTable<R> {
    fn report(&self) -> &BrokerReport {
        &self.report
    }

    fn data(&self) -> Result<&[R], ReportError> {
        match self.data.get() {
            Some(data) => Ok(data),
            None => self.materialize(),
        }
    }
}

impl<R> fmt::Debug for LazyReportTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyReportTable")
            .field("report", &self.report)
            .field("name", &self.name)
            .field("materialized", &self.data.get().is_some())
            .finish_non_exhaustive()
    }
}

pub fn build_report_table<R, P>(
    report: BrokerReport,
    definition: TableDefinition<P::Header>,
    parser: P,
) -> LazyReportTable<R>
where
    R: PartialEq + Send + Sync + 'static,
    P: TableParser<R> + 'static,
{
    let name = definition.display_name().to_string();
    LazyReportTable::new(report, name, move |report: &BrokerReport| {
        let page = report.page();
        let mut region = locate(page, &definition)?;
        if definition.has_footer() {
            region = region.exclude_total_row();
        }
        let records = extract(page, &region, &parser)?;
        reconcile(
            records,
            |first, second| parser.check_equality(first, second),
            |old, new| parser.merge_duplicates(old, new),
        )
    })
}

pub struct EmptyReportTable<R> {
    report: BrokerReport,
    rows: PhantomData<fn() -> R>,
}

impl<R> EmptyReportTable<R> {
    #[must_use]
    pub fn new(report: BrokerReport) -> Self {
        Self {
            report,
            rows: PhantomData,
        }
    }
}

impl<R> ReportTable<R> for EmptyReportTable<R> {
    fn report(&self) -> &BrokerReport {
        &self.report
    }

    fn data(&self) -> Result<&[R], ReportError> {
        Ok(&[])
    }
}
