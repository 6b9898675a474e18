use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::error::ReportError;
use crate::report::BrokerReport;
use crate::table::ReportTable;

/// Several tables or record collections of one report, read as one table.
///
/// Records are concatenated in argument order. Overlap between the sources is not
/// reconciled.
pub struct WrappingReportTable<R> {
    inner: Wrapped<R>,
}

enum Wrapped<R> {
    Eager {
        report: BrokerReport,
        data: Vec<R>,
    },
    Lazy {
        report: BrokerReport,
        sources: Mutex<Option<Vec<Arc<dyn ReportTable<R>>>>>,
        data: OnceLock<Vec<R>>,
    },
}

impl<R: Clone + Send + Sync> WrappingReportTable<R> {
    #[must_use]
    pub fn of_data<I, D>(report: BrokerReport, datasets: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = R>,
    {
        let data = datasets.into_iter().flatten().collect();
        Self {
            inner: Wrapped::Eager { report, data },
        }
    }

    pub fn of_tables(tables: Vec<Arc<dyn ReportTable<R>>>) -> Result<Self, ReportError> {
        let Some(first) = tables.first() else {
            return Err(ReportError::InvalidArgument(
                "can't wrap, report tables not provided".to_string(),
            ));
        };
        let report = first.report().clone();
        if !tables
            .iter()
            .all(|table| table.report().same_report(&report))
        {
            return Err(ReportError::InvalidArgument(
                "wrapped report tables should be built for the same broker report".to_string(),
            ));
        }

        Ok(Self {
            inner: Wrapped::Lazy {
                report,
                sources: Mutex::new(Some(tables)),
                data: OnceLock::new(),
            },
        })
    }

    #[must_use]
    pub fn holds_sources(&self) -> bool {
        match &self.inner {
            Wrapped::Eager { .. } => false,
            Wrapped::Lazy { sources, .. } => sources
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some(),
        }
    }
}

fn concatenate<'a, R: Clone + Send + Sync>(
    sources: &Mutex<Option<Vec<Arc<dyn ReportTable<R>>>>>,
    data: &'a OnceLock<Vec<R>>,
) -> Result<&'a [R], ReportError> {
    let mut guard = sources.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(data) = data.get() {
        return Ok(data);
    }
    let Some(tables) = guard.as_ref() else {
        return Ok(&[]);
    };

    let mut records = Vec::new();
    for table in tables {
        records.extend_from_slice(table.data()?);
    }
    tracing::debug!(
        tables = tables.len(),
        records = records.len(),
        "concatenated wrapped report tables"
    );

    let data = data.get_or_init(|| records);
    *guard = None;
    Ok(data)
}

impl<R: Clone + Send + Sync> ReportTable<R> for WrappingReportTable<R> {
    fn report(&self) -> &BrokerReport {
        match &self.inner {
            Wrapped::Eager { report, .. } | Wrapped::Lazy { report, .. } => report,
        }
    }

    fn data(&self) -> Result<&[R], ReportError> {
        match &self.inner {
            Wrapped::Eager { data, .. } => Ok(data),
            Wrapped::Lazy { sources, data, .. } => match data.get() {
                Some(data) => Ok(data),
                None => concatenate(sources, data),
            },
        }
    }
}
