use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("can't merge duplicates: {reason}")]
pub struct MergeConflict {
    pub reason: String,
}

impl MergeConflict {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("table anchor {anchor} not found on page")]
    TableNotFound { anchor: String },

    #[error("malformed table: {0}")]
    MalformedTable(String),

    #[error("invalid value in row {row}, column '{column}': {message}")]
    Cell {
        row: usize,
        column: String,
        message: String,
    },

    #[error("can't parse row {row}")]
    Row {
        row: usize,
        #[source]
        source: Box<ParseError>,
    },

    #[error(transparent)]
    MergeConflict(#[from] MergeConflict),
}

impl ParseError {
    pub(crate) fn at_row(self, row: usize) -> Self {
        match self {
            // cell errors already carry their row
            Self::Cell { .. } | Self::Row { .. } => self,
            other => Self::Row {
                row,
                source: Box::new(other),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("can't parse table '{table}' in report {report}")]
    Table {
        table: String,
        report: String,
        #[source]
        source: ParseError,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("can't read report page: {0}")]
    Page(String),
}

impl ReportError {
    #[must_use]
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Table { source, .. } => Some(source),
            Self::InvalidArgument(_) | Self::Page(_) => None,
        }
    }
}

impl From<csv::Error> for ReportError {
    fn from(error: csv::Error) -> Self {
        Self::Page(error.to_string())
    }
}

impl From<std::io::Error> for ReportError {
    fn from(error: std::io::Error) -> Self {
        Self::Page(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{MergeConflict, ParseError, ReportError};

    #[test]
    fn table_error_names_table_and_report() {
        let error = ReportError::Table {
            table: "Transactions".to_string(),
            report: "broker-2024.csv".to_string(),
            source: ParseError::TableNotFound {
                anchor: "prefix 'transactions'".to_string(),
            },
        };

        let message = error.to_string();
        assert!(message.contains("'Transactions'"));
        assert!(message.contains("broker-2024.csv"));
        assert!(matches!(
            error.parse_error(),
            Some(ParseError::TableNotFound { .. })
        ));
    }

    #[test]
    fn row_context_wraps_once() {
        let error = ParseError::from(MergeConflict::new("currency differs")).at_row(4);
        let ParseError::Row { row, source } = error.at_row(9) else {
            panic!("expected row error");
        };
        assert_eq!(row, 4);
        assert!(matches!(*source, ParseError::MergeConflict(_)));
    }
}
