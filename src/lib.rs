mod error;
mod extract;
mod header;
mod locator;
mod matcher;
pub mod model;
mod options;
mod page;
mod reconcile;
mod report;
mod table;
mod wrapping;

pub use error::{MergeConflict, ParseError, ReportError};
pub use extract::{TableParser, TableRow, extract};
pub use header::{ColumnIndex, ColumnSpec, HeaderColumn, NoColumns};
pub use locator::{TableRegion, locate};
pub use matcher::CellMatcher;
pub use options::{LocateMode, TableDefinition};
pub use page::{CellValue, GridPage, ReportPage};
pub use reconcile::{Reconcile, reconcile, reconcile_records};
pub use report::{BrokerReport, ReportTables};
pub use table::{EmptyReportTable, LazyReportTable, ReportTable, build_report_table};
pub use wrapping::WrappingReportTable;
