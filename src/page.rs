use std::fmt;
use std::io::Read;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::error::ReportError;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

pub trait ReportPage: Send + Sync {
    fn row_count(&self) -> usize;

    fn row(&self, index: usize) -> Option<&[CellValue]>;

    fn find_row(&self, from: usize, predicate: &dyn Fn(&CellValue) -> bool) -> Option<usize> {
        (from..self.row_count()).find(|&index| {
            self.row(index)
                .is_some_and(|cells| cells.iter().any(predicate))
        })
    }

    fn find_empty_row(&self, from: usize) -> Option<usize> {
        (from..self.row_count()).find(|&index| self.is_empty_row(index))
    }

    fn is_empty_row(&self, index: usize) -> bool {
        self.row(index)
            .is_none_or(|cells| cells.iter().all(CellValue::is_empty))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridPage {
    rows: Vec<Vec<CellValue>>,
}

impl GridPage {
    #[must_use]
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn from_strings<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| CellValue::text(cell.as_ref())).collect())
                .collect(),
        )
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines().map(text_row).collect())
    }

    pub fn from_csv_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, ReportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(CellValue::text).collect());
        }

        Ok(Self::new(rows))
    }

    /// Decodes `bytes` with the WHATWG encoding `label` (UTF-8 when `None`) before parsing
    /// them as CSV. A byte order mark overrides the label.
    pub fn from_csv_bytes(
        bytes: &[u8],
        encoding_label: Option<&str>,
        delimiter: u8,
    ) -> Result<Self, ReportError> {
        let encoding = match encoding_label {
            Some(label) => Encoding::for_label(label.trim().as_bytes())
                .ok_or_else(|| ReportError::Page(format!("unknown encoding '{label}'")))?,
            None => UTF_8,
        };

        let (text, actual, had_errors) = encoding.decode(bytes);
        if had_errors {
            tracing::warn!(
                encoding = actual.name(),
                "report bytes contain malformed sequences; replaced with U+FFFD"
            );
        }

        Self::from_csv_reader(text.as_bytes(), delimiter)
    }

    pub fn from_csv_path(
        path: &Path,
        encoding_label: Option<&str>,
        delimiter: u8,
    ) -> Result<Self, ReportError> {
        let bytes = std::fs::read(path)?;
        Self::from_csv_bytes(&bytes, encoding_label, delimiter)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }
}

impl ReportPage for GridPage {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}

// tabs always separate cells, spaces only in runs of two or more
fn text_row(line: &str) -> Vec<CellValue> {
    line.split('\t')
        .flat_map(aligned_cells)
        .map(CellValue::text)
        .collect()
}

fn aligned_cells(segment: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut cell_start = 0;
    let mut gap: Option<(usize, usize)> = None;

    for (offset, ch) in segment.char_indices() {
        if ch.is_whitespace() {
            let (gap_start, run) = gap.unwrap_or((offset, 0));
            gap = Some((gap_start, run + 1));
        } else if let Some((gap_start, _)) = gap.take().filter(|&(_, run)| run >= 2) {
            cells.push(&segment[cell_start..gap_start]);
            cell_start = offset;
        }
    }
    cells.push(&segment[cell_start..]);

    cells
        .into_iter()
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}
