use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{MergeConflict, ParseError};
use crate::header::{ColumnIndex, HeaderColumn};
use crate::locator::TableRegion;
use crate::page::{CellValue, ReportPage};

#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a, H: HeaderColumn> {
    index: usize,
    cells: &'a [CellValue],
    columns: &'a ColumnIndex<H>,
}

impl<'a, H: HeaderColumn> TableRow<'a, H> {
    #[must_use]
    pub fn new(index: usize, cells: &'a [CellValue], columns: &'a ColumnIndex<H>) -> Self {
        Self {
            index,
            cells,
            columns,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }

    #[must_use]
    pub fn cell(&self, column: H) -> Option<&'a CellValue> {
        self.columns
            .position(column)
            .and_then(|position| self.cells.get(position))
    }

    #[must_use]
    pub fn text(&self, column: H) -> Option<&'a str> {
        self.cell(column)
            .and_then(CellValue::as_text)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn string(&self, column: H) -> Result<String, ParseError> {
        self.optional_string(column)?
            .ok_or_else(|| self.cell_error(column, "value is missing"))
    }

    pub fn optional_string(&self, column: H) -> Result<Option<String>, ParseError> {
        Ok(match self.cell(column) {
            None | Some(CellValue::Empty) => None,
            Some(CellValue::Text(text)) => {
                Some(text.trim().to_string()).filter(|text| !text.is_empty())
            }
            Some(other) => Some(other.to_string()),
        })
    }

    pub fn decimal(&self, column: H) -> Result<Decimal, ParseError> {
        self.optional_decimal(column)?
            .ok_or_else(|| self.cell_error(column, "number is missing"))
    }

    pub fn optional_decimal(&self, column: H) -> Result<Option<Decimal>, ParseError> {
        match self.cell(column) {
            None | Some(CellValue::Empty) => Ok(None),
            Some(CellValue::Number(value)) => Decimal::try_from(*value)
                .map(Some)
                .map_err(|error| self.cell_error(column, &error.to_string())),
            Some(CellValue::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                Decimal::from_str(text)
                    .or_else(|_| Decimal::from_scientific(text))
                    .map(Some)
                    .map_err(|_| self.cell_error(column, &format!("'{text}' is not a number")))
            }
            Some(CellValue::Bool(_)) => Err(self.cell_error(column, "expected a number")),
        }
    }

    pub fn int(&self, column: H) -> Result<i64, ParseError> {
        self.optional_int(column)?
            .ok_or_else(|| self.cell_error(column, "integer is missing"))
    }

    pub fn optional_int(&self, column: H) -> Result<Option<i64>, ParseError> {
        let Some(value) = self.optional_decimal(column)? else {
            return Ok(None);
        };
        if !value.fract().is_zero() {
            return Err(self.cell_error(column, &format!("{value} is not an integer")));
        }
        i64::try_from(value)
            .map(Some)
            .map_err(|error| self.cell_error(column, &error.to_string()))
    }

    fn cell_error(&self, column: H, message: &str) -> ParseError {
        ParseError::Cell {
            row: self.index,
            column: format!("{column:?}"),
            message: message.to_string(),
        }
    }
}

pub trait TableParser<R: PartialEq>: Send + Sync {
    type Header: HeaderColumn;

    fn parse_row(&self, row: &TableRow<'_, Self::Header>) -> Result<Option<R>, ParseError> {
        let _ = row;
        Ok(None)
    }

    fn parse_row_to_vec(&self, row: &TableRow<'_, Self::Header>) -> Result<Vec<R>, ParseError> {
        Ok(self.parse_row(row)?.into_iter().collect())
    }

    fn check_equality(&self, first: &R, second: &R) -> bool {
        first == second
    }

    fn merge_duplicates(&self, old: R, new: R) -> Result<Vec<R>, MergeConflict> {
        Ok(vec![old, new])
    }
}

/// Runs `parser` over the data rows of `region`, flattening per-row output in order.
/// Fully empty rows are skipped.
pub fn extract<R, P>(
    page: &dyn ReportPage,
    region: &TableRegion<P::Header>,
    parser: &P,
) -> Result<Vec<R>, ParseError>
where
    R: PartialEq,
    P: TableParser<R> + ?Sized,
{
    let mut records = Vec::new();
    for index in region.data_rows() {
        let Some(cells) = page.row(index) else {
            break;
        };
        if page.is_empty_row(index) {
            tracing::trace!(row = index, "skipping empty row");
            continue;
        }

        let row = TableRow::new(index, cells, region.columns());
        let parsed = parser
            .parse_row_to_vec(&row)
            .map_err(|error| error.at_row(index))?;
        records.extend(parsed);
    }

    Ok(records)
}
