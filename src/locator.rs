use std::ops::Range;

use crate::error::ParseError;
use crate::header::{ColumnIndex, HeaderColumn};
use crate::options::{LocateMode, TableDefinition};
use crate::page::{CellValue, ReportPage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegion<H: HeaderColumn> {
    title_row: Option<usize>,
    header_rows: Range<usize>,
    data_rows: Range<usize>,
    footer_row: Option<usize>,
    columns: ColumnIndex<H>,
}

impl<H: HeaderColumn> TableRegion<H> {
    #[must_use]
    pub fn title_row(&self) -> Option<usize> {
        self.title_row
    }

    #[must_use]
    pub fn header_rows(&self) -> Range<usize> {
        self.header_rows.clone()
    }

    #[must_use]
    pub fn data_rows(&self) -> Range<usize> {
        self.data_rows.clone()
    }

    #[must_use]
    pub fn footer_row(&self) -> Option<usize> {
        self.footer_row
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnIndex<H> {
        &self.columns
    }

    /// Drops the trailing totals row, if the region ends with the matched footer.
    #[must_use]
    pub fn exclude_total_row(mut self) -> Self {
        let ends_with_footer = self
            .footer_row
            .is_some_and(|footer| self.data_rows.end == footer + 1);
        if ends_with_footer {
            self.data_rows.end -= 1;
        }
        self
    }
}

pub fn locate<H: HeaderColumn>(
    page: &dyn ReportPage,
    definition: &TableDefinition<H>,
) -> Result<TableRegion<H>, ParseError> {
    let anchor = &definition.anchor;
    let anchor_row = page
        .find_row(0, &|cell| anchor.matches(cell))
        .ok_or_else(|| ParseError::TableNotFound {
            anchor: anchor.to_string(),
        })?;

    let (title_row, header_start) = match definition.mode {
        LocateMode::Named => (Some(anchor_row), anchor_row + 1),
        LocateMode::Nameless => (None, anchor_row),
    };
    let data_start = header_start + definition.header_rows;
    if data_start > page.row_count() {
        return Err(ParseError::MalformedTable(format!(
            "table at row {anchor_row} needs {} header rows but the page ends at row {}",
            definition.header_rows,
            page.row_count()
        )));
    }

    let header_cells = (header_start..data_start)
        .map(|index| page.row(index).unwrap_or(&[]))
        .collect::<Vec<&[CellValue]>>();
    let columns = ColumnIndex::resolve(&header_cells)?;

    let mut footer_row = None;
    if let Some(footer) = &definition.footer {
        footer_row = page.find_row(data_start, &|cell| footer.matches(cell));
        if footer_row.is_none() {
            tracing::warn!(
                table = definition.display_name(),
                footer = %footer,
                "table footer not found; table ends at the first empty row"
            );
        }
    }

    let data_end = match footer_row {
        Some(footer) => footer + 1,
        None => page
            .find_empty_row(data_start)
            .unwrap_or_else(|| page.row_count()),
    };

    tracing::debug!(
        table = definition.display_name(),
        ?title_row,
        data_start,
        data_end,
        ?footer_row,
        "located table"
    );

    Ok(TableRegion {
        title_row,
        header_rows: header_start..data_start,
        data_rows: data_start..data_end,
        footer_row,
        columns,
    })
}
