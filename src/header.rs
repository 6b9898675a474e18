use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ParseError;
use crate::matcher::CellMatcher;
use crate::page::CellValue;

pub trait HeaderColumn: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    fn all() -> &'static [Self];

    fn spec(self) -> ColumnSpec;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoColumns {}

impl HeaderColumn for NoColumns {
    fn all() -> &'static [Self] {
        &[]
    }

    fn spec(self) -> ColumnSpec {
        match self {}
    }
}

#[derive(Debug, Clone)]
enum ColumnLocator {
    Matcher(CellMatcher),
    Words(Vec<String>),
    Index(usize),
}

#[derive(Debug, Clone)]
pub struct ColumnSpec {
    locator: ColumnLocator,
    optional: bool,
}

impl ColumnSpec {
    #[must_use]
    pub fn prefix(prefix: &str) -> Self {
        Self::matcher(CellMatcher::prefix(prefix))
    }

    #[must_use]
    pub fn matcher(matcher: CellMatcher) -> Self {
        Self {
            locator: ColumnLocator::Matcher(matcher),
            optional: false,
        }
    }

    #[must_use]
    pub fn words(words: &[&str]) -> Self {
        Self {
            locator: ColumnLocator::Words(
                words.iter().map(|word| word.trim().to_lowercase()).collect(),
            ),
            optional: false,
        }
    }

    #[must_use]
    pub fn index(index: usize) -> Self {
        Self {
            locator: ColumnLocator::Index(index),
            optional: false,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn find(&self, header_rows: &[&[CellValue]], width: usize) -> Option<usize> {
        match &self.locator {
            ColumnLocator::Index(index) => Some(*index),
            ColumnLocator::Matcher(matcher) => (0..width).find(|&column| {
                header_rows
                    .iter()
                    .any(|row| row.get(column).is_some_and(|cell| matcher.matches(cell)))
            }),
            ColumnLocator::Words(words) => (0..width).find(|&column| {
                let joined = column_header_text(header_rows, column);
                !joined.is_empty() && words.iter().all(|word| joined.contains(word.as_str()))
            }),
        }
    }
}

fn column_header_text(header_rows: &[&[CellValue]], column: usize) -> String {
    header_rows
        .iter()
        .filter_map(|row| row.get(column).and_then(CellValue::as_text))
        .map(|text| text.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex<H: HeaderColumn> {
    positions: HashMap<H, usize>,
}

impl<H: HeaderColumn> ColumnIndex<H> {
    pub(crate) fn resolve(header_rows: &[&[CellValue]]) -> Result<Self, ParseError> {
        let width = header_rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut positions = HashMap::new();

        for &column in H::all() {
            let spec = column.spec();
            match spec.find(header_rows, width) {
                Some(position) => {
                    positions.insert(column, position);
                }
                None if spec.optional => {
                    tracing::trace!(column = ?column, "optional header column is absent");
                }
                None => {
                    return Err(ParseError::MalformedTable(format!(
                        "header column {column:?} ({:?}) not found",
                        spec.locator
                    )));
                }
            }
        }

        Ok(Self { positions })
    }

    #[must_use]
    pub fn position(&self, column: H) -> Option<usize> {
        self.positions.get(&column).copied()
    }
}
