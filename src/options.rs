use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::error::ReportError;
use crate::header::HeaderColumn;
use crate::matcher::CellMatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateMode {
    Named,
    Nameless,
}

impl FromStr for LocateMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "named" => Ok(Self::Named),
            "nameless" => Ok(Self::Nameless),
            other => Err(format!("unknown locate mode '{other}'")),
        }
    }
}

pub struct TableDefinition<H: HeaderColumn> {
    pub(crate) anchor: CellMatcher,
    pub(crate) footer: Option<CellMatcher>,
    pub(crate) header_rows: usize,
    pub(crate) mode: LocateMode,
    pub(crate) name: Option<String>,
    header: PhantomData<fn() -> H>,
}

impl<H: HeaderColumn> TableDefinition<H> {
    pub fn named(name: &str) -> Result<Self, ReportError> {
        let mut definition = Self::named_by(CellMatcher::prefix(name))?;
        definition.name = Some(name.trim().to_string());
        Ok(definition)
    }

    pub fn named_by(anchor: CellMatcher) -> Result<Self, ReportError> {
        Self::build(anchor, LocateMode::Named, None)
    }

    pub fn nameless(display_name: &str, first_line: &str) -> Result<Self, ReportError> {
        Self::nameless_by(display_name, CellMatcher::prefix(first_line))
    }

    pub fn nameless_by(display_name: &str, first_line: CellMatcher) -> Result<Self, ReportError> {
        Self::build(
            first_line,
            LocateMode::Nameless,
            Some(display_name.trim().to_string()),
        )
    }

    fn build(
        anchor: CellMatcher,
        mode: LocateMode,
        name: Option<String>,
    ) -> Result<Self, ReportError> {
        if anchor.is_blank_literal() {
            return Err(ReportError::InvalidArgument(
                "table anchor must not be empty".to_string(),
            ));
        }

        Ok(Self {
            anchor,
            footer: None,
            header_rows: 1,
            mode,
            name,
            header: PhantomData,
        })
    }

    /// The table ends before a row starting with `footer`. An empty footer keeps the
    /// empty-row rule.
    #[must_use]
    pub fn footer(self, footer: &str) -> Self {
        if footer.trim().is_empty() {
            return self;
        }
        self.footer_by(CellMatcher::prefix(footer))
    }

    #[must_use]
    pub fn footer_by(mut self, footer: CellMatcher) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn header_rows(mut self, count: usize) -> Result<Self, ReportError> {
        if count == 0 {
            return Err(ReportError::InvalidArgument(
                "a table needs at least one header row".to_string(),
            ));
        }
        self.header_rows = count;
        Ok(self)
    }

    #[must_use]
    pub fn mode(&self) -> LocateMode {
        self.mode
    }

    #[must_use]
    pub fn has_footer(&self) -> bool {
        self.footer.is_some()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

impl<H: HeaderColumn> Clone for TableDefinition<H> {
    fn clone(&self) -> Self {
        Self {
            anchor: self.anchor.clone(),
            footer: self.footer.clone(),
            header_rows: self.header_rows,
            mode: self.mode,
            name: self.name.clone(),
            header: PhantomData,
        }
    }
}

impl<H: HeaderColumn> fmt::Debug for TableDefinition<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDefinition")
            .field("anchor", &self.anchor)
            .field("footer", &self.footer)
            .field("header_rows", &self.header_rows)
            .field("mode", &self.mode)
            .field("name", &self.name)
            .finish()
    }
}
