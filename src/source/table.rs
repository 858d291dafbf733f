//! HTML table extraction
//!
//! Both upstream pages publish their data as the first `<table>` of the
//! document. This module locates it and flattens it into rows of text cells;
//! interpreting the cells is left to the adapters.

use scraper::{ElementRef, Html, Selector};

/// One `<tr>` of the data table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Text of the first `<th>` cell, if the row has one
    pub header: Option<String>,

    /// Text of every `<td>` cell, in document order
    pub cells: Vec<String>,
}

/// Which rows of the table to yield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSection {
    /// Only rows inside `<tbody>` (skips header rows in `<thead>`)
    Body,
    /// Every row of the table
    All,
}

/// Extracts the rows of the first table in the document
///
/// Returns `None` when the document has no `<table>` at all. The HTML parser
/// inserts an implicit `<tbody>` around bare rows, so `TableSection::Body`
/// also works on tables written without one.
///
/// # Example
///
/// ```
/// use indicadores::source::{first_table_rows, TableSection};
///
/// let html = "<table><tr><th>Rosario</th><td>PARANA</td><td>3,10</td></tr></table>";
/// let rows = first_table_rows(html, TableSection::Body).unwrap();
/// assert_eq!(rows[0].header.as_deref(), Some("Rosario"));
/// assert_eq!(rows[0].cells, vec!["PARANA", "3,10"]);
/// ```
pub fn first_table_rows(html: &str, section: TableSection) -> Option<Vec<TableRow>> {
    let document = Html::parse_document(html);

    let table_selector = Selector::parse("table").ok()?;
    let row_selector = match section {
        TableSection::Body => Selector::parse("tbody > tr").ok()?,
        TableSection::All => Selector::parse("tr").ok()?,
    };
    let header_selector = Selector::parse("th").ok()?;
    let cell_selector = Selector::parse("td").ok()?;

    let table = document.select(&table_selector).next()?;

    let rows = table
        .select(&row_selector)
        .map(|row| TableRow {
            header: row.select(&header_selector).next().map(cell_text),
            cells: row.select(&cell_selector).map(cell_text).collect(),
        })
        .collect();

    Some(rows)
}

/// Concatenates the text pieces of a cell, trimming each one
fn cell_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}
