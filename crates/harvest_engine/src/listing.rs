use harvest_core::RawListingRow;
use scraper::{ElementRef, Html, Selector};

use crate::attachment::normalize_attachment_url;

/// Prioritized list of CSS selectors used to locate the results table.
///
/// The portal's table class drifts between pages (`type_1`, `type_5`,
/// `type_6` have all been observed), so candidates are tried in order and
/// the first structural match wins. Keep this configurable; the markup
/// will drift again.
#[derive(Debug, Clone)]
pub struct TableSelectors(Vec<String>);

impl Default for TableSelectors {
    fn default() -> Self {
        Self(vec![
            "table.type_1".to_string(),
            "table.type_5".to_string(),
            "table.type_6".to_string(),
        ])
    }
}

impl TableSelectors {
    /// Builds a candidate list. An empty input falls back to the default
    /// portal selectors.
    pub fn new(selectors: Vec<String>) -> Self {
        if selectors.is_empty() {
            return Self::default();
        }
        Self(selectors)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Parses one listing page into raw rows.
///
/// An empty result means "no recognizable table" or "no data rows"; the
/// caller reads both as end of data, not as an error. The header row and
/// spacer rows with fewer than six cells are skipped.
pub fn parse_listing(html: &str, selectors: &TableSelectors) -> Vec<RawListingRow> {
    let document = Html::parse_document(html);
    let Some(table) = find_table(&document, selectors) else {
        return Vec::new();
    };

    let (Ok(row_selector), Ok(cell_selector), Ok(link_selector)) = (
        Selector::parse("tr"),
        Selector::parse("td"),
        Selector::parse("a"),
    ) else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for row in table.select(&row_selector).skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < 6 {
            continue;
        }

        let attachment_url = cells[3]
            .select(&link_selector)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .map(|href| normalize_attachment_url(href.trim()))
            .filter(|href| !href.is_empty());

        rows.push(RawListingRow {
            stock_name: cell_text(&cells[0]),
            title: cell_text(&cells[1]),
            company: cell_text(&cells[2]),
            attachment_url,
            date_text: cell_text(&cells[4]),
            views_text: cell_text(&cells[5]),
        });
    }
    rows
}

fn find_table<'a>(document: &'a Html, selectors: &TableSelectors) -> Option<ElementRef<'a>> {
    for candidate in selectors.as_slice() {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        if let Some(table) = document.select(&selector).next() {
            return Some(table);
        }
    }
    None
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
