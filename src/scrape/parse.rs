//! Structural parsing of a rendered listing page into test records.
//!
//! The listing is an unordered list styled as a table. Each row carries one
//! anchor to the report document plus a run of class-less `span` cells whose
//! order matches the output schema. Cells are mapped positionally; this is
//! the documented contract since the markup has no stable per-field
//! attribute, and it is covered by the tests below.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::portal;
use crate::record::TestRecord;

/// Errors parsing a listing page snapshot.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The listing table is absent from the snapshot.
    #[error("listing table not found in page snapshot")]
    TableNotFound,

    /// A listing row carries no document-link anchor.
    #[error("listing row has no document link anchor")]
    DocumentLinkMissing,

    /// A listing row has too few cells to hold the document link.
    #[error("listing row has {found} cells, need at least 3 to place the document link")]
    RowTooNarrow {
        /// Number of cells found in the row.
        found: usize,
    },

    /// A selector literal failed to parse.
    #[error("invalid selector `{css}`: {message}")]
    Selector {
        /// The selector literal.
        css: &'static str,
        /// Parser message.
        message: String,
    },
}

fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|error| ParseError::Selector {
        css,
        message: error.to_string(),
    })
}

/// Parses one listing page snapshot into records, in row order.
///
/// Per row: the anchor whose href contains the document-link marker yields
/// the document URL (absolutized against the site origin); the class-less
/// span cells are collected positionally with the third cell replaced by the
/// absolute link; the result is zipped onto the 8-column schema.
///
/// # Errors
///
/// Returns [`ParseError::TableNotFound`] when the snapshot has no listing
/// table, [`ParseError::DocumentLinkMissing`] for a row without a report
/// anchor, and [`ParseError::RowTooNarrow`] for a row with fewer than three
/// cells.
pub fn parse_listing(html: &str) -> Result<Vec<TestRecord>, ParseError> {
    let table_selector = selector(portal::LISTING_TABLE)?;
    let row_selector = selector(portal::LISTING_ROW)?;
    let anchor_selector = selector("a")?;
    let span_selector = selector("span")?;

    let document = Html::parse_document(html);
    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ParseError::TableNotFound)?;

    let mut records = Vec::new();
    for row in table.select(&row_selector) {
        let href = row
            .select(&anchor_selector)
            .find_map(|anchor| {
                anchor
                    .value()
                    .attr("href")
                    .filter(|href| href.contains(portal::DOCUMENT_LINK_MARKER))
            })
            .ok_or(ParseError::DocumentLinkMissing)?;
        let document_link = format!("{}{href}", portal::SITE_ORIGIN);

        let mut cells: Vec<String> = row
            .select(&span_selector)
            .filter(|span| span.value().attr("class").is_none())
            .map(cell_text)
            .collect();
        let Some(link_cell) = cells.get_mut(2) else {
            return Err(ParseError::RowTooNarrow { found: cells.len() });
        };
        *link_cell = document_link;

        records.push(TestRecord::from_cells(&cells));
    }

    Ok(records)
}

fn cell_text(span: ElementRef<'_>) -> String {
    span.text().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn listing_row(description: &str, report_id: u32) -> String {
        format!(
            r#"<li class="tableContentInfo">
  <span class="cabeceraFila">Descripción</span>
  <span>{description}</span>
  <span>12/05/2024</span>
  <span><a href="/es/resultados/informePDF?id={report_id}">Ver informe</a></span>
  <span>Hospital Central</span>
  <span>Cardiología</span>
  <span>Consulta</span>
  <span>Electrocardiograma</span>
  <span>Dra. García</span>
</li>"#
        )
    }

    fn listing_page(rows: &[String]) -> String {
        format!(
            r#"<html><body>
<div class="pei-listado-pruebas-contenedor">
  <ul class="tableContent">{}</ul>
  <a class="siguiente activePaso">Siguiente</a>
</div>
</body></html>"#,
            rows.join("\n")
        )
    }

    #[test]
    fn test_one_record_per_row_with_fields_in_schema_order() {
        let html = listing_page(&[listing_row("Blood panel", 1), listing_row("X-ray", 2)]);
        let records = parse_listing(&html).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "Blood panel");
        assert_eq!(records[0].date, "12/05/2024");
        assert_eq!(records[0].hospital, "Hospital Central");
        assert_eq!(records[0].specialty, "Cardiología");
        assert_eq!(records[0].kind, "Consulta");
        assert_eq!(records[0].test, "Electrocardiograma");
        assert_eq!(records[0].doctor, "Dra. García");
        assert_eq!(records[1].description, "X-ray");
    }

    #[test]
    fn test_document_link_is_absolutized_against_site_origin() {
        let html = listing_page(&[listing_row("Blood panel", 7)]);
        let records = parse_listing(&html).unwrap();
        assert_eq!(
            records[0].document_link,
            "https://www.quironsalud.com/es/resultados/informePDF?id=7"
        );
    }

    #[test]
    fn test_classed_spans_are_not_cells() {
        // The row contains a labelled header span; it must not shift the
        // positional mapping.
        let html = listing_page(&[listing_row("Blood panel", 1)]);
        let records = parse_listing(&html).unwrap();
        assert_eq!(records[0].description, "Blood panel");
        assert_ne!(records[0].description, "Descripción");
    }

    #[test]
    fn test_missing_table_is_error() {
        let html = "<html><body><p>Sesión caducada</p></body></html>";
        assert!(matches!(
            parse_listing(html),
            Err(ParseError::TableNotFound)
        ));
    }

    #[test]
    fn test_row_without_document_anchor_is_error() {
        let html = listing_page(&[r#"<li class="tableContentInfo">
  <span>desc</span><span>date</span><span>link</span>
  <a href="/otros/enlace">Otro</a>
</li>"#
            .to_string()]);
        assert!(matches!(
            parse_listing(&html),
            Err(ParseError::DocumentLinkMissing)
        ));
    }

    #[test]
    fn test_row_too_narrow_for_link_is_error() {
        let html = listing_page(&[r#"<li class="tableContentInfo">
  <span>desc</span><span>date</span>
  <a href="/informePDF?id=1">Ver</a>
</li>"#
            .to_string()]);
        assert!(matches!(
            parse_listing(&html),
            Err(ParseError::RowTooNarrow { found: 2 })
        ));
    }

    #[test]
    fn test_empty_table_yields_no_records() {
        let html = listing_page(&[]);
        let records = parse_listing(&html).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_trailing_cells_map_to_empty_fields() {
        // Collapsed rows expose fewer cells until their detail panel expands;
        // the zip keeps the row with empty trailing fields.
        let html = listing_page(&[r#"<li class="tableContentInfo">
  <span>desc</span><span>date</span>
  <span><a href="/informePDF?id=9">Ver</a></span>
  <span>Hospital Central</span>
</li>"#
            .to_string()]);
        let records = parse_listing(&html).unwrap();
        assert_eq!(records[0].hospital, "Hospital Central");
        assert_eq!(records[0].specialty, "");
        assert_eq!(records[0].doctor, "");
    }
}
