//! The test-record row shape shared by the scraper and the exporter.

use serde::Serialize;

/// Column header of the exported table, in output order.
pub const COLUMNS: [&str; 8] = [
    "Description",
    "Date",
    "Document_link",
    "Hospital",
    "Specialty",
    "Type",
    "Test",
    "Doctor",
];

/// One row of the output table describing a single medical test entry.
///
/// Rows carry no identity beyond their position; duplicates across pages are
/// kept as-is. Field values are the verbatim cell text from the listing,
/// except `document_link` which is an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Document_link")]
    pub document_link: String,
    #[serde(rename = "Hospital")]
    pub hospital: String,
    #[serde(rename = "Specialty")]
    pub specialty: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Test")]
    pub test: String,
    #[serde(rename = "Doctor")]
    pub doctor: String,
}

impl TestRecord {
    /// Builds a record from positionally ordered cell values.
    ///
    /// Cells map onto the schema in [`COLUMNS`] order. Missing trailing cells
    /// become empty fields and surplus cells are dropped, mirroring a plain
    /// zip against the column list. The positional contract is the documented
    /// fallback: the upstream markup carries no stable attribute to key on.
    #[must_use]
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            description: cell(0),
            date: cell(1),
            document_link: cell(2),
            hospital: cell(3),
            specialty: cell(4),
            kind: cell(5),
            test: cell(6),
            doctor: cell(7),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_from_cells_assigns_schema_positions() {
        let record = TestRecord::from_cells(&cells(&[
            "Blood panel",
            "12/05/2024",
            "https://www.quironsalud.com/informePDF?id=1",
            "Hospital Central",
            "Cardiología",
            "Consulta",
            "Electrocardiograma",
            "Dra. García",
        ]));
        assert_eq!(record.description, "Blood panel");
        assert_eq!(record.date, "12/05/2024");
        assert_eq!(
            record.document_link,
            "https://www.quironsalud.com/informePDF?id=1"
        );
        assert_eq!(record.hospital, "Hospital Central");
        assert_eq!(record.specialty, "Cardiología");
        assert_eq!(record.kind, "Consulta");
        assert_eq!(record.test, "Electrocardiograma");
        assert_eq!(record.doctor, "Dra. García");
    }

    #[test]
    fn test_from_cells_missing_trailing_cells_become_empty() {
        let record = TestRecord::from_cells(&cells(&["desc", "date", "link"]));
        assert_eq!(record.description, "desc");
        assert_eq!(record.document_link, "link");
        assert_eq!(record.hospital, "");
        assert_eq!(record.doctor, "");
    }

    #[test]
    fn test_from_cells_surplus_cells_dropped() {
        let values: Vec<String> = (0..10).map(|i| format!("c{i}")).collect();
        let record = TestRecord::from_cells(&values);
        assert_eq!(record.doctor, "c7");
    }
}
