//! Record extraction from the regulator's HTML table.
//!
//! The published page is one large `<table>` with an institution name in
//! the first cell of each row, followed by three peso amounts and a
//! delinquency percentage. Parsing is deliberately forgiving: short rows
//! are skipped, unrecognised institutions are dropped silently, and
//! malformed cells degrade to zero instead of failing the row.

use scraper::{Html, Selector};
use tracing::debug;

use crate::config::EntityPattern;
use crate::types::{EntityRecord, PeriodResult};

/// A row needs at least name + three amounts + IMORA to qualify as data.
const MIN_CELLS: usize = 5;

/// Extract records for the tracked entities from raw page markup.
///
/// Returns an empty map when no configured entity appears anywhere in the
/// document; that is a valid result, not an error.
pub fn extract_records(html: &str, entities: &[EntityPattern]) -> PeriodResult {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let mut records = PeriodResult::new();

    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();

        if cells.len() < MIN_CELLS {
            continue;
        }

        let name = &cells[0];
        // Substring containment against the configured patterns; when
        // patterns overlap, the last match in configuration order wins.
        let matched = entities.iter().rfind(|e| name.contains(&e.pattern));
        let Some(entity) = matched else { continue };

        records.insert(
            entity.short.clone(),
            EntityRecord {
                total_portfolio: parse_amount(&cells[1]),
                performing: parse_amount(&cells[2]),
                non_performing: parse_amount(&cells[3]),
                delinquency_rate: parse_pct(&cells[4]),
            },
        );
    }

    debug!(entities = records.len(), "Extraction complete");
    records
}

/// Parse a comma-grouped integer cell; malformed input degrades to 0.
fn parse_amount(s: &str) -> i64 {
    s.replace(',', "").trim().parse().unwrap_or(0)
}

/// Parse a percentage cell; malformed input degrades to 0.0.
fn parse_pct(s: &str) -> f64 {
    s.replace('%', "").trim().parse().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> Vec<EntityPattern> {
        vec![
            EntityPattern { pattern: "Klar Technologies".into(), short: "Klar".into() },
            EntityPattern { pattern: "Stori México".into(), short: "Stori".into() },
            EntityPattern { pattern: "NU México Financiera".into(), short: "NU México".into() },
        ]
    }

    fn row(cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!("<tr>{tds}</tr>")
    }

    #[test]
    fn test_tracked_entity_row() {
        let html = format!(
            "<table>{}</table>",
            row(&["Stori México Something, S.A. de C.V.", "1,234,567", "1,200,000", "34,567", "2.8%"])
        );
        let records = extract_records(&html, &entities());

        assert_eq!(records.len(), 1);
        let r = &records["Stori"];
        assert_eq!(r.total_portfolio, 1_234_567);
        assert_eq!(r.performing, 1_200_000);
        assert_eq!(r.non_performing, 34_567);
        assert!((r.delinquency_rate - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_short_row_ignored() {
        let html = format!(
            "<table>{}</table>",
            row(&["Stori México", "1,000", "900"])
        );
        let records = extract_records(&html, &entities());
        assert!(records.is_empty());
    }

    #[test]
    fn test_unrecognised_name_dropped() {
        let html = format!(
            "<table>{}</table>",
            row(&["Caja Popular Desconocida", "1,000", "900", "100", "10.0%"])
        );
        let records = extract_records(&html, &entities());
        assert!(records.is_empty());
    }

    #[test]
    fn test_malformed_percentage_degrades_to_zero() {
        let html = format!(
            "<table>{}</table>",
            row(&["Klar Technologies SA", "5,000", "4,500", "500", "n/d"])
        );
        let records = extract_records(&html, &entities());

        let r = &records["Klar"];
        assert_eq!(r.delinquency_rate, 0.0, "bad cell must not drop the record");
        assert_eq!(r.total_portfolio, 5_000);
    }

    #[test]
    fn test_malformed_amount_degrades_to_zero() {
        let html = format!(
            "<table>{}</table>",
            row(&["Klar Technologies SA", "—", "4,500", "500", "9.1%"])
        );
        let records = extract_records(&html, &entities());
        assert_eq!(records["Klar"].total_portfolio, 0);
        assert_eq!(records["Klar"].performing, 4_500);
    }

    #[test]
    fn test_last_configured_pattern_wins_on_overlap() {
        let overlapping = vec![
            EntityPattern { pattern: "NU".into(), short: "first".into() },
            EntityPattern { pattern: "NU México".into(), short: "second".into() },
        ];
        let html = format!(
            "<table>{}</table>",
            row(&["NU México Financiera SA", "1", "1", "0", "0.0%"])
        );
        let records = extract_records(&html, &overlapping);
        assert!(records.contains_key("second"));
        assert!(!records.contains_key("first"));
    }

    #[test]
    fn test_multiple_rows() {
        let html = format!(
            "<table>{}{}{}</table>",
            row(&["Institución", "Total", "Vigente", "Vencida", "IMORA"]),
            row(&["Klar Technologies SA", "9,000", "8,000", "1,000", "11.1%"]),
            row(&["NU México Financiera SA", "20,000", "19,500", "500", "2.5%"]),
        );
        let records = extract_records(&html, &entities());
        assert_eq!(records.len(), 2);
        assert_eq!(records["NU México"].non_performing, 500);
    }

    #[test]
    fn test_empty_document() {
        assert!(extract_records("", &entities()).is_empty());
        assert!(extract_records("<html><body>error</body></html>", &entities()).is_empty());
    }

    #[test]
    fn test_nested_markup_inside_cells() {
        // Cells often carry spans/bolding; text() flattens them.
        let html = "<table><tr>\
            <td><b>Stori México</b> SA</td>\
            <td><span>2,000</span></td><td>1,900</td><td>100</td><td>5.0%</td>\
            </tr></table>";
        let records = extract_records(html, &entities());
        assert_eq!(records["Stori"].total_portfolio, 2_000);
    }
}
