//! Droptable - Tab-delimited table parser
//!
//! Turns raw text into a [`Dataset`]. The first non-blank line is the header
//! and must read exactly `Name<TAB><location column><TAB>Percent`. Data lines
//! with fewer fields than the header are dropped; extra trailing fields are
//! ignored. A percentage that does not parse becomes `0.0`.
//!
//! Parsing either produces a whole dataset or fails before any row is kept.

use csv::{ReaderBuilder, StringRecord, Terminator, Trim};
use tracing::debug;

use crate::data::{Dataset, Row};
use crate::error::ParseError;

/// Name of the first column
pub const NAME_COLUMN: &str = "Name";
/// Name of the third column
pub const PERCENT_COLUMN: &str = "Percent";
/// Default name of the location column
pub const DEFAULT_LOCATION_COLUMN: &str = "Location";

/// Expected header layout. Only the location column name varies between
/// table files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSpec {
    pub location_column: String,
}

impl Default for HeaderSpec {
    fn default() -> Self {
        Self {
            location_column: DEFAULT_LOCATION_COLUMN.to_string(),
        }
    }
}

impl HeaderSpec {
    pub fn new(location_column: impl Into<String>) -> Self {
        Self {
            location_column: location_column.into(),
        }
    }

    /// Column names in file order
    pub fn columns(&self) -> [&str; 3] {
        [NAME_COLUMN, &self.location_column, PERCENT_COLUMN]
    }

    fn matches(&self, header: &StringRecord) -> bool {
        let mut fields: Vec<&str> = header.iter().collect();
        // Trailing empty fields come from trailing delimiters, not extra columns
        while fields.last() == Some(&"") {
            fields.pop();
        }

        fields == self.columns()
    }
}

/// Parse with the default header (`Name`, `Location`, `Percent`).
pub fn parse(text: &str) -> Result<Dataset, ParseError> {
    parse_with(text, &HeaderSpec::default())
}

/// Parse table text against an explicit header layout.
pub fn parse_with(text: &str, spec: &HeaderSpec) -> Result<Dataset, ParseError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        // Lines end at `\n` only; the `\r` of CRLF is trimmed with the field
        .terminator(Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut records = reader
        .records()
        .filter_map(|record| match record {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Unreadable record skipped: {}", e);
                None
            }
        })
        .filter(|record| !is_blank(record));

    let header = records.next().ok_or(ParseError::Empty)?;
    if !spec.matches(&header) {
        return Err(ParseError::HeaderMismatch {
            expected: spec.columns().join(", "),
            found: header.iter().collect::<Vec<_>>().join(", "),
        });
    }

    let arity = spec.columns().len();
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in records {
        if record.len() < arity {
            skipped += 1;
            continue;
        }
        rows.push(Row::new(&record[0], &record[1], parse_percent(&record[2])));
    }

    let dataset = Dataset::from_rows(rows, spec.location_column.clone());
    debug!(
        "Parsed {} rows across {} locations ({} short lines skipped)",
        dataset.len(),
        dataset.location_count(),
        skipped
    );

    Ok(dataset)
}

/// Parse a percentage cell such as `12.5%` or `7`.
///
/// Anything that is not a finite, non-negative number yields `0.0`.
pub fn parse_percent(field: &str) -> f64 {
    let field = field.trim();
    let number = field.strip_suffix('%').unwrap_or(field).trim();

    match number.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record[0].is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str =
        "Name\tLocation\tPercent\nSword\tTownA\t12.5%\nShield\tTownB\t7%\nSword\tTownB\t3%";

    #[test]
    fn test_sample_table() {
        let dataset = parse(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.locations().collect::<Vec<_>>(), vec!["TownA", "TownB"]);
        assert_eq!(dataset.rows()[0], Row::new("Sword", "TownA", 12.5));
        assert_eq!(dataset.rows()[1], Row::new("Shield", "TownB", 7.0));
        assert_eq!(dataset.rows()[2], Row::new("Sword", "TownB", 3.0));
    }

    #[test]
    fn test_wrong_header_loads_nothing() {
        let text = "Item\tLocation\tPercent\nSword\tTownA\t12.5%";
        match parse(text) {
            Err(ParseError::HeaderMismatch { expected, found }) => {
                assert_eq!(expected, "Name, Location, Percent");
                assert_eq!(found, "Item, Location, Percent");
            }
            other => panic!("Expected HeaderMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_header_is_case_sensitive() {
        assert!(matches!(
            parse("name\tLocation\tPercent\nSword\tTownA\t1%"),
            Err(ParseError::HeaderMismatch { .. })
        ));
    }

    #[test]
    fn test_header_with_extra_column_rejected() {
        assert!(matches!(
            parse("Name\tLocation\tPercent\tNotes\nSword\tTownA\t1%\tx"),
            Err(ParseError::HeaderMismatch { .. })
        ));
    }

    #[test]
    fn test_custom_location_column() {
        let text = "Name\tgachapon\tPercent\nSword\tHenesys\t1.25%";
        let spec = HeaderSpec::new("gachapon");
        let dataset = parse_with(text, &spec).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.location_column, "gachapon");

        assert!(parse(text).is_err());
    }

    #[test]
    fn test_short_line_skipped() {
        let text = "Name\tLocation\tPercent\nSword\tTownA\t1%\nShield\tTownB\nHelm\tTownC\t2%";
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(!dataset.has_location("TownB"));
    }

    #[test]
    fn test_trailing_fields_ignored() {
        let text = "Name\tLocation\tPercent\nSword\tTownA\t1%\t\textra\n";
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.rows(), &[Row::new("Sword", "TownA", 1.0)]);
    }

    #[test]
    fn test_bad_percent_defaults_to_zero() {
        let text = "Name\tLocation\tPercent\nSword\tTownA\tabc%";
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rows()[0].percent, 0.0);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("12.5%"), 12.5);
        assert_eq!(parse_percent("7"), 7.0);
        assert_eq!(parse_percent(" 0.75 % "), 0.75);
        assert_eq!(parse_percent("abc%"), 0.0);
        assert_eq!(parse_percent(""), 0.0);
        assert_eq!(parse_percent("-3%"), 0.0);
        assert_eq!(parse_percent("inf"), 0.0);
        assert_eq!(parse_percent("NaN%"), 0.0);
    }

    #[test]
    fn test_fields_are_trimmed_and_crlf_accepted() {
        let text = "Name \t Location\tPercent\r\n  Sword \t TownA \t 12.5% \r\n";
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.rows(), &[Row::new("Sword", "TownA", 12.5)]);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let text = "\n\nName\tLocation\tPercent\n\nSword\tTownA\t1%\n\n";
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("").unwrap_err(), ParseError::Empty);
        assert_eq!(parse("\n\n").unwrap_err(), ParseError::Empty);
    }

    #[test]
    fn test_header_only() {
        let dataset = parse("Name\tLocation\tPercent\n").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.location_count(), 0);
    }

    #[test]
    fn test_quotes_are_literal() {
        let text = "Name\tLocation\tPercent\n\"Big\" Sword\tTownA\t1%";
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.rows()[0].name, "\"Big\" Sword");
    }

    #[test]
    fn test_generated_table_counts() {
        let mut text = String::from("Name\tLocation\tPercent\n");
        for i in 0..250 {
            text.push_str(&format!("Item {}\tTown{}\t{}.5%\n", i, i % 7, i % 40));
        }
        let dataset = parse(&text).unwrap();
        assert_eq!(dataset.len(), 250);
        assert_eq!(dataset.location_count(), 7);
    }

    #[test]
    fn test_non_ascii_names() {
        let text = "Name\tLocation\tPercent\n楓葉劍\t弓箭手村\t0.5%";
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.rows()[0].name, "楓葉劍");
        assert_eq!(dataset.locations().next(), Some("弓箭手村"));
    }

    #[test]
    fn test_lone_carriage_return_stays_in_field() {
        let text = "Name\tLocation\tPercent\nSwo\rrd\tTownA\t1%\nHelm\tTownB\t2%";
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[0].name, "Swo\rrd");
        assert_eq!(dataset.rows()[0].location, "TownA");
        assert_eq!(dataset.rows()[1].name, "Helm");
    }

    #[test]
    fn test_crlf_lines() {
        let text = "Name\tLocation\tPercent\r\nSword\tTownA\t12.5%\r\n\r\nShield\tTownB\t7%\r\n";
        let dataset = parse(text).unwrap();
        assert_eq!(
            dataset.rows(),
            &[Row::new("Sword", "TownA", 12.5), Row::new("Shield", "TownB", 7.0)]
        );
    }
}
