//! CSV parser for candidate files.
//!
//! Deliberately minimal: one header row, fields split on a bare comma, no quoting or
//! escaping. Values containing commas are not supported by this format.

use crate::candidates::draft::{parse_years, CandidateDraft};
use crate::candidates::import_file::ParseError;

/// Drafts parsed from a CSV file plus the rows that were dropped on the way.
#[derive(Debug, Default)]
pub struct CsvParseOutcome {
    pub drafts: Vec<CandidateDraft>,
    /// 1-based data-row numbers of rows missing a name or a position.
    pub dropped_rows: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Name,
    Email,
    Phone,
    Position,
    YearsOfExperience,
    Location,
    ExpectedSalary,
    Summary,
    Ignored,
}

impl Column {
    fn from_header(header: &str) -> Self {
        match header {
            "name" => Column::Name,
            "email" => Column::Email,
            "phone" => Column::Phone,
            "position" => Column::Position,
            "yearsOfExperience" => Column::YearsOfExperience,
            "location" => Column::Location,
            "expectedSalary" => Column::ExpectedSalary,
            "summary" => Column::Summary,
            _ => Column::Ignored,
        }
    }
}

/// Parses CSV text into candidate drafts.
///
/// Rows missing `name` or `position` are dropped and reported in
/// `dropped_rows`; they never reach the importer. Fails only when the text has
/// fewer than two non-blank lines.
pub fn parse_csv(text: &str) -> Result<CsvParseOutcome, ParseError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header_line = lines.next().ok_or(ParseError::CsvTooShort)?;
    let columns: Vec<Column> = header_line
        .split(',')
        .map(|h| Column::from_header(h.trim()))
        .collect();

    let mut outcome = CsvParseOutcome::default();
    let mut saw_data = false;

    for (row_index, line) in lines.enumerate() {
        saw_data = true;
        let values: Vec<&str> = line.split(',').map(str::trim).collect();
        let mut draft = CandidateDraft {
            years_of_experience: Some(0),
            ..CandidateDraft::default()
        };

        for (position, column) in columns.iter().enumerate() {
            let value = values.get(position).copied().unwrap_or("");
            let text = || Some(value.to_string());
            match column {
                Column::Name => draft.name = text(),
                Column::Email => draft.email = text(),
                Column::Phone => draft.phone = text(),
                Column::Position => draft.position = text(),
                Column::YearsOfExperience => draft.years_of_experience = Some(parse_years(value)),
                Column::Location => draft.location = text(),
                Column::ExpectedSalary => draft.expected_salary = text(),
                Column::Summary => draft.summary = text(),
                Column::Ignored => {}
            }
        }

        if has_text(&draft.name) && has_text(&draft.position) {
            outcome.drafts.push(draft);
        } else {
            outcome.dropped_rows.push(row_index + 1);
        }
    }

    if !saw_data {
        return Err(ParseError::CsvTooShort);
    }

    Ok(outcome)
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_rows_with_default_years() {
        let outcome = parse_csv("name,position\nAlice,Engineer\nBob,Sales").unwrap();
        assert_eq!(outcome.drafts.len(), 2);
        assert_eq!(outcome.drafts[0].name.as_deref(), Some("Alice"));
        assert_eq!(outcome.drafts[0].position.as_deref(), Some("Engineer"));
        assert_eq!(outcome.drafts[0].years_of_experience, Some(0));
        assert_eq!(outcome.drafts[1].name.as_deref(), Some("Bob"));
        assert_eq!(outcome.drafts[1].position.as_deref(), Some("Sales"));
        assert_eq!(outcome.drafts[1].years_of_experience, Some(0));
        assert!(outcome.dropped_rows.is_empty());
    }

    #[test]
    fn test_row_missing_name_and_position_is_dropped() {
        let text = "name,position,email\nAlice,Engineer,a@x.io\n,,ghost@x.io\nBob,Sales,";
        let outcome = parse_csv(text).unwrap();
        assert_eq!(outcome.drafts.len(), 2);
        assert_eq!(outcome.dropped_rows, vec![2]);
        assert!(outcome
            .drafts
            .iter()
            .all(|d| d.email.as_deref() != Some("ghost@x.io")));
    }

    #[test]
    fn test_row_missing_only_position_is_dropped() {
        let outcome = parse_csv("name,position\nAlice,\nBob,Sales").unwrap();
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.dropped_rows, vec![1]);
    }

    #[test]
    fn test_all_known_headers_map() {
        let text = "name,email,phone,position,yearsOfExperience,location,expectedSalary,summary\n\
                    Carol,c@x.io,123,PM,6,Berlin,80k,Ships things";
        let draft = &parse_csv(text).unwrap().drafts[0];
        assert_eq!(draft.email.as_deref(), Some("c@x.io"));
        assert_eq!(draft.phone.as_deref(), Some("123"));
        assert_eq!(draft.years_of_experience, Some(6));
        assert_eq!(draft.location.as_deref(), Some("Berlin"));
        assert_eq!(draft.expected_salary.as_deref(), Some("80k"));
        assert_eq!(draft.summary.as_deref(), Some("Ships things"));
    }

    #[test]
    fn test_unknown_headers_are_ignored() {
        let outcome = parse_csv("nickname,name,position\nAl,Alice,Engineer").unwrap();
        let draft = &outcome.drafts[0];
        assert_eq!(draft.name.as_deref(), Some("Alice"));
        assert_eq!(draft.position.as_deref(), Some("Engineer"));
    }

    #[test]
    fn test_unparseable_years_default_to_zero() {
        let outcome = parse_csv("name,position,yearsOfExperience\nAlice,Engineer,lots").unwrap();
        assert_eq!(outcome.drafts[0].years_of_experience, Some(0));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let outcome = parse_csv("\n\nname,position\n\n  \nAlice,Engineer\n\n").unwrap();
        assert_eq!(outcome.drafts.len(), 1);
    }

    #[test]
    fn test_header_only_is_error() {
        assert!(matches!(parse_csv("name,position\n"), Err(ParseError::CsvTooShort)));
        assert!(matches!(parse_csv(""), Err(ParseError::CsvTooShort)));
    }

    #[test]
    fn test_quoted_commas_are_not_special() {
        let outcome = parse_csv("name,position,summary\nAlice,Engineer,\"Hello, world\"").unwrap();
        assert_eq!(outcome.drafts[0].summary.as_deref(), Some("\"Hello"));
    }
}
