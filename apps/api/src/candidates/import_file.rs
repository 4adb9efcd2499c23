//! Structured-file import: classify an uploaded file by extension and turn its
//! text into drafts with the matching parser.

use serde::Serialize;
use thiserror::Error;

use crate::candidates::csv_parser::parse_csv;
use crate::candidates::draft::CandidateDraft;
use crate::candidates::json_parser::parse_json;
use crate::resume::format::DocumentFormat;

/// Whole-file failures. Any of these rejects the request before an import starts.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("CSV file must contain a header row and at least one data row")]
    CsvTooShort,

    #[error("File is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Unsupported file type '{0}'; expected .json or .csv")]
    UnsupportedFile(String),

    #[error("No valid candidate records found in file")]
    NoRecords,
}

/// What an uploaded file is, judged from its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFileKind {
    Json,
    Csv,
    Resume(DocumentFormat),
}

impl ImportFileKind {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = file_extension(filename)?;
        match ext.as_str() {
            "json" => Some(ImportFileKind::Json),
            "csv" => Some(ImportFileKind::Csv),
            other => DocumentFormat::from_extension(other).map(ImportFileKind::Resume),
        }
    }
}

/// Lowercased extension of a filename, if any.
pub fn file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedImportFile {
    #[serde(skip)]
    pub drafts: Vec<CandidateDraft>,
    pub dropped_rows: Vec<usize>,
}

/// Parses a `.json` or `.csv` upload into drafts.
///
/// A file that yields no drafts at all is rejected; an explicitly empty batch is only
/// meaningful through the batch-import endpoint.
pub fn parse_import_file(filename: &str, text: &str) -> Result<ParsedImportFile, ParseError> {
    let parsed = match ImportFileKind::from_filename(filename) {
        Some(ImportFileKind::Json) => ParsedImportFile {
            drafts: parse_json(text)?,
            dropped_rows: Vec::new(),
        },
        Some(ImportFileKind::Csv) => {
            let outcome = parse_csv(text)?;
            ParsedImportFile {
                drafts: outcome.drafts,
                dropped_rows: outcome.dropped_rows,
            }
        }
        _ => return Err(ParseError::UnsupportedFile(filename.to_string())),
    };

    if parsed.drafts.is_empty() {
        return Err(ParseError::NoRecords);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(ImportFileKind::from_filename("a.JSON"), Some(ImportFileKind::Json));
        assert_eq!(ImportFileKind::from_filename("a.csv"), Some(ImportFileKind::Csv));
        assert_eq!(
            ImportFileKind::from_filename("cv.Docx"),
            Some(ImportFileKind::Resume(DocumentFormat::Docx))
        );
        assert_eq!(ImportFileKind::from_filename("notes.txt"), None);
        assert_eq!(ImportFileKind::from_filename("README"), None);
    }

    #[test]
    fn test_csv_dropped_rows_are_reported() {
        let parsed = parse_import_file("people.csv", "name,position\nAlice,Engineer\n,\n").unwrap();
        assert_eq!(parsed.drafts.len(), 1);
        assert_eq!(parsed.dropped_rows, vec![2]);
    }

    #[test]
    fn test_json_file_dispatch() {
        let parsed = parse_import_file("people.json", r#"[{"name":"A","position":"B"}]"#).unwrap();
        assert_eq!(parsed.drafts.len(), 1);
        assert!(parsed.dropped_rows.is_empty());
    }

    #[test]
    fn test_file_with_only_dropped_rows_is_rejected() {
        assert!(matches!(
            parse_import_file("people.csv", "name,position\n,\n"),
            Err(ParseError::NoRecords)
        ));
        assert!(matches!(
            parse_import_file("people.json", "[]"),
            Err(ParseError::NoRecords)
        ));
    }

    #[test]
    fn test_resume_files_are_not_structured_imports() {
        assert!(matches!(
            parse_import_file("cv.pdf", ""),
            Err(ParseError::UnsupportedFile(_))
        ));
    }
}
