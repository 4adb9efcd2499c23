use serde_json::Value;

use crate::candidates::draft::CandidateDraft;
use crate::candidates::import_file::ParseError;

/// Parses a JSON document into drafts. A top-level array yields one draft per
/// element; any other value is treated as a single record.
///
/// Only syntax is checked here. Shape problems surface later as per-record failures.
pub fn parse_json(text: &str) -> Result<Vec<CandidateDraft>, ParseError> {
    let value: Value = serde_json::from_str(text).map_err(ParseError::InvalidJson)?;
    Ok(match value {
        Value::Array(items) => items.iter().map(CandidateDraft::from_json_value).collect(),
        single => vec![CandidateDraft::from_json_value(&single)],
    })
}
