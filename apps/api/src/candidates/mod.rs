// Candidate records: structured-file parsing, draft normalization, batch import,
// queries and AI evaluation.

pub mod csv_parser;
pub mod draft;
pub mod evaluation;
pub mod handlers;
pub mod import_file;
pub mod importer;
pub mod json_parser;
pub mod normalize;
pub mod prompts;
pub mod queries;
pub mod store;
