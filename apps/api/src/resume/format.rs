use serde::{Deserialize, Serialize};

use crate::candidates::import_file::file_extension;

/// Binary resume formats the text extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Doc,
    Docx,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "doc" => Some(DocumentFormat::Doc),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        file_extension(filename).and_then(|ext| Self::from_extension(&ext))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Doc => "doc",
            DocumentFormat::Docx => "docx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Doc => "application/msword",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, DocumentFormat::Doc | DocumentFormat::Docx)
    }
}

/// An uploaded resume whose extension has already been accepted.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub filename: String,
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

/// Splits uploads into resume documents and warnings for files with other extensions.
/// Rejected files never reach the pipeline.
pub fn partition_resume_uploads(
    uploads: Vec<(String, Vec<u8>)>,
) -> (Vec<ResumeDocument>, Vec<String>) {
    let mut accepted = Vec::new();
    let mut warnings = Vec::new();

    for (filename, bytes) in uploads {
        match DocumentFormat::from_filename(&filename) {
            Some(format) => accepted.push(ResumeDocument {
                filename,
                format,
                bytes,
            }),
            None => warnings.push(format!(
                "{filename}: unsupported file type, only .pdf, .doc and .docx resumes are accepted"
            )),
        }
    }

    (accepted, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_filename_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_filename("CV.PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_filename("cv.doc"), Some(DocumentFormat::Doc));
        assert_eq!(DocumentFormat::from_filename("cv.final.docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_filename("cv.txt"), None);
        assert_eq!(DocumentFormat::from_filename("pdf"), None);
    }

    #[test]
    fn test_partition_keeps_order_and_warns() {
        let uploads = vec![
            ("a.pdf".to_string(), vec![1]),
            ("b.png".to_string(), vec![2]),
            ("c.docx".to_string(), vec![3]),
        ];
        let (accepted, warnings) = partition_resume_uploads(uploads);
        let names: Vec<_> = accepted.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "c.docx"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("b.png"));
    }
}
