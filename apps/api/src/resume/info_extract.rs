//! Structured-info extraction: plain resume text to candidate fields via the LLM.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::candidates::draft::{CandidateDraft, EducationDraft, SkillDraft, WorkExperienceDraft};
use crate::llm_client::LlmClient;
use crate::resume::prompts::{build_resume_extraction_prompt, resume_extraction_system};
use crate::resume::ExtractError;

/// Resume text beyond this many characters is cut before prompting.
const MAX_RESUME_CHARS: usize = 30_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedWorkExperience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEducation {
    pub school: String,
    pub major: Option<String>,
    pub degree: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Exact shape the extraction prompt asks for. A response missing a required
/// key fails deserialization, which fails that one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedResume {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub position: Option<String>,
    pub years_of_experience: Option<f64>,
    pub expected_salary: Option<String>,
    pub summary: Option<String>,
    pub work_experiences: Vec<ExtractedWorkExperience>,
    pub educations: Vec<ExtractedEducation>,
    pub skills: Vec<String>,
}

impl From<ExtractedResume> for CandidateDraft {
    fn from(resume: ExtractedResume) -> Self {
        CandidateDraft {
            name: Some(resume.name),
            position: resume.position,
            email: resume.email,
            phone: resume.phone,
            location: resume.location,
            years_of_experience: resume
                .years_of_experience
                .filter(|y| y.is_finite())
                .map(|y| y.max(0.0) as i32),
            expected_salary: resume.expected_salary,
            summary: resume.summary,
            work_experiences: resume
                .work_experiences
                .into_iter()
                .map(|exp| WorkExperienceDraft {
                    company: Some(exp.company),
                    position: Some(exp.position),
                    start_date: Some(exp.start_date),
                    end_date: exp.end_date,
                    description: exp.description,
                    achievements: None,
                })
                .collect(),
            educations: resume
                .educations
                .into_iter()
                .map(|edu| EducationDraft {
                    school: Some(edu.school),
                    degree: edu.degree,
                    major: edu.major,
                    start_date: edu.start_date,
                    end_date: edu.end_date,
                })
                .collect(),
            projects: Vec::new(),
            skills: resume
                .skills
                .into_iter()
                .map(|name| SkillDraft {
                    name: Some(name),
                    level: None,
                })
                .collect(),
            resume_file_key: None,
        }
    }
}

/// Turns plain resume text into structured fields.
#[async_trait]
pub trait ResumeInfoExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<ExtractedResume, ExtractError>;
}

/// Default extractor: one LLM call per resume.
pub struct LlmResumeExtractor {
    llm: LlmClient,
}

impl LlmResumeExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeInfoExtractor for LlmResumeExtractor {
    async fn extract(&self, text: &str) -> Result<ExtractedResume, ExtractError> {
        let text = truncate_chars(text, MAX_RESUME_CHARS);
        debug!("Extracting resume info from {} chars", text.chars().count());

        let prompt = build_resume_extraction_prompt(text);
        let resume: ExtractedResume = self
            .llm
            .call_json(&prompt, &resume_extraction_system())
            .await?;

        validate_extracted(&resume)?;
        info!("Extracted resume for '{}'", resume.name.trim());
        Ok(resume)
    }
}

/// Rejects responses that parsed but carry blank required values.
pub fn validate_extracted(resume: &ExtractedResume) -> Result<(), ExtractError> {
    if resume.name.trim().is_empty() {
        return Err(ExtractError::Incomplete("name is empty".to_string()));
    }
    Ok(())
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}
