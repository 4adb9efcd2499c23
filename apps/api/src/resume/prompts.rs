// Prompts for structured resume extraction.

use crate::llm_client::prompts::{json_system, NO_INVENTION_INSTRUCTION};

const RESUME_PARSER_ROLE: &str =
    "You are a professional resume parsing assistant for a recruiting team.";

/// Output contract the model must follow. Required keys are never omitted.
const RESUME_SCHEMA: &str = r#"{
  "name": "string (required)",
  "email": "string or null",
  "phone": "string or null",
  "location": "string or null",
  "position": "string or null (desired or most recent job title)",
  "yearsOfExperience": "number or null",
  "expectedSalary": "string or null",
  "summary": "string or null (self-introduction or career objective)",
  "workExperiences": [
    {
      "company": "string (required)",
      "position": "string (required)",
      "startDate": "string YYYY-MM (required)",
      "endDate": "string YYYY-MM or null (null means present)",
      "description": "string or null"
    }
  ],
  "educations": [
    {
      "school": "string (required)",
      "major": "string or null",
      "degree": "string or null",
      "startDate": "string YYYY-MM or null",
      "endDate": "string YYYY-MM or null"
    }
  ],
  "skills": ["string"]
}"#;

pub fn resume_extraction_system() -> String {
    json_system(RESUME_PARSER_ROLE)
}

pub fn build_resume_extraction_prompt(resume_text: &str) -> String {
    format!(
        "Extract the key information from the following resume text.\n\n\
         <resume>\n{resume_text}\n</resume>\n\n\
         Return a single JSON object with exactly this shape:\n{RESUME_SCHEMA}\n\n\
         Rules:\n\
         - {NO_INVENTION_INSTRUCTION}\n\
         - Use the YYYY-MM format for every date.\n\
         - List work experiences and educations in the order they appear in the resume.\n\
         - If the years of experience are not stated, estimate them from the work history.\n\
         - Skills are a flat list of the key skills the resume mentions, as plain strings.\n\
         - Every key must be present; use null or an empty array when there is nothing to report."
    )
}
