// Prompts for AI candidate evaluation.

use std::fmt::Write;

use crate::candidates::queries::CandidateDetail;
use crate::llm_client::prompts::json_system;

const EVALUATION_ROLE: &str = "You are a senior HR expert who evaluates candidates and \
    prepares interview guidance. Analyse strengths and risks objectively and professionally.";

pub fn evaluation_system() -> String {
    json_system(EVALUATION_ROLE)
}

/// Builds the evaluation prompt from everything stored about one candidate.
pub fn build_evaluation_prompt(detail: &CandidateDetail) -> String {
    let c = &detail.candidate;
    let mut prompt = String::from(
        "Act as a senior HR professional and give a thorough evaluation of the following candidate.\n\n",
    );

    prompt.push_str("## Basic information\n");
    let _ = writeln!(prompt, "- Name: {}", c.name);
    let _ = writeln!(prompt, "- Applied position: {}", c.position);
    let _ = writeln!(prompt, "- Years of experience: {}", c.years_of_experience);
    let _ = writeln!(prompt, "- Location: {}", or_unknown(&c.location));
    let _ = writeln!(prompt, "- Expected salary: {}", or_unknown(&c.expected_salary));
    let _ = writeln!(prompt, "- Summary: {}", or_unknown(&c.summary));

    prompt.push_str("\n## Work experience\n");
    for w in &detail.work_experiences {
        let _ = writeln!(
            prompt,
            "- {} | {} | {} - {}",
            w.company,
            w.position,
            or_unknown(&w.start_date),
            w.end_date.as_deref().unwrap_or("present")
        );
        if let Some(description) = &w.description {
            let _ = writeln!(prompt, "  {description}");
        }
        if let Some(achievements) = &w.achievements {
            let _ = writeln!(prompt, "  Achievements: {achievements}");
        }
    }

    prompt.push_str("\n## Education\n");
    for e in &detail.educations {
        let _ = writeln!(
            prompt,
            "- {} | {} | {} | {} - {}",
            e.school,
            or_unknown(&e.degree),
            or_unknown(&e.major),
            or_unknown(&e.start_date),
            or_unknown(&e.end_date)
        );
    }

    prompt.push_str("\n## Projects\n");
    for p in &detail.projects {
        let _ = writeln!(
            prompt,
            "- {} | {} | {} - {}",
            p.name,
            or_unknown(&p.role),
            or_unknown(&p.start_date),
            or_unknown(&p.end_date)
        );
        if let Some(description) = &p.description {
            let _ = writeln!(prompt, "  {description}");
        }
        if let Some(technologies) = &p.technologies {
            let _ = writeln!(prompt, "  Tech stack: {technologies}");
        }
        if let Some(achievements) = &p.achievements {
            let _ = writeln!(prompt, "  Results: {achievements}");
        }
    }

    prompt.push_str("\n## Skills\n");
    let skills: Vec<String> = detail
        .skills
        .iter()
        .map(|s| format!("{} ({})", s.name, s.level))
        .collect();
    prompt.push_str(&skills.join(", "));

    prompt.push_str(
        r#"

Return the evaluation as a JSON object with this EXACT schema:
{
  "overallScore": 0-100 (number),
  "strengths": ["core strength", "..."],
  "risks": ["potential risk", "..."],
  "suggestions": ["interview suggestion", "..."],
  "detailedAnalysis": "a detailed analysis of roughly 200 words"
}"#,
    );
    prompt
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unknown")
}
