//! Candidate drafts: unvalidated candidate records produced by the file parsers
//! and the resume extractor, before the normalizer turns them into `NewCandidate`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Proficiency of a single skill. Defaults to `Intermediate` when unspecified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(SkillLevel::Beginner),
            "intermediate" => Some(SkillLevel::Intermediate),
            "advanced" => Some(SkillLevel::Advanced),
            "expert" => Some(SkillLevel::Expert),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceDraft {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub achievements: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationDraft {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: Option<String>,
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<String>,
    pub achievements: Option<String>,
}

/// `level` stays a raw string here; the normalizer decides whether it is a known level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDraft {
    pub name: Option<String>,
    pub level: Option<String>,
}

/// A loosely-typed candidate record. Every field is optional; nothing here has been validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDraft {
    pub name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub years_of_experience: Option<i32>,
    pub expected_salary: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub work_experiences: Vec<WorkExperienceDraft>,
    #[serde(default)]
    pub educations: Vec<EducationDraft>,
    #[serde(default)]
    pub projects: Vec<ProjectDraft>,
    #[serde(default)]
    pub skills: Vec<SkillDraft>,
    pub resume_file_key: Option<String>,
}

impl CandidateDraft {
    /// Maps one JSON element onto a draft, field by field.
    ///
    /// Values of the wrong JSON type are treated as absent rather than failing the
    /// whole file; a non-object element yields an empty draft, which the importer
    /// then reports as a per-record failure.
    pub fn from_json_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return CandidateDraft::default();
        };
        let field = |key: &str| obj.get(key).and_then(string_value);

        CandidateDraft {
            name: field("name"),
            position: field("position"),
            email: field("email"),
            phone: field("phone"),
            location: field("location"),
            years_of_experience: obj.get("yearsOfExperience").map(years_value),
            expected_salary: field("expectedSalary"),
            summary: field("summary"),
            work_experiences: array_of(obj.get("workExperiences"), |item| WorkExperienceDraft {
                company: item.get("company").and_then(string_value),
                position: item.get("position").and_then(string_value),
                start_date: item.get("startDate").and_then(string_value),
                end_date: item.get("endDate").and_then(string_value),
                description: item.get("description").and_then(string_value),
                achievements: item.get("achievements").and_then(string_value),
            }),
            educations: array_of(obj.get("educations"), |item| EducationDraft {
                school: item.get("school").and_then(string_value),
                degree: item.get("degree").and_then(string_value),
                major: item.get("major").and_then(string_value),
                start_date: item.get("startDate").and_then(string_value),
                end_date: item.get("endDate").and_then(string_value),
            }),
            projects: array_of(obj.get("projects"), |item| ProjectDraft {
                name: item.get("name").and_then(string_value),
                role: item.get("role").and_then(string_value),
                start_date: item.get("startDate").and_then(string_value),
                end_date: item.get("endDate").and_then(string_value),
                description: item.get("description").and_then(string_value),
                technologies: item.get("technologies").and_then(string_value),
                achievements: item.get("achievements").and_then(string_value),
            }),
            skills: skills_of(obj.get("skills")),
            resume_file_key: None,
        }
    }

    /// Label used in per-record results. Falls back to an empty string for unnamed drafts.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }
}

/// Parses a years-of-experience value the lenient way: integers, floats (truncated)
/// and numeric strings are accepted; anything else, including negatives, is 0.
pub fn parse_years(raw: &str) -> i32 {
    let raw = raw.trim();
    raw.parse::<i32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i32))
        .map(|years| years.max(0))
        .unwrap_or(0)
}

fn years_value(value: &Value) -> i32 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(|i| i.clamp(0, i32::MAX as i64) as i32)
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as i32))
            .unwrap_or(0),
        Value::String(s) => parse_years(s),
        _ => 0,
    }
}

fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn array_of<T>(value: Option<&Value>, map: impl Fn(&serde_json::Map<String, Value>) -> T) -> Vec<T> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).map(map).collect())
        .unwrap_or_default()
}

/// Skills arrive either as `{name, level}` objects or as bare strings (the resume extractor shape).
fn skills_of(value: Option<&Value>) -> Vec<SkillDraft> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(SkillDraft {
                        name: Some(name.clone()),
                        level: None,
                    }),
                    Value::Object(obj) => Some(SkillDraft {
                        name: obj.get("name").and_then(string_value),
                        level: obj.get("level").and_then(string_value),
                    }),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_value_maps_core_fields() {
        let draft = CandidateDraft::from_json_value(&json!({
            "name": "Alice",
            "position": "Engineer",
            "email": "alice@example.com",
            "yearsOfExperience": 4,
            "expectedSalary": "20-30K"
        }));
        assert_eq!(draft.name.as_deref(), Some("Alice"));
        assert_eq!(draft.position.as_deref(), Some("Engineer"));
        assert_eq!(draft.email.as_deref(), Some("alice@example.com"));
        assert_eq!(draft.years_of_experience, Some(4));
        assert_eq!(draft.expected_salary.as_deref(), Some("20-30K"));
    }

    #[test]
    fn test_wrong_types_become_absent() {
        let draft = CandidateDraft::from_json_value(&json!({
            "name": ["not", "a", "string"],
            "position": null,
            "workExperiences": "nope"
        }));
        assert_eq!(draft.name, None);
        assert_eq!(draft.position, None);
        assert!(draft.work_experiences.is_empty());
    }

    #[test]
    fn test_non_object_element_is_empty_draft() {
        assert_eq!(CandidateDraft::from_json_value(&json!(42)), CandidateDraft::default());
    }

    #[test]
    fn test_years_accepts_strings_and_floats() {
        let draft = CandidateDraft::from_json_value(&json!({"yearsOfExperience": "7"}));
        assert_eq!(draft.years_of_experience, Some(7));
        let draft = CandidateDraft::from_json_value(&json!({"yearsOfExperience": 3.9}));
        assert_eq!(draft.years_of_experience, Some(3));
        let draft = CandidateDraft::from_json_value(&json!({"yearsOfExperience": -2}));
        assert_eq!(draft.years_of_experience, Some(0));
        let draft = CandidateDraft::from_json_value(&json!({"yearsOfExperience": "many"}));
        assert_eq!(draft.years_of_experience, Some(0));
    }

    #[test]
    fn test_skills_accept_strings_and_objects() {
        let draft = CandidateDraft::from_json_value(&json!({
            "skills": ["Rust", {"name": "SQL", "level": "expert"}, 5]
        }));
        assert_eq!(draft.skills.len(), 2);
        assert_eq!(draft.skills[0].name.as_deref(), Some("Rust"));
        assert_eq!(draft.skills[0].level, None);
        assert_eq!(draft.skills[1].level.as_deref(), Some("expert"));
    }

    #[test]
    fn test_child_lists_keep_order() {
        let draft = CandidateDraft::from_json_value(&json!({
            "workExperiences": [
                {"company": "Acme", "position": "Dev", "startDate": "2020-01"},
                {"company": "Globex", "position": "Lead"}
            ],
            "educations": [{"school": "MIT", "degree": "BSc"}]
        }));
        assert_eq!(draft.work_experiences[0].company.as_deref(), Some("Acme"));
        assert_eq!(draft.work_experiences[1].company.as_deref(), Some("Globex"));
        assert_eq!(draft.educations[0].degree.as_deref(), Some("BSc"));
    }

    #[test]
    fn test_parse_years() {
        assert_eq!(parse_years("12"), 12);
        assert_eq!(parse_years(" 5 "), 5);
        assert_eq!(parse_years(""), 0);
        assert_eq!(parse_years("abc"), 0);
        assert_eq!(parse_years("2.5"), 2);
    }

    #[test]
    fn test_skill_level_parse() {
        assert_eq!(SkillLevel::parse("Expert"), Some(SkillLevel::Expert));
        assert_eq!(SkillLevel::parse("guru"), None);
        assert_eq!(SkillLevel::default().as_str(), "intermediate");
    }
}
