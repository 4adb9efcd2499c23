//! Draft normalizer: turns a loosely-typed `CandidateDraft` into the canonical
//! `NewCandidate` accepted by the record store, or explains why it cannot.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::candidates::draft::{CandidateDraft, SkillLevel};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkExperience {
    pub company: String,
    pub position: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub achievements: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEducation {
    pub school: String,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<String>,
    pub achievements: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSkill {
    pub name: String,
    pub level: SkillLevel,
}

/// A validated candidate ready for insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
    pub name: String,
    pub position: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub years_of_experience: i32,
    pub expected_salary: Option<String>,
    pub summary: Option<String>,
    pub work_experiences: Vec<NewWorkExperience>,
    pub educations: Vec<NewEducation>,
    pub projects: Vec<NewProject>,
    pub skills: Vec<NewSkill>,
    pub resume_file_key: Option<String>,
}

impl NewCandidate {
    pub fn has_children(&self) -> bool {
        !(self.work_experiences.is_empty()
            && self.educations.is_empty()
            && self.projects.is_empty()
            && self.skills.is_empty())
    }
}

/// Every problem found in one draft.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .issues.join("; "))]
pub struct DraftError {
    pub issues: Vec<String>,
}

/// Returns true for `local@domain.tld`-shaped addresses.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
        .is_match(email)
}

/// Validates and coerces a draft. Collects all issues instead of stopping at the first.
pub fn normalize_draft(draft: &CandidateDraft) -> Result<NewCandidate, DraftError> {
    let mut issues = Vec::new();

    let name = clean(&draft.name);
    if name.is_none() {
        issues.push("name is required".to_string());
    }
    let position = clean(&draft.position);
    if position.is_none() {
        issues.push("position is required".to_string());
    }

    let email = clean(&draft.email);
    if let Some(email) = &email {
        if !is_valid_email(email) {
            issues.push(format!("email '{email}' is not a valid address"));
        }
    }

    if let Some(years) = draft.years_of_experience.filter(|y| *y < 0) {
        issues.push(format!("yearsOfExperience must not be negative (got {years})"));
    }

    let mut work_experiences = Vec::with_capacity(draft.work_experiences.len());
    for (i, exp) in draft.work_experiences.iter().enumerate() {
        match (clean(&exp.company), clean(&exp.position)) {
            (Some(company), Some(position)) => work_experiences.push(NewWorkExperience {
                company,
                position,
                start_date: clean(&exp.start_date),
                end_date: clean(&exp.end_date),
                description: clean(&exp.description),
                achievements: clean(&exp.achievements),
            }),
            _ => issues.push(format!(
                "work experience #{} requires company and position",
                i + 1
            )),
        }
    }

    let mut educations = Vec::with_capacity(draft.educations.len());
    for (i, edu) in draft.educations.iter().enumerate() {
        match clean(&edu.school) {
            Some(school) => educations.push(NewEducation {
                school,
                degree: clean(&edu.degree),
                major: clean(&edu.major),
                start_date: clean(&edu.start_date),
                end_date: clean(&edu.end_date),
            }),
            None => issues.push(format!("education #{} requires school", i + 1)),
        }
    }

    let mut projects = Vec::with_capacity(draft.projects.len());
    for (i, project) in draft.projects.iter().enumerate() {
        match clean(&project.name) {
            Some(name) => projects.push(NewProject {
                name,
                role: clean(&project.role),
                start_date: clean(&project.start_date),
                end_date: clean(&project.end_date),
                description: clean(&project.description),
                technologies: clean(&project.technologies),
                achievements: clean(&project.achievements),
            }),
            None => issues.push(format!("project #{} requires name", i + 1)),
        }
    }

    let mut skills = Vec::with_capacity(draft.skills.len());
    let mut seen = HashSet::new();
    for (i, skill) in draft.skills.iter().enumerate() {
        let Some(skill_name) = clean(&skill.name) else {
            issues.push(format!("skill #{} requires name", i + 1));
            continue;
        };
        let level = match clean(&skill.level) {
            None => SkillLevel::default(),
            Some(raw) => match SkillLevel::parse(&raw) {
                Some(level) => level,
                None => {
                    issues.push(format!("skill '{skill_name}' has unknown level '{raw}'"));
                    continue;
                }
            },
        };
        if seen.insert(skill_name.to_lowercase()) {
            skills.push(NewSkill {
                name: skill_name,
                level,
            });
        }
    }

    match (name, position) {
        (Some(name), Some(position)) if issues.is_empty() => Ok(NewCandidate {
            name,
            position,
            email,
            phone: clean(&draft.phone),
            location: clean(&draft.location),
            years_of_experience: draft.years_of_experience.unwrap_or(0),
            expected_salary: clean(&draft.expected_salary),
            summary: clean(&draft.summary),
            work_experiences,
            educations,
            projects,
            skills,
            resume_file_key: clean(&draft.resume_file_key),
        }),
        _ => Err(DraftError { issues }),
    }
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
