//! Skills, experience, education and formatting sub-scores.

use std::collections::BTreeSet;

use crate::models::jd::ParsedJD;
use crate::models::report::{ExperienceDetail, RoleComparison, SkillsDetail};
use crate::models::resume::ParsedResume;
use crate::scoring::synonyms::synonyms_of;

const RELEVANT_FIELDS: &[&str] = &["computer science", "engineering", "mathematics", "physics"];
const ADVANCED_DEGREES: &[&str] = &["master", "phd", "ph.d"];
const ACTION_VERBS: &[&str] = &[
    "developed",
    "implemented",
    "created",
    "built",
    "managed",
    "led",
    "designed",
];
const MIN_ACTION_VERBS: usize = 3;
const MIN_TEXT_CHARS: usize = 100;

pub const ISSUE_MOSTLY_IMAGES: &str = "Resume appears to contain mostly images or non-parsable content";
pub const ISSUE_CONTROL_CHARS: &str = "Resume contains unusual formatting characters";
pub const ISSUE_NO_BULLETS: &str = "Resume lacks bullet points for better readability";
pub const ISSUE_FEW_ACTION_VERBS: &str = "Resume could benefit from more action verbs";
pub const ISSUE_NO_SUMMARY: &str = "Resume lacks a professional summary";

/// Lowercases `skills` and adds every synonym of each one.
pub fn expand_with_synonyms(skills: &[String]) -> BTreeSet<String> {
    let base: BTreeSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    let synonyms: Vec<String> = base
        .iter()
        .flat_map(|skill| synonyms_of(skill).iter().map(|s| s.to_string()))
        .collect();
    base.into_iter().chain(synonyms).collect()
}

/// Share of the expanded JD skill set also present in the expanded resume set.
pub fn score_skills(resume: &ParsedResume, jd: &ParsedJD) -> (u32, SkillsDetail) {
    let resume_skills = expand_with_synonyms(&resume.skills);
    let jd_skills = expand_with_synonyms(&jd.skills);

    let score = if jd_skills.is_empty() {
        100
    } else {
        let matched = jd_skills.intersection(&resume_skills).count();
        (matched as f64 / jd_skills.len() as f64 * 100.0) as u32
    };

    let detail = SkillsDetail {
        missing_relevant: jd_skills.difference(&resume_skills).cloned().collect(),
        extracted: resume_skills.into_iter().collect(),
    };
    (score, detail)
}

pub fn score_experience(resume: &ParsedResume, jd: &ParsedJD) -> (u32, ExperienceDetail) {
    let resume_years = resume.total_years_experience;
    let required_years = jd.required_years_experience;

    let score = if required_years == 0.0 || resume_years >= required_years {
        100
    } else {
        (resume_years / required_years * 100.0).max(0.0) as u32
    };

    let roles: Vec<String> = jd.role_keywords.iter().map(|r| r.to_lowercase()).collect();
    let matches = resume
        .experience
        .iter()
        .filter(|entry| {
            let title = entry.title.to_lowercase();
            roles.iter().any(|role| title.contains(role.as_str()))
        })
        .map(|entry| RoleComparison {
            req: format!("{}+ yrs experience", format_years(required_years)),
            candidate: format!("{} yrs", entry.years),
            ok: f64::from(entry.years) >= required_years,
        })
        .collect();

    (
        score,
        ExperienceDetail {
            total_years: resume_years,
            matches,
        },
    )
}

/// Always keeps one decimal for whole numbers: `3.0`, `2.5`.
fn format_years(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("{years:.1}")
    } else {
        years.to_string()
    }
}

/// 50 for any education, +25 for a relevant field, +25 for an advanced degree.
/// No education at all also scores 50.
pub fn score_education(resume: &ParsedResume) -> u32 {
    if resume.education.is_empty() {
        return 50;
    }
    let degrees: Vec<String> = resume.education.iter().map(|e| e.degree.to_lowercase()).collect();
    let has_any = |needles: &[&str]| {
        degrees
            .iter()
            .any(|degree| needles.iter().any(|n| degree.contains(n)))
    };

    let mut score = 50;
    if has_any(RELEVANT_FIELDS) {
        score += 25;
    }
    if has_any(ADVANCED_DEGREES) {
        score += 25;
    }
    score.min(100)
}

/// Starts at 100 and deducts per ATS issue, never below 0. Issues are listed in
/// check order.
pub fn score_formatting(resume: &ParsedResume) -> (u32, Vec<String>) {
    let text = resume.raw_text.to_lowercase();
    let checks: [(bool, u32, &str); 5] = [
        (text.trim().chars().count() < MIN_TEXT_CHARS, 30, ISSUE_MOSTLY_IMAGES),
        (text.contains('\t') || text.contains('\r'), 10, ISSUE_CONTROL_CHARS),
        (!text.contains('•') && !text.contains('-'), 15, ISSUE_NO_BULLETS),
        (
            ACTION_VERBS.iter().filter(|v| text.contains(*v)).count() < MIN_ACTION_VERBS,
            10,
            ISSUE_FEW_ACTION_VERBS,
        ),
        (resume.summary.is_empty(), 10, ISSUE_NO_SUMMARY),
    ];

    let mut score: u32 = 100;
    let mut issues = Vec::new();
    for (failed, penalty, issue) in checks {
        if failed {
            score = score.saturating_sub(penalty);
            issues.push(issue.to_string());
        }
    }
    (score, issues)
}
