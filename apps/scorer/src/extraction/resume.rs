//! Resume parser — heuristic, pattern-driven extraction of a `ParsedResume`.
//!
//! Every sub-extractor is total: finding nothing yields an empty value, never an
//! error. Input is expected to be normalized text.

use std::sync::OnceLock;

use chrono::{Datelike, Utc};
use regex::Regex;

use crate::extraction::normalize::{char_window, title_case};
use crate::extraction::vocab::{self, cached_regex};
use crate::models::resume::{ContactInfo, EducationEntry, ExperienceEntry, ParsedResume};

const TITLE_PLACEHOLDER: &str = "Job Title";
const COMPANY_PLACEHOLDER: &str = "Company Name";
const INSTITUTION_PLACEHOLDER: &str = "Institution Name";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static DATE_RANGE_RE: OnceLock<Regex> = OnceLock::new();
static DEGREE_RE: OnceLock<Regex> = OnceLock::new();
static FIELD_RE: OnceLock<Regex> = OnceLock::new();
static YEAR_RE: OnceLock<Regex> = OnceLock::new();
static VENDOR_CERT_RE: OnceLock<Regex> = OnceLock::new();
static GENERIC_CERT_RE: OnceLock<Regex> = OnceLock::new();
static SUMMARY_SECTION_RE: OnceLock<Regex> = OnceLock::new();
static SUMMARY_LEAD_RE: OnceLock<Regex> = OnceLock::new();

/// Parses normalized resume text, resolving `present`/`current` to this year.
pub fn parse_resume(text: &str) -> ParsedResume {
    parse_resume_as_of(text, Utc::now().year())
}

pub fn parse_resume_as_of(text: &str, current_year: i32) -> ParsedResume {
    let experience = extract_experience(text, current_year);
    let total_years_experience = ParsedResume::years_from_entries(&experience);

    ParsedResume {
        contact_info: extract_contact_info(text),
        skills: extract_skills(text),
        experience,
        total_years_experience,
        education: extract_education(text),
        certifications: extract_certifications(text),
        projects: extract_projects(text),
        summary: extract_summary(text),
        raw_text: text.to_string(),
    }
}

pub fn extract_contact_info(text: &str) -> ContactInfo {
    let email = cached_regex(&EMAIL_RE, vocab::EMAIL)
        .find(text)
        .map(|m| m.as_str().to_string());
    let phone = cached_regex(&PHONE_RE, vocab::PHONE)
        .find(text)
        .map(|m| m.as_str().to_string());

    let name = text
        .split('\n')
        .take(vocab::MAX_NAME_LINES)
        .map(str::trim)
        .find(|line| {
            let len = line.chars().count();
            let lower = line.to_lowercase();
            len > 2
                && len < 50
                && !vocab::NON_NAME_PREFIXES
                    .iter()
                    .any(|prefix| lower.starts_with(prefix))
        })
        .map(String::from);

    ContactInfo {
        name,
        email,
        phone,
        location: None,
    }
}

pub fn extract_skills(text: &str) -> Vec<String> {
    vocab::vocabulary_hits(text, vocab::SKILL_VOCABULARY)
}

/// One entry per `YYYY-YYYY` / `YYYY-present` span, in document order.
pub fn extract_experience(text: &str, current_year: i32) -> Vec<ExperienceEntry> {
    let date_range = cached_regex(&DATE_RANGE_RE, vocab::DATE_RANGE);

    date_range
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let start_year: i32 = caps[1].parse().ok()?;
            let end_raw = &caps[2];
            let end_year: i32 = if end_raw.eq_ignore_ascii_case("present")
                || end_raw.eq_ignore_ascii_case("current")
            {
                current_year
            } else {
                end_raw.parse().ok()?
            };

            let description = char_window(
                text,
                whole.start(),
                whole.end(),
                vocab::EXPERIENCE_CONTEXT_CHARS,
                vocab::EXPERIENCE_CONTEXT_CHARS,
            )
            .trim()
            .to_string();

            Some(ExperienceEntry {
                title: TITLE_PLACEHOLDER.to_string(),
                company: COMPANY_PLACEHOLDER.to_string(),
                start_date: start_year.to_string(),
                end_date: end_year.to_string(),
                // reversed ranges count as zero years
                years: (end_year - start_year).max(0),
                description,
            })
        })
        .collect()
}

/// Degree-level mentions first, then field-of-study mentions.
pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    let year_re = cached_regex(&YEAR_RE, vocab::GRADUATION_YEAR);
    let passes = [
        cached_regex(&DEGREE_RE, vocab::DEGREE),
        cached_regex(&FIELD_RE, vocab::FIELD_OF_STUDY),
    ];

    passes
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| {
            let lookahead =
                char_window(text, m.end(), m.end(), 0, vocab::EDUCATION_YEAR_LOOKAHEAD);
            let year = year_re
                .find(lookahead)
                .and_then(|y| y.as_str().parse().ok())
                .unwrap_or(0);
            EducationEntry {
                degree: title_case(m.as_str()),
                institution: INSTITUTION_PLACEHOLDER.to_string(),
                year,
            }
        })
        .collect()
}

pub fn extract_certifications(text: &str) -> Vec<String> {
    let passes = [
        cached_regex(&VENDOR_CERT_RE, vocab::VENDOR_CERTIFICATION),
        cached_regex(&GENERIC_CERT_RE, vocab::GENERIC_CERTIFICATION),
    ];
    passes
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| title_case(m.as_str()))
        .collect()
}

pub fn extract_projects(text: &str) -> Vec<String> {
    text.split('.')
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            vocab::PROJECT_VERBS.iter().any(|verb| lower.contains(verb))
                && sentence.trim().chars().count() > 20
        })
        .map(|sentence| sentence.trim().to_string())
        .take(vocab::MAX_PROJECTS)
        .collect()
}

/// Labeled summary section, else a 50–200 char opening sentence, else the
/// first substantial paragraph, else empty.
pub fn extract_summary(text: &str) -> String {
    let patterns = [
        cached_regex(&SUMMARY_SECTION_RE, vocab::SUMMARY_SECTION),
        cached_regex(&SUMMARY_LEAD_RE, vocab::SUMMARY_LEAD),
    ];
    if let Some(m) = patterns.iter().find_map(|re| re.find(text)) {
        return m.as_str().trim().to_string();
    }

    text.split("\n\n")
        .map(str::trim)
        .find(|para| para.chars().count() > 50)
        .map(String::from)
        .unwrap_or_default()
}
