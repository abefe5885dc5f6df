//! Job description parser. Same contract as the resume parser: normalized text
//! in, a fully populated `ParsedJD` out, nothing fails.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::extraction::resume::extract_skills;
use crate::extraction::vocab::{self, cached_regex};
use crate::models::jd::{ParsedJD, Seniority};

static REQUIRED_YEARS_RE: OnceLock<Vec<Regex>> = OnceLock::new();
static SENIORITY_RE: OnceLock<Vec<(Regex, Seniority)>> = OnceLock::new();
static SECTION_RE: OnceLock<Regex> = OnceLock::new();
static BULLET_RE: OnceLock<Regex> = OnceLock::new();
static DASH_RE: OnceLock<Regex> = OnceLock::new();

/// Evaluated top to bottom against the lowercased text; first hit wins.
const SENIORITY_TABLE: &[(&str, Seniority)] = &[
    (r"\b(junior|entry\s+level|junior\s+level)\b", Seniority::Junior),
    (r"\b(mid\s+level|intermediate)\b", Seniority::MidLevel),
    (r"\b(senior|senior\s+level)\b", Seniority::Senior),
    (r"\b(lead|principal|staff)\b", Seniority::Lead),
    (r"\b(architect|director|vp|cto)\b", Seniority::Executive),
];

pub fn parse_jd(text: &str) -> ParsedJD {
    let skills = extract_skills(text);

    ParsedJD {
        required_technologies: skills.clone(),
        skills,
        required_years_experience: extract_required_years(text),
        role_keywords: extract_role_keywords(text),
        seniority: extract_seniority(text),
        responsibilities: extract_responsibilities(text),
        raw_text: text.to_string(),
    }
}

/// Years from the first of the required-experience patterns that matches,
/// `0.0` when none does.
pub fn extract_required_years(text: &str) -> f64 {
    let patterns = REQUIRED_YEARS_RE.get_or_init(|| {
        vocab::REQUIRED_YEARS
            .iter()
            .map(|p| Regex::new(p).expect("built-in required-years pattern must compile"))
            .collect()
    });

    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub fn extract_role_keywords(text: &str) -> Vec<String> {
    vocab::vocabulary_hits(text, vocab::ROLE_VOCABULARY)
}

pub fn extract_seniority(text: &str) -> Seniority {
    let table = SENIORITY_RE.get_or_init(|| {
        SENIORITY_TABLE
            .iter()
            .map(|(p, level)| {
                (
                    Regex::new(p).expect("built-in seniority pattern must compile"),
                    *level,
                )
            })
            .collect()
    });

    let lower = text.to_lowercase();
    table
        .iter()
        .find(|(re, _)| re.is_match(&lower))
        .map(|(_, level)| *level)
        .unwrap_or_default()
}

/// Labeled sections (whole match) plus bullet and dash lines (captured text),
/// merged in document order. Duplicate and empty items are dropped.
pub fn extract_responsibilities(text: &str) -> Vec<String> {
    let section = cached_regex(&SECTION_RE, vocab::RESPONSIBILITY_SECTION);
    let bullet = cached_regex(&BULLET_RE, vocab::RESPONSIBILITY_BULLET);
    let dash = cached_regex(&DASH_RE, vocab::RESPONSIBILITY_DASH);

    let mut candidates: Vec<(usize, &str)> = section
        .find_iter(text)
        .map(|m| (m.start(), m.as_str()))
        .collect();
    for re in [bullet, dash] {
        candidates.extend(
            re.captures_iter(text)
                .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str()))),
        );
    }
    // stable: a section and a bullet starting at the same offset keep pattern order
    candidates.sort_by_key(|(start, _)| *start);

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|(_, item)| item.trim())
        .filter(|item| !item.is_empty() && seen.insert(*item))
        .map(String::from)
        .take(vocab::MAX_RESPONSIBILITIES)
        .collect()
}
