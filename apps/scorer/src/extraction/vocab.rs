//! Fixed vocabularies and compiled patterns used by the structured extractors.
//!
//! Order matters wherever a list is scanned first-match-wins or its output
//! order is observable.

use std::sync::OnceLock;

use regex::Regex;

/// Technical skills recognized by substring match, in output order.
pub const SKILL_VOCABULARY: &[&str] = &[
    "python",
    "javascript",
    "java",
    "react",
    "node.js",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "html",
    "css",
    "typescript",
    "angular",
    "vue",
    "mongodb",
    "postgresql",
    "mysql",
    "redis",
    "elasticsearch",
    "kafka",
    "rabbitmq",
    "jenkins",
    "gitlab",
    "agile",
    "scrum",
    "kanban",
    "jira",
    "confluence",
];

/// Role and seniority words recognized in job descriptions.
pub const ROLE_VOCABULARY: &[&str] = &[
    "engineer",
    "developer",
    "architect",
    "manager",
    "lead",
    "senior",
    "junior",
    "principal",
    "staff",
    "director",
    "vp",
    "cto",
];

/// A sentence containing one of these reads as a project description.
pub const PROJECT_VERBS: &[&str] = &["project", "developed", "built", "created", "implemented"];

/// Lines starting with these are never taken as the candidate's name.
pub const NON_NAME_PREFIXES: &[&str] = &["email", "phone", "address"];

pub const MAX_PROJECTS: usize = 5;
pub const MAX_RESPONSIBILITIES: usize = 10;
pub const MAX_NAME_LINES: usize = 5;
/// Characters captured on each side of an experience date range.
pub const EXPERIENCE_CONTEXT_CHARS: usize = 100;
/// Characters searched after a degree mention for a graduation year.
pub const EDUCATION_YEAR_LOOKAHEAD: usize = 50;

pub const EMAIL: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b";
pub const PHONE: &str = r"(\+\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}";
pub const DATE_RANGE: &str = r"(?i)([0-9]{4})\s*[-–]\s*([0-9]{4}|\bpresent\b|\bcurrent\b)";
pub const DEGREE: &str = r"(?i)\b(bachelor|master|phd|b\.s\.|m\.s\.|ph\.d\.)\b";
pub const FIELD_OF_STUDY: &str = r"(?i)\b(computer science|engineering|mathematics|physics)\b";
pub const GRADUATION_YEAR: &str = r"\b(19|20)[0-9]{2}\b";
pub const VENDOR_CERTIFICATION: &str = r"(?i)\b(aws|azure|gcp|cisco|microsoft|oracle|ibm)\s+(certified|professional|associate|expert)\b";
pub const GENERIC_CERTIFICATION: &str = r"(?i)\b(pmp|scrum|agile|six\s+sigma|lean)\b";
pub const SUMMARY_SECTION: &str = r"(?is)\b(summary|objective|profile|about)\b.*?\.";
pub const SUMMARY_LEAD: &str = r"(?is)^[^.]{50,200}\.";

/// Tried in order; the first pattern that matches supplies the years.
pub const REQUIRED_YEARS: &[&str] = &[
    r"(?i)([0-9]+)\+?\s*(?:years?|yrs?)\s*(?:of\s+)?experience",
    r"(?i)experience:\s*([0-9]+)\+?\s*(?:years?|yrs?)",
    r"(?i)([0-9]+)\+?\s*(?:years?|yrs?)\s*(?:in\s+)?(?:the\s+)?field",
];

pub const RESPONSIBILITY_SECTION: &str =
    r"(?is)\b(responsible\s+for|duties|responsibilities?|key\s+responsibilities?)\b.*?\.";
pub const RESPONSIBILITY_BULLET: &str = r"(?i)•\s*([^\n]*)";
pub const RESPONSIBILITY_DASH: &str = r"(?i)-\s*([^\n]*)";

/// Returns the regex stored in `cell`, compiling `pattern` on first use.
///
/// Patterns are compile-time constants of this crate, so a compile failure is a
/// programming error.
pub fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in extraction pattern must compile"))
}

/// Case-insensitive vocabulary scan over `text`, title-cased in vocabulary order.
pub fn vocabulary_hits(text: &str, vocabulary: &[&str]) -> Vec<String> {
    let lower = text.to_lowercase();
    vocabulary
        .iter()
        .filter(|term| lower.contains(*term))
        .map(|term| crate::extraction::normalize::title_case(term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        let patterns = [
            EMAIL,
            PHONE,
            DATE_RANGE,
            DEGREE,
            FIELD_OF_STUDY,
            GRADUATION_YEAR,
            VENDOR_CERTIFICATION,
            GENERIC_CERTIFICATION,
            SUMMARY_SECTION,
            SUMMARY_LEAD,
            RESPONSIBILITY_SECTION,
            RESPONSIBILITY_BULLET,
            RESPONSIBILITY_DASH,
        ];
        for pattern in patterns.iter().chain(REQUIRED_YEARS.iter()) {
            assert!(Regex::new(pattern).is_ok(), "pattern failed to compile: {pattern}");
        }
    }

    #[test]
    fn test_vocabulary_hits_preserve_vocabulary_order() {
        let hits = vocabulary_hits("Docker, SQL and Python", SKILL_VOCABULARY);
        assert_eq!(hits, vec!["Python", "Sql", "Docker"]);
    }

    #[test]
    fn test_vocabulary_hits_are_substring_matches() {
        // "javascript" contains "java"
        let hits = vocabulary_hits("JavaScript", SKILL_VOCABULARY);
        assert_eq!(hits, vec!["Javascript", "Java"]);
    }
}
