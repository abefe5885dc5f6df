use serde::{Deserialize, Serialize};

/// Contact block pulled from the head of a resume. Every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// A single `YYYY-YYYY` span found in the resume text.
///
/// `title` and `company` are placeholders: the extractor does not resolve them
/// from the surrounding text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub years: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    /// Graduation year, 0 when none was found near the degree mention.
    pub year: i32,
}

/// Structured view of a resume. Built once per request and never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedResume {
    pub contact_info: ContactInfo,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    /// Always the sum of `experience[*].years`.
    pub total_years_experience: f64,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<String>,
    pub projects: Vec<String>,
    pub summary: String,
    pub raw_text: String,
}

impl ParsedResume {
    pub fn years_from_entries(entries: &[ExperienceEntry]) -> f64 {
        entries.iter().map(|e| e.years as f64).sum()
    }
}
