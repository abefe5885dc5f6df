use serde::{Deserialize, Serialize};

/// Seniority label inferred from a job description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seniority {
    #[serde(rename = "junior")]
    Junior,
    #[default]
    #[serde(rename = "mid-level")]
    MidLevel,
    #[serde(rename = "senior")]
    Senior,
    #[serde(rename = "lead")]
    Lead,
    #[serde(rename = "executive")]
    Executive,
}

impl Seniority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Seniority::Junior => "junior",
            Seniority::MidLevel => "mid-level",
            Seniority::Senior => "senior",
            Seniority::Lead => "lead",
            Seniority::Executive => "executive",
        }
    }
}

/// Structured requirements pulled from a job description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedJD {
    pub skills: Vec<String>,
    /// 0.0 means the JD did not state a number of years.
    pub required_years_experience: f64,
    pub role_keywords: Vec<String>,
    pub required_technologies: Vec<String>,
    pub seniority: Seniority,
    pub responsibilities: Vec<String>,
    pub raw_text: String,
}
