use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How strongly the JD asks for a keyword. Drives the 50/30/20 keyword weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Importance {
    #[serde(rename = "required")]
    Required,
    #[serde(rename = "preferred")]
    Preferred,
    #[serde(rename = "nice-to-have")]
    NiceToHave,
}

/// A JD keyword with its importance tier and whether the resume covers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub importance: Importance,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingKeyword {
    pub keyword: String,
    pub importance: Importance,
}

/// The five weighted sub-scores, each in 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_match: u32,
    pub skills: u32,
    pub experience: u32,
    pub education: u32,
    pub formatting: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsDetail {
    pub extracted: Vec<String>,
    pub missing_relevant: Vec<String>,
}

/// Per-role comparison recorded for resume entries whose title names a JD role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleComparison {
    pub req: String,
    pub candidate: String,
    pub ok: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDetail {
    pub total_years: f64,
    pub matches: Vec<RoleComparison>,
}

/// Advisory text grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub keyword_insertions: Vec<String>,
    pub resume_bullet_examples: Vec<String>,
    pub file_recommendation: Vec<String>,
}

/// Everything the scoring engine produces for one resume/JD pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall_score: u32,
    pub scores: ScoreBreakdown,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<MissingKeyword>,
    pub keywords: Vec<KeywordRecord>,
    pub skills: SkillsDetail,
    pub experience: ExperienceDetail,
    pub formatting_issues: Vec<String>,
    pub suggestions: SuggestionSet,
    pub explanations: String,
}

/// Final response assembled by the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub request_id: Uuid,
    #[serde(flatten)]
    pub report: ScoreReport,
    /// Cosine similarity of the two raw texts. Reported only, not weighted.
    pub semantic_similarity: f64,
    pub similarity_backend: String,
    pub raw_parsed_resume: String,
    pub raw_parsed_jd: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_serde_labels() {
        assert_eq!(
            serde_json::to_string(&Importance::NiceToHave).unwrap(),
            r#""nice-to-have""#
        );
        let parsed: Importance = serde_json::from_str(r#""required""#).unwrap();
        assert_eq!(parsed, Importance::Required);
    }

    #[test]
    fn test_analysis_report_flattens_score_report() {
        let report = AnalysisReport {
            request_id: Uuid::new_v4(),
            report: ScoreReport {
                overall_score: 72,
                scores: ScoreBreakdown::default(),
                confidence: 0.8,
                matched_keywords: vec!["Python".to_string()],
                missing_keywords: vec![],
                keywords: vec![],
                skills: SkillsDetail::default(),
                experience: ExperienceDetail::default(),
                formatting_issues: vec![],
                suggestions: SuggestionSet::default(),
                explanations: String::new(),
            },
            semantic_similarity: 0.5,
            similarity_backend: "fallback".to_string(),
            raw_parsed_resume: String::new(),
            raw_parsed_jd: String::new(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["overall_score"], 72);
        assert_eq!(json["matched_keywords"][0], "Python");
        assert_eq!(json["scores"]["keyword_match"], 0);
        assert!(json.get("report").is_none());
    }
}
