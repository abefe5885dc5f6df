//! Scoring Engine: five rule-based sub-scores combined into a weighted overall
//! score, plus confidence, suggestions and explanations.
//!
//! Deterministic for a given (resume, JD, weights) triple.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::jd::ParsedJD;
use crate::models::report::{MissingKeyword, ScoreBreakdown, ScoreReport};
use crate::models::resume::ParsedResume;

pub mod keywords;
pub mod narrative;
pub mod subscores;
pub mod synonyms;

const MAX_SUB_SCORE: u32 = 100;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Sub-score '{name}' out of range: {value}")]
    InvalidSubScore { name: &'static str, value: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub keyword_match: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub formatting: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword_match: 0.40,
            skills: 0.25,
            experience: 0.15,
            education: 0.10,
            formatting: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("keyword_match", self.keyword_match),
            ("skills", self.skills),
            ("experience", self.experience),
            ("education", self.education),
            ("formatting", self.formatting),
        ]
    }

    /// Weighted sum truncated to an integer.
    pub fn overall(&self, scores: &ScoreBreakdown) -> u32 {
        let total = f64::from(scores.keyword_match) * self.keyword_match
            + f64::from(scores.skills) * self.skills
            + f64::from(scores.experience) * self.experience
            + f64::from(scores.education) * self.education
            + f64::from(scores.formatting) * self.formatting;
        total.max(0.0) as u32
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn score(
        &self,
        resume: &ParsedResume,
        jd: &ParsedJD,
    ) -> Result<ScoreReport, ScoringError> {
        let keywords = keywords::score_keywords(resume, jd);
        let (skills_score, skills) = subscores::score_skills(resume, jd);
        let (experience_score, experience) = subscores::score_experience(resume, jd);
        let education_score = subscores::score_education(resume);
        let (formatting_score, formatting_issues) = subscores::score_formatting(resume);

        let scores = ScoreBreakdown {
            keyword_match: keywords.score,
            skills: skills_score,
            experience: experience_score,
            education: education_score,
            formatting: formatting_score,
        };
        validate(&scores)?;

        let overall_score = self.weights.overall(&scores);
        debug!(
            "Scored resume: overall={} keyword={} skills={} experience={} education={} formatting={}",
            overall_score,
            scores.keyword_match,
            scores.skills,
            scores.experience,
            scores.education,
            scores.formatting
        );

        let missing_keywords: Vec<MissingKeyword> = keywords
            .missing()
            .map(|r| MissingKeyword {
                keyword: r.keyword.clone(),
                importance: r.importance,
            })
            .collect();

        Ok(ScoreReport {
            overall_score,
            scores,
            confidence: narrative::confidence(&scores),
            matched_keywords: keywords.matched().map(|r| r.keyword.clone()).collect(),
            suggestions: narrative::suggestions(&keywords, &scores),
            explanations: narrative::explanations(
                overall_score,
                &scores,
                missing_keywords.len(),
                skills.missing_relevant.len(),
            ),
            missing_keywords,
            keywords: keywords.records,
            skills,
            experience,
            formatting_issues,
        })
    }
}

fn validate(scores: &ScoreBreakdown) -> Result<(), ScoringError> {
    let named = [
        ("keyword_match", scores.keyword_match),
        ("skills", scores.skills),
        ("experience", scores.experience),
        ("education", scores.education),
        ("formatting", scores.formatting),
    ];
    match named.into_iter().find(|(_, value)| *value > MAX_SUB_SCORE) {
        Some((name, value)) => Err(ScoringError::InvalidSubScore { name, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::jd::parse_jd;
    use crate::extraction::normalize::normalize_text;
    use crate::extraction::resume::parse_resume_as_of;

    const RESUME: &str = "Jane Doe
jane.doe@example.com
Summary: Senior backend engineer with eight years of experience building payment systems.
- Developed Python microservices and SQL reporting on AWS.
- Built Docker images and managed Kubernetes clusters.
- Led a team of four and designed the billing data model.
Experience 2016 - 2024
Education: Master of Computer Science 2015";

    const JD: &str = "Senior Backend Engineer.
Python and AWS are required. Kubernetes experience preferred.
We need 5+ years of experience building distributed systems.
Responsibilities: design services and mentor engineers.";

    fn engine() -> ScoringEngine {
        ScoringEngine::new(ScoringWeights::default())
    }

    fn parsed(resume: &str, jd: &str) -> (ParsedResume, ParsedJD) {
        (
            parse_resume_as_of(&normalize_text(resume), 2026),
            parse_jd(&normalize_text(jd)),
        )
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let sum: f64 = ScoringWeights::default().named().iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_is_truncated_weighted_sum() {
        let scores = ScoreBreakdown {
            keyword_match: 55,
            skills: 66,
            experience: 100,
            education: 75,
            formatting: 85,
        };
        // 22 + 16.5 + 15 + 7.5 + 8.5 = 69.5
        assert_eq!(ScoringWeights::default().overall(&scores), 69);
    }

    #[test]
    fn test_overall_never_decreases_as_a_sub_score_rises() {
        let weights = ScoringWeights::default();
        let fields: [fn(&mut ScoreBreakdown) -> &mut u32; 5] = [
            |s| &mut s.keyword_match,
            |s| &mut s.skills,
            |s| &mut s.experience,
            |s| &mut s.education,
            |s| &mut s.formatting,
        ];
        for base in [0, 37, 100] {
            for field in fields {
                let mut scores = ScoreBreakdown {
                    keyword_match: base,
                    skills: base,
                    experience: base,
                    education: base,
                    formatting: base,
                };
                let mut previous = 0;
                for value in 0..=100 {
                    *field(&mut scores) = value;
                    let overall = weights.overall(&scores);
                    assert!(overall >= previous, "dropped to {overall} at {value}");
                    previous = overall;
                }
            }
        }
    }

    #[test]
    fn test_strong_match_scores_high() {
        let (resume, jd) = parsed(RESUME, JD);
        let report = engine().score(&resume, &jd).unwrap();

        assert_eq!(report.scores.keyword_match, 100);
        assert_eq!(report.scores.experience, 100);
        assert_eq!(report.scores.education, 100);
        assert!(report.overall_score >= 80, "overall {}", report.overall_score);
        assert!(report.missing_keywords.is_empty());
        assert!(report.explanations.starts_with("Excellent match!"));
        assert!(report.suggestions.keyword_insertions.is_empty());
    }

    #[test]
    fn test_short_python_resume_meets_experience() {
        let (resume, jd) = parsed(
            "Experienced Python developer, 2018-2022, built REST APIs",
            "Required: 3+ years Python experience",
        );
        let report = engine().score(&resume, &jd).unwrap();

        assert!((resume.total_years_experience - 4.0).abs() < f64::EPSILON);
        assert_eq!(report.scores.experience, 100);
        assert!(report.matched_keywords.iter().any(|k| k == "Python"));
    }

    #[test]
    fn test_report_invariants() {
        let (resume, jd) = parsed(RESUME, JD);
        let report = engine().score(&resume, &jd).unwrap();

        assert!(report.overall_score <= 100);
        assert!((0.5..=1.0).contains(&report.confidence));
        assert_eq!(
            report.matched_keywords.len() + report.missing_keywords.len(),
            jd.skills.len() + jd.role_keywords.len()
        );
        assert_eq!(report.experience.total_years, resume.total_years_experience);
        assert_eq!(
            report.suggestions.file_recommendation,
            vec!["Upload PDF without images or a clean DOCX"]
        );
    }

    #[test]
    fn test_tiny_resume_flags_unparsable_content() {
        let (resume, jd) = parsed("Jane Doe, developer, nothing else", JD);
        let report = engine().score(&resume, &jd).unwrap();

        assert!(report.scores.formatting <= 70);
        assert_eq!(
            report.formatting_issues[0],
            "Resume appears to contain mostly images or non-parsable content"
        );
        assert!(report.overall_score < 60);
    }

    #[test]
    fn test_empty_jd_keyword_and_skills_are_100() {
        let (resume, jd) = parsed(RESUME, "");
        let report = engine().score(&resume, &jd).unwrap();
        assert_eq!(report.scores.keyword_match, 100);
        assert_eq!(report.scores.skills, 100);
        assert_eq!(report.scores.experience, 100);
    }

    #[test]
    fn test_adding_a_missing_keyword_never_lowers_keyword_score() {
        let jd = parse_jd(&normalize_text(JD));
        let without = ParsedResume {
            raw_text: "python developer".to_string(),
            ..ParsedResume::default()
        };
        let with = ParsedResume {
            raw_text: "python developer with kubernetes".to_string(),
            ..ParsedResume::default()
        };
        let before = engine().score(&without, &jd).unwrap().scores.keyword_match;
        let after = engine().score(&with, &jd).unwrap().scores.keyword_match;
        assert!(after >= before, "{after} < {before}");
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let (resume, jd) = parsed(RESUME, JD);
        let a = engine().score(&resume, &jd).unwrap();
        let b = engine().score(&resume, &jd).unwrap();
        assert_eq!(a.overall_score, b.overall_score);
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.explanations, b.explanations);
        assert_eq!(a.skills, b.skills);
    }

    #[test]
    fn test_out_of_range_sub_score_is_rejected() {
        let scores = ScoreBreakdown {
            skills: 101,
            ..ScoreBreakdown::default()
        };
        let err = validate(&scores).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::InvalidSubScore {
                name: "skills",
                value: 101
            }
        ));
    }
}
