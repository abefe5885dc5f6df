//! Confidence, suggestions and the plain-language explanation derived from the
//! sub-scores.

use crate::models::report::{Importance, ScoreBreakdown, SuggestionSet};
use crate::scoring::keywords::KeywordOutcome;

const BASE_CONFIDENCE: f64 = 0.8;
const MIN_CONFIDENCE: f64 = 0.5;
const MAX_CONFIDENCE: f64 = 1.0;

/// Sub-scores below this get an explanation sentence (and, for keywords, bullet
/// examples).
const WEAK_SCORE: u32 = 70;
const FORMATTING_ADVICE_BELOW: u32 = 80;

const FILE_RECOMMENDATION: &str = "Upload PDF without images or a clean DOCX";
const KEYWORD_BULLET_EXAMPLES: [&str; 2] = [
    "Instead of 'Built frontend', try 'Developed responsive React frontend with TypeScript'",
    "Instead of 'Managed database', try 'Designed and optimized PostgreSQL database schema'",
];
const FORMATTING_BULLET_EXAMPLES: [&str; 2] = [
    "Use bullet points (•) instead of dashes (-) for better ATS compatibility",
    "Ensure contact information is at the top and easily readable",
];

pub fn confidence(scores: &ScoreBreakdown) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    if scores.keyword_match == 0 || scores.skills == 0 {
        confidence -= 0.1;
    }
    if scores.experience == 0 {
        confidence -= 0.05;
    }
    if scores.formatting < 50 {
        confidence -= 0.1;
    }
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

pub fn suggestions(keywords: &KeywordOutcome, scores: &ScoreBreakdown) -> SuggestionSet {
    let keyword_insertions = keywords
        .missing()
        .filter_map(|missing| match missing.importance {
            Importance::Required => Some(format!(
                "Add '{}' to your resume - it's a required skill for this position",
                missing.keyword
            )),
            Importance::Preferred => Some(format!(
                "Consider adding '{}' to your resume - it's a preferred skill",
                missing.keyword
            )),
            Importance::NiceToHave => None,
        })
        .collect();

    let mut resume_bullet_examples = Vec::new();
    if scores.keyword_match < WEAK_SCORE {
        resume_bullet_examples.extend(KEYWORD_BULLET_EXAMPLES.map(String::from));
    }
    if scores.formatting < FORMATTING_ADVICE_BELOW {
        resume_bullet_examples.extend(FORMATTING_BULLET_EXAMPLES.map(String::from));
    }

    SuggestionSet {
        keyword_insertions,
        resume_bullet_examples,
        file_recommendation: vec![FILE_RECOMMENDATION.to_string()],
    }
}

pub fn explanations(
    overall: u32,
    scores: &ScoreBreakdown,
    missing_keywords: usize,
    missing_skills: usize,
) -> String {
    let headline = if overall >= 80 {
        "Excellent match! Your resume aligns very well with the job requirements."
    } else if overall >= 60 {
        "Good match with room for improvement. Focus on the areas below to increase your score."
    } else {
        "Your resume needs significant improvements to match this job description."
    };

    let mut sentences = vec![headline.to_string()];
    if scores.keyword_match < WEAK_SCORE {
        sentences.push(format!(
            "Keyword matching: {missing_keywords} important keywords are missing from your resume."
        ));
    }
    if scores.skills < WEAK_SCORE {
        sentences.push(format!(
            "Skills: {missing_skills} required skills are not found in your resume."
        ));
    }
    if scores.experience < WEAK_SCORE {
        sentences.push(
            "Experience: Your years of experience don't fully meet the job requirements."
                .to_string(),
        );
    }
    if scores.formatting < WEAK_SCORE {
        sentences.push(
            "Formatting: Your resume has some ATS compatibility issues that could affect parsing."
                .to_string(),
        );
    }
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::KeywordRecord;

    fn scores(keyword_match: u32, skills: u32, experience: u32, formatting: u32) -> ScoreBreakdown {
        ScoreBreakdown {
            keyword_match,
            skills,
            experience,
            education: 50,
            formatting,
        }
    }

    #[test]
    fn test_confidence_adjustments() {
        assert_eq!(confidence(&scores(100, 100, 100, 100)), 0.8);
        assert!((confidence(&scores(0, 100, 100, 100)) - 0.7).abs() < 1e-9);
        assert!((confidence(&scores(0, 0, 0, 10)) - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_always_in_range() {
        for k in [0, 50, 100] {
            for e in [0, 100] {
                for f in [0, 49, 50, 100] {
                    let c = confidence(&scores(k, k, e, f));
                    assert!((0.5..=1.0).contains(&c));
                }
            }
        }
    }

    #[test]
    fn test_suggestions_by_importance() {
        let keywords = KeywordOutcome {
            score: 30,
            records: vec![
                KeywordRecord {
                    keyword: "Python".to_string(),
                    importance: Importance::Required,
                    matched: false,
                },
                KeywordRecord {
                    keyword: "Docker".to_string(),
                    importance: Importance::Preferred,
                    matched: false,
                },
                KeywordRecord {
                    keyword: "Jira".to_string(),
                    importance: Importance::NiceToHave,
                    matched: false,
                },
                KeywordRecord {
                    keyword: "Sql".to_string(),
                    importance: Importance::Required,
                    matched: true,
                },
            ],
        };
        let set = suggestions(&keywords, &scores(30, 100, 100, 100));
        assert_eq!(
            set.keyword_insertions,
            vec![
                "Add 'Python' to your resume - it's a required skill for this position",
                "Consider adding 'Docker' to your resume - it's a preferred skill",
            ]
        );
        assert_eq!(set.resume_bullet_examples, KEYWORD_BULLET_EXAMPLES.to_vec());
        assert_eq!(set.file_recommendation, vec![FILE_RECOMMENDATION]);
    }

    #[test]
    fn test_formatting_advice_below_80() {
        let keywords = KeywordOutcome {
            score: 100,
            records: vec![],
        };
        let set = suggestions(&keywords, &scores(100, 100, 100, 75));
        assert_eq!(set.resume_bullet_examples, FORMATTING_BULLET_EXAMPLES.to_vec());
        assert!(set.keyword_insertions.is_empty());
    }

    #[test]
    fn test_explanations_headline_thresholds() {
        let strong = scores(100, 100, 100, 100);
        assert!(explanations(80, &strong, 0, 0).starts_with("Excellent match!"));
        assert!(explanations(60, &strong, 0, 0).starts_with("Good match"));
        assert!(explanations(59, &strong, 0, 0).starts_with("Your resume needs"));
        assert_eq!(
            explanations(80, &strong, 0, 0),
            "Excellent match! Your resume aligns very well with the job requirements."
        );
    }

    #[test]
    fn test_explanations_list_weak_areas() {
        let text = explanations(40, &scores(50, 60, 100, 55), 3, 2);
        assert_eq!(
            text,
            "Your resume needs significant improvements to match this job description. \
             Keyword matching: 3 important keywords are missing from your resume. \
             Skills: 2 required skills are not found in your resume. \
             Formatting: Your resume has some ATS compatibility issues that could affect parsing."
        );
    }
}
