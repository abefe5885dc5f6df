//! Keyword-match sub-score: every JD skill and role keyword gets an importance
//! tier from its surrounding text, then is looked up in the resume.

use crate::extraction::normalize::char_window;
use crate::models::jd::ParsedJD;
use crate::models::report::{Importance, KeywordRecord};
use crate::models::resume::ParsedResume;
use crate::scoring::synonyms::{partial_ratio, synonyms_of};

/// Characters inspected on each side of a keyword's first occurrence.
const IMPORTANCE_CONTEXT_CHARS: usize = 50;
const REQUIRED_MARKERS: &[&str] = &["required", "must", "essential", "mandatory"];
const PREFERRED_MARKERS: &[&str] = &["preferred", "desired", "nice to have", "bonus"];
/// A fuzzy match must score strictly above this.
const FUZZY_THRESHOLD: u32 = 80;

const REQUIRED_POINTS: f64 = 50.0;
const PREFERRED_POINTS: f64 = 30.0;
const NICE_TO_HAVE_POINTS: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordOutcome {
    pub score: u32,
    pub records: Vec<KeywordRecord>,
}

impl KeywordOutcome {
    pub fn matched(&self) -> impl Iterator<Item = &KeywordRecord> {
        self.records.iter().filter(|r| r.matched)
    }

    pub fn missing(&self) -> impl Iterator<Item = &KeywordRecord> {
        self.records.iter().filter(|r| !r.matched)
    }
}

pub fn score_keywords(resume: &ParsedResume, jd: &ParsedJD) -> KeywordOutcome {
    let jd_text = jd.raw_text.to_lowercase();
    let resume_text = resume.raw_text.to_lowercase();

    let records: Vec<KeywordRecord> = jd
        .skills
        .iter()
        .chain(&jd.role_keywords)
        .map(|keyword| KeywordRecord {
            keyword: keyword.clone(),
            importance: keyword_importance(keyword, &jd_text),
            matched: keyword_present(keyword, &resume_text),
        })
        .collect();

    KeywordOutcome {
        score: tiered_score(&records),
        records,
    }
}

/// Tier from marker words within the context window around the keyword's
/// first occurrence in `jd_text` (already lowercase). A keyword that never
/// occurs is judged on the head of the text.
pub fn keyword_importance(keyword: &str, jd_text: &str) -> Importance {
    let keyword = keyword.to_lowercase();
    let context = match jd_text.find(&keyword) {
        Some(start) => char_window(
            jd_text,
            start,
            start + keyword.len(),
            IMPORTANCE_CONTEXT_CHARS,
            IMPORTANCE_CONTEXT_CHARS,
        ),
        None => {
            let head_chars = (keyword.chars().count() + IMPORTANCE_CONTEXT_CHARS).saturating_sub(1);
            char_window(jd_text, 0, 0, 0, head_chars)
        }
    };

    if REQUIRED_MARKERS.iter().any(|m| context.contains(m)) {
        Importance::Required
    } else if PREFERRED_MARKERS.iter().any(|m| context.contains(m)) {
        Importance::Preferred
    } else {
        Importance::NiceToHave
    }
}

/// Exact substring, then fuzzy partial match, then any synonym substring.
/// `resume_text` must already be lowercase.
pub fn keyword_present(keyword: &str, resume_text: &str) -> bool {
    let keyword = keyword.to_lowercase();
    resume_text.contains(&keyword)
        || partial_ratio(&keyword, resume_text) > FUZZY_THRESHOLD
        || synonyms_of(&keyword).iter().any(|s| resume_text.contains(s))
}

/// Matched share of each tier weighted 50/30/20; tiers with no keywords add
/// nothing. No keywords at all scores 100.
fn tiered_score(records: &[KeywordRecord]) -> u32 {
    if records.is_empty() {
        return 100;
    }

    let tier = |importance: Importance, points: f64| {
        let (total, matched) = records
            .iter()
            .filter(|r| r.importance == importance)
            .fold((0usize, 0usize), |(t, m), r| (t + 1, m + usize::from(r.matched)));
        if total == 0 {
            0.0
        } else {
            matched as f64 / total as f64 * points
        }
    };

    let score = tier(Importance::Required, REQUIRED_POINTS)
        + tier(Importance::Preferred, PREFERRED_POINTS)
        + tier(Importance::NiceToHave, NICE_TO_HAVE_POINTS);
    score as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(importance: Importance, matched: bool) -> KeywordRecord {
        KeywordRecord {
            keyword: "k".to_string(),
            importance,
            matched,
        }
    }

    fn jd(skills: &[&str], roles: &[&str], text: &str) -> ParsedJD {
        ParsedJD {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            role_keywords: roles.iter().map(|s| s.to_string()).collect(),
            raw_text: text.to_string(),
            ..ParsedJD::default()
        }
    }

    fn resume(text: &str) -> ParsedResume {
        ParsedResume {
            raw_text: text.to_string(),
            ..ParsedResume::default()
        }
    }

    #[test]
    fn test_importance_from_context() {
        let text = "python is required for this role. \
                    we work mostly on internal tooling and data pipelines every day. \
                    docker experience preferred. \
                    we also like people who enjoy writing documentation and mentoring others. \
                    kafka would be fun.";
        assert_eq!(keyword_importance("Python", text), Importance::Required);
        assert_eq!(keyword_importance("Docker", text), Importance::Preferred);
        assert_eq!(keyword_importance("Kafka", text), Importance::NiceToHave);
    }

    #[test]
    fn test_importance_of_absent_keyword_uses_head_of_text() {
        assert_eq!(keyword_importance("Rust", "must have a pulse"), Importance::Required);
    }

    #[test]
    fn test_presence_exact_fuzzy_and_synonym() {
        let text = "ran kubernetas clusters on amazon web services";
        assert!(keyword_present("Kubernetes", text));
        assert!(keyword_present("AWS", text));
        assert!(!keyword_present("Kafka", text));
        assert!(keyword_present("clusters", text));
    }

    #[test]
    fn test_tiered_score_weights() {
        let records = vec![
            record(Importance::Required, true),
            record(Importance::Required, false),
            record(Importance::Preferred, true),
            record(Importance::NiceToHave, false),
        ];
        // 25 + 30 + 0
        assert_eq!(tiered_score(&records), 55);
    }

    #[test]
    fn test_missing_tiers_cap_the_score() {
        // only nice-to-have keywords: best possible is 20
        let records = vec![record(Importance::NiceToHave, true)];
        assert_eq!(tiered_score(&records), 20);
    }

    #[test]
    fn test_all_required_missing_scores_zero() {
        let outcome = score_keywords(
            &resume("java developer"),
            &jd(&["Python", "Sql"], &[], "python and sql are required"),
        );
        assert!(outcome
            .records
            .iter()
            .all(|r| r.importance == Importance::Required && !r.matched));
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_no_keywords_scores_100() {
        let outcome = score_keywords(&resume("anything"), &jd(&[], &[], ""));
        assert_eq!(outcome.score, 100);
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn test_skills_then_roles_in_order() {
        let text = "required: python and sql. senior engineer.";
        let outcome = score_keywords(
            &resume("python developer"),
            &jd(&["Python", "Sql"], &["Engineer", "Senior"], text),
        );
        let keywords: Vec<&str> = outcome.records.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["Python", "Sql", "Engineer", "Senior"]);
        assert_eq!(
            outcome.matched().map(|r| r.keyword.as_str()).collect::<Vec<_>>(),
            vec!["Python"]
        );
        assert_eq!(outcome.missing().count(), 3);
    }
}
