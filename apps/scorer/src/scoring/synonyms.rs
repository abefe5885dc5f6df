//! Skill synonym table and fuzzy substring matching.

/// Canonical lowercase skill → alternative spellings and related terms.
pub const SKILL_SYNONYMS: &[(&str, &[&str])] = &[
    ("aws", &["amazon web services", "amazon", "ec2", "s3", "lambda"]),
    ("javascript", &["js", "ecmascript"]),
    ("python", &["py"]),
    ("react", &["reactjs", "react.js"]),
    ("node.js", &["nodejs", "node"]),
    ("typescript", &["ts"]),
    ("html", &["html5"]),
    ("css", &["css3"]),
    ("sql", &["mysql", "postgresql", "postgres", "oracle", "sql server"]),
    ("docker", &["containerization"]),
    ("kubernetes", &["k8s", "kube"]),
    ("git", &["version control", "github", "gitlab"]),
    ("agile", &["scrum", "kanban", "lean"]),
    ("machine learning", &["ml", "ai", "artificial intelligence"]),
    ("data science", &["data analytics", "data analysis"]),
];

/// Synonyms for a lowercase canonical skill; empty if it has none.
pub fn synonyms_of(skill: &str) -> &'static [&'static str] {
    SKILL_SYNONYMS
        .iter()
        .find(|(canonical, _)| *canonical == skill)
        .map(|(_, synonyms)| *synonyms)
        .unwrap_or(&[])
}

/// Best similarity (0–100) between the shorter string and any equally long
/// character window of the longer one. Empty input scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u32 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let window = short.chars().count();
    if window == 0 {
        return 0;
    }

    // byte offset of every char boundary in `long`, including the end
    let bounds: Vec<usize> = long
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(long.len()))
        .collect();
    let windows = bounds.len() - window;

    let best = (0..windows)
        .map(|start| strsim::normalized_levenshtein(short, &long[bounds[start]..bounds[start + window]]))
        .fold(0.0f64, f64::max);
    (best * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_lookup() {
        assert_eq!(synonyms_of("kubernetes"), &["k8s", "kube"]);
        assert!(synonyms_of("rust").is_empty());
        // lookups are on lowercase canonical names only
        assert!(synonyms_of("AWS").is_empty());
    }

    #[test]
    fn test_partial_ratio_exact_substring_is_100() {
        assert_eq!(partial_ratio("docker", "we ship docker images"), 100);
    }

    #[test]
    fn test_partial_ratio_one_typo() {
        // one substitution in ten characters
        assert_eq!(partial_ratio("kubernetes", "ran kubernetas clusters"), 90);
    }

    #[test]
    fn test_partial_ratio_unrelated() {
        assert!(partial_ratio("kafka", "python developer") <= 80);
    }

    #[test]
    fn test_partial_ratio_is_symmetric_and_handles_empty() {
        assert_eq!(partial_ratio("abc", "xxabcxx"), partial_ratio("xxabcxx", "abc"));
        assert_eq!(partial_ratio("", "anything"), 0);
    }
}
