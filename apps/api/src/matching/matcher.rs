//! Matcher: partitions the skills a job text mentions into matched / partial /
//! missing relative to a profile, and scores the overlap.
//!
//! Pure and deterministic: identical inputs give identical results, which the
//! cache relies on.

use std::collections::BTreeSet;

use crate::matching::experience::analyze_experience;
use crate::matching::suggestions::{build_insights, build_suggestions};
use crate::models::match_result::{ExperienceAnalysis, MatchResult, MatchSource, TopMatch};
use crate::models::profile::Profile;
use crate::skills::canonical::{canonicalize, normalize};
use crate::skills::dictionary::SkillDictionary;

/// Leading profile skills checked for a verbatim mention in the job text.
const TOP_MATCH_CANDIDATES: usize = 5;
const TOP_MATCH_STRENGTH: &str = "Strong match";
const TOP_MATCH_REASON: &str = "Directly mentioned in job requirements";

/// [`match_skills`] plus the profile-level extras: experience analysis
/// (which also feeds suggestions and insights) and top matches.
pub fn match_profile(
    profile: &Profile,
    job_text: &str,
    dictionary: &SkillDictionary,
) -> MatchResult {
    let experience = analyze_experience(&profile.experience, job_text);
    partition(&profile.skills, job_text, dictionary, Some(experience))
}

/// Computes a local [`MatchResult`] for `profile_skills` against `job_text`.
///
/// Algorithm:
/// 1. Canonicalize profile skills into a set (blanks dropped, repeats collapse).
/// 2. Detect dictionary skills in the job text (capped, dictionary order).
/// 3. Detected skill in the set → matched; related by substring containment of
///    normalized forms → partial; otherwise → missing.
/// 4. score = round(100 × (matched + partial) / max(detected, 1))
pub fn match_skills(
    profile_skills: &[String],
    job_text: &str,
    dictionary: &SkillDictionary,
) -> MatchResult {
    partition(profile_skills, job_text, dictionary, None)
}

fn partition(
    profile_skills: &[String],
    job_text: &str,
    dictionary: &SkillDictionary,
    experience: Option<ExperienceAnalysis>,
) -> MatchResult {
    let profile: BTreeSet<String> = profile_skills
        .iter()
        .map(|s| canonicalize(s))
        .filter(|s| !s.is_empty())
        .collect();
    let profile_normalized: Vec<String> = profile
        .iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect();

    let detected = dictionary.detect(job_text);

    let mut matched = Vec::new();
    let mut partial = Vec::new();
    let mut missing = Vec::new();

    for skill in detected {
        if profile.contains(&skill) {
            matched.push(skill);
            continue;
        }

        let skill_normalized = normalize(&skill);
        let related = !skill_normalized.is_empty()
            && profile_normalized
                .iter()
                .any(|p| p.contains(&skill_normalized) || skill_normalized.contains(p.as_str()));

        if related {
            partial.push(skill);
        } else {
            missing.push(skill);
        }
    }

    let matched_count = matched.len() + partial.len();
    let total_detected = matched_count + missing.len();
    let score = compute_score(matched_count, total_detected);

    MatchResult {
        score,
        suggestions: build_suggestions(score, &missing, experience.as_ref()),
        insights: build_insights(score, &partial, experience.as_ref()),
        top_matches: find_top_matches(profile_skills, job_text),
        experience,
        matched,
        partial,
        missing,
        matched_count,
        total_detected,
        source: MatchSource::Local,
    }
}

/// Of the first few profile skills, those whose raw spelling occurs anywhere
/// in the lowercased job text.
pub fn find_top_matches(profile_skills: &[String], job_text: &str) -> Vec<TopMatch> {
    let job = job_text.to_lowercase();
    profile_skills
        .iter()
        .take(TOP_MATCH_CANDIDATES)
        .map(|skill| skill.trim())
        .filter(|skill| !skill.is_empty() && job.contains(&skill.to_lowercase()))
        .map(|skill| TopMatch {
            skill: skill.to_string(),
            strength: TOP_MATCH_STRENGTH.to_string(),
            reason: TOP_MATCH_REASON.to_string(),
        })
        .collect()
}

/// round(100 × hits / max(total, 1)), never above 100.
pub fn compute_score(hits: usize, total: usize) -> u32 {
    let total = total.max(1);
    let hits = hits.min(total);
    ((hits as f64 * 100.0) / total as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn assert_partition(result: &MatchResult, detected: &[String]) {
        let mut union: Vec<String> = result
            .matched
            .iter()
            .chain(&result.partial)
            .chain(&result.missing)
            .cloned()
            .collect();
        assert_eq!(union.len(), detected.len(), "buckets overlap or drop skills");
        union.sort();
        let mut expected = detected.to_vec();
        expected.sort();
        assert_eq!(union, expected);
        assert_eq!(result.total_detected, detected.len());
        assert_eq!(
            result.matched_count,
            result.matched.len() + result.partial.len()
        );
    }

    #[test]
    fn test_python_react_postgres_scenario() {
        let dict = SkillDictionary::default();
        let job = "Looking for a Python developer with React and PostgreSQL experience";
        let result = match_skills(&skills(&["Python", "React.js", "SQL"]), job, &dict);

        let detected = dict.detect(job);
        for skill in ["python", "react", "postgresql"] {
            assert!(detected.contains(&skill.to_string()), "{skill} not detected");
        }
        assert!(result.matched.contains(&"python".to_string()));
        assert!(result.matched.contains(&"react".to_string()));
        assert!(!result.matched.contains(&"postgresql".to_string()));
        // "postgresql" contains the profile's "sql", so it is related, not exact.
        assert!(result.partial.contains(&"postgresql".to_string()));
        assert_partition(&result, &detected);
        assert_eq!(result.source, MatchSource::Local);
    }

    #[test]
    fn test_unrelated_skill_is_missing() {
        let dict = SkillDictionary::default();
        let job = "Backend role: Rust services deployed on Kubernetes";
        let result = match_skills(&skills(&["Rust"]), job, &dict);
        assert_eq!(result.matched, vec!["rust"]);
        assert_eq!(result.missing, vec!["kubernetes"]);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_empty_job_text_scores_zero() {
        let dict = SkillDictionary::default();
        let result = match_skills(&skills(&["Python"]), "", &dict);
        assert_eq!(result.score, 0);
        assert_eq!(result.total_detected, 0);
        assert!(result.matched.is_empty());
        assert!(result.partial.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_empty_profile_marks_everything_missing() {
        let dict = SkillDictionary::default();
        let job = "Python, Docker and AWS experience required";
        let result = match_skills(&[], job, &dict);
        assert_eq!(result.missing, vec!["python", "aws", "docker"]);
        assert!(result.matched.is_empty());
        assert!(result.partial.is_empty());
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_duplicate_and_cased_profile_skills_collapse() {
        let dict = SkillDictionary::default();
        let job = "NodeJS engineer with Docker";
        let result = match_skills(
            &skills(&["NodeJS", "node.js", "Node.js (expert)", "docker", "Docker"]),
            job,
            &dict,
        );
        assert_eq!(result.matched, vec!["nodejs", "docker"]);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_blank_profile_skills_never_count_as_partial() {
        let dict = SkillDictionary::default();
        let result = match_skills(&skills(&["", "  ", "++"]), "Python role", &dict);
        assert_eq!(result.missing, vec!["python"]);
        assert!(result.partial.is_empty());
    }

    #[test]
    fn test_partition_holds_for_various_inputs() {
        let dict = SkillDictionary::default();
        let cases = [
            (vec!["Java", "Kotlin"], "JavaScript and Kotlin developers, Swift nice to have"),
            (vec!["Machine Learning", "pandas"], "ML engineer: PyTorch, NumPy, pandas, SQL"),
            (vec!["Go"], "Golang services on GCP with Terraform and Git"),
            (vec![], "Nothing technical at all here"),
        ];
        for (profile, job) in cases {
            let result = match_skills(&skills(&profile), job, &dict);
            assert_partition(&result, &dict.detect(job));
            assert!(result.score <= 100);
        }
    }

    #[test]
    fn test_match_is_deterministic() {
        let dict = SkillDictionary::default();
        let profile = skills(&["Python", "AWS", "Terraform"]);
        let job = "Cloud engineer: AWS, Azure, Terraform, Python, Kubernetes, Docker";
        let a = serde_json::to_string(&match_skills(&profile, job, &dict)).unwrap();
        let b = serde_json::to_string(&match_skills(&profile, job, &dict)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_match_profile_attaches_experience() {
        let dict = SkillDictionary::default();
        let profile = Profile {
            skills: skills(&["Python", "Docker"]),
            experience: vec![serde_json::json!({"title": "Engineer", "years": 1})],
            ..Default::default()
        };
        let job = "Python and Kubernetes engineer with 3+ years of experience";
        let result = match_profile(&profile, job, &dict);

        let experience = result.experience.as_ref().unwrap();
        assert_eq!(experience.required_experience, 3);
        assert!(!experience.sufficient);
        assert!(result
            .suggestions
            .contains(&"Gain 2 more years of relevant experience".to_string()));
        assert!(result
            .insights
            .contains(&"Your experience level is below the required amount".to_string()));
        assert_eq!(result.top_matches.len(), 1);
        assert_eq!(result.top_matches[0].skill, "Python");

        // Skill buckets are those of the plain matcher.
        let plain = match_skills(&profile.skills, job, &dict);
        assert_eq!(result.matched, plain.matched);
        assert_eq!(result.score, plain.score);
        assert!(plain.experience.is_none());
    }

    #[test]
    fn test_top_matches_only_checks_leading_skills() {
        let profile = skills(&["Go", "", "SQL", "Java", "Kafka", "Rust"]);
        let top = find_top_matches(&profile, "Rust and Kafka services, SQL reporting");
        let names: Vec<&str> = top.iter().map(|t| t.skill.as_str()).collect();
        assert_eq!(names, vec!["SQL", "Kafka"]);
        assert_eq!(top[0].strength, "Strong match");
    }

    #[test]
    fn test_compute_score_rounding_and_bounds() {
        assert_eq!(compute_score(2, 3), 67);
        assert_eq!(compute_score(1, 3), 33);
        assert_eq!(compute_score(0, 0), 0);
        assert_eq!(compute_score(5, 5), 100);
        assert_eq!(compute_score(7, 5), 100);
    }
}
