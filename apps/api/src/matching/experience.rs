//! Experience-level check: summed profile years against the years a job text asks for.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::match_result::ExperienceAnalysis;

/// Requirement phrasings, tried in order. The first pattern with any match
/// decides, taking the largest number it captured.
static YEAR_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        r"(\d+)\+?\s*years?",
        r"(\d+)\s*-\s*(\d+)\s*years?",
        r"at least\s*(\d+)\s*years?",
    ]
    .map(|pattern| Regex::new(pattern).expect("year pattern is valid"))
});

pub fn analyze_experience(experience: &[Value], job_text: &str) -> ExperienceAnalysis {
    let total = total_years(experience);
    let required = required_years(job_text);

    let score = if required == 0 {
        100
    } else {
        (total / f64::from(required) * 100.0).min(100.0).round() as u32
    };

    ExperienceAnalysis {
        score,
        your_experience: total,
        required_experience: required,
        sufficient: total >= f64::from(required),
    }
}

/// Sum of the `years` fields across experience entries. Numeric strings count;
/// missing, negative or non-numeric values are ignored.
pub fn total_years(experience: &[Value]) -> f64 {
    experience
        .iter()
        .filter_map(|entry| entry.get("years"))
        .filter_map(|years| match years {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|years| years.is_finite() && *years > 0.0)
        .sum()
}

/// Years of experience the job text asks for; 0 when it names none.
pub fn required_years(job_text: &str) -> u32 {
    let lowered = job_text.to_lowercase();
    YEAR_PATTERNS
        .iter()
        .find_map(|re| {
            re.captures_iter(&lowered)
                .flat_map(|caps| {
                    caps.iter()
                        .skip(1)
                        .flatten()
                        .filter_map(|m| m.as_str().parse::<u32>().ok())
                        .collect::<Vec<_>>()
                })
                .max()
        })
        .unwrap_or(0)
}
