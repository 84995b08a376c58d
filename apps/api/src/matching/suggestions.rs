//! Human-readable advice attached to match results.

use crate::models::match_result::ExperienceAnalysis;

const MAX_SUGGESTIONS: usize = 5;

const GENERAL_ADVICE: &[&str] = &[
    "Add specific project examples that demonstrate required skills",
    "Include quantifiable achievements in your experience section",
    "Use industry-specific keywords from the job description",
    "Obtain relevant certifications for missing technical skills",
];

/// Top improvement suggestions: the three most relevant missing skills when
/// the score is below 80, an experience gap when there is one, then general
/// advice. At most five entries.
pub fn build_suggestions(
    score: u32,
    missing: &[String],
    experience: Option<&ExperienceAnalysis>,
) -> Vec<String> {
    let mut suggestions = Vec::with_capacity(MAX_SUGGESTIONS);

    if score < 80 && !missing.is_empty() {
        let top_missing: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();
        suggestions.push(format!("Learn these key skills: {}", top_missing.join(", ")));
    }

    if let Some(experience) = experience.filter(|e| e.score < 100) {
        let gap = f64::from(experience.required_experience) - experience.your_experience;
        if gap > 0.0 {
            suggestions.push(format!("Gain {gap} more years of relevant experience"));
        } else {
            suggestions
                .push("Highlight your experience more prominently in your profile".to_string());
        }
    }

    suggestions.extend(GENERAL_ADVICE.iter().map(|s| s.to_string()));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Short observations about how the skills and experience line up.
pub fn build_insights(
    score: u32,
    partial: &[String],
    experience: Option<&ExperienceAnalysis>,
) -> Vec<String> {
    let mut insights = Vec::new();

    if score >= 80 {
        insights.push("Your skills strongly align with the job requirements".to_string());
    } else if score >= 60 {
        insights.push("You have a good foundation of required skills".to_string());
    } else {
        insights.push("Consider developing more of the required skills".to_string());
    }

    match experience {
        Some(e) if e.sufficient => {
            insights.push("Your experience level meets or exceeds requirements".to_string())
        }
        Some(_) => insights.push("Your experience level is below the required amount".to_string()),
        None => {}
    }

    if !partial.is_empty() {
        insights.push(format!(
            "Related experience counts toward: {}. Name these skills explicitly in your profile.",
            partial.join(", ")
        ));
    }

    insights
}
