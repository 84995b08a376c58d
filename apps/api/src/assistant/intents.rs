//! Rule-based follow-up assistant.
//!
//! A message is classified by an ordered table of (predicate, intent) rules;
//! the first rule whose predicate holds wins. Replies are templated from the
//! last match result. No state is kept between calls.

use serde::Serialize;

use crate::models::match_result::MatchResult;

const TOP_MISSING: usize = 5;

const ASK_IMPROVE: &str = "How can I improve my match?";
const ASK_MATCHED: &str = "Which skills match?";
const ASK_MISSING: &str = "What skills am I missing?";
const ASK_SCORE: &str = "Explain my score";
const ASK_SUMMARY: &str = "Summarize this job for me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Improve,
    MatchedSkills,
    MissingSkills,
    Score,
    General,
}

struct Rule {
    intent: Intent,
    applies: fn(&str) -> bool,
}

/// Evaluated top to bottom; `General` is the fallback when nothing applies.
const RULES: &[Rule] = &[
    Rule {
        intent: Intent::Improve,
        applies: asks_to_improve,
    },
    Rule {
        intent: Intent::MatchedSkills,
        applies: asks_for_matches,
    },
    Rule {
        intent: Intent::MissingSkills,
        applies: asks_for_missing,
    },
    Rule {
        intent: Intent::Score,
        applies: asks_about_score,
    },
];

// Predicates receive the lowercased message.
fn asks_to_improve(m: &str) -> bool {
    m.contains("improve") || m.contains("better")
}

fn asks_for_matches(m: &str) -> bool {
    m.contains("skill") && m.contains("match")
}

fn asks_for_missing(m: &str) -> bool {
    m.contains("missing")
}

fn asks_about_score(m: &str) -> bool {
    m.contains("score")
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssistantReply {
    pub reply: String,
    pub quick_replies: Vec<String>,
}

pub fn classify(message: &str) -> Intent {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.applies)(&lowered))
        .map_or(Intent::General, |rule| rule.intent)
}

pub fn respond(message: &str, last_match: &MatchResult) -> AssistantReply {
    let intent = classify(message);
    AssistantReply {
        reply: reply_for(intent, last_match),
        quick_replies: quick_replies_for(intent)
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

fn reply_for(intent: Intent, m: &MatchResult) -> String {
    let score = m.score;
    match intent {
        Intent::Improve => {
            if m.missing.is_empty() {
                format!(
                    "Your match score is {score}%. You already cover every skill this job mentions, \
                     so focus on showing impact: quantify results and name these skills in your recent roles."
                )
            } else {
                let top: Vec<&str> = m
                    .missing
                    .iter()
                    .take(TOP_MISSING)
                    .map(String::as_str)
                    .collect();
                format!(
                    "Your match score is {score}%. To improve it, build experience with: {}. \
                     Adding projects or certifications that show these skills will raise your score.",
                    top.join(", ")
                )
            }
        }
        Intent::MatchedSkills => {
            if m.matched.is_empty() && m.partial.is_empty() {
                "None of the skills this job mentions appear in your profile yet.".to_string()
            } else if m.partial.is_empty() {
                format!("Your matching skills: {}.", m.matched.join(", "))
            } else if m.matched.is_empty() {
                format!("Related skills in your profile: {}.", m.partial.join(", "))
            } else {
                format!(
                    "Your matching skills: {}. Related skills: {}.",
                    m.matched.join(", "),
                    m.partial.join(", ")
                )
            }
        }
        Intent::MissingSkills => {
            if m.missing.is_empty() {
                "You're not missing any of the skills this job mentions.".to_string()
            } else {
                format!(
                    "Skills this job asks for that your profile lacks: {}.",
                    m.missing.join(", ")
                )
            }
        }
        Intent::Score => format!(
            "Your match score is {score}%: {} of {} detected skills are covered by your profile.",
            m.matched_count, m.total_detected
        ),
        Intent::General => format!(
            "Your match score for this job is {score}%. Ask me how to improve it, \
             which skills match, or what's missing."
        ),
    }
}

fn quick_replies_for(intent: Intent) -> [&'static str; 4] {
    match intent {
        Intent::Improve => [ASK_MATCHED, ASK_MISSING, ASK_SCORE, ASK_SUMMARY],
        Intent::MatchedSkills => [ASK_IMPROVE, ASK_MISSING, ASK_SCORE, ASK_SUMMARY],
        Intent::MissingSkills => [ASK_IMPROVE, ASK_MATCHED, ASK_SCORE, ASK_SUMMARY],
        Intent::Score => [ASK_IMPROVE, ASK_MATCHED, ASK_MISSING, ASK_SUMMARY],
        Intent::General => [ASK_IMPROVE, ASK_MATCHED, ASK_MISSING, ASK_SCORE],
    }
}
