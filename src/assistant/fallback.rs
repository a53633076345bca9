//! Deterministic replies used when no language model answers.

use crate::models::ChatContext;
use rand::seq::IndexedRandom;

const GREETINGS: &[&str] = &["hello", "hi", "hey", "greetings"];
const THANKS: &[&str] = &["thank", "thanks", "appreciate"];

const KEYWORD_REPLIES: &[(&str, &str)] = &[
    ("learn", "Learning new skills takes time and practice. "),
    ("difficult", "Challenging topics can be tough, but don't give up! "),
    ("help", "I'm here to help you with your learning journey. "),
    ("recommend", "Based on your profile, I'd recommend focusing on "),
    ("what", "That's a great question! "),
];

const DEFAULT_REPLY: &str = "I understand you're asking about your learning path. ";

const CLOSINGS: &[&str] = &[
    "Would you like me to elaborate on any of these points?",
    "How can I assist you further with your learning goals?",
    "Is there anything specific you'd like to know more about?",
    "Would you like me to suggest some learning resources?",
];

const LEARNING_WORDS: &[&str] = &["learn", "study", "skill"];

const LEARNING_SUGGESTIONS: &[&str] = &[
    "What are the prerequisites for this topic?",
    "How long will it take to learn this?",
    "Can you recommend learning resources?",
];

const GENERAL_SUGGESTIONS: &[&str] = &[
    "What's the best way to track my progress?",
    "How can I stay motivated while learning?",
    "Can you explain this in simpler terms?",
    "What are some practical projects I can work on?",
];

pub const SUGGESTION_COUNT: usize = 3;

/// Greetings match whole words so "this" or "which" are not read as "hi".
fn has_word(message: &str, words: &[&str]) -> bool {
    message
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| words.contains(&w))
}

pub fn local_reply(message: &str, context: &ChatContext) -> String {
    let lower = message.to_lowercase();
    if has_word(&lower, GREETINGS) {
        return "Hello! I'm your learning assistant. How can I help you with your learning journey today?".into();
    }
    if THANKS.iter().any(|t| lower.contains(t)) {
        return "You're welcome! Is there anything else I can help you with?".into();
    }

    let mut reply: String = KEYWORD_REPLIES
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|(_, text)| *text)
        .collect();
    if reply.is_empty() {
        reply.push_str(DEFAULT_REPLY);
    }

    if let Some(latest) = context.latest() {
        if let Some(job) = latest.recommended_job_roles.first() {
            reply.push_str(&format!("I see you're interested in {}. ", job));
        }
        if let Some(step) = latest.pathway.first() {
            reply.push_str(&format!("Your next step is to {}. ", step.description));
        }
    }

    let closing = CLOSINGS.choose(&mut rand::rng()).copied().unwrap_or(CLOSINGS[0]);
    reply.push_str(closing);
    reply
}

/// Exactly three follow-up questions.
pub fn suggested_responses(message: &str, context: &ChatContext) -> Vec<String> {
    let lower = message.to_lowercase();
    let mut suggestions: Vec<String> = Vec::new();

    if LEARNING_WORDS.iter().any(|w| lower.contains(w)) {
        suggestions.extend(LEARNING_SUGGESTIONS.iter().map(|s| s.to_string()));
    }
    if let Some(latest) = context.latest() {
        if let Some(job) = latest.recommended_job_roles.first() {
            suggestions.push(format!("What skills do I need to become a {}?", job));
        }
        if let Some(step) = latest.pathway.first() {
            suggestions.push(format!("Tell me more about {}", step.title));
        }
    }
    for general in GENERAL_SUGGESTIONS {
        if suggestions.len() >= SUGGESTION_COUNT {
            break;
        }
        if !suggestions.iter().any(|s| s == general) {
            suggestions.push(general.to_string());
        }
    }
    suggestions.truncate(SUGGESTION_COUNT);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContextRecommendation, PathwayStep, StepKind};
    use pretty_assertions::assert_eq;

    fn context() -> ChatContext {
        ChatContext {
            recommendations: Some(vec![ContextRecommendation {
                recommended_job_roles: vec!["Data Analyst".into(), "Data Scientist".into()],
                pathway: vec![PathwayStep {
                    step: "Foundational".into(),
                    title: "Diploma".into(),
                    description: "Build fundamental knowledge with Diploma".into(),
                    duration_weeks: 12,
                    kind: StepKind::Course,
                    level: 5,
                }],
                generated_at: "2024-01-01T00:00:00Z".into(),
            }]),
            profile: None,
        }
    }

    fn ends_with_closing(reply: &str) -> bool {
        CLOSINGS.iter().any(|c| reply.ends_with(c))
    }

    #[test]
    fn greets_and_thanks() {
        assert!(local_reply("Hi!", &ChatContext::default()).starts_with("Hello!"));
        assert_eq!(
            local_reply("thanks a lot", &ChatContext::default()),
            "You're welcome! Is there anything else I can help you with?"
        );
        assert!(!local_reply("which course next", &ChatContext::default()).starts_with("Hello!"));
    }

    #[test]
    fn keyword_fragments_are_joined_in_order() {
        let reply = local_reply("What should I learn?", &ChatContext::default());
        assert!(reply.starts_with("Learning new skills takes time and practice. That's a great question! "));
        assert!(ends_with_closing(&reply));
    }

    #[test]
    fn default_reply_mentions_context() {
        let reply = local_reply("pathway status", &context());
        assert!(reply.starts_with(
            "I understand you're asking about your learning path. I see you're interested in Data Analyst. \
             Your next step is to Build fundamental knowledge with Diploma. "
        ));
        assert!(ends_with_closing(&reply));
    }

    #[test]
    fn suggestions_without_context_fill_from_general() {
        assert_eq!(
            suggested_responses("ok", &ChatContext::default()),
            vec![
                "What's the best way to track my progress?",
                "How can I stay motivated while learning?",
                "Can you explain this in simpler terms?",
            ]
        );
    }

    #[test]
    fn suggestions_prefer_learning_then_context() {
        let s = suggested_responses("I want to learn", &context());
        assert_eq!(s.len(), 3);
        assert_eq!(s[0], "What are the prerequisites for this topic?");

        let s = suggested_responses("status", &context());
        assert_eq!(
            s,
            vec![
                "What skills do I need to become a Data Analyst?",
                "Tell me more about Diploma",
                "What's the best way to track my progress?",
            ]
        );
    }
}
