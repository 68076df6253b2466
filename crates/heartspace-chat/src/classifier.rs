//! Keyword intent classifier.
//!
//! Lowercases the input and walks a fixed, ordered rule table. The first
//! rule with a keyword contained in the text decides the [`Topic`]; when
//! nothing matches the result is [`Topic::Default`]. Classification never
//! fails.

use crate::types::{Classification, Topic};

// =============================================================================
// Rule table
// =============================================================================

/// One row of the rule table: a topic and the substrings that trigger it.
#[derive(Debug)]
pub struct TopicRule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
}

// Declaration order is the priority order. Keyword sets overlap ("burnout"
// is both a self-care and a work trigger) and earlier rows win.
static TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        topic: Topic::SelfCare,
        keywords: &[
            "self-care",
            "self care",
            "selfcare",
            "burnout",
            "burned out",
            "burnt out",
            "pamper",
            "me time",
        ],
    },
    TopicRule {
        topic: Topic::Work,
        keywords: &[
            "work", "job", "boss", "deadline", "career", "office", "coworker", "burnout",
        ],
    },
    TopicRule {
        topic: Topic::Anxiety,
        keywords: &["anxi", "panic", "worried", "worry", "nervous", "on edge"],
    },
    TopicRule {
        topic: Topic::Loneliness,
        keywords: &["lonely", "alone", "isolated", "nobody", "no one", "left out"],
    },
    TopicRule {
        topic: Topic::Sleep,
        keywords: &["sleep", "insomnia", "tired", "exhausted", "nightmare"],
    },
    TopicRule {
        topic: Topic::Relationships,
        keywords: &[
            "relationship",
            "partner",
            "boyfriend",
            "girlfriend",
            "husband",
            "wife",
            "breakup",
            "break up",
            "family",
            "friend",
        ],
    },
    TopicRule {
        topic: Topic::Gratitude,
        keywords: &["grateful", "gratitude", "thankful", "appreciate", "blessed"],
    },
    TopicRule {
        topic: Topic::Overwhelmed,
        keywords: &["overwhelm", "stress", "too much"],
    },
    TopicRule {
        topic: Topic::Positive,
        keywords: &["positive", "good", "happy"],
    },
    TopicRule {
        topic: Topic::Relax,
        keywords: &["relax", "calm", "peace"],
    },
    TopicRule {
        topic: Topic::Difficult,
        keywords: &["difficult", "hard", "tough", "bad day"],
    },
    TopicRule {
        topic: Topic::Breathing,
        keywords: &["breath"],
    },
    TopicRule {
        topic: Topic::Motivation,
        keywords: &["motivat", "inspire", "encourage"],
    },
];

// =============================================================================
// Classifier
// =============================================================================

/// Stateless keyword classifier over the static rule table.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify `text` into a topic.
    pub fn classify(&self, text: &str) -> Topic {
        self.explain(text).topic
    }

    /// Classify `text` and report which keyword decided it.
    pub fn explain(&self, text: &str) -> Classification {
        let lowered = text.to_lowercase();
        TOPIC_RULES
            .iter()
            .find_map(|rule| {
                rule.keywords
                    .iter()
                    .find(|kw| lowered.contains(*kw))
                    .map(|kw| Classification {
                        topic: rule.topic,
                        keyword: Some(*kw),
                    })
            })
            .unwrap_or(Classification {
                topic: Topic::Default,
                keyword: None,
            })
    }

    /// The rule table in priority order.
    pub fn rules(&self) -> &'static [TopicRule] {
        TOPIC_RULES
    }
}
