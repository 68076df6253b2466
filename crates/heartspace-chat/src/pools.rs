//! Static reply pools and the random reply selector.

use rand::Rng;

use crate::types::Topic;

/// First message of every transcript.
pub const WELCOME_MESSAGE: &str = "Hello, beautiful soul! 💖 I'm HeartBot, your emotional support companion. I'm here to listen, comfort, and guide you through whatever you're feeling. What's on your heart today?";

/// Prompts offered to the user before they type anything.
pub const SUGGESTED_PROMPTS: [&str; 6] = [
    "I'm feeling overwhelmed",
    "I need something positive to read",
    "Help me relax",
    "I'm having a difficult day",
    "Can you guide me through breathing?",
    "I need motivation",
];

const ANXIETY: &[&str] = &[
    "Anxiety can feel so loud, but you are safe right now. Name five things you can see around you, and let your mind settle on each one. 🌿",
    "Those worried thoughts are not facts. Let's slow down together: breathe in for 4, out for 6, and remind yourself that this feeling will pass. 💙",
    "It makes sense that you feel on edge. You don't have to solve everything tonight. What is one worry we can set down for now? 🕊️",
];

const LONELINESS: &[&str] = &[
    "Feeling alone is so painful, and I'm really glad you reached out. You're not alone right now, I'm right here with you. 💖",
    "Loneliness doesn't mean you're unlovable. It means you deserve connection, and you can take one small step toward it today. 🌸",
    "Is there someone you could send a simple hello to today? Even a tiny connection can warm the heart. Until then, I'm here. 🤗",
];

const SLEEP: &[&str] = &[
    "Rest is not a reward, it's a need. Try dimming the lights, putting your phone away, and letting your breath grow slow and heavy. 🌙",
    "When sleep won't come, be gentle with yourself. Lying quietly and resting your body still counts for something. 💤",
    "Try a body scan: relax your toes, then your legs, your belly, your shoulders, your face. Let each part sink into the bed. ✨",
];

const WORK: &[&str] = &[
    "Work can ask so much of us. Remember that your worth is not measured by your productivity. 💼💙",
    "Can you take a short break, even just two minutes, to stretch and breathe? Pressure feels lighter after a pause. 🌿",
    "One task at a time is enough. What is the single most important thing you can do next, and what can wait? 🌟",
];

const RELATIONSHIPS: &[&str] = &[
    "Relationships can be beautiful and hard at the same time. Your feelings about this are valid. 💞",
    "It's okay to need space, and it's okay to need closeness. What do you need most from the people around you right now? 🌸",
    "Healthy connection starts with how you treat yourself. Be as kind to yourself as you would be to someone you love. 💖",
];

const SELF_CARE: &[&str] = &[
    "Taking care of yourself isn't selfish, it's necessary. What is one kind thing you can do for yourself today? 🛁",
    "Burnout is your body asking for rest. It's okay to say no, slow down, and refill your cup. ☕",
    "Self-care can be small: a glass of water, a walk outside, a few deep breaths. Every bit counts. 🌷",
];

const GRATITUDE: &[&str] = &[
    "What a lovely thing to notice. Gratitude has a way of making the heart feel a little lighter. 🙏",
    "Holding on to what you're thankful for is a quiet kind of strength. Maybe write it in your gratitude journal today? 📖",
    "Thank you for sharing that bit of light. Moments like this are worth savoring. ✨",
];

const OVERWHELMED: &[&str] = &[
    "I hear you, and it's completely okay to feel overwhelmed. Let's take this one breath at a time. Try the 4-7-8 breathing technique: breathe in for 4, hold for 7, exhale for 8. 🌸",
    "When everything feels too much, remember that you don't have to carry it all at once. What's one small thing you can focus on right now? 💙",
    "Feeling overwhelmed is your mind's way of saying you need a pause. Can you give yourself permission to rest for just 5 minutes? 🕊️",
];

const POSITIVE: &[&str] = &[
    "Here's something beautiful for you: You are braver than you believe, stronger than you seem, and more loved than you know. ✨",
    "Every day you choose to keep going is an act of courage. Today, you're here, you're trying, and that's everything. 🌟",
    "You have survived 100% of your difficult days so far. That's an incredible track record. 💖",
];

const RELAX: &[&str] = &[
    "Let's create a peaceful moment together. Close your eyes and imagine you're in your favorite calm place. What do you see, hear, and feel there? 🌺",
    "Try this: Place one hand on your chest and one on your belly. Breathe slowly and feel your body naturally calming down. You're safe. 🌊",
    "Relaxation is a gift you give yourself. Let your shoulders drop, soften your jaw, and know that this moment is yours. 🕯️",
];

const DIFFICULT: &[&str] = &[
    "Difficult days don't last, but resilient people like you do. You're going through something hard, and that takes strength. 🌱",
    "It's okay to not be okay today. Your feelings are valid, and you don't have to pretend otherwise. Tomorrow is a new day. 🌙",
    "Even in the hardest moments, you're growing. This difficult time is teaching you something about your own strength. 💪",
];

const BREATHING: &[&str] = &[
    "Let's breathe together. Inhale slowly for 4 counts... 1, 2, 3, 4. Hold for 4... 1, 2, 3, 4. Exhale for 6... 1, 2, 3, 4, 5, 6. Feel better? 🌸",
    "Here's a gentle breathing exercise: Breathe in peace, breathe out tension. Breathe in love, breathe out worry. You're doing great. 💙",
    "Place your hand on your heart. Feel it beating - that's your life force, steady and strong. Match your breathing to that gentle rhythm. ❤️",
];

const MOTIVATION: &[&str] = &[
    "You don't need to be perfect, you just need to be you. And you are enough, exactly as you are, right now. 🌟",
    "Every small step forward is progress. You don't have to leap mountains - just take the next gentle step. 🦋",
    "Believe in yourself like I believe in you. You have everything within you to handle whatever comes your way. ✨",
];

const DEFAULT: &[&str] = &[
    "Thank you for sharing with me. I'm here to listen and support you. What's on your heart today? 💙",
    "Your feelings matter, and so do you. I'm here to walk alongside you in this moment. How can I help? 🌸",
    "Sometimes we just need someone to remind us that we're not alone. You're not alone - I'm here with you. 💖",
];

/// The reply pool for `topic`. Every pool is non-empty.
pub fn pool(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::Anxiety => ANXIETY,
        Topic::Loneliness => LONELINESS,
        Topic::Sleep => SLEEP,
        Topic::Work => WORK,
        Topic::Relationships => RELATIONSHIPS,
        Topic::SelfCare => SELF_CARE,
        Topic::Gratitude => GRATITUDE,
        Topic::Overwhelmed => OVERWHELMED,
        Topic::Positive => POSITIVE,
        Topic::Relax => RELAX,
        Topic::Difficult => DIFFICULT,
        Topic::Breathing => BREATHING,
        Topic::Motivation => MOTIVATION,
        Topic::Default => DEFAULT,
    }
}

/// Picks a reply uniformly at random from a topic's pool.
///
/// The random source is passed in, so callers control determinism.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseSelector;

impl ResponseSelector {
    pub fn new() -> Self {
        Self
    }

    pub fn select_reply<R: Rng + ?Sized>(&self, topic: Topic, rng: &mut R) -> &'static str {
        let candidates = pool(topic);
        candidates[rng.random_range(0..candidates.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_every_pool_is_non_empty() {
        for topic in Topic::ALL {
            assert!(!pool(topic).is_empty(), "{topic} has an empty pool");
        }
    }

    #[test]
    fn test_selection_is_pool_member() {
        let selector = ResponseSelector::new();
        let mut rng = StdRng::seed_from_u64(7);
        for topic in Topic::ALL {
            for _ in 0..20 {
                let reply = selector.select_reply(topic, &mut rng);
                assert!(pool(topic).contains(&reply));
            }
        }
    }

    #[test]
    fn test_selection_covers_pool() {
        let selector = ResponseSelector::new();
        let mut rng = StdRng::seed_from_u64(42);
        for topic in Topic::ALL {
            let seen: HashSet<&str> = (0..1000)
                .map(|_| selector.select_reply(topic, &mut rng))
                .collect();
            assert_eq!(seen.len(), pool(topic).len(), "{topic} not fully covered");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let selector = ResponseSelector::new();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            assert_eq!(
                selector.select_reply(Topic::Default, &mut a),
                selector.select_reply(Topic::Default, &mut b)
            );
        }
    }

    #[test]
    fn test_difficult_pool_contains_known_reply() {
        assert!(pool(Topic::Difficult)
            .iter()
            .any(|r| r.contains("Difficult days don't last")));
    }

    #[test]
    fn test_pools_have_no_duplicates() {
        for topic in Topic::ALL {
            let unique: HashSet<&str> = pool(topic).iter().copied().collect();
            assert_eq!(unique.len(), pool(topic).len());
        }
    }

    #[test]
    fn test_suggested_prompts_are_distinct() {
        let unique: HashSet<&str> = SUGGESTED_PROMPTS.iter().copied().collect();
        assert_eq!(unique.len(), SUGGESTED_PROMPTS.len());
        assert!(WELCOME_MESSAGE.contains("HeartBot"));
    }
}
