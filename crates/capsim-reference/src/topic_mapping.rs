//! Static topic → interest-category mapping, pinned to migration
//! `2bebdbfef5d5_create_topic_interest_mapping.py`.
//!
//! Used by `SelfDev` to pick which interest category a self-
//! development action should bump: the general form of "the topic's mapped
//! interest category" rather than a hardcoded Knowledge-only rule.

use capsim_core::{InterestCategory, Topic};

/// (topic, interest_category) — the 7 canonical rows seeded by the
/// migration.
const TABLE: &[(Topic, InterestCategory)] = &[
    (Topic::Economic, InterestCategory::Economics),
    (Topic::Health, InterestCategory::Wellbeing),
    (Topic::Spiritual, InterestCategory::Spirituality),
    (Topic::Conspiracy, InterestCategory::Society),
    (Topic::Science, InterestCategory::Knowledge),
    (Topic::Culture, InterestCategory::Creativity),
    (Topic::Sport, InterestCategory::Society),
];

/// The interest category a topic maps to. Total over `Topic`'s closed set,
/// so this never fails.
pub fn topic_interest_category(topic: Topic) -> InterestCategory {
    TABLE
        .iter()
        .find(|(t, _)| *t == topic)
        .map(|(_, c)| *c)
        .expect("topic_interest_mapping covers every Topic variant")
}
