//! Static (profession, topic) → affinity weight table, pinned to migration
//! `0003_fix_interests_to_tz.py` as the latest, authoritative values.

use capsim_core::{Profession, Topic};

use crate::error::{ReferenceError, ReferenceResult};

/// One row of the affinity_map reference table.
#[derive(Copy, Clone, Debug)]
pub struct AffinityRow {
    pub topic: Topic,
    pub profession: Profession,
    pub affinity_score: f64,
}

macro_rules! row {
    ($topic:ident, $prof:ident, $score:expr) => {
        AffinityRow {
            topic: Topic::$topic,
            profession: Profession::$prof,
            affinity_score: $score,
        }
    };
}

const TABLE: &[AffinityRow] = &[
    // Economic
    row!(Economic, ShopClerk, 4.8),
    row!(Economic, Worker, 3.2),
    row!(Economic, Developer, 2.1),
    row!(Economic, Politician, 3.8),
    row!(Economic, Blogger, 2.5),
    row!(Economic, Businessman, 4.9),
    row!(Economic, Doctor, 2.0),
    row!(Economic, Teacher, 2.3),
    row!(Economic, Unemployed, 1.8),
    row!(Economic, Artist, 1.9),
    row!(Economic, SpiritualMentor, 1.5),
    row!(Economic, Philosopher, 2.2),
    // Health
    row!(Health, ShopClerk, 1.2),
    row!(Health, Worker, 1.8),
    row!(Health, Developer, 1.6),
    row!(Health, Politician, 2.4),
    row!(Health, Blogger, 1.9),
    row!(Health, Businessman, 1.4),
    row!(Health, Doctor, 4.8),
    row!(Health, Teacher, 2.8),
    row!(Health, Unemployed, 2.1),
    row!(Health, Artist, 1.7),
    row!(Health, SpiritualMentor, 3.2),
    row!(Health, Philosopher, 2.9),
    // Spiritual
    row!(Spiritual, ShopClerk, 1.1),
    row!(Spiritual, Worker, 2.3),
    row!(Spiritual, Developer, 1.4),
    row!(Spiritual, Politician, 1.2),
    row!(Spiritual, Blogger, 1.8),
    row!(Spiritual, Businessman, 1.6),
    row!(Spiritual, Doctor, 2.1),
    row!(Spiritual, Teacher, 2.2),
    row!(Spiritual, Unemployed, 4.1),
    row!(Spiritual, Artist, 2.8),
    row!(Spiritual, SpiritualMentor, 4.9),
    row!(Spiritual, Philosopher, 4.2),
    // Conspiracy
    row!(Conspiracy, ShopClerk, 1.5),
    row!(Conspiracy, Worker, 1.9),
    row!(Conspiracy, Developer, 1.2),
    row!(Conspiracy, Politician, 1.8),
    row!(Conspiracy, Blogger, 2.3),
    row!(Conspiracy, Businessman, 1.4),
    row!(Conspiracy, Doctor, 1.1),
    row!(Conspiracy, Teacher, 1.6),
    row!(Conspiracy, Unemployed, 2.8),
    row!(Conspiracy, Artist, 2.1),
    row!(Conspiracy, SpiritualMentor, 2.4),
    row!(Conspiracy, Philosopher, 2.7),
    // Science
    row!(Science, ShopClerk, 1.3),
    row!(Science, Worker, 1.7),
    row!(Science, Developer, 4.2),
    row!(Science, Politician, 2.5),
    row!(Science, Blogger, 1.8),
    row!(Science, Businessman, 1.9),
    row!(Science, Doctor, 3.8),
    row!(Science, Teacher, 4.1),
    row!(Science, Unemployed, 2.2),
    row!(Science, Artist, 2.0),
    row!(Science, SpiritualMentor, 2.6),
    row!(Science, Philosopher, 3.9),
    // Culture
    row!(Culture, ShopClerk, 2.1),
    row!(Culture, Worker, 1.4),
    row!(Culture, Developer, 1.8),
    row!(Culture, Politician, 3.2),
    row!(Culture, Blogger, 3.6),
    row!(Culture, Businessman, 2.3),
    row!(Culture, Doctor, 2.0),
    row!(Culture, Teacher, 2.7),
    row!(Culture, Unemployed, 2.5),
    row!(Culture, Artist, 4.8),
    row!(Culture, SpiritualMentor, 2.9),
    row!(Culture, Philosopher, 2.8),
    // Sport
    row!(Sport, ShopClerk, 2.3),
    row!(Sport, Worker, 2.8),
    row!(Sport, Developer, 1.5),
    row!(Sport, Politician, 2.2),
    row!(Sport, Blogger, 2.1),
    row!(Sport, Businessman, 2.4),
    row!(Sport, Doctor, 1.9),
    row!(Sport, Teacher, 2.0),
    row!(Sport, Unemployed, 2.6),
    row!(Sport, Artist, 1.8),
    row!(Sport, SpiritualMentor, 1.7),
    row!(Sport, Philosopher, 1.6),
];

/// The full affinity matrix backing `load_affinity_map`, in declaration order.
pub fn affinity_table() -> &'static [AffinityRow] {
    TABLE
}

/// Look up a single (profession, topic) affinity weight on [0, 5].
pub fn affinity(profession: Profession, topic: Topic) -> ReferenceResult<f64> {
    TABLE
        .iter()
        .find(|r| r.topic == topic && r.profession == profession)
        .map(|r| r.affinity_score)
        .ok_or(ReferenceError::MissingAffinity(topic, profession))
}
