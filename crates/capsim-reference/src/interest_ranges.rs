//! Static per-profession (min, max) ranges for each interest category,
//! pinned to migration `0003_fix_interests_to_tz.py` as the latest,
//! authoritative values.

use capsim_core::{InterestCategory, Profession};

use crate::error::{ReferenceError, ReferenceResult};

/// One row of the agent_interests reference table.
#[derive(Copy, Clone, Debug)]
pub struct InterestRangeRow {
    pub profession: Profession,
    pub category: InterestCategory,
    pub min: f64,
    pub max: f64,
}

macro_rules! row {
    ($prof:ident, $cat:ident, $min:expr, $max:expr) => {
        InterestRangeRow {
            profession: Profession::$prof,
            category: InterestCategory::$cat,
            min: $min,
            max: $max,
        }
    };
}

const TABLE: &[InterestRangeRow] = &[
    // Artist
    row!(Artist, Economics, 0.86, 1.46),
    row!(Artist, Wellbeing, 0.91, 1.51),
    row!(Artist, Spirituality, 2.01, 2.61),
    row!(Artist, Knowledge, 1.82, 2.42),
    row!(Artist, Creativity, 3.72, 4.32),
    row!(Artist, Society, 1.94, 2.54),
    // Businessman
    row!(Businessman, Economics, 4.01, 4.61),
    row!(Businessman, Wellbeing, 0.76, 1.36),
    row!(Businessman, Spirituality, 0.91, 1.51),
    row!(Businessman, Knowledge, 1.35, 1.95),
    row!(Businessman, Creativity, 2.04, 2.64),
    row!(Businessman, Society, 2.42, 3.02),
    // Developer
    row!(Developer, Economics, 1.82, 2.42),
    row!(Developer, Wellbeing, 1.15, 1.75),
    row!(Developer, Spirituality, 0.72, 1.32),
    row!(Developer, Knowledge, 4.05, 4.65),
    row!(Developer, Creativity, 2.31, 2.91),
    row!(Developer, Society, 1.59, 2.19),
    // Doctor
    row!(Doctor, Economics, 1.02, 1.62),
    row!(Doctor, Wellbeing, 3.97, 4.57),
    row!(Doctor, Spirituality, 1.37, 1.97),
    row!(Doctor, Knowledge, 2.01, 2.61),
    row!(Doctor, Creativity, 1.58, 2.18),
    row!(Doctor, Society, 2.45, 3.05),
    // SpiritualMentor
    row!(SpiritualMentor, Economics, 0.62, 1.22),
    row!(SpiritualMentor, Wellbeing, 2.04, 2.64),
    row!(SpiritualMentor, Spirituality, 3.86, 4.46),
    row!(SpiritualMentor, Knowledge, 2.11, 2.71),
    row!(SpiritualMentor, Creativity, 2.12, 2.72),
    row!(SpiritualMentor, Society, 1.95, 2.55),
    // Teacher
    row!(Teacher, Economics, 1.32, 1.92),
    row!(Teacher, Wellbeing, 2.16, 2.76),
    row!(Teacher, Spirituality, 1.40, 2.00),
    row!(Teacher, Knowledge, 3.61, 4.21),
    row!(Teacher, Creativity, 1.91, 2.51),
    row!(Teacher, Society, 2.24, 2.84),
    // ShopClerk
    row!(ShopClerk, Economics, 4.59, 5.0),
    row!(ShopClerk, Wellbeing, 0.74, 1.34),
    row!(ShopClerk, Spirituality, 0.64, 1.24),
    row!(ShopClerk, Knowledge, 1.15, 1.75),
    row!(ShopClerk, Creativity, 1.93, 2.53),
    row!(ShopClerk, Society, 2.70, 3.30),
    // Worker
    row!(Worker, Economics, 3.97, 4.57),
    row!(Worker, Wellbeing, 1.05, 1.65),
    row!(Worker, Spirituality, 1.86, 2.46),
    row!(Worker, Knowledge, 1.83, 2.43),
    row!(Worker, Creativity, 0.87, 1.47),
    row!(Worker, Society, 0.69, 1.29),
    // Politician
    row!(Politician, Economics, 0.51, 1.11),
    row!(Politician, Wellbeing, 1.63, 2.23),
    row!(Politician, Spirituality, 0.32, 0.92),
    row!(Politician, Knowledge, 2.07, 2.67),
    row!(Politician, Creativity, 1.73, 2.33),
    row!(Politician, Society, 3.57, 4.17),
    // Blogger
    row!(Blogger, Economics, 1.32, 1.92),
    row!(Blogger, Wellbeing, 1.01, 1.61),
    row!(Blogger, Spirituality, 1.20, 1.80),
    row!(Blogger, Knowledge, 1.23, 1.83),
    row!(Blogger, Creativity, 3.27, 3.87),
    row!(Blogger, Society, 2.43, 3.03),
    // Unemployed
    row!(Unemployed, Economics, 0.72, 1.32),
    row!(Unemployed, Wellbeing, 1.38, 1.98),
    row!(Unemployed, Spirituality, 3.69, 4.29),
    row!(Unemployed, Knowledge, 2.15, 2.75),
    row!(Unemployed, Creativity, 2.33, 2.93),
    row!(Unemployed, Society, 2.42, 3.02),
    // Philosopher
    row!(Philosopher, Economics, 1.06, 1.66),
    row!(Philosopher, Wellbeing, 2.22, 2.82),
    row!(Philosopher, Spirituality, 3.71, 4.31),
    row!(Philosopher, Knowledge, 3.01, 3.61),
    row!(Philosopher, Creativity, 2.21, 2.81),
    row!(Philosopher, Society, 1.80, 2.40),
];

/// The full interest-range table backing `load_interest_ranges`.
pub fn interest_range_table() -> &'static [InterestRangeRow] {
    TABLE
}

/// (min, max) for one (profession, category) pair.
pub fn interest_range(
    profession: Profession,
    category: InterestCategory,
) -> ReferenceResult<(f64, f64)> {
    TABLE
        .iter()
        .find(|r| r.profession == profession && r.category == category)
        .map(|r| (r.min, r.max))
        .ok_or(ReferenceError::MissingInterestRange(profession))
}

/// All six (category, min, max) rows for one profession.
pub fn interest_ranges_for(profession: Profession) -> Vec<(InterestCategory, f64, f64)> {
    TABLE
        .iter()
        .filter(|r| r.profession == profession)
        .map(|r| (r.category, r.min, r.max))
        .collect()
}
