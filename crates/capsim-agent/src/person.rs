//! Person value types: immutable metadata and the six-category interest
//! vector, modeled as a fixed-arity record of named scalars rather than
//! an open map.

use capsim_core::InterestCategory;

/// Gender, carried as an open string in the original schema but constrained
/// here to the values the source data actually produces.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    Male,
    Female,
}

/// Calendar date of birth, stored as (year, month, day) without pulling in a
/// datetime crate the teacher doesn't otherwise use.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BirthDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl BirthDate {
    /// Construct a birth date, validating it produces an age in [18, 65] as
    /// of `current_year` (migration `0004_fix_birth_years_and_time_budget`
    /// normalizes the source's birth-year range to 1960-2007 for a
    /// 2025 "current" year; generalized here to an explicit `current_year`).
    pub fn new(year: u16, month: u8, day: u8, current_year: u16) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        let age = current_year.checked_sub(year)?;
        if (18..=65).contains(&age) {
            Some(Self { year, month, day })
        } else {
            None
        }
    }
}

/// Immutable, post-creation personal metadata.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonMeta {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: BirthDate,
}

/// Per-agent scalar interest over the six fixed categories, each on [0, 5].
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterestVector {
    values: [f64; 6],
}

impl InterestVector {
    pub fn new(
        economics: f64,
        wellbeing: f64,
        spirituality: f64,
        knowledge: f64,
        creativity: f64,
        society: f64,
    ) -> Self {
        Self {
            values: [economics, wellbeing, spirituality, knowledge, creativity, society],
        }
    }

    #[inline]
    fn index(category: InterestCategory) -> usize {
        match category {
            InterestCategory::Economics => 0,
            InterestCategory::Wellbeing => 1,
            InterestCategory::Spirituality => 2,
            InterestCategory::Knowledge => 3,
            InterestCategory::Creativity => 4,
            InterestCategory::Society => 5,
        }
    }

    #[inline]
    pub fn get(&self, category: InterestCategory) -> f64 {
        self.values[Self::index(category)]
    }

    #[inline]
    pub fn set(&mut self, category: InterestCategory, value: f64) {
        self.values[Self::index(category)] = value.clamp(0.0, 5.0);
    }

    /// The category with the greatest interest, ties broken lexicographically
    /// by `InterestCategory::ALL`'s declaration order.
    pub fn argmax(&self) -> InterestCategory {
        let mut best = InterestCategory::ALL[0];
        let mut best_value = self.get(best);
        for category in InterestCategory::ALL.into_iter().skip(1) {
            let value = self.get(category);
            if value > best_value {
                best = category;
                best_value = value;
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (InterestCategory, f64)> + '_ {
        InterestCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}
