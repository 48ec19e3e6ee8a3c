//! Fluent builder for constructing `PersonStore` + `AgentRngs` in one step,
//! sampling each agent's initial scalar attributes and interests from the
//! profession-keyed reference ranges.
//!
//! # Usage
//!
//! ```rust,no_run
//! use capsim_agent::PersonStoreBuilder;
//! use capsim_core::Profession;
//!
//! let professions: Vec<Profession> = (0..10_000).map(|i| Profession::ALL[i % 12]).collect();
//! let (store, rngs) = PersonStoreBuilder::new(professions, /*seed=*/ 42).build().unwrap();
//! assert_eq!(store.count, 10_000);
//! ```

use capsim_core::{AgentId, Profession};
use capsim_reference::{attribute_ranges, interest_ranges_for};

use crate::person::{BirthDate, Gender, InterestVector, PersonMeta};
use crate::store::{AgentRngs, PersonStore};

/// Builder for [`PersonStore`] + [`AgentRngs`].
///
/// Every agent's profession is fixed up front (the population's profession
/// mix is an input, not something sampled here); the builder then draws
/// each agent's starting attributes and interests uniformly from that
/// profession's reference range.
pub struct PersonStoreBuilder {
    professions: Vec<Profession>,
    seed: u64,
    /// Calendar year used to validate sampled birth dates.
    current_year: u16,
}

impl PersonStoreBuilder {
    pub fn new(professions: Vec<Profession>, seed: u64) -> Self {
        Self {
            professions,
            seed,
            current_year: 2025,
        }
    }

    pub fn with_current_year(mut self, year: u16) -> Self {
        self.current_year = year;
        self
    }

    /// Construct `PersonStore` and `AgentRngs`, sampling each agent's
    /// initial attributes and interests from its profession's reference
    /// ranges. Personal metadata (name, gender, birth date) is filled with
    /// placeholder names the caller is expected to overwrite from its own
    /// population source; only the birth date is sampled here, since it
    /// must satisfy the working-age bound.
    pub fn build(self) -> capsim_reference::ReferenceResult<(PersonStore, AgentRngs)> {
        let count = self.professions.len();
        let mut rngs = AgentRngs::new(count, self.seed);

        let meta: Vec<PersonMeta> = (0..count)
            .map(|i| {
                let rng = rngs.get_mut(AgentId(i as u32));
                let year = rng.gen_range((self.current_year - 65)..=(self.current_year - 18));
                let month = rng.gen_range(1u8..=12);
                let day = rng.gen_range(1u8..=28);
                PersonMeta {
                    first_name: String::new(),
                    last_name: String::new(),
                    gender: if rng.gen_bool(0.5) { Gender::Male } else { Gender::Female },
                    date_of_birth: BirthDate::new(year, month, day, self.current_year)
                        .expect("sampled birth date is within the working-age bound by construction"),
                }
            })
            .collect();

        let mut store = PersonStore::new(count, meta, self.professions.clone());

        for (i, profession) in self.professions.iter().enumerate() {
            let agent = AgentId(i as u32);
            let attr = attribute_ranges(*profession)?;
            let rng = rngs.get_mut(agent);

            store.financial_capability[i] = rng.gen_range(attr.financial_capability.0..=attr.financial_capability.1);
            store.trend_receptivity[i] = rng.gen_range(attr.trend_receptivity.0..=attr.trend_receptivity.1);
            store.social_status[i] = rng.gen_range(attr.social_status.0..=attr.social_status.1);
            store.energy_level[i] = rng.gen_range(attr.energy_level.0..=attr.energy_level.1);
            let raw_time_budget = rng.gen_range(attr.time_budget.0..=attr.time_budget.1);
            store.time_budget[i] = (raw_time_budget * 2.0).round() / 2.0;

            let mut interests = InterestVector::default();
            for (category, min, max) in interest_ranges_for(*profession) {
                let rng = rngs.get_mut(agent);
                let value = rng.gen_range(min..=max);
                interests.set(category, value);
            }
            store.interests[i] = interests;
        }

        Ok((store, rngs))
    }
}
