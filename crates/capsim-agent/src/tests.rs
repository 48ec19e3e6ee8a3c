//! Unit tests for capsim-agent.

#[cfg(test)]
mod builder {
    use crate::PersonStoreBuilder;
    use capsim_core::Profession;

    fn professions(n: usize) -> Vec<Profession> {
        (0..n).map(|i| Profession::ALL[i % Profession::ALL.len()]).collect()
    }

    #[test]
    fn correct_count() {
        let (store, rngs) = PersonStoreBuilder::new(professions(500), 1).build().unwrap();
        assert_eq!(store.count, 500);
        assert_eq!(rngs.len(), 500);
    }

    #[test]
    fn zero_agents() {
        let (store, rngs) = PersonStoreBuilder::new(vec![], 0).build().unwrap();
        assert!(store.is_empty());
        assert!(rngs.is_empty());
    }

    #[test]
    fn attributes_land_within_profession_range() {
        let professions = vec![Profession::Developer; 200];
        let (store, _) = PersonStoreBuilder::new(professions, 7).build().unwrap();
        let attr = capsim_reference::attribute_ranges(Profession::Developer).unwrap();
        for v in &store.financial_capability {
            assert!(*v >= attr.financial_capability.0 && *v <= attr.financial_capability.1);
        }
        for v in &store.energy_level {
            assert!(*v >= attr.energy_level.0 && *v <= attr.energy_level.1);
        }
    }

    #[test]
    fn time_budget_is_rounded_to_half_step() {
        let professions = vec![Profession::Teacher; 50];
        let (store, _) = PersonStoreBuilder::new(professions, 3).build().unwrap();
        for v in &store.time_budget {
            let doubled = v * 2.0;
            assert!((doubled - doubled.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn birth_dates_are_working_age() {
        let professions = professions(50);
        let (store, _) = PersonStoreBuilder::new(professions, 11).build().unwrap();
        for meta in &store.meta {
            let age = 2025u16 - meta.date_of_birth.year;
            assert!((18..=65).contains(&age));
        }
    }
}

#[cfg(test)]
mod store {
    use crate::PersonStoreBuilder;
    use capsim_core::{AgentId, Profession};

    #[test]
    fn agent_ids_iterator() {
        let professions = vec![Profession::Worker; 5];
        let (store, _) = PersonStoreBuilder::new(professions, 0).build().unwrap();
        let ids: Vec<AgentId> = store.agent_ids().collect();
        assert_eq!(ids, vec![AgentId(0), AgentId(1), AgentId(2), AgentId(3), AgentId(4)]);
    }
}

#[cfg(test)]
mod rngs {
    use crate::PersonStoreBuilder;
    use capsim_core::{AgentId, Profession};

    #[test]
    fn per_agent_determinism() {
        let professions = vec![Profession::Artist; 10];
        let (_, mut rngs1) = PersonStoreBuilder::new(professions.clone(), 999).build().unwrap();
        let (_, mut rngs2) = PersonStoreBuilder::new(professions, 999).build().unwrap();
        for i in 0..10u32 {
            let a: f32 = rngs1.get_mut(AgentId(i)).random();
            let b: f32 = rngs2.get_mut(AgentId(i)).random();
            assert_eq!(a, b, "agent {i} RNG should be deterministic");
        }
    }

    #[test]
    fn different_seeds_differ() {
        let professions = vec![Profession::Doctor];
        let (_, mut rngs_a) = PersonStoreBuilder::new(professions.clone(), 1).build().unwrap();
        let (_, mut rngs_b) = PersonStoreBuilder::new(professions, 2).build().unwrap();
        let a: u64 = rngs_a.get_mut(AgentId(0)).random();
        let b: u64 = rngs_b.get_mut(AgentId(0)).random();
        assert_ne!(a, b);
    }
}

#[cfg(test)]
mod interest_vector {
    use capsim_core::InterestCategory;

    #[test]
    fn argmax_picks_strict_maximum() {
        let mut v = crate::InterestVector::default();
        v.set(InterestCategory::Economics, 1.0);
        v.set(InterestCategory::Knowledge, 4.5);
        v.set(InterestCategory::Society, 2.0);
        assert_eq!(v.argmax(), InterestCategory::Knowledge);
    }

    #[test]
    fn argmax_tie_breaks_to_earlier_category() {
        let mut v = crate::InterestVector::default();
        v.set(InterestCategory::Economics, 3.0);
        v.set(InterestCategory::Wellbeing, 3.0);
        // Economics precedes Wellbeing in `InterestCategory::ALL`.
        assert_eq!(v.argmax(), InterestCategory::Economics);
    }

    #[test]
    fn set_clamps_out_of_range_values() {
        let mut v = crate::InterestVector::default();
        v.set(InterestCategory::Society, 9.0);
        assert_eq!(v.get(InterestCategory::Society), 5.0);
        v.set(InterestCategory::Society, -3.0);
        assert_eq!(v.get(InterestCategory::Society), 0.0);
    }
}
