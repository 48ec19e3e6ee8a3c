//! `InMemoryRepository` — an in-process [`Repository`] fake.
//!
//! No direct dt-output counterpart (dt-output's own tests drive `CsvWriter`
//! against a tempdir); a plain in-memory fake is the more idiomatic choice
//! for a trait with no filesystem component, and is what the engine's own
//! tests and `demos/capsim-demo` use.

use std::collections::HashSet;
use std::time::SystemTime;

use capsim_agent::AttributeHistoryRow;
use capsim_core::{AgentId, RunId, RunStatus, SimTime};
use capsim_reference::{AffinityRow, AttributeRangeRow, InterestRangeRow};
use capsim_trend::Trend;

use crate::error::{RepoError, RepoResult};
use crate::repository::Repository;
use crate::row::{EventRow, ParticipantRecord, PersonRecord, RunRecord};

/// An in-memory [`Repository`] implementation, for tests and demos.
///
/// Keeps every row ever appended; nothing is ever dropped or compacted.
#[derive(Default)]
pub struct InMemoryRepository {
    pub runs: Vec<RunRecord>,
    pub persons: Vec<PersonRecord>,
    pub participants: Vec<ParticipantRecord>,
    participant_set: HashSet<(RunId, AgentId)>,
    pub events: Vec<EventRow>,
    pub attribute_history: Vec<AttributeHistoryRow>,
    /// Keyed by trend id so repeated `upsert_trends` calls are last-write-wins.
    pub trends: Vec<Trend>,
    next_run_id: u32,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_run_mut(&mut self, run_id: RunId) -> RepoResult<&mut RunRecord> {
        self.runs
            .iter_mut()
            .find(|r| r.run_id == run_id)
            .ok_or(RepoError::RunNotFound(run_id))
    }
}

impl Repository for InMemoryRepository {
    fn create_run(
        &mut self,
        num_agents: u32,
        duration_days: u32,
        config_snapshot: &str,
        started_at: SystemTime,
    ) -> RepoResult<RunId> {
        let run_id = RunId(self.next_run_id);
        self.next_run_id += 1;
        self.runs.push(RunRecord {
            run_id,
            num_agents,
            duration_days,
            status: RunStatus::Initialized,
            config_snapshot: config_snapshot.to_string(),
            started_at,
            ended_at: None,
            end_sim_minute: None,
        });
        Ok(run_id)
    }

    fn load_run(&mut self, run_id: RunId) -> RepoResult<RunRecord> {
        self.runs.iter().find(|r| r.run_id == run_id).cloned().ok_or(RepoError::RunNotFound(run_id))
    }

    fn bulk_upsert_persons(&mut self, persons: &[PersonRecord]) -> RepoResult<()> {
        for incoming in persons {
            match self.persons.iter_mut().find(|p| p.agent_id == incoming.agent_id) {
                Some(existing) => *existing = incoming.clone(),
                None => self.persons.push(incoming.clone()),
            }
        }
        Ok(())
    }

    fn create_participant(&mut self, run_id: RunId, agent_id: AgentId) -> RepoResult<()> {
        if self.participant_set.insert((run_id, agent_id)) {
            self.participants.push(ParticipantRecord { run_id, agent_id });
        }
        Ok(())
    }

    fn append_events(&mut self, events: &[EventRow]) -> RepoResult<()> {
        self.events.extend_from_slice(events);
        Ok(())
    }

    fn append_attribute_history(&mut self, rows: &[AttributeHistoryRow]) -> RepoResult<()> {
        self.attribute_history.extend_from_slice(rows);
        Ok(())
    }

    fn upsert_trends(&mut self, _run_id: RunId, trends: &[Trend]) -> RepoResult<()> {
        for incoming in trends {
            match self.trends.iter_mut().find(|t| t.id == incoming.id) {
                Some(existing) => *existing = incoming.clone(),
                None => self.trends.push(incoming.clone()),
            }
        }
        Ok(())
    }

    fn load_affinity_map(&mut self) -> RepoResult<Vec<AffinityRow>> {
        Ok(capsim_reference::affinity_table().to_vec())
    }

    fn load_interest_ranges(&mut self) -> RepoResult<Vec<InterestRangeRow>> {
        Ok(capsim_reference::interest_range_table().to_vec())
    }

    fn load_attribute_ranges(&mut self) -> RepoResult<Vec<AttributeRangeRow>> {
        Ok(capsim_reference::attribute_range_table().to_vec())
    }

    fn mark_run_terminal(
        &mut self,
        run_id: RunId,
        status: RunStatus,
        end_time: SimTime,
        ended_at: SystemTime,
    ) -> RepoResult<()> {
        let run = self.find_run_mut(run_id)?;
        run.status = status;
        run.end_sim_minute = Some(end_time);
        run.ended_at = Some(ended_at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use capsim_core::{Profession, Sentiment, Topic};

    use super::*;
    use crate::row::PersonRecord;

    fn sample_person(agent_id: AgentId) -> PersonRecord {
        PersonRecord {
            agent_id,
            profession: Profession::Developer,
            meta: capsim_agent::PersonMeta {
                first_name: "A".into(),
                last_name: "B".into(),
                gender: capsim_agent::Gender::Female,
                date_of_birth: capsim_agent::BirthDate::new(1990, 1, 1, 2025).unwrap(),
            },
        }
    }

    #[test]
    fn create_run_assigns_sequential_ids_and_initialized_status() {
        let mut repo = InMemoryRepository::new();
        let id0 = repo.create_run(10, 1, "{}", SystemTime::now()).unwrap();
        let id1 = repo.create_run(20, 2, "{}", SystemTime::now()).unwrap();
        assert_ne!(id0, id1);
        assert_eq!(repo.runs[0].status, RunStatus::Initialized);
    }

    #[test]
    fn mark_run_terminal_updates_status() {
        let mut repo = InMemoryRepository::new();
        let run_id = repo.create_run(1, 1, "{}", SystemTime::now()).unwrap();
        repo.mark_run_terminal(run_id, RunStatus::Completed, SimTime::new(1440.0), SystemTime::now()).unwrap();
        assert_eq!(repo.runs[0].status, RunStatus::Completed);
    }

    #[test]
    fn mark_run_terminal_missing_run_is_error() {
        let mut repo = InMemoryRepository::new();
        let err = repo.mark_run_terminal(RunId(999), RunStatus::Failed, SimTime::ZERO, SystemTime::now());
        assert!(matches!(err, Err(RepoError::RunNotFound(_))));
    }

    #[test]
    fn load_run_round_trips_what_create_run_and_mark_run_terminal_wrote() {
        let mut repo = InMemoryRepository::new();
        let started = SystemTime::now();
        let run_id = repo.create_run(7, 3, "{\"seed\":1}", started).unwrap();
        let ended = SystemTime::now();
        repo.mark_run_terminal(run_id, RunStatus::Completed, SimTime::new(4320.0), ended).unwrap();
        let loaded = repo.load_run(run_id).unwrap();
        assert_eq!(loaded.run_id, run_id);
        assert_eq!(loaded.num_agents, 7);
        assert_eq!(loaded.duration_days, 3);
        assert_eq!(loaded.status, RunStatus::Completed);
        assert_eq!(loaded.started_at, started);
        assert_eq!(loaded.ended_at, Some(ended));
        assert_eq!(loaded.end_sim_minute, Some(SimTime::new(4320.0)));
    }

    #[test]
    fn create_participant_is_idempotent_per_pair() {
        let mut repo = InMemoryRepository::new();
        let run_id = repo.create_run(1, 1, "{}", SystemTime::now()).unwrap();
        repo.create_participant(run_id, AgentId(0)).unwrap();
        repo.create_participant(run_id, AgentId(0)).unwrap();
        assert_eq!(repo.participants.len(), 1);
    }

    #[test]
    fn bulk_upsert_persons_overwrites_existing_by_agent_id() {
        let mut repo = InMemoryRepository::new();
        let mut person = sample_person(AgentId(0));
        repo.bulk_upsert_persons(&[person.clone()]).unwrap();
        person.meta.first_name = "Changed".into();
        repo.bulk_upsert_persons(&[person]).unwrap();
        assert_eq!(repo.persons.len(), 1);
        assert_eq!(repo.persons[0].meta.first_name, "Changed");
    }

    #[test]
    fn upsert_trends_is_last_write_wins_on_counters() {
        let mut repo = InMemoryRepository::new();
        let run_id = repo.create_run(1, 1, "{}", SystemTime::now()).unwrap();
        let mut trend = Trend::new(
            capsim_core::TrendId(0),
            Topic::Science,
            Sentiment::Positive,
            AgentId(0),
            None,
            SimTime::ZERO,
            2.0,
        );
        repo.upsert_trends(run_id, &[trend.clone()]).unwrap();
        trend.add_interaction(50, 500);
        repo.upsert_trends(run_id, &[trend.clone()]).unwrap();
        assert_eq!(repo.trends.len(), 1);
        assert_eq!(repo.trends[0].total_interactions, 1);
    }

    #[test]
    fn load_affinity_map_matches_reference_table_length() {
        let mut repo = InMemoryRepository::new();
        assert_eq!(repo.load_affinity_map().unwrap().len(), capsim_reference::affinity_table().len());
    }
}
