//! `BatchCommitter` — buffers rows in memory and flushes them to a
//! [`Repository`] on a size-or-time trigger (spec.md §4.7).
//!
//! No direct dt-output counterpart — dt-output's `SimOutputObserver` wrote
//! every tick unbuffered. The batching/backoff shape here follows
//! `original_source/capsim/common/db_logger.py`'s `DatabaseLogger`, which
//! accumulates inserts and flushes them in a fixed table order with
//! exponential-backoff retry on lock errors.

use std::thread;
use std::time::{Duration, Instant};

use capsim_agent::AttributeHistoryRow;
use capsim_core::{AgentId, RunId, SimTime};
use capsim_event::Event;
use capsim_trend::Trend;

use crate::error::{RepoError, RepoResult};
use crate::repository::Repository;
use crate::row::{EventRow, ParticipantRecord, PersonRecord};

/// Exponential-backoff parameters for retrying a transient repository error
/// (spec.md §7 item 3): `base_delay * 2^attempt`, capped at `max_delay`, up
/// to `max_attempts` tries before escalating to fatal.
#[derive(Copy, Clone, Debug)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(50 * (1 << 5)),
            max_attempts: 5,
        }
    }
}

impl RetryPolicy {
    fn delay_for(&self, attempt: u32) -> Duration {
        let scaled = self.base_delay.saturating_mul(1u32 << attempt.min(31));
        scaled.min(self.max_delay)
    }
}

/// Size-or-time flush trigger thresholds, one set shared by all four
/// buffers (spec.md §4.7 and the `batch_size`/`batch_timeout_ms` config
/// knobs in §6).
///
/// The time trigger has two distinct readings depending on which `Clock`
/// the run uses: in realtime mode it's a genuine wall-clock timeout (the
/// sim is already paced to real seconds, so `batch_timeout` elapsing on
/// the wall clock is meaningful); in fast mode the sim races ahead of the
/// wall clock arbitrarily fast, so the trigger is instead an event count
/// (`fast_mode_event_threshold`), matching `db_logger.py`'s batch-by-count
/// fallback for its non-paced replay mode.
#[derive(Copy, Clone, Debug)]
pub struct CommitterConfig {
    pub batch_size: usize,
    pub batch_timeout: Duration,
    pub fast_mode_event_threshold: usize,
    pub realtime: bool,
    pub retry: RetryPolicy,
}

impl Default for CommitterConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            batch_timeout: Duration::from_millis(1000),
            fast_mode_event_threshold: 1000,
            realtime: false,
            retry: RetryPolicy::default(),
        }
    }
}

/// Accumulates rows produced by the engine and flushes them to a
/// [`Repository`] in the fixed order participants → attribute_history →
/// trends → events, retrying transient failures with backoff.
///
/// Flushes only ever run on the caller's thread (the engine task); there is
/// no internal concurrency.
pub struct BatchCommitter<R: Repository> {
    repo: R,
    run_id: RunId,
    config: CommitterConfig,
    participants_buf: Vec<ParticipantRecord>,
    persons_buf: Vec<PersonRecord>,
    attr_history_buf: Vec<AttributeHistoryRow>,
    trends_buf: Vec<Trend>,
    events_buf: Vec<EventRow>,
    last_flush: SimTime,
    last_flush_wall: Instant,
    events_since_flush: usize,
}

impl<R: Repository> BatchCommitter<R> {
    pub fn new(repo: R, run_id: RunId, config: CommitterConfig) -> Self {
        Self {
            repo,
            run_id,
            config,
            participants_buf: Vec::new(),
            persons_buf: Vec::new(),
            attr_history_buf: Vec::new(),
            trends_buf: Vec::new(),
            events_buf: Vec::new(),
            last_flush: SimTime::ZERO,
            last_flush_wall: Instant::now(),
            events_since_flush: 0,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    pub fn enqueue_participant(&mut self, agent_id: AgentId) {
        self.participants_buf.push(ParticipantRecord { run_id: self.run_id, agent_id });
    }

    pub fn enqueue_person(&mut self, person: PersonRecord) {
        self.persons_buf.push(person);
    }

    pub fn enqueue_attribute_history(&mut self, rows: impl IntoIterator<Item = AttributeHistoryRow>) {
        self.attr_history_buf.extend(rows);
    }

    pub fn enqueue_trend(&mut self, trend: Trend) {
        self.trends_buf.push(trend);
    }

    pub fn enqueue_event(&mut self, event: &Event) {
        self.events_buf.push(EventRow::from_event(self.run_id, event));
        self.events_since_flush += 1;
    }

    fn buffers_over_threshold(&self) -> bool {
        let n = self.config.batch_size;
        self.participants_buf.len() >= n
            || self.persons_buf.len() >= n
            || self.attr_history_buf.len() >= n
            || self.trends_buf.len() >= n
            || self.events_buf.len() >= n
    }

    /// In realtime mode the clock is paced to wall time, so a genuine
    /// `Instant::elapsed()` against `batch_timeout` is meaningful. In fast
    /// mode the sim can outrun the wall clock arbitrarily, so the time
    /// trigger is instead an event count against `fast_mode_event_threshold`
    /// (spec.md §4.7: "1 sim-second of wall-time in realtime mode; 1000
    /// events in fast mode").
    fn time_trigger(&self) -> bool {
        if self.config.realtime {
            self.last_flush_wall.elapsed() >= self.config.batch_timeout
        } else {
            self.events_since_flush >= self.config.fast_mode_event_threshold
        }
    }

    /// Flush if a buffer has crossed `batch_size` or the mode-appropriate
    /// time trigger has fired; a no-op otherwise.
    pub fn maybe_flush(&mut self, now: SimTime) -> RepoResult<()> {
        if self.buffers_over_threshold() || self.time_trigger() {
            self.flush_now(now)?;
        }
        Ok(())
    }

    /// Unconditionally flush every non-empty buffer, in fixed order:
    /// participants, persons, attribute_history, trends, events.
    pub fn flush_now(&mut self, now: SimTime) -> RepoResult<()> {
        if !self.persons_buf.is_empty() {
            let batch = std::mem::take(&mut self.persons_buf);
            self.with_retry("bulk_upsert_persons", batch.len(), |repo| repo.bulk_upsert_persons(&batch))?;
        }
        if !self.participants_buf.is_empty() {
            let batch = std::mem::take(&mut self.participants_buf);
            for p in &batch {
                self.with_retry("create_participant", 1, |repo| repo.create_participant(p.run_id, p.agent_id))?;
            }
        }
        if !self.attr_history_buf.is_empty() {
            let batch = std::mem::take(&mut self.attr_history_buf);
            self.with_retry("append_attribute_history", batch.len(), |repo| repo.append_attribute_history(&batch))?;
        }
        if !self.trends_buf.is_empty() {
            let batch = std::mem::take(&mut self.trends_buf);
            let run_id = self.run_id;
            self.with_retry("upsert_trends", batch.len(), |repo| repo.upsert_trends(run_id, &batch))?;
        }
        if !self.events_buf.is_empty() {
            let batch = std::mem::take(&mut self.events_buf);
            self.with_retry("append_events", batch.len(), |repo| repo.append_events(&batch))?;
        }
        self.last_flush = now;
        self.last_flush_wall = Instant::now();
        self.events_since_flush = 0;
        Ok(())
    }

    fn with_retry(
        &mut self,
        op: &'static str,
        row_count: usize,
        mut f: impl FnMut(&mut R) -> RepoResult<()>,
    ) -> RepoResult<()> {
        let mut attempt = 0;
        loop {
            match f(&mut self.repo) {
                Ok(()) => {
                    tracing::debug!(op, rows = row_count, attempt, "flushed batch");
                    return Ok(());
                }
                Err(err) if err.is_transient() && attempt < self.config.retry.max_attempts => {
                    let delay = self.config.retry.delay_for(attempt);
                    tracing::warn!(op, rows = row_count, attempt, ?delay, error = %err, "retrying transient repository error");
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(op, rows = row_count, attempt, error = %err, "repository op failed");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use capsim_core::{Profession, RunStatus};

    use super::*;
    use crate::memory::InMemoryRepository;

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

    fn committer(config: CommitterConfig) -> (BatchCommitter<InMemoryRepository>, RunId) {
        let mut repo = InMemoryRepository::new();
        let run_id = repo.create_run(1, 1, "{}", std::time::SystemTime::now()).unwrap();
        (BatchCommitter::new(repo, run_id, config), run_id)
    }

    #[test]
    fn maybe_flush_is_noop_below_threshold() {
        let (mut c, _) = committer(CommitterConfig { batch_size: 10, ..Default::default() });
        c.enqueue_person(sample_person(AgentId(0)));
        c.maybe_flush(SimTime::ZERO).unwrap();
        assert!(c.repo().persons.is_empty());
    }

    #[test]
    fn maybe_flush_triggers_on_size_threshold() {
        let (mut c, _) = committer(CommitterConfig { batch_size: 2, ..Default::default() });
        c.enqueue_person(sample_person(AgentId(0)));
        c.enqueue_person(sample_person(AgentId(1)));
        c.maybe_flush(SimTime::ZERO).unwrap();
        assert_eq!(c.repo().persons.len(), 2);
    }

    #[test]
    fn maybe_flush_triggers_on_wall_time_threshold_in_realtime_mode() {
        let (mut c, _) = committer(CommitterConfig {
            batch_size: 1000,
            batch_timeout: Duration::from_millis(1),
            realtime: true,
            ..Default::default()
        });
        c.enqueue_person(sample_person(AgentId(0)));
        thread::sleep(Duration::from_millis(5));
        c.maybe_flush(SimTime::ZERO).unwrap();
        assert_eq!(c.repo().persons.len(), 1);
    }

    #[test]
    fn maybe_flush_does_not_trigger_on_wall_time_in_fast_mode() {
        let (mut c, _) = committer(CommitterConfig {
            batch_size: 1000,
            batch_timeout: Duration::from_millis(1),
            realtime: false,
            ..Default::default()
        });
        c.enqueue_person(sample_person(AgentId(0)));
        thread::sleep(Duration::from_millis(5));
        c.maybe_flush(SimTime::ZERO).unwrap();
        assert!(c.repo().persons.is_empty(), "fast mode must ignore wall-clock elapsed time");
    }

    #[test]
    fn maybe_flush_triggers_on_event_count_in_fast_mode() {
        let (mut c, _) = committer(CommitterConfig {
            batch_size: 1000,
            fast_mode_event_threshold: 3,
            realtime: false,
            ..Default::default()
        });
        c.enqueue_person(sample_person(AgentId(0)));
        for i in 0..3u64 {
            let event = Event::new(capsim_core::EventId(i), SimTime::ZERO, None, None, capsim_event::EventKind::DailyReset);
            c.enqueue_event(&event);
        }
        c.maybe_flush(SimTime::ZERO).unwrap();
        assert_eq!(c.repo().persons.len(), 1, "event-count trigger should flush every buffer, not just events");
    }

    #[test]
    fn flush_now_applies_fixed_order_without_error() {
        let (mut c, run_id) = committer(CommitterConfig::default());
        c.enqueue_person(sample_person(AgentId(0)));
        c.enqueue_participant(AgentId(0));
        c.enqueue_attribute_history([AttributeHistoryRow {
            agent_id: AgentId(0),
            attribute: "energy_level",
            old_value: 3.0,
            new_value: 2.5,
            delta: -0.5,
            reason: "self_dev",
            source_trend: None,
            sim_time: SimTime::ZERO,
        }]);
        c.flush_now(SimTime::ZERO).unwrap();
        assert_eq!(c.repo().persons.len(), 1);
        assert_eq!(c.repo().participants.len(), 1);
        assert_eq!(c.repo().attribute_history.len(), 1);
        let _ = run_id;
    }

    /// A `Repository` wrapper that fails the first `fail_times` calls to
    /// `bulk_upsert_persons` with a transient error, then delegates.
    struct FlakyRepository {
        inner: InMemoryRepository,
        fail_times: Cell<u32>,
    }

    impl Repository for FlakyRepository {
        fn create_run(&mut self, n: u32, d: u32, c: &str, started_at: std::time::SystemTime) -> RepoResult<RunId> {
            self.inner.create_run(n, d, c, started_at)
        }
        fn load_run(&mut self, run_id: RunId) -> RepoResult<crate::row::RunRecord> {
            self.inner.load_run(run_id)
        }
        fn bulk_upsert_persons(&mut self, persons: &[PersonRecord]) -> RepoResult<()> {
            if self.fail_times.get() > 0 {
                self.fail_times.set(self.fail_times.get() - 1);
                return Err(RepoError::Transient("lock contention".into()));
            }
            self.inner.bulk_upsert_persons(persons)
        }
        fn create_participant(&mut self, r: RunId, a: AgentId) -> RepoResult<()> {
            self.inner.create_participant(r, a)
        }
        fn append_events(&mut self, events: &[EventRow]) -> RepoResult<()> {
            self.inner.append_events(events)
        }
        fn append_attribute_history(&mut self, rows: &[AttributeHistoryRow]) -> RepoResult<()> {
            self.inner.append_attribute_history(rows)
        }
        fn upsert_trends(&mut self, run_id: RunId, trends: &[Trend]) -> RepoResult<()> {
            self.inner.upsert_trends(run_id, trends)
        }
        fn load_affinity_map(&mut self) -> RepoResult<Vec<capsim_reference::AffinityRow>> {
            self.inner.load_affinity_map()
        }
        fn load_interest_ranges(&mut self) -> RepoResult<Vec<capsim_reference::InterestRangeRow>> {
            self.inner.load_interest_ranges()
        }
        fn load_attribute_ranges(&mut self) -> RepoResult<Vec<capsim_reference::AttributeRangeRow>> {
            self.inner.load_attribute_ranges()
        }
        fn mark_run_terminal(
            &mut self,
            run_id: RunId,
            status: RunStatus,
            end_time: SimTime,
            ended_at: std::time::SystemTime,
        ) -> RepoResult<()> {
            self.inner.mark_run_terminal(run_id, status, end_time, ended_at)
        }
    }

    #[test]
    fn flush_retries_transient_errors_then_succeeds() {
        let mut inner = InMemoryRepository::new();
        let run_id = inner.create_run(1, 1, "{}", std::time::SystemTime::now()).unwrap();
        let flaky = FlakyRepository { inner, fail_times: Cell::new(2) };
        let mut c = BatchCommitter::new(
            flaky,
            run_id,
            CommitterConfig { retry: RetryPolicy { base_delay: Duration::from_millis(1), ..Default::default() }, ..Default::default() },
        );
        c.enqueue_person(sample_person(AgentId(0)));
        c.flush_now(SimTime::ZERO).unwrap();
        assert_eq!(c.repo().inner.persons.len(), 1);
    }

    #[test]
    fn flush_escalates_after_exhausting_retries() {
        let mut inner = InMemoryRepository::new();
        let run_id = inner.create_run(1, 1, "{}", std::time::SystemTime::now()).unwrap();
        let flaky = FlakyRepository { inner, fail_times: Cell::new(100) };
        let mut c = BatchCommitter::new(
            flaky,
            run_id,
            CommitterConfig {
                retry: RetryPolicy { base_delay: Duration::from_millis(1), max_attempts: 2, ..Default::default() },
                ..Default::default()
            },
        );
        c.enqueue_person(sample_person(AgentId(0)));
        let err = c.flush_now(SimTime::ZERO);
        assert!(matches!(err, Err(RepoError::Transient(_))));
    }
}
