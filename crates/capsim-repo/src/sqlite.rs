//! SQLite repository backend (feature `sqlite`).
//!
//! Schema mirrors `original_source/alembic/versions/0001_init_capsim_schema.py`
//! (the `capsim` Postgres schema), translated to SQLite types: `simulation_runs`,
//! `persons`, `trends`, `events`, `person_attribute_history`, plus the three
//! read-only reference tables. `agent_interests`/`affinity_map` are seeded
//! once from `capsim-reference`'s pinned constants on open, the same way the
//! original schema's reference tables were populated by migration data, not
//! by the application.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};

use capsim_agent::AttributeHistoryRow;
use capsim_core::{AgentId, RunId, RunStatus, SimTime};
use capsim_reference::{AffinityRow, AttributeRangeRow, InterestRangeRow};
use capsim_trend::Trend;

use crate::error::{RepoError, RepoResult};
use crate::repository::Repository;
use crate::row::{EventRow, PersonRecord, RunRecord};

/// Millis since the Unix epoch, for a column SQLite can store and order on.
/// Clamped to 0 rather than panicking on a pre-epoch clock.
fn to_unix_millis(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}

fn from_unix_millis(ms: i64) -> SystemTime {
    UNIX_EPOCH + std::time::Duration::from_millis(ms.max(0) as u64)
}

fn run_status_from_label(label: &str) -> RunStatus {
    match label {
        "initialized" => RunStatus::Initialized,
        "running" => RunStatus::Running,
        "stopping" => RunStatus::Stopping,
        "completed" => RunStatus::Completed,
        _ => RunStatus::Failed,
    }
}

fn run_status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Initialized => "initialized",
        RunStatus::Running => "running",
        RunStatus::Stopping => "stopping",
        RunStatus::Completed => "completed",
        RunStatus::Failed => "failed",
    }
}

fn coverage_label(coverage: capsim_core::Coverage) -> &'static str {
    match coverage {
        capsim_core::Coverage::Low => "low",
        capsim_core::Coverage::Middle => "middle",
        capsim_core::Coverage::High => "high",
    }
}

fn sentiment_label(sentiment: capsim_core::Sentiment) -> &'static str {
    match sentiment {
        capsim_core::Sentiment::Positive => "positive",
        capsim_core::Sentiment::Negative => "negative",
    }
}

/// Durable SQLite-backed [`Repository`] implementation.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open (or create) a database at `path`, initialize the schema, and
    /// seed the reference tables from `capsim-reference`'s pinned constants.
    pub fn open(path: &Path) -> RepoResult<Self> {
        let conn = Connection::open(path)?;
        let mut repo = Self { conn };
        repo.init_schema()?;
        repo.seed_reference_tables()?;
        Ok(repo)
    }

    /// Open an in-memory database, for tests.
    pub fn open_in_memory() -> RepoResult<Self> {
        let conn = Connection::open_in_memory()?;
        let mut repo = Self { conn };
        repo.init_schema()?;
        repo.seed_reference_tables()?;
        Ok(repo)
    }

    fn init_schema(&mut self) -> RepoResult<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS simulation_runs (
                 run_id          INTEGER PRIMARY KEY,
                 num_agents      INTEGER NOT NULL,
                 duration_days   INTEGER NOT NULL,
                 status          TEXT NOT NULL,
                 end_sim_minute  REAL,
                 started_at_ms   INTEGER NOT NULL,
                 ended_at_ms     INTEGER,
                 configuration   TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS persons (
                 agent_id     INTEGER PRIMARY KEY,
                 profession   TEXT NOT NULL,
                 first_name   TEXT NOT NULL,
                 last_name    TEXT NOT NULL,
                 gender       TEXT NOT NULL,
                 birth_year   INTEGER NOT NULL,
                 birth_month  INTEGER NOT NULL,
                 birth_day    INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS participants (
                 run_id   INTEGER NOT NULL,
                 agent_id INTEGER NOT NULL,
                 PRIMARY KEY (run_id, agent_id)
             );
             CREATE TABLE IF NOT EXISTS trends (
                 trend_id            INTEGER NOT NULL,
                 run_id              INTEGER NOT NULL,
                 topic               TEXT NOT NULL,
                 sentiment           TEXT NOT NULL,
                 originator_id       INTEGER NOT NULL,
                 parent_trend_id     INTEGER,
                 start_time          REAL NOT NULL,
                 base_virality_score REAL NOT NULL,
                 coverage_level      TEXT NOT NULL,
                 total_interactions  INTEGER NOT NULL,
                 PRIMARY KEY (run_id, trend_id)
             );
             CREATE TABLE IF NOT EXISTS events (
                 event_id                INTEGER NOT NULL,
                 run_id                  INTEGER NOT NULL,
                 event_type              TEXT NOT NULL,
                 priority                INTEGER NOT NULL,
                 timestamp               REAL NOT NULL,
                 agent_id                INTEGER,
                 trend_id                INTEGER,
                 processing_duration_ms  INTEGER,
                 PRIMARY KEY (run_id, event_id)
             );
             CREATE TABLE IF NOT EXISTS person_attribute_history (
                 id               INTEGER PRIMARY KEY AUTOINCREMENT,
                 agent_id         INTEGER NOT NULL,
                 attribute_name   TEXT NOT NULL,
                 old_value        REAL NOT NULL,
                 new_value        REAL NOT NULL,
                 delta            REAL NOT NULL,
                 reason           TEXT NOT NULL,
                 source_trend_id  INTEGER,
                 change_timestamp REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS agent_interests (
                 profession TEXT NOT NULL,
                 interest   TEXT NOT NULL,
                 min_value  REAL NOT NULL,
                 max_value  REAL NOT NULL,
                 PRIMARY KEY (profession, interest)
             );
             CREATE TABLE IF NOT EXISTS affinity_map (
                 profession     TEXT NOT NULL,
                 topic          TEXT NOT NULL,
                 affinity_score REAL NOT NULL,
                 PRIMARY KEY (profession, topic)
             );
             CREATE TABLE IF NOT EXISTS agents_profession_ranges (
                 profession               TEXT NOT NULL PRIMARY KEY,
                 financial_capability_min REAL NOT NULL,
                 financial_capability_max REAL NOT NULL,
                 trend_receptivity_min    REAL NOT NULL,
                 trend_receptivity_max    REAL NOT NULL,
                 social_status_min        REAL NOT NULL,
                 social_status_max        REAL NOT NULL,
                 energy_level_min         REAL NOT NULL,
                 energy_level_max         REAL NOT NULL,
                 time_budget_min          REAL NOT NULL,
                 time_budget_max          REAL NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_events_run_priority ON events (run_id, priority, timestamp);
             CREATE INDEX IF NOT EXISTS idx_trends_run_topic ON trends (run_id, topic);
             CREATE INDEX IF NOT EXISTS idx_attr_history_agent ON person_attribute_history (agent_id);",
        )?;
        Ok(())
    }

    /// Seed `agent_interests`/`affinity_map`/`agents_profession_ranges` once
    /// from the pinned reference constants, mirroring the original schema's
    /// migration-seeded reference tables.
    fn seed_reference_tables(&mut self) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut affinity_stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO affinity_map (profession, topic, affinity_score) VALUES (?1, ?2, ?3)",
            )?;
            for row in capsim_reference::affinity_table() {
                affinity_stmt.execute(params![
                    row.profession.to_string(),
                    row.topic.to_string(),
                    row.affinity_score,
                ])?;
            }

            let mut interest_stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO agent_interests (profession, interest, min_value, max_value) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in capsim_reference::interest_range_table() {
                interest_stmt.execute(params![
                    row.profession.to_string(),
                    row.category.to_string(),
                    row.min,
                    row.max,
                ])?;
            }

            let mut attr_stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO agents_profession_ranges \
                 (profession, financial_capability_min, financial_capability_max, \
                  trend_receptivity_min, trend_receptivity_max, social_status_min, social_status_max, \
                  energy_level_min, energy_level_max, time_budget_min, time_budget_max) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in capsim_reference::attribute_range_table() {
                attr_stmt.execute(params![
                    row.profession.to_string(),
                    row.financial_capability.0,
                    row.financial_capability.1,
                    row.trend_receptivity.0,
                    row.trend_receptivity.1,
                    row.social_status.0,
                    row.social_status.1,
                    row.energy_level.0,
                    row.energy_level.1,
                    row.time_budget.0,
                    row.time_budget.1,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl Repository for SqliteRepository {
    fn create_run(
        &mut self,
        num_agents: u32,
        duration_days: u32,
        config_snapshot: &str,
        started_at: SystemTime,
    ) -> RepoResult<RunId> {
        self.conn.execute(
            "INSERT INTO simulation_runs (num_agents, duration_days, status, started_at_ms, configuration) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                num_agents,
                duration_days,
                run_status_label(RunStatus::Initialized),
                to_unix_millis(started_at),
                config_snapshot
            ],
        )?;
        let run_id = self.conn.last_insert_rowid();
        Ok(RunId(run_id as u32))
    }

    fn load_run(&mut self, run_id: RunId) -> RepoResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT run_id, num_agents, duration_days, status, end_sim_minute, started_at_ms, ended_at_ms, configuration \
                 FROM simulation_runs WHERE run_id = ?1",
                params![run_id.index() as u32],
                |row| {
                    let end_sim_minute: Option<f64> = row.get(4)?;
                    let ended_at_ms: Option<i64> = row.get(6)?;
                    Ok(RunRecord {
                        run_id: RunId(row.get::<_, u32>(0)?),
                        num_agents: row.get(1)?,
                        duration_days: row.get(2)?,
                        status: run_status_from_label(&row.get::<_, String>(3)?),
                        end_sim_minute: end_sim_minute.map(SimTime::new),
                        started_at: from_unix_millis(row.get(5)?),
                        ended_at: ended_at_ms.map(from_unix_millis),
                        config_snapshot: row.get(7)?,
                    })
                },
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => RepoError::RunNotFound(run_id),
                other => RepoError::from(other),
            })
    }

    fn bulk_upsert_persons(&mut self, persons: &[PersonRecord]) -> RepoResult<()> {
        if persons.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO persons (agent_id, profession, first_name, last_name, gender, birth_year, birth_month, birth_day) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
                 ON CONFLICT(agent_id) DO UPDATE SET \
                 profession = excluded.profession, first_name = excluded.first_name, \
                 last_name = excluded.last_name, gender = excluded.gender, \
                 birth_year = excluded.birth_year, birth_month = excluded.birth_month, birth_day = excluded.birth_day",
            )?;
            for p in persons {
                let gender = match p.meta.gender {
                    capsim_agent::Gender::Male => "male",
                    capsim_agent::Gender::Female => "female",
                };
                stmt.execute(params![
                    p.agent_id.index() as u32,
                    p.profession.to_string(),
                    p.meta.first_name,
                    p.meta.last_name,
                    gender,
                    p.meta.date_of_birth.year,
                    p.meta.date_of_birth.month,
                    p.meta.date_of_birth.day,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn create_participant(&mut self, run_id: RunId, agent_id: AgentId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO participants (run_id, agent_id) VALUES (?1, ?2)",
            params![run_id.index() as u32, agent_id.index() as u32],
        )?;
        Ok(())
    }

    fn append_events(&mut self, events: &[EventRow]) -> RepoResult<()> {
        if events.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events (event_id, run_id, event_type, priority, timestamp, agent_id, trend_id, processing_duration_ms) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in events {
                stmt.execute(params![
                    row.event_id.index() as u32,
                    row.run_id.index() as u32,
                    row.kind_label,
                    row.priority,
                    row.timestamp.minutes(),
                    row.agent_id.map(|a| a.index() as u32),
                    row.trend_id.map(|t| t.index() as u32),
                    row.processing_duration_ms,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn append_attribute_history(&mut self, rows: &[AttributeHistoryRow]) -> RepoResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO person_attribute_history \
                 (agent_id, attribute_name, old_value, new_value, delta, reason, source_trend_id, change_timestamp) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.agent_id.index() as u32,
                    row.attribute,
                    row.old_value,
                    row.new_value,
                    row.delta,
                    row.reason,
                    row.source_trend.map(|t| t.index() as u32),
                    row.sim_time.minutes(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn upsert_trends(&mut self, run_id: RunId, trends: &[Trend]) -> RepoResult<()> {
        if trends.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trends \
                 (trend_id, run_id, topic, sentiment, originator_id, parent_trend_id, start_time, base_virality_score, coverage_level, total_interactions) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
                 ON CONFLICT(run_id, trend_id) DO UPDATE SET \
                 coverage_level = excluded.coverage_level, total_interactions = excluded.total_interactions",
            )?;
            for t in trends {
                stmt.execute(params![
                    t.id.index() as u32,
                    run_id.index() as u32,
                    t.topic.to_string(),
                    sentiment_label(t.sentiment),
                    t.originator.index() as u32,
                    t.parent.map(|p| p.index() as u32),
                    t.start_time.minutes(),
                    t.base_virality,
                    coverage_label(t.coverage),
                    t.total_interactions,
                ])?;
            }
        }
        tx.commit()?;
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
        self.conn.execute(
            "UPDATE simulation_runs SET status = ?1, end_sim_minute = ?2, ended_at_ms = ?3 WHERE run_id = ?4",
            params![run_status_label(status), end_time.minutes(), to_unix_millis(ended_at), run_id.index() as u32],
        )?;
        Ok(())
    }
}
