//! Unit tests for capsim-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, EventId, TrendId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(TrendId(100) > TrendId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(TrendId::INVALID.0, u32::MAX);
        assert_eq!(EventId::INVALID.0, u64::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod domain {
    use crate::{Coverage, RunStatus};

    #[test]
    fn coverage_factors() {
        assert_eq!(Coverage::Low.factor(), 0.3);
        assert_eq!(Coverage::Middle.factor(), 0.6);
        assert_eq!(Coverage::High.factor(), 1.0);
    }

    #[test]
    fn coverage_escalation_thresholds() {
        assert_eq!(Coverage::Low.escalate(49, 50, 500), Coverage::Low);
        assert_eq!(Coverage::Low.escalate(50, 50, 500), Coverage::Middle);
        assert_eq!(Coverage::Middle.escalate(499, 50, 500), Coverage::Middle);
        assert_eq!(Coverage::Middle.escalate(500, 50, 500), Coverage::High);
        assert_eq!(Coverage::High.escalate(0, 50, 500), Coverage::High);
    }

    #[test]
    fn run_status_terminal_states() {
        assert!(!RunStatus::Initialized.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
        assert!(!RunStatus::Stopping.is_terminal());
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
    }
}

#[cfg(test)]
mod time {
    use crate::{Clock, FastClock, SimConfig, SimTime, StopSignal};

    #[test]
    fn sim_time_arithmetic() {
        let t = SimTime::new(10.0);
        assert_eq!(t + 5.0, SimTime::new(15.0));
        assert_eq!(t.offset(3.0), SimTime::new(13.0));
        assert_eq!(SimTime::new(15.0) - SimTime::new(10.0), 5.0);
    }

    #[test]
    fn sim_time_ordering_is_total() {
        let mut v = vec![SimTime::new(3.5), SimTime::new(1.0), SimTime::new(2.25)];
        v.sort();
        assert_eq!(
            v,
            vec![SimTime::new(1.0), SimTime::new(2.25), SimTime::new(3.5)]
        );
    }

    #[test]
    fn hhmm_wraps_daily() {
        assert_eq!(SimTime::new(0.0).as_hhmm(), "00:00");
        assert_eq!(SimTime::new(90.0).as_hhmm(), "01:30");
        assert_eq!(SimTime::new(1440.0).as_hhmm(), "00:00");
        assert_eq!(SimTime::new(1530.0).as_hhmm(), "01:30");
    }

    #[test]
    fn day_index() {
        assert_eq!(SimTime::new(0.0).day_index(), 0);
        assert_eq!(SimTime::new(1439.0).day_index(), 0);
        assert_eq!(SimTime::new(1440.0).day_index(), 1);
        assert_eq!(SimTime::new(2881.0).day_index(), 2);
    }

    #[test]
    fn fast_clock_advances_without_blocking() {
        let mut clock = FastClock::new();
        assert_eq!(clock.now(), SimTime::ZERO);
        clock.sleep_until(SimTime::new(100.0));
        assert_eq!(clock.now(), SimTime::new(100.0));
        // sleeping to an earlier time never moves backward
        clock.sleep_until(SimTime::new(50.0));
        assert_eq!(clock.now(), SimTime::new(100.0));
    }

    #[test]
    fn stop_signal_trigger_is_idempotent() {
        let stop = StopSignal::new();
        assert!(!stop.is_triggered());
        stop.trigger();
        stop.trigger();
        assert!(stop.is_triggered());
    }

    #[test]
    fn sim_config_end_sim_time() {
        let cfg = SimConfig {
            duration_days: 3,
            ..SimConfig::default()
        };
        assert_eq!(cfg.end_sim_time(), SimTime::new(3.0 * 1440.0));
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, AgentId(0));
        let mut r2 = AgentRng::new(12345, AgentId(0));
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_agents_differ() {
        let mut r0 = AgentRng::new(1, AgentId(0));
        let mut r1 = AgentRng::new(1, AgentId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent agents should diverge");
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = AgentRng::new(0, AgentId(0));
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f32..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = AgentRng::new(0, AgentId(0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}
