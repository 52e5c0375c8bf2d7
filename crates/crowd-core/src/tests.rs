//! Unit tests for crowd-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, GroupId};

    #[test]
    fn ordering() {
        assert!(AgentId(3) < AgentId(7));
        assert!(GroupId(2) > GroupId(1));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(GroupId::default(), GroupId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(GroupId::from(1).to_string(), "GroupId(1)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Point, Rect};

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_sq(b), 25.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(!r.contains(Point::new(10.1, 5.0)));
    }

    #[test]
    fn rect_validity() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!Rect::new(0.0, f64::NAN, 1.0, 1.0).is_valid());
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_next_and_display() {
        assert_eq!(Tick(10).next(), Tick(11));
        assert_eq!(Tick::ZERO.next().to_string(), "T1");
    }

    #[test]
    fn clock_maps_ticks_to_time() {
        let mut clock = SimClock::new(0.0, 0.5);
        assert_eq!(clock.now(), 0.0);
        assert_eq!(clock.tick_end(), 0.5);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.now(), 1.0);
        assert_eq!(clock.tick_end(), 1.5);
    }

    #[test]
    fn clock_with_offset_start() {
        let clock = SimClock::new(10.0, 1.0);
        assert_eq!(clock.time_of(Tick(3)), 13.0);
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn sim_config_end_tick() {
        let cfg = SimConfig { total_ticks: 250, ..SimConfig::default() };
        assert_eq!(cfg.end_tick(), Tick(250));
        assert_eq!(cfg.make_clock().tick_duration_secs, cfg.tick_duration_secs);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.uniform(), r2.uniform());
        }
    }

    #[test]
    fn children_are_reproducible_and_distinct() {
        let mut root_a = SimRng::new(9);
        let mut root_b = SimRng::new(9);
        let mut a0 = root_a.child(0);
        let mut b0 = root_b.child(0);
        assert_eq!(a0.uniform(), b0.uniform());

        let mut a1 = root_a.child(1);
        let mut b1 = root_b.child(1);
        assert_ne!(a1.uniform(), a0.uniform());
        assert_eq!(a1.uniform(), b1.uniform());
    }

    #[test]
    fn uniform_in_unit_interval() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.uniform();
            assert!((0.0..1.0).contains(&v));
        }
    }
}

#[cfg(test)]
mod params {
    use crate::{CoreError, ModelParams};

    #[test]
    fn defaults_apply_when_absent() {
        let p = ModelParams::new();
        assert_eq!(p.rate_or("infectionRate", 0.25).unwrap(), 0.25);
        assert_eq!(p.count_or("infectionsAtStart", 3).unwrap(), 3);
    }

    #[test]
    fn rate_out_of_range_rejected() {
        let p = ModelParams::new().with("infectionRate", 1.5);
        assert!(matches!(
            p.rate_or("infectionRate", 0.0),
            Err(CoreError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn non_finite_rejected() {
        let p = ModelParams::new().with("searchRadius", f64::INFINITY);
        assert!(p.positive_or("searchRadius", 1.0).is_err());
    }

    #[test]
    fn fractional_count_rejected() {
        let p = ModelParams::new().with("cohortSize", 2.5);
        assert!(p.count_or("cohortSize", 1).is_err());
    }

    #[test]
    fn unknown_name_rejected() {
        let p = ModelParams::new().with("infectionRate", 0.1).with("infektionRate", 0.2);
        match p.ensure_known("sir", &["infectionRate"]) {
            Err(CoreError::UnknownParameter { model, name }) => {
                assert_eq!(model, "sir");
                assert_eq!(name, "infektionRate");
            }
            other => panic!("expected UnknownParameter, got {other:?}"),
        }
    }
}
