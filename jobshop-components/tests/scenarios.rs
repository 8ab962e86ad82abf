//! End-to-end shop scenarios with closed-form expectations.
//!
//! Fixed policies make every trace exactly predictable, so these tests pin
//! the full deterministic behavior: FIFO ordering, capacity sharing, horizon
//! cutoff, and replay stability.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use jobshop_components::{
    run_session, ArrivalSource, DurationPolicy, MetricsSink, ServerPool, ShopConfig,
};
use jobshop_core::{SimError, SimTime, Simulation};

fn fixed_shop(n_machines: usize, initial_tasks: usize) -> ShopConfig {
    ShopConfig {
        n_machines,
        initial_tasks,
        horizon: 100.0,
        service_duration: DurationPolicy::Fixed { seconds: 10.0 },
        arrival_interval: DurationPolicy::Fixed { seconds: 3.0 },
        seed: 7,
    }
}

#[test]
fn serial_fifo_queue_drains_in_arrival_order() {
    let report = run_session(&fixed_shop(1, 4)).unwrap();

    // One server, 10 s jobs: a completion every 10 s up to the horizon.
    assert_eq!(report.observations.len(), 10);
    assert_eq!(report.final_time, SimTime::from_secs(100));

    let waits: Vec<u64> = report
        .observations
        .iter()
        .map(|obs| obs.wait.as_secs())
        .collect();
    // The four initial tasks drain serially; the arrival stream then queues
    // up behind them (arrivals at t = 3, 6, 9, ... get served from t = 40).
    assert_eq!(waits, vec![0, 10, 20, 30, 37, 44, 51, 58, 65, 72]);

    for obs in &report.observations {
        assert_eq!(obs.service, Duration::from_secs(10));
    }
    assert_eq!(report.mean_service, Some(Duration::from_secs(10)));
    assert_eq!(report.mean_wait, Some(Duration::from_millis(38_700)));
}

#[test]
fn extra_servers_absorb_the_initial_burst() {
    let report = run_session(&fixed_shop(3, 4)).unwrap();

    let waits: Vec<u64> = report
        .observations
        .iter()
        .map(|obs| obs.wait.as_secs())
        .collect();
    // Three of the four initial tasks start immediately; the fourth takes the
    // first slot freed at t = 10. The early arrivals (t = 3, 6) slot in right
    // behind it.
    assert_eq!(&waits[..6], &[0, 0, 0, 10, 7, 4]);

    // Three servers complete three tasks every 10 s from t = 10 through 100.
    assert_eq!(report.observations.len(), 30);
    for obs in &report.observations {
        assert_eq!(obs.service, Duration::from_secs(10));
    }
}

#[test]
fn horizon_before_first_arrival_leaves_no_data() {
    let config = ShopConfig {
        n_machines: 1,
        initial_tasks: 0,
        horizon: 4.0,
        service_duration: DurationPolicy::Fixed { seconds: 10.0 },
        arrival_interval: DurationPolicy::Fixed { seconds: 5.0 },
        seed: 0,
    };
    let report = run_session(&config).unwrap();

    assert!(report.observations.is_empty());
    assert_eq!(report.mean_wait, None);
    assert_eq!(report.mean_service, None);
    assert_eq!(report.backlog, 0);
    // Only the time-zero resumption of the arrival source ever ran.
    assert_eq!(report.final_time, SimTime::zero());
}

#[test]
fn fifo_waits_accumulate_prior_service_times() {
    let config = ShopConfig {
        n_machines: 1,
        initial_tasks: 5,
        horizon: 1_000.0,
        service_duration: DurationPolicy::UniformInt { center: 6, spread: 3 },
        arrival_interval: DurationPolicy::Fixed { seconds: 2_000.0 },
        seed: 123,
    };
    let report = run_session(&config).unwrap();

    // All five burst tasks complete; with one server each task's wait is
    // exactly the sum of the service times drawn before it.
    assert_eq!(report.observations.len(), 5);
    assert_eq!(report.observations[0].wait, Duration::ZERO);
    for pair in report.observations.windows(2) {
        assert_eq!(pair[1].wait, pair[0].wait + pair[0].service);
    }
}

#[test]
fn in_service_never_exceeds_capacity() {
    for capacity in 1..=4 {
        let mut sim = Simulation::with_seed(11);
        let pool = Rc::new(RefCell::new(ServerPool::new(capacity).unwrap()));
        let sink = Rc::new(RefCell::new(MetricsSink::new()));
        let interval = DurationPolicy::Exponential { rate: 0.9 }.build().unwrap();
        let service = DurationPolicy::Exponential { rate: 1.0 }.build().unwrap();

        sim.spawn(Box::new(ArrivalSource::new(
            interval,
            service,
            Rc::clone(&pool),
            Rc::clone(&sink),
            4,
        )));

        let horizon = SimTime::from_secs(500);
        while sim.peek_next_event_time().is_some_and(|time| time <= horizon) {
            sim.step().unwrap();
            let pool = pool.borrow();
            assert!(pool.in_use() <= pool.capacity());
        }
        assert!(!sink.borrow().is_empty());
    }
}

#[test]
fn identical_configs_produce_identical_observations() {
    let config = ShopConfig {
        n_machines: 2,
        initial_tasks: 4,
        horizon: 2_000.0,
        service_duration: DurationPolicy::Exponential { rate: 1.0 },
        arrival_interval: DurationPolicy::Exponential { rate: 0.9 },
        seed: 99,
    };

    let first = run_session(&config).unwrap();
    let second = run_session(&config).unwrap();

    assert!(!first.observations.is_empty());
    assert_eq!(first.observations, second.observations);
    assert_eq!(first.final_time, second.final_time);
    assert_eq!(first.backlog, second.backlog);
}

#[test]
fn negative_arrival_draw_surfaces_invalid_delay() {
    let config = ShopConfig {
        n_machines: 1,
        initial_tasks: 0,
        horizon: 100.0,
        service_duration: DurationPolicy::Fixed { seconds: 1.0 },
        // Spread past zero: every draw is -5 seconds.
        arrival_interval: DurationPolicy::UniformInt { center: -5, spread: 0 },
        seed: 0,
    };
    let err = run_session(&config).unwrap_err();
    assert_eq!(err, SimError::InvalidDelay { seconds: -5.0 });
}
