//! Tests for the trial simulator running drivers in the grid world

use std::io::{BufRead, BufReader};

use smartcab::{
    app::{AgentConfig, App},
    pipeline::{
        JsonlObserver, MetricsObserver, RandomDriver, SharedObserver, SimulationConfig,
        SimulationResult, Simulator, TrialRecord,
    },
    ports::Driver,
    world::WorldConfig,
};

fn seeded_app(seed: u64) -> App {
    App::for_testing().with_default_seed(seed).build()
}

fn run_agent(seed: u64, trials: usize) -> SimulationResult {
    let app = seeded_app(seed);
    let mut world = app.create_world(WorldConfig::default()).unwrap();
    let mut agent = app.create_agent(AgentConfig::default()).unwrap();
    let mut simulator = app
        .create_simulator(SimulationConfig { trials, seed: None })
        .unwrap();
    simulator.run(&mut world, &mut agent).unwrap()
}

#[test]
fn test_agent_run_counts_every_trial() {
    let app = seeded_app(42);
    let mut world = app.create_world(WorldConfig::default()).unwrap();
    let mut agent = app.create_agent(AgentConfig::default()).unwrap();
    let mut simulator = app
        .create_simulator(SimulationConfig {
            trials: 20,
            seed: None,
        })
        .unwrap();

    let result = simulator.run(&mut world, &mut agent).unwrap();

    assert_eq!(result.trials, 20);
    assert_eq!(agent.trials(), 20);
    assert!(result.successes <= 20);
    assert!((0.0..=1.0).contains(&result.success_rate));
    assert!(result.total_steps >= 20);
    assert_eq!(result.table_size, Some(agent.q_table().size()));
    assert!(agent.q_table().size() > 0);
    // Every arrival pays the bonus while the deadline is enforced.
    assert_eq!(agent.successes(), result.successes);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let first = run_agent(7, 15);
    let second = run_agent(7, 15);

    assert_eq!(first.successes, second.successes);
    assert_eq!(first.total_steps, second.total_steps);
    assert_eq!(first.penalties, second.penalties);
    assert_eq!(first.total_reward, second.total_reward);
    assert_eq!(first.table_size, second.table_size);
}

#[test]
fn test_zero_trials_rejected() {
    let mut simulator = Simulator::new(SimulationConfig {
        trials: 0,
        seed: Some(1),
    });
    let mut world = seeded_app(1).create_world(WorldConfig::default()).unwrap();
    let mut driver = RandomDriver::new("Random");
    assert!(simulator.run(&mut world, &mut driver).is_err());
}

#[test]
fn test_random_baseline_runs() {
    let app = seeded_app(3);
    let mut world = app.create_world(WorldConfig::default()).unwrap();
    let mut driver = RandomDriver::new("Random").with_seed(3);
    let metrics = SharedObserver::new(MetricsObserver::new());
    let mut simulator = Simulator::new(SimulationConfig {
        trials: 10,
        seed: None,
    })
    .with_observer(Box::new(metrics.clone()));

    let result = simulator.run(&mut world, &mut driver).unwrap();

    assert_eq!(result.driver, "Random");
    assert_eq!(result.trials, 10);
    assert_eq!(result.table_size, None);
    assert_eq!(driver.table_size(), None);

    let summary = metrics.lock().summary();
    assert_eq!(summary.trials, 10);
    assert_eq!(summary.arrivals, result.successes);
    assert_eq!(summary.penalties, result.penalties);
    assert!((summary.avg_steps * 10.0 - result.total_steps as f64).abs() < 1e-9);
}

#[test]
fn test_jsonl_observer_writes_one_record_per_trial() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trials.jsonl");

    let app = seeded_app(11);
    let mut world = app.create_world(WorldConfig::default()).unwrap();
    let mut agent = app.create_agent(AgentConfig::default()).unwrap();
    let mut simulator = app
        .create_simulator(SimulationConfig {
            trials: 5,
            seed: None,
        })
        .unwrap()
        .with_observer(Box::new(JsonlObserver::new(&path).unwrap()));
    simulator.run(&mut world, &mut agent).unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let records: Vec<TrialRecord> = BufReader::new(file)
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect();

    assert_eq!(records.len(), 5);
    for (idx, record) in records.iter().enumerate() {
        assert_eq!(record.trial, idx);
        assert_eq!(record.outcome.trial, idx);
        assert_eq!(record.steps.len(), record.outcome.steps);

        let setup = record.setup.expect("setup recorded");
        assert!(setup.start.location.distance(&setup.destination) >= 4);
        // The trial ends once the deadline passes zero.
        assert!(record.outcome.steps <= setup.deadline as usize + 1);

        // Only the very first tick of the run has nothing to back up.
        let learned = record.steps.iter().filter(|s| s.learned_value.is_none()).count();
        assert_eq!(learned, usize::from(idx == 0));
    }
}

#[test]
fn test_summary_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");

    let result = run_agent(5, 8);
    result.save(&path).unwrap();
    let loaded = SimulationResult::load(&path).unwrap();

    assert_eq!(loaded.driver, "Q-Learning");
    assert_eq!(loaded.trials, 8);
    assert_eq!(loaded.successes, result.successes);
    assert_eq!(loaded.total_steps, result.total_steps);
}

#[test]
fn test_no_deadline_runs_until_hard_limit_or_arrival() {
    let app = seeded_app(21);
    let mut world = app
        .create_world(WorldConfig::default().with_enforce_deadline(false))
        .unwrap();
    let mut driver = RandomDriver::new("Random").with_seed(21);
    let mut simulator = Simulator::new(SimulationConfig {
        trials: 3,
        seed: None,
    });

    let result = simulator.run(&mut world, &mut driver).unwrap();
    assert_eq!(result.trials, 3);
    // Deadline at most 5 * (7 + 5) plus the 100 tick grace period.
    assert!(result.total_steps <= 3 * (60 + 101));
}
