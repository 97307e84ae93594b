//! End-to-end runs of the timetable search.

use rand::rngs::StdRng;
use rand::SeedableRng;
use u_timetable::construct::Constructor;
use u_timetable::cost::{CostFunction, Weights};
use u_timetable::ga::{Mating, MutationSchedule, Solver, SolverConfig};
use u_timetable::model::{Group, Period, ProblemInstance, Teacher};
use u_timetable::report::{assignments, TimetableGrid};
use u_timetable::sa::{LocalSearch, SaConfig};
use u_timetable::{ConfigError, SolveError};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two groups, two teachers, one day of four slots, two meetings per pair.
fn toy() -> ProblemInstance {
    ProblemInstance::builder(1, 4)
        .teacher(Teacher::with_id("t0"))
        .teacher(Teacher::with_id("t1"))
        .group(Group::with_id("g0"))
        .group(Group::with_id("g1"))
        .requirement("t0", "g0", 2, 2, 0)
        .requirement("t1", "g0", 2, 2, 0)
        .requirement("t0", "g1", 2, 2, 0)
        .requirement("t1", "g1", 2, 2, 0)
        .build()
        .unwrap()
}

/// A tighter week: three groups share three teachers over three days.
fn small_school() -> ProblemInstance {
    let mut builder = ProblemInstance::builder(3, 5);
    for t in ["math", "physics", "history"] {
        builder = builder.teacher(Teacher::with_id(t));
    }
    for g in ["1A", "1B", "1C"] {
        builder = builder.group(Group::with_id(g));
    }
    for g in ["1A", "1B", "1C"] {
        builder = builder
            .requirement("math", g, 4, 2, 1)
            .requirement("physics", g, 3, 1, 0)
            .requirement("history", g, 2, 1, 0);
    }
    builder
        .unavailable("math", Period::new(0, 0))
        .unavailable("history", Period::new(2, 4))
        .build()
        .unwrap()
}

fn config(parallelism: usize, seed: u64) -> SolverConfig {
    SolverConfig {
        weights: Weights::uniform(200.0, 2.0),
        population_size: 16,
        elitism: 2,
        max_iterations: 30,
        initial_mutation_probability: 0.0005,
        max_mutation_probability: 0.005,
        mutation_schedule: MutationSchedule::Geometric { factor: 1.0005 },
        parent_count: 3,
        parallelism,
        seed,
        annealing: SaConfig::new(60, 60.0),
        annealing_probability: 0.1,
        construction_alpha: 0.1,
        refine_initial: false,
        mating: vec![Mating::RouletteWheel, Mating::Random],
    }
}

#[test]
fn toy_construction_has_no_clashes() {
    let instance = toy();
    let cost_fn = CostFunction::new(&instance);
    let constructor = Constructor::new(&instance);
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let table = constructor.construct(0.1, &mut rng).unwrap();
        let hard = cost_fn.hard_cost(&table);
        assert_eq!(hard.teacher_clashes, 0, "seed {seed}");
        assert!(hard.is_zero(), "seed {seed}: {hard:?}");
    }
}

#[test]
fn toy_search_reaches_zero_hard_cost() {
    init_logger();
    let instance = toy();
    let mut solver = Solver::new(&instance, config(2, 69)).unwrap();
    let population = solver.run().unwrap();

    let best = population.best().unwrap();
    assert!(best.cost().hard.is_zero());
    for w in population.history().windows(2) {
        assert!(w[1].best_score <= w[0].best_score);
    }
}

#[test]
fn best_cost_is_monotonic_with_elitism() {
    init_logger();
    let instance = small_school();
    let mut c = config(3, 11);
    c.annealing_probability = 0.3;
    c.mating = vec![Mating::RouletteWheel, Mating::BestGene, Mating::Random];
    let population = Solver::new(&instance, c).unwrap().run().unwrap();

    let history = population.history();
    assert_eq!(history.len(), 31);
    for w in history.windows(2) {
        assert!(w[1].best_score <= w[0].best_score);
    }
    for ind in population.individuals() {
        assert!(ind.table().meets_weekly_requirements(&instance));
    }
}

#[test]
fn same_seed_and_parallelism_reproduce() {
    let instance = small_school();
    let a = Solver::new(&instance, config(4, 5)).unwrap().run().unwrap();
    let b = Solver::new(&instance, config(4, 5)).unwrap().run().unwrap();

    assert_eq!(a.history(), b.history());
    let tables_a: Vec<_> = a.individuals().iter().map(|i| i.table().clone()).collect();
    let tables_b: Vec<_> = b.individuals().iter().map(|i| i.table().clone()).collect();
    assert_eq!(tables_a, tables_b);
}

#[test]
fn refined_initial_population_is_not_worse() {
    let instance = small_school();
    // One individual per worker: each worker stream starts with the same
    // construction in both runs.
    let mut plain = config(4, 3);
    plain.population_size = 4;
    plain.elitism = 1;
    plain.max_iterations = 1;
    let mut refined = plain.clone();
    refined.refine_initial = true;
    refined.annealing = SaConfig::new(300, 1e-6);

    let a = Solver::new(&instance, plain).unwrap().run().unwrap();
    let b = Solver::new(&instance, refined).unwrap().run().unwrap();
    assert!(b.history()[0].mean_score <= a.history()[0].mean_score);
    assert!(b.history()[0].best_score <= a.history()[0].best_score);
}

#[test]
fn invalid_configs_are_rejected() {
    let instance = toy();

    let mut c = config(2, 1);
    c.elitism = c.population_size;
    assert!(matches!(
        Solver::new(&instance, c),
        Err(SolveError::Config(ConfigError::ElitismTooLarge { .. }))
    ));

    let mut c = config(2, 1);
    c.parent_count = 0;
    assert!(matches!(
        Solver::new(&instance, c),
        Err(SolveError::Config(ConfigError::TooFewParents { parent_count: 0 }))
    ));

    let mut c = config(2, 1);
    c.weights.hard.teacher_clashes = -1.0;
    assert!(matches!(
        Solver::new(&instance, c),
        Err(SolveError::Config(ConfigError::InvalidWeight { .. }))
    ));
}

#[test]
fn annealing_alone_improves_a_bad_table() {
    let instance = small_school();
    let cost_fn = CostFunction::new(&instance);
    let weights = Weights::uniform(200.0, 2.0);
    let mut rng = StdRng::seed_from_u64(21);
    let table = Constructor::new(&instance).construct(1.0, &mut rng).unwrap();
    let start = cost_fn.total_cost(&table).total(&weights);

    let search = LocalSearch::new(cost_fn, weights, SaConfig::new(2_000, 1e-6));
    let result = search.run(&table, &mut rng);
    assert!(result.cost.total(&weights) <= start);
    assert!(result.table.meets_weekly_requirements(&instance));
}

#[test]
fn report_lists_every_meeting() {
    let instance = toy();
    let population = Solver::new(&instance, config(1, 2)).unwrap().run().unwrap();
    let best = population.best().unwrap();

    assert_eq!(assignments(&instance, best.table()).count(), 8);
    let text = TimetableGrid::new(&instance, best.table(), 0).to_string();
    assert_eq!(text.lines().count(), 2);
    assert!(text.starts_with("g0"));
}
