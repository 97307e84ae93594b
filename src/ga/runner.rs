//! Evolutionary loop execution.
//!
//! [`Solver`] orchestrates the complete process:
//! construction → evaluation → elitism → mating → mutation → repeat.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::config::SolverConfig;
use super::operators::{crossover, swap_mutation, Mating, Mutation};
use super::selection::RouletteWheel;
use super::types::{GenerationStats, Individual, Population};
use crate::construct::Constructor;
use crate::cost::{CostFunction, Weights};
use crate::error::{ConstructionError, SolveError};
use crate::model::ProblemInstance;
use crate::sa::LocalSearch;

/// Random generators of one solver.
///
/// The root generator drives per-generation decisions; each worker owns a
/// generator split from the root at creation, so a fixed seed and
/// parallelism reproduce a run exactly regardless of thread scheduling.
#[derive(Debug, Clone)]
struct RngContext {
    root: StdRng,
    workers: Vec<StdRng>,
}

impl RngContext {
    fn new(seed: u64, parallelism: usize) -> Self {
        let mut root = StdRng::seed_from_u64(seed);
        let workers = (0..parallelism).map(|_| StdRng::from_rng(&mut root)).collect();
        Self { root, workers }
    }
}

/// Sizes of `parts` contiguous ranges covering `total` items.
///
/// The first `total % parts` ranges take one extra item.
pub(crate) fn partition(total: usize, parts: usize) -> Vec<usize> {
    let base = total / parts;
    let rem = total % parts;
    (0..parts).map(|i| base + usize::from(i < rem)).collect()
}

/// Genetic algorithm over timetables.
///
/// # Usage
///
/// ```ignore
/// let mut solver = Solver::new(&instance, config)?;
/// let population = solver.run()?;
/// let best = population.best().unwrap();
/// println!("best cost: {}", best.score());
/// ```
pub struct Solver<'a> {
    instance: &'a ProblemInstance,
    config: SolverConfig,
    pool: ThreadPool,
    rngs: RngContext,
}

impl<'a> Solver<'a> {
    /// Validates `config` and starts the worker pool.
    pub fn new(instance: &'a ProblemInstance, config: SolverConfig) -> Result<Self, SolveError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.parallelism)
            .thread_name(|i| format!("timetable-worker-{i}"))
            .build()?;
        let rngs = RngContext::new(config.seed, config.parallelism);
        Ok(Self {
            instance,
            config,
            pool,
            rngs,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs `max_iterations` generations and returns the final population.
    ///
    /// The random streams continue across calls, so a second call on the
    /// same solver explores differently. Build a new solver to repeat a run.
    pub fn run(&mut self) -> Result<Population, SolveError> {
        info!(
            "timetable search: {} groups, {} teachers, {} periods, population {}, {} generations, {} workers",
            self.instance.group_count(),
            self.instance.teacher_count(),
            self.instance.period_count(),
            self.config.population_size,
            self.config.max_iterations,
            self.config.parallelism
        );

        let mut mutation_probability = self.config.initial_mutation_probability;
        let mut population = self.initialize()?;

        let mut history = Vec::with_capacity(self.config.max_iterations + 1);
        history.push(GenerationStats::of(0, &population, mutation_probability));

        for generation in 0..self.config.max_iterations {
            let mating = self.config.mating_at(generation);
            let mutation = if self.rngs.root.random_bool(self.config.annealing_probability) {
                Mutation::Anneal
            } else {
                Mutation::Swap
            };

            population = self.next_generation(&population, mating, mutation, mutation_probability);

            let stats = GenerationStats::of(generation + 1, &population, mutation_probability);
            debug!(
                "generation {}: best {}, mean {:.1}, {:?} mating, {:?} mutation (p = {:.6})",
                stats.generation,
                stats.best_score,
                stats.mean_score,
                mating,
                mutation,
                mutation_probability
            );
            history.push(stats);

            mutation_probability = self.config.mutation_schedule.next(
                generation,
                mutation_probability,
                self.config.max_mutation_probability,
            );
        }

        let population = Population::new(population, history);
        if let Some(best) = population.best() {
            info!(
                "timetable search finished: best cost {} (hard {:?})",
                best.score(),
                best.cost().hard
            );
        }
        Ok(population)
    }

    /// Builds and evaluates the initial population on the worker pool.
    fn initialize(&mut self) -> Result<Vec<Individual>, SolveError> {
        let cost_fn = CostFunction::new(self.instance);
        let constructor = Constructor::new(self.instance);
        let search = LocalSearch::new(cost_fn, self.config.weights, self.config.annealing);
        let weights = self.config.weights;
        let alpha = self.config.construction_alpha;
        let refine = self.config.refine_initial;

        let sizes = partition(self.config.population_size, self.config.parallelism);
        let workers = &mut self.rngs.workers;

        let chunks = self.pool.install(|| {
            sizes
                .par_iter()
                .zip(workers.par_iter_mut())
                .map(|(&n, rng)| -> Result<Vec<Individual>, ConstructionError> {
                    (0..n)
                        .map(|_| -> Result<Individual, ConstructionError> {
                            let mut table = constructor.construct(alpha, rng)?;
                            if refine {
                                table = search.run(&table, rng).table;
                            }
                            Ok(Individual::evaluate(table, &cost_fn, &weights))
                        })
                        .collect()
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        Ok(chunks.into_iter().flatten().collect())
    }

    /// Breeds the next generation from `population`.
    fn next_generation(
        &mut self,
        population: &[Individual],
        mating: Mating,
        mutation: Mutation,
        mutation_probability: f64,
    ) -> Vec<Individual> {
        let elitism = self.config.elitism;

        // Stable sort: ties keep population order.
        let mut order: Vec<usize> = (0..population.len()).collect();
        order.sort_by_key(|&i| population[i].score());
        let mut next: Vec<Individual> = order[..elitism]
            .iter()
            .map(|&i| population[i].clone())
            .collect();

        let cost_fn = CostFunction::new(self.instance);
        let scores: Vec<u64> = population.iter().map(Individual::score).collect();
        let breeder = Breeder {
            cost_fn,
            weights: self.config.weights,
            wheel: RouletteWheel::from_costs(&scores),
            parent_count: self.config.parent_count,
            mating,
            mutation,
            mutation_probability,
            search: LocalSearch::new(cost_fn, self.config.weights, self.config.annealing),
        };

        let sizes = partition(self.config.population_size - elitism, self.config.parallelism);
        let workers = &mut self.rngs.workers;
        let offspring: Vec<Vec<Individual>> = self.pool.install(|| {
            sizes
                .par_iter()
                .zip(workers.par_iter_mut())
                .map(|(&n, rng)| (0..n).map(|_| breeder.breed(population, rng)).collect::<Vec<_>>())
                .collect()
        });

        next.extend(offspring.into_iter().flatten());
        next
    }
}

/// Everything a worker needs to produce offspring of one generation.
struct Breeder<'a> {
    cost_fn: CostFunction<'a>,
    weights: Weights,
    wheel: RouletteWheel,
    parent_count: usize,
    mating: Mating,
    mutation: Mutation,
    mutation_probability: f64,
    search: LocalSearch<'a>,
}

impl Breeder<'_> {
    fn breed<R: Rng>(&self, population: &[Individual], rng: &mut R) -> Individual {
        let parents: Vec<&Individual> = (0..self.parent_count)
            .map(|_| &population[self.wheel.sample(rng)])
            .collect();
        let donors = self.mating.donors(&parents, &self.cost_fn, &self.weights, rng);
        let mut table = crossover(&parents, &donors);

        match self.mutation {
            Mutation::Swap => {
                swap_mutation(&mut table, self.mutation_probability, rng);
            }
            Mutation::Anneal => table = self.search.run(&table, rng).table,
        }

        Individual::evaluate(table, &self.cost_fn, &self.weights)
    }
}
