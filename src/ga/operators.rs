//! Mating and mutation operators.
//!
//! Crossover works group by group: an offspring takes the complete week of
//! each group from one of its parents. Since every group row of a parent
//! meets the weekly requirements, so does the offspring.

use rand::Rng;

use super::selection::RouletteWheel;
use super::types::Individual;
use crate::cost::{CostFunction, Weights};
use crate::model::Timetable;
use crate::sa::SwapMove;

/// How the donor parent of each group is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mating {
    /// Uniformly random parent per group.
    Random,
    /// The parent with the lowest cost for that group; the first one on ties.
    ///
    /// Groups are compared with
    /// [`CostFunction::standalone_group_cost`], so a clash counts against
    /// every group involved in it.
    BestGene,
    /// Roulette wheel over the parents' total costs, drawn per group.
    RouletteWheel,
}

impl Mating {
    /// Returns, for every group, the index into `parents` of its donor.
    ///
    /// # Panics
    /// Panics if `parents` is empty.
    pub fn donors<R: Rng>(
        &self,
        parents: &[&Individual],
        cost_fn: &CostFunction<'_>,
        weights: &Weights,
        rng: &mut R,
    ) -> Vec<usize> {
        assert!(!parents.is_empty(), "mating needs at least one parent");
        let groups = cost_fn.instance().group_count();

        match self {
            Mating::Random => (0..groups).map(|_| rng.random_range(0..parents.len())).collect(),
            Mating::BestGene => (0..groups)
                .map(|g| {
                    parents
                        .iter()
                        .enumerate()
                        .min_by_key(|(_, p)| cost_fn.standalone_group_cost(p.table(), g).total(weights))
                        .map(|(i, _)| i)
                        .unwrap_or(0)
                })
                .collect(),
            Mating::RouletteWheel => {
                let scores: Vec<u64> = parents.iter().map(|p| p.score()).collect();
                let wheel = RouletteWheel::from_costs(&scores);
                (0..groups).map(|_| wheel.sample(rng)).collect()
            }
        }
    }
}

/// Mutation applied to every offspring of a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// One random period swap, applied with the current mutation probability.
    Swap,
    /// A full simulated annealing pass.
    Anneal,
}

/// Assembles an offspring taking group `g` from `parents[donors[g]]`.
pub fn crossover(parents: &[&Individual], donors: &[usize]) -> Timetable {
    let mut child = parents[donors[0]].table().clone();
    for (group, &donor) in donors.iter().enumerate().skip(1) {
        if donor != donors[0] {
            child.copy_group_from(parents[donor].table(), group);
        }
    }
    child
}

/// With probability `probability`, swaps two periods of one random group.
///
/// Returns whether the table was touched.
pub fn swap_mutation<R: Rng>(table: &mut Timetable, probability: f64, rng: &mut R) -> bool {
    if !rng.random_bool(probability) {
        return false;
    }
    match SwapMove::random(table, rng) {
        Some(mv) => {
            mv.apply(table);
            true
        }
        None => false,
    }
}
