//! Fitness-proportionate parent selection.
//!
//! # References
//!
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning", ch. 1 (roulette wheel)
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use rand::Rng;

/// Roulette wheel over a set of costs (lower is better).
///
/// Costs are turned into fitness values `ceiling - cost`, with
/// `ceiling = max + max(1, round(0.1 * max))`, so every entry has positive
/// fitness and the worst one still gets a small slice. The cumulative
/// distribution has `n + 1` entries starting at 0.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_timetable::ga::RouletteWheel;
///
/// let wheel = RouletteWheel::from_costs(&[10, 50, 100]);
/// assert_eq!(wheel.cdf().len(), 4);
///
/// let mut rng = StdRng::seed_from_u64(0);
/// assert!(wheel.sample(&mut rng) < 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouletteWheel {
    cdf: Vec<f64>,
}

impl RouletteWheel {
    /// Builds the wheel.
    ///
    /// # Panics
    /// Panics if `costs` is empty.
    pub fn from_costs(costs: &[u64]) -> Self {
        assert!(!costs.is_empty(), "cannot build a roulette wheel without entries");

        let max = costs.iter().copied().max().unwrap_or(0);
        let margin = ((max as f64) * 0.1).round().max(1.0);
        let ceiling = max as f64 + margin;

        let fitness: Vec<f64> = costs.iter().map(|&c| ceiling - c as f64).collect();
        let sum: f64 = fitness.iter().sum();

        let mut cdf = Vec::with_capacity(costs.len() + 1);
        cdf.push(0.0);
        let mut acc = 0.0;
        for f in fitness {
            acc += f / sum;
            cdf.push(acc);
        }
        Self { cdf }
    }

    /// Number of entries on the wheel.
    pub fn len(&self) -> usize {
        self.cdf.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// Draws an index in `[0, len())`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let p: f64 = rng.random();
        // cdf[0] == 0 <= p, so the partition point is at least 1.
        let upper = self.cdf.partition_point(|&c| c <= p);
        (upper - 1).min(self.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cdf_shape() {
        let wheel = RouletteWheel::from_costs(&[0, 40, 100]);
        let cdf = wheel.cdf();
        assert_eq!(cdf.len(), 4);
        assert_eq!(cdf[0], 0.0);
        assert!((cdf[3] - 1.0).abs() < 1e-9);
        for w in cdf.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn test_ceiling_margin() {
        // max = 100, ceiling = 110: fitness 110, 10.
        let wheel = RouletteWheel::from_costs(&[0, 100]);
        assert!((wheel.cdf()[1] - 110.0 / 120.0).abs() < 1e-12);

        // max = 3 rounds to a margin of 0, raised to 1.
        let wheel = RouletteWheel::from_costs(&[3, 3]);
        assert!((wheel.cdf()[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero_costs_uniform() {
        let wheel = RouletteWheel::from_costs(&[0, 0, 0, 0]);
        for (i, c) in wheel.cdf().iter().enumerate() {
            assert!((c - i as f64 * 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sample_in_bounds_and_biased() {
        let wheel = RouletteWheel::from_costs(&[0, 1000, 1000, 1000]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            let i = wheel.sample(&mut rng);
            assert!(i < 4);
            counts[i] += 1;
        }
        // Fitness 1100 vs 100 each.
        assert!(counts[0] > counts[1] + counts[2] + counts[3]);
    }

    #[test]
    fn test_single_entry() {
        let wheel = RouletteWheel::from_costs(&[7]);
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..50 {
            assert_eq!(wheel.sample(&mut rng), 0);
        }
    }

    #[test]
    #[should_panic]
    fn test_empty_panics() {
        let _ = RouletteWheel::from_costs(&[]);
    }
}
