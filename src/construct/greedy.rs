//! Urgency-driven randomized construction.

use log::trace;
use rand::Rng;

use crate::error::ConstructionError;
use crate::model::{ProblemInstance, Timetable};

/// Tolerance when comparing urgencies against the candidate threshold.
const URGENCY_EPSILON: f64 = 1e-9;

/// Builds complete timetables one meeting at a time.
///
/// Each step scores every pending (group, teacher) pair by
///
/// ```text
/// urgency = unscheduled / (free_intersection + 1)
/// ```
///
/// where `free_intersection` counts the periods in which both the group and
/// the teacher are still free. A pair is drawn uniformly among those within
/// `alpha` of the most urgent one (`alpha = 0`: only the most urgent,
/// `alpha = 1`: every pending pair), then placed in a uniformly drawn period
/// of its free intersection. When the intersection is empty the meeting goes
/// to any free period of the group, accepting a teacher clash or
/// unavailability that the search has to repair later.
///
/// The only failure is a group with no free period at all for a pending
/// meeting, which means the group needs more meetings than the week holds.
#[derive(Debug, Clone, Copy)]
pub struct Constructor<'a> {
    instance: &'a ProblemInstance,
}

impl<'a> Constructor<'a> {
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self { instance }
    }

    /// Builds one timetable that satisfies every weekly requirement.
    ///
    /// `alpha` must lie in `[0, 1]`.
    pub fn construct<R: Rng>(
        &self,
        alpha: f64,
        rng: &mut R,
    ) -> Result<Timetable, ConstructionError> {
        debug_assert!((0.0..=1.0).contains(&alpha), "alpha out of range: {alpha}");

        let instance = self.instance;
        let period_count = instance.period_count();
        let pairs = instance.lesson_pairs();

        let mut table = Timetable::for_instance(instance);
        let mut unscheduled: Vec<usize> = pairs
            .iter()
            .map(|p| instance.weekly_occurrences(p.group, p.teacher))
            .collect();
        let total: usize = unscheduled.iter().sum();

        // [group][period] and [teacher][period]
        let mut group_free = vec![true; instance.group_count() * period_count];
        let mut teacher_free: Vec<bool> = (0..instance.teacher_count())
            .flat_map(|t| (0..period_count).map(move |p| !instance.is_unavailable(p, t)))
            .collect();

        let mut urgency = vec![0.0; pairs.len()];
        let mut candidates = Vec::with_capacity(pairs.len());
        let mut free_periods = Vec::with_capacity(period_count);

        for _ in 0..total {
            let mut min_urgency = f64::INFINITY;
            let mut max_urgency = f64::NEG_INFINITY;
            for (i, pair) in pairs.iter().enumerate() {
                if unscheduled[i] == 0 {
                    continue;
                }
                let g = &group_free[pair.group * period_count..(pair.group + 1) * period_count];
                let t = &teacher_free[pair.teacher * period_count..(pair.teacher + 1) * period_count];
                let intersection = g.iter().zip(t).filter(|&(&a, &b)| a && b).count();

                let u = unscheduled[i] as f64 / (intersection + 1) as f64;
                urgency[i] = u;
                min_urgency = min_urgency.min(u);
                max_urgency = max_urgency.max(u);
            }

            let threshold = max_urgency - alpha * (max_urgency - min_urgency) - URGENCY_EPSILON;
            candidates.clear();
            candidates.extend((0..pairs.len()).filter(|&i| unscheduled[i] > 0 && urgency[i] >= threshold));
            let chosen = candidates[rng.random_range(0..candidates.len())];
            let pair = pairs[chosen];

            free_periods.clear();
            free_periods.extend((0..period_count).filter(|&p| {
                group_free[pair.group * period_count + p]
                    && teacher_free[pair.teacher * period_count + p]
            }));
            if free_periods.is_empty() {
                trace!(
                    "no common free period for group {} and teacher {}, ignoring the teacher",
                    pair.group,
                    pair.teacher
                );
                free_periods
                    .extend((0..period_count).filter(|&p| group_free[pair.group * period_count + p]));
            }
            if free_periods.is_empty() {
                return Err(ConstructionError::NoFreePeriod {
                    group: pair.group,
                    teacher: pair.teacher,
                });
            }

            let period = free_periods[rng.random_range(0..free_periods.len())];
            table.assign(period, pair.group, pair.teacher);
            unscheduled[chosen] -= 1;
            group_free[pair.group * period_count + period] = false;
            teacher_free[pair.teacher * period_count + period] = false;
        }

        Ok(table)
    }
}
