//! Timetable evaluation.

use std::ops::Range;

use super::types::{HardCost, SoftCost, TotalCost, DOUBLE_LESSON_DEVIATION};
use crate::model::{ProblemInstance, Timetable};

/// Pure evaluator of timetables against a [`ProblemInstance`].
///
/// Holds nothing but a shared reference to the instance, so one evaluator
/// can be used from any number of threads at once.
///
/// # Idleness
///
/// Idleness counts, per day, the free slots before each busy slot since the
/// previous busy slot (or since the start of the day). A day `_ X _ X _`
/// costs 2: the leading gap and the gap in the middle. Free slots after the
/// last lesson of the day are never penalized, so finishing early is fine.
///
/// # Double lessons
///
/// Two meetings of the same pair in adjacent slots of one day form one
/// double lesson. The second meeting of a double is never paired again, so
/// four adjacent meetings realize two doubles and three realize one. The
/// realized count is compared with the target by
/// [`DOUBLE_LESSON_DEVIATION`].
#[derive(Debug, Clone, Copy)]
pub struct CostFunction<'a> {
    instance: &'a ProblemInstance,
}

/// Per-group cost terms that add up exactly across groups.
#[derive(Debug, Default, Clone, Copy)]
struct GroupTerms {
    group_idleness: u32,
    teacher_unavailabilities: u32,
    daily_exceedances: u32,
    double_lesson_deviation: u32,
}

/// Reusable per-teacher buffers.
struct Scratch {
    daily: Vec<usize>,
    realized_doubles: Vec<usize>,
    unpaired: Vec<Option<usize>>,
}

impl Scratch {
    fn new(teacher_count: usize) -> Self {
        Self {
            daily: vec![0; teacher_count],
            realized_doubles: vec![0; teacher_count],
            unpaired: vec![None; teacher_count],
        }
    }
}

impl<'a> CostFunction<'a> {
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self { instance }
    }

    pub fn instance(&self) -> &'a ProblemInstance {
        self.instance
    }

    /// Hard-constraint violations of the whole table.
    pub fn hard_cost(&self, table: &Timetable) -> HardCost {
        let terms = self.summed_group_terms(table);
        HardCost {
            teacher_clashes: self.teacher_clashes(table),
            group_idleness: terms.group_idleness,
            teacher_unavailabilities: terms.teacher_unavailabilities,
            daily_exceedances: terms.daily_exceedances,
        }
    }

    /// Soft-preference deviations of the whole table.
    pub fn soft_cost(&self, table: &Timetable) -> SoftCost {
        SoftCost {
            teacher_idleness: self.teacher_idleness(table),
            double_lesson_deviation: self.summed_group_terms(table).double_lesson_deviation,
        }
    }

    /// Full evaluation of `table`.
    pub fn total_cost(&self, table: &Timetable) -> TotalCost {
        let terms = self.summed_group_terms(table);
        TotalCost {
            hard: HardCost {
                teacher_clashes: self.teacher_clashes(table),
                group_idleness: terms.group_idleness,
                teacher_unavailabilities: terms.teacher_unavailabilities,
                daily_exceedances: terms.daily_exceedances,
            },
            soft: SoftCost {
                teacher_idleness: self.teacher_idleness(table),
                double_lesson_deviation: terms.double_lesson_deviation,
            },
        }
    }

    /// Cost contribution of a single group.
    ///
    /// A clash is charged to the group with the larger index, so summing this
    /// over all groups reproduces the whole-table clash, unavailability,
    /// group idleness, daily exceedance and double lesson terms exactly.
    /// Teacher idleness only looks at this group's lessons and is therefore
    /// an approximation.
    pub fn group_cost(&self, table: &Timetable, group: usize) -> TotalCost {
        self.group_cost_against(table, group, 0..group)
    }

    /// Cost of a group's week judged on its own.
    ///
    /// Same as [`group_cost`](Self::group_cost), except that every period in
    /// which any other group holds the same teacher counts as a clash. Used
    /// to compare one group's rows across timetables, where the additive
    /// attribution would hide the clashes of low-indexed groups.
    pub fn standalone_group_cost(&self, table: &Timetable, group: usize) -> TotalCost {
        self.group_cost_against(table, group, 0..table.group_count())
    }

    fn group_cost_against(&self, table: &Timetable, group: usize, others: Range<usize>) -> TotalCost {
        let mut scratch = Scratch::new(self.instance.teacher_count());
        let terms = self.group_terms(table, group, &mut scratch);

        let mut teacher_clashes = 0;
        for period in 0..table.period_count() {
            if let Some(teacher) = table.get(period, group) {
                if others
                    .clone()
                    .any(|other| other != group && table.get(period, other) == Some(teacher))
                {
                    teacher_clashes += 1;
                }
            }
        }

        // Teacher idleness restricted to this group's meetings.
        let mut teacher_idleness = 0;
        let last_slot = &mut scratch.unpaired;
        for day in 0..table.day_count() {
            last_slot.fill(None);
            for (slot, period) in table.day_periods(day).enumerate() {
                if let Some(teacher) = table.get(period, group) {
                    teacher_idleness += gap_before(slot, last_slot[teacher]);
                    last_slot[teacher] = Some(slot);
                }
            }
        }

        TotalCost {
            hard: HardCost {
                teacher_clashes,
                group_idleness: terms.group_idleness,
                teacher_unavailabilities: terms.teacher_unavailabilities,
                daily_exceedances: terms.daily_exceedances,
            },
            soft: SoftCost {
                teacher_idleness,
                double_lesson_deviation: terms.double_lesson_deviation,
            },
        }
    }

    fn summed_group_terms(&self, table: &Timetable) -> GroupTerms {
        let mut scratch = Scratch::new(self.instance.teacher_count());
        let mut terms = GroupTerms::default();
        for group in 0..table.group_count() {
            let g = self.group_terms(table, group, &mut scratch);
            terms.group_idleness += g.group_idleness;
            terms.teacher_unavailabilities += g.teacher_unavailabilities;
            terms.daily_exceedances += g.daily_exceedances;
            terms.double_lesson_deviation += g.double_lesson_deviation;
        }
        terms
    }

    fn teacher_clashes(&self, table: &Timetable) -> u32 {
        let mut load = vec![0u32; self.instance.teacher_count()];
        let mut clashes = 0;
        for period in 0..table.period_count() {
            load.fill(0);
            for teacher in table.period_row(period).flatten() {
                if load[teacher] > 0 {
                    clashes += 1;
                }
                load[teacher] += 1;
            }
        }
        clashes
    }

    fn teacher_idleness(&self, table: &Timetable) -> u32 {
        let teacher_count = self.instance.teacher_count();
        let slot_count = table.slot_count();
        // [teacher][slot] for the current day; a clash still marks one slot.
        let mut busy = vec![false; teacher_count * slot_count];
        let mut idleness = 0;
        for day in 0..table.day_count() {
            busy.fill(false);
            for (slot, period) in table.day_periods(day).enumerate() {
                for teacher in table.period_row(period).flatten() {
                    busy[teacher * slot_count + slot] = true;
                }
            }
            for teacher in 0..teacher_count {
                let row = &busy[teacher * slot_count..(teacher + 1) * slot_count];
                idleness += idleness_of_day(row);
            }
        }
        idleness
    }

    fn group_terms(&self, table: &Timetable, group: usize, scratch: &mut Scratch) -> GroupTerms {
        let instance = self.instance;
        let mut terms = GroupTerms::default();
        scratch.realized_doubles.fill(0);

        for day in 0..table.day_count() {
            scratch.daily.fill(0);
            scratch.unpaired.fill(None);
            let mut last_busy = None;

            for (slot, period) in table.day_periods(day).enumerate() {
                let Some(teacher) = table.get(period, group) else {
                    continue;
                };

                terms.group_idleness += gap_before(slot, last_busy);
                last_busy = Some(slot);

                if instance.is_unavailable(period, teacher) {
                    terms.teacher_unavailabilities += 1;
                }

                scratch.daily[teacher] += 1;
                if scratch.daily[teacher] > instance.max_daily_occurrences(group, teacher) {
                    terms.daily_exceedances += 1;
                }

                match scratch.unpaired[teacher] {
                    Some(prev) if prev + 1 == slot => {
                        scratch.realized_doubles[teacher] += 1;
                        scratch.unpaired[teacher] = None;
                    }
                    _ => scratch.unpaired[teacher] = Some(slot),
                }
            }
        }

        for (teacher, &realized) in scratch.realized_doubles.iter().enumerate() {
            let target = instance.double_lesson_target(group, teacher);
            terms.double_lesson_deviation += DOUBLE_LESSON_DEVIATION.apply(target, realized) as u32;
        }
        terms
    }
}

/// Free slots between `slot` and the previous busy slot of the same day.
#[inline]
fn gap_before(slot: usize, previous: Option<usize>) -> u32 {
    match previous {
        Some(prev) => (slot - prev - 1) as u32,
        None => slot as u32,
    }
}

fn idleness_of_day(busy: &[bool]) -> u32 {
    let mut last = None;
    let mut idleness = 0;
    for (slot, &is_busy) in busy.iter().enumerate() {
        if is_busy {
            idleness += gap_before(slot, last);
            last = Some(slot);
        }
    }
    idleness
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Group, Period, ProblemInstance, Teacher};

    /// 2 groups, 2 teachers, one day of 4 slots, 2 meetings per pair.
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

    fn table_from(instance: &ProblemInstance, rows: &[&[Option<usize>]]) -> Timetable {
        let mut table = Timetable::for_instance(instance);
        for (period, row) in rows.iter().enumerate() {
            for (group, cell) in row.iter().enumerate() {
                if let Some(t) = cell {
                    table.assign(period, group, *t);
                }
            }
        }
        table
    }

    #[test]
    fn test_perfect_table_has_zero_hard_cost() {
        let instance = toy();
        let f = CostFunction::new(&instance);
        let table = table_from(
            &instance,
            &[
                &[Some(0), Some(1)],
                &[Some(0), Some(1)],
                &[Some(1), Some(0)],
                &[Some(1), Some(0)],
            ],
        );
        let cost = f.total_cost(&table);
        assert!(cost.hard.is_zero(), "{cost:?}");
        assert_eq!(cost.soft.teacher_idleness, 0);
        // Two realized doubles per pair against a target of 0.
        assert_eq!(cost.soft.double_lesson_deviation, 4);
    }

    #[test]
    fn test_clash_counts_extra_groups() {
        let instance = toy();
        let f = CostFunction::new(&instance);
        let table = table_from(&instance, &[&[Some(0), Some(0)], &[Some(1), Some(1)]]);
        assert_eq!(f.hard_cost(&table).teacher_clashes, 2);
    }

    #[test]
    fn test_group_idleness_counts_leading_and_inner_gaps() {
        let instance = toy();
        let f = CostFunction::new(&instance);
        // g0: _ X _ X  -> 1 leading + 1 inner = 2
        let table = table_from(
            &instance,
            &[&[None, None], &[Some(0), None], &[None, None], &[Some(1), None]],
        );
        assert_eq!(f.hard_cost(&table).group_idleness, 2);
    }

    #[test]
    fn test_trailing_free_slots_are_free() {
        let instance = toy();
        let f = CostFunction::new(&instance);
        let table = table_from(&instance, &[&[Some(0), Some(1)], &[Some(1), Some(0)]]);
        let hard = f.hard_cost(&table);
        assert_eq!(hard.group_idleness, 0);
        assert_eq!(f.soft_cost(&table).teacher_idleness, 0);
    }

    #[test]
    fn test_unavailability() {
        let instance = ProblemInstance::builder(1, 2)
            .teacher(Teacher::with_id("t0"))
            .group(Group::with_id("g0"))
            .requirement("t0", "g0", 2, 2, 0)
            .unavailable("t0", Period::new(0, 1))
            .build()
            .unwrap();
        let f = CostFunction::new(&instance);
        let table = table_from(&instance, &[&[Some(0)], &[Some(0)]]);
        assert_eq!(f.hard_cost(&table).teacher_unavailabilities, 1);
    }

    #[test]
    fn test_daily_exceedance_counts_each_excess_meeting() {
        let instance = ProblemInstance::builder(1, 4)
            .teacher(Teacher::with_id("t0"))
            .group(Group::with_id("g0"))
            .requirement("t0", "g0", 4, 1, 0)
            .build()
            .unwrap();
        let f = CostFunction::new(&instance);
        let table = table_from(&instance, &[&[Some(0)], &[Some(0)], &[Some(0)], &[Some(0)]]);
        assert_eq!(f.hard_cost(&table).daily_exceedances, 3);
    }

    #[test]
    fn test_unrequired_pair_always_exceeds() {
        let instance = ProblemInstance::builder(1, 2)
            .teacher(Teacher::with_id("t0"))
            .group(Group::with_id("g0"))
            .build()
            .unwrap();
        let f = CostFunction::new(&instance);
        let table = table_from(&instance, &[&[Some(0)]]);
        assert_eq!(f.hard_cost(&table).daily_exceedances, 1);
    }

    #[test]
    fn test_double_lessons_are_not_repaired() {
        let instance = ProblemInstance::builder(1, 4)
            .teacher(Teacher::with_id("t0"))
            .group(Group::with_id("g0"))
            .requirement("t0", "g0", 4, 4, 2)
            .build()
            .unwrap();
        let f = CostFunction::new(&instance);

        // Three adjacent meetings realize one double: deviation 1.
        let three = table_from(&instance, &[&[Some(0)], &[Some(0)], &[Some(0)], &[None]]);
        assert_eq!(f.soft_cost(&three).double_lesson_deviation, 1);

        // Four adjacent meetings realize two doubles: deviation 0.
        let four = table_from(&instance, &[&[Some(0)], &[Some(0)], &[Some(0)], &[Some(0)]]);
        assert_eq!(f.soft_cost(&four).double_lesson_deviation, 0);
    }

    #[test]
    fn test_double_deviation_is_absolute() {
        let instance = ProblemInstance::builder(1, 4)
            .teacher(Teacher::with_id("t0"))
            .group(Group::with_id("g0"))
            .requirement("t0", "g0", 4, 4, 0)
            .build()
            .unwrap();
        let f = CostFunction::new(&instance);
        let four = table_from(&instance, &[&[Some(0)], &[Some(0)], &[Some(0)], &[Some(0)]]);
        // Target 0, realized 2: surplus doubles are penalized too.
        assert_eq!(f.soft_cost(&four).double_lesson_deviation, 2);
    }

    #[test]
    fn test_doubles_do_not_span_days() {
        let instance = ProblemInstance::builder(2, 2)
            .teacher(Teacher::with_id("t0"))
            .group(Group::with_id("g0"))
            .requirement("t0", "g0", 2, 2, 1)
            .build()
            .unwrap();
        let f = CostFunction::new(&instance);
        // Last slot of day 0 and first slot of day 1 are adjacent periods
        // but not adjacent slots.
        let table = table_from(&instance, &[&[None], &[Some(0)], &[Some(0)], &[None]]);
        assert_eq!(f.soft_cost(&table).double_lesson_deviation, 1);
    }

    #[test]
    fn test_teacher_idleness_ignores_clash_duplicates() {
        let instance = toy();
        let f = CostFunction::new(&instance);
        // t0 teaches both groups in slot 1: one busy slot, one leading gap.
        let table = table_from(&instance, &[&[None, None], &[Some(0), Some(0)]]);
        assert_eq!(f.soft_cost(&table).teacher_idleness, 1);
    }

    #[test]
    fn test_group_costs_sum_to_total() {
        let instance = toy();
        let f = CostFunction::new(&instance);
        let table = table_from(
            &instance,
            &[
                &[Some(0), Some(0)],
                &[None, Some(0)],
                &[Some(1), Some(1)],
                &[Some(1), None],
            ],
        );
        let total = f.total_cost(&table);
        let summed: TotalCost = (0..2).map(|g| f.group_cost(&table, g)).sum();
        assert_eq!(summed.hard, total.hard);
        assert_eq!(
            summed.soft.double_lesson_deviation,
            total.soft.double_lesson_deviation
        );
        // The clash in period 0 belongs to g1, not g0.
        assert_eq!(f.group_cost(&table, 0).hard.teacher_clashes, 0);
        assert_eq!(f.group_cost(&table, 1).hard.teacher_clashes, 2);
    }

    #[test]
    fn test_standalone_group_cost_sees_every_clash() {
        let instance = toy();
        let f = CostFunction::new(&instance);
        // t0 teaches both groups in both periods.
        let table = table_from(&instance, &[&[Some(0), Some(0)], &[Some(0), Some(0)]]);
        assert_eq!(f.hard_cost(&table).teacher_clashes, 2);
        assert_eq!(f.group_cost(&table, 0).hard.teacher_clashes, 0);
        assert_eq!(f.group_cost(&table, 1).hard.teacher_clashes, 2);
        assert_eq!(f.standalone_group_cost(&table, 0).hard.teacher_clashes, 2);
        assert_eq!(f.standalone_group_cost(&table, 1).hard.teacher_clashes, 2);

        // Other terms match the additive view.
        let additive = f.group_cost(&table, 0);
        let standalone = f.standalone_group_cost(&table, 0);
        assert_eq!(standalone.hard.group_idleness, additive.hard.group_idleness);
        assert_eq!(standalone.soft, additive.soft);
    }

    #[test]
    fn test_partial_costs_match_total() {
        let instance = toy();
        let f = CostFunction::new(&instance);
        let tables = [
            table_from(&instance, &[&[Some(0), Some(0)], &[None, Some(1)]]),
            table_from(
                &instance,
                &[
                    &[None, Some(0)],
                    &[Some(0), Some(0)],
                    &[Some(1), None],
                    &[Some(1), Some(1)],
                ],
            ),
        ];
        for table in &tables {
            let total = f.total_cost(table);
            assert_eq!(f.hard_cost(table), total.hard);
            assert_eq!(f.soft_cost(table), total.soft);
        }
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let instance = toy();
        let f = CostFunction::new(&instance);
        let table = table_from(&instance, &[&[Some(0), Some(0)], &[None, Some(1)]]);
        let before = table.clone();
        assert_eq!(f.total_cost(&table), f.total_cost(&table));
        assert_eq!(table, before);
    }
}
