//! The timetable grid.

use std::ops::Range;

use super::instance::{Period, ProblemInstance};

const FREE: u32 = u32::MAX;

/// Dense `period_count × group_count` grid of teacher assignments.
///
/// Cells are stored row-major by period. Each cell holds the index of the
/// teacher meeting that group in that period, or nothing. Periods are
/// linearized day-major through [`Period::linear`]; callers ask for
/// [`day_periods`](Self::day_periods) or [`slot_of`](Self::slot_of) instead
/// of doing the arithmetic themselves.
///
/// A group holds at most one teacher per period by construction: the grid
/// has exactly one cell per (period, group).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timetable {
    day_count: usize,
    slot_count: usize,
    group_count: usize,
    cells: Vec<u32>,
}

impl Timetable {
    /// An empty grid.
    pub fn new(day_count: usize, slot_count: usize, group_count: usize) -> Self {
        Self {
            day_count,
            slot_count,
            group_count,
            cells: vec![FREE; day_count * slot_count * group_count],
        }
    }

    /// An empty grid shaped for `instance`.
    pub fn for_instance(instance: &ProblemInstance) -> Self {
        Self::new(
            instance.day_count(),
            instance.slot_count(),
            instance.group_count(),
        )
    }

    pub fn day_count(&self) -> usize {
        self.day_count
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn period_count(&self) -> usize {
        self.day_count * self.slot_count
    }

    /// Linear period of `(day, slot)`.
    #[inline]
    pub fn period(&self, day: usize, slot: usize) -> usize {
        debug_assert!(day < self.day_count && slot < self.slot_count);
        Period::new(day, slot).linear(self.slot_count)
    }

    #[inline]
    pub fn day_of(&self, period: usize) -> usize {
        Period::from_linear(period, self.slot_count).day
    }

    #[inline]
    pub fn slot_of(&self, period: usize) -> usize {
        Period::from_linear(period, self.slot_count).slot
    }

    /// The linear periods belonging to `day`, in slot order.
    #[inline]
    pub fn day_periods(&self, day: usize) -> Range<usize> {
        Period::new(day, 0).linear(self.slot_count)..Period::new(day + 1, 0).linear(self.slot_count)
    }

    #[inline]
    fn cell(&self, period: usize, group: usize) -> usize {
        debug_assert!(period < self.period_count() && group < self.group_count);
        period * self.group_count + group
    }

    /// Teacher meeting `group` in `period`.
    #[inline]
    pub fn get(&self, period: usize, group: usize) -> Option<usize> {
        match self.cells[self.cell(period, group)] {
            FREE => None,
            t => Some(t as usize),
        }
    }

    pub fn is_free(&self, period: usize, group: usize) -> bool {
        self.cells[self.cell(period, group)] == FREE
    }

    /// Assigns `teacher` to `group` in `period`.
    ///
    /// # Panics
    /// Panics if the cell is already taken. Callers track free periods
    /// themselves, so an occupied cell means their bookkeeping is broken.
    pub fn assign(&mut self, period: usize, group: usize, teacher: usize) {
        let cell = self.cell(period, group);
        assert!(
            self.cells[cell] == FREE,
            "group {group} already has a teacher in period {period}"
        );
        assert!(teacher < FREE as usize, "teacher index {teacher} too large");
        self.cells[cell] = teacher as u32;
    }

    /// Frees a cell, returning its previous teacher.
    pub fn clear(&mut self, period: usize, group: usize) -> Option<usize> {
        let cell = self.cell(period, group);
        let old = std::mem::replace(&mut self.cells[cell], FREE);
        (old != FREE).then_some(old as usize)
    }

    /// Exchanges the assignments of `group` in periods `a` and `b`.
    ///
    /// Applying the same swap twice restores the grid.
    #[inline]
    pub fn swap_periods(&mut self, group: usize, a: usize, b: usize) {
        let ca = self.cell(a, group);
        let cb = self.cell(b, group);
        self.cells.swap(ca, cb);
    }

    /// Overwrites the whole week of `group` with the one in `source`.
    ///
    /// # Panics
    /// Panics if the two grids have different shapes.
    pub fn copy_group_from(&mut self, source: &Timetable, group: usize) {
        assert_eq!(
            (self.day_count, self.slot_count, self.group_count),
            (source.day_count, source.slot_count, source.group_count),
            "timetable shapes differ"
        );
        for period in 0..self.period_count() {
            let cell = self.cell(period, group);
            self.cells[cell] = source.cells[cell];
        }
    }

    /// Assignments of one period across all groups.
    pub fn period_row(&self, period: usize) -> impl Iterator<Item = Option<usize>> + '_ {
        let start = self.cell(period, 0);
        self.cells[start..start + self.group_count]
            .iter()
            .map(|&t| (t != FREE).then_some(t as usize))
    }

    /// Number of meetings of `group` with `teacher` in the week.
    pub fn occurrences(&self, group: usize, teacher: usize) -> usize {
        (0..self.period_count())
            .filter(|&p| self.get(p, group) == Some(teacher))
            .count()
    }

    /// Number of filled cells.
    pub fn assignment_count(&self) -> usize {
        self.cells.iter().filter(|&&t| t != FREE).count()
    }

    /// Whether every (group, teacher) pair meets exactly as often per week
    /// as `instance` requires.
    pub fn meets_weekly_requirements(&self, instance: &ProblemInstance) -> bool {
        let teacher_count = instance.teacher_count();
        let mut counts = vec![0usize; self.group_count * teacher_count];
        for period in 0..self.period_count() {
            for (group, teacher) in self.period_row(period).enumerate() {
                if let Some(t) = teacher {
                    if t >= teacher_count {
                        return false;
                    }
                    counts[group * teacher_count + t] += 1;
                }
            }
        }
        (0..self.group_count).all(|g| {
            (0..teacher_count).all(|t| counts[g * teacher_count + t] == instance.weekly_occurrences(g, t))
        })
    }
}
