//! Human-readable views of a timetable.

use std::fmt;

use crate::model::{Group, Period, ProblemInstance, Teacher, Timetable};

/// One scheduled meeting, resolved to entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub period: Period,
    pub group: &'a Group,
    pub teacher: &'a Teacher,
}

/// Every occupied cell of `table`, ordered by period, then group.
pub fn assignments<'a>(
    instance: &'a ProblemInstance,
    table: &'a Timetable,
) -> impl Iterator<Item = Assignment<'a>> + 'a {
    (0..table.period_count()).flat_map(move |period| {
        (0..table.group_count()).filter_map(move |group| {
            let teacher = table.get(period, group)?;
            Some(Assignment {
                period: instance.period_at(period),
                group: instance.groups().value_of(group)?,
                teacher: instance.teachers().value_of(teacher)?,
            })
        })
    })
}

/// Day × slot grid of one group's week.
///
/// ```text
/// g0      | slot 0 | slot 1 | slot 2
/// day 0   | t0     | t1     | -
/// day 1   | t1     | t0     | -
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimetableGrid<'a> {
    instance: &'a ProblemInstance,
    table: &'a Timetable,
    group: usize,
}

impl<'a> TimetableGrid<'a> {
    pub fn new(instance: &'a ProblemInstance, table: &'a Timetable, group: usize) -> Self {
        Self {
            instance,
            table,
            group,
        }
    }

    fn cell(&self, period: usize) -> &'a str {
        self.table
            .get(period, self.group)
            .and_then(|t| self.instance.teachers().value_of(t))
            .map_or("-", |t| t.name.as_str())
    }
}

impl fmt::Display for TimetableGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self
            .instance
            .groups()
            .value_of(self.group)
            .map_or("?", |g| g.name.as_str());

        let mut width = title.len().max("day 00".len());
        for period in 0..self.table.period_count() {
            width = width.max(self.cell(period).len());
        }
        width = width.max(format!("slot {}", self.table.slot_count()).len());

        write!(f, "{title:<width$}")?;
        for slot in 0..self.table.slot_count() {
            write!(f, " | {:<width$}", format!("slot {slot}"))?;
        }
        writeln!(f)?;

        for day in 0..self.table.day_count() {
            write!(f, "{:<width$}", format!("day {day}"))?;
            for period in self.table.day_periods(day) {
                write!(f, " | {:<width$}", self.cell(period))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
