//! Problem instance: entities, lesson requirements and unavailability.
//!
//! A [`ProblemInstance`] is resolved once into dense per-pair tables indexed
//! by `[group][teacher]` and `[period][teacher]`, so the solver never touches
//! a hash map inside its loops.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::indexer::Indexer;
use crate::error::InstanceError;

/// A teacher, identified by id and display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Teacher {
    pub id: String,
    pub name: String,
}

impl Teacher {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// A teacher whose display name equals its id.
    pub fn with_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }
}

/// A class/group of students, identified by id and display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    pub id: String,
    pub name: String,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// A group whose display name equals its id.
    pub fn with_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }
}

/// One teaching unit of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Period {
    pub day: usize,
    pub slot: usize,
}

impl Period {
    pub fn new(day: usize, slot: usize) -> Self {
        Self { day, slot }
    }

    /// Day-major linear index in a week of `slot_count` slots per day.
    ///
    /// Every linear period in the crate goes through this function or
    /// [`from_linear`](Self::from_linear).
    #[inline]
    pub fn linear(self, slot_count: usize) -> usize {
        self.day * slot_count + self.slot
    }

    /// Inverse of [`linear`](Self::linear).
    #[inline]
    pub fn from_linear(index: usize, slot_count: usize) -> Self {
        Self::new(index / slot_count, index % slot_count)
    }
}

/// Weekly meeting obligation of one (teacher, group) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LessonRequirement {
    pub teacher: Teacher,
    pub group: Group,
    /// Periods per week this pair must meet.
    pub weekly_occurrences: usize,
    /// Cap on meetings of this pair within one day.
    pub max_daily_occurrences: usize,
    /// Desired number of back-to-back meetings per week.
    pub double_lesson_target: usize,
}

impl LessonRequirement {
    pub fn new(
        teacher: Teacher,
        group: Group,
        weekly_occurrences: usize,
        max_daily_occurrences: usize,
        double_lesson_target: usize,
    ) -> Self {
        Self {
            teacher,
            group,
            weekly_occurrences,
            max_daily_occurrences,
            double_lesson_target,
        }
    }
}

/// A (group, teacher) pair by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LessonPair {
    pub group: usize,
    pub teacher: usize,
}

/// Immutable, fully resolved scheduling problem.
///
/// Periods are linearized day-major: `period = day * slot_count + slot`.
/// Pairs without a requirement behave as if all three requirement numbers
/// were zero.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    day_count: usize,
    slot_count: usize,
    teachers: Indexer<Teacher>,
    groups: Indexer<Group>,
    requirements: Vec<LessonRequirement>,
    pairs: Vec<LessonPair>,
    weekly: Vec<usize>,
    max_daily: Vec<usize>,
    double_target: Vec<usize>,
    // [period * teacher_count + teacher]
    unavailable: Vec<bool>,
}

impl ProblemInstance {
    /// Resolves and validates a problem.
    ///
    /// Teacher and group indices follow the order of `teachers` and `groups`.
    pub fn new(
        day_count: usize,
        slot_count: usize,
        teachers: Vec<Teacher>,
        groups: Vec<Group>,
        requirements: Vec<LessonRequirement>,
        unavailabilities: Vec<(Teacher, Period)>,
    ) -> Result<Self, InstanceError> {
        if day_count == 0 || slot_count == 0 {
            return Err(InstanceError::EmptyDimension);
        }
        let period_count = day_count * slot_count;

        let teachers =
            Indexer::new(teachers).map_err(|t| InstanceError::DuplicateTeacher { id: t.id })?;
        let groups = Indexer::new(groups).map_err(|g| InstanceError::DuplicateGroup { id: g.id })?;
        let teacher_count = teachers.len();
        let group_count = groups.len();

        let mut weekly = vec![0; group_count * teacher_count];
        let mut max_daily = vec![0; group_count * teacher_count];
        let mut double_target = vec![0; group_count * teacher_count];
        let mut seen = vec![false; group_count * teacher_count];
        let mut pairs = Vec::with_capacity(requirements.len());

        for req in &requirements {
            let teacher = teachers
                .index_of(&req.teacher)
                .ok_or_else(|| InstanceError::UnknownTeacher {
                    id: req.teacher.id.clone(),
                })?;
            let group = groups
                .index_of(&req.group)
                .ok_or_else(|| InstanceError::UnknownGroup {
                    id: req.group.id.clone(),
                })?;
            let cell = group * teacher_count + teacher;
            if seen[cell] {
                return Err(InstanceError::DuplicateRequirement {
                    teacher: req.teacher.id.clone(),
                    group: req.group.id.clone(),
                });
            }
            if req.weekly_occurrences > period_count {
                return Err(InstanceError::TooManyOccurrences {
                    teacher: req.teacher.id.clone(),
                    group: req.group.id.clone(),
                    weekly_occurrences: req.weekly_occurrences,
                    period_count,
                });
            }
            seen[cell] = true;
            weekly[cell] = req.weekly_occurrences;
            max_daily[cell] = req.max_daily_occurrences;
            double_target[cell] = req.double_lesson_target;
            pairs.push(LessonPair { group, teacher });
        }

        let mut unavailable = vec![false; period_count * teacher_count];
        for (teacher, period) in &unavailabilities {
            let t = teachers
                .index_of(teacher)
                .ok_or_else(|| InstanceError::UnknownTeacher {
                    id: teacher.id.clone(),
                })?;
            if period.day >= day_count || period.slot >= slot_count {
                return Err(InstanceError::PeriodOutOfRange {
                    teacher: teacher.id.clone(),
                    day: period.day,
                    slot: period.slot,
                });
            }
            let p = period.linear(slot_count);
            unavailable[p * teacher_count + t] = true;
        }

        Ok(Self {
            day_count,
            slot_count,
            teachers,
            groups,
            requirements,
            pairs,
            weekly,
            max_daily,
            double_target,
            unavailable,
        })
    }

    /// Starts a builder for a `day_count × slot_count` week.
    pub fn builder(day_count: usize, slot_count: usize) -> ProblemInstanceBuilder {
        ProblemInstanceBuilder {
            day_count,
            slot_count,
            teachers: Vec::new(),
            groups: Vec::new(),
            requirements: Vec::new(),
            unavailabilities: Vec::new(),
        }
    }

    pub fn day_count(&self) -> usize {
        self.day_count
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn period_count(&self) -> usize {
        self.day_count * self.slot_count
    }

    pub fn teacher_count(&self) -> usize {
        self.teachers.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn teachers(&self) -> &Indexer<Teacher> {
        &self.teachers
    }

    pub fn groups(&self) -> &Indexer<Group> {
        &self.groups
    }

    pub fn requirements(&self) -> &[LessonRequirement] {
        &self.requirements
    }

    /// Required pairs by index, in requirement order.
    pub fn lesson_pairs(&self) -> &[LessonPair] {
        &self.pairs
    }

    pub fn weekly_occurrences(&self, group: usize, teacher: usize) -> usize {
        self.weekly[group * self.teacher_count() + teacher]
    }

    pub fn max_daily_occurrences(&self, group: usize, teacher: usize) -> usize {
        self.max_daily[group * self.teacher_count() + teacher]
    }

    pub fn double_lesson_target(&self, group: usize, teacher: usize) -> usize {
        self.double_target[group * self.teacher_count() + teacher]
    }

    pub fn is_unavailable(&self, period: usize, teacher: usize) -> bool {
        self.unavailable[period * self.teacher_count() + teacher]
    }

    /// Total meetings per week required of `group`.
    pub fn weekly_load(&self, group: usize) -> usize {
        let t = self.teacher_count();
        self.weekly[group * t..(group + 1) * t].iter().sum()
    }

    /// Linear index of a period.
    pub fn period_index(&self, period: Period) -> usize {
        period.linear(self.slot_count)
    }

    /// Inverse of [`period_index`](Self::period_index).
    pub fn period_at(&self, index: usize) -> Period {
        Period::from_linear(index, self.slot_count)
    }
}

/// Incremental construction of a [`ProblemInstance`].
///
/// ```
/// use u_timetable::model::{Group, ProblemInstance, Period, Teacher};
///
/// let instance = ProblemInstance::builder(1, 4)
///     .teacher(Teacher::with_id("t0"))
///     .group(Group::with_id("g0"))
///     .requirement("t0", "g0", 2, 2, 1)
///     .unavailable("t0", Period::new(0, 3))
///     .build()
///     .unwrap();
/// assert_eq!(instance.period_count(), 4);
/// assert!(instance.is_unavailable(3, 0));
/// ```
#[derive(Debug, Clone)]
pub struct ProblemInstanceBuilder {
    day_count: usize,
    slot_count: usize,
    teachers: Vec<Teacher>,
    groups: Vec<Group>,
    requirements: Vec<LessonRequirement>,
    unavailabilities: Vec<(Teacher, Period)>,
}

impl ProblemInstanceBuilder {
    pub fn teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    pub fn group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds a requirement between already added entities, looked up by id.
    ///
    /// Unknown ids are kept as id-named entities and rejected by
    /// [`build`](Self::build).
    pub fn requirement(
        mut self,
        teacher_id: &str,
        group_id: &str,
        weekly_occurrences: usize,
        max_daily_occurrences: usize,
        double_lesson_target: usize,
    ) -> Self {
        let teacher = self.find_teacher(teacher_id);
        let group = self
            .groups
            .iter()
            .find(|g| g.id == group_id)
            .cloned()
            .unwrap_or_else(|| Group::with_id(group_id));
        self.requirements.push(LessonRequirement::new(
            teacher,
            group,
            weekly_occurrences,
            max_daily_occurrences,
            double_lesson_target,
        ));
        self
    }

    /// Marks `period` unavailable for the teacher with `teacher_id`.
    pub fn unavailable(mut self, teacher_id: &str, period: Period) -> Self {
        let teacher = self.find_teacher(teacher_id);
        self.unavailabilities.push((teacher, period));
        self
    }

    pub fn build(self) -> Result<ProblemInstance, InstanceError> {
        ProblemInstance::new(
            self.day_count,
            self.slot_count,
            self.teachers,
            self.groups,
            self.requirements,
            self.unavailabilities,
        )
    }

    fn find_teacher(&self, id: &str) -> Teacher {
        self.teachers
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .unwrap_or_else(|| Teacher::with_id(id))
    }
}
