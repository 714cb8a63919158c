//! Lesson-plan quality metrics (KPIs).
//!
//! Summarises how the training day is spent across an assembled plan.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Day count | Number of training days |
//! | Content minutes | Topic + activity slot time |
//! | Break minutes | Lunch + tea break time |
//! | Assessment minutes | Final assessment slot time |
//! | Content share | Content minutes / scheduled minutes |
//! | Unit shortfall | Planned minus delivered minutes per Learning Unit |

use std::collections::HashMap;

use crate::models::{CourseContext, Day, LessonPlan, Minutes, SlotKind};

/// Minute breakdown of one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayKpi {
    /// 1-based day number.
    pub number: usize,
    /// All scheduled minutes.
    pub total_minutes: Minutes,
    /// Topic and activity minutes.
    pub content_minutes: Minutes,
    /// Lunch and tea break minutes.
    pub break_minutes: Minutes,
    /// Final assessment minutes.
    pub assessment_minutes: Minutes,
}

impl DayKpi {
    fn of(day: &Day) -> Self {
        let content_minutes = day
            .sessions
            .iter()
            .filter(|s| s.kind.is_content())
            .map(|s| s.minutes())
            .sum();
        let break_minutes = day
            .sessions
            .iter()
            .filter(|s| s.kind.is_break())
            .map(|s| s.minutes())
            .sum();
        Self {
            number: day.number,
            total_minutes: day.total_minutes(),
            content_minutes,
            break_minutes,
            assessment_minutes: day.minutes_of(SlotKind::Assessment),
        }
    }

    /// Attendance, recap and feedback minutes.
    pub fn fixed_minutes(&self) -> Minutes {
        self.total_minutes - self.content_minutes - self.break_minutes - self.assessment_minutes
    }
}

/// Lesson-plan performance indicators.
#[derive(Debug, Clone)]
pub struct PlanKpi {
    /// Number of days.
    pub day_count: usize,
    /// Per-day breakdown.
    pub days: Vec<DayKpi>,
    /// All scheduled minutes.
    pub total_minutes: Minutes,
    /// Topic and activity minutes.
    pub content_minutes: Minutes,
    /// Final assessment minutes.
    pub assessment_minutes: Minutes,
    /// Fraction of scheduled time spent on content (0.0..1.0).
    pub content_share: f64,
    /// Delivered content minutes per Learning Unit index.
    pub content_by_unit: HashMap<usize, Minutes>,
    /// Planned minus delivered minutes per Learning Unit index.
    pub unit_shortfall: HashMap<usize, Minutes>,
}

impl PlanKpi {
    /// Computes KPIs from a plan and the course it was built for.
    pub fn calculate(plan: &LessonPlan, course: &CourseContext) -> Self {
        let days: Vec<DayKpi> = plan.days.iter().map(DayKpi::of).collect();
        let total_minutes = days.iter().map(|d| d.total_minutes).sum();
        let content_minutes = days.iter().map(|d| d.content_minutes).sum();
        let assessment_minutes = days.iter().map(|d| d.assessment_minutes).sum();

        let mut content_by_unit: HashMap<usize, Minutes> = HashMap::new();
        for s in plan.sessions().filter(|s| s.kind.is_content()) {
            if let Some(unit) = s.learning_unit {
                *content_by_unit.entry(unit).or_insert(0) += s.minutes();
            }
        }

        let unit_shortfall = course
            .learning_units
            .iter()
            .enumerate()
            .map(|(i, lu)| {
                let delivered = content_by_unit.get(&i).copied().unwrap_or(0);
                (i, lu.duration_minutes() - delivered)
            })
            .collect();

        let content_share = if total_minutes == 0 {
            0.0
        } else {
            content_minutes as f64 / total_minutes as f64
        };

        Self {
            day_count: plan.day_count(),
            days,
            total_minutes,
            content_minutes,
            assessment_minutes,
            content_share,
            content_by_unit,
            unit_shortfall,
        }
    }

    /// Largest shortfall of any Learning Unit (0 when all are fully delivered).
    pub fn max_unit_shortfall(&self) -> Minutes {
        self.unit_shortfall.values().copied().max().unwrap_or(0).max(0)
    }

    /// Whether the plan meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_shortfall: Minutes, min_content_share: f64) -> bool {
        self.max_unit_shortfall() <= max_shortfall && self.content_share >= min_content_share
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, LearningUnit, SessionEntry, TimeRange};
    use crate::scheduler::LessonPlanner;

    fn slot(kind: SlotKind, start: (u32, u32), minutes: Minutes, unit: Option<usize>) -> SessionEntry {
        let mut entry = SessionEntry::fixed(
            kind,
            TimeRange::starting_at(ClockTime::hm(start.0, start.1), minutes),
            format!("{kind:?}"),
            "",
            "",
        );
        entry.learning_unit = unit;
        entry
    }

    #[test]
    fn test_kpi_basic() {
        let mut day = Day::new(1, None);
        day.push(slot(SlotKind::Attendance, (9, 30), 15, None));
        day.push(slot(SlotKind::Topic, (9, 45), 135, Some(0)));
        day.push(slot(SlotKind::LunchBreak, (12, 0), 45, None));
        day.push(slot(SlotKind::Activity, (12, 45), 30, Some(0)));
        day.push(slot(SlotKind::TeaBreak, (13, 15), 5, None));
        day.push(slot(SlotKind::Feedback, (13, 20), 5, None));
        day.push(slot(SlotKind::Assessment, (13, 25), 60, None));
        let plan = LessonPlan::new(vec![day]);

        let course = CourseContext::new("C")
            .with_learning_unit(LearningUnit::new("LU1: A", "3 hrs"));
        let kpi = PlanKpi::calculate(&plan, &course);

        assert_eq!(kpi.day_count, 1);
        assert_eq!(kpi.total_minutes, 295);
        assert_eq!(kpi.content_minutes, 165);
        assert_eq!(kpi.assessment_minutes, 60);
        assert_eq!(kpi.days[0].break_minutes, 50);
        assert_eq!(kpi.days[0].fixed_minutes(), 20);
        assert_eq!(kpi.content_by_unit[&0], 165);
        assert_eq!(kpi.unit_shortfall[&0], 15);
        assert!(kpi.meets_thresholds(15, 0.5));
        assert!(!kpi.meets_thresholds(10, 0.5));
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = PlanKpi::calculate(&LessonPlan::default(), &CourseContext::new("C"));
        assert_eq!(kpi.day_count, 0);
        assert_eq!(kpi.total_minutes, 0);
        assert!((kpi.content_share - 0.0).abs() < 1e-10);
        assert_eq!(kpi.max_unit_shortfall(), 0);
    }

    #[test]
    fn test_kpi_context3() {
        let course = CourseContext::from_json(include_str!("../../testdata/context3.json"))
            .expect("fixture parses");
        let plan = LessonPlanner::new().fix_lesson_plan(&course);
        let kpi = PlanKpi::calculate(&plan, &course);

        assert_eq!(kpi.day_count, 2);
        assert_eq!(kpi.days[0].total_minutes, 540);
        assert_eq!(kpi.assessment_minutes, 120);
        // LU1 and LU3 each give up a tea break, LU4 the feedback slot
        assert_eq!(kpi.unit_shortfall[&0], 5);
        assert_eq!(kpi.unit_shortfall[&1], 0);
        assert_eq!(kpi.unit_shortfall[&2], 5);
        assert_eq!(kpi.unit_shortfall[&3], 5);
        assert!(kpi.content_share > 0.7);
    }
}
