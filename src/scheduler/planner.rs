//! Day assembler.
//!
//! Wraps the block scheduler with the fixed slots of a training day and
//! closes the course with the feedback survey and final assessments.
//!
//! # Algorithm
//!
//! Repeat until the session queue is empty:
//!
//! 1. Attendance (longer on day 1, with the course introduction).
//! 2. Morning block up to lunch.
//! 3. Lunch.
//! 4. Afternoon block up to the recap, with one tea break.
//! 5. Recap, then the next day.
//!
//! The day on which the queue runs dry becomes the final day. Feedback takes
//! its minutes back from the last content slot, then one slot per assessment
//! method follows, scaled by `min(1, available / total)` when the remaining
//! day is too short. Assessments run across lunch the way content does, and
//! the last one is stretched to the end of the day. Fixed slots always keep
//! their configured lengths.

use chrono::Days;
use log::{debug, info, warn};

use super::block::{schedule_block, schedule_block_with_tea_break, TeaBreak};
use super::catalog::MethodCatalog;
use super::queue::{build_session_queue, SessionQueue};
use crate::config::PlannerConfig;
use crate::models::{
    floor_to_grid, AssessmentMethod, ClockTime, CourseContext, Day, LessonPlan, Minutes,
    SessionEntry, SlotKind, TimeRange, TimeWindow,
};

/// Lesson-plan day assembler.
///
/// # Example
/// ```
/// use u_timetable::models::{AssessmentMethod, CourseContext, LearningUnit, Topic};
/// use u_timetable::scheduler::LessonPlanner;
///
/// let course = CourseContext::new("Conflict Management")
///     .with_learning_unit(
///         LearningUnit::new("LU1: Identify Conflicts", "3.5 hrs")
///             .with_topic(Topic::new("Topic 1: Identify Conflicts", ["Causes", "Signs"])),
///     )
///     .with_assessment(AssessmentMethod::new("Case Study", "1 hr"));
///
/// let plan = LessonPlanner::new().fix_lesson_plan(&course);
/// assert_eq!(plan.day_count(), 1);
/// let last = plan.last_day().unwrap().sessions.last().unwrap();
/// assert_eq!(last.title, "Final Assessment: Case Study");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LessonPlanner {
    config: PlannerConfig,
}

impl LessonPlanner {
    /// Creates a planner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a planner with the given configuration.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Builds the full multi-day lesson plan for a course.
    pub fn fix_lesson_plan(&self, course: &CourseContext) -> LessonPlan {
        let catalog = MethodCatalog::from_seed(&course.seed_plan, self.config.fallback.clone());
        let mut queue = build_session_queue(course, &catalog, &self.config);
        info!(
            "Planning '{}': {} sessions, {} content minutes",
            course.title,
            queue.len(),
            queue.total_minutes()
        );
        self.schedule_queue(course, &mut queue)
    }

    /// Lays out an already built queue over as many days as it needs.
    pub fn schedule_queue(&self, course: &CourseContext, queue: &mut SessionQueue) -> LessonPlan {
        let start_date = course.start_date();
        let mut days = Vec::new();

        loop {
            let number = days.len() + 1;
            let date = start_date.and_then(|d| d.checked_add_days(Days::new(number as u64 - 1)));
            let mut day = Day::new(number, date);

            let is_final = self.assemble_day(&mut day, queue, &course.assessment_methods);
            info!(
                "{} assembled: {} slots, {} minutes",
                day.label(),
                day.sessions.len(),
                day.total_minutes()
            );
            days.push(day);

            if is_final {
                break;
            }
        }

        LessonPlan::new(days)
    }

    /// Fills one day. Returns `true` when it closed the course.
    fn assemble_day(
        &self,
        day: &mut Day,
        queue: &mut SessionQueue,
        assessments: &[AssessmentMethod],
    ) -> bool {
        let template = &self.config.day;
        let labels = &self.config.labels;
        let split = self.config.bullet_split;
        let first_day = day.number == 1;

        day.push(self.attendance_entry(first_day));

        let morning = template.morning_window(first_day);
        let current = schedule_block(day, queue, morning.start, morning.end, split);
        if queue.is_empty() && current < template.lunch_start {
            self.finish_final_day(day, current, true, assessments);
            return true;
        }

        day.push(self.lunch_entry(template.lunch_window().into()));

        let afternoon = template.afternoon_window();
        let tea = TeaBreak::new(
            template.tea_break_minutes,
            labels.tea_break_title.clone(),
            labels.tea_break_resources.clone(),
        );
        let current = schedule_block_with_tea_break(day, queue, afternoon.start, afternoon.end, split, &tea);
        if queue.is_empty() {
            self.finish_final_day(day, current, false, assessments);
            return true;
        }

        if !day.sessions.iter().any(|s| s.kind.is_content()) {
            warn!(
                "{} has no room for content; dropping {} queued minutes",
                day.label(),
                queue.total_minutes()
            );
            queue.clear();
            self.finish_final_day(day, current, false, assessments);
            return true;
        }

        day.push(
            SessionEntry::fixed(
                SlotKind::Recap,
                template.recap_window().into(),
                labels.recap_title.clone(),
                labels.recap_methods.clone(),
                labels.recap_resources.clone(),
            )
            .with_bullets(labels.recap_bullets.iter().cloned()),
        );
        false
    }

    /// Appends feedback and the final assessments.
    fn finish_final_day(
        &self,
        day: &mut Day,
        current: ClockTime,
        before_lunch: bool,
        assessments: &[AssessmentMethod],
    ) {
        let template = &self.config.day;
        let labels = &self.config.labels;
        let feedback_minutes = template.feedback_minutes;

        let feedback_start = match day.sessions.last_mut() {
            Some(last) if last.kind.is_content() && last.minutes() > feedback_minutes => {
                last.time.end = last.time.end.add_minutes(-feedback_minutes);
                last.time.end
            }
            _ => current,
        };
        let feedback = TimeRange::starting_at(feedback_start, feedback_minutes);
        day.push(SessionEntry::fixed(
            SlotKind::Feedback,
            feedback,
            labels.feedback_title.clone(),
            "N/A",
            labels.feedback_resources.clone(),
        ));
        let current = feedback.end;

        let lunch_end = template.lunch_window().end;
        let windows = if before_lunch && current <= template.lunch_start {
            vec![
                TimeWindow::new(current, template.lunch_start),
                TimeWindow::new(lunch_end, template.day_end),
            ]
        } else {
            vec![TimeWindow::new(current, template.day_end)]
        };

        self.place_assessments(day, &windows, assessments);
    }

    /// Lays the assessments end to end over `windows`.
    ///
    /// A method that runs past the end of a window continues in the next
    /// one, with lunch in between. The last method takes whatever is left of
    /// the day.
    fn place_assessments(&self, day: &mut Day, windows: &[TimeWindow], assessments: &[AssessmentMethod]) {
        let Some(first) = windows.first() else {
            return;
        };
        let available: Minutes = windows.iter().map(TimeWindow::minutes).sum();
        let total: Minutes = assessments.iter().map(AssessmentMethod::minutes).sum();
        let ratio = if total > 0 {
            (available as f64 / total as f64).min(1.0)
        } else {
            1.0
        };
        debug!(
            "Assessments: {} min requested, {} min available, ratio {:.3}",
            total, available, ratio
        );

        let mut remaining = available;
        let mut window = 0;
        let mut current = first.start;

        for (i, method) in assessments.iter().enumerate() {
            let mut minutes = floor_to_grid((method.minutes().min(remaining) as f64 * ratio).floor() as Minutes).max(0);
            remaining -= minutes;
            if i + 1 == assessments.len() {
                let rest: Minutes = windows[window..].iter().map(|w| w.remaining_from(current)).sum();
                if rest > minutes {
                    debug!("Stretching '{}' by {} min to close the day", method.name, rest - minutes);
                }
                minutes = minutes.max(rest);
            }
            if minutes == 0 {
                warn!("No time left for assessment '{}'", method.name);
            }

            let title = format!("{}{}", self.config.labels.assessment_prefix, method.name);
            let mut left = minutes;
            loop {
                let room = windows[window].remaining_from(current);
                if left <= room {
                    day.push(self.assessment_entry(&title, TimeRange::starting_at(current, left)));
                    current = current.add_minutes(left);
                    break;
                }
                if room > 0 {
                    day.push(self.assessment_entry(&title, TimeRange::new(current, windows[window].end)));
                    left -= room;
                }
                if window + 1 == windows.len() {
                    if room == 0 {
                        day.push(self.assessment_entry(&title, TimeRange::starting_at(current, 0)));
                    }
                    break;
                }
                window += 1;
                day.push(self.lunch_entry(self.config.day.lunch_window().into()));
                current = windows[window].start;
                debug!("'{}' continues after lunch with {} min", title, left);
            }
        }
    }

    fn assessment_entry(&self, title: &str, range: TimeRange) -> SessionEntry {
        let labels = &self.config.labels;
        SessionEntry::fixed(
            SlotKind::Assessment,
            range,
            title,
            labels.assessment_methods.clone(),
            labels.assessment_resources.clone(),
        )
    }

    fn attendance_entry(&self, first_day: bool) -> SessionEntry {
        let labels = &self.config.labels;
        let range: TimeRange = self.config.day.attendance_window(first_day).into();
        if first_day {
            SessionEntry::fixed(
                SlotKind::Attendance,
                range,
                labels.first_day_attendance_title.clone(),
                "N/A",
                labels.attendance_resources.clone(),
            )
            .with_bullets(labels.first_day_attendance_bullets.iter().cloned())
        } else {
            SessionEntry::fixed(
                SlotKind::Attendance,
                range,
                labels.attendance_title.clone(),
                "N/A",
                labels.attendance_resources.clone(),
            )
        }
    }

    fn lunch_entry(&self, range: TimeRange) -> SessionEntry {
        SessionEntry::fixed(
            SlotKind::LunchBreak,
            range,
            self.config.labels.lunch_title.clone(),
            "N/A",
            "N/A",
        )
    }
}
