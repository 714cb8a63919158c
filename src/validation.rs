//! Course and lesson-plan validation.
//!
//! Scheduling never fails; these checks report what is structurally wrong
//! with an input course or an assembled (or seeded) lesson plan so callers
//! can decide whether to trust it. All detected issues are returned at once.
//!
//! Course checks:
//! - Learning Units without topics or without a usable duration
//! - Duplicate Learning Unit numbers
//! - Missing assessment methods, or methods without delivery time
//!
//! Lesson-plan checks:
//! - Slots that end before they start, gaps and overlaps within a day
//! - Content slots off the 5-minute grid
//! - Attendance, lunch, tea break, recap and feedback slots that differ
//!   from the day frame's lengths
//! - Lunch starting outside 1130–1300, tea breaks before lunch
//! - Per-unit content time against `LU_Duration`
//! - Final day: feedback right before the first assessment, nothing after
//!   the last one

use std::collections::{HashMap, HashSet};

use crate::models::{
    lu_number_anywhere, seed_to_lesson_plan, topic_number_prefix, ClockTime, CourseContext, Day,
    DayTemplate, LessonPlan, Minutes, SeedDay, SessionEntry, SlotKind, GRID_MINUTES,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A Learning Unit has no topics.
    EmptyLearningUnit,
    /// A Learning Unit or assessment method has no usable duration.
    ZeroDuration,
    /// Two Learning Units share a number.
    DuplicateLearningUnit,
    /// The course has no assessment methods.
    NoAssessments,
    /// A slot time is unparseable, empty or runs backwards.
    InvalidTime,
    /// A stated `(N mins)` disagrees with the clock range.
    DurationMismatch,
    /// Consecutive slots leave a gap.
    TimeGap,
    /// Consecutive slots overlap.
    TimeOverlap,
    /// A content slot is not a multiple of 5 minutes.
    OffGridDuration,
    /// A fixed slot is longer or shorter than the day frame allows.
    FixedSlotLength,
    /// Lunch starts outside 1130–1300.
    LunchOutOfWindow,
    /// A tea break is scheduled before lunch.
    TeaBreakBeforeLunch,
    /// A Learning Unit's delivered content time is off target.
    LearningUnitDurationMismatch,
    /// The final day does not end with feedback and assessments.
    FinalDayStructure,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a course context before planning.
pub fn validate_course(course: &CourseContext) -> ValidationResult {
    let mut errors = Vec::new();
    let mut numbers = HashSet::new();

    for unit in &course.learning_units {
        if unit.topics.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyLearningUnit,
                format!("Learning Unit '{}' has no topics", unit.title),
            ));
        }
        if unit.duration_minutes() <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                format!("Learning Unit '{}' has no usable duration '{}'", unit.title, unit.duration),
            ));
        }
        if let Some(n) = unit.number() {
            if !numbers.insert(n) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateLearningUnit,
                    format!("Duplicate Learning Unit number: LU{n}"),
                ));
            }
        }
    }

    if course.assessment_methods.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoAssessments,
            "Course has no assessment methods",
        ));
    }
    for method in &course.assessment_methods {
        if method.minutes() <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                format!(
                    "Assessment '{}' has no usable delivery time '{}'",
                    method.name, method.total_delivery_hours
                ),
            ));
        }
    }

    into_result(errors)
}

/// Validates an assembled lesson plan against the default day frame.
///
/// With a course, content minutes are also checked per Learning Unit: no
/// unit may exceed its `LU_Duration`, and none may fall short by more than
/// the tea breaks and feedback slots carved out of content.
pub fn validate_lesson_plan(plan: &LessonPlan, course: Option<&CourseContext>) -> ValidationResult {
    validate_lesson_plan_with(plan, course, &DayTemplate::default())
}

/// [`validate_lesson_plan`] with fixed slot lengths taken from `template`.
pub fn validate_lesson_plan_with(
    plan: &LessonPlan,
    course: Option<&CourseContext>,
    template: &DayTemplate,
) -> ValidationResult {
    let mut errors = Vec::new();

    for day in &plan.days {
        check_day(day, &mut errors);
        check_fixed_slots(day, template, &mut errors);
    }
    if let Some(last) = plan.last_day() {
        check_final_day(last, course, &mut errors);
    }
    if let Some(course) = course {
        check_unit_minutes(plan, course, &mut errors);
    }

    into_result(errors)
}

/// Validates an upstream seed skeleton.
///
/// Unparseable times and stated lengths that disagree with the clock range
/// are reported first, followed by the lesson-plan checks on the sessions
/// that did parse.
pub fn validate_seed_plan(seed: &[SeedDay]) -> ValidationResult {
    let mut errors = Vec::new();

    for day in seed {
        for session in &day.sessions {
            match session.time_range() {
                Err(e) => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTime,
                    format!("{}: '{}': {e}", day.day, session.instruction_title),
                )),
                Ok((range, Some(stated))) if stated != range.minutes() => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DurationMismatch,
                        format!(
                            "{}: '{}' states {stated} mins but {} spans {} mins",
                            day.day,
                            session.instruction_title,
                            session.time,
                            range.minutes()
                        ),
                    ))
                }
                Ok(_) => {}
            }
        }
    }

    if let Err(more) = validate_lesson_plan(&seed_to_lesson_plan(seed), None) {
        errors.extend(more);
    }
    into_result(errors)
}

fn check_day(day: &Day, errors: &mut Vec<ValidationError>) {
    let label = day.label();

    for s in &day.sessions {
        if s.time.end <= s.time.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTime,
                format!("{label}: '{}' ({}) has no length", s.title, s.time_label()),
            ));
        }
        if s.kind.is_content() && s.minutes() % GRID_MINUTES != 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::OffGridDuration,
                format!("{label}: '{}' lasts {} mins", s.title, s.minutes()),
            ));
        }
    }

    for pair in day.sessions.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.time.start > prev.time.end {
            errors.push(ValidationError::new(
                ValidationErrorKind::TimeGap,
                format!(
                    "{label}: gap between '{}' ending {} and '{}' starting {}",
                    prev.title, prev.time.end, next.title, next.time.start
                ),
            ));
        } else if next.time.start < prev.time.end {
            errors.push(ValidationError::new(
                ValidationErrorKind::TimeOverlap,
                format!(
                    "{label}: '{}' starting {} overlaps '{}' ending {}",
                    next.title, next.time.start, prev.title, prev.time.end
                ),
            ));
        }
    }

    let lunch = day.sessions.iter().position(|s| s.kind == SlotKind::LunchBreak);
    if let Some(i) = lunch {
        let start = day.sessions[i].time.start;
        if start < ClockTime::hm(11, 30) || start > ClockTime::hm(13, 0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::LunchOutOfWindow,
                format!("{label}: lunch starts at {start}"),
            ));
        }
    }
    let tea = day.sessions.iter().position(|s| s.kind == SlotKind::TeaBreak);
    if let (Some(t), Some(l)) = (tea, lunch) {
        if t < l {
            errors.push(ValidationError::new(
                ValidationErrorKind::TeaBreakBeforeLunch,
                format!("{label}: tea break at {} comes before lunch", day.sessions[t].time.start),
            ));
        }
    }
}

fn check_fixed_slots(day: &Day, template: &DayTemplate, errors: &mut Vec<ValidationError>) {
    for s in &day.sessions {
        let expected = match s.kind {
            SlotKind::Attendance => template.attendance_window(day.number == 1).minutes(),
            SlotKind::LunchBreak => template.lunch_minutes,
            SlotKind::TeaBreak => template.tea_break_minutes,
            SlotKind::Recap => template.recap_minutes,
            SlotKind::Feedback => template.feedback_minutes,
            _ => continue,
        };
        if s.minutes() != expected {
            errors.push(ValidationError::new(
                ValidationErrorKind::FixedSlotLength,
                format!(
                    "{}: '{}' lasts {} mins, expected {expected}",
                    day.label(),
                    s.title,
                    s.minutes()
                ),
            ));
        }
    }
}

fn check_final_day(day: &Day, course: Option<&CourseContext>, errors: &mut Vec<ValidationError>) {
    let label = day.label();
    let mut fail = |message: String| {
        errors.push(ValidationError::new(ValidationErrorKind::FinalDayStructure, message));
    };

    let sessions = &day.sessions;
    let first = sessions.iter().position(|s| s.kind == SlotKind::Assessment);
    let last = sessions.iter().rposition(|s| s.kind == SlotKind::Assessment);

    // One method may sit on both sides of lunch
    let expected = course.map(|c| c.assessment_methods.len());
    let mut previous: Option<&str> = None;
    let mut found = 0;
    for s in sessions.iter().filter(|s| s.kind == SlotKind::Assessment) {
        if previous != Some(s.title.as_str()) {
            found += 1;
        }
        previous = Some(s.title.as_str());
    }
    if let Some(expected) = expected {
        if expected != found {
            fail(format!("{label}: {found} final assessment slots for {expected} methods"));
        }
    }

    let (Some(first), Some(last)) = (first, last) else {
        if !sessions.iter().any(|s| s.kind == SlotKind::Feedback) {
            fail(format!("{label}: no feedback slot on the final day"));
        }
        return;
    };

    if first == 0 || sessions[first - 1].kind != SlotKind::Feedback {
        fail(format!("{label}: feedback slot does not precede '{}'", sessions[first].title));
    }
    if last + 1 != sessions.len() {
        fail(format!("{label}: '{}' follows the last assessment", sessions[last + 1].title));
    }
    if let Some(stray) = sessions[first..=last]
        .iter()
        .find(|s| !matches!(s.kind, SlotKind::Assessment | SlotKind::LunchBreak))
    {
        fail(format!("{label}: '{}' is scheduled between assessments", stray.title));
    }
}

fn check_unit_minutes(plan: &LessonPlan, course: &CourseContext, errors: &mut Vec<ValidationError>) {
    let tolerance: Minutes = plan
        .days
        .iter()
        .map(|d| d.minutes_of(SlotKind::TeaBreak) + d.minutes_of(SlotKind::Feedback))
        .sum::<Minutes>()
        + GRID_MINUTES
        - 1;

    let mut delivered: HashMap<usize, Minutes> = HashMap::new();
    for s in plan.sessions().filter(|s| s.kind.is_content()) {
        if let Some(unit) = attribute_unit(s, course) {
            *delivered.entry(unit).or_insert(0) += s.minutes();
        }
    }

    for (i, unit) in course.learning_units.iter().enumerate() {
        let target = unit.duration_minutes();
        let actual = delivered.get(&i).copied().unwrap_or(0);
        if actual > target + GRID_MINUTES - 1 || target - actual > tolerance {
            errors.push(ValidationError::new(
                ValidationErrorKind::LearningUnitDurationMismatch,
                format!("'{}' planned {target} mins, delivered {actual} mins", unit.title),
            ));
        }
    }
}

/// Learning Unit index of a content slot: recorded, else by topic or LU number in the title.
fn attribute_unit(entry: &SessionEntry, course: &CourseContext) -> Option<usize> {
    if entry.learning_unit.is_some() {
        return entry.learning_unit;
    }
    let units = &course.learning_units;
    match entry.kind {
        SlotKind::Topic => {
            let n = topic_number_prefix(&entry.title)?;
            units
                .iter()
                .position(|u| u.topics.iter().any(|t| t.number() == Some(n)))
        }
        SlotKind::Activity => {
            let n = lu_number_anywhere(&entry.title)?;
            units.iter().position(|u| u.number() == Some(n))
        }
        _ => None,
    }
}
