//! Post-processing passes over an assembled lesson plan.
//!
//! Each pass is a pure rewrite of slot fields across all days:
//!
//! - [`rename_activities`]: `"Activity: LU2: ..."` → `"Activity: <methods> on ..."`
//! - [`postprocess_resources`]: attendance tags on the right slots, once
//! - [`remove_brackets_from_titles`]: drops `(...)`, `[...]`, `{...}` groups
//! - [`add_start_end_duration`]: renders separate start/end/duration fields

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{
    format_duration, LearningUnit, LessonPlan, RenderedDay, RenderedLessonPlan, RenderedSession,
    SessionEntry, SlotKind, COURSE_DATE_FORMAT,
};

/// Resource tag for the afternoon attendance check.
pub const PM_ATTENDANCE_TAG: &str = "Digital Attendance (PM)";

/// Resource tag for the attendance check at the final assessment.
pub const ASSESSMENT_ATTENDANCE_TAG: &str = "Digital Attendance Assessment";

static ACTIVITY_LU: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Activity: )LU(\d+):(.*)$").expect("static regex"));

static BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[\(\[\{][^\)\]\}]*[\)\]\}]").expect("static regex"));

/// Converts the plan into its document-facing form.
///
/// Times become `"HHMM"` strings, the length a `"1h 30min"` style string,
/// and each day carries its calendar date when known.
pub fn add_start_end_duration(plan: &LessonPlan) -> RenderedLessonPlan {
    let lesson_plan = plan
        .days
        .iter()
        .map(|day| RenderedDay {
            day: day.label(),
            date: day.date.map(|d| d.format(COURSE_DATE_FORMAT).to_string()),
            sessions: day.sessions.iter().map(render_session).collect(),
        })
        .collect();
    RenderedLessonPlan { lesson_plan }
}

fn render_session(entry: &SessionEntry) -> RenderedSession {
    RenderedSession {
        starttime: entry.time.start.hhmm(),
        endtime: entry.time.end.hhmm(),
        duration: format_duration(entry.minutes()),
        instruction_title: entry.title.clone(),
        bullet_points: entry.bullet_points.clone(),
        instructional_methods: entry.instructional_methods.clone(),
        resources: entry.resources.clone(),
        reference_line: entry.reference_line.clone(),
    }
}

/// Replaces the `LU<n>:` of activity titles with the unit's instructional methods.
///
/// Units without usable methods (none recorded, or `N/A`) just lose the
/// `LU<n>:` reference.
///
/// # Example
/// ```
/// use u_timetable::models::LearningUnit;
/// use u_timetable::postprocess::activity_title;
///
/// let units = vec![LearningUnit::new("LU1: Basics", "1 hr").with_methods(["Lecture", "Case Study"])];
/// assert_eq!(
///     activity_title("Activity: LU1: Basics", &units),
///     "Activity: Lecture, Case Study on Basics"
/// );
/// ```
pub fn rename_activities(plan: &mut LessonPlan, units: &[LearningUnit]) {
    for entry in plan.sessions_mut() {
        let renamed = activity_title(&entry.title, units);
        if renamed != entry.title {
            debug!("Renamed '{}' to '{}'", entry.title, renamed);
            entry.title = renamed;
        }
    }
}

/// Renamed form of one title; titles that are not `"Activity: LU<n>:"` pass through.
pub fn activity_title(title: &str, units: &[LearningUnit]) -> String {
    let Some(caps) = ACTIVITY_LU.captures(title) else {
        return title.to_string();
    };
    let prefix = &caps[1];
    let rest = &caps[3];
    let number: Option<u32> = caps[2].parse().ok();

    let methods = units
        .iter()
        .find(|u| number.is_some() && u.number() == number)
        .filter(|u| !u.instructional_methods.is_blank())
        .map(|u| u.instructional_methods.joined());

    match methods {
        Some(methods) => format!("{prefix}{methods} on{rest}").trim().to_string(),
        None => format!("{prefix}{}", rest.trim_start()).trim().to_string(),
    }
}

/// Places the attendance resource tags.
///
/// [`PM_ATTENDANCE_TAG`] goes on the first slot after each lunch break and
/// [`ASSESSMENT_ATTENDANCE_TAG`] on the first final assessment of the
/// course. Both are removed everywhere else.
pub fn postprocess_resources(plan: &mut LessonPlan) {
    for entry in plan.sessions_mut() {
        entry.resources = without_tags(&entry.resources, &[PM_ATTENDANCE_TAG, ASSESSMENT_ATTENDANCE_TAG]);
    }

    for day in &mut plan.days {
        let after_lunch = day
            .sessions
            .iter()
            .position(|s| s.kind == SlotKind::LunchBreak)
            .map(|i| i + 1);
        if let Some(entry) = after_lunch.and_then(|i| day.sessions.get_mut(i)) {
            entry.resources = with_leading_tag(&entry.resources, PM_ATTENDANCE_TAG);
        }
    }

    if let Some(entry) = plan.sessions_mut().find(|s| s.kind == SlotKind::Assessment) {
        entry.resources = with_leading_tag(&entry.resources, ASSESSMENT_ATTENDANCE_TAG);
    }
}

fn without_tags(resources: &str, tags: &[&str]) -> String {
    if !tags.iter().any(|t| resources.contains(t)) {
        return resources.to_string();
    }
    resources
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty() && !tags.contains(r))
        .collect::<Vec<_>>()
        .join(", ")
}

fn with_leading_tag(resources: &str, tag: &str) -> String {
    if resources.trim().is_empty() {
        tag.to_string()
    } else {
        format!("{tag}, {resources}")
    }
}

/// Strips bracketed groups and their contents from every slot title.
pub fn remove_brackets_from_titles(plan: &mut LessonPlan) {
    for entry in plan.sessions_mut() {
        entry.title = strip_brackets(&entry.title);
    }
}

/// `"Topic 1: Identify Conflicts (K1, A1)"` → `"Topic 1: Identify Conflicts"`.
pub fn strip_brackets(title: &str) -> String {
    BRACKETS.replace_all(title, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, Day, MethodList, TimeRange};
    use chrono::NaiveDate;

    fn entry(kind: SlotKind, title: &str, start: (u32, u32), minutes: i64, resources: &str) -> SessionEntry {
        SessionEntry::fixed(
            kind,
            TimeRange::starting_at(ClockTime::hm(start.0, start.1), minutes),
            title,
            "N/A",
            resources,
        )
    }

    fn two_day_plan() -> LessonPlan {
        let mut d1 = Day::new(1, NaiveDate::from_ymd_opt(2025, 6, 2));
        d1.push(entry(SlotKind::Topic, "Topic 1: A (K1)", (9, 45), 135, "Slides, Digital Attendance (PM)"));
        d1.push(entry(SlotKind::LunchBreak, "Lunch Break", (12, 0), 45, "N/A"));
        d1.push(entry(SlotKind::Activity, "Activity: LU1: A", (12, 45), 90, "TV"));

        let mut d2 = Day::new(2, NaiveDate::from_ymd_opt(2025, 6, 3));
        d2.push(entry(SlotKind::LunchBreak, "Lunch Break", (12, 0), 45, "N/A"));
        d2.push(entry(SlotKind::Assessment, "Final Assessment: Case Study (CS)", (12, 45), 60, ""));
        d2.push(entry(
            SlotKind::Assessment,
            "Final Assessment: Oral [OQ]",
            (13, 45),
            60,
            "Digital Attendance Assessment, Rubric",
        ));
        LessonPlan::new(vec![d1, d2])
    }

    #[test]
    fn test_add_start_end_duration() {
        let rendered = add_start_end_duration(&two_day_plan());
        let day = &rendered.lesson_plan[0];
        assert_eq!(day.day, "Day 1");
        assert_eq!(day.date.as_deref(), Some("02 Jun 2025"));

        let first = &day.sessions[0];
        assert_eq!(first.starttime, "0945");
        assert_eq!(first.endtime, "1200");
        assert_eq!(first.duration, "2h 15min");
        assert_eq!(day.sessions[1].duration, "45min");

        let json = rendered.to_json().expect("serializes");
        assert!(json.contains("\"Sessions\""));
        assert!(json.contains("\"Instructional_Methods\""));
        assert!(json.contains("\"Date\": \"02 Jun 2025\""));
    }

    #[test]
    fn test_rename_activities() {
        let units = vec![
            LearningUnit::new("LU1: Identify Conflicts", "3.5 hrs").with_methods(["Lecture", "Peer Sharing"]),
            LearningUnit::new("LU2: Resolve", "3.5 hrs").with_methods(["N/A"]),
        ];
        assert_eq!(
            activity_title("Activity: LU1: Identify Conflicts", &units),
            "Activity: Lecture, Peer Sharing on Identify Conflicts"
        );
        assert_eq!(activity_title("Activity: LU2: Resolve", &units), "Activity: Resolve");
        // Unknown unit loses its reference too
        assert_eq!(activity_title("Activity: LU9: Other", &units), "Activity: Other");
        assert_eq!(activity_title("Topic 1: Identify", &units), "Topic 1: Identify");
        assert_eq!(
            activity_title("Activity: Peer Sharing on Conflict", &units),
            "Activity: Peer Sharing on Conflict"
        );

        let mut plan = two_day_plan();
        rename_activities(&mut plan, &units);
        assert_eq!(plan.days[0].sessions[2].title, "Activity: Lecture, Peer Sharing on A");
    }

    #[test]
    fn test_rename_with_text_methods() {
        let mut unit = LearningUnit::new("LU3: X", "1 hr");
        unit.instructional_methods = MethodList::Text("Case Study".into());
        assert_eq!(activity_title("Activity: LU3: X", &[unit]), "Activity: Case Study on X");
    }

    #[test]
    fn test_postprocess_resources() {
        let mut plan = two_day_plan();
        postprocess_resources(&mut plan);

        let d1 = &plan.days[0].sessions;
        assert_eq!(d1[0].resources, "Slides");
        assert_eq!(d1[2].resources, "Digital Attendance (PM), TV");

        let d2 = &plan.days[1].sessions;
        assert_eq!(d2[1].resources, "Digital Attendance Assessment, Digital Attendance (PM)");
        assert_eq!(d2[2].resources, "Rubric");

        // Running twice changes nothing
        let once = plan.clone();
        postprocess_resources(&mut plan);
        assert_eq!(plan, once);
    }

    #[test]
    fn test_remove_brackets() {
        assert_eq!(strip_brackets("Topic 1: Identify Conflicts (K1, A1, A6)"), "Topic 1: Identify Conflicts");
        assert_eq!(strip_brackets("Final Assessment: Oral [OQ] {x}"), "Final Assessment: Oral");
        assert_eq!(strip_brackets("No brackets"), "No brackets");

        let mut plan = two_day_plan();
        remove_brackets_from_titles(&mut plan);
        assert_eq!(plan.days[0].sessions[0].title, "Topic 1: A");
        assert_eq!(plan.days[1].sessions[1].title, "Final Assessment: Case Study");
    }
}
