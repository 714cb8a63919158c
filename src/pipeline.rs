//! End-to-end lesson-plan pipeline.
//!
//! `course → fix_lesson_plan → rename_activities → postprocess_resources →
//! remove_brackets_from_titles → add_start_end_duration`

use log::{info, warn};

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::models::{CourseContext, LessonPlan, RenderedLessonPlan};
use crate::postprocess::{
    add_start_end_duration, postprocess_resources, remove_brackets_from_titles, rename_activities,
};
use crate::scheduler::LessonPlanner;
use crate::validation::{validate_course, validate_lesson_plan_with};

/// Plans a course and applies the title and resource passes.
pub fn build_lesson_plan(course: &CourseContext, config: &PlannerConfig) -> LessonPlan {
    if let Err(errors) = validate_course(course) {
        for e in &errors {
            warn!("{:?}: {}", e.kind, e.message);
        }
    }

    let mut plan = LessonPlanner::with_config(config.clone()).fix_lesson_plan(course);
    if let Err(errors) = validate_lesson_plan_with(&plan, Some(course), &config.day) {
        for e in &errors {
            warn!("{:?}: {}", e.kind, e.message);
        }
    }
    rename_activities(&mut plan, &course.learning_units);
    postprocess_resources(&mut plan);
    remove_brackets_from_titles(&mut plan);
    info!(
        "Lesson plan for '{}': {} days, {} slots",
        course.title,
        plan.day_count(),
        plan.session_count()
    );
    plan
}

/// Runs the full pipeline and renders the document-facing plan.
pub fn process(course: &CourseContext, config: &PlannerConfig) -> RenderedLessonPlan {
    add_start_end_duration(&build_lesson_plan(course, config))
}

/// Parses a course-context JSON document and runs [`process`].
///
/// # Example
/// ```
/// use u_timetable::config::PlannerConfig;
/// use u_timetable::pipeline::plan_from_json;
///
/// let json = r#"{
///     "Course_Title": "Conflict Management",
///     "Date": "02 Jun 2025",
///     "Learning_Units": [{
///         "LU_Title": "LU1: Identify Conflicts",
///         "LU_Duration": "3.5 hrs",
///         "Topics": [{"Topic_Title": "Topic 1: Identify Conflicts (K1)", "Bullet_Points": ["Causes"]}],
///         "Instructional_Methods": ["Lecture", "Case Study"]
///     }],
///     "Assessment_Methods_Details": [{"Assessment_Method": "Case Study", "Total_Delivery_Hours": "1 hr"}]
/// }"#;
///
/// let rendered = plan_from_json(json, &PlannerConfig::default()).unwrap();
/// let day = &rendered.lesson_plan[0];
/// assert_eq!(day.date.as_deref(), Some("02 Jun 2025"));
/// assert_eq!(day.sessions[1].instruction_title, "Topic 1: Identify Conflicts");
/// ```
pub fn plan_from_json(json: &str, config: &PlannerConfig) -> Result<RenderedLessonPlan> {
    let course = CourseContext::from_json(json)?;
    Ok(process(&course, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use crate::postprocess::{ASSESSMENT_ATTENDANCE_TAG, PM_ATTENDANCE_TAG};

    const CONTEXT3: &str = include_str!("../testdata/context3.json");

    #[test]
    fn test_context3_pipeline() {
        let rendered = plan_from_json(CONTEXT3, &PlannerConfig::default()).expect("pipeline runs");
        assert_eq!(rendered.lesson_plan.len(), 2);

        let day2 = &rendered.lesson_plan[1];
        assert_eq!(day2.day, "Day 2");
        assert_eq!(day2.date.as_deref(), Some("03 Jun 2025"));

        let titles: Vec<_> = day2.sessions.iter().map(|s| s.instruction_title.as_str()).collect();
        assert_eq!(titles[1], "Topic 3: Managing Team Conflicts in Workplace");
        assert_eq!(
            titles[2],
            "Activity: Lecture, Peer Sharing, Group Discussion, Case Study on Managing Team Conflicts in Workplace"
        );
        assert_eq!(titles[titles.len() - 2], "Final Assessment: Written Assessment - Short Answer Questions");

        let after_lunch = &day2.sessions[4];
        assert!(after_lunch.resources.starts_with(PM_ATTENDANCE_TAG));
        assert_eq!(after_lunch.starttime, "1245");
        assert_eq!(after_lunch.duration, "10min");

        let assessments: Vec<_> = rendered
            .lesson_plan
            .iter()
            .flat_map(|d| d.sessions.iter())
            .filter(|s| s.resources.contains(ASSESSMENT_ATTENDANCE_TAG))
            .collect();
        assert_eq!(assessments.len(), 1);
        assert!(assessments[0].instruction_title.starts_with("Final Assessment"));

        let last = day2.sessions.last().map(|s| (s.starttime.as_str(), s.endtime.as_str(), s.duration.as_str()));
        assert_eq!(last, Some(("1730", "1830", "1h")));
    }

    #[test]
    fn test_bad_json() {
        let err = plan_from_json("{\"Learning_Units\": 3}", &PlannerConfig::default()).unwrap_err();
        assert!(matches!(err, PlannerError::Json(_)));
    }

    #[test]
    fn test_rendered_round_trip_shape() {
        let rendered = plan_from_json(CONTEXT3, &PlannerConfig::default()).expect("pipeline runs");
        let json = rendered.to_json().expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        let first = &value["lesson_plan"][0]["Sessions"][0];
        assert_eq!(first["starttime"], "0930");
        assert_eq!(first["endtime"], "0945");
        assert_eq!(first["duration"], "15min");
        assert_eq!(first["instruction_title"], "Digital Attendance and Introduction to the Course");
        assert!(first.get("Time").is_none());
    }
}
