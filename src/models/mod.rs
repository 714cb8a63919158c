//! Timetabling domain models.
//!
//! Provides the data types for describing a course, the pending content
//! queue, and the assembled lesson plan.
//!
//! # Domain Mappings
//!
//! | u-timetable | Course document | Scheduling |
//! |-------------|-----------------|------------|
//! | LearningUnit | LU block | Job |
//! | Session | Topic / activity | Operation |
//! | DayTemplate | Training day | Shift calendar |
//! | LessonPlan | Lesson plan | Schedule |

mod calendar;
mod course;
mod duration;
mod lesson_plan;
mod seed;
mod session;
mod time;

pub use calendar::{DayTemplate, TimeWindow};
pub use course::{
    lu_number_anywhere, lu_number_prefix, topic_number_prefix, AssessmentMethod, CourseContext,
    LearningUnit, MethodList, Topic, COURSE_DATE_FORMAT,
};
pub use duration::{
    floor_to_grid, format_duration, parse_duration, round_to_nearest_5, Minutes, RoundDirection,
    GRID_MINUTES,
};
pub use lesson_plan::{
    Day, LessonPlan, RenderedDay, RenderedLessonPlan, RenderedSession, SessionEntry, SlotKind,
};
pub use seed::{seed_to_lesson_plan, SeedDay, SeedLessonPlan, SeedSession};
pub use session::{BulletSplit, Session, SessionKind, SessionMeta};
pub use time::{format_time, parse_time, ClockTime, TimeRange};
