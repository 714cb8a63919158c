//! Lesson-plan timetabling for instructor-led training courses.
//!
//! Turns a course outline (Learning Units → topics → bullet points, plus the
//! final assessment methods) into a multi-day lesson plan on a 5-minute grid,
//! with attendance, lunch, tea break, recap, feedback and assessment slots.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `CourseContext`, `LearningUnit`, `Session`,
//!   `LessonPlan`, `ClockTime`, `DayTemplate`
//! - **`scheduler`**: Session queue, block scheduler, day assembler, KPIs
//! - **`postprocess`**: Activity renaming, attendance tags, title cleanup,
//!   start/end/duration rendering
//! - **`pipeline`**: End-to-end `course → rendered lesson plan`
//! - **`validation`**: Course and lesson-plan integrity checks
//! - **`config`**: TOML-loadable planner configuration
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{AssessmentMethod, CourseContext, LearningUnit, Topic};
//! use u_timetable::{LessonPlanner, validate_lesson_plan};
//!
//! let course = CourseContext::new("Conflict Management")
//!     .with_learning_unit(
//!         LearningUnit::new("LU1: Identify Conflicts", "7 hrs")
//!             .with_topic(Topic::new("Topic 1: Causes", ["Signs", "Stages"]))
//!             .with_topic(Topic::new("Topic 2: Indicators", ["Early indicators"])),
//!     )
//!     .with_assessment(AssessmentMethod::new("Case Study", "1 hr"));
//!
//! let plan = LessonPlanner::new().fix_lesson_plan(&course);
//! assert_eq!(plan.day_count(), 1);
//! assert!(validate_lesson_plan(&plan, Some(&course)).is_ok());
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod postprocess;
pub mod scheduler;
pub mod validation;

pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use pipeline::{plan_from_json, process};
pub use scheduler::{LessonPlanner, PlanKpi};
pub use validation::{validate_course, validate_lesson_plan, validate_lesson_plan_with, validate_seed_plan};
