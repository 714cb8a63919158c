//! Lesson-plan scheduling.
//!
//! Turns a course into a multi-day lesson plan in three stages:
//!
//! 1. [`build_session_queue`] flattens Learning Units into a FIFO of topic
//!    and activity sessions, with delivery metadata from a [`MethodCatalog`].
//! 2. [`schedule_block`] fills one clock window from the queue on the
//!    5-minute grid, splitting the session that straddles the window end.
//! 3. [`LessonPlanner`] wraps the windows with attendance, lunch, tea break
//!    and recap slots, and closes the last day with feedback and the final
//!    assessments.
//!
//! # KPI
//!
//! [`PlanKpi`] reports minute breakdowns per day and per Learning Unit.

mod block;
mod catalog;
mod kpi;
mod planner;
mod queue;

pub use block::{schedule_block, schedule_block_with_tea_break, TeaBreak};
pub use catalog::{CatalogKey, MethodCatalog};
pub use kpi::{DayKpi, PlanKpi};
pub use planner::LessonPlanner;
pub use queue::{allot_topic_minutes, build_session_queue, split_learning_unit, SessionQueue};
