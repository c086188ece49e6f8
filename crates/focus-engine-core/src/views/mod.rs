//! Read-only projections of the plan store.
//!
//! Nothing here is cached or maintained incrementally; every view is
//! rebuilt from the store and a calendar date on request.

mod backlog;
mod progress;
mod today;

pub use backlog::{backlog_tasks, session_candidates, BacklogItem, BacklogView};
pub use progress::{
    subject_distribution, trailing_window, DayBar, SubjectShare, WeeklyMetrics,
    BAR_CEILING_MINUTES, WINDOW_DAYS,
};
pub use today::{completion_pct, today_tasks, SubjectProgress, TodayView};
