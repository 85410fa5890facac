//! Core business logic - framework-agnostic habit, completion, streak and
//! analytics operations.

/// Completion storage operations, progress evaluation, and logging/undo
pub mod completion;
/// Bulk data management - backup export/import and full wipe
pub mod data;
/// Habit CRUD, validation, and archival
pub mod habit;
/// Heatmap data transformation and its invalidating cache
pub mod heatmap;
/// Pure calendar-period arithmetic for daily/weekly/monthly goals
pub mod period;
/// Key-value settings stored in the database
pub mod setting;
/// Consecutive goal-met streak calculation
pub mod streak;
