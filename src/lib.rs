// lib.rs
// Recurring-template materialization: models, store access, recurrence math,
// and the batch scheduler.

pub mod models;
pub mod recurrence;
pub mod scheduler;
pub mod state;
