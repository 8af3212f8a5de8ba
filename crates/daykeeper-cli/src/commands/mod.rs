pub mod checkin;
pub mod schedule;
pub mod setup;
pub mod task;
