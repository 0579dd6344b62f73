//! Shared test fixtures for ShiftForge crates.
//!
//! - [`roster`] - ready-made scheduling inputs
//! - [`check`] - hard-rule checks over a returned [`ScheduleResult`]
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! shiftforge-test = { workspace = true }
//! ```
//!
//! [`ScheduleResult`]: shiftforge_core::ScheduleResult

pub mod check;
pub mod roster;

pub use check::{assert_exact_counts, assert_one_cell_per_day, assert_schedule_valid};
pub use roster::{night_preference, single_slot, uniform_roster, weekly_roster};
