//! Local persistence and aggregation core for a personal on-call
//! allowance tracker.
//!
//! Claims (one allowance category on one day, with a quantity) and
//! per-day tags live in a SQLite store behind a connection pool; the
//! [`calendar`] and [`stats`] modules fold them into what a calendar
//! grid and a monthly breakdown need, and [`transfer`] moves the whole
//! store through JSON backups. The store is the single source of truth;
//! any UI in front of this crate holds no state of its own.

pub mod calendar;
pub mod catalog;
pub mod db;
mod error;
pub mod models;
pub mod money;
pub mod stats;
pub mod transfer;

pub use catalog::Catalog;
pub use db::DbPool;
pub use error::{Error, Result};
pub use models::{Category, Claim, DayTag};
