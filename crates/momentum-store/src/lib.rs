//! # momentum-store
//!
//! SQLite-backed entity store for Momentum (habits, tasks, notes, moods,
//! achievements).

pub mod store;

pub use store::{Snapshot, Store, Totals};
