//! # momentum-core
//!
//! Core types, configuration, and error handling for the Momentum assistant.

pub mod config;
pub mod entities;
pub mod error;
pub mod message;
pub mod parse;
pub mod traits;

pub use config::shellexpand;
