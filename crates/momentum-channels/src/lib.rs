//! # momentum-channels
//!
//! Messaging platform integrations for Momentum.

pub mod telegram;
