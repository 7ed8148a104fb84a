//! vocadeck - turn vocabulary lists into Anki decks
//!
//! This library crate exposes the command implementations for integration testing.

pub mod config;
pub mod providers;
pub mod run;
pub mod source;
pub mod tools;
