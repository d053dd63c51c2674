//! Cadence terminal application
//!
//! Configuration, wiring and the terminal screens behind the `cadence`
//! binary.

pub mod app;
pub mod config;
pub mod screens;
