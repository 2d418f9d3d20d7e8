//! Infrastructure adapters and runtime bootstrap.

pub mod catalog;
pub mod components;
pub mod error;
pub mod telemetry;
pub mod views;
