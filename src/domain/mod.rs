//! Domain layer: block payloads, grid configuration and typed instances.

pub mod blocks;
pub mod elements;
pub mod grid;
pub mod instance;
