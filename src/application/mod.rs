//! Application layer: error types, host ports and the preview pipeline.

pub mod error;
pub mod ports;
pub mod preview;
