//! Live HTML previews of block list and block grid items.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod util;
