//! Infrastructure layer: config persistence, logging, and storage paths.

pub mod config;
pub mod error;
pub mod logging;
pub mod secrets;
pub mod storage_layout;
#[cfg(test)]
pub mod stubs;
