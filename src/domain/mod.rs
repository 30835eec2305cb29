//! Domain layer: canonical conversation and message records plus text rules.

pub mod conversation;
pub mod message;
pub mod sanitize;
