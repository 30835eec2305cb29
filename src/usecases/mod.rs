//! Use case layer: the directory, access-control, and message workflows.

pub mod access;
pub mod directory;
pub mod fetch_messages;
pub mod normalize;
pub mod send_message;
pub mod transport;
pub mod whitelist;
