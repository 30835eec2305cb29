//! Telegram integration layer: the grammers-backed transport and the
//! interactive login flow.

mod auth;
mod client;

pub use auth::login;
pub use client::TelegramBridge;
