//! Core of the Telegram MCP server: tool registry, dispatcher, handlers and
//! formatting.
//!
//! This crate does not talk to Telegram itself. The MTProto client lives behind
//! [`port::TelegramPort`], implemented in `tgmcp-telegram`.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod handlers;
pub mod logging;
pub mod mcp;
pub mod port;
pub mod resolve;
pub mod tools;
pub mod utils;

#[cfg(test)]
mod testing;

pub use errors::{Error, Result};
