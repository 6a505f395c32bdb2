//! # polyglot-channels
//!
//! Messaging platform integrations for the Polyglot bot.

pub mod slack;
