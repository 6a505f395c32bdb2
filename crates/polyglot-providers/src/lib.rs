//! # polyglot-providers
//!
//! Translation provider implementations for the Polyglot bot.

pub mod google;

pub use google::GoogleTranslator;
