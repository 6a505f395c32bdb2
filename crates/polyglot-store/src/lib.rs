//! # polyglot-store
//!
//! Durable channel and user translation preferences, persisted as a single
//! JSON document rewritten wholesale on every mutation.

mod store;

pub use store::{
    ChannelPreference, EffectiveSetting, PreferenceStore, UserChannelOverride, UserPreference,
};
