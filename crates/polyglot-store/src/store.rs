use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Channel-level translation settings.
///
/// Created by `/autotranslate on`, deleted by `/autotranslate off`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPreference {
    pub enabled: bool,
    /// Ordered language pair; the first entry not equal to the detected
    /// language becomes the translation target.
    #[serde(rename = "activeLanguages")]
    pub active_languages: Vec<String>,
}

/// User-level translation settings. Never deleted, only disabled in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreference {
    pub enabled: bool,
    /// Always a resolved canonical code, never a free-form name.
    #[serde(rename = "targetLanguage")]
    pub target_language: String,
    /// Per-channel overrides of the global setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<HashMap<String, UserChannelOverride>>,
}

/// A user's channel-specific override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChannelOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(rename = "targetLanguage", default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

/// A user's resolved settings for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveSetting {
    pub enabled: bool,
    pub target_language: String,
}

/// On-disk document: both maps written together in one operation so a reader
/// never observes one updated without the other.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(rename = "channelSettings", default)]
    channel_settings: HashMap<String, ChannelPreference>,
    #[serde(rename = "userSettings", default)]
    user_settings: HashMap<String, UserPreference>,
}

/// Owner of all channel and user preference records, and sole writer of the
/// durable preference file.
pub struct PreferenceStore {
    path: PathBuf,
    channels: HashMap<String, ChannelPreference>,
    users: HashMap<String, UserPreference>,
}

impl PreferenceStore {
    /// Load preferences from `path`. A missing or corrupt file is logged and
    /// treated as empty, never fatal.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<PrefsFile>(&content) {
                Ok(file) => {
                    info!(
                        "loaded preferences from {}: {} channels, {} users",
                        path.display(),
                        file.channel_settings.len(),
                        file.user_settings.len()
                    );
                    file
                }
                Err(e) => {
                    warn!("corrupt preference file {}: {e}, starting empty", path.display());
                    PrefsFile::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PrefsFile::default(),
            Err(e) => {
                warn!("cannot read {}: {e}, starting empty", path.display());
                PrefsFile::default()
            }
        };
        Self {
            path,
            channels: file.channel_settings,
            users: file.user_settings,
        }
    }

    /// Serialize both maps to disk in one write. Failures are logged; the
    /// in-memory state remains authoritative for the running process.
    fn save(&self) {
        let file = PrefsFile {
            channel_settings: self.channels.clone(),
            user_settings: self.users.clone(),
        };
        let json = match serde_json::to_string_pretty(&file) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize preferences: {e}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("failed to create {}: {e}", parent.display());
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("failed to write {}: {e}", self.path.display());
        }
    }

    pub fn channel(&self, channel_id: &str) -> Option<&ChannelPreference> {
        self.channels.get(channel_id)
    }

    pub fn user(&self, user_id: &str) -> Option<&UserPreference> {
        self.users.get(user_id)
    }

    /// Set a channel preference and persist immediately.
    pub fn set_channel(&mut self, channel_id: &str, prefs: ChannelPreference) {
        self.channels.insert(channel_id.to_string(), prefs);
        self.save();
    }

    /// Delete a channel preference and persist immediately.
    /// Returns whether anything was removed.
    pub fn delete_channel(&mut self, channel_id: &str) -> bool {
        let removed = self.channels.remove(channel_id).is_some();
        if removed {
            self.save();
        }
        removed
    }

    /// Set a user preference and persist immediately.
    pub fn set_user(&mut self, user_id: &str, prefs: UserPreference) {
        self.users.insert(user_id.to_string(), prefs);
        self.save();
    }

    /// Resolve a user's effective settings for a channel.
    ///
    /// The channel-specific override applies when present, unless its
    /// `enabled` flag is explicitly false, in which case the override is void and
    /// the global settings apply.
    pub fn effective_user_setting(
        &self,
        user_id: &str,
        channel_id: &str,
    ) -> Option<EffectiveSetting> {
        let pref = self.users.get(user_id)?;
        if let Some(overrides) = &pref.channels {
            if let Some(ov) = overrides.get(channel_id) {
                if ov.enabled != Some(false) {
                    return Some(EffectiveSetting {
                        enabled: ov.enabled.unwrap_or(pref.enabled),
                        target_language: ov
                            .target_language
                            .clone()
                            .unwrap_or_else(|| pref.target_language.clone()),
                    });
                }
            }
        }
        Some(EffectiveSetting {
            enabled: pref.enabled,
            target_language: pref.target_language.clone(),
        })
    }

    /// All users with auto-translate effectively enabled in `channel_id`,
    /// excluding the message sender. Returns `(user_id, target_language)`.
    pub fn subscribers_in(&self, channel_id: &str, exclude_sender: &str) -> Vec<(String, String)> {
        self.users
            .keys()
            .filter(|id| id.as_str() != exclude_sender)
            .filter_map(|id| {
                let setting = self.effective_user_setting(id, channel_id)?;
                if setting.enabled && !setting.target_language.is_empty() {
                    Some((id.clone(), setting.target_language))
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    /// Unique temp path per test (process id + counter).
    fn test_path() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "__polyglot_store_test_{}_{}__/prefs.json",
            std::process::id(),
            id
        ))
    }

    fn channel_pref(langs: &[&str]) -> ChannelPreference {
        ChannelPreference {
            enabled: true,
            active_languages: langs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn user_pref(target: &str) -> UserPreference {
        UserPreference {
            enabled: true,
            target_language: target.to_string(),
            channels: None,
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let store = PreferenceStore::load(test_path());
        assert!(store.channel("C1").is_none());
        assert!(store.user("U1").is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = test_path();
        let mut store = PreferenceStore::load(&path);
        store.set_channel("C1", channel_pref(&["en", "tr"]));
        let mut up = user_pref("es");
        up.channels = Some(HashMap::from([(
            "C2".to_string(),
            UserChannelOverride {
                enabled: Some(false),
                target_language: None,
            },
        )]));
        store.set_user("U1", up.clone());

        let reloaded = PreferenceStore::load(&path);
        assert_eq!(reloaded.channel("C1"), Some(&channel_pref(&["en", "tr"])));
        assert_eq!(reloaded.user("U1"), Some(&up));
    }

    #[test]
    fn test_wire_format_keys() {
        let path = test_path();
        let mut store = PreferenceStore::load(&path);
        store.set_channel("C1", channel_pref(&["en", "tr"]));
        store.set_user("U1", user_pref("es"));

        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["channelSettings"]["C1"]["enabled"], true);
        assert_eq!(json["channelSettings"]["C1"]["activeLanguages"][0], "en");
        assert_eq!(json["userSettings"]["U1"]["targetLanguage"], "es");
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let path = test_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not valid json").unwrap();
        let store = PreferenceStore::load(&path);
        assert!(store.channel("C1").is_none());
    }

    #[test]
    fn test_delete_channel() {
        let path = test_path();
        let mut store = PreferenceStore::load(&path);
        store.set_channel("C1", channel_pref(&["en", "tr"]));
        assert!(store.delete_channel("C1"));
        assert!(!store.delete_channel("C1"), "second delete is a no-op");
        assert!(PreferenceStore::load(&path).channel("C1").is_none());
    }

    #[test]
    fn test_effective_setting_global_only() {
        let mut store = PreferenceStore::load(test_path());
        store.set_user("U1", user_pref("es"));
        let s = store.effective_user_setting("U1", "C1").unwrap();
        assert!(s.enabled);
        assert_eq!(s.target_language, "es");
        assert!(store.effective_user_setting("U9", "C1").is_none());
    }

    #[test]
    fn test_effective_setting_override_applies() {
        let mut store = PreferenceStore::load(test_path());
        let mut up = user_pref("es");
        up.channels = Some(HashMap::from([(
            "C1".to_string(),
            UserChannelOverride {
                enabled: Some(true),
                target_language: Some("fr".to_string()),
            },
        )]));
        store.set_user("U1", up);
        let s = store.effective_user_setting("U1", "C1").unwrap();
        assert_eq!(s.target_language, "fr");
        // Other channels fall back to global.
        let s = store.effective_user_setting("U1", "C2").unwrap();
        assert_eq!(s.target_language, "es");
    }

    #[test]
    fn test_effective_setting_disabled_override_is_void() {
        let mut store = PreferenceStore::load(test_path());
        let mut up = user_pref("es");
        up.channels = Some(HashMap::from([(
            "C1".to_string(),
            UserChannelOverride {
                enabled: Some(false),
                target_language: Some("fr".to_string()),
            },
        )]));
        store.set_user("U1", up);
        let s = store.effective_user_setting("U1", "C1").unwrap();
        assert_eq!(s.target_language, "es", "voided override falls back to global");
        assert!(s.enabled);
    }

    #[test]
    fn test_subscribers_excludes_sender_and_disabled() {
        let mut store = PreferenceStore::load(test_path());
        store.set_user("U1", user_pref("es"));
        store.set_user("U2", user_pref("fr"));
        let mut disabled = user_pref("de");
        disabled.enabled = false;
        store.set_user("U3", disabled);

        let mut subs = store.subscribers_in("C1", "U1");
        subs.sort();
        assert_eq!(subs, vec![("U2".to_string(), "fr".to_string())]);
    }
}
