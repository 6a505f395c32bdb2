//! Shared mock translator and delivery sink for router and command tests.

use super::cache::DetectionCache;
use super::router::Router;
use async_trait::async_trait;
use polyglot_core::{
    config::CacheConfig,
    error::PolyglotError,
    message::{ChannelPost, MessageEvent, UserProfile},
    traits::{DeliverySink, Translator},
};
use polyglot_store::PreferenceStore;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Router over mocks and a throwaway preference file.
pub(crate) fn router_with(translator: Arc<MockTranslator>, sink: Arc<MockSink>) -> Router {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "__polyglot_router_test_{}_{}__/prefs.json",
        std::process::id(),
        id
    ));
    Router::new(
        translator,
        sink,
        Arc::new(RwLock::new(PreferenceStore::load(path))),
        DetectionCache::new(&CacheConfig::default()),
    )
}

pub(crate) fn message(channel_id: &str, sender_id: &str, text: &str) -> MessageEvent {
    MessageEvent {
        channel_id: channel_id.into(),
        sender_id: sender_id.into(),
        text: text.into(),
        ts: "1700000000.000100".into(),
        thread_ts: None,
        subtype: None,
        bot_id: None,
        received_at: chrono::Utc::now(),
    }
}

/// Scripted translator. Unscripted translations yield `[{target}] {text}`.
pub(crate) struct MockTranslator {
    detected: Option<String>,
    detect_count: AtomicUsize,
    translations: Mutex<HashMap<(String, String), String>>,
    failing_targets: Mutex<HashSet<String>>,
    translate_log: Mutex<Vec<(String, String)>>,
}

impl MockTranslator {
    pub fn detecting(code: &str) -> Arc<Self> {
        Arc::new(Self {
            detected: Some(code.to_string()),
            detect_count: AtomicUsize::new(0),
            translations: Mutex::new(HashMap::new()),
            failing_targets: Mutex::new(HashSet::new()),
            translate_log: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_detect() -> Arc<Self> {
        Arc::new(Self {
            detected: None,
            detect_count: AtomicUsize::new(0),
            translations: Mutex::new(HashMap::new()),
            failing_targets: Mutex::new(HashSet::new()),
            translate_log: Mutex::new(Vec::new()),
        })
    }

    pub fn set_translation(&self, text: &str, target: &str, result: &str) {
        self.translations
            .lock()
            .unwrap()
            .insert((text.to_string(), target.to_string()), result.to_string());
    }

    pub fn fail_target(&self, target: &str) {
        self.failing_targets.lock().unwrap().insert(target.to_string());
    }

    pub fn detect_calls(&self) -> usize {
        self.detect_count.load(Ordering::Relaxed)
    }

    /// `(text, target)` pairs in call order.
    pub fn translate_calls(&self) -> Vec<(String, String)> {
        self.translate_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn detect(&self, _text: &str) -> Result<String, PolyglotError> {
        self.detect_count.fetch_add(1, Ordering::Relaxed);
        self.detected
            .clone()
            .ok_or_else(|| PolyglotError::Provider("detect unavailable".into()))
    }

    async fn translate(
        &self,
        text: &str,
        target: &str,
        _source: Option<&str>,
    ) -> Result<String, PolyglotError> {
        self.translate_log
            .lock()
            .unwrap()
            .push((text.to_string(), target.to_string()));
        if self.failing_targets.lock().unwrap().contains(target) {
            return Err(PolyglotError::Provider(format!("no route to '{target}'")));
        }
        let scripted = self
            .translations
            .lock()
            .unwrap()
            .get(&(text.to_string(), target.to_string()))
            .cloned();
        Ok(scripted.unwrap_or_else(|| format!("[{target}] {text}")))
    }

    async fn is_available(&self) -> bool {
        self.detected.is_some()
    }
}

/// Recording delivery sink.
pub(crate) struct MockSink {
    channel_posts: Mutex<Vec<(String, ChannelPost)>>,
    ephemerals: Mutex<Vec<(String, String, String)>>,
    alternate_posts: Mutex<Vec<(String, String)>>,
    profile: Mutex<Option<UserProfile>>,
    accessible: AtomicBool,
    alternate_fails: AtomicBool,
}

impl MockSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            channel_posts: Mutex::new(Vec::new()),
            ephemerals: Mutex::new(Vec::new()),
            alternate_posts: Mutex::new(Vec::new()),
            profile: Mutex::new(Some(UserProfile {
                display_name: "user".into(),
                avatar_url: None,
            })),
            accessible: AtomicBool::new(true),
            alternate_fails: AtomicBool::new(false),
        })
    }

    pub fn set_profile(&self, display_name: &str, avatar_url: Option<&str>) {
        *self.profile.lock().unwrap() = Some(UserProfile {
            display_name: display_name.into(),
            avatar_url: avatar_url.map(String::from),
        });
    }

    pub fn fail_profile(&self) {
        *self.profile.lock().unwrap() = None;
    }

    pub fn set_accessible(&self, accessible: bool) {
        self.accessible.store(accessible, Ordering::Relaxed);
    }

    pub fn fail_alternate(&self) {
        self.alternate_fails.store(true, Ordering::Relaxed);
    }

    pub fn channel_posts(&self) -> Vec<(String, ChannelPost)> {
        self.channel_posts.lock().unwrap().clone()
    }

    /// `(channel_id, user_id, text)` triples.
    pub fn ephemerals(&self) -> Vec<(String, String, String)> {
        self.ephemerals.lock().unwrap().clone()
    }

    pub fn alternate_posts(&self) -> Vec<(String, String)> {
        self.alternate_posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliverySink for MockSink {
    async fn post_channel_message(
        &self,
        channel_id: &str,
        post: &ChannelPost,
    ) -> Result<(), PolyglotError> {
        self.channel_posts
            .lock()
            .unwrap()
            .push((channel_id.to_string(), post.clone()));
        Ok(())
    }

    async fn post_ephemeral(
        &self,
        channel_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<(), PolyglotError> {
        self.ephemerals.lock().unwrap().push((
            channel_id.to_string(),
            user_id.to_string(),
            text.to_string(),
        ));
        Ok(())
    }

    async fn post_as_alternate(&self, channel_id: &str, text: &str) -> Result<(), PolyglotError> {
        if self.alternate_fails.load(Ordering::Relaxed) {
            return Err(PolyglotError::Channel("not_in_channel".into()));
        }
        self.alternate_posts
            .lock()
            .unwrap()
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn user_profile(&self, _user_id: &str) -> Result<UserProfile, PolyglotError> {
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| PolyglotError::Channel("users.info unavailable".into()))
    }

    async fn is_channel_accessible(&self, _channel_id: &str) -> bool {
        self.accessible.load(Ordering::Relaxed)
    }
}
