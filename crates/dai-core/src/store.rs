//! # SiteStore
//!
//! Single owner of preferences, consent, the admin flag and the moderation
//! queues. Every mutation is applied in memory first and then written to the
//! `KvStore` on a best-effort basis: storage errors are logged and dropped,
//! never rolled back and never returned.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::models::{
    AccessibilityPreferences, ConsentState, ModerationQueues, Testimonial, FONT_SCALE_STEP,
};
use crate::traits::KvStore;

pub const KEY_PREFERENCES: &str = "a11y_prefs";
pub const KEY_CONSENT: &str = "epilepsy_ack";
pub const KEY_APPROVED: &str = "dai_testimonials_approved";
pub const KEY_PENDING: &str = "dai_testimonials_pending";
pub const KEY_ADMIN: &str = "dai_admin";

/// Value written for the two boolean flags.
const FLAG_SET: &str = "1";
const ADMIN_QUERY_MARKER: &str = "admin=1";

/// Derives the one-shot admin signal from a page query string.
pub fn admin_signal_from_query(query: &str) -> bool {
    query.contains(ADMIN_QUERY_MARKER)
}

/// Read-only copy of everything the presentation layer renders from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub preferences: AccessibilityPreferences,
    pub consent: ConsentState,
    pub consent_prompt_pending: bool,
    pub is_admin: bool,
    pub approved: Vec<Testimonial>,
    pub pending: Vec<Testimonial>,
}

pub struct SiteStore {
    kv: Arc<dyn KvStore>,
    preferences: AccessibilityPreferences,
    consent: ConsentState,
    /// Session-only; never persisted.
    consent_prompt: bool,
    queues: ModerationQueues,
    is_admin: bool,
}

impl SiteStore {
    /// Loads persisted state from `kv`, falling back to defaults for anything
    /// missing, unreadable or corrupt. `admin_signal` is the host's one-time
    /// admin trigger; it only ever turns the sticky flag on.
    pub fn init(kv: Arc<dyn KvStore>, admin_signal: bool) -> Self {
        let mut store = Self {
            kv,
            preferences: AccessibilityPreferences::default(),
            consent: ConsentState::default(),
            consent_prompt: false,
            queues: ModerationQueues::default(),
            is_admin: false,
        };

        if let Some(prefs) = store.load_json::<AccessibilityPreferences>(KEY_PREFERENCES) {
            store.preferences = prefs.sanitized();
        }

        match store.load_raw(KEY_CONSENT) {
            Some(ack) if !ack.is_empty() => store.consent.epilepsy_acknowledged = true,
            _ => store.consent_prompt = true,
        }

        if let Some(approved) = store.load_json::<Vec<Testimonial>>(KEY_APPROVED) {
            store.queues.approved = approved;
        }
        if let Some(pending) = store.load_json::<Vec<Testimonial>>(KEY_PENDING) {
            store.queues.pending = pending;
        }

        let sticky_admin = store.load_raw(KEY_ADMIN).as_deref() == Some(FLAG_SET);
        if admin_signal || sticky_admin {
            store.is_admin = true;
            store.persist_raw(KEY_ADMIN, FLAG_SET);
        }

        log::debug!(
            "site store initialized: admin={}, consent_prompt={}, approved={}, pending={}",
            store.is_admin,
            store.consent_prompt,
            store.queues.approved.len(),
            store.queues.pending.len()
        );
        store
    }

    // ── Snapshots ───────────────────────────────────────────────────────────

    pub fn preferences(&self) -> AccessibilityPreferences {
        self.preferences
    }

    pub fn consent(&self) -> ConsentState {
        self.consent
    }

    /// True while the photosensitivity warning should be shown.
    pub fn consent_prompt_pending(&self) -> bool {
        self.consent_prompt
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn approved(&self) -> &[Testimonial] {
        &self.queues.approved
    }

    pub fn pending(&self) -> &[Testimonial] {
        &self.queues.pending
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            preferences: self.preferences,
            consent: self.consent,
            consent_prompt_pending: self.consent_prompt,
            is_admin: self.is_admin,
            approved: self.queues.approved.clone(),
            pending: self.queues.pending.clone(),
        }
    }

    // ── Preferences ─────────────────────────────────────────────────────────

    pub fn set_high_contrast(&mut self, value: bool) {
        self.preferences.high_contrast = value;
        self.save_preferences();
    }

    pub fn set_reduced_motion(&mut self, value: bool) {
        self.preferences.reduced_motion = value;
        self.save_preferences();
    }

    pub fn adjust_font_scale(&mut self, delta: f64) {
        if self.preferences.adjust_font_scale(delta) {
            self.save_preferences();
        } else {
            log::debug!("ignoring non-finite font scale delta {delta}");
        }
    }

    pub fn increase_font_scale(&mut self) {
        self.adjust_font_scale(FONT_SCALE_STEP);
    }

    pub fn decrease_font_scale(&mut self) {
        self.adjust_font_scale(-FONT_SCALE_STEP);
    }

    pub fn reset_preferences(&mut self) {
        self.preferences = AccessibilityPreferences::default();
        self.save_preferences();
    }

    // ── Consent ─────────────────────────────────────────────────────────────

    /// One-way: there is no operation that clears the acknowledgment.
    pub fn acknowledge_consent(&mut self) {
        self.consent.epilepsy_acknowledged = true;
        self.consent_prompt = false;
        self.persist_raw(KEY_CONSENT, FLAG_SET);
    }

    /// The warning's "reduce animations" button.
    pub fn acknowledge_consent_with_reduced_motion(&mut self) {
        self.set_reduced_motion(true);
        self.acknowledge_consent();
    }

    // ── Moderation ──────────────────────────────────────────────────────────

    /// Queues a visitor testimonial at the front of `pending`. Blank name or
    /// text is rejected and nothing is written.
    pub fn submit_testimonial(
        &mut self,
        name: &str,
        text: &str,
        avatar: Option<&str>,
    ) -> Result<Testimonial> {
        let item = Testimonial::from_submission(name, text, avatar)?;
        self.queues.submit(item.clone());
        self.save_pending();
        Ok(item)
    }

    /// Moves `pending[index]` to the front of `approved`. Out-of-range indexes
    /// come from stale snapshots and are ignored.
    pub fn approve_testimonial(&mut self, index: usize) -> Option<Testimonial> {
        let item = self.queues.approve(index)?;
        self.save_pending();
        self.save_approved();
        Some(item)
    }

    pub fn reject_testimonial(&mut self, index: usize) -> Option<Testimonial> {
        let item = self.queues.reject(index)?;
        self.save_pending();
        Some(item)
    }

    // ── Persistence ─────────────────────────────────────────────────────────

    fn save_preferences(&self) {
        self.persist_json(KEY_PREFERENCES, &self.preferences);
    }

    fn save_approved(&self) {
        self.persist_json(KEY_APPROVED, &self.queues.approved);
    }

    fn save_pending(&self) {
        self.persist_json(KEY_PENDING, &self.queues.pending);
    }

    fn load_raw(&self, key: &str) -> Option<String> {
        match self.kv.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("failed to read {key} from storage: {e:#}");
                None
            }
        }
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.load_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring corrupt {key} payload: {e}");
                None
            }
        }
    }

    fn persist_raw(&self, key: &str, value: &str) {
        if let Err(e) = self.kv.set(key, value) {
            log::warn!("failed to write {key} to storage: {e:#}");
        }
    }

    fn persist_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.persist_raw(key, &raw),
            Err(e) => log::warn!("failed to encode {key}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{seed_testimonials, PLACEHOLDER_AVATAR};
    use crate::traits::MockKvStore;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapKv(Mutex<HashMap<String, String>>);

    impl MapKv {
        fn with(entries: &[(&str, &str)]) -> Arc<Self> {
            let kv = Self::default();
            {
                let mut map = kv.0.lock().unwrap();
                for (k, v) in entries {
                    map.insert(k.to_string(), v.to_string());
                }
            }
            Arc::new(kv)
        }

        fn raw(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key).cloned()
        }
    }

    impl KvStore for MapKv {
        fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.0.lock().unwrap().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn failing_kv() -> Arc<MockKvStore> {
        let mut kv = MockKvStore::new();
        kv.expect_get().returning(|_| Err(anyhow::anyhow!("storage disabled")));
        kv.expect_set().returning(|_, _| Err(anyhow::anyhow!("quota exceeded")));
        Arc::new(kv)
    }

    fn item(name: &str) -> Testimonial {
        Testimonial {
            name: name.to_string(),
            text: "text".to_string(),
            avatar: PLACEHOLDER_AVATAR.to_string(),
        }
    }

    #[test]
    fn fresh_store_uses_defaults_and_prompts_for_consent() {
        let store = SiteStore::init(MapKv::with(&[]), false);
        assert_eq!(store.preferences(), AccessibilityPreferences::default());
        assert!(store.consent_prompt_pending());
        assert!(!store.consent().epilepsy_acknowledged);
        assert_eq!(store.approved(), seed_testimonials().as_slice());
        assert!(store.pending().is_empty());
        assert!(!store.is_admin());
    }

    #[test]
    fn corrupt_payloads_fall_back_to_defaults() {
        let kv = MapKv::with(&[
            (KEY_PREFERENCES, "{not json"),
            (KEY_APPROVED, "42"),
            (KEY_PENDING, ""),
        ]);
        let store = SiteStore::init(kv, false);
        assert_eq!(store.preferences(), AccessibilityPreferences::default());
        assert_eq!(store.approved(), seed_testimonials().as_slice());
        assert!(store.pending().is_empty());
    }

    #[test]
    fn persisted_state_is_adopted() {
        let kv = MapKv::with(&[
            (KEY_PREFERENCES, r#"{"highContrast":true,"reducedMotion":false,"fontScale":1.2}"#),
            (KEY_CONSENT, "1"),
            (KEY_APPROVED, r#"[{"name":"a","text":"text","avatar":"/client_placeholder.jpg"}]"#),
            (KEY_PENDING, r#"[{"name":"b","text":"text"}]"#),
        ]);
        let store = SiteStore::init(kv, false);
        assert!(store.preferences().high_contrast);
        assert_eq!(store.preferences().font_scale, 1.2);
        assert!(!store.consent_prompt_pending());
        assert_eq!(store.approved(), &[item("a")]);
        assert_eq!(store.pending(), &[item("b")]);
    }

    #[test]
    fn mutations_are_written_through() {
        let kv = MapKv::with(&[]);
        let mut store = SiteStore::init(kv.clone(), false);
        store.set_high_contrast(true);
        store.increase_font_scale();
        let saved: AccessibilityPreferences =
            serde_json::from_str(&kv.raw(KEY_PREFERENCES).unwrap()).unwrap();
        assert!(saved.high_contrast);
        assert_eq!(saved.font_scale, 1.05);
    }

    #[test]
    fn reset_restores_exact_defaults() {
        let mut store = SiteStore::init(MapKv::with(&[]), false);
        store.set_high_contrast(true);
        store.set_reduced_motion(true);
        store.decrease_font_scale();
        store.reset_preferences();
        assert_eq!(
            store.preferences(),
            AccessibilityPreferences { high_contrast: false, reduced_motion: false, font_scale: 1.0 }
        );
    }

    #[test]
    fn consent_is_idempotent_and_survives_restart() {
        let kv = MapKv::with(&[]);
        let mut store = SiteStore::init(kv.clone(), false);
        store.acknowledge_consent();
        assert!(store.consent().epilepsy_acknowledged);
        store.acknowledge_consent();
        assert!(store.consent().epilepsy_acknowledged);
        assert!(!store.consent_prompt_pending());

        let reloaded = SiteStore::init(kv, false);
        assert!(!reloaded.consent_prompt_pending());
        assert!(reloaded.consent().epilepsy_acknowledged);
    }

    #[test]
    fn consent_with_reduced_motion_sets_both() {
        let kv = MapKv::with(&[]);
        let mut store = SiteStore::init(kv.clone(), false);
        store.acknowledge_consent_with_reduced_motion();
        assert!(store.preferences().reduced_motion);
        assert!(store.consent().epilepsy_acknowledged);
        assert_eq!(kv.raw(KEY_CONSENT).as_deref(), Some("1"));
    }

    #[test]
    fn submit_prepends_trimmed_entry() {
        let kv = MapKv::with(&[]);
        let mut store = SiteStore::init(kv.clone(), false);
        store.submit_testimonial("first", "text", None).unwrap();
        let stored = store.submit_testimonial(" Dana ", " Great! ", None).unwrap();
        assert_eq!(stored.name, "Dana");
        assert_eq!(stored.text, "Great!");
        assert_eq!(stored.avatar, PLACEHOLDER_AVATAR);
        assert_eq!(store.pending()[0], stored);
        assert_eq!(store.pending().len(), 2);
        assert!(kv.raw(KEY_PENDING).unwrap().contains("Dana"));
    }

    #[test]
    fn invalid_submission_writes_nothing() {
        let kv = MapKv::with(&[]);
        let mut store = SiteStore::init(kv.clone(), false);
        assert!(store.submit_testimonial("", "text", None).is_err());
        assert!(store.submit_testimonial("name", "   ", None).is_err());
        assert!(store.pending().is_empty());
        assert_eq!(kv.raw(KEY_PENDING), None);
    }

    #[test]
    fn approve_and_reject_persist_both_lists() {
        let kv = MapKv::with(&[]);
        let mut store = SiteStore::init(kv.clone(), false);
        store.submit_testimonial("b", "text", None).unwrap();
        store.submit_testimonial("a", "text", None).unwrap();

        assert_eq!(store.approve_testimonial(0), Some(item("a")));
        assert_eq!(store.pending(), &[item("b")]);
        assert_eq!(store.approved()[0], item("a"));
        assert_eq!(store.approved().len(), seed_testimonials().len() + 1);

        assert_eq!(store.reject_testimonial(0), Some(item("b")));
        assert!(store.pending().is_empty());
        assert_eq!(store.approved().len(), seed_testimonials().len() + 1);

        let reloaded = SiteStore::init(kv, false);
        assert_eq!(reloaded.approved()[0], item("a"));
        assert!(reloaded.pending().is_empty());
    }

    #[test]
    fn stale_index_is_ignored() {
        let mut store = SiteStore::init(MapKv::with(&[]), false);
        assert_eq!(store.approve_testimonial(3), None);
        assert_eq!(store.reject_testimonial(0), None);
        assert_eq!(store.approved(), seed_testimonials().as_slice());
    }

    #[test]
    fn admin_signal_is_sticky() {
        let kv = MapKv::with(&[]);
        let store = SiteStore::init(kv.clone(), true);
        assert!(store.is_admin());
        assert_eq!(kv.raw(KEY_ADMIN).as_deref(), Some("1"));

        let reloaded = SiteStore::init(kv, false);
        assert!(reloaded.is_admin());
    }

    #[test]
    fn admin_flag_requires_exact_marker() {
        let store = SiteStore::init(MapKv::with(&[(KEY_ADMIN, "true")]), false);
        assert!(!store.is_admin());
    }

    #[test]
    fn admin_signal_reads_query_marker() {
        assert!(admin_signal_from_query("?admin=1"));
        assert!(admin_signal_from_query("?utm=x&admin=1"));
        assert!(!admin_signal_from_query("?admin=0"));
        assert!(!admin_signal_from_query(""));
    }

    #[test]
    fn failing_storage_degrades_to_memory_only() {
        let mut store = SiteStore::init(failing_kv(), true);
        assert!(store.is_admin());
        assert!(store.consent_prompt_pending());

        store.set_reduced_motion(true);
        for _ in 0..20 {
            store.decrease_font_scale();
        }
        assert!(store.preferences().reduced_motion);
        assert_eq!(store.preferences().font_scale, 0.85);

        store.acknowledge_consent();
        assert!(store.consent().epilepsy_acknowledged);

        store.submit_testimonial("b", "text", None).unwrap();
        store.submit_testimonial("a", "text", None).unwrap();
        store.approve_testimonial(0);
        store.reject_testimonial(0);
        assert!(store.pending().is_empty());
        assert_eq!(store.approved()[0], item("a"));
    }
}
