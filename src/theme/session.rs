//! Theme session - active theme and font, persisted and mode-reconciled
//!
//! [`ThemeSessionState`] owns the active theme id and font id. It reads its
//! starting point from a [`KeyValueStore`], writes every change back, and
//! re-derives the active theme whenever the external light/dark mode changes.
//!
//! The mode itself is not owned here. [`ModeSignal`] stands in for the
//! document attribute that drives it: callers subscribe and feed received
//! modes to [`ThemeSessionState::observe_mode`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use theme_workbench::core::store::MemoryStore;
//! use theme_workbench::theme::registry::{ThemeMode, ThemeRegistry};
//! use theme_workbench::theme::session::{SessionDefaults, ThemeSessionState};
//!
//! let registry = Arc::new(ThemeRegistry::builtin());
//! let mut session =
//!     ThemeSessionState::load(registry, MemoryStore::new(), SessionDefaults::default());
//! assert_eq!(session.current_theme(), "maritime");
//!
//! session.observe_mode(ThemeMode::Dark);
//! assert_eq!(session.current_theme(), "dark");
//! ```

use crate::core::store::{KeyValueStore, DARK_THEME_KEY, FONT_KEY, LIGHT_THEME_KEY, THEME_KEY};
use crate::theme::fonts::{FontId, DEFAULT_FONT};
use crate::theme::registry::{
    ThemeDefinition, ThemeMode, ThemeRegistry, DEFAULT_DARK_THEME, DEFAULT_LIGHT_THEME,
};
use log::{debug, info, warn};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Store key remembering the last theme chosen in `mode`
pub fn mode_key(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => LIGHT_THEME_KEY,
        ThemeMode::Dark => DARK_THEME_KEY,
    }
}

// =============================================================================
// Defaults
// =============================================================================

/// Fallbacks used when persisted values are absent or stale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDefaults {
    pub light_theme: String,
    pub dark_theme: String,
    pub font: FontId,
}

impl SessionDefaults {
    pub fn theme_for(&self, mode: ThemeMode) -> &str {
        match mode {
            ThemeMode::Light => &self.light_theme,
            ThemeMode::Dark => &self.dark_theme,
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            light_theme: DEFAULT_LIGHT_THEME.to_string(),
            dark_theme: DEFAULT_DARK_THEME.to_string(),
            font: DEFAULT_FONT,
        }
    }
}

// =============================================================================
// Session state
// =============================================================================

/// Active theme and font for one session
#[derive(Debug)]
pub struct ThemeSessionState<S: KeyValueStore> {
    registry: Arc<ThemeRegistry>,
    store: S,
    defaults: SessionDefaults,
    current_theme: String,
    current_font: FontId,
    last_mode: Option<ThemeMode>,
}

impl<S: KeyValueStore> ThemeSessionState<S> {
    /// Restore the session from `store`
    ///
    /// The theme comes from `selectedTheme`, then `selectedLightTheme`, then
    /// the light default. Ids unknown to the registry are skipped. The chosen
    /// theme and font are written back immediately.
    pub fn load(registry: Arc<ThemeRegistry>, store: S, defaults: SessionDefaults) -> Self {
        let stored_theme = [THEME_KEY, LIGHT_THEME_KEY]
            .iter()
            .filter_map(|key| store.get(key))
            .find(|id| {
                let known = registry.contains(id);
                if !known {
                    warn!("Ignoring persisted theme '{}': not in the catalog", id);
                }
                known
            });

        let current_theme = match stored_theme {
            Some(id) => id,
            None => Self::fallback_theme(&registry, &defaults),
        };

        let current_font = match store.get(FONT_KEY) {
            Some(id) => id.parse::<FontId>().unwrap_or_else(|e| {
                warn!("Ignoring persisted font: {}", e);
                defaults.font
            }),
            None => defaults.font,
        };

        let mut session = Self {
            registry,
            store,
            defaults,
            current_theme,
            current_font,
            last_mode: None,
        };
        session.persist_theme();
        session.persist_font();

        info!(
            "Session loaded: theme '{}', font '{}'",
            session.current_theme, session.current_font
        );
        session
    }

    fn fallback_theme(registry: &ThemeRegistry, defaults: &SessionDefaults) -> String {
        if registry.contains(&defaults.light_theme) {
            return defaults.light_theme.clone();
        }
        warn!(
            "Default light theme '{}' is not in the catalog",
            defaults.light_theme
        );
        registry
            .ids()
            .next()
            .unwrap_or(defaults.light_theme.as_str())
            .to_string()
    }

    pub fn current_theme(&self) -> &str {
        &self.current_theme
    }

    pub fn current_font(&self) -> FontId {
        self.current_font
    }

    /// The active theme definition
    ///
    /// `None` only when the registry holds no themes at all.
    pub fn theme(&self) -> Option<&ThemeDefinition> {
        self.registry.get(&self.current_theme)
    }

    pub fn registry(&self) -> &Arc<ThemeRegistry> {
        &self.registry
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }

    /// Mode seen by the last reconciliation, if any
    pub fn last_mode(&self) -> Option<ThemeMode> {
        self.last_mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Make `id` the active theme
    ///
    /// Unknown ids are ignored. Returns `true` if the active theme changed.
    pub fn switch_theme(&mut self, id: &str) -> bool {
        if !self.registry.contains(id) {
            debug!("switch_theme: unknown theme '{}' ignored", id);
            return false;
        }
        if self.current_theme == id {
            return false;
        }

        info!("Theme switched: '{}' -> '{}'", self.current_theme, id);
        self.current_theme = id.to_string();
        self.persist_theme();
        true
    }

    /// Make `id` the active font
    ///
    /// Ids outside the font set are ignored. Returns `true` if the font changed.
    pub fn switch_font(&mut self, id: &str) -> bool {
        let font = match id.parse::<FontId>() {
            Ok(font) => font,
            Err(e) => {
                debug!("switch_font: {} ignored", e);
                return false;
            }
        };
        if font == self.current_font {
            return false;
        }

        info!("Font switched: '{}' -> '{}'", self.current_font, font);
        self.current_font = font;
        self.persist_font();
        true
    }

    /// Reconcile the active theme with an externally driven mode
    ///
    /// Picks the theme last chosen in `mode` if it still exists and carries the
    /// `mode` tag, otherwise the default for `mode`. Seeing the same mode twice
    /// in a row does nothing. Returns `true` if the active theme changed.
    pub fn observe_mode(&mut self, mode: ThemeMode) -> bool {
        if self.last_mode == Some(mode) {
            return false;
        }
        self.last_mode = Some(mode);

        let fallback = self.defaults.theme_for(mode).to_string();
        let candidate = self
            .store
            .get(mode_key(mode))
            .filter(|id| self.registry.contains(id))
            .unwrap_or_else(|| fallback.clone());

        let target = if self.registry.has_mode(&candidate, mode) {
            candidate
        } else {
            debug!(
                "Theme '{}' is not a {} theme, using '{}'",
                candidate, mode, fallback
            );
            fallback
        };

        if !self.registry.contains(&target) {
            warn!("Default {} theme '{}' is not in the catalog", mode, target);
            return false;
        }
        if target == self.current_theme {
            return false;
        }

        info!(
            "Mode changed to {}: theme '{}' -> '{}'",
            mode, self.current_theme, target
        );
        self.current_theme = target;
        self.persist_theme();
        true
    }

    fn persist_theme(&mut self) {
        let mode = self
            .registry
            .get(&self.current_theme)
            .map(|theme| theme.mode)
            .unwrap_or_default();
        self.store.set(THEME_KEY, &self.current_theme);
        self.store.set(mode_key(mode), &self.current_theme);
    }

    fn persist_font(&mut self) {
        self.store.set(FONT_KEY, self.current_font.id());
    }
}

// =============================================================================
// Mode signal
// =============================================================================

/// Externally driven light/dark mode with change notification
///
/// Every [`set`](ModeSignal::set) notifies all live subscribers, even when the
/// value did not change.
#[derive(Debug, Default)]
pub struct ModeSignal {
    current: ThemeMode,
    subscribers: Vec<Sender<ThemeMode>>,
}

impl ModeSignal {
    pub fn new(initial: ThemeMode) -> Self {
        Self {
            current: initial,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> ThemeMode {
        self.current
    }

    /// Register for future notifications
    pub fn subscribe(&mut self) -> Receiver<ThemeMode> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Change the mode and notify subscribers; dropped receivers are pruned
    pub fn set(&mut self, mode: ThemeMode) {
        self.current = mode;
        self.subscribers.retain(|tx| tx.send(mode).is_ok());
        debug!(
            "Mode signal set to {} ({} subscribers)",
            mode,
            self.subscribers.len()
        );
    }

    pub fn toggle(&mut self) {
        self.set(self.current.toggle());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;

    fn session_with(values: &[(&str, &str)]) -> ThemeSessionState<MemoryStore> {
        ThemeSessionState::load(
            Arc::new(ThemeRegistry::builtin()),
            MemoryStore::with_values(values.iter().copied()),
            SessionDefaults::default(),
        )
    }

    #[test]
    fn test_load_defaults_and_initial_persist() {
        let session = session_with(&[]);
        assert_eq!(session.current_theme(), "maritime");
        assert_eq!(session.current_font(), FontId::Inter);
        assert_eq!(session.last_mode(), None);

        let store = session.store();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("maritime"));
        assert_eq!(store.get(LIGHT_THEME_KEY).as_deref(), Some("maritime"));
        assert_eq!(store.get(DARK_THEME_KEY), None);
        assert_eq!(store.get(FONT_KEY).as_deref(), Some("inter"));
    }

    #[test]
    fn test_load_restores_persisted_values() {
        let session = session_with(&[(THEME_KEY, "midnight"), (FONT_KEY, "fira")]);
        assert_eq!(session.current_theme(), "midnight");
        assert_eq!(session.current_font(), FontId::Fira);
        assert_eq!(
            session.store().get(DARK_THEME_KEY).as_deref(),
            Some("midnight")
        );
    }

    #[test]
    fn test_load_skips_stale_values() {
        let session = session_with(&[
            (THEME_KEY, "removed-theme"),
            (LIGHT_THEME_KEY, "forest"),
            (FONT_KEY, "comic-sans"),
        ]);
        assert_eq!(session.current_theme(), "forest");
        assert_eq!(session.current_font(), FontId::Inter);
    }

    #[test]
    fn test_switch_unknown_theme_is_noop() {
        let mut session = session_with(&[]);
        let writes = session.store().writes();

        assert!(!session.switch_theme("nonexistent-id"));
        assert_eq!(session.current_theme(), "maritime");
        assert_eq!(session.store().writes(), writes);
    }

    #[test]
    fn test_switch_theme_persists_per_mode_key() {
        let mut session = session_with(&[]);

        assert!(session.switch_theme("ember"));
        assert_eq!(session.current_theme(), "ember");
        let store = session.store();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("ember"));
        assert_eq!(store.get(DARK_THEME_KEY).as_deref(), Some("ember"));
        assert_eq!(store.get(LIGHT_THEME_KEY).as_deref(), Some("maritime"));

        // same id again changes nothing
        assert!(!session.switch_theme("ember"));
    }

    #[test]
    fn test_switch_font() {
        let mut session = session_with(&[]);
        assert!(session.switch_font("jetbrains"));
        assert_eq!(session.current_font(), FontId::Jetbrains);
        assert_eq!(session.store().get(FONT_KEY).as_deref(), Some("jetbrains"));

        let writes = session.store().writes();
        assert!(!session.switch_font("wingdings"));
        assert_eq!(session.current_font(), FontId::Jetbrains);
        assert_eq!(session.store().writes(), writes);
        assert_eq!(session.store().get(FONT_KEY).as_deref(), Some("jetbrains"));
    }

    #[test]
    fn test_observe_mode_uses_defaults() {
        let mut session = session_with(&[]);
        assert!(!session.observe_mode(ThemeMode::Light));
        assert!(session.observe_mode(ThemeMode::Dark));
        assert_eq!(session.current_theme(), "dark");
        assert_eq!(session.last_mode(), Some(ThemeMode::Dark));
    }

    #[test]
    fn test_observe_mode_is_idempotent() {
        let mut session = session_with(&[(DARK_THEME_KEY, "midnight")]);
        assert!(session.observe_mode(ThemeMode::Dark));
        assert_eq!(session.current_theme(), "midnight");

        // an explicit switch within the same mode survives a repeated signal
        session.switch_theme("ember");
        let writes = session.store().writes();
        assert!(!session.observe_mode(ThemeMode::Dark));
        assert_eq!(session.current_theme(), "ember");
        assert_eq!(session.store().writes(), writes);
    }

    #[test]
    fn test_observe_mode_rejects_wrong_tag() {
        // a light theme stored under the dark key falls back to the dark default
        let mut session = session_with(&[(DARK_THEME_KEY, "sunset")]);
        assert!(session.observe_mode(ThemeMode::Dark));
        assert_eq!(session.current_theme(), "dark");
    }

    #[test]
    fn test_observe_mode_ignores_unknown_stored_theme() {
        let mut session = session_with(&[(LIGHT_THEME_KEY, "gone"), (THEME_KEY, "ember")]);
        assert!(session.observe_mode(ThemeMode::Light));
        assert_eq!(session.current_theme(), "maritime");
    }

    #[test]
    fn test_dark_light_dark_restores_theme() {
        let mut session = session_with(&[
            (THEME_KEY, "ember"),
            (LIGHT_THEME_KEY, "forest"),
            (DARK_THEME_KEY, "ember"),
        ]);
        session.observe_mode(ThemeMode::Dark);
        let before = session.current_theme().to_string();

        session.observe_mode(ThemeMode::Light);
        assert_eq!(session.current_theme(), "forest");
        session.observe_mode(ThemeMode::Dark);
        assert_eq!(session.current_theme(), before);
    }

    #[test]
    fn test_mode_signal_notifies_every_set() {
        let mut signal = ModeSignal::new(ThemeMode::Light);
        let first = signal.subscribe();
        let second = signal.subscribe();

        signal.set(ThemeMode::Dark);
        signal.set(ThemeMode::Dark);

        assert_eq!(first.try_iter().collect::<Vec<_>>(), vec![ThemeMode::Dark; 2]);
        assert_eq!(second.try_iter().count(), 2);
        assert_eq!(signal.get(), ThemeMode::Dark);
    }

    #[test]
    fn test_mode_signal_prunes_dropped_receivers() {
        let mut signal = ModeSignal::default();
        let kept = signal.subscribe();
        drop(signal.subscribe());

        signal.toggle();
        assert_eq!(signal.subscriber_count(), 1);
        assert_eq!(kept.try_recv().ok(), Some(ThemeMode::Dark));
    }
}
