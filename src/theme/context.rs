//! Theme context - the read/write surface handed to consuming views
//!
//! Ties a [`ThemeSessionState`] to a [`StyleTarget`]: every change of the
//! active theme, whether explicit or driven by a mode notification, is
//! projected onto the target.

use crate::core::error::Result;
use crate::core::store::KeyValueStore;
use crate::theme::fonts::FontId;
use crate::theme::projector::{ResolvedTheme, StyleTarget, ThemeCssProjector};
use crate::theme::registry::{ThemeDefinition, ThemeMode, ThemeRegistry};
use crate::theme::session::{ModeSignal, ThemeSessionState};
use log::{debug, error};
use std::sync::mpsc::Receiver;

pub struct ThemeContext<S: KeyValueStore, T: StyleTarget> {
    session: ThemeSessionState<S>,
    projector: ThemeCssProjector,
    target: T,
    modes: Option<Receiver<ThemeMode>>,
    resolved: Option<ResolvedTheme>,
}

impl<S: KeyValueStore, T: StyleTarget> ThemeContext<S, T> {
    pub fn new(session: ThemeSessionState<S>, target: T) -> Self {
        Self {
            session,
            projector: ThemeCssProjector::new(),
            target,
            modes: None,
            resolved: None,
        }
    }

    /// Follow an external mode signal; notifications are handled by
    /// [`pump_mode_events`](Self::pump_mode_events)
    pub fn observe(&mut self, signal: &mut ModeSignal) {
        self.modes = Some(signal.subscribe());
    }

    /// Reconcile with the mode in effect at startup and publish the first projection
    pub fn mount(&mut self, mode: ThemeMode) -> Result<()> {
        self.session.observe_mode(mode);
        self.reproject()
    }

    /// Drain pending mode notifications
    ///
    /// Returns `true` if the active theme changed and was re-projected.
    pub fn pump_mode_events(&mut self) -> Result<bool> {
        let pending: Vec<ThemeMode> = match &self.modes {
            Some(rx) => rx.try_iter().collect(),
            None => return Ok(false),
        };
        if pending.is_empty() {
            return Ok(false);
        }
        debug!("Handling {} mode notification(s)", pending.len());

        let mut changed = false;
        for mode in pending {
            changed |= self.session.observe_mode(mode);
        }
        if changed {
            self.reproject()?;
        }
        Ok(changed)
    }

    pub fn current_theme(&self) -> &str {
        self.session.current_theme()
    }

    /// Switch the active theme and re-project; unknown ids are ignored
    pub fn switch_theme(&mut self, id: &str) -> Result<bool> {
        if !self.session.switch_theme(id) {
            return Ok(false);
        }
        self.reproject()?;
        Ok(true)
    }

    pub fn current_font(&self) -> FontId {
        self.session.current_font()
    }

    pub fn switch_font(&mut self, id: &str) -> bool {
        self.session.switch_font(id)
    }

    /// The active theme definition
    pub fn theme(&self) -> Option<&ThemeDefinition> {
        self.session.theme()
    }

    pub fn themes(&self) -> &ThemeRegistry {
        self.session.registry()
    }

    /// Colors published by the last successful projection
    pub fn resolved(&self) -> Option<&ResolvedTheme> {
        self.resolved.as_ref()
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn session(&self) -> &ThemeSessionState<S> {
        &self.session
    }

    pub fn into_parts(self) -> (ThemeSessionState<S>, T) {
        (self.session, self.target)
    }

    /// Project the active theme; on failure the previous variables stay
    fn reproject(&mut self) -> Result<()> {
        let Some(theme) = self.session.theme() else {
            error!("No theme to project: the catalog is empty");
            return Ok(());
        };

        match self.projector.project(theme, &mut self.target) {
            Ok(resolved) => {
                self.resolved = Some(resolved);
                Ok(())
            }
            Err(e) => {
                error!("Projection failed, keeping previous colors: {}", e);
                Err(e)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
