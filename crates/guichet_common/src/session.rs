//! Per-user conversation sessions.
//!
//! A session exists only between a clarifying prompt and its resolution:
//! absence from the registry is equivalent to [`Stage::Idle`]. Sessions are
//! process-lifetime only; a daemon restart resets every user to Idle.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Where one user currently is in the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    AwaitingLocation,
    AwaitingBillDetail,
    AwaitingEmergencyLocation,
}

#[derive(Debug, Clone)]
struct Session {
    stage: Stage,
    slots: HashMap<String, String>,
    touched_at: Instant,
}

/// In-memory registry of active sessions, keyed by user id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage for a user; `Idle` when no session exists.
    pub fn stage(&self, user_id: &str) -> Stage {
        self.sessions
            .get(user_id)
            .map(|s| s.stage)
            .unwrap_or(Stage::Idle)
    }

    /// Replace the user's session wholesale. Prior slots are overwritten,
    /// not merged.
    pub fn set_stage(&mut self, user_id: &str, stage: Stage, slots: HashMap<String, String>) {
        self.sessions.insert(
            user_id.to_string(),
            Session {
                stage,
                slots,
                touched_at: Instant::now(),
            },
        );
    }

    /// Drop the user's session. No-op when absent.
    pub fn clear(&mut self, user_id: &str) {
        self.sessions.remove(user_id);
    }

    /// One collected slot value, if the session and the slot both exist.
    pub fn slot(&self, user_id: &str, key: &str) -> Option<&str> {
        self.sessions
            .get(user_id)
            .and_then(|s| s.slots.get(key))
            .map(String::as_str)
    }

    /// The whole slot mapping for a user, if a session exists.
    pub fn slots(&self, user_id: &str) -> Option<&HashMap<String, String>> {
        self.sessions.get(user_id).map(|s| &s.slots)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Remove sessions idle longer than `ttl`; returns how many were
    /// dropped. Expired users silently fall back to Idle.
    pub fn sweep_expired(&mut self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.touched_at.elapsed() <= ttl);
        before - self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_user_is_idle() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.stage("nobody"), Stage::Idle);
        assert!(registry.slots("nobody").is_none());
    }

    #[test]
    fn set_stage_replaces_slots() {
        let mut registry = SessionRegistry::new();
        let mut slots = HashMap::new();
        slots.insert("quartier".to_string(), "Kaloum".to_string());
        registry.set_stage("u1", Stage::AwaitingLocation, slots);
        assert_eq!(registry.stage("u1"), Stage::AwaitingLocation);
        assert_eq!(registry.slot("u1", "quartier"), Some("Kaloum"));

        // A second set_stage overwrites, never merges.
        registry.set_stage("u1", Stage::AwaitingBillDetail, HashMap::new());
        assert_eq!(registry.stage("u1"), Stage::AwaitingBillDetail);
        assert_eq!(registry.slot("u1", "quartier"), None);
    }

    #[test]
    fn clear_is_noop_when_absent() {
        let mut registry = SessionRegistry::new();
        registry.clear("ghost");
        registry.set_stage("u1", Stage::AwaitingLocation, HashMap::new());
        registry.clear("u1");
        assert_eq!(registry.stage("u1"), Stage::Idle);
        assert!(registry.is_empty());
    }

    #[test]
    fn sweep_removes_only_expired_sessions() {
        let mut registry = SessionRegistry::new();
        registry.set_stage("u1", Stage::AwaitingLocation, HashMap::new());
        registry.set_stage("u2", Stage::AwaitingBillDetail, HashMap::new());

        // Generous TTL keeps everything.
        assert_eq!(registry.sweep_expired(Duration::from_secs(3600)), 0);
        assert_eq!(registry.len(), 2);

        // Zero TTL expires everything that is not brand new on this exact
        // instant; both sessions were touched before the sweep ran.
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(registry.sweep_expired(Duration::ZERO), 2);
        assert_eq!(registry.stage("u1"), Stage::Idle);
    }
}
