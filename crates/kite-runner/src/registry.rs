use std::collections::HashMap;
use std::sync::RwLock;

use kite_core::model::{TestSession, TestStatus};

use crate::{Error, Result};

/// In-memory store of every session started in this process.
///
/// The registry exclusively owns its sessions: readers get snapshot clones
/// and poll for progress, while mutation is crate-internal and reserved for
/// the pipeline that started the session. Sessions are never pruned.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, TestSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of a session, or `None` for an unknown identifier.
    pub fn get(&self, id: &str) -> Option<TestSession> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(id).cloned()
    }

    /// Snapshots of all sessions, newest first.
    pub fn list(&self) -> Vec<TestSession> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<TestSession> = sessions.values().cloned().collect();
        all.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        all
    }

    pub fn len(&self) -> usize {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&self, session: TestSession) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        tracing::debug!("Registering session {}", session.id);
        sessions.insert(session.id.clone(), session);
    }

    /// Apply a mutation to a running session. Terminal sessions reject
    /// further writes.
    pub(crate) fn update(
        &self,
        id: &str,
        apply: impl FnOnce(&mut TestSession),
    ) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        if session.status.is_terminal() {
            return Err(Error::TerminalSession(id.to_string()));
        }
        apply(session);
        Ok(())
    }

    /// Move a session into a terminal state, recording its duration.
    pub(crate) fn transition(&self, id: &str, next: TestStatus, duration_ms: u64) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        if !session.status.can_transition_to(next) {
            return Err(Error::TerminalSession(id.to_string()));
        }
        session.status = next;
        session.duration_ms = duration_ms;
        session.phase = None;
        tracing::info!("Session {} -> {:?} after {}ms", id, next, duration_ms);
        Ok(())
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kite_core::model::{AuthMethod, TestConfig};

    fn session(id: &str) -> TestSession {
        TestSession::new(
            id,
            TestConfig::new("https://example.com", AuthMethod::Cookie, "tok_0123456789"),
        )
    }

    #[test]
    fn unknown_id_returns_none() {
        let registry = SessionRegistry::new();
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn get_returns_a_snapshot() {
        let registry = SessionRegistry::new();
        registry.insert(session("test_1"));
        let mut snapshot = registry.get("test_1").unwrap();
        snapshot.duration_ms = 9_999;
        // Mutating the snapshot never touches the stored session.
        assert_eq!(registry.get("test_1").unwrap().duration_ms, 0);
    }

    #[test]
    fn terminal_sessions_reject_updates() {
        let registry = SessionRegistry::new();
        registry.insert(session("test_2"));
        registry
            .transition("test_2", TestStatus::Completed, 1_500)
            .unwrap();

        let result = registry.update("test_2", |s| s.duration_ms = 0);
        assert!(matches!(result, Err(Error::TerminalSession(_))));
        assert_eq!(registry.get("test_2").unwrap().duration_ms, 1_500);
    }

    #[test]
    fn transitions_never_leave_terminal_states() {
        let registry = SessionRegistry::new();
        registry.insert(session("test_3"));
        registry
            .transition("test_3", TestStatus::Failed, 800)
            .unwrap();

        let result = registry.transition("test_3", TestStatus::Completed, 900);
        assert!(result.is_err());
        assert_eq!(registry.get("test_3").unwrap().status, TestStatus::Failed);
    }

    #[test]
    fn list_orders_newest_first() {
        let registry = SessionRegistry::new();
        registry.insert(session("test_a"));
        registry.insert(session("test_b"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.list().len(), 2);
    }
}
