use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{AggregateMetrics, PerformanceGrade, Recommendation, Waterfall};

use super::api::ApiCall;
use super::config::{AuthMethod, TestConfig, TokenLocation};
use super::entry::NetworkEntry;

/// Session lifecycle. Transitions only move forward; terminal states are
/// immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Running,
    Completed,
    Failed,
}

impl TestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TestStatus::Completed | TestStatus::Failed)
    }

    pub fn can_transition_to(&self, next: TestStatus) -> bool {
        matches!(
            (self, next),
            (TestStatus::Running, TestStatus::Completed) | (TestStatus::Running, TestStatus::Failed)
        )
    }
}

/// Outcome of simulated credential injection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthReport {
    pub method: AuthMethod,
    pub token_location: TokenLocation,
    pub token_name: String,
    pub injection_success: bool,
    pub memberstack_detected: bool,
    pub gated_content_loaded: bool,
    pub redirects_handled: u32,
}

/// Standard web-vitals marks, treated as opaque numbers with
/// threshold-based grading only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreWebVitals {
    pub fcp: f64,
    pub lcp: f64,
    pub fid: f64,
    pub cls: f64,
    pub ttfb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTimeline {
    pub dom_content_loaded: f64,
    pub load_complete: f64,
    pub first_paint: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_party_ready: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gated_content_visible: Option<f64>,
}

/// Root aggregate for one test run. Owned by the session registry; the
/// generation pipeline is its single writer, readers get snapshot clones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSession {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub config: TestConfig,
    pub status: TestStatus,
    /// Coarse progress hint for pollers; display only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitals: Option<CoreWebVitals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_timeline: Option<LoadTimeline>,
    pub entries: Vec<NetworkEntry>,
    pub api_calls: Vec<ApiCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waterfall: Option<Waterfall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<AggregateMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<PerformanceGrade>,
    pub recommendations: Vec<Recommendation>,
}

impl TestSession {
    /// Fresh running session with no derived data yet.
    pub fn new(id: impl Into<String>, config: TestConfig) -> Self {
        TestSession {
            id: id.into(),
            started_at: Utc::now(),
            config,
            status: TestStatus::Running,
            phase: None,
            duration_ms: 0,
            authentication: None,
            vitals: None,
            load_timeline: None,
            entries: Vec::new(),
            api_calls: Vec::new(),
            waterfall: None,
            metrics: None,
            grade: None,
            recommendations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only_move_forward() {
        assert!(TestStatus::Running.can_transition_to(TestStatus::Completed));
        assert!(TestStatus::Running.can_transition_to(TestStatus::Failed));
        assert!(!TestStatus::Completed.can_transition_to(TestStatus::Running));
        assert!(!TestStatus::Completed.can_transition_to(TestStatus::Failed));
        assert!(!TestStatus::Failed.can_transition_to(TestStatus::Completed));
    }

    #[test]
    fn terminal_states() {
        assert!(!TestStatus::Running.is_terminal());
        assert!(TestStatus::Completed.is_terminal());
        assert!(TestStatus::Failed.is_terminal());
    }
}
