use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::analysis::{AggregateMetrics, PerformanceGrade, Recommendation};
use crate::model::{TestConfig, TestSession, TestStatus};
use crate::{Error, Result};

/// Fixed export subset of a completed session. The auth token is masked
/// before it ever reaches the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub config: TestConfig,
    pub metrics: AggregateMetrics,
    pub grade: PerformanceGrade,
    pub recommendations: Vec<Recommendation>,
}

impl TestReport {
    /// Build the export view of a completed session.
    pub fn from_session(session: &TestSession) -> Result<Self> {
        if session.status != TestStatus::Completed {
            return Err(Error::SessionNotCompleted(session.id.clone()));
        }
        let metrics = session
            .metrics
            .clone()
            .ok_or_else(|| Error::SessionNotCompleted(session.id.clone()))?;
        let grade = session
            .grade
            .ok_or_else(|| Error::SessionNotCompleted(session.id.clone()))?;

        let mut config = session.config.clone();
        config.auth_token = mask_token(&config.auth_token);

        Ok(TestReport {
            id: session.id.clone(),
            started_at: session.started_at,
            duration_ms: session.duration_ms,
            config,
            metrics,
            grade,
            recommendations: session.recommendations.clone(),
        })
    }
}

/// Keep only the last four characters of a secret.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        "***".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("***{tail}")
    }
}

pub struct ReportWriter;

impl ReportWriter {
    /// Write a report to a file as pretty-printed JSON.
    pub fn to_file(report: &TestReport, path: &Path) -> Result<()> {
        tracing::debug!("Writing report to: {}", path.display());

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, report)?;

        tracing::info!("Successfully wrote report {} to {}", report.id, path.display());

        Ok(())
    }

    /// Convert a report to a JSON string.
    pub fn to_string(report: &TestReport) -> Result<String> {
        let json = serde_json::to_string_pretty(report)?;
        Ok(json)
    }

    /// Convert a report to a compact JSON string.
    pub fn to_string_compact(report: &TestReport) -> Result<String> {
        let json = serde_json::to_string(report)?;
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ApiMetrics, AssetReport, Grade, ResourceMetrics, SecurityAudit};
    use crate::model::AuthMethod;

    fn completed_session() -> TestSession {
        let config = TestConfig::new(
            "https://example.com",
            AuthMethod::Memberstack,
            "ms_abcdef1234567890",
        );
        let mut session = TestSession::new("test_1_abc", config);
        session.status = TestStatus::Completed;
        session.metrics = Some(AggregateMetrics {
            resources: ResourceMetrics::from_entries(&[]),
            api: ApiMetrics::from_calls(&[]),
            assets: AssetReport::from_entries(&[]),
            audit: SecurityAudit::of(&[], &[], "https://example.com", None),
        });
        session.grade = Some(PerformanceGrade {
            overall: Grade::B,
            api: Grade::A,
            security: Grade::A,
            caching: Grade::D,
            score: 80.0,
        });
        session
    }

    #[test]
    fn running_session_cannot_be_exported() {
        let config = TestConfig::new("https://example.com", AuthMethod::Cookie, "abcdef123456");
        let session = TestSession::new("test_2_def", config);
        assert!(TestReport::from_session(&session).is_err());
    }

    #[test]
    fn token_is_masked_in_the_report() {
        let report = TestReport::from_session(&completed_session()).unwrap();
        assert_eq!(report.config.auth_token, "***7890");
    }

    #[test]
    fn structured_form_is_reproducible() {
        let session = completed_session();
        let a = ReportWriter::to_string(&TestReport::from_session(&session).unwrap()).unwrap();
        let b = ReportWriter::to_string(&TestReport::from_session(&session).unwrap()).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("\"id\": \"test_1_abc\""));
    }
}
