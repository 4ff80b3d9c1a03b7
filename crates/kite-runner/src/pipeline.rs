use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use kite_core::analysis::{
    recommend, AggregateMetrics, ApiMetrics, AssetReport, PerformanceGrade, RecommendationInput,
    ResourceMetrics, SecurityAudit, Waterfall,
};
use kite_core::model::{ApiCall, TestConfig, TestSession, TestStatus};
use kite_synth::{outcome, ScenarioGenerator};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::registry::SessionRegistry;
use crate::Result;

/// Default delay between pipeline steps, mimicking real capture cadence.
const DEFAULT_PACING: Duration = Duration::from_millis(400);

/// Drives test sessions through the generation pipeline.
///
/// One spawned task per session; no two tasks ever share a session id, so
/// there is no cross-session coordination. Cancellation is not supported:
/// a started pipeline runs to completion or failure.
pub struct TestRunner {
    registry: Arc<SessionRegistry>,
    pacing: Duration,
}

impl TestRunner {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            pacing: DEFAULT_PACING,
        }
    }

    /// Override the inter-step delay. Tests run with `Duration::ZERO`.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Validate the configuration, register a running session, and spawn
    /// its pipeline. Returns the session id immediately.
    pub async fn start(&self, config: TestConfig, seed: Option<u64>) -> Result<String> {
        config.validate()?;

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let id = generate_session_id(&mut rng);
        tracing::info!("Starting session {} for {}", id, config.target_url);

        self.registry.insert(TestSession::new(id.clone(), config.clone()));

        let registry = Arc::clone(&self.registry);
        let pacing = self.pacing;
        let task_id = id.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = drive(&registry, &task_id, &config, &mut rng, pacing).await;
            let duration_ms = started.elapsed().as_millis() as u64;
            let next = match outcome {
                Ok(()) => TestStatus::Completed,
                Err(err) => {
                    tracing::warn!("Session {} failed: {}", task_id, err);
                    TestStatus::Failed
                }
            };
            if let Err(err) = registry.transition(&task_id, next, duration_ms) {
                tracing::error!("Session {} could not be finalized: {}", task_id, err);
            }
        });

        Ok(id)
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }
}

fn generate_session_id(rng: &mut StdRng) -> String {
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("test_{}_{}", Utc::now().timestamp_millis(), suffix.to_lowercase())
}

/// The delay-then-compute step sequence. Each step fully owns the session
/// record for its synchronous computation, then yields.
async fn drive(
    registry: &SessionRegistry,
    id: &str,
    config: &TestConfig,
    rng: &mut StdRng,
    pacing: Duration,
) -> Result<()> {
    // Credential injection.
    registry.update(id, |s| {
        s.phase = Some("Injecting credentials".to_string());
        s.authentication = Some(outcome::synthesize_auth(config, rng));
    })?;
    pace(pacing).await;

    // Page navigation and paint marks.
    registry.update(id, |s| {
        s.phase = Some("Measuring core web vitals".to_string());
        s.vitals = Some(outcome::synthesize_vitals(rng));
    })?;
    pace(pacing).await;

    // Provider script execution and gated-content visibility.
    registry.update(id, |s| {
        s.phase = Some("Waiting for auth provider".to_string());
        if let Some(auth) = s.authentication.as_ref() {
            s.load_timeline = Some(outcome::synthesize_timeline(auth, rng));
        }
    })?;
    pace(pacing).await;

    // Network capture: the waterfall and its API-call subset.
    let entries = ScenarioGenerator::new(&mut *rng).generate(config)?;
    registry.update(id, |s| {
        s.phase = Some("Capturing network activity".to_string());
        let injected = s
            .authentication
            .as_ref()
            .is_some_and(|a| a.injection_success);
        s.api_calls = ApiCall::extract(&entries, injected);
        s.waterfall = Some(Waterfall::from_entries(&entries));
        s.entries = entries;
    })?;
    pace(pacing).await;

    // Wholesale aggregation.
    registry.update(id, |s| {
        s.phase = Some("Aggregating metrics".to_string());
        s.metrics = Some(AggregateMetrics {
            resources: ResourceMetrics::from_entries(&s.entries),
            api: ApiMetrics::from_calls(&s.api_calls),
            assets: AssetReport::from_entries(&s.entries),
            audit: SecurityAudit::of(
                &s.entries,
                &s.api_calls,
                &s.config.target_url,
                s.authentication.as_ref(),
            ),
        });
    })?;
    pace(pacing).await;

    // Grades and recommendations.
    registry.update(id, |s| {
        s.phase = Some("Grading results".to_string());
        if let Some(metrics) = s.metrics.as_ref() {
            s.grade = Some(PerformanceGrade::from_metrics(&metrics.api));
            s.recommendations = recommend(&RecommendationInput {
                api: &metrics.api,
                calls: &s.api_calls,
                waterfall: s.waterfall.as_ref(),
                vitals: s.vitals.as_ref(),
                auth: s.authentication.as_ref(),
                assets: &metrics.assets,
                thresholds: &s.config.thresholds,
            });
        }
    })?;

    Ok(())
}

async fn pace(pacing: Duration) {
    if !pacing.is_zero() {
        tokio::time::sleep(pacing).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kite_core::model::{AuthMethod, ResourceType};
    use kite_core::report::TestReport;

    async fn run_to_terminal(runner: &TestRunner, id: &str) -> TestSession {
        for _ in 0..200 {
            if let Some(session) = runner.registry().get(id)
                && session.status.is_terminal()
            {
                return session;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("session {id} never reached a terminal state");
    }

    #[tokio::test]
    async fn invalid_config_never_reaches_the_registry() {
        let runner = TestRunner::new(Arc::new(SessionRegistry::new()));
        let config = TestConfig::new("", AuthMethod::Cookie, "tok_0123456789");
        assert!(runner.start(config, Some(1)).await.is_err());
        assert!(runner.registry().is_empty());
    }

    #[tokio::test]
    async fn memberstack_session_runs_to_completion() {
        let runner =
            TestRunner::new(Arc::new(SessionRegistry::new())).with_pacing(Duration::ZERO);
        let config = TestConfig::new(
            "https://example.com",
            AuthMethod::Memberstack,
            "ms_abcdef1234567890",
        );
        let id = runner.start(config, Some(7)).await.unwrap();

        // Freshly started sessions are observable as running or already done.
        let snapshot = runner.registry().get(&id).unwrap();
        assert!(matches!(
            snapshot.status,
            TestStatus::Running | TestStatus::Completed
        ));

        let session = run_to_terminal(&runner, &id).await;
        assert_eq!(session.status, TestStatus::Completed);
        assert!(!session.entries.is_empty());
        assert_eq!(session.entries[0].resource_type, ResourceType::Document);

        let auth = session.authentication.as_ref().unwrap();
        assert!(auth.memberstack_detected);
        assert!(auth.injection_success);

        assert!(session.metrics.is_some());
        assert!(session.grade.is_some());
        assert!(session.waterfall.is_some());

        // Completed sessions export.
        assert!(TestReport::from_session(&session).is_ok());
    }

    #[tokio::test]
    async fn short_token_completes_unauthenticated() {
        let runner =
            TestRunner::new(Arc::new(SessionRegistry::new())).with_pacing(Duration::ZERO);
        let config = TestConfig::new("https://example.com", AuthMethod::Cookie, "short");
        let id = runner.start(config, Some(9)).await.unwrap();

        let session = run_to_terminal(&runner, &id).await;
        assert_eq!(session.status, TestStatus::Completed);
        let auth = session.authentication.as_ref().unwrap();
        assert!(!auth.injection_success);
        assert!(auth.redirects_handled > 0);
        // Extracted calls carry headers but the token was never injected.
        assert!(session.api_calls.iter().all(|c| !c.token_used));
    }

    #[tokio::test]
    async fn concurrent_sessions_do_not_interfere() {
        let runner =
            TestRunner::new(Arc::new(SessionRegistry::new())).with_pacing(Duration::ZERO);
        let a = runner
            .start(
                TestConfig::new("https://a.example.com", AuthMethod::Bearer, "tok_0123456789"),
                Some(11),
            )
            .await
            .unwrap();
        let b = runner
            .start(
                TestConfig::new("https://b.example.com", AuthMethod::Cookie, "tok_9876543210"),
                Some(13),
            )
            .await
            .unwrap();
        assert_ne!(a, b);

        let session_a = run_to_terminal(&runner, &a).await;
        let session_b = run_to_terminal(&runner, &b).await;
        assert_eq!(session_a.status, TestStatus::Completed);
        assert_eq!(session_b.status, TestStatus::Completed);
        assert!(session_a.entries[0].url.contains("a.example.com"));
        assert!(session_b.entries[0].url.contains("b.example.com"));
        assert_eq!(runner.registry().len(), 2);
    }

    #[tokio::test]
    async fn terminal_sessions_reject_late_writes() {
        let runner =
            TestRunner::new(Arc::new(SessionRegistry::new())).with_pacing(Duration::ZERO);
        let config = TestConfig::new("https://example.com", AuthMethod::Bearer, "tok_0123456789");
        let id = runner.start(config, Some(17)).await.unwrap();
        let _ = run_to_terminal(&runner, &id).await;

        let result = runner.registry().update(&id, |s| s.duration_ms = 0);
        assert!(result.is_err());
    }
}
