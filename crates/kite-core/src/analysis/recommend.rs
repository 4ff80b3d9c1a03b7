use serde::{Deserialize, Serialize};

use crate::model::{ApiCall, AuthReport, CoreWebVitals, EndpointClass, Thresholds};

use super::assets::AssetReport;
use super::metrics::ApiMetrics;
use super::waterfall::Waterfall;

const CACHE_RATIO_FLOOR: f64 = 60.0;
const BLOCKING_BUDGET_MS: f64 = 500.0;
const INTEGRATION_BUDGET_MS: f64 = 300.0;
const THIRD_PARTY_BUDGET_MS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Performance,
    Security,
    Authentication,
    Assets,
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: RecommendationPriority,
    pub title: String,
    pub description: String,
    pub remediation: String,
    pub impact: String,
}

/// Borrowed view of everything the rules inspect.
pub struct RecommendationInput<'a> {
    pub api: &'a ApiMetrics,
    pub calls: &'a [ApiCall],
    pub waterfall: Option<&'a Waterfall>,
    pub vitals: Option<&'a CoreWebVitals>,
    pub auth: Option<&'a AuthReport>,
    pub assets: &'a AssetReport,
    pub thresholds: &'a Thresholds,
}

/// Evaluate every rule independently. A triggered rule appends exactly one
/// recommendation; rules never suppress each other, so the evaluation order
/// below is display order only.
pub fn recommend(input: &RecommendationInput<'_>) -> Vec<Recommendation> {
    let rules: [Option<Recommendation>; 9] = [
        slow_api(input.api, input.thresholds),
        poor_caching(input.api),
        auth_failures(input.calls, input.auth),
        blocking_waterfall(input.waterfall),
        slow_integrations(input.calls),
        slow_ttfb(input.vitals, input.thresholds),
        slow_third_party(input.waterfall),
        gated_content_missing(input.auth),
        unoptimized_assets(input.assets),
    ];

    let recommendations: Vec<Recommendation> = rules.into_iter().flatten().collect();
    tracing::info!("{} recommendation(s) triggered", recommendations.len());
    recommendations
}

fn slow_api(api: &ApiMetrics, thresholds: &Thresholds) -> Option<Recommendation> {
    (api.total_calls > 0 && api.average_response_time > thresholds.api_response).then(|| {
        Recommendation {
            category: RecommendationCategory::Api,
            priority: RecommendationPriority::High,
            title: "Optimize API Response Times".to_string(),
            description: format!(
                "Average API response time is {:.0}ms, above the {:.0}ms budget",
                api.average_response_time, thresholds.api_response
            ),
            remediation: "Optimize backing queries, add response caching, consolidate chatty endpoints"
                .to_string(),
            impact: "Could improve overall page load time by 25-40%".to_string(),
        }
    })
}

fn poor_caching(api: &ApiMetrics) -> Option<Recommendation> {
    (api.total_calls > 0 && api.cache_hit_ratio < CACHE_RATIO_FLOOR).then(|| Recommendation {
        category: RecommendationCategory::Performance,
        priority: RecommendationPriority::Medium,
        title: "Improve Cache Strategy".to_string(),
        description: format!(
            "Cache hit ratio is only {:.0}%, indicating poor cache utilization",
            api.cache_hit_ratio
        ),
        remediation: "Set proper cache headers, serve static assets from a CDN, add application-level caching"
            .to_string(),
        impact: "Could reduce server load by 40-60% and improve response times".to_string(),
    })
}

fn auth_failures(calls: &[ApiCall], auth: Option<&AuthReport>) -> Option<Recommendation> {
    let denied = calls
        .iter()
        .filter(|c| c.status == 401 || c.status == 403)
        .count();
    let injection_failed = auth.is_some_and(|a| !a.injection_success);
    (denied > 0 || injection_failed).then(|| Recommendation {
        category: RecommendationCategory::Authentication,
        priority: RecommendationPriority::High,
        title: "Address Authentication Issues".to_string(),
        description: if denied > 0 {
            format!("{denied} API call(s) were rejected with 401/403")
        } else {
            "Credential injection failed; the session ran unauthenticated".to_string()
        },
        remediation: "Review the authentication flow, token freshness, and error handling".to_string(),
        impact: "Improved security posture and fewer broken user sessions".to_string(),
    })
}

fn blocking_waterfall(waterfall: Option<&Waterfall>) -> Option<Recommendation> {
    let waterfall = waterfall?;
    (waterfall.blocking_time > BLOCKING_BUDGET_MS).then(|| Recommendation {
        category: RecommendationCategory::Performance,
        priority: RecommendationPriority::Medium,
        title: "Reduce Blocking Requests".to_string(),
        description: format!(
            "{:.0}ms of render-blocking time in the request waterfall",
            waterfall.blocking_time
        ),
        remediation: "Load non-critical resources async and defer what the first paint does not need"
            .to_string(),
        impact: "Faster perceived load and better first-paint timing".to_string(),
    })
}

fn slow_integrations(calls: &[ApiCall]) -> Option<Recommendation> {
    let integration: Vec<&ApiCall> = calls
        .iter()
        .filter(|c| c.class() == EndpointClass::Integration)
        .collect();
    if integration.is_empty() {
        return None;
    }
    let avg = integration.iter().map(|c| c.duration).sum::<f64>() / integration.len() as f64;
    (avg > INTEGRATION_BUDGET_MS).then(|| Recommendation {
        category: RecommendationCategory::Api,
        priority: RecommendationPriority::Medium,
        title: "Optimize Integration API Calls".to_string(),
        description: format!("Third-party data endpoints average {avg:.0}ms"),
        remediation: "Batch record requests and cache frequently read data locally".to_string(),
        impact: "Faster data loading on integration-heavy views".to_string(),
    })
}

fn slow_ttfb(vitals: Option<&CoreWebVitals>, thresholds: &Thresholds) -> Option<Recommendation> {
    let vitals = vitals?;
    (vitals.ttfb > thresholds.ttfb).then(|| Recommendation {
        category: RecommendationCategory::Performance,
        priority: RecommendationPriority::High,
        title: "Optimize Server Response Time".to_string(),
        description: format!(
            "Time to first byte is {:.0}ms, above the {:.0}ms budget",
            vitals.ttfb, thresholds.ttfb
        ),
        remediation: "Put a CDN in front, tune slow queries, or scale the origin".to_string(),
        impact: "Could improve page load time by 20-30%".to_string(),
    })
}

fn slow_third_party(waterfall: Option<&Waterfall>) -> Option<Recommendation> {
    let waterfall = waterfall?;
    (waterfall.third_party_time > THIRD_PARTY_BUDGET_MS).then(|| Recommendation {
        category: RecommendationCategory::Authentication,
        priority: RecommendationPriority::Medium,
        title: "Optimize Auth Provider Loading".to_string(),
        description: format!(
            "Third-party authentication resources took {:.0}ms",
            waterfall.third_party_time
        ),
        remediation: "Load the provider script async or lazily after first paint".to_string(),
        impact: "Faster authentication and gated-content display".to_string(),
    })
}

fn gated_content_missing(auth: Option<&AuthReport>) -> Option<Recommendation> {
    let auth = auth?;
    (auth.memberstack_detected && !auth.gated_content_loaded).then(|| Recommendation {
        category: RecommendationCategory::Authentication,
        priority: RecommendationPriority::Critical,
        title: "Gated Content Not Loading".to_string(),
        description: "The auth provider was detected but gated content never became visible"
            .to_string(),
        remediation: "Check provider configuration and that the token is injected before page scripts run"
            .to_string(),
        impact: "Members regain access to protected content".to_string(),
    })
}

fn unoptimized_assets(assets: &AssetReport) -> Option<Recommendation> {
    (!assets.unoptimized.is_empty()).then(|| Recommendation {
        category: RecommendationCategory::Assets,
        priority: RecommendationPriority::Medium,
        title: "Large Unoptimized Assets Detected".to_string(),
        description: format!("{} large asset(s) found", assets.unoptimized.len()),
        remediation: "Compress images, minify bundles, lazy-load below-the-fold media".to_string(),
        impact: "Smaller page weight and less bandwidth per visit".to_string(),
    })
}
