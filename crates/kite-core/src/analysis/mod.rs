mod assets;
mod audit;
mod grade;
mod metrics;
mod recommend;
mod waterfall;

pub use assets::{AssetReport, AssetSummary, CacheableAsset, UnoptimizedAsset};
pub use audit::{HeaderFinding, OpenEndpoint, SecurityAudit, Severity, TlsNote, TokenExposure};
pub use grade::{Grade, PerformanceGrade};
pub use metrics::{ApiMetrics, ResourceMetrics};
pub use recommend::{
    recommend, Recommendation, RecommendationCategory, RecommendationInput, RecommendationPriority,
};
pub use waterfall::Waterfall;

use serde::{Deserialize, Serialize};

/// Everything derived from a completed session's entry/call collections.
///
/// Recomputed wholesale when the pipeline finishes; never mutated piecemeal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub resources: ResourceMetrics,
    pub api: ApiMetrics,
    pub assets: AssetReport,
    pub audit: SecurityAudit,
}
