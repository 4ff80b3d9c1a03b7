use serde::{Deserialize, Serialize};

use super::metrics::ApiMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Fixed score bands, inclusive at each boundary.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

/// Letter grades per dimension plus the overall numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceGrade {
    pub overall: Grade,
    pub api: Grade,
    pub security: Grade,
    pub caching: Grade,
    pub score: f64,
}

impl PerformanceGrade {
    /// Component scores: api from average latency, security from failure
    /// rate, caching from the hit ratio; overall is their mean.
    pub fn from_metrics(api: &ApiMetrics) -> Self {
        let api_score = (100.0 - api.average_response_time / 10.0).max(0.0);
        let security_score = (1.0 - api.failure_rate) * 100.0;
        let caching_score = api.cache_hit_ratio;
        let overall_score = ((api_score + security_score + caching_score) / 3.0).round();

        tracing::debug!(
            "Grading: api={:.0}, security={:.0}, caching={:.0}, overall={:.0}",
            api_score,
            security_score,
            caching_score,
            overall_score
        );

        PerformanceGrade {
            overall: Grade::from_score(overall_score),
            api: Grade::from_score(api_score),
            security: Grade::from_score(security_score),
            caching: Grade::from_score(caching_score),
            score: overall_score,
        }
    }
}
