use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::model::{ApiCall, CacheOutcome, HttpMethod, NetworkEntry};

/// Summary statistics over the full resource sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetrics {
    pub total_requests: usize,
    pub total_bytes: u64,
    pub cached_requests: usize,
    pub failed_requests: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slowest: Option<NetworkEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest: Option<NetworkEntry>,
}

impl ResourceMetrics {
    pub fn from_entries(entries: &[NetworkEntry]) -> Self {
        tracing::debug!("Aggregating resource metrics over {} entries", entries.len());

        let total_bytes = entries.iter().map(|e| e.response_size).sum();
        let slowest = entries
            .iter()
            .max_by(|a, b| a.duration.total_cmp(&b.duration))
            .cloned();
        let largest = entries.iter().max_by_key(|e| e.response_size).cloned();

        ResourceMetrics {
            total_requests: entries.len(),
            total_bytes,
            cached_requests: entries.iter().filter(|e| e.cache == CacheOutcome::Hit).count(),
            failed_requests: entries.iter().filter(|e| e.failed).count(),
            slowest,
            largest,
        }
    }
}

/// Summary statistics over the API-call subset.
///
/// Every field has a defined zero value for the empty collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetrics {
    pub total_calls: usize,
    pub unique_endpoints: usize,
    pub method_distribution: BTreeMap<HttpMethod, usize>,
    pub average_response_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slowest: Option<ApiCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastest: Option<ApiCall>,
    pub failed_calls: usize,
    pub authenticated_calls: usize,
    /// Fraction in [0, 1].
    pub failure_rate: f64,
    /// Percentage in [0, 100].
    pub cache_hit_ratio: f64,
    pub total_data_transferred: u64,
}

impl ApiMetrics {
    pub fn from_calls(calls: &[ApiCall]) -> Self {
        tracing::debug!("Aggregating API metrics over {} calls", calls.len());

        if calls.is_empty() {
            return ApiMetrics {
                total_calls: 0,
                unique_endpoints: 0,
                method_distribution: BTreeMap::new(),
                average_response_time: 0.0,
                slowest: None,
                fastest: None,
                failed_calls: 0,
                authenticated_calls: 0,
                failure_rate: 0.0,
                cache_hit_ratio: 0.0,
                total_data_transferred: 0,
            };
        }

        let total = calls.len();
        let mut method_distribution: BTreeMap<HttpMethod, usize> = BTreeMap::new();
        for call in calls {
            *method_distribution.entry(call.method).or_insert(0) += 1;
        }

        let unique_endpoints = calls
            .iter()
            .map(|c| c.endpoint.as_str())
            .collect::<HashSet<_>>()
            .len();

        let average_response_time =
            calls.iter().map(|c| c.duration).sum::<f64>() / total as f64;
        let slowest = calls
            .iter()
            .max_by(|a, b| a.duration.total_cmp(&b.duration))
            .cloned();
        let fastest = calls
            .iter()
            .min_by(|a, b| a.duration.total_cmp(&b.duration))
            .cloned();

        let failed_calls = calls.iter().filter(|c| c.failed).count();
        let cache_hits = calls.iter().filter(|c| c.cache == CacheOutcome::Hit).count();

        let metrics = ApiMetrics {
            total_calls: total,
            unique_endpoints,
            method_distribution,
            average_response_time,
            slowest,
            fastest,
            failed_calls,
            authenticated_calls: calls.iter().filter(|c| c.authenticated).count(),
            failure_rate: failed_calls as f64 / total as f64,
            cache_hit_ratio: cache_hits as f64 / total as f64 * 100.0,
            total_data_transferred: calls.iter().map(|c| c.request_size + c.response_size).sum(),
        };

        tracing::info!(
            "API metrics: {} calls, avg={:.1}ms, failure rate={:.0}%",
            metrics.total_calls,
            metrics.average_response_time,
            metrics.failure_rate * 100.0
        );

        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhaseTimings;

    fn call(endpoint: &str, method: HttpMethod, duration: f64, status: u16, cache: CacheOutcome) -> ApiCall {
        ApiCall {
            id: format!("api_{endpoint}_{duration}"),
            url: format!("https://example.com{endpoint}"),
            endpoint: endpoint.to_string(),
            method,
            start_time: 0.0,
            end_time: duration,
            duration,
            status,
            request_size: 200,
            response_size: 1_000,
            cache,
            failed: status >= 400,
            timings: PhaseTimings {
                dns: 0.0,
                connect: 0.0,
                ssl: 0.0,
                send: 0.0,
                wait: duration,
                receive: 0.0,
            },
            authenticated: true,
            token_used: true,
            error_message: None,
        }
    }

    #[test]
    fn empty_collection_yields_zero_defaults() {
        let metrics = ApiMetrics::from_calls(&[]);
        assert_eq!(metrics.total_calls, 0);
        assert_eq!(metrics.average_response_time, 0.0);
        assert_eq!(metrics.failure_rate, 0.0);
        assert_eq!(metrics.cache_hit_ratio, 0.0);
        assert!(metrics.slowest.is_none());
        assert!(metrics.fastest.is_none());
        assert!(metrics.method_distribution.is_empty());

        let resources = ResourceMetrics::from_entries(&[]);
        assert_eq!(resources.total_requests, 0);
        assert_eq!(resources.total_bytes, 0);
        assert!(resources.slowest.is_none());
        assert!(resources.largest.is_none());
    }

    #[test]
    fn method_distribution_counts_per_method() {
        let calls = vec![
            call("/api/a", HttpMethod::Get, 100.0, 200, CacheOutcome::Hit),
            call("/api/b", HttpMethod::Get, 200.0, 200, CacheOutcome::Miss),
            call("/api/c", HttpMethod::Post, 300.0, 201, CacheOutcome::Miss),
        ];
        let metrics = ApiMetrics::from_calls(&calls);
        assert_eq!(metrics.method_distribution[&HttpMethod::Get], 2);
        assert_eq!(metrics.method_distribution[&HttpMethod::Post], 1);
        assert_eq!(metrics.unique_endpoints, 3);
    }

    #[test]
    fn cache_hit_ratio_stays_in_percent_range() {
        let calls: Vec<_> = (0..10)
            .map(|i| {
                let cache = if i < 4 { CacheOutcome::Hit } else { CacheOutcome::Miss };
                call("/api/x", HttpMethod::Get, 100.0, 200, cache)
            })
            .collect();
        let metrics = ApiMetrics::from_calls(&calls);
        assert!((0.0..=100.0).contains(&metrics.cache_hit_ratio));
        assert!((metrics.cache_hit_ratio - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn slowest_and_fastest_selection() {
        let calls = vec![
            call("/api/a", HttpMethod::Get, 120.0, 200, CacheOutcome::Miss),
            call("/api/b", HttpMethod::Get, 480.0, 200, CacheOutcome::Miss),
            call("/api/c", HttpMethod::Get, 60.0, 200, CacheOutcome::Miss),
        ];
        let metrics = ApiMetrics::from_calls(&calls);
        assert_eq!(metrics.slowest.unwrap().endpoint, "/api/b");
        assert_eq!(metrics.fastest.unwrap().endpoint, "/api/c");
        assert!((metrics.average_response_time - 220.0).abs() < f64::EPSILON);
    }
}
