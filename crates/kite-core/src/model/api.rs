use serde::{Deserialize, Serialize};
use url::Url;

use super::entry::{CacheOutcome, HttpMethod, NetworkEntry, PhaseTimings, ResourceType};

/// Endpoint category used by the latency/status/cache policies and by the
/// category-specific recommendation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndpointClass {
    Auth,
    Integration,
    Transfer,
    ListSearch,
    Dashboard,
    General,
}

impl EndpointClass {
    /// Classify an endpoint path by name pattern.
    pub fn classify(path: &str) -> Self {
        let lower = path.to_lowercase();
        if lower.contains("/auth/") || lower.contains("/login") {
            EndpointClass::Auth
        } else if lower.contains("/integrations/") {
            EndpointClass::Integration
        } else if lower.contains("/upload") || lower.contains("/export") {
            EndpointClass::Transfer
        } else if lower.contains("/search") || lower.contains("list") {
            EndpointClass::ListSearch
        } else if lower.contains("/dashboard") || lower.contains("/analytics") {
            EndpointClass::Dashboard
        } else {
            EndpointClass::General
        }
    }
}

/// A [`NetworkEntry`] narrowed to an API call, with the endpoint path
/// extracted and authentication derived from header inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCall {
    pub id: String,
    pub url: String,
    pub endpoint: String,
    pub method: HttpMethod,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub status: u16,
    pub request_size: u64,
    pub response_size: u64,
    pub cache: CacheOutcome,
    pub failed: bool,
    pub timings: PhaseTimings,
    pub authenticated: bool,
    pub token_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ApiCall {
    /// Extract the API-call subset of a generated entry sequence.
    ///
    /// An entry qualifies when it is an xhr/fetch or its path contains
    /// `/api/`. `token_used` only holds when credential injection succeeded.
    pub fn extract(entries: &[NetworkEntry], injection_success: bool) -> Vec<ApiCall> {
        entries
            .iter()
            .filter(|e| {
                matches!(e.resource_type, ResourceType::Xhr | ResourceType::Fetch)
                    || e.url.contains("/api/")
            })
            .map(|e| {
                let endpoint = Url::parse(&e.url)
                    .map(|u| u.path().to_string())
                    .unwrap_or_else(|_| e.url.clone());
                let authenticated = e.request_header("authorization").is_some()
                    || e.request_header("x-memberstack-token").is_some();
                ApiCall {
                    id: e.id.clone(),
                    url: e.url.clone(),
                    endpoint,
                    method: e.method,
                    start_time: e.start_time,
                    end_time: e.end_time,
                    duration: e.duration,
                    status: e.status,
                    request_size: e.request_size,
                    response_size: e.response_size,
                    cache: e.cache,
                    failed: e.failed,
                    timings: e.timings,
                    authenticated,
                    token_used: injection_success && authenticated,
                    error_message: (e.status >= 400).then(|| format!("HTTP {} error", e.status)),
                }
            })
            .collect()
    }

    pub fn class(&self) -> EndpointClass {
        EndpointClass::classify(&self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_name_pattern() {
        assert_eq!(EndpointClass::classify("/api/auth/session"), EndpointClass::Auth);
        assert_eq!(EndpointClass::classify("/api/login"), EndpointClass::Auth);
        assert_eq!(
            EndpointClass::classify("/api/integrations/records/list"),
            EndpointClass::Integration
        );
        assert_eq!(EndpointClass::classify("/api/upload"), EndpointClass::Transfer);
        assert_eq!(EndpointClass::classify("/api/export"), EndpointClass::Transfer);
        assert_eq!(EndpointClass::classify("/api/search"), EndpointClass::ListSearch);
        assert_eq!(EndpointClass::classify("/api/dashboard/data"), EndpointClass::Dashboard);
        assert_eq!(EndpointClass::classify("/api/notifications"), EndpointClass::General);
    }
}
