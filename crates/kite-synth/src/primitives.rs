use kite_core::model::{
    CacheOutcome, HttpMethod, NetworkEntry, PhaseTimings, Priority, ResourceType,
};
use rand::Rng;
use std::collections::BTreeMap;

/// Logical descriptor for one resource fetch; [`build_entry`] turns it into
/// a fully-populated [`NetworkEntry`] with consistent derived fields.
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub url: String,
    pub method: HttpMethod,
    pub resource_type: ResourceType,
    pub start_time: f64,
    pub duration: f64,
    pub status: u16,
    pub request_size: u64,
    pub response_size: u64,
    pub cache: CacheOutcome,
    pub priority: Priority,
    /// Attach credential headers to the request.
    pub authenticated: bool,
    /// Override the type-default cache-control response header.
    pub cache_control: Option<&'static str>,
}

/// Split a duration into the six phases, whole milliseconds each.
///
/// dns/connect/ssl/send are drawn first and greedily clamped against the
/// duration budget (a short fetch cannot spend more on overhead than it
/// lasts); `wait` takes 40-80% of the remainder and `receive` the exact
/// rest, so the phases always sum to the duration.
pub fn split_phases(duration: f64, https: bool, rng: &mut impl Rng) -> PhaseTimings {
    let total = duration.max(0.0).round() as u64;
    let mut budget = total;

    let dns = rng.gen_range(0..=50).min(budget);
    budget -= dns;
    let connect = rng.gen_range(0..=100).min(budget);
    budget -= connect;
    let ssl = if https {
        rng.gen_range(0..=150).min(budget)
    } else {
        0
    };
    budget -= ssl;
    let send = rng.gen_range(0..=20).min(budget);
    budget -= send;

    let wait_pct: u64 = rng.gen_range(40..=80);
    let wait = budget * wait_pct / 100;
    let receive = budget - wait;

    PhaseTimings {
        dns: dns as f64,
        connect: connect as f64,
        ssl: ssl as f64,
        send: send as f64,
        wait: wait as f64,
        receive: receive as f64,
    }
}

/// Materialize a descriptor into a network entry.
pub fn build_entry(id: String, spec: &ResourceSpec, token: &str, rng: &mut impl Rng) -> NetworkEntry {
    let https = spec.url.starts_with("https://");
    let duration = spec.duration.max(0.0).round();
    let timings = split_phases(duration, https, rng);

    NetworkEntry {
        id,
        url: spec.url.clone(),
        method: spec.method,
        resource_type: spec.resource_type,
        start_time: spec.start_time,
        end_time: spec.start_time + duration,
        duration,
        status: spec.status,
        request_size: spec.request_size,
        response_size: spec.response_size,
        cache: spec.cache,
        failed: spec.status >= 400,
        timings,
        request_headers: request_headers(spec.authenticated, token),
        response_headers: response_headers(spec.resource_type, spec.cache_control, rng),
        initiator: if spec.resource_type == ResourceType::Document {
            "navigation".to_string()
        } else {
            "script".to_string()
        },
        priority: spec.priority,
    }
}

fn request_headers(authenticated: bool, token: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        "User-Agent".to_string(),
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
    );
    headers.insert(
        "Accept".to_string(),
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
    );
    headers.insert("Accept-Language".to_string(), "en-US,en;q=0.5".to_string());
    headers.insert("Accept-Encoding".to_string(), "gzip, deflate, br".to_string());

    if authenticated {
        headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        headers.insert("X-Memberstack-Token".to_string(), token.to_string());
    }

    headers
}

fn content_type_for(resource_type: ResourceType) -> &'static str {
    match resource_type {
        ResourceType::Document => "text/html; charset=utf-8",
        ResourceType::Stylesheet => "text/css",
        ResourceType::Script => "application/javascript",
        ResourceType::Image => "image/jpeg",
        ResourceType::Font => "font/woff2",
        ResourceType::Xhr | ResourceType::Fetch => "application/json",
        ResourceType::Other => "text/plain",
    }
}

/// Type-default cache-control; API entries override per endpoint class.
pub fn cache_control_for_type(resource_type: ResourceType) -> &'static str {
    match resource_type {
        ResourceType::Document | ResourceType::Xhr | ResourceType::Fetch | ResourceType::Other => {
            "no-cache"
        }
        _ => "max-age=31536000",
    }
}

fn response_headers(
    resource_type: ResourceType,
    cache_control: Option<&'static str>,
    rng: &mut impl Rng,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        "Content-Type".to_string(),
        content_type_for(resource_type).to_string(),
    );
    headers.insert(
        "Cache-Control".to_string(),
        cache_control
            .unwrap_or_else(|| cache_control_for_type(resource_type))
            .to_string(),
    );
    headers.insert("Server".to_string(), "nginx/1.18.0".to_string());

    if rng.gen_bool(0.3) {
        headers.insert("X-Frame-Options".to_string(), "SAMEORIGIN".to_string());
    }
    if rng.gen_bool(0.4) {
        headers.insert("X-Content-Type-Options".to_string(), "nosniff".to_string());
    }
    if resource_type == ResourceType::Document {
        if rng.gen_bool(0.4) {
            headers.insert(
                "Content-Security-Policy".to_string(),
                "default-src 'self'".to_string(),
            );
        }
        if rng.gen_bool(0.5) {
            headers.insert(
                "Strict-Transport-Security".to_string(),
                "max-age=63072000; includeSubDomains".to_string(),
            );
        }
    }

    headers
}
