//! Named distribution policies.
//!
//! Every "realistic" distribution the generator relies on is an explicit
//! function of (category, rng) so the rates can be tested against a seeded
//! source instead of living as inline random calls.

use kite_core::model::{CacheOutcome, EndpointClass, HttpMethod, ResourceType};
use rand::Rng;

/// Failure rates per endpoint class. These are load-bearing: tests assert
/// convergence against them.
const AUTH_DENIED_RATE: f64 = 0.15;
const DELETE_MISSING_RATE: f64 = 0.10;
const POST_INVALID_RATE: f64 = 0.12;
const SERVER_ERROR_RATE: f64 = 0.05;
const POST_CREATED_RATE: f64 = 0.70;

/// Pick a plausible HTTP method from the endpoint name.
pub fn method_for_endpoint(path: &str, rng: &mut impl Rng) -> HttpMethod {
    let lower = path.to_lowercase();
    if ["list", "/search", "/profile", "/dashboard"]
        .iter()
        .any(|p| lower.contains(p))
    {
        return HttpMethod::Get;
    }
    if ["/create", "/login", "/upload", "/sync"]
        .iter()
        .any(|p| lower.contains(p))
    {
        return HttpMethod::Post;
    }
    if lower.contains("/update") || lower.contains("/settings") {
        return if rng.gen_bool(0.5) {
            HttpMethod::Put
        } else {
            HttpMethod::Patch
        };
    }
    if lower.contains("/delete") {
        return HttpMethod::Delete;
    }

    // Weighted fallback for unclassified endpoints.
    let roll: f64 = rng.r#gen();
    if roll < 0.40 {
        HttpMethod::Get
    } else if roll < 0.70 {
        HttpMethod::Post
    } else if roll < 0.85 {
        HttpMethod::Put
    } else if roll < 0.95 {
        HttpMethod::Patch
    } else {
        HttpMethod::Delete
    }
}

/// Status-code policy per endpoint class.
///
/// Auth endpoints are denied ~15% of the time, DELETEs miss ~10%, POSTs
/// fail validation ~12%, and every call carries a flat ~5% server-error
/// chance. Each rule rolls independently so no class shadows another.
pub fn status_for_endpoint(class: EndpointClass, method: HttpMethod, rng: &mut impl Rng) -> u16 {
    if class == EndpointClass::Auth && rng.gen_bool(AUTH_DENIED_RATE) {
        return if rng.gen_bool(0.5) { 401 } else { 403 };
    }
    if method == HttpMethod::Delete && rng.gen_bool(DELETE_MISSING_RATE) {
        return 404;
    }
    if method == HttpMethod::Post && rng.gen_bool(POST_INVALID_RATE) {
        return if rng.gen_bool(0.5) { 400 } else { 422 };
    }
    if rng.gen_bool(SERVER_ERROR_RATE) {
        return if rng.gen_bool(0.5) { 500 } else { 503 };
    }
    if method == HttpMethod::Post {
        if rng.gen_bool(POST_CREATED_RATE) { 201 } else { 200 }
    } else {
        200
    }
}

/// Response time in whole milliseconds, banded by endpoint class.
pub fn latency_for_endpoint(class: EndpointClass, rng: &mut impl Rng) -> f64 {
    let ms: u64 = match class {
        EndpointClass::ListSearch | EndpointClass::Integration => rng.gen_range(150..550),
        EndpointClass::Auth => rng.gen_range(200..500),
        EndpointClass::Transfer => rng.gen_range(500..2000),
        EndpointClass::Dashboard => rng.gen_range(100..400),
        EndpointClass::General => rng.gen_range(50..300),
    };
    ms as f64
}

pub fn request_size_for(method: HttpMethod, class: EndpointClass, rng: &mut impl Rng) -> u64 {
    if method == HttpMethod::Get {
        return rng.gen_range(100..400);
    }
    if class == EndpointClass::Transfer {
        return rng.gen_range(50_000..250_000);
    }
    match method {
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => rng.gen_range(500..5_500),
        _ => rng.gen_range(100..600),
    }
}

pub fn response_size_for(class: EndpointClass, status: u16, rng: &mut impl Rng) -> u64 {
    if status >= 400 {
        // Error bodies are small.
        return rng.gen_range(200..1_000);
    }
    match class {
        EndpointClass::ListSearch | EndpointClass::Integration => rng.gen_range(5_000..30_000),
        EndpointClass::Transfer => rng.gen_range(10_000..110_000),
        EndpointClass::Dashboard => rng.gen_range(2_000..10_000),
        EndpointClass::Auth | EndpointClass::General => rng.gen_range(500..3_500),
    }
}

pub fn cache_control_for(class: EndpointClass) -> &'static str {
    match class {
        EndpointClass::Auth | EndpointClass::Transfer => "no-cache",
        EndpointClass::Dashboard => "max-age=60",
        EndpointClass::General => "max-age=300",
        EndpointClass::ListSearch | EndpointClass::Integration => "max-age=3600",
    }
}

/// Cache outcome for an API call.
pub fn cache_outcome_for(class: EndpointClass, rng: &mut impl Rng) -> CacheOutcome {
    match class {
        // Never cached.
        EndpointClass::Auth | EndpointClass::Transfer => CacheOutcome::Miss,
        EndpointClass::General => {
            let roll: f64 = rng.r#gen();
            if roll < 0.30 {
                CacheOutcome::Hit
            } else if roll < 0.45 {
                CacheOutcome::Revalidated
            } else {
                CacheOutcome::Miss
            }
        }
        _ => {
            let roll: f64 = rng.r#gen();
            if roll < 0.40 {
                CacheOutcome::Hit
            } else if roll < 0.60 {
                CacheOutcome::Revalidated
            } else {
                CacheOutcome::Miss
            }
        }
    }
}

/// Cache outcome for a page resource. Static assets cache best; documents
/// never do.
pub fn asset_cache_outcome(resource_type: ResourceType, rng: &mut impl Rng) -> CacheOutcome {
    if !resource_type.is_static_asset() {
        return CacheOutcome::Miss;
    }
    let roll: f64 = rng.r#gen();
    if roll < 0.40 {
        CacheOutcome::Hit
    } else if roll < 0.50 {
        CacheOutcome::Revalidated
    } else {
        CacheOutcome::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DRAWS: usize = 1000;

    fn rate(hits: usize) -> f64 {
        hits as f64 / DRAWS as f64
    }

    #[test]
    fn auth_endpoints_are_denied_about_fifteen_percent() {
        let mut rng = StdRng::seed_from_u64(7);
        let denied = (0..DRAWS)
            .filter(|_| {
                let status =
                    status_for_endpoint(EndpointClass::Auth, HttpMethod::Get, &mut rng);
                status == 401 || status == 403
            })
            .count();
        let observed = rate(denied);
        assert!(
            (0.10..=0.20).contains(&observed),
            "observed 401/403 rate {observed}"
        );
    }

    #[test]
    fn deletes_miss_about_ten_percent() {
        let mut rng = StdRng::seed_from_u64(11);
        let missing = (0..DRAWS)
            .filter(|_| {
                status_for_endpoint(EndpointClass::General, HttpMethod::Delete, &mut rng) == 404
            })
            .count();
        let observed = rate(missing);
        assert!((0.06..=0.14).contains(&observed), "observed 404 rate {observed}");
    }

    #[test]
    fn posts_fail_validation_about_twelve_percent() {
        let mut rng = StdRng::seed_from_u64(13);
        let invalid = (0..DRAWS)
            .filter(|_| {
                let status =
                    status_for_endpoint(EndpointClass::General, HttpMethod::Post, &mut rng);
                status == 400 || status == 422
            })
            .count();
        let observed = rate(invalid);
        assert!(
            (0.08..=0.16).contains(&observed),
            "observed 400/422 rate {observed}"
        );
    }

    #[test]
    fn server_errors_are_flat_about_five_percent() {
        let mut rng = StdRng::seed_from_u64(17);
        let errors = (0..DRAWS)
            .filter(|_| {
                let status =
                    status_for_endpoint(EndpointClass::General, HttpMethod::Get, &mut rng);
                status == 500 || status == 503
            })
            .count();
        let observed = rate(errors);
        assert!((0.02..=0.09).contains(&observed), "observed 5xx rate {observed}");
    }

    #[test]
    fn successful_posts_return_200_or_201() {
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..DRAWS {
            let status = status_for_endpoint(EndpointClass::General, HttpMethod::Post, &mut rng);
            assert!(matches!(status, 200 | 201 | 400 | 422 | 500 | 503));
        }
    }

    #[test]
    fn latency_stays_in_the_class_band() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..DRAWS {
            let transfer = latency_for_endpoint(EndpointClass::Transfer, &mut rng);
            assert!((500.0..2000.0).contains(&transfer));
            let general = latency_for_endpoint(EndpointClass::General, &mut rng);
            assert!((50.0..300.0).contains(&general));
        }
    }

    #[test]
    fn name_patterns_pin_the_method() {
        let mut rng = StdRng::seed_from_u64(29);
        for _ in 0..50 {
            assert_eq!(
                method_for_endpoint("/api/integrations/records/list", &mut rng),
                HttpMethod::Get
            );
            assert_eq!(method_for_endpoint("/api/upload", &mut rng), HttpMethod::Post);
            assert!(matches!(
                method_for_endpoint("/api/settings", &mut rng),
                HttpMethod::Put | HttpMethod::Patch
            ));
        }
    }

    #[test]
    fn auth_calls_are_never_cache_hits() {
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..DRAWS {
            assert_eq!(
                cache_outcome_for(EndpointClass::Auth, &mut rng),
                CacheOutcome::Miss
            );
        }
    }
}
