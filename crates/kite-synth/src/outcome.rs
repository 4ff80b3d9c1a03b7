use kite_core::model::{AuthReport, CoreWebVitals, LoadTimeline, TestConfig, MIN_TOKEN_LEN};
use rand::Rng;

/// Simulate credential injection for the configured method.
///
/// Injection succeeds when the token is long enough and matches the
/// variant's shape rule; a failed injection records the redirects the
/// unauthenticated navigation had to follow.
pub fn synthesize_auth(config: &TestConfig, rng: &mut impl Rng) -> AuthReport {
    let profile = config.auth_method.profile();
    let token = &config.auth_token;
    let injection_success =
        token.len() >= MIN_TOKEN_LEN && config.auth_method.token_matches(token);
    let memberstack_detected = profile.third_party || rng.gen_bool(0.7);
    let redirects_handled = if injection_success {
        0
    } else {
        rng.gen_range(1..=3)
    };

    AuthReport {
        method: config.auth_method,
        token_location: profile.location,
        token_name: config.effective_token_name(),
        injection_success,
        memberstack_detected,
        gated_content_loaded: memberstack_detected && injection_success,
        redirects_handled,
    }
}

/// Web-vitals marks for an authenticated session. Slightly slower than a
/// public page: auth checks run before first paint.
pub fn synthesize_vitals(rng: &mut impl Rng) -> CoreWebVitals {
    CoreWebVitals {
        fcp: rng.gen_range(800..2000) as f64,
        lcp: rng.gen_range(1200..3000) as f64,
        fid: rng.gen_range(50..200) as f64,
        cls: rng.gen_range(0..=25) as f64 / 100.0,
        ttfb: rng.gen_range(200..600) as f64,
    }
}

pub fn synthesize_timeline(auth: &AuthReport, rng: &mut impl Rng) -> LoadTimeline {
    let third_party_ready = auth
        .memberstack_detected
        .then(|| rng.gen_range(300..800) as f64);
    let gated_content_visible = match (auth.gated_content_loaded, third_party_ready) {
        (true, Some(ready)) => Some(ready + rng.gen_range(200..600) as f64),
        _ => None,
    };

    LoadTimeline {
        dom_content_loaded: rng.gen_range(1000..1800) as f64,
        load_complete: rng.gen_range(2000..3500) as f64,
        first_paint: rng.gen_range(600..1000) as f64,
        third_party_ready,
        gated_content_visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kite_core::model::AuthMethod;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn valid_memberstack_token_injects_and_detects() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = TestConfig::new(
            "https://example.com",
            AuthMethod::Memberstack,
            "ms_abcdef1234567890",
        );
        let auth = synthesize_auth(&config, &mut rng);
        assert!(auth.injection_success);
        assert!(auth.memberstack_detected);
        assert!(auth.gated_content_loaded);
        assert_eq!(auth.redirects_handled, 0);
        assert_eq!(auth.token_name, "_ms-mem");
    }

    #[test]
    fn short_token_fails_injection_and_records_redirects() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = TestConfig::new("https://example.com", AuthMethod::Cookie, "short");
        let auth = synthesize_auth(&config, &mut rng);
        assert!(!auth.injection_success);
        assert!((1..=3).contains(&auth.redirects_handled));
        assert!(!auth.gated_content_loaded);
    }

    #[test]
    fn token_name_override_wins() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut config = TestConfig::new("https://example.com", AuthMethod::Bearer, "tok_0123456789");
        config.token_name = Some("X-Session".to_string());
        let auth = synthesize_auth(&config, &mut rng);
        assert_eq!(auth.token_name, "X-Session");
    }

    #[test]
    fn gated_content_needs_detection() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = TestConfig::new(
            "https://example.com",
            AuthMethod::Memberstack,
            "ms_abcdef1234567890",
        );
        let auth = synthesize_auth(&config, &mut rng);
        let timeline = synthesize_timeline(&auth, &mut rng);
        assert!(timeline.third_party_ready.is_some());
        assert!(timeline.gated_content_visible.unwrap() > timeline.third_party_ready.unwrap());
    }
}
