use kite_core::model::{
    CacheOutcome, EndpointClass, HttpMethod, NetworkEntry, Priority, ResourceType, TestConfig,
    TestScope,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::policy;
use crate::primitives::{build_entry, ResourceSpec};
use crate::Result;

/// Fixed panel of first-party endpoints exercised by every scenario.
const API_PANEL: &[&str] = &[
    "/api/auth/session",
    "/api/user/profile",
    "/api/dashboard/data",
    "/api/search",
    "/api/notifications",
    "/api/settings",
    "/api/integrations/records/list",
    "/api/integrations/sync",
    "/api/upload",
    "/api/export",
];

const IMAGES: &[&str] = &["hero.jpg", "logo.png", "card-1.jpg", "card-2.jpg", "avatar.png"];

const MEMBERSTACK_SCRIPT: &str = "https://api.memberstack.com/static/memberstack.js";
const MEMBERSTACK_IDENTITY: &str = "https://api.memberstack.com/v1/auth/me";
const MEMBERSTACK_PERMISSIONS: &str = "https://api.memberstack.com/v1/members/permissions";

const FONT_CSS: &str =
    "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap";
const FONT_WOFF: &str = "https://fonts.gstatic.com/s/inter/v12/UcCO3FwrK3iLTeHuS_fvQtMwCp50KnMw.woff2";

/// Produces the ordered resource waterfall for one page load.
///
/// Blocking resources advance a shared time cursor; non-blocking resources
/// start concurrently inside a jittered window behind it. The returned
/// sequence is sorted by start time ascending, document first.
pub struct ScenarioGenerator<R: Rng> {
    rng: R,
    seq: u32,
}

impl ScenarioGenerator<StdRng> {
    /// Deterministic generator for tests and reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> ScenarioGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, seq: 0 }
    }

    fn next_id(&mut self) -> String {
        self.seq += 1;
        format!("req_{:03}", self.seq)
    }

    pub fn generate(&mut self, config: &TestConfig) -> Result<Vec<NetworkEntry>> {
        tracing::debug!("Generating scenario for {}", config.target_url);

        let origin = config.origin()?;
        let token = config.auth_token.clone();
        let third_party = config.auth_method.profile().third_party;
        let mut entries: Vec<NetworkEntry> = Vec::new();
        let mut cursor = 0.0;

        // Main document.
        let document = ResourceSpec {
            url: config.target_url.clone(),
            method: HttpMethod::Get,
            resource_type: ResourceType::Document,
            start_time: cursor,
            duration: self.rng.gen_range(300..700) as f64,
            status: 200,
            request_size: self.rng.gen_range(500..2_500),
            response_size: self.rng.gen_range(15_000..40_000),
            cache: CacheOutcome::Miss,
            priority: Priority::VeryHigh,
            authenticated: false,
            cache_control: None,
        };
        entries.push(self.build(&document, &token));
        cursor += 50.0;

        // Render-blocking stylesheets.
        for (path, offset, dur, size, priority) in [
            ("/css/site.css", 0.0, 150..350u64, 45_000..80_000u64, Priority::VeryHigh),
            ("/css/theme.css", 20.0, 100..250, 25_000..45_000, Priority::High),
        ] {
            let spec = self.asset_spec(
                format!("{origin}{path}"),
                ResourceType::Stylesheet,
                cursor + offset,
                dur,
                size,
                priority,
            );
            entries.push(self.build(&spec, &token));
        }
        cursor += 200.0;

        // Third-party auth provider: script plus identity/permissions calls.
        if third_party {
            let script = self.asset_spec(
                MEMBERSTACK_SCRIPT.to_string(),
                ResourceType::Script,
                cursor,
                200..500,
                85_000..100_000,
                Priority::High,
            );
            entries.push(self.build(&script, &token));

            for (url, offset, dur, size, priority) in [
                (MEMBERSTACK_IDENTITY, 250.0, 150..400u64, 2_000..5_000u64, Priority::High),
                (MEMBERSTACK_PERMISSIONS, 400.0, 100..300, 1_500..3_500, Priority::Medium),
            ] {
                let spec = ResourceSpec {
                    url: url.to_string(),
                    method: HttpMethod::Get,
                    resource_type: ResourceType::Xhr,
                    start_time: cursor + offset,
                    duration: self.rng.gen_range(dur) as f64,
                    status: 200,
                    request_size: self.rng.gen_range(100..400),
                    response_size: self.rng.gen_range(size),
                    cache: CacheOutcome::Miss,
                    priority,
                    authenticated: true,
                    cache_control: Some(policy::cache_control_for(EndpointClass::Auth)),
                };
                entries.push(self.build(&spec, &token));
            }
            cursor += 500.0;
        }

        // Page scripts.
        for (path, offset, dur, size) in [
            ("/js/app.js", 0.0, 180..400u64, 95_000..120_000u64),
            ("/js/site.js", 50.0, 120..300, 35_000..50_000),
        ] {
            let spec = self.asset_spec(
                format!("{origin}{path}"),
                ResourceType::Script,
                cursor + offset,
                dur,
                size,
                Priority::Medium,
            );
            entries.push(self.build(&spec, &token));
        }
        cursor += 300.0;

        // First-party API panel, concurrent inside a jittered window.
        let panel: &[&str] = if config.scope == TestScope::AssetsOnly {
            &[]
        } else {
            API_PANEL
        };
        for (index, endpoint) in panel.iter().enumerate() {
            let class = EndpointClass::classify(endpoint);
            let method = policy::method_for_endpoint(endpoint, &mut self.rng);
            let status = policy::status_for_endpoint(class, method, &mut self.rng);
            let duration = policy::latency_for_endpoint(class, &mut self.rng);
            let jitter = self.rng.gen_range(0..200) as f64;
            let spec = ResourceSpec {
                url: format!("{origin}{endpoint}"),
                method,
                resource_type: ResourceType::Fetch,
                start_time: cursor + index as f64 * 100.0 + jitter,
                duration,
                status,
                request_size: policy::request_size_for(method, class, &mut self.rng),
                response_size: policy::response_size_for(class, status, &mut self.rng),
                cache: policy::cache_outcome_for(class, &mut self.rng),
                priority: Priority::Medium,
                authenticated: true,
                cache_control: Some(policy::cache_control_for(class)),
            };
            entries.push(self.build(&spec, &token));
        }
        cursor += 800.0;

        // Images and fonts are skipped for API-only runs.
        if config.scope != TestScope::ApiOnly {
            for (index, image) in IMAGES.iter().enumerate() {
                let spec = self.asset_spec(
                    format!("{origin}/images/{image}"),
                    ResourceType::Image,
                    cursor + index as f64 * 50.0,
                    200..600,
                    25_000..175_000,
                    Priority::Low,
                );
                entries.push(self.build(&spec, &token));
            }

            let font_css = self.asset_spec(
                FONT_CSS.to_string(),
                ResourceType::Stylesheet,
                cursor + 100.0,
                120..300,
                2_500..4_000,
                Priority::Medium,
            );
            entries.push(self.build(&font_css, &token));
            let font = self.asset_spec(
                FONT_WOFF.to_string(),
                ResourceType::Font,
                cursor + 200.0,
                150..350,
                45_000..60_000,
                Priority::Medium,
            );
            entries.push(self.build(&font, &token));
        }

        entries.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        tracing::info!("Generated {} entries for {}", entries.len(), config.target_url);
        Ok(entries)
    }

    fn asset_spec(
        &mut self,
        url: String,
        resource_type: ResourceType,
        start_time: f64,
        duration: std::ops::Range<u64>,
        size: std::ops::Range<u64>,
        priority: Priority,
    ) -> ResourceSpec {
        ResourceSpec {
            url,
            method: HttpMethod::Get,
            resource_type,
            start_time,
            duration: self.rng.gen_range(duration) as f64,
            status: 200,
            request_size: self.rng.gen_range(500..2_500),
            response_size: self.rng.gen_range(size),
            cache: policy::asset_cache_outcome(resource_type, &mut self.rng),
            priority,
            authenticated: false,
            cache_control: None,
        }
    }

    fn build(&mut self, spec: &ResourceSpec, token: &str) -> NetworkEntry {
        let id = self.next_id();
        build_entry(id, spec, token, &mut self.rng)
    }
}
