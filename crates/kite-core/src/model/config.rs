use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Tokens shorter than this never inject successfully.
pub const MIN_TOKEN_LEN: usize = 10;

lazy_static! {
    static ref MEMBERSTACK_TOKEN: Regex = Regex::new(r"^ms_[A-Za-z0-9_-]+$").unwrap();
    static ref JWT_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9-_]+\.[A-Za-z0-9-_]+\.[A-Za-z0-9-_]+$").unwrap();
}

/// Where the injected credential lives in the simulated browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenLocation {
    Cookie,
    LocalStorage,
    Header,
}

/// Behavior-defining constants for one authentication method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodProfile {
    pub label: &'static str,
    pub default_token_name: &'static str,
    pub location: TokenLocation,
    /// True when the method is backed by a third-party provider whose
    /// script and identity calls appear in the waterfall.
    pub third_party: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthMethod {
    Memberstack,
    Cookie,
    LocalStorage,
    Bearer,
    Custom,
}

impl AuthMethod {
    pub fn profile(&self) -> MethodProfile {
        match self {
            AuthMethod::Memberstack => MethodProfile {
                label: "Memberstack",
                default_token_name: "_ms-mem",
                location: TokenLocation::LocalStorage,
                third_party: true,
            },
            AuthMethod::Cookie => MethodProfile {
                label: "Cookie",
                default_token_name: "auth_token",
                location: TokenLocation::Cookie,
                third_party: false,
            },
            AuthMethod::LocalStorage => MethodProfile {
                label: "Local Storage",
                default_token_name: "authToken",
                location: TokenLocation::LocalStorage,
                third_party: false,
            },
            AuthMethod::Bearer => MethodProfile {
                label: "Bearer Token",
                default_token_name: "Authorization",
                location: TokenLocation::Header,
                third_party: false,
            },
            AuthMethod::Custom => MethodProfile {
                label: "Custom",
                default_token_name: "token",
                location: TokenLocation::Cookie,
                third_party: false,
            },
        }
    }

    /// Whether a token is plausibly well-formed for this method. Length is
    /// checked separately; this is the per-variant shape rule.
    pub fn token_matches(&self, token: &str) -> bool {
        match self {
            AuthMethod::Memberstack => MEMBERSTACK_TOKEN.is_match(token),
            AuthMethod::Bearer => JWT_PATTERN.is_match(token) || !token.contains(char::is_whitespace),
            AuthMethod::Cookie | AuthMethod::LocalStorage | AuthMethod::Custom => {
                !token.contains(char::is_whitespace)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestScope {
    FullPage,
    ApiOnly,
    AssetsOnly,
}

/// Performance budgets carried with the configuration. The defaults match
/// the recommendation-rule thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub ttfb: f64,
    pub fcp: f64,
    pub lcp: f64,
    pub api_response: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ttfb: 400.0,
            fcp: 1800.0,
            lcp: 2500.0,
            api_response: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    pub target_url: String,
    pub auth_method: AuthMethod,
    pub auth_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_name: Option<String>,
    pub scope: TestScope,
    pub thresholds: Thresholds,
}

impl TestConfig {
    pub fn new(target_url: impl Into<String>, auth_method: AuthMethod, auth_token: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            auth_method,
            auth_token: auth_token.into(),
            token_name: None,
            scope: TestScope::FullPage,
            thresholds: Thresholds::default(),
        }
    }

    /// Reject configurations that must never reach the registry.
    pub fn validate(&self) -> Result<()> {
        if self.target_url.trim().is_empty() {
            return Err(Error::InvalidConfig("target URL must not be empty".to_string()));
        }
        if Url::parse(&self.target_url).is_err() {
            return Err(Error::InvalidConfig(format!(
                "target URL is not a valid URL: {}",
                self.target_url
            )));
        }
        if self.auth_token.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "authentication token must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Scheme+host origin of the target, e.g. `https://example.com`.
    pub fn origin(&self) -> Result<String> {
        let url = Url::parse(&self.target_url)
            .map_err(|e| Error::InvalidConfig(format!("target URL: {e}")))?;
        Ok(url.origin().ascii_serialization())
    }

    /// Effective credential name: explicit override or the method default.
    pub fn effective_token_name(&self) -> String {
        self.token_name
            .clone()
            .unwrap_or_else(|| self.auth_method.profile().default_token_name.to_string())
    }
}
