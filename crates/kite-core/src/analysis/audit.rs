use serde::{Deserialize, Serialize};

use crate::model::{ApiCall, AuthReport, NetworkEntry, ResourceType, TokenLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Presence check for one recommended response header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFinding {
    pub name: String,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub note: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenExposure {
    pub location: String,
    pub risk: Severity,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenEndpoint {
    pub url: String,
    pub method: String,
    pub requires_auth: bool,
    pub accessible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsNote {
    pub grade: String,
    pub protocol: String,
    pub cipher: String,
    pub issues: Vec<String>,
}

/// Header, token-exposure, and endpoint observations over the generated
/// traffic. Observational only; nothing here probes a real server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAudit {
    pub headers: Vec<HeaderFinding>,
    pub token_exposure: Vec<TokenExposure>,
    pub open_endpoints: Vec<OpenEndpoint>,
    pub tls: TlsNote,
}

/// (header, note, severity) table checked against the document response.
const CHECKED_HEADERS: &[(&str, &str, Severity)] = &[
    (
        "Content-Security-Policy",
        "Implement CSP to limit script injection",
        Severity::High,
    ),
    (
        "X-Frame-Options",
        "Prevent clickjacking via frame embedding",
        Severity::Medium,
    ),
    (
        "Strict-Transport-Security",
        "Enforce HTTPS connections",
        Severity::High,
    ),
    (
        "X-Content-Type-Options",
        "Prevent MIME type sniffing",
        Severity::Medium,
    ),
];

impl SecurityAudit {
    pub fn of(
        entries: &[NetworkEntry],
        api_calls: &[ApiCall],
        target_url: &str,
        auth: Option<&AuthReport>,
    ) -> Self {
        tracing::debug!("Running security audit over {} entries", entries.len());

        let document = entries
            .iter()
            .find(|e| e.resource_type == ResourceType::Document);

        let headers = CHECKED_HEADERS
            .iter()
            .map(|(name, note, severity)| {
                let value = document.and_then(|d| d.response_header(name)).map(String::from);
                HeaderFinding {
                    name: (*name).to_string(),
                    present: value.is_some(),
                    value,
                    note: (*note).to_string(),
                    severity: *severity,
                }
            })
            .collect();

        let mut token_exposure = Vec::new();
        if entries
            .iter()
            .any(|e| e.url.contains("token=") || e.url.contains("auth="))
        {
            token_exposure.push(TokenExposure {
                location: "URL parameters".to_string(),
                risk: Severity::Critical,
                details: "Authentication tokens found in URL parameters".to_string(),
            });
        }
        if auth.map(|a| a.token_location) == Some(TokenLocation::LocalStorage) {
            token_exposure.push(TokenExposure {
                location: "localStorage".to_string(),
                risk: Severity::Medium,
                details: "Tokens stored in localStorage are readable from page scripts".to_string(),
            });
        }

        let open_endpoints = api_calls
            .iter()
            .map(|c| OpenEndpoint {
                url: c.url.clone(),
                method: c.method.to_string(),
                requires_auth: c.url.contains("/api/"),
                accessible: c.status == 200,
            })
            .collect();

        let https = target_url.starts_with("https://");
        let tls = TlsNote {
            grade: if https { "A" } else { "F" }.to_string(),
            protocol: "TLS 1.3".to_string(),
            cipher: "TLS_AES_256_GCM_SHA384".to_string(),
            issues: if https {
                Vec::new()
            } else {
                vec!["Site not served over HTTPS".to_string()]
            },
        };

        SecurityAudit {
            headers,
            token_exposure,
            open_endpoints,
            tls,
        }
    }
}
