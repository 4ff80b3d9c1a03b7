use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Resource class of a simulated fetch, mirroring browser devtools categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Document,
    Stylesheet,
    Script,
    Image,
    Font,
    Xhr,
    Fetch,
    Other,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Document => "document",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Script => "script",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Xhr => "xhr",
            ResourceType::Fetch => "fetch",
            ResourceType::Other => "other",
        }
    }

    /// Document and stylesheet fetches block rendering.
    pub fn is_blocking(&self) -> bool {
        matches!(self, ResourceType::Document | ResourceType::Stylesheet)
    }

    pub fn is_static_asset(&self) -> bool {
        matches!(
            self,
            ResourceType::Stylesheet | ResourceType::Script | ResourceType::Image | ResourceType::Font
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheOutcome {
    Hit,
    Miss,
    Revalidated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    VeryHigh,
    High,
    Medium,
    Low,
}

/// Per-phase timing breakdown in whole milliseconds.
///
/// Invariant: every phase is non-negative and the six phases sum exactly to
/// the owning entry's duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub dns: f64,
    pub connect: f64,
    pub ssl: f64,
    pub send: f64,
    pub wait: f64,
    pub receive: f64,
}

impl PhaseTimings {
    pub fn total(&self) -> f64 {
        self.dns + self.connect + self.ssl + self.send + self.wait + self.receive
    }
}

/// One simulated resource fetch.
///
/// Invariants: `end_time == start_time + duration`,
/// `failed == (status >= 400)`, and `timings.total() == duration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEntry {
    pub id: String,
    pub url: String,
    pub method: HttpMethod,
    pub resource_type: ResourceType,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub status: u16,
    pub request_size: u64,
    pub response_size: u64,
    pub cache: CacheOutcome,
    pub failed: bool,
    pub timings: PhaseTimings,
    pub request_headers: BTreeMap<String, String>,
    pub response_headers: BTreeMap<String, String>,
    pub initiator: String,
    pub priority: Priority,
}

impl NetworkEntry {
    /// Case-insensitive request header lookup.
    pub fn request_header(&self, name: &str) -> Option<&str> {
        let lower = name.to_lowercase();
        self.request_headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == lower)
            .map(|(_, v)| v.as_str())
    }

    /// Case-insensitive response header lookup.
    pub fn response_header(&self, name: &str) -> Option<&str> {
        let lower = name.to_lowercase();
        self.response_headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == lower)
            .map(|(_, v)| v.as_str())
    }
}
