use serde::{Deserialize, Serialize};
use url::Url;

use super::entry::{CacheOutcome, NetworkEntry, PhaseTimings, ResourceType};

/// Display-oriented projection of a [`NetworkEntry`] used for critical-path
/// selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallEntry {
    pub id: String,
    pub name: String,
    pub url: String,
    pub resource_type: ResourceType,
    pub start_time: f64,
    pub duration: f64,
    pub phases: PhaseTimings,
    pub status: u16,
    pub size: u64,
    pub cache: CacheOutcome,
    pub blocking: bool,
    pub third_party_auth: bool,
    pub gated: bool,
}

impl WaterfallEntry {
    pub fn from_entry(entry: &NetworkEntry) -> Self {
        let name = Url::parse(&entry.url)
            .ok()
            .and_then(|u| {
                u.path_segments()
                    .and_then(|mut s| s.next_back().map(|n| n.to_string()))
                    .filter(|n| !n.is_empty())
            })
            .unwrap_or_else(|| entry.url.clone());

        WaterfallEntry {
            id: entry.id.clone(),
            name,
            url: entry.url.clone(),
            resource_type: entry.resource_type,
            start_time: entry.start_time,
            duration: entry.duration,
            phases: entry.timings,
            status: entry.status,
            size: entry.response_size,
            cache: entry.cache,
            blocking: entry.resource_type.is_blocking(),
            third_party_auth: entry.url.contains("memberstack"),
            gated: entry.request_header("authorization").is_some(),
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}
