use serde::{Deserialize, Serialize};

use crate::model::{NetworkEntry, WaterfallEntry};

/// How many entries the critical path keeps.
const CRITICAL_PATH_LEN: usize = 3;

/// Timeline view of the generated sequence plus its derived totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waterfall {
    pub timeline: Vec<WaterfallEntry>,
    /// Entry ids of the top blocking / third-party-auth entries by duration.
    pub critical_path: Vec<String>,
    pub total_duration: f64,
    pub parallel_requests: usize,
    pub blocking_time: f64,
    pub third_party_time: f64,
}

impl Waterfall {
    pub fn from_entries(entries: &[NetworkEntry]) -> Self {
        tracing::debug!("Building waterfall over {} entries", entries.len());

        let timeline: Vec<WaterfallEntry> =
            entries.iter().map(WaterfallEntry::from_entry).collect();

        let mut candidates: Vec<&WaterfallEntry> = timeline
            .iter()
            .filter(|e| e.blocking || e.third_party_auth)
            .collect();
        candidates.sort_by(|a, b| b.duration.total_cmp(&a.duration));
        let critical_path = candidates
            .iter()
            .take(CRITICAL_PATH_LEN)
            .map(|e| e.id.clone())
            .collect();

        let total_duration = timeline
            .iter()
            .map(|e| e.end_time())
            .fold(0.0_f64, f64::max);

        let parallel_requests = timeline
            .iter()
            .filter(|e| {
                timeline.iter().any(|other| {
                    other.id != e.id
                        && other.start_time < e.end_time()
                        && other.end_time() > e.start_time
                })
            })
            .count();

        let blocking_time = timeline
            .iter()
            .filter(|e| e.blocking)
            .map(|e| e.duration)
            .sum();
        let third_party_time = timeline
            .iter()
            .filter(|e| e.third_party_auth)
            .map(|e| e.duration)
            .sum();

        Waterfall {
            timeline,
            critical_path,
            total_duration,
            parallel_requests,
            blocking_time,
            third_party_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CacheOutcome, HttpMethod, PhaseTimings, Priority, ResourceType,
    };
    use std::collections::BTreeMap;

    fn entry(id: &str, url: &str, resource_type: ResourceType, start: f64, duration: f64) -> NetworkEntry {
        NetworkEntry {
            id: id.to_string(),
            url: url.to_string(),
            method: HttpMethod::Get,
            resource_type,
            start_time: start,
            end_time: start + duration,
            duration,
            status: 200,
            request_size: 300,
            response_size: 10_000,
            cache: CacheOutcome::Miss,
            failed: false,
            timings: PhaseTimings {
                dns: 0.0,
                connect: 0.0,
                ssl: 0.0,
                send: 0.0,
                wait: duration,
                receive: 0.0,
            },
            request_headers: BTreeMap::new(),
            response_headers: BTreeMap::new(),
            initiator: "script".to_string(),
            priority: Priority::Medium,
        }
    }

    #[test]
    fn empty_sequence_yields_zero_totals() {
        let waterfall = Waterfall::from_entries(&[]);
        assert!(waterfall.timeline.is_empty());
        assert!(waterfall.critical_path.is_empty());
        assert_eq!(waterfall.total_duration, 0.0);
        assert_eq!(waterfall.blocking_time, 0.0);
    }

    #[test]
    fn critical_path_keeps_top_three_by_duration() {
        let entries = vec![
            entry("doc", "https://example.com/", ResourceType::Document, 0.0, 400.0),
            entry("css1", "https://example.com/a.css", ResourceType::Stylesheet, 50.0, 300.0),
            entry("css2", "https://example.com/b.css", ResourceType::Stylesheet, 60.0, 100.0),
            entry("ms", "https://api.memberstack.com/m.js", ResourceType::Script, 250.0, 500.0),
            entry("img", "https://example.com/hero.jpg", ResourceType::Image, 800.0, 900.0),
        ];
        let waterfall = Waterfall::from_entries(&entries);
        // The image is long but neither blocking nor auth-related.
        assert_eq!(waterfall.critical_path, vec!["ms", "doc", "css1"]);
        assert_eq!(waterfall.blocking_time, 800.0);
        assert_eq!(waterfall.third_party_time, 500.0);
        assert_eq!(waterfall.total_duration, 1700.0);
    }

    #[test]
    fn parallel_requests_counts_overlaps() {
        let entries = vec![
            entry("a", "https://example.com/a", ResourceType::Script, 0.0, 100.0),
            entry("b", "https://example.com/b", ResourceType::Script, 50.0, 100.0),
            entry("c", "https://example.com/c", ResourceType::Script, 500.0, 100.0),
        ];
        let waterfall = Waterfall::from_entries(&entries);
        assert_eq!(waterfall.parallel_requests, 2);
    }
}
