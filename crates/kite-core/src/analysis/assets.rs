use serde::{Deserialize, Serialize};

use crate::model::{CacheOutcome, NetworkEntry, ResourceType};

/// Assets larger than this are reported as unoptimized.
const UNOPTIMIZED_SIZE: u64 = 100_000;
const LARGEST_ASSETS_LEN: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub url: String,
    pub resource_type: ResourceType,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnoptimizedAsset {
    pub url: String,
    pub resource_type: ResourceType,
    pub size: u64,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheableAsset {
    pub url: String,
    pub cacheable: bool,
    pub cache_headers: Vec<String>,
}

/// Static-asset breakdown (stylesheets, scripts, images, fonts).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetReport {
    pub total_size: u64,
    /// Rough transfer estimate assuming typical gzip ratios.
    pub compressed_estimate: u64,
    pub unoptimized: Vec<UnoptimizedAsset>,
    pub largest: Vec<AssetSummary>,
    pub cacheable: Vec<CacheableAsset>,
}

impl AssetReport {
    pub fn from_entries(entries: &[NetworkEntry]) -> Self {
        let assets: Vec<&NetworkEntry> = entries
            .iter()
            .filter(|e| e.resource_type.is_static_asset())
            .collect();
        tracing::debug!("Auditing {} static assets", assets.len());

        let total_size: u64 = assets.iter().map(|a| a.response_size).sum();

        let unoptimized = assets
            .iter()
            .filter(|a| a.response_size > UNOPTIMIZED_SIZE)
            .map(|a| UnoptimizedAsset {
                url: a.url.clone(),
                resource_type: a.resource_type,
                size: a.response_size,
                suggestions: asset_suggestions(a),
            })
            .collect();

        let mut by_size = assets.clone();
        by_size.sort_by(|a, b| b.response_size.cmp(&a.response_size));
        let largest = by_size
            .iter()
            .take(LARGEST_ASSETS_LEN)
            .map(|a| AssetSummary {
                url: a.url.clone(),
                resource_type: a.resource_type,
                size: a.response_size,
            })
            .collect();

        let cacheable = assets
            .iter()
            .map(|a| {
                let cache_headers: Vec<String> = a
                    .response_headers
                    .keys()
                    .filter(|k| {
                        let lower = k.to_lowercase();
                        lower.contains("cache") || lower.contains("expires")
                    })
                    .cloned()
                    .collect();
                CacheableAsset {
                    url: a.url.clone(),
                    cacheable: a.response_header("cache-control") != Some("no-cache"),
                    cache_headers,
                }
            })
            .collect();

        AssetReport {
            total_size,
            compressed_estimate: (total_size as f64 * 0.7) as u64,
            unoptimized,
            largest,
            cacheable,
        }
    }
}

fn asset_suggestions(asset: &NetworkEntry) -> Vec<String> {
    let mut suggestions = Vec::new();

    if asset.response_size > 200_000 {
        suggestions.push("Compress or optimize this large asset".to_string());
    }
    if asset.resource_type == ResourceType::Image && asset.response_size > 100_000 {
        suggestions.push("Serve WebP or compress the image".to_string());
    }
    if asset.resource_type == ResourceType::Script && asset.response_size > 150_000 {
        suggestions.push("Split or minify the bundle".to_string());
    }
    if asset.cache != CacheOutcome::Hit && asset.response_header("cache-control") == Some("no-cache") {
        suggestions.push("Enable caching for this asset".to_string());
    }

    suggestions
}
