mod api;
mod config;
mod entry;
mod session;
mod waterfall;

pub use api::{ApiCall, EndpointClass};
pub use config::{
    AuthMethod, MethodProfile, TestConfig, TestScope, Thresholds, TokenLocation, MIN_TOKEN_LEN,
};
pub use entry::{CacheOutcome, HttpMethod, NetworkEntry, PhaseTimings, Priority, ResourceType};
pub use session::{AuthReport, CoreWebVitals, LoadTimeline, TestSession, TestStatus};
pub use waterfall::WaterfallEntry;
