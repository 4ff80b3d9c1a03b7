pub mod error;
pub mod pipeline;
pub mod registry;

pub use error::{Error, Result};
pub use pipeline::TestRunner;
pub use registry::SessionRegistry;
