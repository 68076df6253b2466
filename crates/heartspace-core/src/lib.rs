pub mod config;
pub mod error;
pub mod types;

pub use config::HeartspaceConfig;
pub use error::{HeartspaceError, Result};
pub use types::*;
