pub mod config;
pub mod error;
pub mod types;

pub use config::VexaConfig;
pub use error::{Result, VexaError};
pub use types::*;
