pub mod config;
pub mod error;
pub mod types;

pub use config::FacetypeConfig;
pub use error::{FacetypeError, Result};
pub use types::*;
