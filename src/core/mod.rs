pub mod config;
pub mod error;
pub mod types;

pub use config::DispatchConfig;
pub use error::{DispatchError, Result};
pub use types::GeoPoint;
