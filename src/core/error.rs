use thiserror::Error;

use crate::city::AmbulanceId;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("No active emergency")]
    NoActiveEmergency,

    #[error("Unknown ambulance: {0}")]
    UnknownAmbulance(AmbulanceId),

    #[error("Unknown route option: {0}")]
    UnknownRoute(usize),

    #[error("Invalid road graph: {0}")]
    InvalidGraph(String),

    #[error("Road graph has no nodes")]
    EmptyGraph,
}

impl From<toml::de::Error> for DispatchError {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
