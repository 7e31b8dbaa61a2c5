//! Error types for configuration loading, lead transmission and GPU setup.
//!
//! Nothing on the tick path returns these; the simulation degrades to
//! no-ops instead. They surface only where the driver can log and move on.

use std::fmt;

/// Failure to load or validate a [`crate::GameConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse(serde_json::Error),

    /// A field holds a value the engine cannot run with.
    Invalid {
        /// Field name (for logging).
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "failed to parse game config: {}", err),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid config value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Failure while transmitting a lead record. Logged only, never retried.
#[derive(Debug)]
pub enum LeadError {
    /// The record could not be serialized.
    Serialize(serde_json::Error),

    /// The request never produced a response.
    Network(String),

    /// The endpoint answered with a non-OK status.
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, if it could be read.
        body: String,
    },
}

impl fmt::Display for LeadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadError::Serialize(err) => write!(f, "failed to serialize lead record: {}", err),
            LeadError::Network(msg) => write!(f, "lead submission error: {}", msg),
            LeadError::Status { code, body } => {
                write!(f, "lead submission failed: {} {}", code, body)
            }
        }
    }
}

impl std::error::Error for LeadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeadError::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LeadError {
    fn from(err: serde_json::Error) -> Self {
        LeadError::Serialize(err)
    }
}

/// Failure while bringing up the WebGPU surface. The game can't draw
/// without it, so the driver reports this and stops.
#[derive(Debug)]
pub enum RenderError {
    Surface(wgpu::CreateSurfaceError),
    Adapter(wgpu::RequestAdapterError),
    Device(wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    NoSurfaceFormat,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Surface(err) => write!(f, "failed to create surface: {}", err),
            RenderError::Adapter(err) => write!(f, "failed to get adapter: {}", err),
            RenderError::Device(err) => write!(f, "failed to create device: {}", err),
            RenderError::NoSurfaceFormat => write!(f, "surface has no supported formats"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Surface(err) => Some(err),
            RenderError::Adapter(err) => Some(err),
            RenderError::Device(err) => Some(err),
            RenderError::NoSurfaceFormat => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        RenderError::Surface(err)
    }
}

impl From<wgpu::RequestAdapterError> for RenderError {
    fn from(err: wgpu::RequestAdapterError) -> Self {
        RenderError::Adapter(err)
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        RenderError::Device(err)
    }
}
