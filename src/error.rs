//! Error types
//!
//! Two layers:
//! - [`SimulationError`]: raised by a reactor simulator while it advances a run
//! - [`StudyError`]: everything a study can fail with (configuration, a failing
//!   grid point, I/O while exporting results)

use thiserror::Error;

/// Failure inside a reactor simulator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("unknown species '{0}' for this reactor model")]
    UnknownSpecies(String),

    #[error("invalid initial state: {0}")]
    InvalidState(String),

    #[error("{quantity} became non-finite at t = {time} s")]
    NonFinite { quantity: &'static str, time: f64 },

    #[error("sample time {next} s does not follow previous sample time {previous} s")]
    NonMonotonicTime { previous: f64, next: f64 },

    #[error("integration did not converge at t = {time} s: {message}")]
    Convergence { time: f64, message: String },

    #[error("reactor engine failure: {0}")]
    Engine(String),
}

/// Failure of a study, a sweep or one of its outputs
#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Configuration error: unrecognized reactor mode '{0}'")]
    UnknownReactorMode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Sweep aborted at grid point {index:?} ({point}): {source}")]
    GridPoint {
        index: Vec<usize>,
        point: String,
        #[source]
        source: Box<StudyError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Plot error: {0}")]
    Plot(String),
}

impl StudyError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for errors caused by the study definition rather than by a simulation
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::UnknownReactorMode(_) | Self::Config(_) => true,
            Self::GridPoint { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}

pub type StudyResult<T> = Result<T, StudyError>;
