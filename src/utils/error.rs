use crate::domain::model::{LineId, StationId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubwayError {
    #[error("Already registered section: {up} -> {down}")]
    DuplicateSection { up: String, down: String },

    #[error("Section not registrable: neither {up} nor {down} is on the line")]
    DisconnectedSection { up: String, down: String },

    #[error("Line has {size} sections, removal requires more than {minimum}")]
    TooFewSections { size: usize, minimum: usize },

    #[error("Station not found: {id}")]
    StationNotFound { id: StationId },

    #[error("Station {station} is not on this line")]
    StationNotOnLine { station: StationId },

    #[error("Invalid distance {distance}: {reason}")]
    InvalidDistance { distance: u64, reason: String },

    #[error("Sections do not form a single path: {message}")]
    BrokenPath { message: String },

    #[error("Line not found: {id}")]
    LineNotFound { id: LineId },

    #[error("Line already exists: {name}")]
    DuplicateLine { name: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Topology,
    Lookup,
    Validation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SubwayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateSection { .. }
            | Self::DisconnectedSection { .. }
            | Self::TooFewSections { .. }
            | Self::StationNotOnLine { .. }
            | Self::InvalidDistance { .. }
            | Self::BrokenPath { .. } => ErrorCategory::Topology,
            Self::StationNotFound { .. } | Self::LineNotFound { .. } => ErrorCategory::Lookup,
            Self::DuplicateLine { .. } | Self::ValidationError { .. } => {
                ErrorCategory::Validation
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BrokenPath { .. } => ErrorSeverity::Critical,
            _ => match self.category() {
                ErrorCategory::Topology | ErrorCategory::Lookup | ErrorCategory::Validation => {
                    ErrorSeverity::Medium
                }
                ErrorCategory::Configuration => ErrorSeverity::High,
                ErrorCategory::System => ErrorSeverity::Critical,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::DuplicateSection { .. } => {
                "Both stations are already on the line; remove one of them first"
            }
            Self::DisconnectedSection { .. } => {
                "One of the two stations must already be on the line"
            }
            Self::TooFewSections { .. } => "A line needs at least two stations",
            Self::StationNotFound { .. } => "Register the station before referencing it",
            Self::StationNotOnLine { .. } => "Check the line's current station list",
            Self::InvalidDistance { .. } => {
                "Use a positive distance shorter than the section being split"
            }
            Self::BrokenPath { .. } => "The stored sections are corrupted; recreate the line",
            Self::LineNotFound { .. } => "Check the line id",
            Self::DuplicateLine { .. } => "Pick a different line name",
            Self::ValidationError { .. } => "Fix the request fields and retry",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the network file and run again",
            Self::IoError(_) => "Check the file path and permissions",
            Self::SerializationError(_) | Self::CsvError(_) => "Report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Topology => format!("Section change rejected: {}", self),
            ErrorCategory::Lookup => format!("Lookup failed: {}", self),
            ErrorCategory::Validation => format!("Invalid request: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SubwayError>;
