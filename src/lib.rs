pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{InMemoryLineRepository, InMemoryStationDirectory};
pub use crate::app::{NetworkReport, NetworkRunner};
pub use crate::config::toml_config::NetworkConfig;
pub use crate::core::line_service::LineService;
pub use crate::domain::model::{Line, LineId, Section, Station, StationId};
pub use crate::domain::sections::Sections;
pub use crate::utils::error::{Result, SubwayError};
