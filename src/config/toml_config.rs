use crate::domain::dto::LineRequest;
use crate::domain::model::Station;
use crate::utils::error::{Result, SubwayError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const OUTPUT_FORMATS: [&str; 3] = ["text", "json", "csv"];

/// A network file: the stations, the lines opened on them, and the section
/// edits replayed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network: NetworkInfo,
    #[serde(default)]
    pub stations: Vec<StationConfig>,
    #[serde(default)]
    pub lines: Vec<LineConfig>,
    #[serde(default)]
    pub operations: Vec<OperationConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    pub name: String,
    pub color: String,
    pub up_station: u64,
    pub down_station: u64,
    pub distance: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationConfig {
    AddSection {
        line: String,
        up_station: u64,
        down_station: u64,
        distance: u64,
    },
    RemoveStation {
        line: String,
        station: u64,
    },
}

impl OperationConfig {
    pub fn line(&self) -> &str {
        match self {
            Self::AddSection { line, .. } | Self::RemoveStation { line, .. } => line,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<String>,
    pub path: Option<String>,
}

impl NetworkConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SubwayError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("network.name", &self.network.name)?;

        for station in &self.stations {
            validation::validate_positive_number("stations.id", station.id, 1)?;
            validation::validate_non_empty_string("stations.name", &station.name)?;
        }
        validation::validate_unique("stations.id", self.stations.iter().map(|s| s.id))?;

        for line in &self.lines {
            validation::validate_non_empty_string("lines.name", &line.name)?;
            validation::validate_non_empty_string("lines.color", &line.color)?;
            validation::validate_positive_number("lines.distance", line.distance, 1)?;
        }
        validation::validate_unique("lines.name", self.lines.iter().map(|l| l.name.as_str()))?;

        for operation in &self.operations {
            validation::validate_non_empty_string("operations.line", operation.line())?;
            if let OperationConfig::AddSection { distance, .. } = operation {
                validation::validate_positive_number("operations.distance", *distance, 1)?;
            }
        }

        if let Some(output) = &self.output {
            let format = validation::validate_required_field("output.format", &output.format)?;
            validation::validate_one_of("output.format", format, &OUTPUT_FORMATS)?;
        }

        Ok(())
    }

    pub fn station_list(&self) -> Vec<Station> {
        self.stations
            .iter()
            .map(|s| Station::new(s.id, s.name.clone()))
            .collect()
    }

    pub fn output_format(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .unwrap_or("text")
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.path.as_deref())
    }
}

impl LineConfig {
    pub fn to_request(&self) -> LineRequest {
        LineRequest {
            name: self.name.clone(),
            color: self.color.clone(),
            up_station_id: self.up_station,
            down_station_id: self.down_station,
            distance: self.distance,
        }
    }
}

impl Validate for NetworkConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
