use crate::domain::model::{Line, LineId, Station, StationId};
use crate::utils::error::Result;
use crate::utils::validation::{require, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: u64,
}

impl Validate for LineRequest {
    fn validate(&self) -> Result<()> {
        require(!self.name.trim().is_empty(), "line name must not be blank")?;
        require(!self.color.trim().is_empty(), "line color must not be blank")?;
        require(
            self.up_station_id > 0 && self.down_station_id > 0,
            "station ids must be positive",
        )?;
        require(self.distance > 0, "distance must be positive")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineUpdateRequest {
    pub name: String,
    pub color: String,
}

impl Validate for LineUpdateRequest {
    fn validate(&self) -> Result<()> {
        require(!self.name.trim().is_empty(), "line name must not be blank")?;
        require(!self.color.trim().is_empty(), "line color must not be blank")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SectionRequest {
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: u64,
}

impl Validate for SectionRequest {
    fn validate(&self) -> Result<()> {
        require(
            self.up_station_id > 0 && self.down_station_id > 0,
            "station ids must be positive",
        )?;
        require(
            self.up_station_id != self.down_station_id,
            "a section needs two different stations",
        )?;
        require(self.distance > 0, "distance must be positive")
    }
}

/// One stop of a line, with the distance travelled from the previous stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopResponse {
    pub id: StationId,
    pub name: String,
    pub distance: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineResponse {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub stations: Vec<StopResponse>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl LineResponse {
    /// `stations` must be the resolved stations of `line`, in path order.
    pub fn of(line: &Line, stations: Vec<Station>) -> Self {
        let stops = line
            .sections
            .iter()
            .zip(stations)
            .map(|(section, station)| StopResponse {
                id: station.id,
                name: station.name,
                distance: section.distance,
            })
            .collect();

        Self {
            id: line.id,
            name: line.name.clone(),
            color: line.color.clone(),
            stations: stops,
            created_at: line.created_at,
            modified_at: line.modified_at,
        }
    }

    pub fn station_names(&self) -> Vec<&str> {
        self.stations.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn total_distance(&self) -> u64 {
        self.stations.iter().map(|s| s.distance).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSummary {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<&Line> for LineSummary {
    fn from(line: &Line) -> Self {
        Self {
            id: line.id,
            name: line.name.clone(),
            color: line.color.clone(),
            created_at: line.created_at,
            modified_at: line.modified_at,
        }
    }
}
