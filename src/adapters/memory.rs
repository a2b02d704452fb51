use crate::domain::model::{Line, LineId, Section, Station, StationId};
use crate::domain::ports::{LineRepository, StationDirectory};
use crate::domain::sections::Sections;
use crate::utils::error::{Result, SubwayError};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStationDirectory {
    stations: HashMap<StationId, Station>,
}

impl InMemoryStationDirectory {
    pub fn new(stations: impl IntoIterator<Item = Station>) -> Result<Self> {
        let mut directory = Self::default();
        for station in stations {
            directory.register(station)?;
        }
        Ok(directory)
    }

    pub fn register(&mut self, station: Station) -> Result<()> {
        if self.stations.contains_key(&station.id) {
            return Err(SubwayError::ValidationError {
                message: format!("station {} is already registered", station.id),
            });
        }
        self.stations.insert(station.id, station);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl StationDirectory for InMemoryStationDirectory {
    fn resolve(&self, id: StationId) -> Result<Station> {
        self.stations
            .get(&id)
            .cloned()
            .ok_or(SubwayError::StationNotFound { id })
    }
}

/// A line row plus its section rows, the way a relational store would keep them.
#[derive(Debug, Clone)]
struct StoredLine {
    name: String,
    color: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    sections: Vec<Section>,
}

/// Keeps section rows sorted by station id, so every load has to rebuild the path order.
#[derive(Debug, Default)]
pub struct InMemoryLineRepository {
    lines: BTreeMap<LineId, StoredLine>,
    next_id: u64,
}

impl InMemoryLineRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(id: LineId, stored: &StoredLine) -> Result<Line> {
        Ok(Line {
            id,
            name: stored.name.clone(),
            color: stored.color.clone(),
            sections: Sections::from_unordered(id, stored.sections.clone())?,
            created_at: stored.created_at,
            modified_at: stored.modified_at,
        })
    }
}

impl LineRepository for InMemoryLineRepository {
    fn save(&mut self, mut line: Line) -> Result<Line> {
        if line.id.0 == 0 {
            self.next_id += 1;
            line.assign_id(LineId(self.next_id));
        }

        let mut rows: Vec<Section> = line.sections.iter().copied().collect();
        rows.sort_by_key(|s| s.station);

        self.lines.insert(
            line.id,
            StoredLine {
                name: line.name.clone(),
                color: line.color.clone(),
                created_at: line.created_at,
                modified_at: line.modified_at,
                sections: rows,
            },
        );
        tracing::debug!(line = %line.id, sections = line.sections.len(), "line stored");
        Ok(line)
    }

    fn find_by_id(&self, id: LineId) -> Result<Option<Line>> {
        self.lines
            .get(&id)
            .map(|stored| Self::load(id, stored))
            .transpose()
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Line>> {
        self.lines
            .iter()
            .find(|(_, stored)| stored.name == name)
            .map(|(id, stored)| Self::load(*id, stored))
            .transpose()
    }

    fn find_all(&self) -> Result<Vec<Line>> {
        self.lines
            .iter()
            .map(|(id, stored)| Self::load(*id, stored))
            .collect()
    }

    fn delete_by_id(&mut self, id: LineId) -> Result<bool> {
        Ok(self.lines.remove(&id).is_some())
    }
}
