use crate::domain::sections::Sections;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A station as handed out by the station directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: StationId(id),
            name: name.into(),
        }
    }
}

/// A directed edge of a line's path, ending at `station`.
///
/// `predecessor` is `None` only for the start section, whose distance is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub line: LineId,
    pub station: StationId,
    pub predecessor: Option<StationId>,
    pub distance: u64,
}

impl Section {
    pub fn start(line: LineId, station: StationId) -> Self {
        Self {
            line,
            station,
            predecessor: None,
            distance: 0,
        }
    }

    pub fn between(line: LineId, up: StationId, down: StationId, distance: u64) -> Self {
        Self {
            line,
            station: down,
            predecessor: Some(up),
            distance,
        }
    }

    pub fn is_start(&self) -> bool {
        self.predecessor.is_none()
    }

    pub(crate) fn with_predecessor(self, predecessor: Option<StationId>, distance: u64) -> Self {
        Self {
            predecessor,
            distance,
            ..self
        }
    }

    pub(crate) fn with_station(self, station: StationId, distance: u64) -> Self {
        Self {
            station,
            distance,
            ..self
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.predecessor {
            Some(up) => write!(f, "{} -> {} ({})", up, self.station, self.distance),
            None => write!(f, "start {}", self.station),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub sections: Sections,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Line {
    /// A line that has not been persisted yet; the repository assigns the real id.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: LineId(0),
            name: name.into(),
            color: color.into(),
            sections: Sections::new(LineId(0)),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn update(&mut self, name: impl Into<String>, color: impl Into<String>) {
        self.name = name.into();
        self.color = color.into();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    pub(crate) fn assign_id(&mut self, id: LineId) {
        self.id = id;
        self.sections.reassign_line(id);
    }
}
