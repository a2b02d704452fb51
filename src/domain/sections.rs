//! The section topology of a single line.
//!
//! A line is a simple path of stations. It is stored as directed, distance
//! weighted [`Section`]s: one start section (no predecessor, distance 0) and
//! one section per hop. `Sections` keeps them in path order so reads never
//! have to chase predecessors; [`Sections::from_unordered`] rebuilds that
//! order from sections handed back in arbitrary order.
//!
//! Mutations build the next ordered vector aside and commit it only once
//! every check has passed, so a rejected call leaves the set as it was.

use crate::domain::model::{LineId, Section, StationId};
use crate::utils::error::{Result, SubwayError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A line with this many sections (two stations) cannot lose a station.
pub const REMOVABLE_MINIMUM_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSections")]
pub struct Sections {
    line: LineId,
    sections: Vec<Section>,
}

/// Wire shape; the order of `sections` is not trusted.
#[derive(Deserialize)]
struct StoredSections {
    line: LineId,
    sections: Vec<Section>,
}

impl TryFrom<StoredSections> for Sections {
    type Error = SubwayError;

    fn try_from(stored: StoredSections) -> Result<Self> {
        Sections::from_unordered(stored.line, stored.sections)
    }
}

impl Sections {
    pub fn new(line: LineId) -> Self {
        Self {
            line,
            sections: Vec::new(),
        }
    }

    /// The two sections a line is created with: the start at `up`, then `up -> down`.
    pub fn open(line: LineId, up: StationId, down: StationId, distance: u64) -> Result<Self> {
        if up == down {
            return Err(SubwayError::DuplicateSection {
                up: up.to_string(),
                down: down.to_string(),
            });
        }
        ensure_positive(distance)?;

        let mut sections = Self::new(line);
        sections.insert(Section::start(line, up))?;
        sections.insert(Section::between(line, up, down, distance))?;
        Ok(sections)
    }

    /// Rebuilds the path order: start at the predecessor-less section, then
    /// keep following the section that leaves the last station reached.
    pub fn from_unordered(line: LineId, sections: Vec<Section>) -> Result<Self> {
        if sections.is_empty() {
            return Ok(Self::new(line));
        }

        let mut starts = sections.iter().filter(|s| s.is_start());
        let start = *starts
            .next()
            .ok_or_else(|| broken_path("no section starts the line"))?;
        if let Some(other) = starts.next() {
            return Err(broken_path(format!(
                "both {} and {} start the line",
                start.station, other.station
            )));
        }
        if start.distance != 0 {
            return Err(broken_path(format!(
                "start section {} carries distance {}",
                start.station, start.distance
            )));
        }

        let mut leaving: HashMap<StationId, Section> = HashMap::with_capacity(sections.len());
        for section in &sections {
            if section.line != line {
                return Err(broken_path(format!(
                    "section {} belongs to line {}, not {}",
                    section, section.line, line
                )));
            }
            if let Some(up) = section.predecessor {
                if section.distance == 0 {
                    return Err(broken_path(format!("section {} has no length", section)));
                }
                if leaving.insert(up, *section).is_some() {
                    return Err(broken_path(format!("line branches at {}", up)));
                }
            }
        }

        let mut ordered = Vec::with_capacity(sections.len());
        let mut visited = HashSet::with_capacity(sections.len());
        let mut cursor = Some(start);
        while let Some(section) = cursor {
            if !visited.insert(section.station) {
                return Err(broken_path(format!("line loops back to {}", section.station)));
            }
            ordered.push(section);
            cursor = leaving.get(&section.station).copied();
        }

        if ordered.len() != sections.len() {
            return Err(broken_path(format!(
                "{} section(s) are not reachable from {}",
                sections.len() - ordered.len(),
                start.station
            )));
        }

        if checked_total(&ordered).is_none() {
            return Err(broken_path("total distance overflows"));
        }

        Ok(Self {
            line,
            sections: ordered,
        })
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    /// Sections from the start section to the terminal one.
    pub fn ordered(&self) -> &[Section] {
        &self.sections
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn stations(&self) -> Vec<StationId> {
        self.sections.iter().map(|s| s.station).collect()
    }

    pub fn contains(&self, station: StationId) -> bool {
        self.position_of(station).is_some()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Cannot overflow: every way into a `Sections` keeps the total within `u64`.
    pub fn total_distance(&self) -> u64 {
        self.sections.iter().map(|s| s.distance).sum()
    }

    /// Adds `section` to the path.
    ///
    /// Exactly one of its two stations must already be on the line. When the
    /// known station is interior, the hop it sits on is split and the old hop
    /// keeps the remainder; when it is a terminal the line is extended.
    pub fn insert(&mut self, section: Section) -> Result<()> {
        if self.sections.is_empty() {
            tracing::debug!(line = %self.line, %section, "registering first section");
            self.sections.push(section);
            return Ok(());
        }

        let Some(up) = section.predecessor else {
            return Err(SubwayError::DuplicateSection {
                up: "start".to_string(),
                down: section.station.to_string(),
            });
        };

        let next = match (self.position_of(up), self.position_of(section.station)) {
            (Some(_), Some(_)) => {
                return Err(SubwayError::DuplicateSection {
                    up: up.to_string(),
                    down: section.station.to_string(),
                })
            }
            (None, None) => {
                return Err(SubwayError::DisconnectedSection {
                    up: up.to_string(),
                    down: section.station.to_string(),
                })
            }
            (Some(at), None) => self.split_after(at, section)?,
            (None, Some(at)) => self.split_before(at, up, section)?,
        };

        self.sections = next;
        Ok(())
    }

    /// Takes `station` off the path, joining its neighbours into one section.
    pub fn remove(&mut self, station: StationId) -> Result<()> {
        if self.sections.len() <= REMOVABLE_MINIMUM_SIZE {
            return Err(SubwayError::TooFewSections {
                size: self.sections.len(),
                minimum: REMOVABLE_MINIMUM_SIZE,
            });
        }
        let Some(at) = self.position_of(station) else {
            return Err(SubwayError::StationNotOnLine { station });
        };

        let mut next = self.sections.clone();
        let entering = next.remove(at);
        // The section that left `station` has shifted into `at`.
        if let Some(leaving) = next.get(at).copied() {
            let merged = if entering.is_start() {
                leaving.with_predecessor(None, 0)
            } else {
                let distance = entering
                    .distance
                    .checked_add(leaving.distance)
                    .ok_or_else(|| SubwayError::InvalidDistance {
                        distance: leaving.distance,
                        reason: "merged distance overflows".to_string(),
                    })?;
                leaving.with_predecessor(entering.predecessor, distance)
            };
            tracing::debug!(line = %self.line, %station, %merged, "merged neighbouring sections");
            next[at] = merged;
        } else {
            tracing::debug!(line = %self.line, %station, "dropped terminal section");
        }

        self.sections = next;
        Ok(())
    }

    pub(crate) fn reassign_line(&mut self, line: LineId) {
        self.line = line;
        for section in &mut self.sections {
            section.line = line;
        }
    }

    fn position_of(&self, station: StationId) -> Option<usize> {
        self.sections.iter().position(|s| s.station == station)
    }

    /// `new` leaves the station at `at`; the hop that used to leave it now leaves `new.station`.
    fn split_after(&self, at: usize, new: Section) -> Result<Vec<Section>> {
        ensure_positive(new.distance)?;
        let mut next = self.sections.clone();
        match next.get(at + 1).copied() {
            Some(following) => {
                let remainder = remainder(&following, new.distance)?;
                tracing::debug!(line = %self.line, split = %following, %new, "splitting section downstream");
                next[at + 1] = following.with_predecessor(Some(new.station), remainder);
                next.insert(at + 1, new);
            }
            None => {
                self.ensure_extendable(new.distance)?;
                tracing::debug!(line = %self.line, %new, "extending past terminal");
                next.push(new);
            }
        }
        Ok(next)
    }

    /// `new` enters the station at `at`; the hop that used to enter it now ends at `up`.
    fn split_before(&self, at: usize, up: StationId, new: Section) -> Result<Vec<Section>> {
        ensure_positive(new.distance)?;
        let mut next = self.sections.clone();
        let existing = next[at];
        next[at] = if existing.is_start() {
            self.ensure_extendable(new.distance)?;
            tracing::debug!(line = %self.line, %new, "extending before start");
            existing.with_station(up, 0)
        } else {
            let remainder = remainder(&existing, new.distance)?;
            tracing::debug!(line = %self.line, split = %existing, %new, "splitting section upstream");
            existing.with_station(up, remainder)
        };
        next.insert(at + 1, new);
        Ok(next)
    }

    /// Splits and merges keep the total; only extensions grow it.
    fn ensure_extendable(&self, distance: u64) -> Result<()> {
        if self.total_distance().checked_add(distance).is_none() {
            return Err(SubwayError::InvalidDistance {
                distance,
                reason: format!("line would exceed {} in total", u64::MAX),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Sections {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

fn ensure_positive(distance: u64) -> Result<()> {
    if distance == 0 {
        return Err(SubwayError::InvalidDistance {
            distance,
            reason: "a section between two stations must be longer than 0".to_string(),
        });
    }
    Ok(())
}

fn remainder(split: &Section, distance: u64) -> Result<u64> {
    if distance >= split.distance {
        return Err(SubwayError::InvalidDistance {
            distance,
            reason: format!(
                "must be shorter than the section being split ({})",
                split
            ),
        });
    }
    Ok(split.distance - distance)
}

fn checked_total(sections: &[Section]) -> Option<u64> {
    sections
        .iter()
        .try_fold(0u64, |total, s| total.checked_add(s.distance))
}

fn broken_path(message: impl Into<String>) -> SubwayError {
    SubwayError::BrokenPath {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: LineId = LineId(1);

    fn id(n: u64) -> StationId {
        StationId(n)
    }

    fn hop(up: u64, down: u64, distance: u64) -> Section {
        Section::between(LINE, id(up), id(down), distance)
    }

    /// (predecessor, station, distance) triples in path order.
    fn hops(sections: &Sections) -> Vec<(Option<u64>, u64, u64)> {
        sections
            .iter()
            .map(|s| (s.predecessor.map(|p| p.0), s.station.0, s.distance))
            .collect()
    }

    fn line_of(stations: &[u64], distance: u64) -> Sections {
        let mut sections = Sections::open(LINE, id(stations[0]), id(stations[1]), distance).unwrap();
        for pair in stations[1..].windows(2) {
            sections.insert(hop(pair[0], pair[1], distance)).unwrap();
        }
        sections
    }

    #[test]
    fn test_open_registers_start_and_first_hop() {
        let sections = Sections::open(LINE, id(1), id(2), 100).unwrap();
        assert_eq!(hops(&sections), vec![(None, 1, 0), (Some(1), 2, 100)]);
        assert_eq!(sections.stations(), vec![id(1), id(2)]);
    }

    #[test]
    fn test_open_rejects_same_station_and_zero_distance() {
        assert!(matches!(
            Sections::open(LINE, id(1), id(1), 10),
            Err(SubwayError::DuplicateSection { .. })
        ));
        assert!(matches!(
            Sections::open(LINE, id(1), id(2), 0),
            Err(SubwayError::InvalidDistance { .. })
        ));
    }

    #[test]
    fn test_insert_into_empty_set_is_unconditional() {
        let mut sections = Sections::new(LINE);
        sections.insert(Section::start(LINE, id(9))).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections.stations(), vec![id(9)]);
    }

    #[test]
    fn test_insert_splits_after_known_upstream() {
        let mut sections = Sections::open(LINE, id(1), id(2), 100).unwrap();
        sections.insert(hop(1, 3, 30)).unwrap();
        assert_eq!(
            hops(&sections),
            vec![(None, 1, 0), (Some(1), 3, 30), (Some(3), 2, 70)]
        );
    }

    #[test]
    fn test_insert_splits_before_known_downstream() {
        let mut sections = Sections::open(LINE, id(1), id(2), 100).unwrap();
        sections.insert(hop(3, 2, 30)).unwrap();
        assert_eq!(
            hops(&sections),
            vec![(None, 1, 0), (Some(1), 3, 70), (Some(3), 2, 30)]
        );
    }

    #[test]
    fn test_insert_extends_both_ends_without_touching_distances() {
        let mut sections = Sections::open(LINE, id(1), id(2), 100).unwrap();
        sections.insert(hop(2, 3, 40)).unwrap();
        sections.insert(hop(0, 1, 25)).unwrap();
        assert_eq!(
            hops(&sections),
            vec![(None, 0, 0), (Some(0), 1, 25), (Some(1), 2, 100), (Some(2), 3, 40)]
        );
        assert_eq!(sections.total_distance(), 165);
    }

    #[test]
    fn test_insert_rejects_split_not_shorter_than_section() {
        let mut sections = Sections::open(LINE, id(1), id(2), 100).unwrap();
        let before = sections.clone();
        for distance in [100, 150] {
            assert!(matches!(
                sections.insert(hop(1, 3, distance)),
                Err(SubwayError::InvalidDistance { .. })
            ));
            assert!(matches!(
                sections.insert(hop(3, 2, distance)),
                Err(SubwayError::InvalidDistance { .. })
            ));
        }
        assert_eq!(sections, before);
    }

    #[test]
    fn test_insert_rejects_zero_distance() {
        let mut sections = Sections::open(LINE, id(1), id(2), 100).unwrap();
        assert!(matches!(
            sections.insert(hop(2, 3, 0)),
            Err(SubwayError::InvalidDistance { .. })
        ));
        assert_eq!(sections.len(), 2);
    }

    #[test]
    fn test_insert_rejects_extension_past_total_range() {
        let mut sections = Sections::open(LINE, id(1), id(2), 100).unwrap();
        let long = i64::MAX as u64;
        sections.insert(hop(2, 3, long)).unwrap();
        let before = sections.clone();

        assert!(matches!(
            sections.insert(hop(3, 4, long)),
            Err(SubwayError::InvalidDistance { .. })
        ));
        assert!(matches!(
            sections.insert(hop(0, 1, long)),
            Err(SubwayError::InvalidDistance { .. })
        ));
        assert_eq!(sections, before);
        assert_eq!(sections.total_distance(), long + 100);

        // Splitting the long hop keeps the total, so it is still allowed.
        sections.insert(hop(2, 4, 10)).unwrap();
        assert_eq!(sections.total_distance(), long + 100);
    }

    #[test]
    fn test_insert_rejects_second_start() {
        let mut sections = Sections::open(LINE, id(1), id(2), 100).unwrap();
        assert!(matches!(
            sections.insert(Section::start(LINE, id(5))),
            Err(SubwayError::DuplicateSection { .. })
        ));
    }

    #[test]
    fn test_insert_rejects_duplicate_and_disconnected() {
        let mut sections = line_of(&[1, 2, 3], 10);
        let before = sections.clone();
        assert!(matches!(
            sections.insert(hop(1, 3, 5)),
            Err(SubwayError::DuplicateSection { .. })
        ));
        assert!(matches!(
            sections.insert(hop(3, 1, 5)),
            Err(SubwayError::DuplicateSection { .. })
        ));
        assert!(matches!(
            sections.insert(hop(7, 8, 5)),
            Err(SubwayError::DisconnectedSection { .. })
        ));
        assert_eq!(sections, before);
    }

    #[test]
    fn test_remove_interior_merges_distances() {
        let mut sections = Sections::open(LINE, id(1), id(3), 100).unwrap();
        sections.insert(hop(1, 2, 40)).unwrap();
        sections.remove(id(2)).unwrap();
        assert_eq!(hops(&sections), vec![(None, 1, 0), (Some(1), 3, 100)]);
    }

    #[test]
    fn test_remove_start_promotes_next_station() {
        let mut sections = line_of(&[1, 2, 3], 10);
        sections.remove(id(1)).unwrap();
        assert_eq!(hops(&sections), vec![(None, 2, 0), (Some(2), 3, 10)]);
    }

    #[test]
    fn test_remove_terminal_drops_last_hop() {
        let mut sections = line_of(&[1, 2, 3], 10);
        sections.remove(id(3)).unwrap();
        assert_eq!(hops(&sections), vec![(None, 1, 0), (Some(1), 2, 10)]);
    }

    #[test]
    fn test_remove_guards() {
        let mut two = Sections::open(LINE, id(1), id(2), 10).unwrap();
        assert!(matches!(
            two.remove(id(1)),
            Err(SubwayError::TooFewSections { size: 2, minimum: 2 })
        ));

        let mut three = line_of(&[1, 2, 3], 10);
        let before = three.clone();
        assert!(matches!(
            three.remove(id(9)),
            Err(SubwayError::StationNotOnLine { station }) if station == id(9)
        ));
        assert_eq!(three, before);
    }

    #[test]
    fn test_from_unordered_reconstructs_path() {
        let shuffled = vec![hop(3, 4, 5), Section::start(LINE, id(1)), hop(2, 3, 7), hop(1, 2, 9)];
        let sections = Sections::from_unordered(LINE, shuffled).unwrap();
        assert_eq!(sections.stations(), vec![id(1), id(2), id(3), id(4)]);
        assert_eq!(sections.total_distance(), 21);
    }

    #[test]
    fn test_from_unordered_rejects_broken_paths() {
        let cases = vec![
            vec![hop(1, 2, 5)],
            vec![Section::start(LINE, id(1)), Section::start(LINE, id(2))],
            vec![Section::start(LINE, id(1)), hop(1, 2, 5), hop(1, 3, 5)],
            vec![Section::start(LINE, id(1)), hop(1, 2, 5), hop(2, 1, 5)],
            vec![Section::start(LINE, id(1)), hop(1, 2, 5), hop(8, 9, 5)],
            vec![Section::start(LINE, id(1)), hop(1, 2, 0)],
            vec![
                Section::start(LINE, id(1)),
                Section::between(LineId(2), id(1), id(2), 5),
            ],
            vec![Section::start(LINE, id(1)), hop(1, 2, u64::MAX), hop(2, 3, 1)],
        ];
        for case in cases {
            assert!(matches!(
                Sections::from_unordered(LINE, case),
                Err(SubwayError::BrokenPath { .. })
            ));
        }
    }

    #[test]
    fn test_deserialize_goes_through_reconstruction() {
        let json = r#"{"line":4,"sections":[
            {"line":4,"station":2,"predecessor":1,"distance":30},
            {"line":4,"station":1,"predecessor":null,"distance":0}
        ]}"#;
        let sections: Sections = serde_json::from_str(json).unwrap();
        assert_eq!(sections.line(), LineId(4));
        assert_eq!(sections.stations(), vec![id(1), id(2)]);

        let broken = r#"{"line":4,"sections":[{"line":4,"station":2,"predecessor":1,"distance":30}]}"#;
        assert!(serde_json::from_str::<Sections>(broken).is_err());
    }
}
