use crate::core::{
    Line, LineId, LineRepository, LineRequest, LineResponse, LineSummary, LineUpdateRequest,
    Result, Section, SectionRequest, Sections, StationDirectory, StationId,
};
use crate::utils::error::SubwayError;
use crate::utils::validation::Validate;

/// Line lifecycle and section editing on top of the two ports.
///
/// Every mutation takes `&mut self`, so writes against one service are serialised.
pub struct LineService<D: StationDirectory, R: LineRepository> {
    stations: D,
    lines: R,
}

impl<D: StationDirectory, R: LineRepository> LineService<D, R> {
    pub fn new(stations: D, lines: R) -> Self {
        Self { stations, lines }
    }

    pub fn stations(&self) -> &D {
        &self.stations
    }

    pub fn find_all(&self) -> Result<Vec<LineSummary>> {
        Ok(self.lines.find_all()?.iter().map(LineSummary::from).collect())
    }

    pub fn find_by_id(&self, id: LineId) -> Result<LineResponse> {
        let line = self.load(id)?;
        self.respond(&line)
    }

    pub fn save_line(&mut self, request: &LineRequest) -> Result<LineResponse> {
        request.validate()?;
        if self.lines.find_by_name(&request.name)?.is_some() {
            tracing::warn!("Line '{}' already exists", request.name);
            return Err(SubwayError::DuplicateLine {
                name: request.name.clone(),
            });
        }

        let up = self.stations.resolve(StationId(request.up_station_id))?;
        let down = self.stations.resolve(StationId(request.down_station_id))?;

        let mut line = Line::new(&request.name, &request.color);
        line.sections = Sections::open(line.id, up.id, down.id, request.distance)?;
        let line = self.lines.save(line)?;

        tracing::info!(
            "Created line {} '{}': {} -> {} ({})",
            line.id,
            line.name,
            up.name,
            down.name,
            request.distance
        );
        self.respond(&line)
    }

    pub fn update_line(&mut self, id: LineId, request: &LineUpdateRequest) -> Result<()> {
        request.validate()?;
        let mut line = self.load(id)?;
        if let Some(other) = self.lines.find_by_name(&request.name)? {
            if other.id != id {
                return Err(SubwayError::DuplicateLine {
                    name: request.name.clone(),
                });
            }
        }

        line.update(&request.name, &request.color);
        self.lines.save(line)?;
        tracing::info!("Updated line {} to '{}' ({})", id, request.name, request.color);
        Ok(())
    }

    pub fn delete_line(&mut self, id: LineId) -> Result<()> {
        if !self.lines.delete_by_id(id)? {
            return Err(SubwayError::LineNotFound { id });
        }
        tracing::info!("Deleted line {}", id);
        Ok(())
    }

    pub fn add_section(&mut self, line_id: LineId, request: &SectionRequest) -> Result<LineResponse> {
        request.validate()?;
        let mut line = self.load(line_id)?;

        let up = self.stations.resolve(StationId(request.up_station_id))?;
        let down = self.stations.resolve(StationId(request.down_station_id))?;
        let section = Section::between(line.id, up.id, down.id, request.distance);

        if let Err(e) = line.sections.insert(section) {
            tracing::warn!("Rejected section {} -> {} on line {}: {}", up.name, down.name, line_id, e);
            return Err(e);
        }
        line.touch();
        let line = self.lines.save(line)?;

        tracing::info!(
            "Added section {} -> {} ({}) to line {}",
            up.name,
            down.name,
            request.distance,
            line_id
        );
        self.respond(&line)
    }

    pub fn remove_section(&mut self, line_id: LineId, station_id: StationId) -> Result<()> {
        let mut line = self.load(line_id)?;
        let station = self.stations.resolve(station_id)?;

        if let Err(e) = line.sections.remove(station.id) {
            tracing::warn!("Could not remove {} from line {}: {}", station.name, line_id, e);
            return Err(e);
        }
        line.touch();
        self.lines.save(line)?;

        tracing::info!("Removed {} from line {}", station.name, line_id);
        Ok(())
    }

    fn load(&self, id: LineId) -> Result<Line> {
        self.lines
            .find_by_id(id)?
            .ok_or(SubwayError::LineNotFound { id })
    }

    fn respond(&self, line: &Line) -> Result<LineResponse> {
        let stations = self.stations.resolve_all(&line.sections.stations())?;
        Ok(LineResponse::of(line, stations))
    }
}
