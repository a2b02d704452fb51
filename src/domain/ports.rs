use crate::domain::model::{Line, LineId, Station, StationId};
use crate::utils::error::Result;

/// Resolves station ids to stations; fails with `StationNotFound` for unknown ids.
pub trait StationDirectory: Send + Sync {
    fn resolve(&self, id: StationId) -> Result<Station>;

    fn resolve_all(&self, ids: &[StationId]) -> Result<Vec<Station>> {
        ids.iter().map(|id| self.resolve(*id)).collect()
    }
}

pub trait LineRepository: Send + Sync {
    /// Stores `line`, assigning an id if it has none yet, and returns the stored copy.
    fn save(&mut self, line: Line) -> Result<Line>;
    fn find_by_id(&self, id: LineId) -> Result<Option<Line>>;
    fn find_by_name(&self, name: &str) -> Result<Option<Line>>;
    fn find_all(&self) -> Result<Vec<Line>>;
    /// Returns whether a line was removed.
    fn delete_by_id(&mut self, id: LineId) -> Result<bool>;
}
